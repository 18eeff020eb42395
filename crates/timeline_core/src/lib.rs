//! Timeline core: pure harvest state machine and field normalization.
mod completion;
mod effect;
mod msg;
mod normalize;
mod record;
mod state;
mod update;
mod view_model;

pub use completion::CompletionCell;
pub use effect::{Effect, FinishReason};
pub use msg::Msg;
pub use normalize::{parse_count, to_absolute_url};
pub use record::Record;
pub use state::{BatchId, HarvestOptions, HarvestState, Phase};
pub use update::update;
pub use view_model::HarvestView;

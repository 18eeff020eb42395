//! Timeline driver: the pacing drive loop that alternates advancing the
//! source and checking progress, plus the scripted-timeline test double.
mod host;
mod scripted;
mod session;

pub use host::HostEnvironment;
pub use scripted::{ScriptStep, ScriptedTimeline};
pub use session::{run_harvest, HarvestOutcome};

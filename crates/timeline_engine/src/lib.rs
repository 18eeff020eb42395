//! Timeline engine: record-source capability trait, scraper-backed DOM
//! source, record extraction, serialization and the output sink.
mod dom;
mod extract;
mod filename;
mod serialize;
mod sink;
mod source;

pub use dom::{DomNode, DomSource};
pub use extract::{extract, resolve_avatar};
pub use filename::csv_filename;
pub use serialize::{to_csv, to_json, CSV_HEADER};
pub use sink::{ensure_output_dir, AtomicFileWriter, FileSink, MemorySink, OutputSink, PersistError};
pub use source::{ActionKind, ItemSource, UserIdentity};

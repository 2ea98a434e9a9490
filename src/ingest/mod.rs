//! Edge ingestion pipeline: backing-store scanner, partition planner,
//! edge-list adapter, and the format front-ends.

mod loader;
mod partition;
mod scanner;
mod source;

pub use loader::{BinFileLoader, EdgeDirLoader, FileLoader, GeneratedLoader, LoaderRegistry};
pub use partition::{plan, Partition};
pub use scanner::{Scanner, BUFFER_RECORDS, RECORD_BYTES};
pub use source::{EdgeListSource, EdgeSource, LoadedEdge, SourceStat};

pub(crate) use scanner::segment_name;

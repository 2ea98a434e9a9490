//! Interface boundary to the graph-construction collaborators.
//!
//! The multi-level CSR builder and the writable graph live outside this
//! crate; the loaders only depend on the two protocols below.

use crate::ingest::EdgeSource;
use crate::types::{NodeId, Result};

/// Bulk-load protocol of the read-only graph builder.
pub trait ReadOnlySink {
    /// Consumes the source to exhaustion, building one new immutable level.
    ///
    /// The builder may [`rewind`](EdgeSource::rewind) the source for a
    /// sizing pass before a materializing pass. Returning an error aborts
    /// the whole load; no partial graph is produced.
    fn build_from(&mut self, source: &mut dyn EdgeSource) -> Result<()>;
}

/// Incremental-append protocol of the writable graph.
///
/// The front-end drives one batch per load operation: `begin_batch`, one
/// `add_edge` per record, then `commit_batch` on success or `abort_batch` on
/// the first failure. A failed load must leave the graph exactly as it was
/// before the call began.
pub trait WritableGraph {
    /// Opens a new append batch.
    fn begin_batch(&mut self);
    /// Stages one edge into the current batch.
    fn add_edge(&mut self, tail: NodeId, head: NodeId) -> Result<()>;
    /// Makes the staged batch visible.
    fn commit_batch(&mut self) -> Result<()>;
    /// Discards the staged batch.
    fn abort_batch(&mut self);
}

//! Partition planner: derives the contiguous edge-index range one loader
//! instance is responsible for.

use crate::config::LoaderConfig;
use crate::types::{IngestError, Result};

/// A contiguous, disjoint slice `[begin_edge, begin_edge + needed_edges)` of
/// the logical edge index space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    /// First logical edge index owned by this shard.
    pub begin_edge: u64,
    /// Number of edges this shard must load.
    pub needed_edges: u64,
}

impl Partition {
    /// One past the last logical edge index owned by this shard.
    pub fn end_edge(&self) -> u64 {
        self.begin_edge + self.needed_edges
    }
}

/// Derives the edge range for the shard requested in `config`.
///
/// Pure computation, no I/O. Re-evaluated on every load call, so a scanner
/// reused for a different shard request of the same input is repartitioned
/// for free.
///
/// The divisibility check is what guarantees that no edge is double-counted
/// or dropped across shards; a non-divisible total is rejected rather than
/// rounded.
pub fn plan(total_edges: u64, config: &LoaderConfig) -> Result<Partition> {
    if !config.is_sharded() {
        return Ok(Partition {
            begin_edge: 0,
            needed_edges: total_edges,
        });
    }
    let num_parts = config.partial_load_num_parts;
    let part = config.partial_load_part;
    if total_edges % num_parts != 0 {
        return Err(IngestError::Config(format!(
            "edge count {total_edges} does not divide evenly into {num_parts} parts"
        )));
    }
    if part < 1 || part > num_parts {
        return Err(IngestError::Config(format!(
            "shard index {part} outside 1..={num_parts}"
        )));
    }
    let needed_edges = total_edges / num_parts;
    Ok(Partition {
        begin_edge: (part - 1) * needed_edges,
        needed_edges,
    })
}

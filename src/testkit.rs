//! Test support: binary fixture writers and in-memory sink doubles.
//!
//! Shared by the in-crate unit tests and the integration suite; also handy
//! for downstream crates exercising custom loaders.

use std::fs;
use std::path::Path;

use crate::ingest::{segment_name, EdgeSource};
use crate::sink::{ReadOnlySink, WritableGraph};
use crate::types::{IngestError, NodeId, Result};

/// Encodes edges into the on-disk record layout: two consecutive
/// native-endian `u64`s per edge.
pub fn encode_records(edges: &[(u64, u64)]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(edges.len() * 16);
    for &(tail, head) in edges {
        bytes.extend_from_slice(&tail.to_ne_bytes());
        bytes.extend_from_slice(&head.to_ne_bytes());
    }
    bytes
}

/// Writes one flat binary record file.
pub fn write_segment(path: &Path, edges: &[(u64, u64)]) -> Result<()> {
    fs::write(path, encode_records(edges))?;
    Ok(())
}

/// Writes generator-style output: `edges` split into uniform segments of
/// `per_file` records each, named by sequential index. `edges.len()` must be
/// a multiple of `per_file`.
pub fn write_generated_dir(dir: &Path, edges: &[(u64, u64)], per_file: usize) -> Result<()> {
    assert_eq!(
        edges.len() % per_file,
        0,
        "fixture edges must fill whole segments"
    );
    for (index, chunk) in edges.chunks(per_file).enumerate() {
        write_segment(&dir.join(segment_name(index)), chunk)?;
    }
    Ok(())
}

/// Read-only builder double. Mirrors the CSR builder's two-pass behavior:
/// a sizing pass, a rewind, then a materializing pass.
#[derive(Default)]
pub struct CollectingSink {
    /// Edges gathered by the materializing pass.
    pub edges: Vec<(u64, u64)>,
    /// Edge count observed by the sizing pass.
    pub sized: Option<u64>,
}

impl ReadOnlySink for CollectingSink {
    fn build_from(&mut self, source: &mut dyn EdgeSource) -> Result<()> {
        let mut count = 0u64;
        while source.next_edge()?.is_some() {
            count += 1;
        }
        self.sized = Some(count);
        source.rewind()?;
        while let Some(edge) = source.next_edge()? {
            self.edges.push((edge.tail.0, edge.head.0));
        }
        Ok(())
    }
}

/// Writable graph double with all-or-nothing batch semantics.
#[derive(Default)]
pub struct MemoryGraph {
    committed: Vec<(u64, u64)>,
    staged: Vec<(u64, u64)>,
    /// When set, `add_edge` rejects the record after this many staged edges,
    /// simulating a mid-batch failure.
    pub fail_after: Option<usize>,
}

impl MemoryGraph {
    /// Edges visible in the graph (committed batches only).
    pub fn edges(&self) -> &[(u64, u64)] {
        &self.committed
    }
}

impl WritableGraph for MemoryGraph {
    fn begin_batch(&mut self) {
        self.staged.clear();
    }

    fn add_edge(&mut self, tail: NodeId, head: NodeId) -> Result<()> {
        if let Some(limit) = self.fail_after {
            if self.staged.len() >= limit {
                return Err(IngestError::Format(
                    "writable graph rejected the edge".into(),
                ));
            }
        }
        self.staged.push((tail.0, head.0));
        Ok(())
    }

    fn commit_batch(&mut self) -> Result<()> {
        self.committed.append(&mut self.staged);
        Ok(())
    }

    fn abort_batch(&mut self) {
        self.staged.clear();
    }
}

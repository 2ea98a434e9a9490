//! Edge-list loader adapter: a restartable pull sequence over one partition
//! of a scanner's edge stream.

use tracing::trace;

use crate::types::{NodeId, Result};

use super::scanner::Scanner;

/// One edge handed to a consumer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LoadedEdge {
    /// Source endpoint.
    pub tail: NodeId,
    /// Destination endpoint.
    pub head: NodeId,
    /// Always `None` for the binary formats; the slot is reserved so future
    /// weighted formats can share the contract.
    pub weight: Option<f32>,
}

/// Size hints a source can supply without consuming the stream.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SourceStat {
    /// Number of nodes in the graph.
    pub nodes: u64,
    /// Number of edges this source will yield.
    pub edges: u64,
}

/// Pull contract both graph builders consume.
///
/// Consumers call [`next_edge`] until exhaustion; [`rewind`] restarts the
/// exact same sequence, which the read-only builder relies on for its sizing
/// pass before materializing.
///
/// [`next_edge`]: EdgeSource::next_edge
/// [`rewind`]: EdgeSource::rewind
pub trait EdgeSource {
    /// Returns one edge and advances, or `Ok(None)` on exhaustion. Any read
    /// failure is fatal for the whole load.
    fn next_edge(&mut self) -> Result<Option<LoadedEdge>>;

    /// Repositions to the start of this source's partition; the next pass
    /// yields the identical sequence again.
    fn rewind(&mut self) -> Result<()>;

    /// Size hints, when the format can supply them cheaply; `None` means the
    /// consumer must discover sizes by full traversal.
    fn stat(&self) -> Option<SourceStat>;
}

impl std::fmt::Debug for dyn EdgeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn EdgeSource")
    }
}

/// [`EdgeSource`] over the partition `[begin_edge, begin_edge + needed)` of
/// one scanner. Created fresh per load operation; owns the scanner for the
/// operation's duration and hands it back via [`into_scanner`].
///
/// [`into_scanner`]: EdgeListSource::into_scanner
pub struct EdgeListSource {
    scanner: Scanner,
    begin_edge: u64,
    /// `None` when the input cannot report its edge count: the source then
    /// runs until the scanner is exhausted.
    needed_edges: Option<u64>,
    loaded_edges: u64,
}

impl EdgeListSource {
    pub(crate) fn new(
        mut scanner: Scanner,
        begin_edge: u64,
        needed_edges: Option<u64>,
    ) -> Result<Self> {
        scanner.seek(begin_edge)?;
        Ok(Self {
            scanner,
            begin_edge,
            needed_edges,
            loaded_edges: 0,
        })
    }

    /// Releases the underlying scanner so the front-end can cache it.
    pub(crate) fn into_scanner(self) -> Scanner {
        self.scanner
    }
}

impl EdgeSource for EdgeListSource {
    fn next_edge(&mut self) -> Result<Option<LoadedEdge>> {
        if let Some(needed) = self.needed_edges {
            // The partition boundary is authoritative, even if the scanner
            // has more data past it.
            if self.loaded_edges >= needed {
                return Ok(None);
            }
        }
        match self.scanner.next()? {
            Some(record) => {
                self.loaded_edges += 1;
                Ok(Some(LoadedEdge {
                    tail: record.tail,
                    head: record.head,
                    weight: None,
                }))
            }
            None => Ok(None),
        }
    }

    fn rewind(&mut self) -> Result<()> {
        trace!(begin = self.begin_edge, "source.rewind");
        self.loaded_edges = 0;
        self.scanner.seek(self.begin_edge)?;
        Ok(())
    }

    fn stat(&self) -> Option<SourceStat> {
        let nodes = self.scanner.total_nodes()?;
        let edges = self.needed_edges?;
        Some(SourceStat { nodes, edges })
    }
}

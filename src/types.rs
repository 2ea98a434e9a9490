//! Core identifiers, the on-disk edge record, and the crate error type.

use std::fmt;

use thiserror::Error;

/// Identifier of a graph node.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(value: u64) -> Self {
        NodeId(value)
    }
}

impl From<NodeId> for u64 {
    fn from(value: NodeId) -> Self {
        value.0
    }
}

/// One directed edge as it appears in the on-disk stream.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct EdgeRecord {
    /// Source endpoint.
    pub tail: NodeId,
    /// Destination endpoint.
    pub head: NodeId,
}

/// Errors produced by the ingestion pipeline.
///
/// Every condition here aborts the whole load operation; there is no retry
/// and no partial-success path. The caller decides whether to terminate,
/// log, or retry the operation as a whole.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A backing-file read failed. Never conflated with clean end-of-data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid shard assignment or other bad configuration, detected before
    /// any data is read.
    #[error("configuration error: {0}")]
    Config(String),
    /// Missing or empty input directory, unopenable backing file.
    #[error("environment error: {0}")]
    Environment(String),
    /// Malformed path metadata or backing files that violate the layout the
    /// format promises.
    #[error("format error: {0}")]
    Format(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, IngestError>;

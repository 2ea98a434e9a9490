//! Lamina edge ingestion.
//!
//! Converts externally stored edge data — synthetic generator output or flat
//! binary edge-list files, possibly sharded across multiple backing files —
//! into the pull-based edge stream consumed by the Lamina graph builders.
//! Streams arbitrarily large edge sets without loading them into memory,
//! supports deterministic partitioning of the edge space across parallel
//! loader instances, and hides the on-disk format behind one iterator
//! contract.
//!
//! Everything here is synchronous, single-threaded pull iteration;
//! parallelism comes from running independent loader instances over disjoint
//! shards.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod ingest;
pub mod sink;
pub mod testkit;
pub mod types;

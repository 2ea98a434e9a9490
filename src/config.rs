//! Loader configuration surface.

/// Configuration consumed by the ingestion front-ends.
///
/// Only the partial-load fields matter to this crate; they select the shard
/// of the logical edge stream one loader instance is responsible for.
/// Parallel bulk construction runs several independent loader instances,
/// each with a disjoint shard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Number of shards the edge stream is split into; 0 disables sharding
    /// and loads everything.
    pub partial_load_num_parts: u64,
    /// 1-based index of the shard this instance loads. Ignored when
    /// `partial_load_num_parts` is 0.
    pub partial_load_part: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            partial_load_num_parts: 0,
            partial_load_part: 0,
        }
    }
}

impl LoaderConfig {
    /// Loads the whole edge stream, no sharding.
    pub fn whole() -> Self {
        Self::default()
    }

    /// Loads shard `part` (1-based) of `num_parts`.
    pub fn shard(num_parts: u64, part: u64) -> Self {
        Self {
            partial_load_num_parts: num_parts,
            partial_load_part: part,
        }
    }

    /// True if a partial (sharded) load was requested.
    pub fn is_sharded(&self) -> bool {
        self.partial_load_num_parts != 0
    }
}

//! Storage configuration shared by the engines

/// Tuning knobs applied when an engine is created
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StorageConfig {
    /// Expected number of stored entries
    pub reserve_hint: usize,
    /// Base of the indices stored by the compressed and coordinate engines, 0 or 1
    pub index_base: usize,
    /// Coordinate compactions at or above this size sort in parallel
    pub parallel_sort_threshold: usize,
}

impl StorageConfig {
    /// Create config with a reserve hint
    pub fn with_reserve_hint(reserve_hint: usize) -> Self {
        Self {
            reserve_hint,
            ..Self::default()
        }
    }

    /// Set the index base of compressed and coordinate storage
    ///
    /// Only 0 and 1 are meaningful; anything else is clamped to 1.
    pub fn with_index_base(mut self, index_base: usize) -> Self {
        self.index_base = index_base.min(1);
        self
    }

    /// Set the parallel sort threshold of coordinate storage
    pub fn with_parallel_sort_threshold(mut self, threshold: usize) -> Self {
        self.parallel_sort_threshold = threshold;
        self
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            reserve_hint: 0,
            index_base: 0,
            parallel_sort_threshold: 1 << 16, // 64K entries
        }
    }
}

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::processing::binning::Schedule;
use crate::error::Result;
use crate::types::ParallelStrategy;

/// Histogram parameters suitable for config files and CLI presets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramParams {
    /// Number of band slots; 0 means the first cube's band count
    pub width: usize,
    /// Number of difference bins per band slot
    pub nbins: usize,
    pub strategy: ParallelStrategy,
    /// Elements per shard when `strategy` is sharded
    pub shard_len: usize,
}

impl Default for HistogramParams {
    fn default() -> Self {
        Self {
            width: 0,
            nbins: 200,
            strategy: ParallelStrategy::Sequential,
            shard_len: 1 << 20,
        }
    }
}

impl HistogramParams {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn schedule(&self) -> Schedule {
        match self.strategy {
            ParallelStrategy::Sequential => Schedule::sequential(),
            ParallelStrategy::Sharded => Schedule::sharded(self.shard_len),
        }
    }

    /// Width to use for a first cube with `bands` bands
    pub fn resolve_width(&self, bands: usize) -> usize {
        if self.width == 0 { bands } else { self.width }
    }
}

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::api::CubeComparison;
use crate::core::cube::CubeSummary;
use crate::error::Result;

/// JSON document describing one cube comparison
#[derive(Debug, Clone, Serialize)]
pub struct HistogramReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub first: &'a CubeSummary,
    pub second: &'a CubeSummary,
    pub width: usize,
    pub nbins: usize,
    pub elements: usize,
    /// One row of `nbins` counts per band slot
    pub counts: Vec<Vec<u64>>,
    /// Per band slot count of differences equal to `nbins`
    pub edge_counts: Vec<u64>,
    pub max_value: Vec<i64>,
    pub max_diff: Vec<i64>,
}

impl<'a> HistogramReport<'a> {
    pub fn new(comparison: &'a CubeComparison) -> Self {
        let hist = &comparison.histogram;
        HistogramReport {
            generated_at: Utc::now(),
            first: &comparison.first,
            second: &comparison.second,
            width: hist.width(),
            nbins: hist.nbins(),
            elements: hist.elements(),
            counts: hist.bins().rows().into_iter().map(|r| r.to_vec()).collect(),
            edge_counts: hist.edge_counts().to_vec(),
            max_value: hist.max_value().to_vec(),
            max_diff: hist.max_diff().to_vec(),
        }
    }
}

pub fn report_json(comparison: &CubeComparison) -> Result<String> {
    Ok(serde_json::to_string_pretty(&HistogramReport::new(comparison))?)
}

/// Write the comparison report as pretty JSON
pub fn write_report(output_path: &Path, comparison: &CubeComparison) -> Result<()> {
    std::fs::write(output_path, report_json(comparison)?)?;
    info!("Created histogram report: {:?}", output_path);
    Ok(())
}

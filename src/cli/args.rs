use clap::Parser;
use std::path::PathBuf;

use cubediff::ParallelStrategy;

#[derive(Parser)]
#[command(name = "cubediff", version, about = "Difference histograms of two hyperspectral cubes")]
pub struct CliArgs {
    /// First cube: ENVI header or data file
    #[arg(short = 'a', long)]
    pub first: Option<PathBuf>,

    /// Second cube: ENVI header or data file
    #[arg(short = 'b', long)]
    pub second: Option<PathBuf>,

    /// JSON file with histogram parameters (width, nbins, strategy, shard_len)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of band slots (default: band count of the first cube)
    #[arg(long)]
    pub width: Option<usize>,

    /// Number of difference bins per band slot
    #[arg(long)]
    pub nbins: Option<usize>,

    /// Scheduling of the binning pass (sequential or sharded)
    #[arg(long, value_enum)]
    pub parallel: Option<ParallelStrategy>,

    /// Elements per shard for the sharded schedule
    #[arg(long)]
    pub shard_len: Option<usize>,

    /// Write the full histogram as a JSON report to this path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,
}

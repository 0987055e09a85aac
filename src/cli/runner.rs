use tracing::info;
use tracing_subscriber::EnvFilter;

use cubediff::{CubeComparison, HistogramParams, difference_envi_files, write_report};

use super::args::CliArgs;
use super::errors::AppError;

fn resolve_params(args: &CliArgs) -> Result<HistogramParams, AppError> {
    let mut params = match &args.config {
        Some(path) => HistogramParams::from_json_file(path)?,
        None => HistogramParams::default(),
    };
    if let Some(width) = args.width {
        if width == 0 {
            return Err(AppError::ZeroValue {
                arg: "--width".to_string(),
            });
        }
        params.width = width;
    }
    if let Some(nbins) = args.nbins {
        params.nbins = nbins;
    }
    if let Some(strategy) = args.parallel {
        params.strategy = strategy;
    }
    if let Some(shard_len) = args.shard_len {
        params.shard_len = shard_len;
    }
    if params.nbins == 0 {
        return Err(AppError::ZeroValue {
            arg: "--nbins".to_string(),
        });
    }
    if params.shard_len == 0 {
        return Err(AppError::ZeroValue {
            arg: "--shard-len".to_string(),
        });
    }
    Ok(params)
}

fn print_summary(comparison: &CubeComparison) {
    let hist = &comparison.histogram;
    println!(
        "{} elements, {} band slots x {} bins",
        hist.elements(),
        hist.width(),
        hist.nbins()
    );
    println!("{:>6} {:>10} {:>8} {:>12} {:>12}", "slot", "count", "edge", "max_value", "max_diff");
    for (slot, row) in hist.counts().rows().into_iter().enumerate() {
        println!(
            "{:>6} {:>10} {:>8} {:>12} {:>12}",
            slot,
            row.sum(),
            hist.edge_counts()[slot],
            hist.max_value()[slot],
            hist.max_diff()[slot]
        );
    }
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let first = args.first.clone().ok_or(AppError::MissingArgument {
        arg: "--first".to_string(),
    })?;
    let second = args.second.clone().ok_or(AppError::MissingArgument {
        arg: "--second".to_string(),
    })?;
    let params = resolve_params(&args)?;

    info!("Comparing {:?} against {:?}", first, second);
    let comparison = difference_envi_files(&first, &second, &params).map_err(AppError::from)?;

    match &args.output {
        Some(output) => {
            write_report(output, &comparison).map_err(AppError::from)?;
            info!("Successfully processed: {:?} -> {:?}", first, output);
        }
        None => print_summary(&comparison),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use cubediff::ParallelStrategy;

    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = CliArgs::parse_from([
            "cubediff", "-a", "a.hdr", "-b", "b.hdr", "--nbins", "32", "--parallel", "sharded",
        ]);
        let params = resolve_params(&args).unwrap();
        assert_eq!(params.nbins, 32);
        assert_eq!(params.width, 0);
        assert_eq!(params.strategy, ParallelStrategy::Sharded);
    }

    #[test]
    fn zero_nbins_is_rejected() {
        let args = CliArgs::parse_from(["cubediff", "--nbins", "0"]);
        assert!(matches!(
            resolve_params(&args),
            Err(AppError::ZeroValue { .. })
        ));
    }
}

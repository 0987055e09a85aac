#![doc = r#"
cubediff — per-band difference histograms between two hyperspectral data cubes.

Given two cubes of the same shape (samples x lines x bands), cubediff scales
every sample onto a common 0 - 10000 range, takes the absolute difference of
corresponding samples and counts it into a band-slot x bin histogram. It also
keeps per-slot maxima of sample magnitude and difference magnitude. The cubes
may be stored in any of the three ENVI interleaves (BIP, BIL, BSQ), and the two
need not share one.

Quick start: difference two in-memory cubes
-------------------------------------------
```rust
use cubediff::{Cube, Histogram, Interleave, Shape, compute_cube_histogram};

fn main() -> cubediff::Result<()> {
    let shape = Shape::new(2, 1, 2);
    // same logical cube stored two ways
    let bip = Cube::new(Interleave::Bip, shape, vec![0i16, 1, 10, 11])?;
    let bsq = Cube::new(Interleave::Bsq, shape, vec![0i16, 10, 1, 11])?;

    let mut hist = Histogram::new(2, 100)?;
    let n = compute_cube_histogram(&bip, &bsq, &mut hist)?;
    assert_eq!(n, 4);
    assert_eq!(hist.counts().column(0).sum(), 4);
    Ok(())
}
```

Compare two ENVI cubes on disk
------------------------------
```rust,no_run
use std::path::Path;
use cubediff::{HistogramParams, difference_envi_files, write_report};

fn main() -> cubediff::Result<()> {
    let params = HistogramParams { nbins: 256, ..Default::default() };
    let comparison = difference_envi_files(
        Path::new("/data/before.hdr"),
        Path::new("/data/after.hdr"),
        &params,
    )?;
    write_report(Path::new("/out/diff.json"), &comparison)
}
```

Accumulation rules
------------------
- Each cube's samples are multiplied by `10000 / scale_factor`.
- `bin = trunc(|a - b|)`; values strictly above `nbins` clamp to `nbins - 1`,
  a value of exactly `nbins` is counted in a separate edge column.
- Band slots advance round-robin every `band_boundary` elements (taken from the
  first cube) and wrap at the histogram width.
- Two `i16` cubes in the same interleave use an integer path that also records
  the maxima; every other combination uses a floating-point path that leaves
  them at zero.

Useful modules
--------------
- [`api`] — high-level entry points.
- [`core`] — cube/histogram collaborators and the processing primitives.
- [`io`] — ENVI reader/writer and JSON reports.
- [`types`] — shared enums (`Interleave`, `ElementType`, `ParallelStrategy`).
- [`error`] — crate-level `Error` and `Result`.
"#]

pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
// Types
pub use crate::core::cube::{Cube, CubeData, CubeSource, CubeSummary, FlatView};
pub use crate::core::histogram::{DiffHistogram, Histogram, HistogramTarget};
pub use crate::core::params::HistogramParams;
pub use crate::core::processing::binning::Schedule;
pub use crate::core::processing::layout::Location;
pub use error::{Error, Result};
pub use types::{ElementType, Interleave, ParallelStrategy, Shape};

// Readers and writers
pub use io::envi::{EnviError, EnviHeader, read_envi, write_envi};
pub use io::writers::report::{HistogramReport, report_json, write_report};

// High-level API re-exports
pub use api::{
    CubeComparison, compare_cubes, compute_cube_histogram, compute_cube_histogram_with,
    difference_envi_files, difference_histogram,
};

//! High-level library API: difference two cubes into an owned histogram, commit
//! into caller-owned histogram storage, or compare two ENVI cubes on disk.
//! Prefer these entrypoints over the low-level processing modules.
use std::path::Path;

use tracing::{debug, info};

use crate::core::cube::{Cube, CubeSource, CubeSummary};
use crate::core::histogram::{DiffHistogram, HistogramTarget};
use crate::core::params::HistogramParams;
use crate::core::processing::binning::{BinningConfig, Schedule};
use crate::core::processing::dispatch::{
    BinningPath, LayoutPair, bin_cross_layout, bin_same_layout, select_path,
};
use crate::error::{Error, Result};
use crate::io::envi::read_envi;
use crate::types::Interleave;

/// Numerator applied to each cube's stored scale factor: samples are brought
/// onto a 0 - 10000 range before differencing.
pub const REFLECTANCE_RANGE: f64 = 10000.0;

/// Two cubes and the histogram of their differences
#[derive(Debug, Clone)]
pub struct CubeComparison {
    pub first: CubeSummary,
    pub second: CubeSummary,
    pub histogram: DiffHistogram,
}

fn multiplier(raw: f64, arg: &'static str) -> Result<f64> {
    if !raw.is_finite() || raw <= 0.0 {
        return Err(Error::invalid(arg, raw));
    }
    Ok(REFLECTANCE_RANGE / raw)
}

/// Difference `second` from `first` into a fresh histogram of `width` band
/// slots and `nbins` bins.
///
/// Nothing is accumulated until every attribute has been read and validated:
/// identical shapes, flat views matching those shapes, recognized interleave
/// tags, positive scale factors and a non-zero band boundary. A cube with no
/// elements needs no band boundary and yields an empty histogram.
pub fn difference_histogram<A, B>(
    first: &A,
    second: &B,
    width: usize,
    nbins: usize,
    schedule: Schedule,
) -> Result<DiffHistogram>
where
    A: CubeSource + ?Sized,
    B: CubeSource + ?Sized,
{
    let one = first.flat_view()?;
    let two = second.flat_view()?;

    let shape = first.shape()?;
    let other = second.shape()?;
    if shape != other {
        return Err(Error::ShapeMismatch {
            first: shape,
            second: other,
        });
    }
    let len = shape.checked_len().ok_or(Error::ShapeTooLarge(shape))?;
    for view in [&one, &two] {
        if view.len() != len {
            return Err(Error::DataLength {
                expected: len,
                actual: view.len(),
            });
        }
    }

    if width == 0 {
        return Err(Error::invalid("width", width));
    }
    if nbins == 0 {
        return Err(Error::invalid("nbins", nbins));
    }
    info!("Histogram: width={} nbins={}", width, nbins);

    let from: Interleave = first.interleave()?.parse()?;
    let to: Interleave = second.interleave()?.parse()?;

    let scales = (
        multiplier(first.scale_factor()?, "scale_factor")?,
        multiplier(second.scale_factor()?, "scale_factor")?,
    );

    let band_boundary = first.band_boundary()?;
    if band_boundary == 0 && len > 0 {
        return Err(Error::invalid("band_boundary", band_boundary));
    }

    let config = BinningConfig {
        width,
        nbins,
        band_boundary: band_boundary.max(1),
    };
    let path = if from == to {
        select_path(one.element_type(), two.element_type())
    } else {
        BinningPath::CrossLayout
    };
    info!(
        "Differencing {} ({}) against {} ({}): {} elements, band boundary={}, path={}, schedule={}",
        from,
        one.element_type(),
        to,
        two.element_type(),
        len,
        band_boundary,
        path,
        schedule.strategy
    );
    debug!("Scale multipliers: {} / {}", scales.0, scales.1);

    let histogram = match path {
        BinningPath::FixedPoint | BinningPath::Generic => {
            bin_same_layout(one, two, scales, config, schedule)?
        }
        BinningPath::CrossLayout => {
            let layouts = LayoutPair { from, to, shape };
            bin_cross_layout(one, two, layouts, scales, config, schedule)
        }
    };

    info!("Processed {} elements", histogram.elements());
    Ok(histogram)
}

/// Difference two cubes into caller-owned histogram storage.
///
/// Width and bin count are read from `hist`; its contents are replaced only
/// when the whole pass succeeds. Returns the number of elements processed.
pub fn compute_cube_histogram<A, B, H>(first: &A, second: &B, hist: &mut H) -> Result<usize>
where
    A: CubeSource + ?Sized,
    B: CubeSource + ?Sized,
    H: HistogramTarget + ?Sized,
{
    compute_cube_histogram_with(first, second, hist, Schedule::sequential())
}

/// [`compute_cube_histogram`] with an explicit schedule
pub fn compute_cube_histogram_with<A, B, H>(
    first: &A,
    second: &B,
    hist: &mut H,
    schedule: Schedule,
) -> Result<usize>
where
    A: CubeSource + ?Sized,
    B: CubeSource + ?Sized,
    H: HistogramTarget + ?Sized,
{
    let width = hist.width()?;
    let nbins = hist.nbins()?;
    let result = difference_histogram(first, second, width, nbins, schedule)?;
    let count = result.elements();
    hist.commit(result);
    Ok(count)
}

/// Difference two in-memory cubes using `params`, keeping both descriptions
pub fn compare_cubes(
    first: &Cube,
    second: &Cube,
    params: &HistogramParams,
) -> Result<CubeComparison> {
    let width = params.resolve_width(first.shape.bands);
    let histogram = difference_histogram(first, second, width, params.nbins, params.schedule())?;
    Ok(CubeComparison {
        first: first.summary(),
        second: second.summary(),
        histogram,
    })
}

/// Load two ENVI cubes (header or data path) and difference them
pub fn difference_envi_files(
    first: &Path,
    second: &Path,
    params: &HistogramParams,
) -> Result<CubeComparison> {
    let one = read_envi(first)?;
    let two = read_envi(second)?;
    compare_cubes(&one, &two, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cube::FlatView;
    use crate::core::histogram::Histogram;
    use crate::types::Shape;

    /// Cube adapter with loosely typed attributes
    struct LooseCube {
        interleave: Option<String>,
        scale: Option<f64>,
        data: Vec<i16>,
    }

    impl CubeSource for LooseCube {
        fn shape(&self) -> Result<Shape> {
            Ok(Shape::new(self.data.len(), 1, 1))
        }

        fn interleave(&self) -> Result<&str> {
            self.interleave
                .as_deref()
                .ok_or(Error::MissingAttribute("interleave"))
        }

        fn scale_factor(&self) -> Result<f64> {
            self.scale.ok_or(Error::MissingAttribute("scale_factor"))
        }

        fn band_boundary(&self) -> Result<usize> {
            Ok(1)
        }

        fn flat_view(&self) -> Result<FlatView<'_>> {
            Ok(FlatView::from(&self.data[..]))
        }
    }

    fn loose(interleave: Option<&str>, scale: Option<f64>) -> LooseCube {
        LooseCube {
            interleave: interleave.map(str::to_string),
            scale,
            data: vec![1, 2, 3],
        }
    }

    #[test]
    fn missing_attribute_is_reported() {
        let good = loose(Some("bip"), Some(10000.0));
        let bad = loose(Some("bip"), None);
        let err = difference_histogram(&good, &bad, 1, 8, Schedule::sequential()).unwrap_err();
        assert!(matches!(err, Error::MissingAttribute("scale_factor")));

        let bad = loose(None, Some(10000.0));
        let err = difference_histogram(&bad, &good, 1, 8, Schedule::sequential()).unwrap_err();
        assert!(matches!(err, Error::MissingAttribute("interleave")));
    }

    #[test]
    fn unrecognized_interleave_leaves_histogram_untouched() {
        let good = loose(Some("bip"), Some(10000.0));
        let bad = loose(Some("tiled"), Some(10000.0));
        let mut hist = Histogram::new(1, 8).unwrap();
        let err = compute_cube_histogram(&good, &bad, &mut hist).unwrap_err();
        assert!(matches!(err, Error::UnrecognizedInterleave(ref tag) if tag == "tiled"));
        assert_eq!(hist.counts().sum(), 0);
    }

    #[test]
    fn uppercase_tags_are_the_same_layout() {
        let one = loose(Some("BIP"), Some(10000.0));
        let two = loose(Some("bip"), Some(10000.0));
        let mut hist = Histogram::new(1, 8).unwrap();
        let n = compute_cube_histogram(&one, &two, &mut hist).unwrap();
        assert_eq!(n, 3);
        assert_eq!(hist.counts()[[0, 0]], 3);
        // same i16 layout takes the fixed-point path
        assert_eq!(hist.max_value()[0], 3);
    }

    #[test]
    fn non_positive_scale_is_rejected() {
        let one = loose(Some("bip"), Some(0.0));
        let two = loose(Some("bip"), Some(10000.0));
        let err = difference_histogram(&one, &two, 1, 8, Schedule::sequential()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { arg: "scale_factor", .. }));
    }

    #[test]
    fn zero_band_boundary_is_rejected() {
        let shape = Shape::new(2, 2, 2);
        let one = Cube::new(Interleave::Bsq, shape, vec![0i16; 8])
            .unwrap()
            .with_band_boundary(0);
        let two = Cube::new(Interleave::Bsq, shape, vec![0i16; 8]).unwrap();
        let err = difference_histogram(&one, &two, 2, 8, Schedule::sequential()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { arg: "band_boundary", .. }));
    }

    #[test]
    fn tiny_scale_on_fixed_point_path_is_rejected() {
        let shape = Shape::new(2, 1, 1);
        let one = Cube::new(Interleave::Bip, shape, vec![2i16, 1])
            .unwrap()
            .with_scale_factor(1e-300);
        let two = Cube::new(Interleave::Bip, shape, vec![0i16, 0])
            .unwrap()
            .with_scale_factor(1e-300);
        let err = difference_histogram(&one, &two, 1, 8, Schedule::sequential()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { arg: "scale_multiplier", .. }));

        let mut hist = Histogram::new(1, 8).unwrap();
        assert!(compute_cube_histogram(&one, &two, &mut hist).is_err());
        assert_eq!(hist.counts().sum(), 0);
    }

    #[test]
    fn empty_cube_yields_empty_histogram() {
        let shape = Shape::new(0, 3, 2);
        for layout in [Interleave::Bip, Interleave::Bil, Interleave::Bsq] {
            let one = Cube::new(layout, shape, Vec::<i16>::new()).unwrap();
            let two = Cube::new(Interleave::Bsq, shape, Vec::<f32>::new()).unwrap();
            let mut hist = Histogram::new(2, 8).unwrap();
            let n = compute_cube_histogram(&one, &two, &mut hist).unwrap();
            assert_eq!(n, 0);
            assert_eq!(hist.counts().sum(), 0);
        }
    }
}

//! Element type dispatch: pick a statically specialized binning loop once per
//! call from the declared element types of both flat views.
use tracing::debug;

use crate::core::cube::FlatView;
use crate::core::histogram::DiffHistogram;
use crate::core::processing::binning::{
    BinningConfig, Sample, Schedule, accumulate_generic, accumulate_i16,
};
use crate::error::{Error, Result};
use crate::types::{ElementType, Interleave, Shape};

/// Largest integer multiplier the fixed-point path accepts. Any `i16` sample
/// times this, and the difference of two such products, fits in `i64`.
pub const MAX_FIXED_POINT_SCALE: i64 = i64::MAX / (1 << 16);

/// Storage orders of the two views and the logical shape they share
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct LayoutPair {
    pub from: Interleave,
    pub to: Interleave,
    pub shape: Shape,
}

/// Inner loop selected for a pass
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum BinningPath {
    /// Both views are `i16` in the same layout: integer arithmetic, extrema tracked
    FixedPoint,
    /// Same layout, any other type combination: floating point, no extrema
    Generic,
    /// Layouts differ: floating point through the coordinate mapper, no extrema
    CrossLayout,
}

impl std::fmt::Display for BinningPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinningPath::FixedPoint => write!(f, "FixedPoint"),
            BinningPath::Generic => write!(f, "Generic"),
            BinningPath::CrossLayout => write!(f, "CrossLayout"),
        }
    }
}

/// Path for two views stored in the same layout
pub fn select_path(one: ElementType, two: ElementType) -> BinningPath {
    if one == two && one == ElementType::I16 {
        BinningPath::FixedPoint
    } else {
        BinningPath::Generic
    }
}

/// Expands `$body` once per `FlatView` variant with `$slice` bound to the typed slice
macro_rules! with_slice {
    ($view:expr, $slice:ident => $body:expr) => {
        match $view {
            FlatView::U8($slice) => $body,
            FlatView::I16($slice) => $body,
            FlatView::I32($slice) => $body,
            FlatView::F32($slice) => $body,
            FlatView::F64($slice) => $body,
            FlatView::U16($slice) => $body,
            FlatView::U32($slice) => $body,
            FlatView::I64($slice) => $body,
            FlatView::U64($slice) => $body,
        }
    };
}

/// Truncate a scale multiplier for the fixed-point path
fn fixed_point_scale(multiplier: f64) -> Result<i64> {
    let scale = multiplier as i64;
    if scale > MAX_FIXED_POINT_SCALE {
        return Err(Error::invalid("scale_multiplier", multiplier));
    }
    Ok(scale)
}

/// Difference two views that share an interleave.
///
/// Callers guarantee both views hold at least `one.len()` elements. Fails
/// only when two `i16` views carry a multiplier above [`MAX_FIXED_POINT_SCALE`].
pub fn bin_same_layout(
    one: FlatView<'_>,
    two: FlatView<'_>,
    scales: (f64, f64),
    config: BinningConfig,
    schedule: Schedule,
) -> Result<DiffHistogram> {
    let len = one.len();
    match (one, two) {
        (FlatView::I16(a), FlatView::I16(b)) => {
            let scales = (fixed_point_scale(scales.0)?, fixed_point_scale(scales.1)?);
            debug!("Using fixed-point path");
            Ok(schedule.run(len, config, |range| {
                accumulate_i16(a, b, scales, config, range)
            }))
        }
        _ => {
            debug!("Using generic path");
            Ok(with_slice!(one, a => with_slice!(two, b => {
                generic(a, b, |i| i, scales, config, schedule)
            })))
        }
    }
}

/// Difference two views stored under different interleaves. Element `i` of
/// `one` is paired with the element of `two` at the same (sample, line, band).
pub fn bin_cross_layout(
    one: FlatView<'_>,
    two: FlatView<'_>,
    layouts: LayoutPair,
    scales: (f64, f64),
    config: BinningConfig,
    schedule: Schedule,
) -> DiffHistogram {
    let LayoutPair { from, to, shape } = layouts;
    debug!("Using cross-layout path: {} -> {}", from, to);
    let map = move |i: usize| from.remap(to, i, shape);
    with_slice!(one, a => with_slice!(two, b => {
        generic(a, b, map, scales, config, schedule)
    }))
}

fn generic<A, B, M>(
    one: &[A],
    two: &[B],
    map: M,
    scales: (f64, f64),
    config: BinningConfig,
    schedule: Schedule,
) -> DiffHistogram
where
    A: Sample,
    B: Sample,
    M: Fn(usize) -> usize + Sync,
{
    schedule.run(one.len(), config, |range| {
        accumulate_generic(one, two, &map, scales, config, range)
    })
}

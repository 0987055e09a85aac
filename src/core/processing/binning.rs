//! Binning engine: one pass over two flat sequences, accumulating the truncated
//! absolute scaled difference of corresponding elements per band slot.
//!
//! Band slots are assigned round-robin by element count, not by the spectral
//! band coordinate: every `band_boundary` consecutive elements share a slot,
//! after which the slot advances and wraps at `width`. For the natural band
//! boundary of a BSQ or BIL cube this lines up with the true band; for other
//! layouts or boundaries it does not, and that is the accumulation policy.
use std::ops::Range;

use rayon::prelude::*;

use crate::core::histogram::DiffHistogram;
use crate::types::ParallelStrategy;

/// Dimensions of one binning pass
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct BinningConfig {
    pub width: usize,
    pub nbins: usize,
    pub band_boundary: usize,
}

/// Round-robin band slot counter
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct BandCursor {
    slot: usize,
    count: usize,
    boundary: usize,
    width: usize,
}

impl BandCursor {
    /// Cursor state just before processing global element `pos`
    pub fn at(pos: usize, boundary: usize, width: usize) -> Self {
        Self {
            slot: (pos / boundary) % width,
            count: pos % boundary,
            boundary,
            width,
        }
    }

    #[inline]
    pub fn slot(&self) -> usize {
        self.slot
    }

    #[inline]
    pub fn advance(&mut self) {
        self.count += 1;
        if self.count >= self.boundary {
            self.count = 0;
            self.slot += 1;
            if self.slot >= self.width {
                self.slot = 0;
            }
        }
    }
}

/// Map a raw difference magnitude to a bin index.
///
/// Only values strictly greater than `nbins` are clamped (to `nbins - 1`); a
/// value of exactly `nbins` is kept and lands in the edge column.
#[inline]
pub fn clamp_bin(bin: i64, nbins: usize) -> usize {
    if bin > nbins as i64 {
        nbins - 1
    } else {
        bin as usize
    }
}

/// Numeric element readable as floating point by the generic path
pub trait Sample: Copy + Send + Sync {
    fn to_f64(self) -> f64;
}

macro_rules! impl_sample {
    ($($ty:ty),*) => {
        $(
            impl Sample for $ty {
                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_sample!(u8, i16, i32, f32, f64, u16, u32, i64, u64);

/// Fixed-point pass over two same-layout `i16` sequences.
///
/// Values are multiplied by the integer-truncated scale factors. `max_diff`
/// tracks the raw difference before clamping and `max_value` the larger raw
/// scaled magnitude of the pair. Both scales must be at most
/// `MAX_FIXED_POINT_SCALE` so the products stay within `i64`.
pub fn accumulate_i16(
    one: &[i16],
    two: &[i16],
    scales: (i64, i64),
    config: BinningConfig,
    range: Range<usize>,
) -> DiffHistogram {
    let mut hist = DiffHistogram::new(config.width, config.nbins);
    let mut cursor = BandCursor::at(range.start, config.band_boundary, config.width);
    let (s1, s2) = scales;

    for i in range {
        let band = cursor.slot();
        let val1 = one[i] as i64 * s1;
        let val2 = two[i] as i64 * s2;

        let max_value = hist.max_value_mut(band);
        if val1.abs() > val2.abs() && val1.abs() > *max_value {
            *max_value = val1.abs();
        } else if val2.abs() > *max_value {
            *max_value = val2.abs();
        }

        let diff = (val1 - val2).abs();
        hist.observe_diff(band, diff);
        hist.record(band, clamp_bin(diff, config.nbins));
        cursor.advance();
    }
    hist
}

/// Floating-point pass. Element `i` of `one` is compared with element
/// `map(i)` of `two`. This path leaves `max_value` and `max_diff` at zero.
pub fn accumulate_generic<A, B, M>(
    one: &[A],
    two: &[B],
    map: M,
    scales: (f64, f64),
    config: BinningConfig,
    range: Range<usize>,
) -> DiffHistogram
where
    A: Sample,
    B: Sample,
    M: Fn(usize) -> usize,
{
    let mut hist = DiffHistogram::new(config.width, config.nbins);
    let mut cursor = BandCursor::at(range.start, config.band_boundary, config.width);
    let (s1, s2) = scales;

    for i in range {
        let val1 = one[i].to_f64() * s1;
        let val2 = two[map(i)].to_f64() * s2;
        let bin = (val1 - val2).abs().trunc() as i64;
        hist.record(cursor.slot(), clamp_bin(bin, config.nbins));
        cursor.advance();
    }
    hist
}

/// How a pass over `0..len` is split up
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Schedule {
    pub strategy: ParallelStrategy,
    pub shard_len: usize,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            strategy: ParallelStrategy::Sequential,
            shard_len: 1 << 20,
        }
    }
}

impl Schedule {
    pub fn sequential() -> Self {
        Self::default()
    }

    pub fn sharded(shard_len: usize) -> Self {
        Self {
            strategy: ParallelStrategy::Sharded,
            shard_len: shard_len.max(1),
        }
    }

    /// Run `pass` over the whole range. Sharded runs seed each shard's band
    /// slot from its global start, so the merged result equals the serial one.
    pub fn run<F>(&self, len: usize, config: BinningConfig, pass: F) -> DiffHistogram
    where
        F: Fn(Range<usize>) -> DiffHistogram + Sync,
    {
        match self.strategy {
            ParallelStrategy::Sequential => pass(0..len),
            ParallelStrategy::Sharded => {
                let shard_len = self.shard_len.max(1);
                let shards = len.div_ceil(shard_len);
                (0..shards)
                    .into_par_iter()
                    .map(|s| pass(s * shard_len..((s + 1) * shard_len).min(len)))
                    .reduce(
                        || DiffHistogram::new(config.width, config.nbins),
                        |mut acc, part| {
                            acc.merge(&part);
                            acc
                        },
                    )
            }
        }
    }
}

//! Histogram accumulator and the `HistogramTarget` collaborator contract.
//!
//! A `DiffHistogram` is a band-slot x bin occurrence table plus per-slot running
//! maxima of sample magnitude and difference magnitude. The table carries one
//! column past `nbins`: a difference of exactly `nbins` is not clamped by the
//! binning rule and lands there (see [`DiffHistogram::edge_counts`]).
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Zip, s};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct DiffHistogram {
    counts: Array2<u64>,
    max_value: Array1<i64>,
    max_diff: Array1<i64>,
    elements: usize,
}

impl DiffHistogram {
    /// Zeroed accumulator for `width` band slots and `nbins` bins
    pub fn new(width: usize, nbins: usize) -> Self {
        Self {
            counts: Array2::zeros((width, nbins + 1)),
            max_value: Array1::zeros(width),
            max_diff: Array1::zeros(width),
            elements: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.counts.nrows()
    }

    pub fn nbins(&self) -> usize {
        self.counts.ncols() - 1
    }

    /// Counts for bins `0..nbins`
    pub fn bins(&self) -> ArrayView2<'_, u64> {
        self.counts.slice(s![.., ..self.nbins()])
    }

    /// Counts of differences equal to `nbins` exactly, one per band slot
    pub fn edge_counts(&self) -> ArrayView1<'_, u64> {
        self.counts.column(self.nbins())
    }

    /// Full table including the edge column
    pub fn counts(&self) -> ArrayView2<'_, u64> {
        self.counts.view()
    }

    pub fn max_value(&self) -> ArrayView1<'_, i64> {
        self.max_value.view()
    }

    pub fn max_diff(&self) -> ArrayView1<'_, i64> {
        self.max_diff.view()
    }

    /// Elements processed to build this histogram
    pub fn elements(&self) -> usize {
        self.elements
    }

    /// Sum over every cell, edge column included
    pub fn total(&self) -> u64 {
        self.counts.sum()
    }

    #[inline]
    pub(crate) fn record(&mut self, slot: usize, bin: usize) {
        self.counts[[slot, bin]] += 1;
        self.elements += 1;
    }

    #[inline]
    pub(crate) fn max_value_mut(&mut self, slot: usize) -> &mut i64 {
        &mut self.max_value[slot]
    }

    #[inline]
    pub(crate) fn observe_diff(&mut self, slot: usize, diff: i64) {
        if diff > self.max_diff[slot] {
            self.max_diff[slot] = diff;
        }
    }

    /// Fold another partial histogram of the same dimensions into this one
    pub(crate) fn merge(&mut self, other: &DiffHistogram) {
        self.counts += &other.counts;
        Zip::from(&mut self.max_value)
            .and(&other.max_value)
            .for_each(|a, &b| *a = (*a).max(b));
        Zip::from(&mut self.max_diff)
            .and(&other.max_diff)
            .for_each(|a, &b| *a = (*a).max(b));
        self.elements += other.elements;
    }
}

/// Destination the orchestrator reads its dimensions from and commits into.
pub trait HistogramTarget {
    /// Number of band slots
    fn width(&self) -> Result<usize>;

    fn nbins(&self) -> Result<usize>;

    /// Replace the stored accumulator and extrema with a finished result
    fn commit(&mut self, result: DiffHistogram);
}

/// Caller-owned histogram storage
#[derive(Debug, Clone)]
pub struct Histogram {
    data: DiffHistogram,
}

impl Histogram {
    pub fn new(width: usize, nbins: usize) -> Result<Self> {
        if width == 0 {
            return Err(Error::invalid("width", width));
        }
        if nbins == 0 {
            return Err(Error::invalid("nbins", nbins));
        }
        Ok(Self {
            data: DiffHistogram::new(width, nbins),
        })
    }

    /// The `width x nbins` count table. Differences equal to `nbins` are
    /// kept out of it and reported by [`Histogram::edge_counts`].
    pub fn counts(&self) -> ArrayView2<'_, u64> {
        self.data.bins()
    }

    /// Per band slot count of differences equal to `nbins`
    pub fn edge_counts(&self) -> ArrayView1<'_, u64> {
        self.data.edge_counts()
    }

    pub fn max_value(&self) -> ArrayView1<'_, i64> {
        self.data.max_value()
    }

    pub fn max_diff(&self) -> ArrayView1<'_, i64> {
        self.data.max_diff()
    }

    pub fn result(&self) -> &DiffHistogram {
        &self.data
    }

    pub fn into_result(self) -> DiffHistogram {
        self.data
    }
}

impl HistogramTarget for Histogram {
    fn width(&self) -> Result<usize> {
        Ok(self.data.width())
    }

    fn nbins(&self) -> Result<usize> {
        Ok(self.data.nbins())
    }

    fn commit(&mut self, result: DiffHistogram) {
        self.data = result;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_column_is_separate_from_bins() {
        let mut h = DiffHistogram::new(2, 4);
        h.record(0, 0);
        h.record(0, 3);
        h.record(1, 4);
        assert_eq!(h.bins().dim(), (2, 4));
        assert_eq!(h.bins()[[0, 3]], 1);
        assert_eq!(h.edge_counts().to_vec(), vec![0, 1]);
        assert_eq!(h.total(), 3);
        assert_eq!(h.elements(), 3);
    }

    #[test]
    fn merge_sums_counts_and_keeps_maxima() {
        let mut a = DiffHistogram::new(2, 3);
        a.record(0, 1);
        a.observe_diff(0, 7);
        *a.max_value_mut(1) = 40;

        let mut b = DiffHistogram::new(2, 3);
        b.record(0, 1);
        b.record(1, 2);
        b.observe_diff(0, 5);
        b.observe_diff(1, 9);
        *b.max_value_mut(1) = 10;

        a.merge(&b);
        assert_eq!(a.counts()[[0, 1]], 2);
        assert_eq!(a.counts()[[1, 2]], 1);
        assert_eq!(a.max_diff().to_vec(), vec![7, 9]);
        assert_eq!(a.max_value().to_vec(), vec![0, 40]);
        assert_eq!(a.elements(), 3);
    }

    #[test]
    fn histogram_rejects_zero_dimensions() {
        assert!(Histogram::new(0, 10).is_err());
        assert!(Histogram::new(3, 0).is_err());
        let h = Histogram::new(3, 10).unwrap();
        assert_eq!(h.width().unwrap(), 3);
        assert_eq!(h.nbins().unwrap(), 10);
        assert_eq!(h.counts().sum(), 0);
    }
}

//! Flat index <-> (sample, line, band) conversions for the three interleaves.
use crate::types::{Interleave, Shape};

/// Logical position of one element in a cube
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Location {
    pub sample: usize,
    pub line: usize,
    pub band: usize,
}

impl Interleave {
    /// Position of flat element `pos` in a cube of `shape` stored with this interleave
    #[inline]
    pub fn flat_to_location(&self, pos: usize, shape: Shape) -> Location {
        let Shape {
            samples,
            lines,
            bands,
        } = shape;
        match self {
            Interleave::Bip => {
                let rem = pos % (bands * samples);
                Location {
                    line: pos / (bands * samples),
                    sample: rem / bands,
                    band: rem % bands,
                }
            }
            Interleave::Bil => {
                let rem = pos % (bands * samples);
                Location {
                    line: pos / (bands * samples),
                    band: rem / samples,
                    sample: rem % samples,
                }
            }
            Interleave::Bsq => {
                let rem = pos % (lines * samples);
                Location {
                    band: pos / (lines * samples),
                    line: rem / samples,
                    sample: rem % samples,
                }
            }
        }
    }

    /// Flat index of `loc` in a cube of `shape` stored with this interleave
    #[inline]
    pub fn location_to_flat(&self, loc: Location, shape: Shape) -> usize {
        let Shape {
            samples,
            lines,
            bands,
        } = shape;
        match self {
            Interleave::Bip => loc.line * bands * samples + loc.sample * bands + loc.band,
            Interleave::Bil => loc.line * bands * samples + loc.band * samples + loc.sample,
            Interleave::Bsq => loc.band * lines * samples + loc.line * samples + loc.sample,
        }
    }

    /// Flat index in `to` of the element at flat index `pos` in `self`
    #[inline]
    pub fn remap(&self, to: Interleave, pos: usize, shape: Shape) -> usize {
        to.location_to_flat(self.flat_to_location(pos, shape), shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const ALL: [Interleave; 3] = [Interleave::Bip, Interleave::Bil, Interleave::Bsq];

    #[test]
    fn flat_to_location_is_a_bijection_with_inverse() {
        let shape = Shape::new(5, 4, 3);
        for layout in ALL {
            let mut seen = HashSet::new();
            for pos in 0..shape.len() {
                let loc = layout.flat_to_location(pos, shape);
                assert!(loc.sample < shape.samples);
                assert!(loc.line < shape.lines && loc.band < shape.bands);
                assert!(seen.insert(loc), "{layout}: {loc:?} visited twice");
                assert_eq!(layout.location_to_flat(loc, shape), pos);
            }
            assert_eq!(seen.len(), shape.len());
        }
    }

    #[test]
    fn known_positions() {
        let shape = Shape::new(5, 4, 3);
        let loc = Location {
            sample: 2,
            line: 1,
            band: 1,
        };
        assert_eq!(Interleave::Bip.location_to_flat(loc, shape), 15 + 6 + 1);
        assert_eq!(Interleave::Bil.location_to_flat(loc, shape), 15 + 5 + 2);
        assert_eq!(Interleave::Bsq.location_to_flat(loc, shape), 20 + 5 + 2);
    }

    #[test]
    fn remap_between_bip_and_bsq() {
        // 2 samples, 1 line, 2 bands: BIP stores s0b0 s0b1 s1b0 s1b1,
        // BSQ stores s0b0 s1b0 s0b1 s1b1
        let shape = Shape::new(2, 1, 2);
        let mapped: Vec<usize> = (0..4)
            .map(|i| Interleave::Bip.remap(Interleave::Bsq, i, shape))
            .collect();
        assert_eq!(mapped, vec![0, 2, 1, 3]);
        for i in 0..4 {
            assert_eq!(Interleave::Bip.remap(Interleave::Bip, i, shape), i);
        }
    }
}

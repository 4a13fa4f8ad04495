//! Seven-segment encoding.
//!
//! Maps a decimal digit to the set of segment lines that must be lit.
//!
//! Segment layout:
//!
//! ```text
//!    AAAA
//!   F    B
//!   F    B
//!    GGGG
//!   E    C
//!   E    C
//!    DDDD  DP
//! ```
//!
//! The table matches the board this crate was built for: `7` lights the
//! top-left bar as well (`F, A, B, C`) and `9` has no bottom bar
//! (`A, F, G, B, C`). Anything that is not a digit 0-9 shows only the
//! decimal point, which doubles as the blank/error marker.
//!
//! # Example
//!
//! ```rust
//! use rs_sevseg::{encode, Segment, SegmentPattern};
//!
//! let seven = encode(7);
//! assert!(seven.is_lit(Segment::F));
//! assert!(!seven.is_lit(Segment::G));
//! assert_eq!(seven.decode(), Some(7));
//!
//! assert_eq!(encode(12), SegmentPattern::BLANK);
//! ```

use core::fmt;

/// One segment of a seven-segment digit, plus the decimal point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Top horizontal bar.
    A,
    /// Top-right vertical bar.
    B,
    /// Bottom-right vertical bar.
    C,
    /// Bottom horizontal bar.
    D,
    /// Bottom-left vertical bar.
    E,
    /// Top-left vertical bar.
    F,
    /// Middle horizontal bar.
    G,
    /// Decimal point.
    Dp,
}

impl Segment {
    /// Number of segment lines per digit (seven bars and the decimal point).
    pub const COUNT: usize = 8;

    /// All segments in line order A..G, DP.
    pub const ALL: [Segment; Segment::COUNT] = [
        Segment::A,
        Segment::B,
        Segment::C,
        Segment::D,
        Segment::E,
        Segment::F,
        Segment::G,
        Segment::Dp,
    ];

    /// Position of this segment in [`Segment::ALL`] and in pin tables.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    const fn bit(self) -> u8 {
        1 << self.index()
    }
}

/// The set of segments lit for one digit.
///
/// A fixed-size bit set, one flag per segment. Patterns for digits come from
/// a constant table; see [`encode`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SegmentPattern(u8);

impl SegmentPattern {
    /// No segment lit.
    pub const EMPTY: Self = Self(0);

    /// Decimal point only: shown for any value that is not a digit.
    pub const BLANK: Self = Self(Segment::Dp.bit());

    /// Builds a pattern from a list of lit segments.
    ///
    /// ```
    /// use rs_sevseg::{Segment, SegmentPattern, encode};
    ///
    /// let one = SegmentPattern::from_segments(&[Segment::B, Segment::C]);
    /// assert_eq!(one, encode(1));
    /// ```
    pub const fn from_segments(segments: &[Segment]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < segments.len() {
            bits |= segments[i].bit();
            i += 1;
        }
        Self(bits)
    }

    /// Returns true if `segment` is lit.
    #[inline]
    pub const fn is_lit(self, segment: Segment) -> bool {
        self.0 & segment.bit() != 0
    }

    /// Returns true if no segment is lit.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Raw bits, bit `n` is `Segment::ALL[n]`.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Iterates over the lit segments in line order.
    pub fn lit(self) -> impl Iterator<Item = Segment> {
        Segment::ALL.into_iter().filter(move |s| self.is_lit(*s))
    }

    /// Returns the digit this pattern encodes, if any.
    ///
    /// This is the inverse of [`encode`] for 0-9; the blank marker and
    /// arbitrary patterns return `None`.
    pub fn decode(self) -> Option<u8> {
        DIGITS
            .iter()
            .position(|p| *p == self)
            .map(|digit| digit as u8)
    }
}

impl fmt::Debug for SegmentPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.lit()).finish()
    }
}

use Segment::{A, B, C, D, E, F, G};

const DIGITS: [SegmentPattern; 10] = [
    SegmentPattern::from_segments(&[A, B, C, D, E, F]),
    SegmentPattern::from_segments(&[B, C]),
    SegmentPattern::from_segments(&[A, B, G, E, D]),
    SegmentPattern::from_segments(&[A, B, G, C, D]),
    SegmentPattern::from_segments(&[F, G, B, C]),
    SegmentPattern::from_segments(&[A, F, G, C, D]),
    SegmentPattern::from_segments(&[A, F, E, D, C, G]),
    SegmentPattern::from_segments(&[F, A, B, C]),
    SegmentPattern::from_segments(&[A, B, C, D, E, F, G]),
    SegmentPattern::from_segments(&[A, F, G, B, C]),
];

/// Returns the segment pattern for `digit`.
///
/// Digits 0-9 come from a fixed table. Every other value, including the
/// out-of-range tens digit of a value above 99, maps to
/// [`SegmentPattern::BLANK`]. Pure: the same input always gives the same
/// output.
#[inline]
pub fn encode(digit: u8) -> SegmentPattern {
    DIGITS
        .get(usize::from(digit))
        .copied()
        .unwrap_or(SegmentPattern::BLANK)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Table Tests
    // =========================================================================

    #[test]
    fn zero_lights_outer_ring() {
        assert_eq!(encode(0), SegmentPattern::from_segments(&[A, B, C, D, E, F]));
        assert!(!encode(0).is_lit(G));
    }

    #[test]
    fn documented_patterns() {
        assert_eq!(encode(1).lit().collect::<Vec<_>>(), vec![B, C]);
        assert_eq!(encode(2).lit().collect::<Vec<_>>(), vec![A, B, D, E, G]);
        assert_eq!(encode(4).lit().collect::<Vec<_>>(), vec![B, C, F, G]);
        assert_eq!(encode(7).lit().collect::<Vec<_>>(), vec![A, B, C, F]);
        assert_eq!(encode(9).lit().collect::<Vec<_>>(), vec![A, B, C, F, G]);
    }

    #[test]
    fn eight_lights_every_bar() {
        let eight = encode(8);
        for segment in [A, B, C, D, E, F, G] {
            assert!(eight.is_lit(segment), "{:?} should be lit", segment);
        }
        assert!(!eight.is_lit(Segment::Dp));
    }

    #[test]
    fn no_digit_lights_decimal_point() {
        for digit in 0..10 {
            assert!(!encode(digit).is_lit(Segment::Dp));
        }
    }

    #[test]
    fn every_digit_pattern_is_distinct() {
        for a in 0..10u8 {
            for b in (a + 1)..10 {
                assert_ne!(encode(a), encode(b), "{} and {} collide", a, b);
            }
        }
    }

    // =========================================================================
    // Blank / Out-of-range Tests
    // =========================================================================

    #[test]
    fn out_of_range_is_decimal_point_only() {
        for digit in [10, 11, 42, 99, 200, u8::MAX] {
            assert_eq!(encode(digit), SegmentPattern::BLANK);
        }
        assert_eq!(SegmentPattern::BLANK.lit().collect::<Vec<_>>(), vec![Segment::Dp]);
    }

    #[test]
    fn encode_is_idempotent() {
        for digit in 0..=u8::MAX {
            assert_eq!(encode(digit), encode(digit));
        }
    }

    // =========================================================================
    // Decode Tests
    // =========================================================================

    #[test]
    fn decode_inverts_encode() {
        for digit in 0..10 {
            assert_eq!(encode(digit).decode(), Some(digit));
        }
    }

    #[test]
    fn decode_rejects_non_digits() {
        assert_eq!(SegmentPattern::BLANK.decode(), None);
        assert_eq!(SegmentPattern::EMPTY.decode(), None);
        assert_eq!(SegmentPattern::from_segments(&[A]).decode(), None);
    }

    #[test]
    fn debug_lists_lit_segments() {
        assert_eq!(format!("{:?}", encode(1)), "{B, C}");
        assert_eq!(format!("{:?}", SegmentPattern::EMPTY), "{}");
    }
}

//! # Field Extraction Rules
//!
//! A [`FieldRule`] names a set of bit segments of an instruction word. The
//! segments are concatenated most-significant first, so the rule
//! `[27:20]` yields an 8-bit value and the rule `[22], [6:5]` yields a
//! 3-bit value whose top bit is bit 22.
//!
//! Dispatch tables index their slots with a rule, and variable fields of a
//! template describe where their value lives with one.
//!
//! ```text
//!   word:  ..... 1 ........... 1 0 .....
//!               22             6 5
//!   rule [22],[6:5]  ──►  0b110
//! ```

use crate::bitwise::{Bits, range_mask};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// A contiguous run of bits, `lo..=lo + width - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    pub lo: u8,
    pub width: u8,
}

impl Segment {
    #[must_use]
    pub const fn new(lo: u8, width: u8) -> Self {
        Self { lo, width }
    }

    #[must_use]
    pub const fn hi(self) -> u8 {
        self.lo + self.width - 1
    }

    #[must_use]
    pub const fn mask(self) -> u32 {
        range_mask(&(self.lo..=self.hi()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FieldRule {
    /// Most-significant segment first.
    pub segments: SmallVec<[Segment; 4]>,
}

impl FieldRule {
    /// A rule made of the single range `hi:lo`.
    #[must_use]
    pub fn bits(hi: u8, lo: u8) -> Self {
        let mut segments = SmallVec::new();
        segments.push(Segment::new(lo, hi - lo + 1));
        Self { segments }
    }

    /// A rule made of individual bits, taken in the order given.
    #[must_use]
    pub fn from_bits(bits: &[u8]) -> Self {
        Self {
            segments: bits.iter().map(|&b| Segment::new(b, 1)).collect(),
        }
    }

    /// Total number of bits extracted.
    #[must_use]
    pub fn width(&self) -> u8 {
        self.segments.iter().map(|s| s.width).sum()
    }

    /// Number of slots a table indexed by this rule has.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        1 << self.width()
    }

    /// Every bit the rule touches.
    #[must_use]
    pub fn mask(&self) -> u32 {
        self.segments.iter().fold(0, |acc, s| acc | s.mask())
    }

    #[must_use]
    pub fn extract(&self, word: u32) -> u32 {
        self.segments.iter().fold(0, |acc, s| {
            let part = word.get_bits(s.lo..=s.hi());
            (acc << s.width) | part
        })
    }

    /// Writes the low `width()` bits of `value` into the rule's segments.
    #[must_use]
    pub fn deposit(&self, word: u32, value: u32) -> u32 {
        let mut remaining = value;
        let mut word = word;
        for s in self.segments.iter().rev() {
            word = word.with_bits(s.lo..=s.hi(), remaining);
            remaining = remaining.checked_shr(u32::from(s.width)).unwrap_or(0);
        }
        word
    }

    /// True when segments are well formed and do not overlap.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let mut seen = 0_u32;
        for s in &self.segments {
            if s.width == 0 || u32::from(s.lo) + u32::from(s.width) > 32 {
                return false;
            }
            if seen & s.mask() != 0 {
                return false;
            }
            seen |= s.mask();
        }
        !self.segments.is_empty()
    }
}

impl fmt::Display for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, s) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            if s.width == 1 {
                write!(f, "[{}]", s.lo)?;
            } else {
                // Malformed segments from a loaded set still print.
                let hi = i32::from(s.lo) + i32::from(s.width) - 1;
                write!(f, "[{hi}:{}]", s.lo)?;
            }
        }
        Ok(())
    }
}

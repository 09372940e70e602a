//! # Pattern Strings
//!
//! Encodings are written the way the architecture manual draws them, one
//! character per bit from bit 31 down to bit 0. Spaces and underscores are
//! ignored.
//!
//! ```text
//! cccc 0000 100S nnnn dddd vvvv vrr0 mmmm     add (register)
//! ---- ---- ---- 1111 ---- ---- ---- ----     exclusion: Rn == 1111
//! ```
//!
//! - `0` / `1`: fixed bits.
//! - a letter: a bit of the field with that letter's [`Role`]. Runs of the
//!   same letter become one field; separate runs of the same letter are
//!   concatenated most-significant first.
//! - `-`: don't care. Only meaningful in exclusions and guards.

use crate::error::BuildError;
use crate::field::{FieldDesc, Role};
use crate::rule::{FieldRule, Segment};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed bits a word must (or must not) have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BitPattern {
    pub mask: u32,
    pub value: u32,
}

impl BitPattern {
    #[must_use]
    pub const fn new(mask: u32, value: u32) -> Self {
        Self {
            mask,
            value: value & mask,
        }
    }

    #[must_use]
    pub const fn matches(self, word: u32) -> bool {
        word & self.mask == self.value
    }

    /// True when the bits known in `known` decide this pattern, and it matches.
    #[must_use]
    pub const fn determined_by(self, known: Self) -> bool {
        self.mask & !known.mask == 0 && known.value & self.mask == self.value
    }

    /// No value bit lies outside the mask.
    #[must_use]
    pub const fn is_well_formed(self) -> bool {
        self.value & !self.mask == 0
    }

    /// True when some fixed bit of `self` contradicts `other`.
    #[must_use]
    pub const fn contradicts(self, other: Self) -> bool {
        (self.value ^ other.value) & self.mask & other.mask != 0
    }

    /// Combines two non-contradicting patterns.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            mask: self.mask | other.mask,
            value: self.value | other.value,
        }
    }

    /// Parses a pattern made of `0`, `1` and `-`.
    pub fn parse(text: &str) -> Result<Self, BuildError> {
        let bits = bit_chars(text)?;
        let mut pattern = Self::default();
        for (i, ch) in bits.iter().enumerate() {
            let bit = 1 << (31 - i);
            match ch {
                '0' => pattern.mask |= bit,
                '1' => {
                    pattern.mask |= bit;
                    pattern.value |= bit;
                }
                '-' => {}
                other => {
                    return Err(bad(text, format!("unexpected `{other}`")));
                }
            }
        }
        Ok(pattern)
    }
}

impl fmt::Display for BitPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..32).rev() {
            let bit = 1 << i;
            let ch = if self.mask & bit == 0 {
                '-'
            } else if self.value & bit == 0 {
                '0'
            } else {
                '1'
            };
            write!(f, "{ch}")?;
            if i % 4 == 0 && i != 0 {
                f.write_str(" ")?;
            }
        }
        Ok(())
    }
}

/// A parsed encoding pattern: fixed bits plus variable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub fixed: BitPattern,
    pub fields: Vec<FieldDesc>,
}

impl Pattern {
    pub fn parse(text: &str) -> Result<Self, BuildError> {
        let bits = bit_chars(text)?;
        let mut fixed = BitPattern::default();
        let mut fields: Vec<FieldDesc> = Vec::new();
        let mut previous = None;

        for (i, &ch) in bits.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let pos = (31 - i) as u8;
            let bit = 1_u32 << pos;
            match ch {
                '0' => fixed.mask |= bit,
                '1' => {
                    fixed.mask |= bit;
                    fixed.value |= bit;
                }
                letter => {
                    let role = Role::from_letter(letter)
                        .ok_or_else(|| bad(text, format!("unknown field letter `{letter}`")))?;
                    let idx = if let Some(idx) = fields.iter().position(|f| f.role == role) {
                        idx
                    } else {
                        fields.push(FieldDesc {
                            role,
                            bits: FieldRule::default(),
                        });
                        fields.len() - 1
                    };
                    let field = &mut fields[idx];
                    // Extend the current run downwards, or open a new segment.
                    match field.bits.segments.last_mut() {
                        Some(seg) if previous == Some(letter) => {
                            seg.lo = pos;
                            seg.width += 1;
                        }
                        _ => field.bits.segments.push(Segment::new(pos, 1)),
                    }
                }
            }
            previous = Some(ch);
        }

        Ok(Self { fixed, fields })
    }
}

fn bit_chars(text: &str) -> Result<Vec<char>, BuildError> {
    let bits: Vec<char> = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .collect();
    if bits.len() == 32 {
        Ok(bits)
    } else {
        Err(bad(text, format!("expected 32 bits, found {}", bits.len())))
    }
}

fn bad(text: &str, reason: String) -> BuildError {
    BuildError::BadPattern {
        pattern: text.to_owned(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fixed_bits_and_fields() {
        let p = Pattern::parse("cccc 0000 1000 nnnn dddd vvvv vrr0 mmmm").unwrap();
        assert_eq!(p.fixed, BitPattern::new(0x0FF0_0010, 0x0080_0000));
        let roles: Vec<_> = p.fields.iter().map(|f| f.role).collect();
        assert_eq!(
            roles,
            vec![Role::Cond, Role::Rn, Role::Rd, Role::ShiftImm, Role::ShiftType, Role::Rm]
        );
        assert_eq!(p.fields[3].bits, FieldRule::bits(11, 7));
        assert_eq!(p.fields[4].bits, FieldRule::bits(6, 5));
    }

    #[test]
    fn split_field_concatenates() {
        let p = Pattern::parse("cccc 0011 0000 iiii dddd iiii iiii iiii").unwrap();
        let imm = &p.fields[1];
        assert_eq!(imm.role, Role::Imm);
        assert_eq!(imm.width(), 16);
        assert_eq!(imm.decode(0x000F_0FFF), 0xFFFF);
        assert_eq!(imm.decode(0x000A_0BCD), 0xABCD);
    }

    #[test]
    fn exclusion_pattern() {
        let e = BitPattern::parse("---- ---- ---- 1111 ---- ---- ---- ----").unwrap();
        assert_eq!(e, BitPattern::new(0x000F_0000, 0x000F_0000));
        assert!(e.matches(0xE6AF_0070));
        assert!(!e.matches(0xE6A1_0070));
        assert_eq!(e.to_string(), "---- ---- ---- 1111 ---- ---- ---- ----");
    }

    #[test]
    fn determined_and_contradicts() {
        let e = BitPattern::new(0x0000_0E00, 0x0000_0A00);
        assert!(e.determined_by(BitPattern::new(0x0000_0F00, 0x0000_0B00)));
        assert!(!e.determined_by(BitPattern::new(0x0000_0C00, 0x0000_0800)));
        assert!(e.contradicts(BitPattern::new(0x0000_0800, 0)));
        assert!(!e.contradicts(BitPattern::new(0x0000_0100, 0x0000_0100)));
    }

    #[test]
    fn bad_patterns() {
        assert!(matches!(
            Pattern::parse("0000"),
            Err(BuildError::BadPattern { .. })
        ));
        assert!(matches!(
            Pattern::parse("cccc 0000 1000 nnnn dddd vvvv vrr0 mmm?"),
            Err(BuildError::BadPattern { .. })
        ));
        assert!(BitPattern::parse("---- ---- ---- 1111 ---- ---- ---- ---x").is_err());
    }
}

//! Variable fields of an encoding template and the operand values that fill
//! them.
//!
//! Each field has a [`Role`], which fixes how its raw bits are interpreted,
//! and a [`FieldRule`] saying where the bits live. Pattern strings name roles
//! with single letters (see [`Role::from_letter`]).

use crate::bitwise::Bits;
use crate::condition::Condition;
use crate::rule::FieldRule;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the raw bits of a field map to an operand value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// General purpose register number, 0..=15.
    Gpr,
    /// Condition code, 0..=14. `1111` is not a condition.
    Condition,
    /// Two's complement number in the field width.
    Signed,
    /// Plain unsigned number in the field width.
    Unsigned,
}

macro_rules! roles {
    ($($role:ident => $letter:literal, $name:literal, $kind:ident;)*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum Role {
            $($role,)*
        }

        impl Role {
            pub const ALL: &'static [Self] = &[$(Self::$role,)*];

            #[must_use]
            pub const fn from_letter(letter: char) -> Option<Self> {
                match letter {
                    $($letter => Some(Self::$role),)*
                    _ => None,
                }
            }

            #[must_use]
            pub const fn letter(self) -> char {
                match self {
                    $(Self::$role => $letter,)*
                }
            }

            /// Lowercase name used on the command line (`rd=3`).
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$role => $name,)*
                }
            }

            #[must_use]
            pub const fn kind(self) -> FieldKind {
                match self {
                    $(Self::$role => FieldKind::$kind,)*
                }
            }
        }
    };
}

roles! {
    Cond => 'c', "cond", Condition;
    Rd => 'd', "rd", Gpr;
    Rn => 'n', "rn", Gpr;
    Rm => 'm', "rm", Gpr;
    Rs => 's', "rs", Gpr;
    Rt => 't', "rt", Gpr;
    Rt2 => 'T', "rt2", Gpr;
    Ra => 'a', "ra", Gpr;
    RdHi => 'H', "rdhi", Gpr;
    RdLo => 'L', "rdlo", Gpr;
    Imm => 'i', "imm", Unsigned;
    Offset => 'j', "offset", Signed;
    ShiftImm => 'v', "shift", Unsigned;
    ShiftType => 'r', "shift_type", Unsigned;
    Rotation => 'R', "rotation", Unsigned;
    RegList => 'x', "reglist", Unsigned;
    Up => 'u', "up", Unsigned;
    Writeback => 'W', "writeback", Unsigned;
    Msb => 'f', "msb", Unsigned;
    Lsb => 'b', "lsb", Unsigned;
    WidthM1 => 'w', "widthm1", Unsigned;
    SatImm => 'S', "sat", Unsigned;
    Select => 'y', "select", Unsigned;
    PsrMask => 'z', "mask", Unsigned;
    Size => 'Z', "size", Unsigned;
    Quad => 'Q', "q", Unsigned;
    Coproc => 'p', "coproc", Unsigned;
    Opc1 => 'o', "opc1", Unsigned;
    Opc2 => 'q', "opc2", Unsigned;
    CRn => 'N', "crn", Unsigned;
    CRm => 'M', "crm", Unsigned;
    CRd => 'C', "crd", Unsigned;
    Vd => 'e', "vd", Unsigned;
    D => 'E', "d", Unsigned;
    Vn => 'g', "vn", Unsigned;
    N => 'G', "n", Unsigned;
    Vm => 'k', "vm", Unsigned;
    M => 'K', "m", Unsigned;
    SysReg => 'X', "sysreg", Unsigned;
}

impl Role {
    /// Value used for a field the caller did not supply.
    #[must_use]
    pub const fn default_value(self) -> i64 {
        match self.kind() {
            // AL
            FieldKind::Condition => 14,
            _ => 0,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|role| role.name() == lower)
            .ok_or_else(|| format!("unknown field `{s}`"))
    }
}

/// One variable field of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDesc {
    pub role: Role,
    pub bits: FieldRule,
}

impl FieldDesc {
    #[must_use]
    pub fn width(&self) -> u8 {
        self.bits.width()
    }

    /// Reads the field out of `word`, sign-extending signed fields.
    #[must_use]
    pub fn decode(&self, word: u32) -> i64 {
        let raw = self.bits.extract(word);
        match self.role.kind() {
            FieldKind::Signed => raw.sign_extended(self.width()),
            _ => i64::from(raw),
        }
    }

    /// Converts an operand value to the raw bits of this field, or `None` when
    /// it does not fit.
    #[must_use]
    pub fn raw_bits(&self, value: i64) -> Option<u32> {
        let width = u32::from(self.width());
        let (min, max) = match self.role.kind() {
            FieldKind::Gpr => (0, 15),
            FieldKind::Condition => (0, 14),
            FieldKind::Signed => (-(1_i64 << (width - 1)), (1_i64 << (width - 1)) - 1),
            FieldKind::Unsigned => (0, (1_i64 << width) - 1),
        };
        if value < min || value > max {
            return None;
        }
        // Two's complement truncation for negative offsets.
        let mask = if width >= 32 { u32::MAX } else { (1_u32 << width) - 1 };
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Some((value as u32) & mask)
    }

    /// Writes `value` into `word`, or returns `None` when it does not fit.
    #[must_use]
    pub fn encode(&self, word: u32, value: i64) -> Option<u32> {
        self.raw_bits(value).map(|raw| self.bits.deposit(word, raw))
    }
}

/// A field value supplied to the encoder or produced by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operand {
    pub role: Role,
    pub value: i64,
}

impl Operand {
    #[must_use]
    pub const fn new(role: Role, value: i64) -> Self {
        Self { role, value }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.role, self.value)
    }
}

/// Parses `role=value`. Values may be decimal, `0x` hex or `0b` binary, and
/// may carry a leading `-`. The condition also takes its suffix (`cond=ne`).
impl FromStr for Operand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (role, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected `field=value`, got `{s}`"))?;
        let role: Role = role.trim().parse()?;
        let value = value.trim();
        if role == Role::Cond {
            if let Ok(condition) = value.parse::<Condition>() {
                return Ok(Self::new(role, i64::from(condition as u8)));
            }
        }
        let (negative, digits) = value
            .strip_prefix('-')
            .map_or((false, value), |rest| (true, rest));
        let parsed = if let Some(hex) = digits.strip_prefix("0x") {
            i64::from_str_radix(hex, 16)
        } else if let Some(bin) = digits.strip_prefix("0b") {
            i64::from_str_radix(bin, 2)
        } else {
            digits.parse()
        }
        .map_err(|e| format!("bad value `{value}` for {role}: {e}"))?;
        Ok(Self::new(role, if negative { -parsed } else { parsed }))
    }
}

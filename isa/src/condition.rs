//! # A32 Condition Field
//!
//! Every predicated A32 encoding carries a 4-bit condition in bits 31-28.
//! The value `1111` is not a condition at all: it selects the unpredicated
//! encoding space, which is why the A32 table set tries the unpredicated root
//! first.
//!
//! ```text
//! ┌───────┬────────┬─────────────────────┐
//! │ Code  │ Suffix │     Meaning         │
//! ├───────┼────────┼─────────────────────┤
//! │ 0000  │   EQ   │ Equal               │
//! │ 0001  │   NE   │ Not equal           │
//! │ 0010  │   CS   │ Carry set           │
//! │ 0011  │   CC   │ Carry clear         │
//! │ 0100  │   MI   │ Minus / negative    │
//! │ 0101  │   PL   │ Plus / non-negative │
//! │ 0110  │   VS   │ Overflow set        │
//! │ 0111  │   VC   │ Overflow clear      │
//! │ 1000  │   HI   │ Higher (unsigned)   │
//! │ 1001  │   LS   │ Lower/same (unsig)  │
//! │ 1010  │   GE   │ ≥ (signed)          │
//! │ 1011  │   LT   │ < (signed)          │
//! │ 1100  │   GT   │ > (signed)          │
//! │ 1101  │   LE   │ ≤ (signed)          │
//! │ 1110  │   AL   │ Always              │
//! │ 1111  │   NV   │ Unpredicated space  │
//! └───────┴────────┴─────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Condition codes for A32 conditional execution.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub enum Condition {
    /// Equal (Z=1)
    EQ = 0x0,

    /// Not equal (Z=0)
    NE = 0x1,

    /// Carry set / unsigned higher or same (C=1)
    CS = 0x2,

    /// Carry clear / unsigned lower (C=0)
    CC = 0x3,

    /// Minus / negative (N=1)
    MI = 0x4,

    /// Plus / positive or zero (N=0)
    PL = 0x5,

    /// Overflow set (V=1)
    VS = 0x6,

    /// Overflow clear (V=0)
    VC = 0x7,

    /// Unsigned higher (C=1 AND Z=0)
    HI = 0x8,

    /// Unsigned lower or same (C=0 OR Z=1)
    LS = 0x9,

    /// Signed greater or equal (N=V)
    GE = 0xA,

    /// Signed less than (N≠V)
    LT = 0xB,

    /// Signed greater than (Z=0 AND N=V)
    GT = 0xC,

    /// Signed less than or equal (Z=1 OR N≠V)
    LE = 0xD,

    /// Always. This is what encoders default to when no condition is given.
    AL = 0xE,

    /// Not a condition in A32: selects the unpredicated encoding space.
    NV = 0xF,
}

impl From<u8> for Condition {
    fn from(item: u8) -> Self {
        match item & 0xF {
            0x0 => Self::EQ,
            0x1 => Self::NE,
            0x2 => Self::CS,
            0x3 => Self::CC,
            0x4 => Self::MI,
            0x5 => Self::PL,
            0x6 => Self::VS,
            0x7 => Self::VC,
            0x8 => Self::HI,
            0x9 => Self::LS,
            0xA => Self::GE,
            0xB => Self::LT,
            0xC => Self::GT,
            0xD => Self::LE,
            0xE => Self::AL,
            _ => Self::NV,
        }
    }
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let condition = match s.to_ascii_uppercase().as_str() {
            "EQ" => Self::EQ,
            "NE" => Self::NE,
            "CS" | "HS" => Self::CS,
            "CC" | "LO" => Self::CC,
            "MI" => Self::MI,
            "PL" => Self::PL,
            "VS" => Self::VS,
            "VC" => Self::VC,
            "HI" => Self::HI,
            "LS" => Self::LS,
            "GE" => Self::GE,
            "LT" => Self::LT,
            "GT" => Self::GT,
            "LE" => Self::LE,
            "AL" => Self::AL,
            _ => return Err(format!("unknown condition `{s}`")),
        };
        Ok(condition)
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EQ => f.write_str("EQ"),
            Self::NE => f.write_str("NE"),
            Self::CS => f.write_str("CS"),
            Self::CC => f.write_str("CC"),
            Self::MI => f.write_str("MI"),
            Self::PL => f.write_str("PL"),
            Self::VS => f.write_str("VS"),
            Self::VC => f.write_str("VC"),
            Self::HI => f.write_str("HI"),
            Self::LS => f.write_str("LS"),
            Self::GE => f.write_str("GE"),
            Self::LT => f.write_str("LT"),
            Self::GT => f.write_str("GT"),
            Self::LE => f.write_str("LE"),
            Self::AL => f.write_str("AL"),
            Self::NV => f.write_str("NV"),
        }
    }
}

//! # Template Entries
//!
//! A [`TemplateEntry`] is one concrete bit-level encoding of an operation.
//! Decode and encode both work from the same entries.
//!
//! ```text
//! add (register):  cccc 0000 100S nnnn dddd vvvv vrr0 mmmm
//!                  ────┬──── ──┬─ ────────┬───────────────
//!                  fixed bits  │   variable fields
//!                  (mask/value)│
//!                              └ S is fixed per entry: `add` and `adds`
//!                                are separate operations
//! ```

use crate::field::{FieldDesc, Role};
use crate::operation::OperationId;
use crate::pattern::BitPattern;
use crate::table::EntryId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Architecture revision an encoding first appears in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Arch {
    V7,
    #[default]
    V8,
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V7 => f.write_str("v7"),
            Self::V8 => f.write_str("v8"),
        }
    }
}

impl FromStr for Arch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v7" | "armv7" => Ok(Self::V7),
            "v8" | "armv8" => Ok(Self::V8),
            _ => Err(format!("unknown architecture `{s}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntryFlags {
    /// The operation updates the condition flags.
    pub writes_flags: bool,
    /// Only the decoder uses this entry.
    pub decode_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub op: OperationId,
    /// Source pattern text, kept for diagnostics and dumps.
    pub pattern: String,
    pub fixed: BitPattern,
    /// Sub-patterns the entry's words must not match.
    pub exclusions: Vec<BitPattern>,
    pub fields: Vec<FieldDesc>,
    pub since: Arch,
    pub flags: EntryFlags,
    /// Other entries of the same operation, canonical first, then in
    /// definition order.
    pub family: Vec<EntryId>,
    /// Strictly more specific entries that overlap this one. Encoding a word
    /// that matches any of them is refused, since it would decode to them.
    pub shadowed_by: Vec<EntryId>,
}

impl TemplateEntry {
    #[must_use]
    pub const fn mask(&self) -> u32 {
        self.fixed.mask
    }

    #[must_use]
    pub const fn value(&self) -> u32 {
        self.fixed.value
    }

    /// Fixed bits match and no exclusion does.
    #[must_use]
    pub fn matches(&self, word: u32) -> bool {
        self.fixed.matches(word) && !self.exclusions.iter().any(|e| e.matches(word))
    }

    #[must_use]
    pub fn field(&self, role: Role) -> Option<&FieldDesc> {
        self.fields.iter().find(|f| f.role == role)
    }

    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.fields.iter().map(|f| f.role)
    }

    /// True when no word can match both entries.
    #[must_use]
    pub fn disjoint_from(&self, other: &Self) -> bool {
        disjoint(self.fixed, &self.exclusions, other.fixed, &other.exclusions)
    }

    /// True when every word of `self` also has `other`'s fixed bits, and
    /// `self` fixes strictly more bits.
    #[must_use]
    pub const fn strictly_inside(&self, other: &Self) -> bool {
        strictly_inside(self.fixed, other.fixed)
    }
}

pub(crate) fn disjoint(
    a: BitPattern,
    a_exclusions: &[BitPattern],
    b: BitPattern,
    b_exclusions: &[BitPattern],
) -> bool {
    a.contradicts(b)
        || b_exclusions.iter().any(|e| e.determined_by(a))
        || a_exclusions.iter().any(|e| e.determined_by(b))
}

pub(crate) const fn strictly_inside(inner: BitPattern, outer: BitPattern) -> bool {
    outer.mask & !inner.mask == 0 && inner.mask != outer.mask && !inner.contradicts(outer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Pattern;
    use pretty_assertions::assert_eq;

    fn entry(op: OperationId, text: &str, exclusions: &[&str]) -> TemplateEntry {
        let pattern = Pattern::parse(text).unwrap();
        TemplateEntry {
            op,
            pattern: text.to_owned(),
            fixed: pattern.fixed,
            exclusions: exclusions
                .iter()
                .map(|e| BitPattern::parse(e).unwrap())
                .collect(),
            fields: pattern.fields,
            since: Arch::V7,
            flags: EntryFlags::default(),
            family: Vec::new(),
            shadowed_by: Vec::new(),
        }
    }

    #[test]
    fn mov_nests_inside_lsl() {
        let mov = entry(OperationId::Mov, "cccc 0001 1010 0000 dddd 0000 0000 mmmm", &[]);
        let lsl = entry(OperationId::Lsl, "cccc 0001 1010 0000 dddd vvvv v000 mmmm", &[]);
        assert!(mov.strictly_inside(&lsl));
        assert!(!lsl.strictly_inside(&mov));
        assert!(!mov.disjoint_from(&lsl));
        assert!(mov.mask().count_ones() > lsl.mask().count_ones());
    }

    #[test]
    fn exclusion_makes_disjoint() {
        let bfi = entry(
            OperationId::Bfi,
            "cccc 0111 110f ffff dddd bbbb b001 nnnn",
            &["---- ---- ---- ---- ---- ---- ---- 1111"],
        );
        let bfc = entry(OperationId::Bfc, "cccc 0111 110f ffff dddd bbbb b001 1111", &[]);
        assert!(bfi.disjoint_from(&bfc));
        assert!(bfc.disjoint_from(&bfi));
        assert!(bfi.matches(0xE7C0_0011));
        assert!(!bfi.matches(0xE7C0_001F));
        assert!(bfc.matches(0xE7C0_001F));
    }

    #[test]
    fn field_lookup() {
        let add = entry(OperationId::Add, "cccc 0010 1000 nnnn dddd iiii iiii iiii", &[]);
        assert_eq!(add.field(Role::Imm).map(FieldDesc::width), Some(12));
        assert!(add.field(Role::Rm).is_none());
        assert_eq!(
            add.roles().collect::<Vec<_>>(),
            vec![Role::Cond, Role::Rn, Role::Rd, Role::Imm]
        );
    }

    #[test]
    fn arch_order_and_parse() {
        assert!(Arch::V7 < Arch::V8);
        assert_eq!("V8".parse(), Ok(Arch::V8));
        assert_eq!(Arch::default(), Arch::V8);
        assert!("v9".parse::<Arch>().is_err());
    }
}

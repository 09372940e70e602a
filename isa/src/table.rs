//! # Dispatch Tables
//!
//! Tables live in arenas owned by a [`TableSet`](crate::TableSet) and refer
//! to each other through typed `u32` handles.
//!
//! ```text
//!  root [27:20] ──► slot 0x00 ──► table [7:4] ──► slot 1001 ──► Entry(mul)
//!                   slot 0x1A ──► table [7:4] ──► slot 0000 ──► Chain[mov, lsl]
//!                   slot 0x7F ──► table [7:4] ──► slot 1111 ──► Reserved(udf)
//! ```

use crate::pattern::BitPattern;
use crate::rule::FieldRule;
use serde::{Deserialize, Serialize};

/// Deepest table nesting a lookup may walk, counting the root table.
pub const MAX_DEPTH: usize = 6;

/// Longest variant chain.
pub const MAX_CHAIN: usize = 8;

macro_rules! handle {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            #[must_use]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            #[allow(clippy::cast_possible_truncation)]
            pub(crate) const fn from_index(index: usize) -> Self {
                Self(index as u32)
            }
        }
    };
}

handle!(TableId);
handle!(EntryId);
handle!(ChainId);
handle!(ReservedId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Slot {
    #[default]
    Empty,
    Reserved(ReservedId),
    Entry(EntryId),
    Chain(ChainId),
    Table(TableId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchTable {
    pub rule: FieldRule,
    /// `rule.slot_count()` slots.
    pub slots: Vec<Slot>,
}

impl DispatchTable {
    #[must_use]
    pub fn slot_for(&self, word: u32) -> Slot {
        let index = self.rule.extract(word) as usize;
        self.slots.get(index).copied().unwrap_or_default()
    }
}

/// Entries sharing one terminal slot, most specific first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantChain {
    pub entries: Vec<EntryId>,
}

/// A permanently undefined encoding space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedEntry {
    pub name: String,
    pub pattern: String,
    pub fixed: BitPattern,
}

/// An entry point of a table set. Roots are tried in order and the first
/// whose guard matches the word is walked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Root {
    pub guard: BitPattern,
    pub table: TableId,
}

/// What the Opcode Index knows about one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexSlot {
    /// One of the leading identifiers that never own an encoding.
    Sentinel,
    Canonical(EntryId),
    /// Decodable, but deliberately without an encode-side template.
    DecodeOnly(String),
    /// Hole: nothing defines this operation.
    Unassigned,
}

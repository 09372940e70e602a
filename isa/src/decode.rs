//! # Decode Lookup
//!
//! ```text
//!  word ──► first root whose guard matches
//!        ──► table: extract rule, index slot ─┬─ Empty     → Undecodable
//!                 ▲                           ├─ Reserved  → Reserved (if it matches)
//!                 └──────────── Table ────────┤
//!                                             ├─ Entry     → check fixed bits + exclusions
//!                                             └─ Chain     → first entry that matches
//! ```
//!
//! The walk is bounded by [`MAX_DEPTH`] and chains by their length, so a
//! lookup never loops, allocates only the field list, and never blocks.

use crate::condition::Condition;
use crate::error::DecodeError;
use crate::field::{Operand, Role};
use crate::operation::OperationId;
use crate::source::WordSource;
use crate::table::{MAX_DEPTH, Slot, TableId};
use crate::table_set::TableSet;
use crate::template::{Arch, TemplateEntry};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Target the decoder is working for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DecodeContext {
    pub arch: Arch,
}

impl DecodeContext {
    #[must_use]
    pub const fn new(arch: Arch) -> Self {
        Self { arch }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<'a> {
    pub op: OperationId,
    pub entry: &'a TemplateEntry,
    /// Every variable field, in pattern order.
    pub fields: SmallVec<[Operand; 8]>,
}

impl Decoded<'_> {
    /// Value of the operand filling `role`, if the encoding has one.
    #[must_use]
    pub fn operand(&self, role: Role) -> Option<i64> {
        self.fields.iter().find(|f| f.role == role).map(|f| f.value)
    }

    /// Condition of a predicated encoding. Unpredicated ones have none.
    #[must_use]
    pub fn condition(&self) -> Option<Condition> {
        let value = self.operand(Role::Cond)?;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let nibble = value as u8;
        Some(Condition::from(nibble))
    }
}

impl fmt::Display for Decoded<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.op.name())?;
        for (i, field) in self.fields.iter().enumerate() {
            f.write_str(if i == 0 { " " } else { ", " })?;
            write!(f, "{field}")?;
        }
        Ok(())
    }
}

impl TableSet {
    pub fn decode(&self, word: u32, ctx: &DecodeContext) -> Result<Decoded<'_>, DecodeError> {
        let entry = self.lookup(word)?;
        if entry.since > ctx.arch {
            return Err(DecodeError::RequiresArch {
                op: entry.op,
                arch: entry.since,
            });
        }
        Ok(Decoded {
            op: entry.op,
            entry,
            fields: entry
                .fields
                .iter()
                .map(|f| Operand::new(f.role, f.decode(word)))
                .collect(),
        })
    }

    /// Finds the entry a word matches, ignoring architecture.
    pub fn lookup(&self, word: u32) -> Result<&TemplateEntry, DecodeError> {
        let root = self
            .roots
            .iter()
            .find(|r| r.guard.matches(word))
            .ok_or(DecodeError::Undecodable { word })?;
        self.walk(root.table, word, 1)
    }

    fn walk(&self, table: TableId, word: u32, depth: usize) -> Result<&TemplateEntry, DecodeError> {
        let undecodable = DecodeError::Undecodable { word };
        if depth > MAX_DEPTH {
            return Err(undecodable);
        }
        let slot = self.table(table).ok_or(undecodable.clone())?.slot_for(word);

        match slot {
            Slot::Empty => {
                tracing::trace!("{word:#010x}: empty slot at depth {depth}");
                Err(undecodable)
            }
            Slot::Reserved(id) => match self.reserved.get(id.index()) {
                Some(reserved) if reserved.fixed.matches(word) => Err(DecodeError::Reserved {
                    word,
                    name: reserved.name.clone(),
                }),
                _ => Err(undecodable),
            },
            Slot::Table(nested) => self.walk(nested, word, depth + 1),
            Slot::Entry(id) => match self.entry(id) {
                Some(entry) if entry.matches(word) => Ok(entry),
                _ => {
                    tracing::trace!("{word:#010x}: entry {} does not match", id.0);
                    Err(undecodable)
                }
            },
            Slot::Chain(id) => self
                .chain(id)
                .into_iter()
                .flat_map(|c| c.entries.iter())
                .filter_map(|e| self.entry(*e))
                .find(|e| e.matches(word))
                .ok_or(undecodable),
        }
    }

    /// Decodes every word of `source`, tagged with its offset.
    pub fn decode_stream<'s, S: WordSource>(
        &'s self,
        source: S,
        ctx: DecodeContext,
    ) -> DecodeStream<'s, S> {
        DecodeStream {
            set: self,
            source,
            ctx,
        }
    }
}

pub struct DecodeStream<'s, S> {
    set: &'s TableSet,
    source: S,
    ctx: DecodeContext,
}

impl<'s, S: WordSource> Iterator for DecodeStream<'s, S> {
    type Item = (usize, u32, Result<Decoded<'s>, DecodeError>);

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.source.offset();
        let word = self.source.next_word()?;
        Some((offset, word, self.set.decode(word, &self.ctx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{Record, RootDef, TableSetDef};
    use crate::rule::FieldRule;
    use crate::source::ByteCursor;
    use pretty_assertions::assert_eq;

    fn set() -> TableSet {
        TableSet::build(&TableSetDef {
            name: "decode".to_owned(),
            roots: vec![
                RootDef {
                    guard: format!("1111{}", "-".repeat(28)),
                    rule: FieldRule::bits(27, 20),
                },
                RootDef {
                    guard: "-".repeat(32),
                    rule: FieldRule::bits(27, 20),
                },
            ],
            refinements: vec![FieldRule::bits(7, 4)],
            records: vec![
                Record::op(OperationId::B, "cccc 1010 jjjj jjjj jjjj jjjj jjjj jjjj"),
                Record::op(OperationId::Blx, "1111 101y jjjj jjjj jjjj jjjj jjjj jjjj"),
                Record::op(OperationId::Sdiv, "cccc 0111 0001 dddd 1111 mmmm 0001 nnnn").v8(),
                Record::reserved("udf", "cccc 0111 1111 iiii iiii iiii 1111 iiii"),
            ],
            decode_only: Vec::new(),
        })
        .unwrap()
    }

    #[test]
    fn branch_offset_is_sign_extended() {
        let set = set();
        let decoded = set.decode(0xEAFF_FFFE, &DecodeContext::default()).unwrap();
        assert_eq!(decoded.op, OperationId::B);
        assert_eq!(
            decoded.fields.to_vec(),
            vec![Operand::new(Role::Cond, 14), Operand::new(Role::Offset, -2)]
        );
        assert_eq!(decoded.to_string(), "b cond=14, offset=-2");
        assert_eq!(decoded.condition(), Some(Condition::AL));
    }

    #[test]
    fn unpredicated_root_comes_first() {
        let set = set();
        let decoded = set.decode(0xFB00_0001, &DecodeContext::default()).unwrap();
        assert_eq!(decoded.op, OperationId::Blx);
        assert_eq!(decoded.fields[0], Operand::new(Role::Select, 1));
        assert_eq!(decoded.condition(), None);
    }

    #[test]
    fn empty_slot_and_reserved_space() {
        let set = set();
        let ctx = DecodeContext::default();
        assert_eq!(
            set.decode(0xE000_0000, &ctx),
            Err(DecodeError::Undecodable { word: 0xE000_0000 })
        );
        assert_eq!(
            set.decode(0xE7F0_00F0, &ctx),
            Err(DecodeError::Reserved {
                word: 0xE7F0_00F0,
                name: "udf".to_owned()
            })
        );
        // Right slot, wrong low nibble.
        assert_eq!(
            set.decode(0xE7F0_0070, &ctx),
            Err(DecodeError::Undecodable { word: 0xE7F0_0070 })
        );
    }

    #[test]
    fn newer_encodings_need_the_arch() {
        let set = set();
        let word = 0xE711_F210;
        assert_eq!(
            set.decode(word, &DecodeContext::new(Arch::V7)),
            Err(DecodeError::RequiresArch {
                op: OperationId::Sdiv,
                arch: Arch::V8
            })
        );
        assert_eq!(
            set.decode(word, &DecodeContext::new(Arch::V8)).map(|d| d.op),
            Ok(OperationId::Sdiv)
        );
    }

    #[test]
    fn stream_reports_offsets() {
        let set = set();
        let bytes = [0xFE, 0xFF, 0xFF, 0xEA, 0, 0, 0, 0, 0xAA];
        let results: Vec<_> = set
            .decode_stream(ByteCursor::new(&bytes), DecodeContext::default())
            .map(|(offset, word, r)| (offset, word, r.map(|d| d.op)))
            .collect();
        assert_eq!(
            results,
            vec![
                (0, 0xEAFF_FFFE, Ok(OperationId::B)),
                (4, 0, Err(DecodeError::Undecodable { word: 0 })),
            ]
        );
    }
}

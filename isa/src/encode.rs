//! # Encode Lookup
//!
//! Encoding mirrors the decode tables. The Opcode Index gives the canonical
//! entry of an operation, and the entry's family gives the alternate forms.
//! The first form that has a field for every supplied operand is used, with
//! the rest of its fields at their defaults (condition `AL`, everything else
//! zero).
//!
//! ```text
//! encode(add, rd=0 rn=1 rm=2)
//!   canonical  cccc 0010 1000 nnnn dddd iiii iiii iiii   no `rm` field, skip
//!   alternate  cccc 0000 1000 nnnn dddd vvvv vrr0 mmmm   ✓
//!   ──► 0xE081_0002
//! ```
//!
//! A word that would decode as something else is refused: either it hits one
//! of the entry's exclusions or a more specific entry shadows it.

use crate::error::EncodeError;
use crate::field::{Operand, Role};
use crate::operation::OperationId;
use crate::pattern::BitPattern;
use crate::table::IndexSlot;
use crate::table_set::TableSet;
use crate::template::TemplateEntry;

impl TableSet {
    /// The canonical entry of `op`.
    #[must_use]
    pub fn lookup_template(&self, op: OperationId) -> Option<&TemplateEntry> {
        match self.index_slot(op) {
            IndexSlot::Canonical(id) => self.entry(*id),
            _ => None,
        }
    }

    pub fn encode(&self, op: OperationId, operands: &[Operand]) -> Result<u32, EncodeError> {
        let canonical = match self.index_slot(op) {
            IndexSlot::Canonical(id) => self.entry(*id),
            IndexSlot::Sentinel => {
                return Err(unencodable(op, "reserved identifier"));
            }
            IndexSlot::DecodeOnly(reason) => {
                return Err(unencodable(op, reason));
            }
            IndexSlot::Unassigned => {
                return Err(unencodable(op, "no encoding defined"));
            }
        }
        .ok_or_else(|| unencodable(op, "index points at a missing entry"))?;

        check_duplicates(op, operands)?;

        let entry = std::iter::once(canonical)
            .chain(canonical.family.iter().filter_map(|id| self.entry(*id)))
            .filter(|e| !e.flags.decode_only)
            .find(|e| takes_all(e, operands))
            .ok_or(EncodeError::NoMatchingForm { op })?;

        self.encode_entry(entry, operands)
    }

    /// Encodes through one specific entry, decode-only forms included.
    pub fn encode_entry(
        &self,
        entry: &TemplateEntry,
        operands: &[Operand],
    ) -> Result<u32, EncodeError> {
        let op = entry.op;
        check_duplicates(op, operands)?;
        if !takes_all(entry, operands) {
            return Err(EncodeError::NoMatchingForm { op });
        }

        let value_of = |role: Role| {
            operands
                .iter()
                .find(|o| o.role == role)
                .map_or_else(|| role.default_value(), |o| o.value)
        };

        let mut word = entry.value();
        for field in &entry.fields {
            let value = value_of(field.role);
            word = field
                .encode(word, value)
                .ok_or(EncodeError::OperandOutOfRange {
                    op,
                    role: field.role,
                    value,
                })?;
        }

        // Blame the first field under the bits that make the word ambiguous.
        let blame = |pattern: BitPattern| {
            let role = entry
                .fields
                .iter()
                .find(|f| f.bits.mask() & pattern.mask != 0)
                .map_or(Role::Cond, |f| f.role);
            EncodeError::OperandOutOfRange {
                op,
                role,
                value: value_of(role),
            }
        };

        if let Some(exclusion) = entry.exclusions.iter().find(|e| e.matches(word)) {
            return Err(blame(*exclusion));
        }
        if let Some(shadow) = entry
            .shadowed_by
            .iter()
            .filter_map(|id| self.entry(*id))
            .find(|s| s.matches(word))
        {
            let distinguishing = BitPattern::new(shadow.mask() & !entry.mask(), shadow.value());
            return Err(blame(distinguishing));
        }

        Ok(word)
    }
}

fn unencodable(op: OperationId, reason: &str) -> EncodeError {
    EncodeError::UnencodableOperation {
        op,
        reason: reason.to_owned(),
    }
}

fn check_duplicates(op: OperationId, operands: &[Operand]) -> Result<(), EncodeError> {
    for (i, operand) in operands.iter().enumerate() {
        if operands[..i].iter().any(|o| o.role == operand.role) {
            return Err(EncodeError::DuplicateOperand {
                op,
                role: operand.role,
            });
        }
    }
    Ok(())
}

fn takes_all(entry: &TemplateEntry, operands: &[Operand]) -> bool {
    operands.iter().all(|o| entry.field(o.role).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{Record, RootDef, TableSetDef};
    use crate::decode::DecodeContext;
    use crate::rule::FieldRule;
    use pretty_assertions::assert_eq;

    fn set() -> TableSet {
        TableSet::build(&TableSetDef {
            name: "encode".to_owned(),
            roots: vec![RootDef {
                guard: "-".repeat(32),
                rule: FieldRule::bits(27, 20),
            }],
            refinements: vec![FieldRule::bits(7, 4)],
            records: vec![
                Record::op(OperationId::Add, "cccc 0010 1000 nnnn dddd iiii iiii iiii"),
                Record::op(OperationId::Add, "cccc 0000 1000 nnnn dddd vvvv vrr0 mmmm"),
                Record::op(OperationId::Add, "cccc 0000 1000 nnnn dddd ssss 0rr1 mmmm")
                    .decode_only(),
                Record::op(OperationId::Lsl, "cccc 0001 1010 0000 dddd ssss 0001 mmmm"),
                Record::op(OperationId::Lsl, "cccc 0001 1010 0000 dddd vvvv v000 mmmm"),
                Record::op(OperationId::Mov, "cccc 0001 1010 0000 dddd 0000 0000 mmmm"),
                Record::op(OperationId::Sxtab, "cccc 0110 1010 nnnn dddd RR00 0111 mmmm")
                    .excluding("---- ---- ---- 1111 ---- ---- ---- ----"),
                Record::op(OperationId::B, "cccc 1010 jjjj jjjj jjjj jjjj jjjj jjjj"),
            ],
            decode_only: Vec::new(),
        })
        .unwrap()
    }

    fn ops(list: &[(Role, i64)]) -> Vec<Operand> {
        list.iter().map(|&(role, value)| Operand::new(role, value)).collect()
    }

    #[test]
    fn operand_shape_selects_the_form() {
        let set = set();
        let register = ops(&[(Role::Rd, 0), (Role::Rn, 1), (Role::Rm, 2)]);
        assert_eq!(set.encode(OperationId::Add, &register), Ok(0xE081_0002));
        let immediate = ops(&[(Role::Rd, 0), (Role::Rn, 1), (Role::Imm, 2)]);
        assert_eq!(set.encode(OperationId::Add, &immediate), Ok(0xE281_0002));
    }

    #[test]
    fn decode_only_forms_are_skipped() {
        let set = set();
        let reg_shift = ops(&[(Role::Rs, 3)]);
        assert_eq!(
            set.encode(OperationId::Add, &reg_shift),
            Err(EncodeError::NoMatchingForm {
                op: OperationId::Add
            })
        );
        let entry = set.entries_of(OperationId::Add).nth(2).unwrap();
        assert_eq!(set.encode_entry(entry, &reg_shift), Ok(0xE080_0310));
    }

    #[test]
    fn shadowed_words_are_refused() {
        let set = set();
        let shift_zero = ops(&[(Role::Rd, 1), (Role::Rm, 2), (Role::ShiftImm, 0)]);
        assert_eq!(
            set.encode(OperationId::Lsl, &shift_zero),
            Err(EncodeError::OperandOutOfRange {
                op: OperationId::Lsl,
                role: Role::ShiftImm,
                value: 0
            })
        );
        let shift_three = ops(&[(Role::Rd, 1), (Role::Rm, 2), (Role::ShiftImm, 3)]);
        let word = set.encode(OperationId::Lsl, &shift_three).unwrap();
        assert_eq!(word, 0xE1A0_1182);
        let decoded = set.decode(word, &DecodeContext::default()).unwrap();
        assert_eq!(decoded.op, OperationId::Lsl);
    }

    #[test]
    fn excluded_words_are_refused() {
        let set = set();
        let rn_pc = ops(&[(Role::Rd, 1), (Role::Rn, 15), (Role::Rm, 2)]);
        assert_eq!(
            set.encode(OperationId::Sxtab, &rn_pc),
            Err(EncodeError::OperandOutOfRange {
                op: OperationId::Sxtab,
                role: Role::Rn,
                value: 15
            })
        );
    }

    #[test]
    fn range_and_shape_errors() {
        let set = set();
        assert_eq!(
            set.encode(OperationId::Add, &ops(&[(Role::Rm, 16)])),
            Err(EncodeError::OperandOutOfRange {
                op: OperationId::Add,
                role: Role::Rm,
                value: 16
            })
        );
        assert_eq!(
            set.encode(OperationId::Add, &ops(&[(Role::Rd, 1), (Role::Rd, 2)])),
            Err(EncodeError::DuplicateOperand {
                op: OperationId::Add,
                role: Role::Rd
            })
        );
        assert_eq!(
            set.encode(OperationId::B, &ops(&[(Role::Offset, -2), (Role::Cond, 0)])),
            Ok(0x0AFF_FFFE)
        );
        assert_eq!(
            set.encode(OperationId::B, &ops(&[(Role::Cond, 15)])),
            Err(EncodeError::OperandOutOfRange {
                op: OperationId::B,
                role: Role::Cond,
                value: 15
            })
        );
    }

    #[test]
    fn index_states_are_reported() {
        let set = set();
        assert!(matches!(
            set.encode(OperationId::Invalid, &[]),
            Err(EncodeError::UnencodableOperation { .. })
        ));
        assert!(matches!(
            set.encode(OperationId::Sub, &[]),
            Err(EncodeError::UnencodableOperation { .. })
        ));
        assert_eq!(
            set.lookup_template(OperationId::Add).map(|e| e.value()),
            Some(0x0280_0000)
        );
        assert!(set.lookup_template(OperationId::Sub).is_none());
    }
}

//! # A32 Encoding Tables
//!
//! Declarative encoding records are compiled into multi-level dispatch
//! tables that drive both directions:
//!
//! ```text
//!   word ──► decode ──► OperationId + operands
//!   OperationId + operands ──► encode ──► word
//! ```
//!
//! [`a32`] builds the A32 table set once and hands out a shared reference.
//! Other table sets can be built from any [`TableSetDef`] with
//! [`TableSet::build`].

#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[allow(clippy::cast_possible_wrap)]
mod bitwise;

pub mod a32;
pub mod builder;
pub mod condition;
pub mod decode;
pub mod encode;
pub mod error;

#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[allow(clippy::cast_possible_wrap)]
pub mod field;

#[allow(clippy::too_many_lines)]
pub mod operation;
pub mod pattern;
pub mod rule;
pub mod source;
pub mod table;
pub mod table_set;
pub mod template;

use once_cell::sync::OnceCell;

pub use builder::{Record, RootDef, TableSetDef, Target};
pub use condition::Condition;
pub use decode::{DecodeContext, DecodeStream, Decoded};
pub use error::{BuildError, Conflict, ConflictKind, DecodeError, EncodeError};
pub use field::{Operand, Role};
pub use operation::OperationId;
pub use source::{ByteCursor, WordSource};
pub use table::IndexSlot;
pub use table_set::{Stats, TableSet};
pub use template::{Arch, TemplateEntry};

static A32: OnceCell<Result<TableSet, BuildError>> = OnceCell::new();

/// The A32 table set, built and validated on first use.
///
/// A definition that fails to build fails the same way on every call.
pub fn a32() -> Result<&'static TableSet, BuildError> {
    A32.get_or_init(|| {
        let set = TableSet::build(&a32::definition())?;
        set.validate()?;
        Ok(set)
    })
    .as_ref()
    .map_err(Clone::clone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::FieldRule;
    use crate::table::{MAX_CHAIN, MAX_DEPTH};
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn set() -> &'static TableSet {
        a32().unwrap()
    }

    fn ops(list: &[(Role, i64)]) -> Vec<Operand> {
        list.iter().map(|&(role, value)| Operand::new(role, value)).collect()
    }

    fn op_of(word: u32) -> Result<OperationId, DecodeError> {
        set().decode(word, &DecodeContext::default()).map(|d| d.op)
    }

    #[test]
    fn every_operation_is_indexed() {
        let set = set();
        let stats = set.stats();
        assert_eq!(stats.unassigned, 0);
        assert_eq!(stats.decode_only, 1);
        assert_eq!(stats.canonical, OperationId::COUNT - OperationId::SENTINEL_COUNT - 1);
        assert!(stats.longest_chain <= MAX_CHAIN);
        assert!(stats.max_depth <= MAX_DEPTH);
        assert_eq!(set.verify_index(), Ok(stats.canonical));
    }

    #[test]
    fn overlapping_entries_are_nested() {
        let set = set();
        let unpredicated = set.roots[0].guard;
        for (x, a) in set.entries.iter().enumerate() {
            for b in &set.entries[x + 1..] {
                if unpredicated.determined_by(a.fixed) != unpredicated.determined_by(b.fixed) {
                    continue;
                }
                assert!(
                    a.disjoint_from(b) || a.strictly_inside(b) || b.strictly_inside(a),
                    "`{}` {} overlaps `{}` {}",
                    a.op,
                    a.pattern,
                    b.op,
                    b.pattern
                );
            }
        }
    }

    #[test]
    fn random_words_encode_back() {
        let set = set();
        let ctx = DecodeContext::default();
        let mut rng = StdRng::seed_from_u64(0x0A32);
        let mut decoded_count = 0;
        for _ in 0..20_000 {
            let word: u32 = rng.gen_range(0..=u32::MAX);
            let Ok(decoded) = set.decode(word, &ctx) else {
                continue;
            };
            decoded_count += 1;
            assert!(!decoded.op.is_sentinel());
            assert_eq!(
                set.encode_entry(decoded.entry, &decoded.fields),
                Ok(word),
                "{word:#010x} decoded as {decoded}"
            );
        }
        assert!(decoded_count > 1_000);
    }

    #[test]
    fn decodes_known_words() {
        let cases = [
            (0xE081_0002, OperationId::Add),
            (0xE281_0002, OperationId::Add),
            (0xE1A0_1182, OperationId::Lsl),
            (0xE1A0_1002, OperationId::Mov),
            (0xE1A0_1062, OperationId::Rrx),
            (0x1AFF_FFFE, OperationId::B),
            (0xFA00_0000, OperationId::Blx),
            (0xF57F_F04F, OperationId::Dsb),
            (0xE320_F003, OperationId::Wfi),
            (0xE328_F01F, OperationId::Msr),
            (0xE59F_0004, OperationId::Ldr),
            (0xE8BD_8000, OperationId::Ldm),
            (0xEEB0_0A40, OperationId::VmovF32),
            (0xEEB7_0A00, OperationId::VmovF32),
            (0xEEF1_FA10, OperationId::VmrsApsr),
            (0xEC41_0B10, OperationId::Vmov),
        ];
        for (word, op) in cases {
            assert_eq!(op_of(word), Ok(op), "{word:#010x}");
        }
    }

    #[test]
    fn decoded_fields() {
        let decoded = set()
            .decode(0xE8BD_8000, &DecodeContext::default())
            .unwrap();
        assert_eq!(
            decoded.to_string(),
            "ldm cond=14, writeback=1, rn=13, reglist=32768"
        );
        assert_eq!(decoded.condition(), Some(Condition::AL));

        let branch = set()
            .decode(0x1AFF_FFFE, &DecodeContext::default())
            .unwrap();
        assert_eq!(branch.condition(), Some(Condition::NE));
        assert_eq!(branch.operand(Role::Offset), Some(-2));
    }

    #[test]
    fn undecodable_and_reserved_words() {
        assert_eq!(
            op_of(0xE100_0F50),
            Err(DecodeError::Undecodable { word: 0xE100_0F50 })
        );
        assert_eq!(
            op_of(0xE680_0030),
            Err(DecodeError::Undecodable { word: 0xE680_0030 })
        );
        assert_eq!(
            op_of(0xE7F0_00F0),
            Err(DecodeError::Reserved {
                word: 0xE7F0_00F0,
                name: "udf".to_owned()
            })
        );
    }

    #[test]
    fn newer_encodings_need_v8() {
        let set = set();
        assert_eq!(
            set.decode(0xE320_F005, &DecodeContext::new(Arch::V7)).map(|d| d.op),
            Err(DecodeError::RequiresArch {
                op: OperationId::Sevl,
                arch: Arch::V8
            })
        );
        assert_eq!(op_of(0xE320_F005), Ok(OperationId::Sevl));
        assert_eq!(
            set.decode(0xE320_F004, &DecodeContext::new(Arch::V7)).map(|d| d.op),
            Ok(OperationId::Sev)
        );
    }

    #[test]
    fn encodes_through_families() {
        let set = set();
        let cases = [
            (
                OperationId::Add,
                ops(&[(Role::Rd, 0), (Role::Rn, 1), (Role::Rm, 2)]),
                0xE081_0002,
            ),
            (
                OperationId::Add,
                ops(&[(Role::Rd, 0), (Role::Rn, 1), (Role::Imm, 2)]),
                0xE281_0002,
            ),
            (OperationId::Mov, ops(&[(Role::Rd, 1), (Role::Rm, 2)]), 0xE1A0_1002),
            (
                OperationId::B,
                ops(&[(Role::Cond, 1), (Role::Offset, -2)]),
                0x1AFF_FFFE,
            ),
            (
                OperationId::Ldm,
                ops(&[(Role::Rn, 13), (Role::Writeback, 1), (Role::RegList, 0x8000)]),
                0xE8BD_8000,
            ),
            (OperationId::VmovF32, ops(&[(Role::Imm, 0x70)]), 0xEEB7_0A00),
            (OperationId::Vmov, ops(&[(Role::Rt, 0), (Role::Rt2, 1)]), 0xEC41_0A10),
            (
                OperationId::Msr,
                ops(&[(Role::PsrMask, 0b1000), (Role::Imm, 0x1F)]),
                0xE328_F01F,
            ),
        ];
        for (op, operands, word) in cases {
            assert_eq!(set.encode(op, &operands), Ok(word), "{op}");
            assert_eq!(op_of(word), Ok(op));
        }
    }

    #[test]
    fn encode_refusals() {
        let set = set();
        assert_eq!(
            set.encode(
                OperationId::Sdiv,
                &ops(&[(Role::Rd, 0), (Role::Rn, 1), (Role::Rm, 16)])
            ),
            Err(EncodeError::OperandOutOfRange {
                op: OperationId::Sdiv,
                role: Role::Rm,
                value: 16
            })
        );
        assert_eq!(
            set.encode(OperationId::Blx, &[]),
            Err(EncodeError::UnencodableOperation {
                op: OperationId::Blx,
                reason: "no encode-side template for the unpredicated immediate form".to_owned()
            })
        );
        // An empty mask is the hint space.
        assert!(matches!(
            set.encode(OperationId::Msr, &ops(&[(Role::Imm, 0)])),
            Err(EncodeError::OperandOutOfRange {
                op: OperationId::Msr,
                ..
            })
        ));
        assert_eq!(
            set.encode(
                OperationId::Smlad,
                &ops(&[(Role::Rd, 0), (Role::Ra, 15)])
            ),
            Err(EncodeError::OperandOutOfRange {
                op: OperationId::Smlad,
                role: Role::Ra,
                value: 15
            })
        );
        assert_eq!(
            set.encode(OperationId::Add, &ops(&[(Role::CRn, 1)])),
            Err(EncodeError::NoMatchingForm {
                op: OperationId::Add
            })
        );
    }

    #[test]
    fn conflicting_definition_is_rejected() {
        let mut def = a32::definition();
        def.records.extend([
            Record::op(OperationId::Rsb, "cccc 0000 0100 nnnn dddd vvvv vrr0 mmmm"),
            Record::op(OperationId::Qadd, "cccc 0001 0000 1111 dddd iiii 0101 mmmm"),
        ]);
        let Err(BuildError::Conflicts(conflicts)) = TableSet::build(&def) else {
            panic!("expected conflicts");
        };
        let kinds: Vec<_> = conflicts.iter().map(|c| c.kind).collect();
        assert_eq!(kinds.len(), 2);
        assert!(kinds.contains(&ConflictKind::Identical));
        assert!(kinds.contains(&ConflictKind::Ambiguous));
        let identical = conflicts
            .iter()
            .find(|c| c.kind == ConflictKind::Identical)
            .unwrap();
        assert_eq!(identical.first.name, "sub");
        assert_eq!(identical.second.name, "rsb");
        assert_eq!(identical.set, "a32");
    }

    #[test]
    fn json_round_trip_decodes_the_same() {
        let set = set();
        let json = serde_json::to_string(set).unwrap();
        let loaded: TableSet = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.validate(), Ok(()));
        assert_eq!(&loaded, set);

        let ctx = DecodeContext::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2_000 {
            let word: u32 = rng.gen_range(0..=u32::MAX);
            let before = set.decode(word, &ctx).map(|d| (d.op, d.fields));
            let after = loaded.decode(word, &ctx).map(|d| (d.op, d.fields));
            assert_eq!(before, after);
        }
    }

    #[test]
    fn corrupted_load_is_rejected() {
        let mut loaded = set().clone();
        let IndexSlot::Canonical(add) = *loaded.index_slot(OperationId::Add) else {
            panic!("add has no canonical entry");
        };
        loaded.entries[add.index()].fields[0].bits = FieldRule::from_bits(&[40]);
        assert!(matches!(loaded.validate(), Err(BuildError::Invalid(_))));
    }

    #[test]
    fn flag_setting_entries() {
        let set = set();
        let flags = |op: OperationId| -> Vec<bool> {
            set.entries_of(op).map(|e| e.flags.writes_flags).collect()
        };
        for op in [OperationId::Adds, OperationId::VmrsApsr] {
            let seen = flags(op);
            assert!(!seen.is_empty() && seen.iter().all(|&w| w), "{op}: {seen:?}");
        }
        for op in [OperationId::Add, OperationId::Vmrs] {
            let seen = flags(op);
            assert!(!seen.is_empty() && seen.iter().all(|&w| !w), "{op}: {seen:?}");
        }
    }

    #[test]
    fn table_set_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TableSet>();
        assert_send_sync::<&'static TableSet>();
    }

    #[test]
    fn stream_over_bytes() {
        let program = [
            0x02, 0x00, 0x81, 0xE0, // add r0, r1, r2
            0xF0, 0x00, 0xF0, 0xE7, // udf
            0x1E, 0xFF, 0x2F, 0xE1, // bx lr
        ];
        let results: Vec<_> = set()
            .decode_stream(ByteCursor::new(&program), DecodeContext::default())
            .map(|(offset, _, r)| (offset, r.map(|d| d.op).ok()))
            .collect();
        assert_eq!(
            results,
            vec![
                (0, Some(OperationId::Add)),
                (4, None),
                (8, Some(OperationId::Bx)),
            ]
        );
    }
}

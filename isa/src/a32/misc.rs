//! Branches, status register access, hints, multiplies, saturating
//! arithmetic, synchronization primitives and the other small groups that
//! share the data processing space.

use crate::builder::Record;
use crate::operation::OperationId as Op;

pub fn records() -> Vec<Record> {
    let mut records = Vec::new();
    records.extend(branches());
    records.extend(status_and_hints());
    records.extend(miscellaneous());
    records.extend(multiplies());
    records.extend(halfword_multiplies());
    records.extend(synchronization());
    records
}

fn branches() -> Vec<Record> {
    vec![
        Record::op(Op::B, "cccc 1010 jjjj jjjj jjjj jjjj jjjj jjjj"),
        Record::op(Op::Bl, "cccc 1011 jjjj jjjj jjjj jjjj jjjj jjjj"),
        // H (bit 24) supplies bit 1 of the target.
        Record::op(Op::Blx, "1111 101y jjjj jjjj jjjj jjjj jjjj jjjj").decode_only(),
        Record::op(Op::Bx, "cccc 0001 0010 1111 1111 1111 0001 mmmm"),
        Record::op(Op::Bxj, "cccc 0001 0010 1111 1111 1111 0010 mmmm"),
        Record::op(Op::BlxInd, "cccc 0001 0010 1111 1111 1111 0011 mmmm"),
        Record::op(Op::Svc, "cccc 1111 iiii iiii iiii iiii iiii iiii"),
    ]
}

fn status_and_hints() -> Vec<Record> {
    let mut records = vec![
        // y: 0 reads CPSR, 1 reads SPSR.
        Record::op(Op::Mrs, "cccc 0001 0y00 1111 dddd 0000 0000 0000"),
        Record::op(Op::Msr, "cccc 0001 0y10 zzzz 1111 0000 0000 nnnn"),
        // CPSR with an empty mask is the hint space below.
        Record::op(Op::Msr, "cccc 0011 0y10 zzzz 1111 iiii iiii iiii"),
        Record::op(Op::Dbg, "cccc 0011 0010 0000 1111 0000 1111 iiii"),
        Record::op(Op::Movw, "cccc 0011 0000 iiii dddd iiii iiii iiii"),
        Record::op(Op::Movt, "cccc 0011 0100 iiii dddd iiii iiii iiii"),
    ];

    let hints = [
        (Op::Nop, "0000"),
        (Op::Yield, "0001"),
        (Op::Wfe, "0010"),
        (Op::Wfi, "0011"),
        (Op::Sev, "0100"),
    ];
    for (op, hint) in hints {
        records.push(Record::op(
            op,
            format!("cccc 0011 0010 0000 1111 0000 0000 {hint}"),
        ));
    }
    records.push(Record::op(Op::Sevl, "cccc 0011 0010 0000 1111 0000 0000 0101").v8());

    records
}

fn miscellaneous() -> Vec<Record> {
    let mut records = vec![
        Record::op(Op::Clz, "cccc 0001 0110 1111 dddd 1111 0001 mmmm"),
        Record::op(Op::Eret, "cccc 0001 0110 0000 0000 0000 0110 1110"),
        Record::op(Op::Bkpt, "cccc 0001 0010 iiii iiii iiii 0111 iiii"),
        Record::op(Op::Hvc, "cccc 0001 0100 iiii iiii iiii 0111 iiii"),
        Record::op(Op::Hlt, "cccc 0001 0000 iiii iiii iiii 0111 iiii").v8(),
        Record::op(Op::Crc32, "cccc 0001 0ZZ0 nnnn dddd 0000 0100 mmmm").v8(),
        Record::op(Op::Crc32c, "cccc 0001 0ZZ0 nnnn dddd 0010 0100 mmmm").v8(),
    ];

    let saturating = [
        (Op::Qadd, "00"),
        (Op::Qsub, "01"),
        (Op::Qdadd, "10"),
        (Op::Qdsub, "11"),
    ];
    for (op, opc) in saturating {
        records.push(Record::op(
            op,
            format!("cccc 0001 0{opc}0 nnnn dddd 0000 0101 mmmm"),
        ));
    }

    // Unpredicated barriers.
    records.push(Record::op(
        Op::Clrex,
        "1111 0101 0111 1111 1111 0000 0001 1111",
    ));
    for (op, opc) in [(Op::Dsb, "0100"), (Op::Dmb, "0101"), (Op::Isb, "0110")] {
        records.push(Record::op(
            op,
            format!("1111 0101 0111 1111 1111 0000 {opc} iiii"),
        ));
    }

    records
}

fn multiplies() -> Vec<Record> {
    let mut records = vec![
        Record::op(Op::Umaal, "cccc 0000 0100 HHHH LLLL mmmm 1001 nnnn"),
        Record::op(Op::Mls, "cccc 0000 0110 dddd aaaa mmmm 1001 nnnn"),
    ];

    let with_flags = [
        (Op::Mul, Op::Muls, "cccc 0000 000{s} dddd 0000 mmmm 1001 nnnn"),
        (Op::Mla, Op::Mlas, "cccc 0000 001{s} dddd aaaa mmmm 1001 nnnn"),
        (Op::Umull, Op::Umulls, "cccc 0000 100{s} HHHH LLLL mmmm 1001 nnnn"),
        (Op::Umlal, Op::Umlals, "cccc 0000 101{s} HHHH LLLL mmmm 1001 nnnn"),
        (Op::Smull, Op::Smulls, "cccc 0000 110{s} HHHH LLLL mmmm 1001 nnnn"),
        (Op::Smlal, Op::Smlals, "cccc 0000 111{s} HHHH LLLL mmmm 1001 nnnn"),
    ];
    for (plain, flag_setting, template) in with_flags {
        records.push(Record::op(plain, template.replace("{s}", "0")));
        records.push(Record::op(flag_setting, template.replace("{s}", "1")).writes_flags());
    }

    records
}

/// Signed 16x16 and 32x16 multiplies. The two selector bits pick the bottom
/// or top half of Rn (bit 5) and Rm (bit 6).
fn halfword_multiplies() -> Vec<Record> {
    let groups = [
        ("0000 dddd aaaa", [Op::Smlabb, Op::Smlatb, Op::Smlabt, Op::Smlatt]),
        ("0100 HHHH LLLL", [Op::Smlalbb, Op::Smlaltb, Op::Smlalbt, Op::Smlaltt]),
        ("0110 dddd 0000", [Op::Smulbb, Op::Smultb, Op::Smulbt, Op::Smultt]),
    ];

    let mut records = Vec::new();
    for (operands, ops) in groups {
        for (op, halves) in ops.into_iter().zip(["00", "01", "10", "11"]) {
            records.push(Record::op(
                op,
                format!("cccc 0001 {operands} mmmm 1{halves}0 nnnn"),
            ));
        }
    }

    records.extend([
        Record::op(Op::Smlawb, "cccc 0001 0010 dddd aaaa mmmm 1000 nnnn"),
        Record::op(Op::Smlawt, "cccc 0001 0010 dddd aaaa mmmm 1100 nnnn"),
        Record::op(Op::Smulwb, "cccc 0001 0010 dddd 0000 mmmm 1010 nnnn"),
        Record::op(Op::Smulwt, "cccc 0001 0010 dddd 0000 mmmm 1110 nnnn"),
    ]);
    records
}

/// Swaps, exclusives and load-acquire/store-release. Bits 9:8 select the
/// flavour: `11` exclusive, `10` exclusive with ordering, `00` ordered only.
fn synchronization() -> Vec<Record> {
    let mut records = vec![
        Record::op(Op::Swp, "cccc 0001 0000 nnnn tttt 0000 1001 TTTT"),
        Record::op(Op::Swpb, "cccc 0001 0100 nnnn tttt 0000 1001 TTTT"),
    ];

    let sizes = [
        ("00", [Op::Strex, Op::Ldrex, Op::Stlex, Op::Ldaex], Some((Op::Stl, Op::Lda))),
        ("01", [Op::Strexd, Op::Ldrexd, Op::Stlexd, Op::Ldaexd], None),
        ("10", [Op::Strexb, Op::Ldrexb, Op::Stlexb, Op::Ldaexb], Some((Op::Stlb, Op::Ldab))),
        ("11", [Op::Strexh, Op::Ldrexh, Op::Stlexh, Op::Ldaexh], Some((Op::Stlh, Op::Ldah))),
    ];

    for (size, [strex, ldrex, stlex, ldaex], ordered) in sizes {
        records.push(Record::op(
            strex,
            format!("cccc 0001 1{size}0 nnnn dddd 1111 1001 tttt"),
        ));
        records.push(Record::op(
            ldrex,
            format!("cccc 0001 1{size}1 nnnn tttt 1111 1001 1111"),
        ));
        records.push(
            Record::op(stlex, format!("cccc 0001 1{size}0 nnnn dddd 1110 1001 tttt")).v8(),
        );
        records.push(
            Record::op(ldaex, format!("cccc 0001 1{size}1 nnnn tttt 1110 1001 1111")).v8(),
        );
        // No ordered-only doubleword form.
        if let Some((stl, lda)) = ordered {
            records.push(
                Record::op(stl, format!("cccc 0001 1{size}0 nnnn 1111 1100 1001 tttt")).v8(),
            );
            records.push(
                Record::op(lda, format!("cccc 0001 1{size}1 nnnn tttt 1100 1001 1111")).v8(),
            );
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Target;
    use pretty_assertions::assert_eq;

    fn pattern_of(records: &[Record], op: Op) -> String {
        records
            .iter()
            .find(|r| r.target == Target::Op(op))
            .map(|r| r.pattern.clone())
            .unwrap_or_default()
    }

    #[test]
    fn halfword_selectors() {
        let records = halfword_multiplies();
        assert_eq!(
            pattern_of(&records, Op::Smlatb),
            "cccc 0001 0000 dddd aaaa mmmm 1010 nnnn"
        );
        assert_eq!(
            pattern_of(&records, Op::Smulbt),
            "cccc 0001 0110 dddd 0000 mmmm 1100 nnnn"
        );
    }

    #[test]
    fn synchronization_sizes() {
        let records = synchronization();
        assert_eq!(
            pattern_of(&records, Op::Ldrexh),
            "cccc 0001 1111 nnnn tttt 1111 1001 1111"
        );
        assert_eq!(
            pattern_of(&records, Op::Stlb),
            "cccc 0001 1100 nnnn 1111 1100 1001 tttt"
        );
        assert!(records.iter().all(|r| r.target != Target::Op(Op::Stl) || r.pattern.contains("1100 1001")));
        assert_eq!(records.len(), 2 + 4 * 4 + 3 * 2);
    }

    #[test]
    fn flag_setting_multiplies() {
        let records = multiplies();
        let muls = records
            .iter()
            .find(|r| r.target == Target::Op(Op::Muls))
            .unwrap();
        assert_eq!(muls.pattern, "cccc 0000 0001 dddd 0000 mmmm 1001 nnnn");
        assert!(muls.flags.writes_flags);
    }
}

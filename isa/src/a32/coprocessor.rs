//! # Coprocessor and Floating Point
//!
//! ```text
//! cccc 110x xxxx ──── ──── pppp ──── ────   loads, stores, register pairs
//! cccc 1110 xxxx ──── ──── pppp ───0 ────   data processing
//! cccc 1110 xxxx ──── ──── pppp ───1 ────   register transfers
//! ```
//!
//! Coprocessors 10 and 11 (`pppp` = `101Z`) are the floating point unit,
//! with Z selecting double precision. Every generic coprocessor record
//! excludes them.

use crate::builder::Record;
use crate::operation::OperationId as Op;

const FLOATING_POINT: &str = "---- ---- ---- ---- ---- 101- ---- ----";

pub fn records() -> Vec<Record> {
    let mut records = Vec::new();
    records.extend(generic());
    records.extend(arithmetic());
    records.extend(other_arithmetic());
    records.extend(transfers());
    records.extend(loads_and_stores());
    records
}

fn generic() -> Vec<Record> {
    let mut records = vec![
        Record::op(Op::Cdp, "cccc 1110 oooo NNNN CCCC pppp qqq0 MMMM"),
        Record::op(Op::Mcr, "cccc 1110 ooo0 NNNN tttt pppp qqq1 MMMM"),
        Record::op(Op::Mrc, "cccc 1110 ooo1 NNNN tttt pppp qqq1 MMMM"),
        Record::op(Op::Mcrr, "cccc 1100 0100 TTTT tttt pppp oooo MMMM"),
        Record::op(Op::Mrrc, "cccc 1100 0101 TTTT tttt pppp oooo MMMM"),
    ];

    // (D, L, op). D picks the long transfer.
    let transfers = [
        ('0', '0', Op::Stc),
        ('1', '0', Op::Stcl),
        ('0', '1', Op::Ldc),
        ('1', '1', Op::Ldcl),
    ];
    for (d, l, op) in transfers {
        let rest = "nnnn CCCC pppp iiii iiii";
        records.extend([
            Record::op(op, format!("cccc 1101 u{d}0{l} {rest}")),
            Record::op(op, format!("cccc 1101 u{d}1{l} {rest}")).decode_only(),
            Record::op(op, format!("cccc 1100 u{d}1{l} {rest}")).decode_only(),
            // Unindexed: the immediate is passed to the coprocessor.
            Record::op(op, format!("cccc 1100 1{d}0{l} {rest}")).decode_only(),
        ]);
    }

    records
        .into_iter()
        .map(|r| r.excluding(FLOATING_POINT))
        .collect()
}

/// Pushes the single and double precision records of one operation pair.
fn both_sizes(records: &mut Vec<Record>, (single, double): (Op, Op), pattern: impl Fn(char) -> String) {
    records.push(Record::op(single, pattern('0')));
    records.push(Record::op(double, pattern('1')));
}

/// Three-operand arithmetic. Bits 23, 21:20 and 6 pick the operation.
fn arithmetic() -> Vec<Record> {
    let ops = [
        ("0E00", '0', (Op::VmlaF32, Op::VmlaF64)),
        ("0E00", '1', (Op::VmlsF32, Op::VmlsF64)),
        ("0E01", '0', (Op::VnmlsF32, Op::VnmlsF64)),
        ("0E01", '1', (Op::VnmlaF32, Op::VnmlaF64)),
        ("0E10", '0', (Op::VmulF32, Op::VmulF64)),
        ("0E10", '1', (Op::VnmulF32, Op::VnmulF64)),
        ("0E11", '0', (Op::VaddF32, Op::VaddF64)),
        ("0E11", '1', (Op::VsubF32, Op::VsubF64)),
        ("1E00", '0', (Op::VdivF32, Op::VdivF64)),
        ("1E01", '0', (Op::VfnmsF32, Op::VfnmsF64)),
        ("1E01", '1', (Op::VfnmaF32, Op::VfnmaF64)),
        ("1E10", '0', (Op::VfmaF32, Op::VfmaF64)),
        ("1E10", '1', (Op::VfmsF32, Op::VfmsF64)),
    ];

    let mut records = Vec::new();
    for (opc, negate, pair) in ops {
        both_sizes(&mut records, pair, |z| {
            format!("cccc 1110 {opc} gggg eeee 101{z} G{negate}K0 kkkk")
        });
    }
    records
}

/// Two-operand arithmetic, compares and conversions: opcode 1E11, with
/// bits 19:16 and 7:6 picking the operation.
fn other_arithmetic() -> Vec<Record> {
    let mut records = Vec::new();
    let unary = |opc2: &str, bits: &str| {
        let (opc2, bits) = (opc2.to_owned(), bits.to_owned());
        move |z: char| format!("cccc 1110 1E11 {opc2} eeee 101{z} {bits}K0 kkkk")
    };

    // The register copy is canonical, the immediate form is the alternate.
    both_sizes(&mut records, (Op::VmovF32, Op::VmovF64), unary("0000", "01"));
    both_sizes(&mut records, (Op::VmovF32, Op::VmovF64), |z| {
        format!("cccc 1110 1E11 iiii eeee 101{z} 0000 iiii")
    });
    both_sizes(&mut records, (Op::VabsF32, Op::VabsF64), unary("0000", "11"));
    both_sizes(&mut records, (Op::VnegF32, Op::VnegF64), unary("0001", "01"));
    both_sizes(&mut records, (Op::VsqrtF32, Op::VsqrtF64), unary("0001", "11"));

    both_sizes(&mut records, (Op::VcmpF32, Op::VcmpF64), unary("0100", "01"));
    both_sizes(&mut records, (Op::VcmpeF32, Op::VcmpeF64), unary("0100", "11"));
    // Against zero.
    both_sizes(&mut records, (Op::VcmpF32, Op::VcmpF64), |z| {
        format!("cccc 1110 1E11 0101 eeee 101{z} 0100 0000")
    });
    both_sizes(&mut records, (Op::VcmpeF32, Op::VcmpeF64), |z| {
        format!("cccc 1110 1E11 0101 eeee 101{z} 1100 0000")
    });

    let rounding = [
        ("0110", "01", (Op::VrintrF32, Op::VrintrF64)),
        ("0110", "11", (Op::VrintzF32, Op::VrintzF64)),
        ("0111", "01", (Op::VrintxF32, Op::VrintxF64)),
    ];
    for (opc2, bits, (single, double)) in rounding {
        let pattern = unary(opc2, bits);
        records.push(Record::op(single, pattern('0')).v8());
        records.push(Record::op(double, pattern('1')).v8());
    }

    // Precision changes take their size from the source.
    records.push(Record::op(Op::VcvtF64F32, unary("0111", "11")('0')));
    records.push(Record::op(Op::VcvtF32F64, unary("0111", "11")('1')));

    // From integer: bit 7 is set for a signed source.
    both_sizes(&mut records, (Op::VcvtF32S32, Op::VcvtF64S32), unary("1000", "11"));
    both_sizes(&mut records, (Op::VcvtF32U32, Op::VcvtF64U32), unary("1000", "01"));

    // To integer: bit 7 clear rounds by FPSCR instead of toward zero.
    both_sizes(&mut records, (Op::VcvtU32F32, Op::VcvtU32F64), unary("1100", "11"));
    both_sizes(&mut records, (Op::VcvtS32F32, Op::VcvtS32F64), unary("1101", "11"));
    both_sizes(&mut records, (Op::VcvtrU32F32, Op::VcvtrU32F64), unary("1100", "01"));
    both_sizes(&mut records, (Op::VcvtrS32F32, Op::VcvtrS32F64), unary("1101", "01"));

    // Fixed point, converted in place. Bit 7 selects a 32-bit fixed point
    // value; those forms join the integer conversions of the same types.
    let fixed = [
        ("1010", (Op::VcvtF32S16, Op::VcvtF64S16), (Op::VcvtF32S32, Op::VcvtF64S32)),
        ("1011", (Op::VcvtF32U16, Op::VcvtF64U16), (Op::VcvtF32U32, Op::VcvtF64U32)),
        ("1110", (Op::VcvtS16F32, Op::VcvtS16F64), (Op::VcvtS32F32, Op::VcvtS32F64)),
        ("1111", (Op::VcvtU16F32, Op::VcvtU16F64), (Op::VcvtU32F32, Op::VcvtU32F64)),
    ];
    for (opc2, halfword, word) in fixed {
        both_sizes(&mut records, halfword, |z| {
            format!("cccc 1110 1E11 {opc2} eeee 101{z} 01i0 iiii")
        });
        both_sizes(&mut records, word, |z| {
            format!("cccc 1110 1E11 {opc2} eeee 101{z} 11i0 iiii")
        });
    }

    records
}

/// Moves between core registers and floating point or scalar registers.
fn transfers() -> Vec<Record> {
    let mut records = vec![
        // y (bit 20) set moves toward the core register.
        Record::op(Op::Vmov, "cccc 1110 000y gggg tttt 1010 G001 0000"),
        Record::op(Op::Vmov, "cccc 1100 010y TTTT tttt 101Z 00K1 kkkk"),
        Record::op(Op::Vmov32, "cccc 1110 00iy gggg tttt 1011 G001 0000"),
        Record::op(Op::Vmov16, "cccc 1110 00i0 gggg tttt 1011 Gi11 0000"),
        Record::op(Op::Vmov8, "cccc 1110 01i0 gggg tttt 1011 Gii1 0000"),
        Record::op(Op::VmovS16, "cccc 1110 00i1 gggg tttt 1011 Gi11 0000"),
        Record::op(Op::VmovU16, "cccc 1110 10i1 gggg tttt 1011 Gi11 0000"),
        Record::op(Op::VmovS8, "cccc 1110 01i1 gggg tttt 1011 Gii1 0000"),
        Record::op(Op::VmovU8, "cccc 1110 11i1 gggg tttt 1011 Gii1 0000"),
        Record::op(Op::Vdup32, "cccc 1110 10Q0 eeee tttt 1011 E001 0000"),
        Record::op(Op::Vdup16, "cccc 1110 10Q0 eeee tttt 1011 E011 0000"),
        Record::op(Op::Vdup8, "cccc 1110 11Q0 eeee tttt 1011 E001 0000"),
        Record::op(Op::Vmsr, "cccc 1110 1110 XXXX tttt 1010 0001 0000"),
        Record::op(Op::Vmrs, "cccc 1110 1111 XXXX tttt 1010 0001 0000"),
    ];
    // FPSCR flags into APSR.
    records.push(
        Record::op(Op::VmrsApsr, "cccc 1110 1111 0001 1111 1010 0001 0000").writes_flags(),
    );
    records
}

fn loads_and_stores() -> Vec<Record> {
    let rest = "nnnn eeee 101Z iiii iiii";
    vec![
        Record::op(Op::Vstr, format!("cccc 1101 uE00 {rest}")),
        Record::op(Op::Vldr, format!("cccc 1101 uE01 {rest}")),
        Record::op(Op::Vstmia, format!("cccc 1100 1EW0 {rest}")),
        Record::op(Op::Vldmia, format!("cccc 1100 1EW1 {rest}")),
        // Decrement-before always writes back.
        Record::op(Op::Vstmdb, format!("cccc 1101 0E10 {rest}")),
        Record::op(Op::Vldmdb, format!("cccc 1101 0E11 {rest}")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Target;
    use pretty_assertions::assert_eq;

    fn patterns(records: &[Record], op: Op) -> Vec<String> {
        records
            .iter()
            .filter(|r| r.target == Target::Op(op))
            .map(|r| r.pattern.clone())
            .collect()
    }

    #[test]
    fn generic_records_leave_the_fpu_alone() {
        let records = generic();
        assert!(
            records
                .iter()
                .all(|r| r.exclusions == vec![FLOATING_POINT.to_owned()])
        );
        assert_eq!(patterns(&records, Op::Ldcl).len(), 4);
        assert_eq!(records.iter().filter(|r| !r.flags.decode_only).count(), 9);
    }

    #[test]
    fn sizes_pick_the_coprocessor() {
        let records = arithmetic();
        assert_eq!(
            patterns(&records, Op::VfnmaF64),
            vec!["cccc 1110 1E01 gggg eeee 1011 G1K0 kkkk".to_owned()]
        );
        assert_eq!(
            patterns(&records, Op::VaddF32),
            vec!["cccc 1110 0E11 gggg eeee 1010 G0K0 kkkk".to_owned()]
        );
    }

    #[test]
    fn register_copy_comes_before_immediate() {
        let records = other_arithmetic();
        assert_eq!(
            patterns(&records, Op::VmovF64),
            vec![
                "cccc 1110 1E11 0000 eeee 1011 01K0 kkkk".to_owned(),
                "cccc 1110 1E11 iiii eeee 1011 0000 iiii".to_owned(),
            ]
        );
    }

    #[test]
    fn fixed_point_words_join_integer_conversions() {
        let records = other_arithmetic();
        assert_eq!(
            patterns(&records, Op::VcvtS32F64),
            vec![
                "cccc 1110 1E11 1101 eeee 1011 11K0 kkkk".to_owned(),
                "cccc 1110 1E11 1110 eeee 1011 11i0 iiii".to_owned(),
            ]
        );
        assert_eq!(
            patterns(&records, Op::VcvtU16F32),
            vec!["cccc 1110 1E11 1111 eeee 1010 01i0 iiii".to_owned()]
        );
    }
}

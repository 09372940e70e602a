//! # Media Instructions
//!
//! ```text
//! cccc 011x xxxx ──── ──── ──── xxx1 ────
//!         └ bits 24:20 and 7:5 pick the group
//! ```
//!
//! Parallel add/subtract, packing, extension, saturation, byte reversal,
//! the dual and most-significant-word multiplies, bitfields and the
//! permanently undefined `udf` space. Bit 4 is always set, which keeps the
//! group clear of the register-offset loads and stores.

use crate::builder::Record;
use crate::operation::OperationId as Op;

pub fn records() -> Vec<Record> {
    let mut records = Vec::new();
    records.extend(parallel());
    records.extend(packing());
    records.extend(saturate_and_reverse());
    records.extend(multiplies());
    records.extend(bitfields());
    records
}

/// `Ra` or `Rn` of 1111 turns an accumulating form into its plain one.
const RA_PC: &str = "---- ---- ---- ---- 1111 ---- ---- ----";
const RN_PC: &str = "---- ---- ---- 1111 ---- ---- ---- ----";

/// Signed, saturating, halving, unsigned, unsigned saturating and unsigned
/// halving, each with six lane operations.
fn parallel() -> Vec<Record> {
    let prefixes = [
        ("001", [Op::Sadd16, Op::Sasx, Op::Ssax, Op::Ssub16, Op::Sadd8, Op::Ssub8]),
        ("010", [Op::Qadd16, Op::Qasx, Op::Qsax, Op::Qsub16, Op::Qadd8, Op::Qsub8]),
        ("011", [Op::Shadd16, Op::Shasx, Op::Shsax, Op::Shsub16, Op::Shadd8, Op::Shsub8]),
        ("101", [Op::Uadd16, Op::Uasx, Op::Usax, Op::Usub16, Op::Uadd8, Op::Usub8]),
        ("110", [Op::Uqadd16, Op::Uqasx, Op::Uqsax, Op::Uqsub16, Op::Uqadd8, Op::Uqsub8]),
        ("111", [Op::Uhadd16, Op::Uhasx, Op::Uhsax, Op::Uhsub16, Op::Uhadd8, Op::Uhsub8]),
    ];
    let lanes = ["000", "001", "010", "011", "100", "111"];

    let mut records = Vec::new();
    for (prefix, ops) in prefixes {
        for (op, lane) in ops.into_iter().zip(lanes) {
            records.push(Record::op(
                op,
                format!("cccc 0110 0{prefix} nnnn dddd 1111 {lane}1 mmmm"),
            ));
        }
    }
    records
}

fn packing() -> Vec<Record> {
    let mut records = vec![
        Record::op(Op::Pkhbt, "cccc 0110 1000 nnnn dddd vvvv v001 mmmm"),
        Record::op(Op::Pkhtb, "cccc 0110 1000 nnnn dddd vvvv v101 mmmm"),
        Record::op(Op::Sel, "cccc 0110 1000 nnnn dddd 1111 1011 mmmm"),
    ];

    // (bits 22:20, extend and add, extend)
    let extends = [
        ("000", Op::Sxtab16, Op::Sxtb16),
        ("010", Op::Sxtab, Op::Sxtb),
        ("011", Op::Sxtah, Op::Sxth),
        ("100", Op::Uxtab16, Op::Uxtb16),
        ("110", Op::Uxtab, Op::Uxtb),
        ("111", Op::Uxtah, Op::Uxth),
    ];
    for (opc, accumulate, plain) in extends {
        records.push(
            Record::op(accumulate, format!("cccc 0110 1{opc} nnnn dddd RR00 0111 mmmm"))
                .excluding(RN_PC),
        );
        records.push(Record::op(
            plain,
            format!("cccc 0110 1{opc} 1111 dddd RR00 0111 mmmm"),
        ));
    }

    records
}

fn saturate_and_reverse() -> Vec<Record> {
    vec![
        Record::op(Op::Ssat, "cccc 0110 101S SSSS dddd vvvv vr01 nnnn"),
        Record::op(Op::Ssat16, "cccc 0110 1010 SSSS dddd 1111 0011 nnnn"),
        Record::op(Op::Usat, "cccc 0110 111S SSSS dddd vvvv vr01 nnnn"),
        Record::op(Op::Usat16, "cccc 0110 1110 SSSS dddd 1111 0011 nnnn"),
        Record::op(Op::Rev, "cccc 0110 1011 1111 dddd 1111 0011 mmmm"),
        Record::op(Op::Rev16, "cccc 0110 1011 1111 dddd 1111 1011 mmmm"),
        Record::op(Op::Rbit, "cccc 0110 1111 1111 dddd 1111 0011 mmmm"),
        Record::op(Op::Revsh, "cccc 0110 1111 1111 dddd 1111 1011 mmmm"),
    ]
}

fn multiplies() -> Vec<Record> {
    let mut records = Vec::new();

    // (bits 7:5, accumulating, plain). The plain forms have Ra = 1111.
    let dual = [
        ("000", Op::Smlad, Op::Smuad),
        ("001", Op::Smladx, Op::Smuadx),
        ("010", Op::Smlsd, Op::Smusd),
        ("011", Op::Smlsdx, Op::Smusdx),
    ];
    for (opc, accumulate, plain) in dual {
        records.push(
            Record::op(accumulate, format!("cccc 0111 0000 dddd aaaa mmmm {opc}1 nnnn"))
                .excluding(RA_PC),
        );
        records.push(Record::op(
            plain,
            format!("cccc 0111 0000 dddd 1111 mmmm {opc}1 nnnn"),
        ));
    }

    let long = [
        ("000", Op::Smlald),
        ("001", Op::Smlaldx),
        ("010", Op::Smlsld),
        ("011", Op::Smlsldx),
    ];
    for (opc, op) in long {
        records.push(Record::op(
            op,
            format!("cccc 0111 0100 HHHH LLLL mmmm {opc}1 nnnn"),
        ));
    }

    records.extend([
        Record::op(Op::Sdiv, "cccc 0111 0001 dddd 1111 mmmm 0001 nnnn"),
        Record::op(Op::Udiv, "cccc 0111 0011 dddd 1111 mmmm 0001 nnnn"),
    ]);

    // Most significant word. R (bit 5) rounds.
    let most_significant = [
        ("000", Op::Smmla, Some(Op::Smmul)),
        ("001", Op::Smmlar, Some(Op::Smmulr)),
        ("110", Op::Smmls, None),
        ("111", Op::Smmlsr, None),
    ];
    for (opc, accumulate, plain) in most_significant {
        let record = Record::op(accumulate, format!("cccc 0111 0101 dddd aaaa mmmm {opc}1 nnnn"));
        match plain {
            Some(plain) => records.extend([
                record.excluding(RA_PC),
                Record::op(plain, format!("cccc 0111 0101 dddd 1111 mmmm {opc}1 nnnn")),
            ]),
            None => records.push(record),
        }
    }

    records.extend([
        Record::op(Op::Usada8, "cccc 0111 1000 dddd aaaa mmmm 0001 nnnn").excluding(RA_PC),
        Record::op(Op::Usad8, "cccc 0111 1000 dddd 1111 mmmm 0001 nnnn"),
    ]);

    records
}

/// Bitfield extract, clear and insert, and the `udf` space that sits among
/// them.
fn bitfields() -> Vec<Record> {
    vec![
        Record::op(Op::Sbfx, "cccc 0111 101w wwww dddd bbbb b101 nnnn"),
        Record::op(Op::Ubfx, "cccc 0111 111w wwww dddd bbbb b101 nnnn"),
        Record::op(Op::Bfc, "cccc 0111 110f ffff dddd bbbb b001 1111"),
        Record::op(Op::Bfi, "cccc 0111 110f ffff dddd bbbb b001 nnnn")
            .excluding("---- ---- ---- ---- ---- ---- ---- 1111"),
        Record::reserved("udf", "cccc 0111 1111 iiii iiii iiii 1111 iiii"),
    ]
}

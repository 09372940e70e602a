//! # Data Processing
//!
//! ```text
//! ┌──────┬───┬───┬──────┬───┬──────┬──────┬─────────────────────┐
//! │ Cond │00 │ I │Opcode│ S │  Rn  │  Rd  │      Operand 2      │
//! │31..28│   │25 │24..21│20 │19..16│15..12│        11..0        │
//! └──────┴───┴───┴──────┴───┴──────┴──────┴─────────────────────┘
//!
//! Operand 2:  I=1  rotate:imm8            (canonical form)
//!             I=0  imm5 type 0 Rm         (shift by immediate)
//!             I=0  Rs 0 type 1 Rm         (shift by register)
//! ```
//!
//! The S bit is not a field: `add` and `adds` are separate operations, so
//! each gets its own records. The compare operations only exist with S set
//! and have no destination. `mov` with a shifted register is encoded as one
//! of the shift operations instead.

use crate::builder::Record;
use crate::operation::OperationId as Op;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Operands {
    /// Rd, Rn, operand 2.
    Both,
    /// Rn, operand 2. Sets flags only.
    Compare,
    /// Rd, operand 2.
    Move,
}

const OPCODES: [(&str, Option<Op>, Op, Operands); 16] = [
    ("0000", Some(Op::And), Op::Ands, Operands::Both),
    ("0001", Some(Op::Eor), Op::Eors, Operands::Both),
    ("0010", Some(Op::Sub), Op::Subs, Operands::Both),
    ("0011", Some(Op::Rsb), Op::Rsbs, Operands::Both),
    ("0100", Some(Op::Add), Op::Adds, Operands::Both),
    ("0101", Some(Op::Adc), Op::Adcs, Operands::Both),
    ("0110", Some(Op::Sbc), Op::Sbcs, Operands::Both),
    ("0111", Some(Op::Rsc), Op::Rscs, Operands::Both),
    ("1000", None, Op::Tst, Operands::Compare),
    ("1001", None, Op::Teq, Operands::Compare),
    ("1010", None, Op::Cmp, Operands::Compare),
    ("1011", None, Op::Cmn, Operands::Compare),
    ("1100", Some(Op::Orr), Op::Orrs, Operands::Both),
    ("1101", Some(Op::Mov), Op::Movs, Operands::Move),
    ("1110", Some(Op::Bic), Op::Bics, Operands::Both),
    ("1111", Some(Op::Mvn), Op::Mvns, Operands::Move),
];

/// lsl, lsr, asr, ror: shift type bits, without and with S.
const SHIFTS: [(&str, Op, Op); 4] = [
    ("00", Op::Lsl, Op::Lsls),
    ("01", Op::Lsr, Op::Lsrs),
    ("10", Op::Asr, Op::Asrs),
    ("11", Op::Ror, Op::Rors),
];

pub fn records() -> Vec<Record> {
    let mut records = Vec::new();

    for (opcode, plain, flag_setting, operands) in OPCODES {
        let (rn, rd) = match operands {
            Operands::Both => ("nnnn", "dddd"),
            Operands::Compare => ("nnnn", "0000"),
            Operands::Move => ("0000", "dddd"),
        };
        let forms = |s: char| {
            let mut forms = vec![format!("cccc 001{opcode}{s} {rn} {rd} iiii iiii iiii")];
            if plain == Some(Op::Mov) {
                forms.push(format!("cccc 000{opcode}{s} {rn} {rd} 0000 0000 mmmm"));
            } else {
                forms.push(format!("cccc 000{opcode}{s} {rn} {rd} vvvv vrr0 mmmm"));
                forms.push(format!("cccc 000{opcode}{s} {rn} {rd} ssss 0rr1 mmmm"));
            }
            forms
        };

        if let Some(op) = plain {
            records.extend(forms('0').into_iter().map(|f| Record::op(op, f)));
        }
        records.extend(
            forms('1')
                .into_iter()
                .map(|f| Record::op(flag_setting, f).writes_flags()),
        );
    }

    for (s, flags) in [('0', false), ('1', true)] {
        for (kind, plain, flag_setting) in SHIFTS {
            let op = if flags { flag_setting } else { plain };
            // Shift by register first: with an immediate of 0 the lsl and
            // ror forms read as mov and rrx.
            let by_register = format!("cccc 0001 101{s} 0000 dddd ssss 0{kind}1 mmmm");
            let by_immediate = format!("cccc 0001 101{s} 0000 dddd vvvv v{kind}0 mmmm");
            for pattern in [by_register, by_immediate] {
                let record = Record::op(op, pattern);
                records.push(if flags { record.writes_flags() } else { record });
            }
        }

        let rrx = format!("cccc 0001 101{s} 0000 dddd 0000 0110 mmmm");
        records.push(if flags {
            Record::op(Op::Rrxs, rrx).writes_flags()
        } else {
            Record::op(Op::Rrx, rrx)
        });
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_opcode_has_its_forms() {
        let records = records();
        let count = |op: Op| {
            records
                .iter()
                .filter(|r| r.target == crate::builder::Target::Op(op))
                .count()
        };
        assert_eq!(count(Op::Add), 3);
        assert_eq!(count(Op::Adds), 3);
        assert_eq!(count(Op::Cmp), 3);
        assert_eq!(count(Op::Mov), 2);
        assert_eq!(count(Op::Lsl), 2);
        assert_eq!(count(Op::Rrxs), 1);
    }

    #[test]
    fn compare_records_have_no_destination() {
        let records = records();
        let tst = records
            .iter()
            .find(|r| r.target == crate::builder::Target::Op(Op::Tst))
            .unwrap();
        assert_eq!(tst.pattern, "cccc 00110001 nnnn 0000 iiii iiii iiii");
        assert!(tst.flags.writes_flags);
    }
}

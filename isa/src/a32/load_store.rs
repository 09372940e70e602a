//! # Loads and Stores
//!
//! ```text
//! word/byte:   cccc 01IP UBWL nnnn tttt ──────── offset ─────────
//! extra:       cccc 000P UIWL nnnn tttt imm4 1 S H 1 imm4/Rm
//! block:       cccc 100P USWL nnnn ─────────── reglist ───────────
//! ```
//!
//! P/W pick the addressing mode. The offset form (P=1, W=0) is canonical.
//! Pre-indexed and post-indexed forms write the base back and are only
//! decoded. P=0 with W=1 is the unprivileged (`t`) variant of each access.

use crate::builder::Record;
use crate::operation::OperationId as Op;

pub fn records() -> Vec<Record> {
    let mut records = Vec::new();
    records.extend(word_and_byte());
    records.extend(extra());
    records.extend(block());
    records
}

fn word_and_byte() -> Vec<Record> {
    let mut records = Vec::new();

    // (B, L, op, unprivileged op)
    let accesses = [
        ('0', '0', Op::Str, Op::Strt),
        ('0', '1', Op::Ldr, Op::Ldrt),
        ('1', '0', Op::Strb, Op::Strbt),
        ('1', '1', Op::Ldrb, Op::Ldrbt),
    ];

    for (b, l, op, unprivileged) in accesses {
        let imm = "iiii iiii iiii";
        let reg = "vvvv vrr0 mmmm";
        records.extend([
            Record::op(op, format!("cccc 0101 u{b}0{l} nnnn tttt {imm}")),
            Record::op(op, format!("cccc 0111 u{b}0{l} nnnn tttt {reg}")),
            Record::op(op, format!("cccc 0101 u{b}1{l} nnnn tttt {imm}")).decode_only(),
            Record::op(op, format!("cccc 0100 u{b}0{l} nnnn tttt {imm}")).decode_only(),
            Record::op(op, format!("cccc 0111 u{b}1{l} nnnn tttt {reg}")).decode_only(),
            Record::op(op, format!("cccc 0110 u{b}0{l} nnnn tttt {reg}")).decode_only(),
            Record::op(unprivileged, format!("cccc 0100 u{b}1{l} nnnn tttt {imm}")),
            Record::op(unprivileged, format!("cccc 0110 u{b}1{l} nnnn tttt {reg}")),
        ]);
    }

    records
}

/// Halfword, signed byte and doubleword transfers.
fn extra() -> Vec<Record> {
    let mut records = Vec::new();

    // (L, S H, op, unprivileged op)
    let accesses = [
        ('0', "01", Op::Strh, Some(Op::Strht)),
        ('1', "01", Op::Ldrh, Some(Op::Ldrht)),
        ('0', "10", Op::Ldrd, None),
        ('1', "10", Op::Ldrsb, Some(Op::Ldrsbt)),
        ('0', "11", Op::Strd, None),
        ('1', "11", Op::Ldrsh, Some(Op::Ldrsht)),
    ];

    for (l, sh, op, unprivileged) in accesses {
        let imm = format!("iiii 1{sh}1 iiii");
        let reg = format!("0000 1{sh}1 mmmm");
        records.extend([
            Record::op(op, format!("cccc 0001 u10{l} nnnn tttt {imm}")),
            Record::op(op, format!("cccc 0001 u00{l} nnnn tttt {reg}")),
            Record::op(op, format!("cccc 0001 u11{l} nnnn tttt {imm}")).decode_only(),
            Record::op(op, format!("cccc 0001 u01{l} nnnn tttt {reg}")).decode_only(),
            Record::op(op, format!("cccc 0000 u10{l} nnnn tttt {imm}")).decode_only(),
            Record::op(op, format!("cccc 0000 u00{l} nnnn tttt {reg}")).decode_only(),
        ]);
        if let Some(unprivileged) = unprivileged {
            records.extend([
                Record::op(unprivileged, format!("cccc 0000 u11{l} nnnn tttt {imm}")),
                Record::op(unprivileged, format!("cccc 0000 u01{l} nnnn tttt {reg}")),
            ]);
        }
    }

    records
}

/// LDM/STM. The `_priv` forms set the S bit: user bank stores and loads, or
/// exception return.
fn block() -> Vec<Record> {
    let mut records = Vec::new();

    // (P U, store, load, privileged store, privileged load)
    let modes = [
        ("00", Op::Stmda, Op::Ldmda, Op::StmdaPriv, Op::LdmdaPriv),
        ("01", Op::Stm, Op::Ldm, Op::StmPriv, Op::LdmPriv),
        ("10", Op::Stmdb, Op::Ldmdb, Op::StmdbPriv, Op::LdmdbPriv),
        ("11", Op::Stmib, Op::Ldmib, Op::StmibPriv, Op::LdmibPriv),
    ];

    for (pu, store, load, store_priv, load_priv) in modes {
        let list = "nnnn xxxx xxxx xxxx xxxx";
        let (p, u) = pu.split_at(1);
        records.extend([
            Record::op(store, format!("cccc 100{p} {u}0W0 {list}")),
            Record::op(load, format!("cccc 100{p} {u}0W1 {list}")),
            Record::op(store_priv, format!("cccc 100{p} {u}100 {list}")),
        ]);
        // Increment-after splits the privileged load on W.
        if load_priv == Op::LdmPriv {
            records.extend([
                Record::op(Op::LdmPriv, format!("cccc 100{p} {u}101 {list}")),
                Record::op(Op::LdmiaPriv, format!("cccc 100{p} {u}111 {list}")),
            ]);
        } else {
            records.push(Record::op(load_priv, format!("cccc 100{p} {u}1W1 {list}")));
        }
    }

    records
}

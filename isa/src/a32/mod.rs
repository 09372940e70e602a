//! # A32 Encoding Table
//!
//! ```text
//!  roots:  1111 ──── ...   unconditional space (blx imm, barriers)
//!          ──── ──── ...   everything else, condition in 31:28
//!
//!  both root tables dispatch on bits 27:20, then refine on
//!  7:4, 11:8, 19:16, 3:0 and 15:12 in that order
//! ```
//!
//! The records of each group are declared in their own module. Within an
//! operation, the first record that is not decode-only is its canonical
//! encoding and the rest are its alternates.

mod coprocessor;
mod data_processing;
mod load_store;
mod media;
mod misc;

use crate::builder::{Record, RootDef, TableSetDef};
use crate::operation::OperationId;
use crate::rule::FieldRule;

/// Name of the A32 table set.
pub const NAME: &str = "a32";

#[must_use]
pub fn records() -> Vec<Record> {
    let mut records = Vec::new();
    records.extend(data_processing::records());
    records.extend(misc::records());
    records.extend(load_store::records());
    records.extend(media::records());
    records.extend(coprocessor::records());
    records
}

#[must_use]
pub fn definition() -> TableSetDef {
    let root = |guard: String| RootDef {
        guard,
        rule: FieldRule::bits(27, 20),
    };

    TableSetDef {
        name: NAME.to_owned(),
        roots: vec![root(format!("1111{}", "-".repeat(28))), root("-".repeat(32))],
        refinements: vec![
            FieldRule::bits(7, 4),
            FieldRule::bits(11, 8),
            FieldRule::bits(19, 16),
            FieldRule::bits(3, 0),
            FieldRule::bits(15, 12),
        ],
        records: records(),
        decode_only: vec![(
            OperationId::Blx,
            "no encode-side template for the unpredicated immediate form".to_owned(),
        )],
    }
}

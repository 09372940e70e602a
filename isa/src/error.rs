use crate::field::Role;
use crate::operation::OperationId;
use crate::template::Arch;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("{word:#010x} is not a valid encoding")]
    Undecodable { word: u32 },

    #[error("{word:#010x} falls in the reserved `{name}` space")]
    Reserved { word: u32, name: String },

    #[error("`{op}` requires {arch}")]
    RequiresArch { op: OperationId, arch: Arch },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("`{op}` cannot be encoded: {reason}")]
    UnencodableOperation { op: OperationId, reason: String },

    #[error("value {value} does not fit field `{role}` of `{op}`")]
    OperandOutOfRange {
        op: OperationId,
        role: Role,
        value: i64,
    },

    #[error("no form of `{op}` takes the given fields")]
    NoMatchingForm { op: OperationId },

    #[error("field `{role}` given twice for `{op}`")]
    DuplicateOperand { op: OperationId, role: Role },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictKind {
    /// Two records overlap and neither nests in the other.
    Ambiguous,
    /// Two records have the same fixed bits.
    Identical,
    /// Separating the records needs more than the allowed table depth.
    TooDeep,
    /// More records share one slot than a chain may hold.
    ChainTooLong,
}

/// One side of a conflict: what the record produces and its pattern text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub name: String,
    pub pattern: String,
}

impl fmt::Display for ConflictRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` ({})", self.name, self.pattern)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub set: String,
    pub kind: ConflictKind,
    pub first: ConflictRecord,
    pub second: ConflictRecord,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:?} between {} and {}",
            self.set, self.kind, self.first, self.second
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("{} construction conflict(s), first: {}", .0.len(), .0.first().map(ToString::to_string).unwrap_or_default())]
    Conflicts(Vec<Conflict>),

    #[error("bad pattern `{pattern}`: {reason}")]
    BadPattern { pattern: String, reason: String },

    #[error("invalid table set: {0}")]
    Invalid(String),
}

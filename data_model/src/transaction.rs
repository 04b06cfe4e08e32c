//! Transactions — ordered instruction sequences applied atomically on
//! behalf of one authority — and the reasons they get rejected.

use core::fmt;

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::isi::{
    error::{InstructionExecutionError, ValidationFail},
    InstructionBox,
};

/// Default limit on the number of instructions per transaction.
pub const DEFAULT_MAX_INSTRUCTION_NUMBER: u64 = 4096;

/// The executable linked to a transaction or a trigger action.
///
/// Kept as an enum so richer executables can slot in next to plain
/// instruction sequences.
#[derive(Debug, Clone, PartialEq, Eq, Decode, Encode, Deserialize, Serialize)]
pub enum Executable {
    /// An ordered sequence of instructions.
    Instructions(Vec<InstructionBox>),
}

impl Executable {
    /// Number of instructions this executable will run.
    pub fn len(&self) -> usize {
        match self {
            Self::Instructions(instructions) => instructions.len(),
        }
    }

    /// Whether the executable does nothing at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the contained instructions.
    pub fn instructions(&self) -> impl ExactSizeIterator<Item = &InstructionBox> {
        match self {
            Self::Instructions(instructions) => instructions.iter(),
        }
    }
}

impl From<Vec<InstructionBox>> for Executable {
    fn from(instructions: Vec<InstructionBox>) -> Self {
        Self::Instructions(instructions)
    }
}

impl<T: Into<InstructionBox>, const N: usize> From<[T; N]> for Executable {
    fn from(instructions: [T; N]) -> Self {
        Self::Instructions(instructions.into_iter().map(Into::into).collect())
    }
}

impl FromIterator<InstructionBox> for Executable {
    fn from_iter<T: IntoIterator<Item = InstructionBox>>(iter: T) -> Self {
        Self::Instructions(iter.into_iter().collect())
    }
}

/// Limits to which every transaction must adhere.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Decode, Encode, Deserialize, Serialize,
)]
pub struct TransactionLimits {
    /// Maximum number of instructions per transaction.
    pub max_instruction_number: u64,
}

impl Default for TransactionLimits {
    fn default() -> Self {
        Self {
            max_instruction_number: DEFAULT_MAX_INSTRUCTION_NUMBER,
        }
    }
}

/// Transaction exceeded one of the configured [`TransactionLimits`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Decode, Encode, Deserialize, Serialize)]
#[error("Transaction rejected due to limits: {reason}")]
pub struct TransactionLimitError {
    /// Which limit was exceeded and by how much.
    pub reason: String,
}

/// An instruction of the transaction failed to execute.
#[derive(Debug, Clone, PartialEq, Eq, Decode, Encode, Deserialize, Serialize)]
pub struct InstructionExecutionFail {
    /// The offending instruction.
    pub instruction: InstructionBox,
    /// Error which happened during execution.
    pub reason: String,
}

impl fmt::Display for InstructionExecutionFail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to execute instruction `{}`: {}",
            self.instruction, self.reason
        )
    }
}

impl std::error::Error for InstructionExecutionFail {}

impl InstructionExecutionFail {
    /// Record `error` as the rejection reason for `instruction`.
    pub fn new(instruction: InstructionBox, error: &InstructionExecutionError) -> Self {
        Self {
            instruction,
            reason: error.to_string(),
        }
    }
}

/// Every reason a transaction can be thrown away instead of committed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Decode, Encode, Deserialize, Serialize)]
pub enum TransactionRejectionReason {
    /// Transaction broke a transaction limit.
    #[error("Transaction rejected due to limits")]
    LimitCheck(#[from] TransactionLimitError),
    /// The permission validator vetoed an instruction.
    #[error("Transaction rejected by the validator")]
    Validation(#[from] ValidationFail),
    /// An instruction failed during execution.
    #[error("Transaction rejected during execution")]
    InstructionExecution(#[from] InstructionExecutionFail),
}

/// The prelude re-exports most commonly used items from this module.
pub mod prelude {
    pub use super::{
        Executable, InstructionExecutionFail, TransactionLimitError, TransactionLimits,
        TransactionRejectionReason,
    };
}

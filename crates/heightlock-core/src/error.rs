use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::constants::*;
use crate::types::{Balance, Height};

/// Numeric error code reported inline in a call's receipt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u32);

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u{}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum HeightlockError {
    // ── Ledger transfer errors ───────────────────────────────────────────────
    #[error("insufficient balance: need {need}, have {have}")]
    InsufficientBalance { need: Balance, have: Balance },

    #[error("sender and recipient are the same account")]
    SelfTransfer,

    #[error("transfer amount must be greater than zero")]
    NonPositiveAmount,

    // ── Wallet errors ────────────────────────────────────────────────────────
    #[error("only the wallet owner may lock funds")]
    NotOwner,

    #[error("wallet is already funded")]
    AlreadyFunded,

    #[error("unlock height {unlock_height} is not above current height {height}")]
    UnlockInPast { unlock_height: Height, height: Height },

    #[error("lock amount must be greater than zero")]
    NoValue,

    #[error("only the current beneficiary may do this")]
    NotBeneficiary,

    #[error("unlock height {unlock_height} not reached (current height {height})")]
    UnlockHeightNotReached { unlock_height: Height, height: Height },

    #[error("wallet balance was already claimed at height {claimed_at}")]
    AlreadyClaimed { claimed_at: Height },

    // ── Engine / registry ────────────────────────────────────────────────────
    #[error("unknown contract: {0}")]
    UnknownContract(String),

    #[error("contract {contract} does not expose `{call}`")]
    UnsupportedCall { contract: String, call: &'static str },

    #[error("unknown account: {0}")]
    UnknownAccount(String),

    // ── Genesis ──────────────────────────────────────────────────────────────
    #[error("genesis already applied to this database")]
    GenesisAlreadyApplied,

    #[error("invalid genesis parameters: {0}")]
    InvalidGenesis(String),

    // ── Serialization / storage ──────────────────────────────────────────────
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl HeightlockError {
    /// Stable code for errors that are reported inline in a receipt.
    ///
    /// `None` means the failure is not a call outcome (storage, registry,
    /// genesis) and aborts the engine call instead.
    pub fn code(&self) -> Option<ErrorCode> {
        let code = match self {
            HeightlockError::InsufficientBalance { .. } => ERR_INSUFFICIENT_BALANCE,
            HeightlockError::SelfTransfer => ERR_SELF_TRANSFER,
            HeightlockError::NonPositiveAmount => ERR_NON_POSITIVE_AMOUNT,
            HeightlockError::NotOwner => ERR_NOT_OWNER,
            HeightlockError::AlreadyFunded => ERR_ALREADY_FUNDED,
            HeightlockError::UnlockInPast { .. } => ERR_UNLOCK_IN_PAST,
            HeightlockError::NoValue => ERR_NO_VALUE,
            HeightlockError::NotBeneficiary => ERR_NOT_BENEFICIARY,
            HeightlockError::UnlockHeightNotReached { .. } => ERR_UNLOCK_HEIGHT_NOT_REACHED,
            HeightlockError::AlreadyClaimed { .. } => ERR_ALREADY_CLAIMED,
            _ => return None,
        };
        Some(ErrorCode(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_codes_are_stable() {
        assert_eq!(HeightlockError::NotOwner.code(), Some(ErrorCode(100)));
        assert_eq!(HeightlockError::AlreadyFunded.code(), Some(ErrorCode(101)));
        assert_eq!(HeightlockError::NotBeneficiary.code(), Some(ErrorCode(104)));
        assert_eq!(
            HeightlockError::UnlockHeightNotReached { unlock_height: 10, height: 9 }.code(),
            Some(ErrorCode(105))
        );
    }

    #[test]
    fn infrastructure_errors_have_no_code() {
        assert_eq!(HeightlockError::Storage("disk".into()).code(), None);
        assert_eq!(HeightlockError::UnknownContract("x".into()).code(), None);
    }
}

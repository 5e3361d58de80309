use serde::{Deserialize, Serialize};

use crate::error::HeightlockError;
use crate::types::{AccountId, Balance, Height, TxId};

// ── Call ──────────────────────────────────────────────────────────────────────

/// A public contract function together with its arguments.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Call {
    /// Fund a time-locked wallet. Owner only, once.
    Lock {
        beneficiary: AccountId,
        unlock_height: Height,
        amount: Balance,
    },

    /// Hand the claim right to `new_beneficiary`. Current beneficiary only.
    Bestow { new_beneficiary: AccountId },

    /// Withdraw the whole escrow once the unlock height is reached.
    Claim,

    /// Claimant entry point: claim its wallet and split the proceeds.
    Disburse,
}

impl Call {
    /// Public function name as exposed by the contract.
    pub fn function_name(&self) -> &'static str {
        match self {
            Call::Lock { .. } => "lock",
            Call::Bestow { .. } => "bestow",
            Call::Claim => "claim",
            Call::Disburse => "disburse",
        }
    }
}

// ── Transaction ───────────────────────────────────────────────────────────────

/// A contract call submitted by `sender`.
///
/// The host authenticates `sender` before the call runs; contracts treat it
/// as the caller identity.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub sender: AccountId,
    pub contract: AccountId,
    pub call: Call,
}

impl Transaction {
    pub fn new(sender: &AccountId, contract: &AccountId, call: Call) -> Self {
        Self {
            sender: sender.clone(),
            contract: contract.clone(),
            call,
        }
    }

    /// Identifier of this transaction when executed as entry `index` of the
    /// block at `height`.
    pub fn tx_id(&self, height: Height, index: u32) -> Result<TxId, HeightlockError> {
        let body = bincode::serialize(self)
            .map_err(|e| HeightlockError::Serialization(e.to_string()))?;
        let mut hasher = blake3::Hasher::new();
        hasher.update(&body);
        hasher.update(&height.to_le_bytes());
        hasher.update(&index.to_le_bytes());
        Ok(TxId(*hasher.finalize().as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tx_id_depends_on_position() {
        let deployer = AccountId::from_label("deployer");
        let wallet = AccountId::contract(&deployer, "timelocked-wallet");
        let tx = Transaction::new(&deployer, &wallet, Call::Claim);
        let a = tx.tx_id(3, 0).unwrap();
        assert_eq!(a, tx.tx_id(3, 0).unwrap());
        assert_ne!(a, tx.tx_id(3, 1).unwrap());
        assert_ne!(a, tx.tx_id(4, 0).unwrap());
    }

    #[test]
    fn calls_serialize_as_json() {
        let call = Call::Lock {
            beneficiary: AccountId::from_label("wallet_1"),
            unlock_height: 10,
            amount: 1000,
        };
        let json = serde_json::to_string(&call).unwrap();
        let back: Call = serde_json::from_str(&json).unwrap();
        assert_eq!(back, call);
        assert_eq!(back.function_name(), "lock");
    }
}

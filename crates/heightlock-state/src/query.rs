use heightlock_core::contract::{Contract, WalletPhase, WalletState};
use heightlock_core::error::HeightlockError;
use heightlock_core::types::{AccountId, Height};

use crate::db::StateDb;

/// Query helpers for time-locked wallets.
pub struct WalletQuery<'a> {
    db: &'a StateDb,
}

impl<'a> WalletQuery<'a> {
    pub fn new(db: &'a StateDb) -> Self {
        Self { db }
    }

    /// Fetch a wallet by its contract identity.
    pub fn get(&self, id: &AccountId) -> Result<Option<WalletState>, HeightlockError> {
        match self.db.get_contract(id)? {
            Some(Contract::TimeLockedWallet(state)) => Ok(Some(state)),
            _ => Ok(None),
        }
    }

    /// Returns true if the wallet is funded and `height` has reached its unlock height.
    pub fn is_unlocked(&self, id: &AccountId, height: Height) -> Result<bool, HeightlockError> {
        match self.get(id)? {
            Some(w) => Ok(w.is_funded() && height >= w.unlock_height),
            None => Err(HeightlockError::UnknownContract(id.to_string())),
        }
    }

    /// Human-readable summary of a wallet's state.
    pub fn describe(&self, id: &AccountId, height: Height) -> Result<String, HeightlockError> {
        let w = self
            .get(id)?
            .ok_or_else(|| HeightlockError::UnknownContract(id.to_string()))?;

        let status = match &w.phase {
            WalletPhase::Unfunded => "Unfunded, awaiting lock by owner".to_string(),
            WalletPhase::Funded if height < w.unlock_height => format!(
                "Locked until height {} ({} blocks left)",
                w.unlock_height,
                w.unlock_height - height
            ),
            WalletPhase::Funded => format!("Unlocked since height {}, ready to claim", w.unlock_height),
            WalletPhase::Claimed { claimed_at } => format!("Claimed at height {}", claimed_at),
        };
        let beneficiary = w
            .beneficiary
            .as_ref()
            .map(|b| b.to_string())
            .unwrap_or_else(|| "none".into());

        Ok(format!(
            "Wallet {} | {} escrowed | owner: {} | beneficiary: {} | {}",
            w.id, w.balance, w.owner, beneficiary, status
        ))
    }
}

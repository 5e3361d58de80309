use serde::{Deserialize, Serialize};

use crate::constants::CLAIMANT_RECIPIENT_COUNT;
use crate::types::{AccountId, Balance, Height};

// ── Time-locked wallet ────────────────────────────────────────────────────────

/// Lifecycle of a time-locked wallet.
///
///   Unfunded → Funded (lock, by owner) → Claimed (claim, by beneficiary)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum WalletPhase {
    /// Deployed, nothing escrowed yet.
    Unfunded,
    /// Escrow held until `unlock_height`.
    Funded,
    /// Escrow released to the beneficiary. Terminal.
    Claimed { claimed_at: Height },
}

/// Persistent state of one deployed time-locked wallet.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletState {
    /// The wallet's own identity; escrowed funds sit in this account.
    pub id: AccountId,
    /// Deployer. Only identity allowed to fund the wallet.
    pub owner: AccountId,
    /// Current holder of the claim right. `None` until funded.
    pub beneficiary: Option<AccountId>,
    pub unlock_height: Height,
    /// Amount held in escrow. Zero before funding and after the claim.
    pub balance: Balance,
    pub phase: WalletPhase,
}

impl WalletState {
    pub fn new(id: AccountId, owner: AccountId) -> Self {
        Self {
            id,
            owner,
            beneficiary: None,
            unlock_height: 0,
            balance: 0,
            phase: WalletPhase::Unfunded,
        }
    }

    pub fn is_funded(&self) -> bool {
        self.phase != WalletPhase::Unfunded
    }

    pub fn is_claimed(&self) -> bool {
        matches!(self.phase, WalletPhase::Claimed { .. })
    }

    pub fn is_beneficiary(&self, id: &AccountId) -> bool {
        self.beneficiary.as_ref() == Some(id)
    }
}

// ── Claimant ──────────────────────────────────────────────────────────────────

/// Configuration of a deployed claimant. Holds no mutable state.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClaimantConfig {
    pub id: AccountId,
    /// The wallet this claimant claims from.
    pub wallet: AccountId,
    /// Share recipients, paid in this order.
    pub recipients: [AccountId; CLAIMANT_RECIPIENT_COUNT],
}

// ── Contract registry entry ───────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Contract {
    TimeLockedWallet(WalletState),
    Claimant(ClaimantConfig),
}

impl Contract {
    pub fn id(&self) -> &AccountId {
        match self {
            Contract::TimeLockedWallet(w) => &w.id,
            Contract::Claimant(c) => &c.id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Contract::TimeLockedWallet(_) => "timelocked-wallet",
            Contract::Claimant(_) => "claimant",
        }
    }
}

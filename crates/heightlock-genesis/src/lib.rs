//! heightlock-genesis
//!
//! Builds the initial chain state, writing directly into a `StateDb` without
//! going through the engine: funded accounts, the time-locked wallet deployed
//! by the deployer, and the claimant wired to that wallet.
//!
//! Genesis may only be applied to an empty database. The chain starts at
//! `GENESIS_HEIGHT`.

pub mod params;

pub use params::{GenesisAccount, GenesisParams};

use heightlock_core::account::Account;
use heightlock_core::constants::GENESIS_HEIGHT;
use heightlock_core::contract::{ClaimantConfig, Contract, WalletState};
use heightlock_core::error::HeightlockError;
use heightlock_core::types::AccountId;
use heightlock_state::StateDb;
use tracing::info;

/// Identities created by genesis.
#[derive(Clone, Debug)]
pub struct GenesisAccounts {
    pub deployer: AccountId,
    pub wallet: AccountId,
    pub claimant: AccountId,
    pub recipients: [AccountId; 4],
}

/// Apply the genesis state to an empty `StateDb`.
pub fn apply_genesis(db: &StateDb, params: &GenesisParams) -> Result<GenesisAccounts, HeightlockError> {
    if !db.is_empty() {
        return Err(HeightlockError::GenesisAlreadyApplied);
    }
    params.validate()?;
    info!(accounts = params.accounts.len(), "applying genesis state");

    // ── 1. Funded accounts ───────────────────────────────────────────────────
    for a in &params.accounts {
        let id = AccountId::from_label(&a.label);
        db.put_account(&Account::labelled(id.clone(), &a.label, a.balance))?;
        info!(account = %id, label = %a.label, balance = a.balance, "genesis: account");
    }

    // ── 2. Contract deployments ──────────────────────────────────────────────
    let deployer = AccountId::from_label(&params.deployer);
    let wallet = AccountId::contract(&deployer, &params.wallet_contract);
    let claimant = AccountId::contract(&deployer, &params.claimant_contract);
    let recipients = params.recipients.each_ref().map(|l| AccountId::from_label(l));

    db.put_account(&Account::labelled(wallet.clone(), &params.wallet_contract, 0))?;
    db.put_contract(&Contract::TimeLockedWallet(WalletState::new(wallet.clone(), deployer.clone())))?;
    info!(contract = %wallet, owner = %deployer, "genesis: time-locked wallet deployed");

    db.put_account(&Account::labelled(claimant.clone(), &params.claimant_contract, 0))?;
    db.put_contract(&Contract::Claimant(ClaimantConfig {
        id: claimant.clone(),
        wallet: wallet.clone(),
        recipients: recipients.clone(),
    }))?;
    info!(contract = %claimant, wallet = %wallet, "genesis: claimant deployed");

    db.set_height(GENESIS_HEIGHT)?;
    db.flush()?;

    Ok(GenesisAccounts { deployer, wallet, claimant, recipients })
}

use std::collections::BTreeMap;
use std::sync::Arc;

use heightlock_core::constants::GENESIS_HEIGHT;
use heightlock_core::contract::{Contract, WalletState};
use heightlock_core::error::HeightlockError;
use heightlock_core::ledger::Ledger;
use heightlock_core::receipt::{to_call_result, Block, Receipt};
use heightlock_core::transaction::{Call, Transaction};
use heightlock_core::types::{AccountId, Height};
use heightlock_timelock::{SmartClaimant, TimeLockedWallet};
use tracing::{info, warn};

use crate::db::StateDb;
use crate::staged::StagedLedger;

// ── Staged block ──────────────────────────────────────────────────────────────

/// Every state change of a block, held back until the whole block has run.
struct StagedBlock<'a> {
    ledger: StagedLedger<'a>,
    wallets: BTreeMap<AccountId, WalletState>,
}

impl<'a> StagedBlock<'a> {
    fn new(db: &'a StateDb, height: Height) -> Self {
        Self {
            ledger: StagedLedger::new(db, height),
            wallets: BTreeMap::new(),
        }
    }
}

// ── StateEngine ───────────────────────────────────────────────────────────────

/// Executes contract calls against the state database, one block at a time.
///
/// Calls in a block share one [`StagedBlock`]. Contract-level failures roll
/// back inside the call and still produce a receipt; an infrastructure error
/// aborts the block and nothing is written.
pub struct StateEngine {
    pub db: Arc<StateDb>,
}

impl StateEngine {
    pub fn new(db: Arc<StateDb>) -> Self {
        Self { db }
    }

    pub fn height(&self) -> Result<Height, HeightlockError> {
        self.db.height()
    }

    /// Execute a single transaction in a block of its own.
    pub fn apply(&self, tx: &Transaction) -> Result<Receipt, HeightlockError> {
        let mut block = self.mine_block(std::slice::from_ref(tx))?;
        block
            .receipts
            .pop()
            .ok_or_else(|| HeightlockError::Storage("mined block lost its receipt".into()))
    }

    /// Execute `txs` in order at the current height, store the block and
    /// advance the height by one.
    pub fn mine_block(&self, txs: &[Transaction]) -> Result<Block, HeightlockError> {
        let height = self.height()?;
        if height < GENESIS_HEIGHT {
            return Err(HeightlockError::InvalidGenesis("genesis has not been applied".into()));
        }

        let mut staged = StagedBlock::new(&self.db, height);
        let mut receipts = Vec::with_capacity(txs.len());
        for (index, tx) in txs.iter().enumerate() {
            receipts.push(self.execute(&mut staged, tx, height, index as u32)?);
        }

        // ── Commit ────────────────────────────────────────────────────────────
        staged.ledger.commit()?;
        for state in staged.wallets.into_values() {
            self.db.put_contract(&Contract::TimeLockedWallet(state))?;
        }
        let block = Block { height, receipts };
        self.db.put_block(&block)?;
        self.db.set_height(height + 1)?;
        info!(height, txs = block.receipts.len(), "mined block");
        Ok(block)
    }

    /// Mine empty blocks until the chain reaches `target`.
    pub fn mine_empty_block_until(&self, target: Height) -> Result<Height, HeightlockError> {
        while self.height()? < target {
            self.mine_block(&[])?;
        }
        self.height()
    }

    // ── Call dispatch ─────────────────────────────────────────────────────────

    fn execute(
        &self,
        staged: &mut StagedBlock<'_>,
        tx: &Transaction,
        height: Height,
        index: u32,
    ) -> Result<Receipt, HeightlockError> {
        let tx_id = tx.tx_id(height, index)?;
        let contract = self
            .db
            .get_contract(&tx.contract)?
            .ok_or_else(|| HeightlockError::UnknownContract(tx.contract.to_string()))?;

        let (out, wallet) = match (&contract, &tx.call) {
            (Contract::TimeLockedWallet(_), call) => {
                let mut wallet = TimeLockedWallet::new(self.wallet_state(staged, &tx.contract)?);
                let out = staged.ledger.atomic(|l| match call {
                    Call::Lock { beneficiary, unlock_height, amount } => {
                        wallet.lock(l, &tx.sender, beneficiary, *unlock_height, *amount)
                    }
                    Call::Bestow { new_beneficiary } => wallet.bestow(&tx.sender, new_beneficiary),
                    Call::Claim => wallet.claim(l, &tx.sender),
                    Call::Disburse => Err(HeightlockError::UnsupportedCall {
                        contract: tx.contract.to_string(),
                        call: call.function_name(),
                    }),
                });
                (out, wallet)
            }
            (Contract::Claimant(config), Call::Disburse) => {
                let mut wallet = TimeLockedWallet::new(self.wallet_state(staged, &config.wallet)?);
                let out = SmartClaimant::new(config.clone()).disburse(&mut staged.ledger, &mut wallet, &tx.sender);
                (out, wallet)
            }
            (Contract::Claimant(_), call) => {
                return Err(HeightlockError::UnsupportedCall {
                    contract: tx.contract.to_string(),
                    call: call.function_name(),
                })
            }
        };

        let result = to_call_result(out)?;
        let events = staged.ledger.take_events();
        let after = wallet.into_state();
        if self.wallet_state(staged, &after.id)? != after {
            staged.wallets.insert(after.id.clone(), after);
        }

        match &result {
            Ok(_) => info!(%tx_id, function = tx.call.function_name(), height, events = events.len(), "applied call"),
            Err(code) => warn!(%tx_id, function = tx.call.function_name(), height, %code, events = events.len(), "call rejected"),
        }

        Ok(Receipt {
            tx_id,
            height,
            sender: tx.sender.clone(),
            contract: tx.contract.clone(),
            function: tx.call.function_name().to_string(),
            result,
            events,
        })
    }

    /// Latest wallet state, preferring changes staged earlier in the block.
    fn wallet_state(&self, staged: &StagedBlock<'_>, id: &AccountId) -> Result<WalletState, HeightlockError> {
        if let Some(state) = staged.wallets.get(id) {
            return Ok(state.clone());
        }
        match self.db.get_contract(id)? {
            Some(Contract::TimeLockedWallet(state)) => Ok(state),
            _ => Err(HeightlockError::UnknownContract(id.to_string())),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

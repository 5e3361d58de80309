use std::collections::BTreeMap;

use heightlock_core::account::Account;
use heightlock_core::error::HeightlockError;
use heightlock_core::ledger::{check_transfer, Ledger};
use heightlock_core::receipt::TransferEvent;
use heightlock_core::types::{AccountId, Balance, Height};
use tracing::debug;

use crate::db::StateDb;

/// Balance changes of one block, held in memory on top of the state DB.
///
/// Nothing reaches the database until [`StagedLedger::commit`]. Dropping the
/// overlay discards every staged change.
#[derive(Clone)]
pub struct StagedLedger<'a> {
    db: &'a StateDb,
    height: Height,
    balances: BTreeMap<AccountId, Balance>,
    events: Vec<TransferEvent>,
}

impl<'a> StagedLedger<'a> {
    pub fn new(db: &'a StateDb, height: Height) -> Self {
        Self {
            db,
            height,
            balances: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    /// Hand out the events recorded since the last call, leaving the
    /// balance changes staged.
    pub fn take_events(&mut self) -> Vec<TransferEvent> {
        std::mem::take(&mut self.events)
    }

    /// Write every touched balance back to the database.
    pub fn commit(self) -> Result<(), HeightlockError> {
        for (id, balance) in &self.balances {
            let mut account = self
                .db
                .get_account(id)?
                .unwrap_or_else(|| Account::new(id.clone()));
            account.balance = *balance;
            self.db.put_account(&account)?;
        }
        debug!(height = self.height, accounts = self.balances.len(), "staged balances committed");
        Ok(())
    }
}

impl Ledger for StagedLedger<'_> {
    fn height(&self) -> Height {
        self.height
    }

    fn balance(&self, id: &AccountId) -> Result<Balance, HeightlockError> {
        match self.balances.get(id) {
            Some(b) => Ok(*b),
            None => self.db.balance(id),
        }
    }

    fn transfer(
        &mut self,
        amount: Balance,
        sender: &AccountId,
        recipient: &AccountId,
    ) -> Result<(), HeightlockError> {
        let have = self.balance(sender)?;
        check_transfer(amount, sender, recipient, have)?;
        let received = self.balance(recipient)?;

        self.balances.insert(sender.clone(), have - amount);
        self.balances.insert(recipient.clone(), received + amount);
        self.events.push(TransferEvent::new(amount, sender, recipient));
        debug!(amount, %sender, %recipient, "staged transfer");
        Ok(())
    }

    fn events(&self) -> &[TransferEvent] {
        &self.events
    }
}

//! The host ledger as seen by contract code.
//!
//! Contracts never touch storage directly. They read the current height and
//! balances, and move funds, through the [`Ledger`] trait. The host decides
//! whether the effects of a call are committed.

use std::collections::BTreeMap;

use crate::error::HeightlockError;
use crate::receipt::TransferEvent;
use crate::types::{AccountId, Balance, Height};

pub trait Ledger {
    /// Current height. Constant for the duration of a call.
    fn height(&self) -> Height;

    fn balance(&self, id: &AccountId) -> Result<Balance, HeightlockError>;

    /// Move `amount` from `sender` to `recipient`, recording one transfer event.
    fn transfer(
        &mut self,
        amount: Balance,
        sender: &AccountId,
        recipient: &AccountId,
    ) -> Result<(), HeightlockError>;

    /// Transfer events recorded so far, in order.
    fn events(&self) -> &[TransferEvent];

    /// Run `f` as one unit: if it fails, every balance change and event it
    /// produced is discarded.
    fn atomic<T, F>(&mut self, f: F) -> Result<T, HeightlockError>
    where
        Self: Sized + Clone,
        F: FnOnce(&mut Self) -> Result<T, HeightlockError>,
    {
        let saved = self.clone();
        let out = f(self);
        if out.is_err() {
            *self = saved;
        }
        out
    }
}

/// Validate a native transfer against the sender's current balance.
///
/// Check order follows the host: amount, then distinct parties, then funds.
pub fn check_transfer(
    amount: Balance,
    sender: &AccountId,
    recipient: &AccountId,
    have: Balance,
) -> Result<(), HeightlockError> {
    if amount == 0 {
        return Err(HeightlockError::NonPositiveAmount);
    }
    if sender == recipient {
        return Err(HeightlockError::SelfTransfer);
    }
    if have < amount {
        return Err(HeightlockError::InsufficientBalance { need: amount, have });
    }
    Ok(())
}

// ── MemoryLedger ──────────────────────────────────────────────────────────────

/// Purely in-memory ledger. Used to exercise contract logic without a database.
#[derive(Clone, Debug, Default)]
pub struct MemoryLedger {
    pub height: Height,
    pub balances: BTreeMap<AccountId, Balance>,
    pub events: Vec<TransferEvent>,
}

impl MemoryLedger {
    pub fn new(height: Height) -> Self {
        Self { height, ..Self::default() }
    }

    pub fn with_balance(mut self, id: &AccountId, amount: Balance) -> Self {
        self.balances.insert(id.clone(), amount);
        self
    }
}

impl Ledger for MemoryLedger {
    fn height(&self) -> Height {
        self.height
    }

    fn balance(&self, id: &AccountId) -> Result<Balance, HeightlockError> {
        Ok(self.balances.get(id).copied().unwrap_or(0))
    }

    fn transfer(
        &mut self,
        amount: Balance,
        sender: &AccountId,
        recipient: &AccountId,
    ) -> Result<(), HeightlockError> {
        let have = self.balance(sender)?;
        check_transfer(amount, sender, recipient, have)?;
        self.balances.insert(sender.clone(), have - amount);
        *self.balances.entry(recipient.clone()).or_insert(0) += amount;
        self.events.push(TransferEvent::new(amount, sender, recipient));
        Ok(())
    }

    fn events(&self) -> &[TransferEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> AccountId {
        AccountId::from_label("alice")
    }

    fn bob() -> AccountId {
        AccountId::from_label("bob")
    }

    #[test]
    fn transfer_moves_funds_and_records_event() {
        let mut ledger = MemoryLedger::new(1).with_balance(&alice(), 50);
        ledger.transfer(20, &alice(), &bob()).unwrap();
        assert_eq!(ledger.balance(&alice()).unwrap(), 30);
        assert_eq!(ledger.balance(&bob()).unwrap(), 20);
        assert_eq!(ledger.events(), &[TransferEvent::new(20, &alice(), &bob())]);
    }

    #[test]
    fn transfer_rejections_carry_host_codes() {
        let mut ledger = MemoryLedger::new(1).with_balance(&alice(), 5);
        let zero = ledger.transfer(0, &alice(), &bob()).unwrap_err();
        let same = ledger.transfer(1, &alice(), &alice()).unwrap_err();
        let short = ledger.transfer(6, &alice(), &bob()).unwrap_err();
        assert_eq!(zero.code().unwrap().0, 3);
        assert_eq!(same.code().unwrap().0, 2);
        assert_eq!(short.code().unwrap().0, 1);
        assert!(ledger.events().is_empty());
    }

    #[test]
    fn atomic_discards_partial_effects() {
        let mut ledger = MemoryLedger::new(1).with_balance(&alice(), 10);
        let out = ledger.atomic(|l| {
            l.transfer(6, &alice(), &bob())?;
            l.transfer(6, &alice(), &bob())
        });
        assert!(matches!(out, Err(HeightlockError::InsufficientBalance { need: 6, have: 4 })));
        assert_eq!(ledger.balance(&alice()).unwrap(), 10);
        assert_eq!(ledger.balance(&bob()).unwrap(), 0);
        assert!(ledger.events().is_empty());
    }
}

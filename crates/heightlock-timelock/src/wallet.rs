use heightlock_core::contract::{WalletPhase, WalletState};
use heightlock_core::error::HeightlockError;
use heightlock_core::ledger::Ledger;
use heightlock_core::types::{AccountId, Balance, Height};
use tracing::debug;

/// A single-beneficiary escrow released at a target height.
///
/// Every operation validates all of its preconditions before touching the
/// ledger or the state, so a failed call leaves both unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeLockedWallet {
    state: WalletState,
}

impl TimeLockedWallet {
    pub fn new(state: WalletState) -> Self {
        Self { state }
    }

    /// A freshly deployed, unfunded wallet.
    pub fn deploy(id: AccountId, owner: AccountId) -> Self {
        Self::new(WalletState::new(id, owner))
    }

    pub fn id(&self) -> &AccountId {
        &self.state.id
    }

    pub fn state(&self) -> &WalletState {
        &self.state
    }

    pub fn into_state(self) -> WalletState {
        self.state
    }

    /// Escrow `amount` from the owner until `unlock_height`, naming `beneficiary`.
    pub fn lock<L: Ledger>(
        &mut self,
        ledger: &mut L,
        caller: &AccountId,
        beneficiary: &AccountId,
        unlock_height: Height,
        amount: Balance,
    ) -> Result<bool, HeightlockError> {
        if caller != &self.state.owner {
            return Err(HeightlockError::NotOwner);
        }
        if self.state.is_funded() {
            return Err(HeightlockError::AlreadyFunded);
        }
        let height = ledger.height();
        if unlock_height <= height {
            return Err(HeightlockError::UnlockInPast { unlock_height, height });
        }
        if amount == 0 {
            return Err(HeightlockError::NoValue);
        }

        ledger.transfer(amount, caller, &self.state.id)?;

        self.state.beneficiary = Some(beneficiary.clone());
        self.state.unlock_height = unlock_height;
        self.state.balance = amount;
        self.state.phase = WalletPhase::Funded;
        debug!(wallet = %self.state.id, %beneficiary, unlock_height, amount, "wallet funded");
        Ok(true)
    }

    /// Hand the claim right to `new_beneficiary`.
    ///
    /// Allowed for the current beneficiary at any height and in any phase;
    /// being the owner grants nothing here.
    pub fn bestow(
        &mut self,
        caller: &AccountId,
        new_beneficiary: &AccountId,
    ) -> Result<bool, HeightlockError> {
        if !self.state.is_beneficiary(caller) {
            return Err(HeightlockError::NotBeneficiary);
        }
        self.state.beneficiary = Some(new_beneficiary.clone());
        debug!(wallet = %self.state.id, from = %caller, to = %new_beneficiary, "claim right bestowed");
        Ok(true)
    }

    /// Whether `caller` may claim at `height`. No side effects.
    ///
    /// Height is checked first, so an early claim reports the height error to
    /// everyone; then the caller identity; then the terminal phase.
    pub fn check_claim(&self, caller: &AccountId, height: Height) -> Result<(), HeightlockError> {
        if height < self.state.unlock_height {
            return Err(HeightlockError::UnlockHeightNotReached {
                unlock_height: self.state.unlock_height,
                height,
            });
        }
        if !self.state.is_beneficiary(caller) {
            return Err(HeightlockError::NotBeneficiary);
        }
        if let WalletPhase::Claimed { claimed_at } = self.state.phase {
            return Err(HeightlockError::AlreadyClaimed { claimed_at });
        }
        Ok(())
    }

    /// Release the whole escrow to the beneficiary.
    pub fn claim<L: Ledger>(&mut self, ledger: &mut L, caller: &AccountId) -> Result<bool, HeightlockError> {
        self.release(ledger, caller).map(|_| true)
    }

    /// Claim and report the amount released.
    pub(crate) fn release<L: Ledger>(
        &mut self,
        ledger: &mut L,
        caller: &AccountId,
    ) -> Result<Balance, HeightlockError> {
        let height = ledger.height();
        self.check_claim(caller, height)?;

        let amount = self.state.balance;
        ledger.transfer(amount, &self.state.id, caller)?;

        self.state.balance = 0;
        self.state.phase = WalletPhase::Claimed { claimed_at: height };
        debug!(wallet = %self.state.id, beneficiary = %caller, amount, height, "escrow released");
        Ok(amount)
    }
}

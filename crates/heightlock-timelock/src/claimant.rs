use heightlock_core::constants::CLAIMANT_RECIPIENT_COUNT;
use heightlock_core::contract::ClaimantConfig;
use heightlock_core::error::HeightlockError;
use heightlock_core::ledger::Ledger;
use heightlock_core::types::{AccountId, Balance};
use tracing::{debug, info};

use crate::wallet::TimeLockedWallet;

/// Split `amount` into equal shares by floor division.
///
/// Returns `(share, remainder)`. The remainder is not paid to anyone and stays
/// with the claimant.
pub fn split_shares(amount: Balance) -> (Balance, Balance) {
    let n = CLAIMANT_RECIPIENT_COUNT as Balance;
    (amount / n, amount % n)
}

/// Beneficiary proxy that claims its wallet and pays the proceeds out to a
/// fixed set of recipients.
#[derive(Clone, Debug)]
pub struct SmartClaimant {
    config: ClaimantConfig,
}

impl SmartClaimant {
    pub fn new(config: ClaimantConfig) -> Self {
        Self { config }
    }

    pub fn id(&self) -> &AccountId {
        &self.config.id
    }

    pub fn config(&self) -> &ClaimantConfig {
        &self.config
    }

    /// Claim the configured wallet and forward four equal shares.
    ///
    /// Two things happen, in order:
    ///
    /// 1. The wallet judges the *caller's* claim right. This has no effects;
    ///    its verdict becomes the call's result.
    /// 2. Under the claimant's own identity the escrow is claimed and the
    ///    received amount is split across the recipients. This is one atomic
    ///    unit: if any transfer fails nothing is paid and its error is
    ///    returned instead of the verdict.
    ///
    /// So a stranger triggering a matured wallet gets `NotBeneficiary` back
    /// while the shares are still paid out.
    // TODO: gate step 2 on the verdict once callers no longer rely on the
    // caller-verdict/payout pairing.
    pub fn disburse<L: Ledger + Clone>(
        &self,
        ledger: &mut L,
        wallet: &mut TimeLockedWallet,
        caller: &AccountId,
    ) -> Result<bool, HeightlockError> {
        if wallet.id() != &self.config.wallet {
            return Err(HeightlockError::UnknownContract(wallet.id().to_string()));
        }

        let verdict = wallet.check_claim(caller, ledger.height());

        let mut staged = wallet.clone();
        let share = ledger.atomic(|l| {
            let received = staged.release(l, &self.config.id)?;
            self.forward(l, received)
        })?;
        *wallet = staged;

        info!(
            claimant = %self.config.id,
            %caller,
            share,
            verdict = ?verdict.as_ref().err().and_then(|e| e.code()),
            "disbursed"
        );
        verdict.map(|()| true)
    }

    fn forward<L: Ledger>(&self, ledger: &mut L, received: Balance) -> Result<Balance, HeightlockError> {
        let (share, remainder) = split_shares(received);
        for recipient in &self.config.recipients {
            ledger.transfer(share, &self.config.id, recipient)?;
        }
        debug!(received, share, remainder, "shares forwarded");
        Ok(share)
    }
}

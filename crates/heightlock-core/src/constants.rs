//! ─── Heightlock Constants ───────────────────────────────────────────────────
//!
//! Error codes are part of the external contract: callers match on the
//! numbers, so the values below never change.

use crate::types::{Balance, Height};

// ── Chain ────────────────────────────────────────────────────────────────────

/// Height of the chain right after genesis is applied.
pub const GENESIS_HEIGHT: Height = 1;

/// Opening balance of every devnet account.
pub const DEVNET_ACCOUNT_BALANCE: Balance = 100_000_000_000_000;

/// Number of devnet `wallet_N` accounts created alongside the deployer.
pub const DEVNET_WALLET_COUNT: usize = 8;

// ── Contracts ────────────────────────────────────────────────────────────────

pub const WALLET_CONTRACT_NAME: &str = "timelocked-wallet";
pub const CLAIMANT_CONTRACT_NAME: &str = "smart-claimant";

/// The claimant always splits into exactly this many shares.
pub const CLAIMANT_RECIPIENT_COUNT: usize = 4;

// ── Ledger transfer error codes ──────────────────────────────────────────────

pub const ERR_INSUFFICIENT_BALANCE: u32 = 1;
pub const ERR_SELF_TRANSFER: u32 = 2;
pub const ERR_NON_POSITIVE_AMOUNT: u32 = 3;

// ── Contract error codes ─────────────────────────────────────────────────────

pub const ERR_NOT_OWNER: u32 = 100;
pub const ERR_ALREADY_FUNDED: u32 = 101;
pub const ERR_UNLOCK_IN_PAST: u32 = 102;
pub const ERR_NO_VALUE: u32 = 103;
pub const ERR_NOT_BENEFICIARY: u32 = 104;
pub const ERR_UNLOCK_HEIGHT_NOT_REACHED: u32 = 105;
pub const ERR_ALREADY_CLAIMED: u32 = 106;

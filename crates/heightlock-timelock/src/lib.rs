//! heightlock-timelock
//!
//! Contract logic for the time-locked wallet and the four-way claimant.
//! Everything here runs against the `Ledger` trait; persistence and commit
//! decisions belong to heightlock-state's `StateEngine`.

pub mod claimant;
pub mod wallet;

pub use claimant::{split_shares, SmartClaimant};
pub use wallet::TimeLockedWallet;

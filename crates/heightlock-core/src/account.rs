use serde::{Deserialize, Serialize};

use crate::types::{AccountId, Balance};

/// On-ledger account record as stored in the state DB.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub account_id: AccountId,
    pub balance: Balance,
    /// Human-readable devnet label (`deployer`, `wallet_1`, contract names).
    #[serde(default)]
    pub label: Option<String>,
}

impl Account {
    pub fn new(account_id: AccountId) -> Self {
        Self {
            account_id,
            balance: 0,
            label: None,
        }
    }

    pub fn labelled(account_id: AccountId, label: &str, balance: Balance) -> Self {
        Self {
            account_id,
            balance,
            label: Some(label.to_string()),
        }
    }
}

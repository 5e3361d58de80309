use heightlock_core::constants::{
    CLAIMANT_CONTRACT_NAME, CLAIMANT_RECIPIENT_COUNT, DEVNET_ACCOUNT_BALANCE, DEVNET_WALLET_COUNT,
    WALLET_CONTRACT_NAME,
};
use heightlock_core::error::HeightlockError;
use heightlock_core::types::Balance;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One pre-funded account.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenesisAccount {
    pub label: String,
    pub balance: Balance,
}

/// Everything needed to bootstrap a chain: funded accounts and the two
/// contract deployments.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenesisParams {
    pub accounts: Vec<GenesisAccount>,
    /// Label of the account that deploys (and owns) both contracts.
    pub deployer: String,
    #[serde(default = "default_wallet_contract")]
    pub wallet_contract: String,
    #[serde(default = "default_claimant_contract")]
    pub claimant_contract: String,
    /// Labels of the claimant's share recipients, in payout order.
    pub recipients: [String; CLAIMANT_RECIPIENT_COUNT],
}

fn default_wallet_contract() -> String {
    WALLET_CONTRACT_NAME.to_string()
}

fn default_claimant_contract() -> String {
    CLAIMANT_CONTRACT_NAME.to_string()
}

impl GenesisParams {
    /// Local development chain: `deployer` plus `wallet_1`..`wallet_8`.
    pub fn devnet() -> Self {
        let mut accounts = vec![GenesisAccount {
            label: "deployer".into(),
            balance: DEVNET_ACCOUNT_BALANCE,
        }];
        for n in 1..=DEVNET_WALLET_COUNT {
            accounts.push(GenesisAccount {
                label: format!("wallet_{n}"),
                balance: DEVNET_ACCOUNT_BALANCE,
            });
        }
        Self {
            accounts,
            deployer: "deployer".into(),
            wallet_contract: default_wallet_contract(),
            claimant_contract: default_claimant_contract(),
            recipients: ["wallet_1", "wallet_2", "wallet_3", "wallet_4"].map(String::from),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, HeightlockError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| HeightlockError::InvalidGenesis(format!("reading {}: {e}", path.display())))?;
        serde_json::from_str(&json).map_err(|e| HeightlockError::Serialization(e.to_string()))
    }

    /// Reject parameters that would deploy into unknown or clashing identities.
    pub fn validate(&self) -> Result<(), HeightlockError> {
        let known = |label: &str| self.accounts.iter().any(|a| a.label == label);
        if !known(self.deployer.as_str()) {
            return Err(HeightlockError::InvalidGenesis(format!(
                "deployer `{}` is not a genesis account",
                self.deployer
            )));
        }
        for r in &self.recipients {
            if !known(r.as_str()) {
                return Err(HeightlockError::InvalidGenesis(format!(
                    "recipient `{r}` is not a genesis account"
                )));
            }
        }
        if self.wallet_contract == self.claimant_contract {
            return Err(HeightlockError::InvalidGenesis(
                "wallet and claimant contracts need distinct names".into(),
            ));
        }
        for name in [&self.wallet_contract, &self.claimant_contract] {
            if known(name.as_str()) {
                return Err(HeightlockError::InvalidGenesis(format!(
                    "contract name `{name}` is already an account label"
                )));
            }
        }
        let mut labels: Vec<&str> = self.accounts.iter().map(|a| a.label.as_str()).collect();
        labels.sort_unstable();
        labels.dedup();
        if labels.len() != self.accounts.len() {
            return Err(HeightlockError::InvalidGenesis("duplicate account label".into()));
        }
        Ok(())
    }
}

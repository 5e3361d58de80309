use heightlock_core::account::Account;
use heightlock_core::contract::Contract;
use heightlock_core::error::HeightlockError;
use heightlock_core::receipt::Block;
use heightlock_core::types::{AccountId, Height};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

const META_HEIGHT: &str = "height";

/// Persistent state database backed by sled (pure-Rust, no C dependencies).
///
/// Named trees (analogous to column families):
///   accounts   : AccountId bytes → bincode(Account)
///   contracts  : AccountId bytes → bincode(Contract)
///   blocks     : Height (BE)     → bincode(Block)
///   labels     : utf8 label      → AccountId bytes
///   meta       : utf8 key bytes  → raw bytes
pub struct StateDb {
    _db: sled::Db,
    accounts: sled::Tree,
    contracts: sled::Tree,
    blocks: sled::Tree,
    labels: sled::Tree,
    meta: sled::Tree,
}

fn storage(e: sled::Error) -> HeightlockError {
    HeightlockError::Storage(e.to_string())
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, HeightlockError> {
    bincode::serialize(value).map_err(|e| HeightlockError::Serialization(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, HeightlockError> {
    bincode::deserialize(bytes).map_err(|e| HeightlockError::Serialization(e.to_string()))
}

fn account_id_from_slice(bytes: &[u8]) -> Result<AccountId, HeightlockError> {
    let arr: [u8; 32] = bytes
        .try_into()
        .map_err(|_| HeightlockError::Serialization(format!("bad account id length {}", bytes.len())))?;
    Ok(AccountId::from_bytes(arr))
}

impl StateDb {
    /// Open or create the state database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, HeightlockError> {
        let db = sled::open(path).map_err(storage)?;
        let accounts  = db.open_tree("accounts").map_err(storage)?;
        let contracts = db.open_tree("contracts").map_err(storage)?;
        let blocks    = db.open_tree("blocks").map_err(storage)?;
        let labels    = db.open_tree("labels").map_err(storage)?;
        let meta      = db.open_tree("meta").map_err(storage)?;
        Ok(Self { _db: db, accounts, contracts, blocks, labels, meta })
    }

    /// True until genesis has written anything.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty() && self.contracts.is_empty() && self.meta.is_empty()
    }

    // ── Accounts ─────────────────────────────────────────────────────────────

    pub fn get_account(&self, id: &AccountId) -> Result<Option<Account>, HeightlockError> {
        match self.accounts.get(id.as_bytes()).map_err(storage)? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn put_account(&self, account: &Account) -> Result<(), HeightlockError> {
        self.accounts
            .insert(account.account_id.as_bytes(), encode(account)?)
            .map_err(storage)?;
        if let Some(label) = &account.label {
            self.labels
                .insert(label.as_bytes(), account.account_id.as_bytes().as_ref())
                .map_err(storage)?;
        }
        Ok(())
    }

    /// Balance of `id`; unknown accounts hold nothing.
    pub fn balance(&self, id: &AccountId) -> Result<u128, HeightlockError> {
        Ok(self.get_account(id)?.map(|a| a.balance).unwrap_or(0))
    }

    pub fn resolve_label(&self, label: &str) -> Result<Option<AccountId>, HeightlockError> {
        match self.labels.get(label.as_bytes()).map_err(storage)? {
            Some(bytes) => Ok(Some(account_id_from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// All accounts in key order.
    pub fn accounts(&self) -> Result<Vec<Account>, HeightlockError> {
        let mut out = Vec::new();
        for item in self.accounts.iter() {
            let (_, bytes) = item.map_err(storage)?;
            out.push(decode(&bytes)?);
        }
        Ok(out)
    }

    // ── Contracts ─────────────────────────────────────────────────────────────

    pub fn get_contract(&self, id: &AccountId) -> Result<Option<Contract>, HeightlockError> {
        match self.contracts.get(id.as_bytes()).map_err(storage)? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn put_contract(&self, contract: &Contract) -> Result<(), HeightlockError> {
        self.contracts
            .insert(contract.id().as_bytes(), encode(contract)?)
            .map_err(storage)?;
        Ok(())
    }

    // ── Blocks ────────────────────────────────────────────────────────────────

    pub fn get_block(&self, height: Height) -> Result<Option<Block>, HeightlockError> {
        match self.blocks.get(height.to_be_bytes()).map_err(storage)? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn put_block(&self, block: &Block) -> Result<(), HeightlockError> {
        self.blocks
            .insert(block.height.to_be_bytes(), encode(block)?)
            .map_err(storage)?;
        Ok(())
    }

    // ── Meta ──────────────────────────────────────────────────────────────────

    /// Current chain height. Zero before genesis.
    pub fn height(&self) -> Result<Height, HeightlockError> {
        match self.meta.get(META_HEIGHT).map_err(storage)? {
            Some(bytes) => {
                let arr: [u8; 8] = bytes[..]
                    .try_into()
                    .map_err(|_| HeightlockError::Serialization("bad height record".into()))?;
                Ok(Height::from_be_bytes(arr))
            }
            None => Ok(0),
        }
    }

    pub fn set_height(&self, height: Height) -> Result<(), HeightlockError> {
        self.meta
            .insert(META_HEIGHT, height.to_be_bytes().as_ref())
            .map_err(storage)?;
        Ok(())
    }

    /// Flush all pending writes to disk.
    pub fn flush(&self) -> Result<(), HeightlockError> {
        self._db.flush().map_err(storage)?;
        Ok(())
    }
}

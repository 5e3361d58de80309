use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, HeightlockError};
use crate::types::{AccountId, Balance, Height, TxId};

/// One atomic balance movement observed by the outside world.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferEvent {
    pub amount: Balance,
    pub sender: AccountId,
    pub recipient: AccountId,
}

impl TransferEvent {
    pub fn new(amount: Balance, sender: &AccountId, recipient: &AccountId) -> Self {
        Self {
            amount,
            sender: sender.clone(),
            recipient: recipient.clone(),
        }
    }
}

/// Outcome of a contract call: `Ok(true)` or a numeric error code.
pub type CallResult = Result<bool, ErrorCode>;

/// Convert a contract-level result into its receipt form.
///
/// Errors without a stable code are returned as-is; they abort the call.
pub fn to_call_result(out: Result<bool, HeightlockError>) -> Result<CallResult, HeightlockError> {
    match out {
        Ok(v) => Ok(Ok(v)),
        Err(e) => match e.code() {
            Some(code) => Ok(Err(code)),
            None => Err(e),
        },
    }
}

/// What a single executed transaction produced.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Receipt {
    pub tx_id: TxId,
    /// Height the call executed at.
    pub height: Height,
    pub sender: AccountId,
    pub contract: AccountId,
    /// Name of the invoked function (`lock`, `bestow`, `claim`, `disburse`).
    pub function: String,
    pub result: CallResult,
    /// Committed transfers in execution order. Empty when nothing was committed.
    pub events: Vec<TransferEvent>,
}

impl Receipt {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// The numeric error code, if the call reported one.
    pub fn error_code(&self) -> Option<u32> {
        self.result.err().map(|c| c.0)
    }

    /// Events whose sender is `id`.
    pub fn transfers_from<'a>(&'a self, id: &'a AccountId) -> impl Iterator<Item = &'a TransferEvent> {
        self.events.iter().filter(move |e| &e.sender == id)
    }
}

/// A mined block: every receipt executed at `height`, in submission order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Block {
    pub height: Height,
    pub receipts: Vec<Receipt>,
}

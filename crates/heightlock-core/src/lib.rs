pub mod account;
pub mod constants;
pub mod contract;
pub mod error;
pub mod ledger;
pub mod receipt;
pub mod transaction;
pub mod types;

pub use account::Account;
pub use constants::*;
pub use contract::*;
pub use error::{ErrorCode, HeightlockError};
pub use ledger::Ledger;
pub use receipt::*;
pub use transaction::*;
pub use types::*;

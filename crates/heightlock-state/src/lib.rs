pub mod db;
pub mod engine;
pub mod query;
pub mod staged;

pub use db::StateDb;
pub use engine::StateEngine;
pub use query::WalletQuery;
pub use staged::StagedLedger;

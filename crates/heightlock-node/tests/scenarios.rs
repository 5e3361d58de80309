//! End-to-end scenarios over a devnet genesis.
//!
//! Each test builds a fresh chain on disk, mines blocks through the engine
//! and asserts on receipts, the way an operator would observe the chain.
//!
//! Run with:
//!   cargo test -p heightlock-node --test scenarios

use std::sync::Arc;

use heightlock_core::constants::DEVNET_ACCOUNT_BALANCE;
use heightlock_core::receipt::{Receipt, TransferEvent};
use heightlock_core::transaction::{Call, Transaction};
use heightlock_core::types::{AccountId, Balance, Height};
use heightlock_genesis::{apply_genesis, GenesisAccounts, GenesisParams};
use heightlock_state::{StateDb, StateEngine};

struct Devnet {
    engine: StateEngine,
    g: GenesisAccounts,
}

impl Devnet {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("heightlock_scenario_{}", name));
        let _ = std::fs::remove_dir_all(&dir);
        let db = StateDb::open(&dir).expect("open temp db");
        let g = apply_genesis(&db, &GenesisParams::devnet()).expect("genesis");
        Self { engine: StateEngine::new(Arc::new(db)), g }
    }

    fn account(label: &str) -> AccountId {
        AccountId::from_label(label)
    }

    fn lock(&self, beneficiary: &AccountId, unlock_height: Height, amount: Balance) -> Transaction {
        Transaction::new(&self.g.deployer, &self.g.wallet, Call::Lock {
            beneficiary: beneficiary.clone(),
            unlock_height,
            amount,
        })
    }

    fn call(&self, sender: &AccountId, contract: &AccountId, call: Call) -> Receipt {
        self.engine
            .apply(&Transaction::new(sender, contract, call))
            .expect("apply")
    }

    fn balance(&self, id: &AccountId) -> Balance {
        self.engine.db.balance(id).expect("balance")
    }
}

#[test]
fn owner_locks_an_amount() {
    let net = Devnet::new("owner_locks");
    let wallet_1 = Devnet::account("wallet_1");
    let receipt = net.engine.apply(&net.lock(&wallet_1, 10, 10)).unwrap();

    assert_eq!(receipt.result, Ok(true));
    assert_eq!(receipt.events, vec![TransferEvent::new(10, &net.g.deployer, &net.g.wallet)]);
    assert_eq!(net.balance(&net.g.deployer), DEVNET_ACCOUNT_BALANCE - 10);
}

#[test]
fn nobody_else_can_lock() {
    let net = Devnet::new("nobody_else_locks");
    let wallet_1 = Devnet::account("wallet_1");
    let tx = Transaction::new(&wallet_1, &net.g.wallet, Call::Lock {
        beneficiary: wallet_1.clone(),
        unlock_height: 10,
        amount: 10,
    });
    let receipt = net.engine.apply(&tx).unwrap();
    assert_eq!(receipt.error_code(), Some(100));
    assert!(receipt.events.is_empty());
}

#[test]
fn cannot_lock_more_than_once() {
    let net = Devnet::new("lock_once");
    let wallet_1 = Devnet::account("wallet_1");
    let block = net
        .engine
        .mine_block(&[net.lock(&wallet_1, 10, 10), net.lock(&wallet_1, 10, 10)])
        .unwrap();

    assert_eq!(block.receipts[0].result, Ok(true));
    assert_eq!(
        block.receipts[0].events,
        vec![TransferEvent::new(10, &net.g.deployer, &net.g.wallet)]
    );
    assert_eq!(block.receipts[1].error_code(), Some(101));
    assert_eq!(block.receipts[1].events.len(), 0);
}

#[test]
fn beneficiary_bestows_the_claim_right() {
    let net = Devnet::new("bestow");
    let (wallet_1, wallet_2) = (Devnet::account("wallet_1"), Devnet::account("wallet_2"));
    let block = net
        .engine
        .mine_block(&[
            net.lock(&wallet_1, 10, 10),
            Transaction::new(&wallet_1, &net.g.wallet, Call::Bestow { new_beneficiary: wallet_2 }),
        ])
        .unwrap();
    for r in &block.receipts {
        assert_eq!(r.result, Ok(true));
    }
    assert!(block.receipts[1].events.is_empty());
}

#[test]
fn owner_and_strangers_cannot_bestow() {
    let net = Devnet::new("no_bestow");
    let wallet_1 = Devnet::account("wallet_1");
    let wallet_3 = Devnet::account("wallet_3");
    let deployer = net.g.deployer.clone();
    let block = net
        .engine
        .mine_block(&[
            net.lock(&wallet_1, 10, 10),
            Transaction::new(&deployer, &net.g.wallet, Call::Bestow { new_beneficiary: deployer.clone() }),
            Transaction::new(&wallet_3, &net.g.wallet, Call::Bestow { new_beneficiary: wallet_3.clone() }),
        ])
        .unwrap();
    for r in &block.receipts[1..] {
        assert_eq!(r.error_code(), Some(104));
    }
}

#[test]
fn beneficiary_claims_at_unlock_height() {
    let net = Devnet::new("claim_ok");
    let wallet_1 = Devnet::account("wallet_1");
    net.engine.apply(&net.lock(&wallet_1, 10, 10)).unwrap();
    net.engine.mine_empty_block_until(10).unwrap();

    let receipt = net.call(&wallet_1, &net.g.wallet, Call::Claim);
    assert_eq!(receipt.result, Ok(true));
    assert_eq!(receipt.events, vec![TransferEvent::new(10, &net.g.wallet, &wallet_1)]);
    assert_eq!(net.balance(&wallet_1), DEVNET_ACCOUNT_BALANCE + 10);
}

#[test]
fn beneficiary_cannot_claim_early() {
    let net = Devnet::new("claim_early");
    let wallet_1 = Devnet::account("wallet_1");
    net.engine.apply(&net.lock(&wallet_1, 10, 10)).unwrap();
    net.engine.mine_empty_block_until(9).unwrap();

    let receipt = net.call(&wallet_1, &net.g.wallet, Call::Claim);
    assert_eq!(receipt.error_code(), Some(105));
    assert_eq!(receipt.events.len(), 0);
}

#[test]
fn stranger_cannot_claim_after_unlock() {
    let net = Devnet::new("claim_stranger");
    let (wallet_1, wallet_2) = (Devnet::account("wallet_1"), Devnet::account("wallet_2"));
    net.engine.apply(&net.lock(&wallet_1, 10, 10)).unwrap();
    net.engine.mine_empty_block_until(10).unwrap();

    let receipt = net.call(&wallet_2, &net.g.wallet, Call::Claim);
    assert_eq!(receipt.error_code(), Some(104));
    assert_eq!(receipt.events.len(), 0);
}

#[test]
fn claimant_disburses_once_it_can_claim() {
    let net = Devnet::new("disburse");
    let amount = 1000;
    let share = amount / 4;
    net.engine.apply(&net.lock(&net.g.claimant, 10, amount)).unwrap();
    net.engine.mine_empty_block_until(10).unwrap();

    let receipt = net.call(&net.g.deployer, &net.g.claimant, Call::Disburse);
    assert_eq!(receipt.error_code(), Some(104));

    let shares: Vec<_> = receipt.transfers_from(&net.g.claimant).cloned().collect();
    let expected: Vec<_> = ["wallet_1", "wallet_2", "wallet_3", "wallet_4"]
        .iter()
        .map(|l| TransferEvent::new(share, &net.g.claimant, &Devnet::account(l)))
        .collect();
    assert_eq!(shares, expected);
    assert_eq!(net.balance(&Devnet::account("wallet_4")), DEVNET_ACCOUNT_BALANCE + share);
    assert_eq!(net.balance(&Devnet::account("wallet_5")), DEVNET_ACCOUNT_BALANCE);
}

#[test]
fn odd_amount_leaves_remainder_with_claimant() {
    let net = Devnet::new("disburse_odd");
    net.engine.apply(&net.lock(&net.g.claimant, 10, 1001)).unwrap();
    net.engine.mine_empty_block_until(10).unwrap();

    let receipt = net.call(&net.g.deployer, &net.g.claimant, Call::Disburse);
    let paid: Balance = receipt.transfers_from(&net.g.claimant).map(|e| e.amount).sum();
    assert!(receipt.transfers_from(&net.g.claimant).all(|e| e.amount == 250));
    assert_eq!(paid, 1000);
    assert_eq!(net.balance(&net.g.claimant), 1);
}

#[test]
fn early_disbursement_moves_nothing() {
    let net = Devnet::new("disburse_early");
    net.engine.apply(&net.lock(&net.g.claimant, 10, 1000)).unwrap();

    let receipt = net.call(&net.g.deployer, &net.g.claimant, Call::Disburse);
    assert_eq!(receipt.error_code(), Some(105));
    assert!(receipt.events.is_empty());
    assert_eq!(net.balance(&net.g.wallet), 1000);
}

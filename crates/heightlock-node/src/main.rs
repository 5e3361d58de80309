//! heightlock: drive a local time-locked wallet chain stored on disk.
//!
//! Usage:
//!   heightlock init      [--genesis <path>]
//!   heightlock lock      --beneficiary <account> --unlock-height <h> --amount <n> [--sender <account>]
//!   heightlock bestow    --to <account> --sender <account>
//!   heightlock claim     --sender <account>
//!   heightlock disburse  [--sender <account>]
//!   heightlock mine      [--until <h>]
//!   heightlock balance   <account>
//!   heightlock wallet
//!   heightlock block     <height>
//!
//! Accounts are genesis labels (`deployer`, `wallet_1`, ...) or base-58 ids.
//! Every call is mined in a block of its own and its receipt printed as JSON.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::info;

use heightlock_core::constants::{CLAIMANT_CONTRACT_NAME, WALLET_CONTRACT_NAME};
use heightlock_core::error::HeightlockError;
use heightlock_core::receipt::{Receipt, TransferEvent};
use heightlock_core::transaction::{Call, Transaction};
use heightlock_core::types::{AccountId, Balance, Height};
use heightlock_genesis::{apply_genesis, GenesisParams};
use heightlock_state::{StateDb, StateEngine, WalletQuery};

// ── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "heightlock",
    version,
    about = "Time-locked wallet and four-way claimant on a local chain"
)]
struct Args {
    /// Directory for the persistent state database.
    #[arg(long, global = true, default_value = "~/.heightlock/data")]
    data_dir: PathBuf,

    /// Time-locked wallet contract (label or base-58 id).
    #[arg(long, global = true, default_value = WALLET_CONTRACT_NAME)]
    wallet: String,

    /// Claimant contract (label or base-58 id).
    #[arg(long, global = true, default_value = CLAIMANT_CONTRACT_NAME)]
    claimant: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database and apply genesis.
    Init {
        /// Genesis params JSON. Defaults to the devnet layout.
        #[arg(long)]
        genesis: Option<PathBuf>,
    },

    /// Fund the wallet (owner only, once).
    Lock {
        #[arg(long, default_value = "deployer")]
        sender: String,
        #[arg(long)]
        beneficiary: String,
        #[arg(long)]
        unlock_height: Height,
        #[arg(long)]
        amount: Balance,
    },

    /// Hand the claim right to another account.
    Bestow {
        #[arg(long)]
        sender: String,
        #[arg(long)]
        to: String,
    },

    /// Claim the wallet balance.
    Claim {
        #[arg(long)]
        sender: String,
    },

    /// Trigger the claimant's disbursement.
    Disburse {
        #[arg(long, default_value = "deployer")]
        sender: String,
    },

    /// Mine empty blocks. Without `--until`, mines one.
    Mine {
        #[arg(long)]
        until: Option<Height>,
    },

    /// Print an account's balance.
    Balance { account: String },

    /// Describe the wallet.
    Wallet,

    /// Print a stored block.
    Block { height: Height },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let data_dir = expand_tilde(&args.data_dir);
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data dir {}", data_dir.display()))?;
    let db = Arc::new(StateDb::open(&data_dir).context("opening state database")?);

    match args.command {
        Command::Init { genesis } => init(&db, genesis.as_deref(), &data_dir)?,
        command => {
            if db.height()? == 0 {
                bail!("no chain at {}, run `heightlock init` first", data_dir.display());
            }
            run(&db, &args.wallet, &args.claimant, command)?;
        }
    }

    db.flush()?;
    Ok(())
}

fn init(db: &StateDb, genesis: Option<&Path>, data_dir: &Path) -> anyhow::Result<()> {
    let params = match genesis {
        Some(p) => GenesisParams::from_file(p).context("loading genesis params")?,
        None => GenesisParams::devnet(),
    };
    let g = apply_genesis(db, &params).context("applying genesis")?;
    info!(data_dir = %data_dir.display(), "chain initialised");
    print_json(&json!({
        "height": db.height()?,
        "deployer": g.deployer.to_string(),
        "wallet": g.wallet.to_string(),
        "claimant": g.claimant.to_string(),
        "recipients": g.recipients.iter().map(|r| r.to_string()).collect::<Vec<_>>(),
    }));
    Ok(())
}

fn run(db: &Arc<StateDb>, wallet: &str, claimant: &str, command: Command) -> anyhow::Result<()> {
    let engine = StateEngine::new(Arc::clone(db));

    match command {
        Command::Init { .. } => bail!("chain already initialised"),

        Command::Lock { sender, beneficiary, unlock_height, amount } => {
            let call = Call::Lock {
                beneficiary: resolve(db, &beneficiary)?,
                unlock_height,
                amount,
            };
            submit(&engine, db, &sender, wallet, call)?;
        }

        Command::Bestow { sender, to } => {
            let call = Call::Bestow { new_beneficiary: resolve(db, &to)? };
            submit(&engine, db, &sender, wallet, call)?;
        }

        Command::Claim { sender } => {
            submit(&engine, db, &sender, wallet, Call::Claim)?;
        }

        Command::Disburse { sender } => {
            submit(&engine, db, &sender, claimant, Call::Disburse)?;
        }

        Command::Mine { until } => {
            let height = match until {
                Some(target) => engine.mine_empty_block_until(target)?,
                None => {
                    engine.mine_block(&[])?;
                    engine.height()?
                }
            };
            print_json(&json!({ "height": height }));
        }

        Command::Balance { account } => {
            let id = resolve(db, &account)?;
            print_json(&json!({ "account": id.to_string(), "balance": db.balance(&id)?.to_string() }));
        }

        Command::Wallet => {
            let id = resolve(db, wallet)?;
            let height = engine.height()?;
            let query = WalletQuery::new(db);
            print_json(&json!({
                "height": height,
                "unlocked": query.is_unlocked(&id, height)?,
                "summary": query.describe(&id, height)?,
            }));
        }

        Command::Block { height } => {
            let block = db
                .get_block(height)?
                .with_context(|| format!("no block at height {height}"))?;
            let receipts: Vec<_> = block.receipts.iter().map(receipt_json).collect();
            print_json(&json!({ "height": block.height, "receipts": receipts }));
        }
    }
    Ok(())
}

/// Mine `call` from `sender` against `contract` and print the receipt.
fn submit(
    engine: &StateEngine,
    db: &StateDb,
    sender: &str,
    contract: &str,
    call: Call,
) -> anyhow::Result<()> {
    let tx = Transaction::new(&resolve(db, sender)?, &resolve(db, contract)?, call);
    let receipt = engine
        .apply(&tx)
        .with_context(|| format!("executing {}", tx.call.function_name()))?;
    print_json(&receipt_json(&receipt));
    Ok(())
}

/// Accept a genesis label or a base-58 account id.
fn resolve(db: &StateDb, name: &str) -> Result<AccountId, HeightlockError> {
    if let Some(id) = db.resolve_label(name)? {
        return Ok(id);
    }
    AccountId::from_b58(name).map_err(|_| HeightlockError::UnknownAccount(name.to_string()))
}

fn receipt_json(r: &Receipt) -> serde_json::Value {
    let result = match r.result {
        Ok(v) => json!({ "ok": v }),
        Err(code) => json!({ "err": code.0 }),
    };
    json!({
        "tx_id": r.tx_id.to_hex(),
        "height": r.height,
        "sender": r.sender.to_string(),
        "contract": r.contract.to_string(),
        "function": r.function,
        "result": result,
        "events": r.events.iter().map(event_json).collect::<Vec<_>>(),
    })
}

fn event_json(e: &TransferEvent) -> serde_json::Value {
    json!({
        "amount": e.amount.to_string(),
        "sender": e.sender.to_string(),
        "recipient": e.recipient.to_string(),
    })
}

fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()));
}

/// Expand a leading `~` to the user's home directory (`HOME` or `USERPROFILE`).
fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Ok(home) = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")) {
            return PathBuf::from(home).join(stripped);
        }
    }
    path.to_path_buf()
}

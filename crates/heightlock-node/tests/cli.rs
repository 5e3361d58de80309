//! Smoke test for the `heightlock` binary.
//!
//! Run with:
//!   cargo test -p heightlock-node --test cli

use std::path::{Path, PathBuf};
use std::process::Command;

struct DataDir(PathBuf);

impl Drop for DataDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

fn heightlock(data_dir: &Path, args: &[&str]) -> serde_json::Value {
    let out = Command::new(env!("CARGO_BIN_EXE_heightlock"))
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("spawn heightlock");
    assert!(
        out.status.success(),
        "heightlock {args:?} failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    serde_json::from_slice(&out.stdout).expect("JSON output")
}

#[test]
fn lock_mine_and_claim() {
    let dir = DataDir(std::env::temp_dir().join("heightlock_cli_smoke"));
    let _ = std::fs::remove_dir_all(&dir.0);

    let init = heightlock(&dir.0, &["init"]);
    assert_eq!(init["height"], 1);

    let lock = heightlock(
        &dir.0,
        &["lock", "--beneficiary", "wallet_1", "--unlock-height", "5", "--amount", "40"],
    );
    assert_eq!(lock["result"]["ok"], true);
    assert_eq!(lock["events"][0]["amount"], "40");

    let early = heightlock(&dir.0, &["claim", "--sender", "wallet_1"]);
    assert_eq!(early["result"]["err"], 105);

    let mined = heightlock(&dir.0, &["mine", "--until", "5"]);
    assert_eq!(mined["height"], 5);

    let claim = heightlock(&dir.0, &["claim", "--sender", "wallet_1"]);
    assert_eq!(claim["result"]["ok"], true);

    let wallet = heightlock(&dir.0, &["wallet"]);
    assert!(wallet["summary"].as_str().unwrap().contains("Claimed at height 5"));

    let block = heightlock(&dir.0, &["block", "5"]);
    assert_eq!(block["receipts"][0]["function"], "claim");
}

//! CLI validation tests that exercise argument and configuration
//! handling without touching the network.

use assert_cmd::Command;
use predicates::prelude::*;

fn earn_allocator() -> Command {
    let mut cmd = Command::cargo_bin("earn-allocator").unwrap();
    cmd.env_remove("PRIVATE_KEY")
        .env_remove("ETH_RPC_URL")
        .env_remove("TELEGRAM_BOT_TOKEN")
        .env_remove("TELEGRAM_CHAT_ID");
    cmd
}

const LENS: &str = "0x0000000000000000000000000000000000000005";
const VAULT: &str = "0x0000000000000000000000000000000000000003";

#[test]
fn test_help_lists_commands() {
    earn_allocator()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("preview"))
        .stdout(predicate::str::contains("run"));
}

#[test]
fn test_preview_rejects_invalid_vault_address() {
    earn_allocator()
        .args([
            "preview",
            "not-an-address",
            "--evk-vault-lens",
            LENS,
            "--rpc-url",
            "http://localhost:8545",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid address"));
}

#[test]
fn test_preview_drain_requires_endpoints() {
    earn_allocator()
        .args([
            "preview",
            VAULT,
            "--mode",
            "drain",
            "--evk-vault-lens",
            LENS,
            "--rpc-url",
            "http://localhost:8545",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("drain mode requires"));
}

#[test]
fn test_preview_rejects_malformed_soft_cap() {
    earn_allocator()
        .args([
            "preview",
            VAULT,
            "--evk-vault-lens",
            LENS,
            "--rpc-url",
            "http://localhost:8545",
            "--soft-cap",
            "missing-amount",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("soft cap must be vault=amount"));
}

#[test]
fn test_run_requires_private_key() {
    earn_allocator()
        .args([
            "run",
            VAULT,
            "--evk-vault-lens",
            LENS,
            "--rpc-url",
            "http://localhost:8545",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("PRIVATE_KEY"));
}

#[test]
fn test_rejects_unknown_mode() {
    earn_allocator()
        .args([
            "run",
            VAULT,
            "--mode",
            "everything-everywhere",
            "--evk-vault-lens",
            LENS,
            "--rpc-url",
            "http://localhost:8545",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

use assert_cmd::cargo_bin;
use std::process::Command;
use tempfile::tempdir;

mod common;

#[test]
fn test_bulk_script_replay() {
    let dir = tempdir().unwrap();
    let script_path = dir.path().join("bulk_transfers.csv");
    common::generate_transfer_script(&script_path, 5_000).expect("Failed to generate script");

    let output = Command::new(cargo_bin!("byfort"))
        .arg(&script_path)
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Binary failed to replay bulk script");

    // 5,000 transfers of 10,000 each land on Bob.
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("08222222222,Bob,50000000"));
}

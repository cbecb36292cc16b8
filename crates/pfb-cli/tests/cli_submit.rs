use assert_cmd::Command;
use pfb_gateway::AppState;
use predicates::prelude::*;
use std::net::SocketAddr;

/// Gateway on its own runtime so the binary under test can reach it while the
/// test thread blocks.
fn start_gateway(start_height: u64) -> (tokio::runtime::Runtime, SocketAddr) {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap();
    let addr = rt
        .block_on(pfb_gateway::spawn(
            "127.0.0.1:0".parse().unwrap(),
            AppState::new(start_height),
        ))
        .unwrap();
    (rt, addr)
}

fn submit_cmd(addr: SocketAddr, namespace_id: &str) -> Command {
    let mut cmd = Command::cargo_bin("pfb-cli").unwrap();
    cmd.args([
        "submit",
        "--domain",
        &addr.ip().to_string(),
        "--port",
        &addr.port().to_string(),
        "--namespace-id",
        namespace_id,
        "--data",
        "deadbeef",
    ]);
    cmd
}

#[test]
fn submit_prints_height_and_hash() {
    let (_rt, addr) = start_gateway(12345);
    submit_cmd(addr, "0c204d39600fddd3")
        .assert()
        .success()
        .stdout(predicate::str::contains("Submit your PFD transaction"))
        .stdout(predicate::str::contains("/submit_pfd"))
        .stdout(predicate::str::contains("Height: 12345"));
}

#[test]
fn blockspacerace_uses_pfb() {
    let (_rt, addr) = start_gateway(1);
    submit_cmd(addr, "0c204d39600fddd3")
        .args(["--network", "blockspacerace"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Submit your PFB transaction"))
        .stdout(predicate::str::contains("/submit_pfb"));
}

#[test]
fn rejected_submission_reports_error_and_hint() {
    let (_rt, addr) = start_gateway(1);
    submit_cmd(addr, "abc")
        .assert()
        .failure()
        .stderr(predicate::str::contains("status code 400"))
        .stderr(predicate::str::contains("check your node logs"));
}

#[test]
fn zero_height_response_is_not_reported_as_success() {
    let (_rt, addr) = start_gateway(0);
    submit_cmd(addr, "0c204d39600fddd3")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Success!").not())
        .stderr(predicate::str::contains("without a transaction height or hash"));
}

#[test]
fn blank_fields_are_rejected_before_sending() {
    Command::cargo_bin("pfb-cli")
        .unwrap()
        .args([
            "submit",
            "--domain",
            "  ",
            "--port",
            "0",
            "--namespace-id",
            "abc",
            "--data",
            "deadbeef",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing: Node IP Address, Port"));
}

#[test]
fn unknown_network_is_a_usage_error() {
    Command::cargo_bin("pfb-cli")
        .unwrap()
        .args([
            "submit",
            "--network",
            "devnet",
            "--domain",
            "127.0.0.1",
            "--namespace-id",
            "abc",
            "--data",
            "deadbeef",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown network"));
}

//! End-to-end CLI tests
//!
//! Drive the compiled binary against stub measurement tools so no real
//! network traffic is generated. Each test runs in its own temp directory
//! to keep log files out of the workspace.

#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_stub(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "#!/bin/sh").unwrap();
    write!(file, "{body}").unwrap();
    drop(file);
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

fn exporter(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("speedtest-exporter").unwrap();
    cmd.current_dir(dir.path());
    cmd.env_remove("SPEEDTEST_PORT");
    cmd.env_remove("SPEEDTEST_INTERVAL");
    cmd.env_remove("SPEEDTEST_COMMAND");
    cmd.env_remove("SPEEDTEST_TIMEOUT");
    cmd.env("SPEEDTEST_LOG_FILE", dir.path().join("test.log"));
    cmd
}

#[test]
fn test_single_shot_success() {
    let dir = TempDir::new().unwrap();
    let stub = write_stub(
        &dir,
        "speedtest-ok",
        r#"echo '{"download": 20000000, "upload": 5000000, "ping": 15.0,
                 "server": {"name": "Paris", "sponsor": "ExampleNet"},
                 "client": {"isp": "Example ISP"}}'
"#,
    );

    exporter(&dir)
        .args(["--single", "--no-prometheus", "--no-color"])
        .args(["--command", stub.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("20.00 Mbps"))
        .stdout(predicate::str::contains("5.00 Mbps"))
        .stdout(predicate::str::contains("15.00 ms"))
        .stdout(predicate::str::contains("Paris (ExampleNet)"));
}

#[test]
fn test_single_shot_failure_still_exits_zero() {
    let dir = TempDir::new().unwrap();
    let stub = write_stub(
        &dir,
        "speedtest-fail",
        "if [ \"$1\" = \"--version\" ]; then echo 'stub 1.0'; exit 0; fi\necho 'Cannot reach servers' >&2\nexit 1\n",
    );

    exporter(&dir)
        .args(["--single", "--no-prometheus", "--no-color"])
        .args(["--command", stub.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Speed Test Failed"));
}

#[test]
fn test_missing_tool_exits_one_with_hint() {
    let dir = TempDir::new().unwrap();

    exporter(&dir)
        .args(["--single", "--no-prometheus"])
        .args(["--command", "/nonexistent/speedtest-cli"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("pip install speedtest-cli"));
}

#[test]
fn test_color_flag_conflict_exits_one() {
    let dir = TempDir::new().unwrap();

    exporter(&dir)
        .args(["--single", "--no-prometheus", "--color", "--no-color"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--color and --no-color"));
}

#[test]
fn test_invalid_interval_rejected() {
    let dir = TempDir::new().unwrap();

    exporter(&dir)
        .args(["--interval", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Interval must be greater than 0"));
}

#[test]
fn test_help_lists_options() {
    let dir = TempDir::new().unwrap();

    exporter(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--interval"))
        .stdout(predicate::str::contains("--single"))
        .stdout(predicate::str::contains("--no-prometheus"));
}

#[test]
fn test_single_shot_writes_log_file() {
    let dir = TempDir::new().unwrap();
    let stub = write_stub(
        &dir,
        "speedtest-ok",
        "echo '{\"download\": 1000000, \"upload\": 1000000, \"ping\": 1.0}'\n",
    );
    let log_path = dir.path().join("custom.log");

    exporter(&dir)
        .env("SPEEDTEST_LOG_FILE", &log_path)
        .args(["--single", "--no-prometheus", "--no-color"])
        .args(["--command", stub.to_str().unwrap()])
        .assert()
        .success();

    let contents = std::fs::read_to_string(&log_path).unwrap();
    assert!(contents.contains("Running speed test"));
    assert!(contents.contains("Metrics updated"));
}

#[test]
fn test_metrics_endpoint_while_running() {
    use std::io::{Read as _, Write as _};
    use std::net::TcpStream;
    use std::process::{Command as StdCommand, Stdio};
    use std::time::{Duration, Instant};

    let dir = TempDir::new().unwrap();
    let stub = write_stub(
        &dir,
        "speedtest-ok",
        "echo '{\"download\": 42000000, \"upload\": 7000000, \"ping\": 9.5}'\n",
    );

    // Ephemeral-ish port; retried scrape below tolerates startup lag
    let port = 39471;
    let mut child = StdCommand::new(assert_cmd::cargo::cargo_bin("speedtest-exporter"))
        .current_dir(dir.path())
        .env("SPEEDTEST_LOG_FILE", dir.path().join("test.log"))
        .args(["--no-color", "--port", &port.to_string()])
        .args(["--interval", "300"])
        .args(["--command", stub.to_str().unwrap()])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(15);
    let mut body = String::new();
    loop {
        if let Ok(mut stream) = TcpStream::connect(("127.0.0.1", port)) {
            stream
                .write_all(b"GET /metrics HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
                .unwrap();
            let mut response = String::new();
            if stream.read_to_string(&mut response).is_ok()
                && response.contains("speedtest_tests_total 1")
            {
                body = response;
                break;
            }
        }
        if Instant::now() > deadline {
            let _ = child.kill();
            panic!("metrics endpoint never reported a completed test");
        }
        std::thread::sleep(Duration::from_millis(200));
    }

    let _ = child.kill();
    let _ = child.wait();

    assert!(body.contains("speedtest_download_speed_mbps 42"));
    assert!(body.contains("speedtest_upload_speed_mbps 7"));
    assert!(body.contains("speedtest_ping_ms 9.5"));
}

#![cfg(feature = "cli")]

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use gaslink::frame::{encode_frame, ProtocolRevision};

const EXAMPLE: &str = "AA 55 03 00 00 00 00 00 00 00 00 00 06 40 00 FF 04 00 03 F5 BC";

fn gaslink(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gaslink"))
        .args(["--log-level", "error"])
        .args(args)
        .output()
        .expect("gaslink should run")
}

fn capture_file(tag: &str, bytes: &[u8]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "gaslink-cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    let path = dir.join("capture.bin");
    std::fs::write(&path, bytes).expect("capture should be writable");
    path
}

fn cycle(revision: ProtocolRevision) -> Vec<u8> {
    (0..10u8)
        .flat_map(|id| encode_frame(id, 0, [0, 0, 0, 0, 2100], [id; 6], revision))
        .collect()
}

#[test]
fn decode_example_frame_as_json() {
    let output = gaslink(&["--format", "json", "decode", EXAMPLE]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"frame_id\":3"));
    assert!(stdout.contains("\"frame_name\":\"GENERAL\""));
    assert!(stdout.contains("\"primary_agent\":\"sevoflurane\""));
    assert!(stdout.contains("\"flags\":[]"));
}

#[test]
fn decode_accepts_split_hex_arguments() {
    let mut args = vec!["--format", "pretty", "decode"];
    args.extend(EXAMPLE.split(' '));
    let output = gaslink(&args);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("frame=3 (GENERAL)"));
    assert!(stdout.contains("atm_pressure=101.3 kPa"));
}

#[test]
fn decode_bad_checksum_returns_60() {
    let bad = EXAMPLE.replace("BC", "BD");
    let output = gaslink(&["decode", &bad]);

    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("checksum verification failed"));
}

#[test]
fn decode_bad_hex_returns_64() {
    let output = gaslink(&["decode", "AA 5"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn decode_with_legacy_revision_from_env() {
    let output = Command::new(env!("CARGO_BIN_EXE_gaslink"))
        .env("GASLINK_REVISION", "legacy")
        .args(["--log-level", "error", "--format", "json", "decode", EXAMPLE])
        .output()
        .expect("gaslink should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"secondary_agent\":\"sevoflurane\""));
}

#[test]
fn checksum_reports_validity() {
    let output = gaslink(&["--format", "json", "checksum", EXAMPLE]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"checksum\":\"0xBC\""));
    assert!(stdout.contains("\"valid\":true"));

    let bad = EXAMPLE.replace("AA 55", "AA 56");
    let output = gaslink(&["--format", "json", "checksum", &bad]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn stream_capture_file_with_garbage() {
    let mut bytes = vec![0x00, 0x17, 0xAA];
    bytes.extend(cycle(ProtocolRevision::Standard));
    let path = capture_file("garbage", &bytes);

    let output = gaslink(&[
        "--format",
        "pretty",
        "stream",
        path.to_str().expect("utf-8 path"),
        "--summary",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().filter(|l| l.starts_with("frame=")).count(), 10);
    assert!(stdout.contains("summary frames_decoded=10"));
    assert!(stdout.contains("garbage_bytes=3"));
    let _ = std::fs::remove_dir_all(path.parent().expect("capture dir"));
}

#[test]
fn stream_stops_after_count() {
    let path = capture_file("count", &cycle(ProtocolRevision::Standard));
    let output = gaslink(&[
        "--format",
        "json",
        "stream",
        path.to_str().expect("utf-8 path"),
        "--count",
        "4",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 4);
    let _ = std::fs::remove_dir_all(path.parent().expect("capture dir"));
}

#[test]
fn stream_reads_stdin_and_skips_corrupt_frames() {
    let mut bytes = cycle(ProtocolRevision::Standard);
    bytes[21 + 5] ^= 0x10;

    let mut child = Command::new(env!("CARGO_BIN_EXE_gaslink"))
        .args(["--log-level", "error", "--format", "json", "stream", "-", "--summary"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("stream should start");
    child
        .stdin
        .take()
        .expect("stdin piped")
        .write_all(&bytes)
        .expect("stdin should accept capture");
    let output = child.wait_with_output().expect("stream should finish");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"checksum_failures\":1"));
    assert!(stdout.contains("\"frames_decoded\":9"));
}

#[cfg(unix)]
mod interrupt {
    use std::io::{BufRead, BufReader, Read, Write};
    use std::process::{Child, Command, ExitStatus, Stdio};
    use std::time::{Duration, Instant};

    use gaslink::frame::{encode_frame, ProtocolRevision};

    fn wait_with_deadline(child: &mut Child, deadline: Duration) -> Option<ExitStatus> {
        let start = Instant::now();
        while start.elapsed() < deadline {
            if let Some(status) = child.try_wait().expect("child status should be readable") {
                return Some(status);
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        None
    }

    #[test]
    fn stream_stops_on_sigint_while_stdin_idle() {
        let mut child = Command::new(env!("CARGO_BIN_EXE_gaslink"))
            .args(["--log-level", "error", "--format", "json", "stream", "-", "--summary"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("stream should start");

        // Hold stdin open for the whole test so the stream never sees EOF.
        let mut stdin = child.stdin.take().expect("stdin piped");
        stdin
            .write_all(&encode_frame(3, 0, [0; 5], [0; 6], ProtocolRevision::Standard))
            .expect("stdin should accept a frame");
        let mut stdout = BufReader::new(child.stdout.take().expect("stdout piped"));
        let mut first = String::new();
        stdout
            .read_line(&mut first)
            .expect("first frame should be printed");
        assert!(first.contains("\"frame_id\":3"));

        let sent = Command::new("kill")
            .args(["-INT", &child.id().to_string()])
            .status()
            .expect("kill should run");
        assert!(sent.success());

        let status = match wait_with_deadline(&mut child, Duration::from_secs(5)) {
            Some(status) => status,
            None => {
                let _ = child.kill();
                panic!("stream kept running after SIGINT");
            }
        };
        assert!(status.success());

        let mut rest = String::new();
        stdout
            .read_to_string(&mut rest)
            .expect("summary should be readable");
        assert!(rest.contains("\"frames_decoded\":1"));
        drop(stdin);
    }
}

#[test]
fn stream_strict_stops_on_corrupt_frame() {
    let mut bytes = cycle(ProtocolRevision::Standard);
    bytes[20] ^= 0xFF;
    let path = capture_file("strict", &bytes);

    let output = gaslink(&["stream", path.to_str().expect("utf-8 path"), "--strict"]);
    assert_eq!(output.status.code(), Some(60));
    let _ = std::fs::remove_dir_all(path.parent().expect("capture dir"));
}

#[test]
fn stream_missing_file_fails() {
    let output = gaslink(&["stream", "/nonexistent/gaslink/capture.bin"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn version_extended_lists_features() {
    let output = gaslink(&["version", "--extended"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("name: gaslink"));
    assert!(stdout.contains("cli=true"));
}

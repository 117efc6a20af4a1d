#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use roomcast_gateway::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
relay:
  listen: "0.0.0.0:8080"
  max_frame_bytez: 123 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.relay.listen, "0.0.0.0:8080");
    assert_eq!(cfg.relay.max_frame_bytes, 5 * 1024 * 1024);
    assert_eq!(cfg.speech.transcription_room, "transcription");
}

#[test]
fn version_must_be_one() {
    let bad = r#"
version: 2
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn idle_timeout_must_exceed_ping_interval() {
    let bad = r#"
version: 1
relay:
  ping_interval_ms: 30000
  idle_timeout_ms: 20000
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn frame_cap_floor_is_enforced() {
    let bad = r#"
version: 1
relay:
  max_frame_bytes: 16
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn blank_transcription_room_rejected() {
    let bad = r#"
version: 1
speech:
  transcription_room: "  "
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

//! Public parse entry points

use std::io::{self, Read};

use arblog::{parse_file, parse_reader, parse_str, MissionStatus, ParseError, ParseOptions};

use crate::helpers::{parse_default, LogBuilder, NODE};

#[test]
fn parse_file_reads_from_disk() {
    let log = LogBuilder::new().mission(100.0, NODE, 150.0, 2);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("EE.log");
    std::fs::write(&path, log.build()).unwrap();

    let mut reports = Vec::new();
    let mut record = |p: f64| reports.push(p);
    let result = parse_file(
        &path,
        &ParseOptions::default(),
        Some(&mut record as &mut dyn FnMut(f64)),
    )
    .unwrap();

    assert_eq!(result.missions.len(), 1);
    assert_eq!(result.missions[0].total_sec, Some(150.0));
    assert_eq!(reports.last(), Some(&1.0));
}

#[test]
fn missing_file_reports_path() {
    let err = parse_file("/no/such/dir/EE.log", &ParseOptions::default(), None).unwrap_err();
    match &err {
        ParseError::Open { path, .. } => assert!(path.ends_with("EE.log")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("/no/such/dir/EE.log"));
}

#[test]
fn read_failure_is_fatal() {
    struct FailsAfterFirstChunk {
        sent: bool,
    }
    impl Read for FailsAfterFirstChunk {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.sent {
                return Err(io::Error::new(io::ErrorKind::Other, "disk gone"));
            }
            self.sent = true;
            let data = b"1.0 Sys [Info]: hello\n";
            buf[..data.len()].copy_from_slice(data);
            Ok(data.len())
        }
    }

    let err = parse_reader(
        FailsAfterFirstChunk { sent: false },
        0,
        &ParseOptions::default(),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, ParseError::Io(_)));
}

#[test]
fn crlf_log_matches_lf_log() {
    let log = LogBuilder::new()
        .mission(100.0, NODE, 90.0, 2)
        .mission(300.0, NODE, 200.0, 5);
    let lf = parse_str(&log.build(), &ParseOptions::default()).unwrap();
    let crlf = parse_str(&log.build_crlf(), &ParseOptions::default()).unwrap();
    assert_eq!(lf, crlf);
}

#[test]
fn byte_order_mark_does_not_hide_first_line() {
    let log = LogBuilder::new().mission(100.0, NODE, 90.0, 0);
    let text = format!("\u{FEFF}{}", log.build());
    let result = parse_str(&text, &ParseOptions::default()).unwrap();
    assert_eq!(result.missions[0].start_line, 1);
}

#[test]
fn chinese_mission_name_is_recognized() {
    let log = LogBuilder::new()
        .line(
            100.0,
            "Script [Info]: ThemedSquadOverlay.lua: Mission name: 兰麦地亚 (海王星) - 仲裁",
        )
        .host_loading(100.5, NODE)
        .started(110.0)
        .ending(200.0)
        .end(201.0, NODE);
    let result = parse_default(&log);
    assert_eq!(
        result.missions[0].mission_name.as_deref(),
        Some("兰麦地亚 (海王星)")
    );
}

#[test]
fn invalid_options_fall_back_to_defaults() {
    let mut log = LogBuilder::new();
    for i in 0..3 {
        log = log.mission(1000.0 * i as f64, NODE, 100.0, 0);
    }
    let options = ParseOptions {
        chunk_bytes: 0,
        min_duration_sec: -1.0,
        count: 0,
        bind_window: 0,
    };
    let result = parse_str(&log.build(), &options).unwrap();
    assert_eq!(result.missions.len(), 2);
    assert_eq!(result.valid_total, 3);
}

#[test]
fn malformed_timestamps_do_not_fail_the_parse() {
    let log = LogBuilder::new()
        .raw("garbage line without a clock")
        .raw("12.3.4 Sys [Info]: broken clock")
        .mission(100.0, NODE, 90.0, 0)
        .raw("")
        .raw("!!! truncated");
    let result = parse_default(&log);
    assert_eq!(result.missions.len(), 1);
    assert_eq!(result.missions[0].status, MissionStatus::Ok);
}

#[test]
fn result_serializes_with_camel_case_fields() {
    let log = LogBuilder::new().mission(100.0, NODE, 90.0, 1);
    let result = parse_default(&log);
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["validTotal"], 1);
    let mission = &json["missions"][0];
    assert_eq!(mission["nodeId"], NODE);
    assert_eq!(mission["totalSec"], 90.0);
    assert_eq!(mission["status"], "ok");
    assert_eq!(mission["startKind"], "missionName");
    assert_eq!(mission["missionKind"], "unclassified");
    assert_eq!(mission["phases"][0]["kind"], "round");
}

use super::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Line {
    n: u32,
}

#[test]
fn appended_lines_round_trip_in_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("raw.jsonl");
    let writer = TranscriptWriter::open(&path).expect("open");
    writer.append(&Line { n: 1 }).expect("append");
    writer.append(&Line { n: 2 }).expect("append");

    let (records, offset): (Vec<Line>, u64) = TranscriptWriter::read_from(&path, 0).expect("read");
    assert_eq!(records, vec![Line { n: 1 }, Line { n: 2 }]);
    assert_eq!(offset, std::fs::metadata(&path).expect("meta").len());
}

#[test]
fn incremental_read_only_returns_new_lines() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("raw.jsonl");
    let writer = TranscriptWriter::open(&path).expect("open");
    writer.append(&Line { n: 1 }).expect("append");

    let (first, offset): (Vec<Line>, u64) = TranscriptWriter::read_from(&path, 0).expect("read");
    assert_eq!(first, vec![Line { n: 1 }]);

    writer.append(&Line { n: 2 }).expect("append");
    let (second, _): (Vec<Line>, u64) = TranscriptWriter::read_from(&path, offset).expect("read");
    assert_eq!(second, vec![Line { n: 2 }]);
}

#[test]
fn reading_a_missing_file_returns_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("missing.jsonl");
    let (records, offset): (Vec<Line>, u64) = TranscriptWriter::read_from(&path, 0).expect("read");
    assert!(records.is_empty());
    assert_eq!(offset, 0);
}

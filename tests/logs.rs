//! Structured logger: file persistence, queue bounds and shutdown.

mod common;

use std::io::{self, Write};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use common::read_records;
use meilisearch_mcp::logs::Logger;
use serde_json::json;

/// Writer that holds every write until its gate is released.
struct GatedWriter {
    gate: Receiver<()>,
    captured: Arc<Mutex<Vec<u8>>>,
}

impl Write for GatedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // Blocks until the sender is dropped.
        let _ = self.gate.recv();
        self.captured.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn every_record_is_written_once_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let logger = Logger::with_log_dir("svc", dir.path(), 256).unwrap();

    for i in 0..50 {
        logger.info(&format!("record {i}"), json!({ "seq": i }));
    }
    logger.shutdown();

    let records = read_records(dir.path());
    assert_eq!(records.len(), 50);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record["seq"], i);
        assert_eq!(record["message"], format!("record {i}"));
        assert_eq!(record["level"], "INFO");
        assert_eq!(record["logger"], "svc");
        assert!(record["timestamp"].as_str().unwrap().ends_with('Z'));
    }
}

#[test]
fn file_is_named_after_logger_and_day() {
    let dir = tempfile::tempdir().unwrap();
    let logger = Logger::with_log_dir("meilisearch-mcp", dir.path(), 8).unwrap();
    logger.error("boom", json!({}));
    logger.shutdown();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    assert_eq!(names, vec![format!("meilisearch-mcp.{today}.log")]);
}

#[test]
fn creates_missing_log_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let logger = Logger::with_log_dir("svc", &nested, 8).unwrap();
    logger.warn("hello", json!({}));
    logger.shutdown();
    assert_eq!(read_records(&nested).len(), 1);
}

#[test]
fn records_after_shutdown_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let logger = Logger::with_log_dir("svc", dir.path(), 8).unwrap();
    logger.info("before", json!({}));
    logger.shutdown();

    assert!(!logger.emit(json!({"message": "late"})));
    logger.info("after", json!({}));
    // A second shutdown is a no-op.
    logger.shutdown();

    let records = read_records(dir.path());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["message"], "before");
}

#[test]
fn reserved_keys_are_not_overwritten_by_fields() {
    let dir = tempfile::tempdir().unwrap();
    let logger = Logger::with_log_dir("svc", dir.path(), 8).unwrap();
    logger.info("real message", json!({ "message": "spoofed", "level": "DEBUG", "extra": true }));
    logger.shutdown();

    let records = read_records(dir.path());
    assert_eq!(records[0]["message"], "real message");
    assert_eq!(records[0]["level"], "INFO");
    assert_eq!(records[0]["extra"], true);
}

#[test]
fn clones_share_one_sink() {
    let dir = tempfile::tempdir().unwrap();
    let logger = Logger::with_log_dir("svc", dir.path(), 512).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let logger = logger.clone();
            std::thread::spawn(move || {
                for i in 0..25 {
                    logger.debug("tick", json!({ "thread": t, "i": i }));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    logger.shutdown();

    assert_eq!(read_records(dir.path()).len(), 100);
}

#[test]
fn full_queue_drops_without_blocking() {
    let (release, gate) = mpsc::channel::<()>();
    let captured = Arc::new(Mutex::new(Vec::new()));
    let writer = GatedWriter {
        gate,
        captured: captured.clone(),
    };
    let logger = Logger::with_writer("svc", writer, 1);

    let started = Instant::now();
    let accepted: Vec<bool> = (0..5)
        .map(|i| logger.emit(json!({ "seq": i })))
        .collect();
    assert!(started.elapsed() < Duration::from_secs(1));
    assert!(accepted.iter().any(|ok| !ok), "{accepted:?}");
    assert!(accepted[0]);

    drop(release);
    logger.shutdown();

    let written = captured.lock().unwrap();
    let lines = written.iter().filter(|b| **b == b'\n').count();
    assert_eq!(lines, accepted.iter().filter(|ok| **ok).count());
}

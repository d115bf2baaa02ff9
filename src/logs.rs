//! Structured logging with a non-blocking daily file sink.
//!
//! A [`Logger`] is a cheap, cloneable handle.  Each leveled call writes
//! a console line through `tracing` and, when a file sink is attached,
//! enqueues one JSON line for a `tracing-appender` worker.  With a log
//! directory the worker appends to a daily file
//! (`<name>.YYYY-MM-DD.log`, UTC date).
//!
//! The queue is bounded and lossy: a full queue drops the record and
//! [`Logger::emit`] reports it.  [`Logger::shutdown`] detaches the sink
//! and waits for the worker to flush what was already enqueued.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};
use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, NonBlockingBuilder, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Default number of records the queue holds before dropping.
pub const DEFAULT_BUFFER: usize = 1000;

/// Default logger name, also used as the log file prefix.
pub const DEFAULT_NAME: &str = "meilisearch-mcp";

/// Writer side of the file sink.  Dropping it drains the worker.
struct Sink {
    writer: NonBlocking,
    _guard: WorkerGuard,
}

struct Inner {
    name: String,
    log_dir: Option<PathBuf>,
    persist: bool,
    sink: Mutex<Option<Sink>>,
}

/// Handle to the process log sink.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}

impl Logger {
    /// Logger that only writes to the console.
    pub fn console(name: impl Into<String>) -> Self {
        Self::build(name.into(), None, None)
    }

    /// Logger that also persists records under `log_dir`.
    ///
    /// Creates the directory if needed and starts the writer worker.
    pub fn with_log_dir(
        name: impl Into<String>,
        log_dir: impl Into<PathBuf>,
        capacity: usize,
    ) -> io::Result<Self> {
        let name = name.into();
        let log_dir = log_dir.into();
        std::fs::create_dir_all(&log_dir)?;

        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(name.as_str())
            .filename_suffix("log")
            .build(&log_dir)
            .map_err(io::Error::other)?;
        let sink = start_sink(appender, capacity);
        Ok(Self::build(name, Some(log_dir), Some(sink)))
    }

    /// Logger whose records go to an arbitrary writer on the worker.
    pub fn with_writer<W>(name: impl Into<String>, writer: W, capacity: usize) -> Self
    where
        W: Write + Send + 'static,
    {
        Self::build(name.into(), None, Some(start_sink(writer, capacity)))
    }

    fn build(name: String, log_dir: Option<PathBuf>, sink: Option<Sink>) -> Self {
        Self {
            inner: Arc::new(Inner {
                name,
                log_dir,
                persist: sink.is_some(),
                sink: Mutex::new(sink),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn log_dir(&self) -> Option<&Path> {
        self.inner.log_dir.as_deref()
    }

    /// Enqueue a record for the file sink without blocking.
    ///
    /// Returns `false` when the record was dropped (queue full, no file
    /// sink, or already shut down).
    pub fn emit(&self, record: Value) -> bool {
        let Ok(mut line) = serde_json::to_vec(&record) else {
            return false;
        };
        line.push(b'\n');

        let mut guard = self.inner.sink.lock().expect("log sink poisoned");
        let Some(sink) = guard.as_mut() else {
            return false;
        };
        // Only this path bumps the counter, and the lock serializes it.
        let counter = sink.writer.error_counter();
        let dropped = counter.dropped_lines();
        if sink.writer.write_all(&line).is_err() {
            return false;
        }
        counter.dropped_lines() == dropped
    }

    /// Log `message` at `level` with structured `fields`.
    ///
    /// `fields` is normally a JSON object whose entries are merged into
    /// the record; any other value is stored under `"data"`.
    pub fn log(&self, level: Level, message: &str, fields: Value) {
        let fields = match fields {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };

        let rendered = if fields.is_empty() {
            String::new()
        } else {
            Value::Object(fields.clone()).to_string()
        };
        match level {
            Level::ERROR => tracing::error!(logger = %self.inner.name, fields = %rendered, "{message}"),
            Level::WARN => tracing::warn!(logger = %self.inner.name, fields = %rendered, "{message}"),
            Level::INFO => tracing::info!(logger = %self.inner.name, fields = %rendered, "{message}"),
            Level::DEBUG => tracing::debug!(logger = %self.inner.name, fields = %rendered, "{message}"),
            Level::TRACE => tracing::trace!(logger = %self.inner.name, fields = %rendered, "{message}"),
        }

        if self.inner.persist {
            let mut record = Map::new();
            record.insert(
                "timestamp".to_string(),
                Value::String(
                    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
                ),
            );
            record.insert("level".to_string(), Value::String(level_str(&level).to_string()));
            record.insert("logger".to_string(), Value::String(self.inner.name.clone()));
            record.insert("message".to_string(), Value::String(message.to_string()));
            for (k, v) in fields {
                record.entry(k).or_insert(v);
            }
            self.emit(Value::Object(record));
        }
    }

    pub fn debug(&self, message: &str, fields: Value) {
        self.log(Level::DEBUG, message, fields);
    }

    pub fn info(&self, message: &str, fields: Value) {
        self.log(Level::INFO, message, fields);
    }

    pub fn warn(&self, message: &str, fields: Value) {
        self.log(Level::WARN, message, fields);
    }

    pub fn error(&self, message: &str, fields: Value) {
        self.log(Level::ERROR, message, fields);
    }

    /// Detach the sink and wait for the worker to flush everything
    /// already enqueued.  Safe to call more than once.
    pub fn shutdown(&self) {
        let sink = self.inner.sink.lock().expect("log sink poisoned").take();
        drop(sink);
    }
}

fn start_sink<W>(writer: W, capacity: usize) -> Sink
where
    W: Write + Send + 'static,
{
    let (writer, guard) = NonBlockingBuilder::default()
        .lossy(true)
        .buffered_lines_limit(capacity.max(1))
        .thread_name("log-writer")
        .finish(writer);
    Sink {
        writer,
        _guard: guard,
    }
}

fn level_str(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARN",
        Level::INFO => "INFO",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
}

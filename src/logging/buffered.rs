//! Buffered logger for concurrent install jobs.
use std::sync::{Arc, Mutex};

use super::types::{Log, TaskStatus};

/// A single buffered log entry, replayed when flushed.
#[derive(Debug, Clone)]
enum LogEntry {
    Stage(String),
    Info(String),
    Debug(String),
    Warn(String),
    Error(String),
}

impl LogEntry {
    fn replay(&self, sink: &dyn Log) {
        match self {
            Self::Stage(msg) => sink.stage(msg),
            Self::Info(msg) => sink.info(msg),
            Self::Debug(msg) => sink.debug(msg),
            Self::Warn(msg) => sink.warn(msg),
            Self::Error(msg) => sink.error(msg),
        }
    }
}

/// Implement the display methods of [`Log`] by buffering each message into
/// `self.entries` as the corresponding [`LogEntry`] variant.
macro_rules! buffer_log_methods {
    ($($method:ident => $variant:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                if let Ok(mut guard) = self.entries.lock() {
                    guard.push(LogEntry::$variant(msg.to_string()));
                }
            }
        )+
    };
}

/// Buffered logger for jobs that run concurrently.
///
/// Captures display output in memory so that concurrent jobs do not
/// interleave their console lines. The entries are replayed in order when
/// [`flush`](Self::flush) is called after the join point.
///
/// [`record_task`](Log::record_task) is forwarded directly to the
/// underlying log because summary collection is already thread-safe.
pub struct BufferedLog {
    inner: Arc<dyn Log>,
    entries: Mutex<Vec<LogEntry>>,
}

impl std::fmt::Debug for BufferedLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferedLog")
            .field("inner", &"<dyn Log>")
            .field("entries", &self.entries)
            .finish()
    }
}

impl BufferedLog {
    /// Create a new buffered logger backed by the given log.
    #[must_use]
    pub fn new(inner: Arc<dyn Log>) -> Self {
        Self {
            inner,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Replay all buffered entries to the backing log and clear the buffer.
    pub fn flush(&self) {
        let entries = match self.entries.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(_) => return,
        };
        for entry in &entries {
            entry.replay(self.inner.as_ref());
        }
    }
}

impl Log for BufferedLog {
    buffer_log_methods! {
        stage => Stage,
        info  => Info,
        debug => Debug,
        warn  => Warn,
        error => Error,
    }

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.inner.record_task(name, status, message);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::logging::isolated_logger;

    #[test]
    fn entries_are_held_until_flush() {
        let (log, _tmp, _guard) = isolated_logger();
        let log = Arc::new(log);
        let buffered = BufferedLog::new(Arc::clone(&log) as Arc<dyn Log>);
        let marker = format!("buffered-marker-{}", std::process::id());
        buffered.info(&marker);

        let path = log.log_path().expect("log path").clone();
        let before = std::fs::read_to_string(&path).unwrap();
        assert!(!before.contains(&marker), "entry should not be written yet");

        buffered.flush();
        let after = std::fs::read_to_string(&path).unwrap();
        assert!(after.contains(&marker), "entry should be written after flush");
    }

    #[test]
    fn flush_preserves_order_and_empties_buffer() {
        let (log, _tmp, _guard) = isolated_logger();
        let log = Arc::new(log);
        let buffered = BufferedLog::new(Arc::clone(&log) as Arc<dyn Log>);
        buffered.info("first-entry");
        buffered.warn("second-entry");
        buffered.flush();
        buffered.flush();

        let contents = std::fs::read_to_string(log.log_path().expect("log path")).unwrap();
        let first = contents.find("first-entry").expect("first entry");
        let second = contents.find("second-entry").expect("second entry");
        assert!(first < second);
        assert_eq!(contents.matches("first-entry").count(), 1);
    }

    #[test]
    fn record_task_is_forwarded_immediately() {
        let (log, _tmp, _guard) = isolated_logger();
        let log = Arc::new(log);
        let buffered = BufferedLog::new(Arc::clone(&log) as Arc<dyn Log>);
        buffered.record_task("job", TaskStatus::Ok, None);
        assert_eq!(log.task_entries().len(), 1);
    }
}

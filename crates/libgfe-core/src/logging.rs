//! Logging facilities
//!
//! Diagnostics go through `tracing`. Driver output that must stay
//! line-atomic across worker threads goes through a [`LineSink`].

use std::io::{self, Write};
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Destination for whole lines of driver output
pub trait LineSink: Send + Sync {
    /// Write `line` followed by a newline and flush
    fn write_line(&self, line: &str);
}

/// Sink that serializes every line behind one lock and flushes it immediately
#[derive(Debug)]
pub struct SerializedSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl SerializedSink<io::Stdout> {
    /// Sink over the process standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> SerializedSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> LineSink for SerializedSink<W> {
    fn write_line(&self, line: &str) {
        // A panic in another writer leaves the buffer usable; keep logging.
        let mut writer = match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = writeln!(writer, "{}", line).and_then(|_| writer.flush());
    }
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `level`; an unparsable level falls back
/// to `info`. Calling this twice is harmless.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_write_line_appends_newline() {
        let sink = SerializedSink::new(Vec::new());
        sink.write_line("library: dummy");
        sink.write_line("seed: 42");
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "library: dummy\nseed: 42\n");
    }

    #[test]
    fn test_concurrent_writers_keep_lines_whole() {
        let sink = Arc::new(SerializedSink::new(Vec::new()));
        let num_threads = 8;
        let lines_per_thread = 200;

        let handles: Vec<_> = (0..num_threads)
            .map(|t| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    for i in 0..lines_per_thread {
                        sink.write_line(&format!("worker-{:02} line-{:04} done", t, i));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let sink = Arc::try_unwrap(sink).unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), num_threads * lines_per_thread);
        for line in lines {
            assert!(line.starts_with("worker-"), "torn line: {:?}", line);
            assert!(line.ends_with(" done"), "torn line: {:?}", line);
            assert_eq!(line.len(), "worker-00 line-0000 done".len());
        }
    }

    #[test]
    fn test_init_tracing_twice() {
        init_tracing("debug");
        init_tracing("not a level ((");
    }
}

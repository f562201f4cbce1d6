//! Sink trait and the console sink

use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;

use super::format::{LogRecord, RecordFormatter};
use super::level::LogLevel;

/// A destination for emitted log records
///
/// Implementations:
/// - `ConsoleSink`: one line per record on stdout (or an injected writer)
/// - `RotatingFileSink`: size-rotated log file with numbered backups
pub trait Sink: Send {
    /// Minimum level this sink emits
    fn level(&self) -> LogLevel;

    /// Write one record. Failures are swallowed: logging must not take the
    /// caller down.
    fn write(&mut self, record: &LogRecord);

    /// Push any buffered bytes to the underlying stream
    fn flush(&mut self);

    /// Whether this sink accepts records at `level`
    fn accepts(&self, level: LogLevel) -> bool {
        level >= self.level()
    }
}

/// Type alias for a boxed sink
pub type BoxedSink = Box<dyn Sink>;

/// Factory producing the writer a console sink is bound to
pub type ConsoleFactory = Arc<dyn Fn() -> Box<dyn Write + Send> + Send + Sync>;

/// Console factory bound to the process's standard output
pub fn stdout_factory() -> ConsoleFactory {
    Arc::new(|| -> Box<dyn Write + Send> { Box::new(io::stdout()) })
}

/// A sink that writes formatted lines to the console
pub struct ConsoleSink {
    writer: Box<dyn Write + Send>,
    formatter: RecordFormatter,
    level: LogLevel,
}

impl ConsoleSink {
    /// Create a console sink bound to stdout
    pub fn stdout(formatter: RecordFormatter, level: LogLevel) -> Self {
        Self::with_writer(Box::new(io::stdout()), formatter, level)
    }

    /// Create a console sink bound to an arbitrary writer
    pub fn with_writer(
        writer: Box<dyn Write + Send>,
        formatter: RecordFormatter,
        level: LogLevel,
    ) -> Self {
        Self {
            writer,
            formatter,
            level,
        }
    }
}

impl Sink for ConsoleSink {
    fn level(&self) -> LogLevel {
        self.level
    }

    fn write(&mut self, record: &LogRecord) {
        let line = self.formatter.format(record);
        let _ = writeln!(self.writer, "{}", line);
        let _ = self.writer.flush();
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }
}

impl std::fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSink")
            .field("formatter", &self.formatter)
            .field("level", &self.level)
            .finish()
    }
}

/// In-memory writer whose clones share one buffer
///
/// Handy for capturing console output in tests or embedding hosts.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock()).into_owned()
    }

    /// Console factory whose writers all append to this buffer
    pub fn factory(&self) -> ConsoleFactory {
        let buffer = self.clone();
        Arc::new(move || -> Box<dyn Write + Send> { Box::new(buffer.clone()) })
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_sink_writes_lines() {
        let buffer = SharedBuffer::new();
        let mut sink = ConsoleSink::with_writer(
            Box::new(buffer.clone()),
            RecordFormatter::new("{levelname} {message}", "%H"),
            LogLevel::Info,
        );

        sink.write(&LogRecord::new("test", LogLevel::Info, "first"));
        sink.write(&LogRecord::new("test", LogLevel::Error, "second"));
        sink.flush();

        assert_eq!(buffer.contents(), "INFO first\nERROR second\n");
    }

    #[test]
    fn test_console_sink_threshold() {
        let sink = ConsoleSink::stdout(RecordFormatter::default(), LogLevel::Warning);
        assert!(!sink.accepts(LogLevel::Info));
        assert!(sink.accepts(LogLevel::Warning));
        assert!(sink.accepts(LogLevel::Critical));
    }
}

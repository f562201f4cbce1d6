//! Size-based rotating file sink
//!
//! The active file is `<path>`; rotated files are `<path>.1` (newest) up to
//! `<path>.<backup_count>` (oldest). Rotation happens before a write that
//! would take the active file to `max_bytes` or beyond. Assumes a single
//! writer process.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::error::{LoggingError, LoggingResult};
use super::format::{LogRecord, RecordFormatter};
use super::level::LogLevel;
use super::sink::Sink;

/// A sink appending to a log file that rotates by size
pub struct RotatingFileSink {
    path: PathBuf,
    file: Option<BufWriter<File>>,
    size: u64,
    max_bytes: u64,
    backup_count: usize,
    formatter: RecordFormatter,
    level: LogLevel,
}

impl RotatingFileSink {
    /// Open (or create) the active log file, creating its directory if needed
    ///
    /// `max_bytes == 0` or `backup_count == 0` disables rotation.
    pub fn open(
        path: impl Into<PathBuf>,
        max_bytes: u64,
        backup_count: usize,
        formatter: RecordFormatter,
        level: LogLevel,
    ) -> LoggingResult<Self> {
        let path = path.into();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| LoggingError::io(dir, e))?;
        }

        let file = open_append(&path).map_err(|e| LoggingError::io(&path, e))?;
        let size = file
            .metadata()
            .map(|m| m.len())
            .map_err(|e| LoggingError::io(&path, e))?;

        Ok(Self {
            path,
            file: Some(BufWriter::new(file)),
            size,
            max_bytes,
            backup_count,
            formatter,
            level,
        })
    }

    /// Path of the active log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes written to the active file, including buffered bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Path of the `index`-th backup (1 = newest)
    pub fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(format!(".{}", index));
        PathBuf::from(name)
    }

    fn should_rotate(&self, incoming: u64) -> bool {
        self.max_bytes > 0
            && self.backup_count > 0
            && self.size > 0
            && self.size + incoming >= self.max_bytes
    }

    fn rotate(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }

        for index in (1..self.backup_count).rev() {
            let src = self.backup_path(index);
            if src.exists() {
                let dst = self.backup_path(index + 1);
                if dst.exists() {
                    fs::remove_file(&dst)?;
                }
                fs::rename(&src, &dst)?;
            }
        }

        let newest = self.backup_path(1);
        if newest.exists() {
            fs::remove_file(&newest)?;
        }
        if self.path.exists() {
            fs::rename(&self.path, &newest)?;
        }

        self.file = Some(BufWriter::new(open_append(&self.path)?));
        self.size = 0;
        Ok(())
    }

    /// Get back to a writable state after a failed rotation
    fn reopen(&mut self) {
        if let Ok(file) = open_append(&self.path) {
            self.size = file.metadata().map(|m| m.len()).unwrap_or(0);
            self.file = Some(BufWriter::new(file));
        }
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl Sink for RotatingFileSink {
    fn level(&self) -> LogLevel {
        self.level
    }

    fn write(&mut self, record: &LogRecord) {
        let mut line = self.formatter.format(record);
        line.push('\n');
        let len = line.len() as u64;

        if self.should_rotate(len) && self.rotate().is_err() {
            self.reopen();
        }

        if let Some(file) = self.file.as_mut() {
            if file.write_all(line.as_bytes()).is_ok() {
                self.size += len;
            }
        }
    }

    fn flush(&mut self) {
        if let Some(file) = self.file.as_mut() {
            let _ = file.flush();
        }
    }
}

impl std::fmt::Debug for RotatingFileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFileSink")
            .field("path", &self.path)
            .field("size", &self.size)
            .field("max_bytes", &self.max_bytes)
            .field("backup_count", &self.backup_count)
            .field("level", &self.level)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn message_only() -> RecordFormatter {
        RecordFormatter::new("{message}", "%H")
    }

    /// A record whose formatted line, newline included, is exactly `len` bytes
    fn record_of(len: usize) -> LogRecord {
        LogRecord::new("test", LogLevel::Info, "x".repeat(len - 1))
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("app.log");

        let mut sink =
            RotatingFileSink::open(&path, 1024, 2, message_only(), LogLevel::Info).unwrap();
        sink.write(&record_of(10));
        sink.flush();

        assert_eq!(fs::read_to_string(&path).unwrap(), format!("{}\n", "x".repeat(9)));
    }

    #[test]
    fn test_rotates_when_threshold_reached() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut sink =
            RotatingFileSink::open(&path, 100, 3, message_only(), LogLevel::Info).unwrap();

        // 60 + 60 >= 100, so the second record lands in a fresh file
        sink.write(&record_of(60));
        sink.write(&record_of(60));
        sink.flush();

        assert_eq!(sink.size(), 60);
        assert_eq!(fs::metadata(&path).unwrap().len(), 60);
        assert_eq!(fs::metadata(sink.backup_path(1)).unwrap().len(), 60);
        assert!(!sink.backup_path(2).exists());
    }

    #[test]
    fn test_backup_count_is_a_cap() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut sink =
            RotatingFileSink::open(&path, 50, 2, message_only(), LogLevel::Info).unwrap();

        for i in 0..6 {
            let mut record = record_of(40);
            record.message = format!("{}{}", i, &record.message[1..]);
            sink.write(&record);
        }
        sink.flush();

        assert!(sink.backup_path(1).exists());
        assert!(sink.backup_path(2).exists());
        assert!(!sink.backup_path(3).exists());

        // Newest rotated content sits in .1, the one before it in .2
        let active = fs::read_to_string(&path).unwrap();
        let newest = fs::read_to_string(sink.backup_path(1)).unwrap();
        let oldest = fs::read_to_string(sink.backup_path(2)).unwrap();
        assert!(active.starts_with('5'));
        assert!(newest.starts_with('4'));
        assert!(oldest.starts_with('3'));
    }

    #[test]
    fn test_zero_backup_count_disables_rotation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut sink =
            RotatingFileSink::open(&path, 10, 0, message_only(), LogLevel::Info).unwrap();

        sink.write(&record_of(8));
        sink.write(&record_of(8));
        sink.flush();

        assert_eq!(fs::metadata(&path).unwrap().len(), 16);
        assert!(!sink.backup_path(1).exists());
    }

    #[test]
    fn test_appends_to_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "earlier\n").unwrap();

        let mut sink =
            RotatingFileSink::open(&path, 0, 5, message_only(), LogLevel::Info).unwrap();
        assert_eq!(sink.size(), 8);
        sink.write(&LogRecord::new("test", LogLevel::Info, "later"));
        sink.flush();

        assert_eq!(fs::read_to_string(&path).unwrap(), "earlier\nlater\n");
    }

    #[test]
    fn test_directory_creation_failure_surfaces() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "file").unwrap();

        let result = RotatingFileSink::open(
            blocker.join("app.log"),
            1024,
            1,
            message_only(),
            LogLevel::Info,
        );
        assert!(matches!(result, Err(LoggingError::Io { .. })));
    }
}

//! CSV log output
//!
//! The log is a header line followed by one data line per successful cycle,
//! with recovered failures interleaved as single annotated lines. Values are
//! joined with commas and never quoted. Every line is mirrored to the
//! console when one is attached.
//!
//! The emitter owns the "header written" flag: the header goes out once,
//! immediately before the first data line, and never again for the
//! emitter's lifetime.

use crate::config::OpenMode;
use crate::error::ProbeError;
use crate::record::{header_line, SampleRecord};
use crate::util::time::format_row_timestamp;
use crate::Result;
use anyhow::Context;
use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// CSV writer for sample rows, mirroring to an optional console
pub struct CsvEmitter<W: Write, C: Write> {
    file: W,
    console: Option<C>,
    header_written: bool,
}

impl<W: Write, C: Write> CsvEmitter<W, C> {
    /// Emitter writing to `file`, mirroring to `console` if given
    pub fn new(file: W, console: Option<C>) -> Self {
        Self {
            file,
            console,
            header_written: false,
        }
    }

    /// Mark the header as already present (appending to an existing log)
    pub fn with_header_written(mut self, written: bool) -> Self {
        self.header_written = written;
        self
    }

    pub fn header_written(&self) -> bool {
        self.header_written
    }

    /// Write one sample, preceded by the header on first use, then flush
    pub fn emit_record(&mut self, record: &SampleRecord) -> std::result::Result<(), ProbeError> {
        if !self.header_written {
            self.write_line(&header_line())?;
            self.header_written = true;
        }

        self.write_line(&record.data_line())?;
        self.flush()
    }

    /// Write one annotated failure line, then flush
    ///
    /// The line carries only the timestamp and error text, so it never
    /// matches the header's field count. The header flag is untouched.
    pub fn emit_error(
        &mut self,
        timestamp: &DateTime<Local>,
        error: &ProbeError,
    ) -> std::result::Result<(), ProbeError> {
        self.write_line(&error_line(timestamp, error))?;
        self.flush()
    }

    fn write_line(&mut self, line: &str) -> std::result::Result<(), ProbeError> {
        if let Some(console) = self.console.as_mut() {
            writeln!(console, "{}", line)?;
        }
        writeln!(self.file, "{}", line)?;
        Ok(())
    }

    fn flush(&mut self) -> std::result::Result<(), ProbeError> {
        if let Some(console) = self.console.as_mut() {
            console.flush()?;
        }
        self.file.flush()?;
        Ok(())
    }

    /// Underlying log writer
    pub fn file(&self) -> &W {
        &self.file
    }

    /// Attached console, if any
    pub fn console(&self) -> Option<&C> {
        self.console.as_ref()
    }
}

/// Annotated failure line, e.g.
/// `2021-06-01 14:03:27.512344,"***** Exception: connection refused *****"`
pub fn error_line(timestamp: &DateTime<Local>, error: &ProbeError) -> String {
    format!(
        "{},\"***** Exception: {} *****\"",
        format_row_timestamp(timestamp),
        error
    )
}

/// Open the log file
///
/// Returns the file and whether it already held data, which in append mode
/// means the header is already present.
pub fn open_log_file(path: &Path, mode: OpenMode) -> Result<(File, bool)> {
    let mut options = OpenOptions::new();
    match mode {
        OpenMode::Truncate => options.write(true).create(true).truncate(true),
        OpenMode::Append => options.append(true).create(true),
    };

    let file = options
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let has_content = match mode {
        OpenMode::Truncate => false,
        OpenMode::Append => {
            file.metadata()
                .with_context(|| format!("Failed to stat log file: {}", path.display()))?
                .len()
                > 0
        }
    };

    Ok((file, has_content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::tests::sample_record;
    use crate::record::FIELD_COUNT;
    use std::io::Read;

    type BufferEmitter = CsvEmitter<Vec<u8>, Vec<u8>>;

    fn lines(buf: &[u8]) -> Vec<String> {
        String::from_utf8(buf.to_vec())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn connection_error() -> ProbeError {
        ProbeError::Connection {
            url: "http://192.168.12.1/fastmile_radio_status_web_app.cgi".to_string(),
            message: "connection refused".to_string(),
        }
    }

    #[test]
    fn test_header_written_once_before_first_row() {
        let mut emitter: BufferEmitter = CsvEmitter::new(Vec::new(), Some(Vec::new()));
        let record = sample_record();

        emitter.emit_record(&record).unwrap();
        emitter.emit_record(&record).unwrap();

        let file = lines(emitter.file());
        assert_eq!(file.len(), 3);
        assert_eq!(file[0], header_line());
        assert_eq!(file[1], record.data_line());
        assert_eq!(file[2], record.data_line());
        assert!(emitter.header_written());
    }

    #[test]
    fn test_console_mirrors_file() {
        let mut emitter: BufferEmitter = CsvEmitter::new(Vec::new(), Some(Vec::new()));
        emitter.emit_error(&Local::now(), &connection_error()).unwrap();
        emitter.emit_record(&sample_record()).unwrap();

        assert_eq!(emitter.console().unwrap(), emitter.file());
    }

    #[test]
    fn test_error_line_before_any_row_has_no_header() {
        let mut emitter: BufferEmitter = CsvEmitter::new(Vec::new(), None);
        emitter.emit_error(&Local::now(), &connection_error()).unwrap();

        let file = lines(emitter.file());
        assert_eq!(file.len(), 1);
        assert!(file[0].contains(",\"***** Exception: connection to "));
        assert!(file[0].ends_with("connection refused *****\""));
        assert!(!emitter.header_written());
    }

    #[test]
    fn test_error_line_shape() {
        let timestamp = sample_record().timestamp;
        let line = error_line(&timestamp, &connection_error());
        assert!(line.starts_with("2021-06-01 14:03:27.000000,\"***** Exception: "));
        assert_ne!(line.split(',').count(), FIELD_COUNT);
    }

    #[test]
    fn test_header_preset_for_existing_log() {
        let mut emitter: BufferEmitter =
            CsvEmitter::new(Vec::new(), None).with_header_written(true);
        emitter.emit_record(&sample_record()).unwrap();

        let file = lines(emitter.file());
        assert_eq!(file.len(), 1);
        assert_eq!(file[0].split(',').count(), FIELD_COUNT);
    }

    #[test]
    fn test_truncate_discards_previous_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.csv");
        std::fs::write(&path, "old contents\n").unwrap();

        let (file, has_content) = open_log_file(&path, OpenMode::Truncate).unwrap();
        assert!(!has_content);
        let mut emitter: CsvEmitter<File, Vec<u8>> = CsvEmitter::new(file, None);
        emitter.emit_record(&sample_record()).unwrap();

        let mut contents = String::new();
        File::open(&path).unwrap().read_to_string(&mut contents).unwrap();
        assert!(contents.starts_with("datetime,"));
        assert!(!contents.contains("old contents"));
    }

    #[test]
    fn test_append_keeps_previous_log_and_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.csv");
        let record = sample_record();
        std::fs::write(&path, format!("{}\n{}\n", header_line(), record.data_line())).unwrap();

        let (file, has_content) = open_log_file(&path, OpenMode::Append).unwrap();
        assert!(has_content);
        let mut emitter: CsvEmitter<File, Vec<u8>> =
            CsvEmitter::new(file, None).with_header_written(has_content);
        emitter.emit_record(&record).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(contents.matches("datetime,").count(), 1);
    }

    #[test]
    fn test_append_to_new_file_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.csv");

        let (file, has_content) = open_log_file(&path, OpenMode::Append).unwrap();
        assert!(!has_content);
        let mut emitter: CsvEmitter<File, Vec<u8>> =
            CsvEmitter::new(file, None).with_header_written(has_content);
        emitter.emit_record(&sample_record()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("datetime,ping_time,"));
    }

    #[test]
    fn test_open_missing_directory_fails() {
        let err = open_log_file(Path::new("/nonexistent/dir/stats.csv"), OpenMode::Truncate)
            .unwrap_err();
        assert!(err.to_string().contains("Failed to open log file"));
    }
}

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StorageError;
use crate::models::Submission;

const FIELDS: usize = 7;

/// Append-only журнал заявок.
pub trait RecordSink: Send + Sync {
    fn append(&self, record: &Submission) -> Result<(), StorageError>;

    /// Last `n` records in file order. A store that does not exist yet is empty.
    fn list_recent(&self, n: usize) -> Result<Vec<Submission>, StorageError>;
}

/// Header-less CSV file, one row per submission.
#[derive(Debug)]
pub struct CsvRequestLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvRequestLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn encode_row(record: &Submission) -> Result<Vec<u8>, StorageError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.serialize(record)?;
        writer
            .into_inner()
            .map_err(|e| StorageError::Io(std::io::Error::new(e.error().kind(), e.to_string())))
    }
}

impl RecordSink for CsvRequestLog {
    fn append(&self, record: &Submission) -> Result<(), StorageError> {
        // Строка целиком собирается заранее и пишется одним write_all
        let row = Self::encode_row(record)?;

        let _guard = self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(&row)?;
        file.flush()?;

        log::debug!("💾 Request appended to {}", self.path.display());
        Ok(())
    }

    fn list_recent(&self, n: usize) -> Result<Vec<Submission>, StorageError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            if row.len() < FIELDS {
                log::warn!(
                    "Skipping short row {:?} in {}",
                    row.position().map(|p| p.line()),
                    self.path.display()
                );
                continue;
            }
            let record: Submission = row.deserialize(None)?;
            records.push(record);
        }

        let skip = records.len().saturating_sub(n);
        Ok(records.split_off(skip))
    }
}

pub fn format_notification(record: &Submission) -> String {
    format!(
        "📥 Новая запись в салон:\n\
        👤 Имя: {}\n\
        📞 Телефон: {} ({})\n\
        💅 Услуга: {}\n\
        ✂️ Мастер: {}\n\
        📅 Дата: {}\n\
        📝 Комментарий: {}",
        record.name,
        record.phone,
        record.country,
        record.service,
        record.master,
        record.date_time,
        record.comment
    )
}

pub fn format_listing_entry(record: &Submission) -> String {
    format!(
        "📝 Заявка:\n👤 {}\n📞 {} ({})\n💅 {} | ✂️ {}\n📅 {}\n📝 {}",
        record.name,
        record.phone,
        record.country,
        record.service,
        record.master,
        record.date_time,
        record.comment
    )
}

use chrono::{DateTime, NaiveDateTime, Utc};
use std::{
    env, fs,
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    domain::{PartialQuotaSettings, QuotaSettings, RecordBook},
    errors::CoreError,
};

use super::{Result, StorageBackend};

const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;
const DEFAULT_DIR_NAME: &str = ".cane_core";
const BOOK_FILE: &str = "records.json";
const QUOTA_FILE: &str = "quota.json";
const BACKUP_DIR: &str = "backups";

/// Returns the application data directory, defaulting to `~/.cane_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("CANE_CORE_HOME") {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// JSON-file persistence with atomic writes and timestamped backups.
#[derive(Clone)]
pub struct JsonStorage {
    root: PathBuf,
    backups_dir: PathBuf,
    book_file: PathBuf,
    quota_file: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let root = root.unwrap_or_else(app_data_dir);
        ensure_dir(&root)?;
        let backups_dir = root.join(BACKUP_DIR);
        ensure_dir(&backups_dir)?;
        Ok(Self {
            book_file: root.join(BOOK_FILE),
            quota_file: root.join(QUOTA_FILE),
            backups_dir,
            root,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn book_path(&self) -> &Path {
        &self.book_file
    }

    fn backup_existing_book(&self) -> Result<()> {
        if !self.book_file.exists() {
            return Ok(());
        }
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let backup_name = format!("records_{}.{}", timestamp, BACKUP_EXTENSION);
        fs::copy(&self.book_file, self.backups_dir.join(backup_name))?;
        self.prune_backups()?;
        Ok(())
    }

    fn prune_backups(&self) -> Result<()> {
        let backups = self.list_backups()?;
        for entry in backups.iter().skip(self.retention) {
            let _ = fs::remove_file(self.backups_dir.join(entry));
        }
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn save_book(&self, book: &RecordBook) -> Result<()> {
        self.backup_existing_book()?;
        let json = serde_json::to_string_pretty(book)?;
        let tmp = tmp_path(&self.book_file);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.book_file)?;
        Ok(())
    }

    fn load_book(&self) -> Result<RecordBook> {
        if !self.book_file.exists() {
            return Ok(RecordBook::new(Utc::now()));
        }
        let data = fs::read_to_string(&self.book_file)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn save_quota(&self, quota: &QuotaSettings) -> Result<()> {
        let json = serde_json::to_string_pretty(quota)?;
        let tmp = tmp_path(&self.quota_file);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.quota_file)?;
        Ok(())
    }

    /// Loads goal state through the partial-shape migration, so old installs
    /// and hand-edited files come back complete and defaulted.
    fn load_quota(&self) -> Result<QuotaSettings> {
        if !self.quota_file.exists() {
            return Ok(QuotaSettings::default());
        }
        let data = fs::read_to_string(&self.quota_file)?;
        let partial: PartialQuotaSettings = serde_json::from_str(&data)?;
        Ok(QuotaSettings::from_partial(partial))
    }

    fn backup_book(&self, book: &RecordBook, note: Option<&str>) -> Result<()> {
        ensure_dir(&self.backups_dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut file_stem = format!("records_{}", timestamp);
        if let Some(label) = sanitize_backup_note(note) {
            file_stem.push('_');
            file_stem.push_str(&label);
        }
        let path = self
            .backups_dir
            .join(format!("{}.{}", file_stem, BACKUP_EXTENSION));
        let json = serde_json::to_string_pretty(book)?;
        write_atomic(&path, &json)?;
        self.prune_backups()?;
        Ok(())
    }

    fn list_backups(&self) -> Result<Vec<String>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(name.to_string());
            }
        }
        entries.sort_by(|a, b| parse_backup_timestamp(b).cmp(&parse_backup_timestamp(a)));
        Ok(entries)
    }

    fn restore_book(&self, backup_name: &str) -> Result<RecordBook> {
        let backup_path = self.backups_dir.join(backup_name);
        if !backup_path.exists() {
            return Err(CoreError::StorageError(format!(
                "backup `{}` not found",
                backup_name
            )));
        }
        fs::copy(&backup_path, &self.book_file)?;
        let data = fs::read_to_string(&self.book_file)?;
        Ok(serde_json::from_str(&data)?)
    }
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if ch.is_whitespace() || matches!(ch, '-' | '.') {
            if !sanitized.is_empty() && !last_dash {
                sanitized.push('-');
                last_dash = true;
            }
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = name.split('_').collect();
    if parts.len() < 3 {
        return None;
    }
    let date_part = parts.get(1)?;
    let time_part = parts.get(2)?;
    if !is_digits(date_part, 8) {
        return None;
    }
    let time_digits = time_part.trim_end_matches(".json");
    if !is_digits(time_digits, 4) {
        return None;
    }
    let raw = format!("{}{}", date_part, time_digits);
    NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WeighRecord;
    use tempfile::TempDir;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage =
            JsonStorage::new(Some(temp.path().to_path_buf()), Some(3)).expect("json storage");
        (storage, temp)
    }

    fn sample_book() -> RecordBook {
        let mut book = RecordBook::new(Utc::now());
        book.add_record(
            WeighRecord::new("10234", "15/2/2568", "09:41", 15_000.0, 1),
            Utc::now(),
        );
        book
    }

    #[test]
    fn book_save_and_load_round_trip() {
        let (storage, _guard) = storage_with_temp_dir();
        storage.save_book(&sample_book()).expect("save");
        let loaded = storage.load_book().expect("load");
        assert_eq!(loaded.record_count(), 1);
        assert_eq!(loaded.records[0].ticket_number, "10234");
    }

    #[test]
    fn missing_book_loads_empty() {
        let (storage, _guard) = storage_with_temp_dir();
        let loaded = storage.load_book().expect("load");
        assert_eq!(loaded.record_count(), 0);
    }

    #[test]
    fn missing_quota_loads_defaults() {
        let (storage, _guard) = storage_with_temp_dir();
        let loaded = storage.load_quota().expect("load");
        assert_eq!(loaded, QuotaSettings::default());
    }

    #[test]
    fn partial_quota_files_migrate_on_load() {
        let (storage, _guard) = storage_with_temp_dir();
        fs::write(
            storage.base_dir().join(QUOTA_FILE),
            r#"{"target_tons": 750.0}"#,
        )
        .expect("write partial");
        let loaded = storage.load_quota().expect("load");
        assert_eq!(loaded.target_tons, 750.0);
        assert_eq!(loaded.current_goal_start_ms, 0);
        assert!(loaded.history.is_empty());
    }

    #[test]
    fn backup_writes_timestamped_files() {
        let (storage, _guard) = storage_with_temp_dir();
        let book = sample_book();
        storage.save_book(&book).expect("save");
        storage.backup_book(&book, Some("monthly")).expect("backup");
        let backups = storage.list_backups().expect("list");
        assert!(
            !backups.is_empty(),
            "expected at least one backup file to be created"
        );
        assert!(backups[0].contains("monthly"));
    }

    #[test]
    fn restore_round_trips_through_a_backup() {
        let (storage, _guard) = storage_with_temp_dir();
        let book = sample_book();
        storage.save_book(&book).expect("save");
        storage.backup_book(&book, None).expect("backup");
        let backups = storage.list_backups().expect("list");
        let restored = storage.restore_book(&backups[0]).expect("restore");
        assert_eq!(restored.record_count(), 1);
    }

    #[test]
    fn restore_of_unknown_backup_fails() {
        let (storage, _guard) = storage_with_temp_dir();
        assert!(storage.restore_book("records_19700101_0000.json").is_err());
    }
}

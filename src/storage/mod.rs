pub mod json_backend;

use crate::domain::{QuotaSettings, RecordBook};
use crate::errors::CoreError;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Abstraction over persistence backends for the record book and goal state.
///
/// Persisted state is just the serialized record set and the quota value; the
/// backend owns layout, atomicity, and backups.
pub trait StorageBackend: Send + Sync {
    fn save_book(&self, book: &RecordBook) -> Result<()>;
    fn load_book(&self) -> Result<RecordBook>;
    fn save_quota(&self, quota: &QuotaSettings) -> Result<()>;
    fn load_quota(&self) -> Result<QuotaSettings>;
    fn backup_book(&self, book: &RecordBook, note: Option<&str>) -> Result<()>;
    fn list_backups(&self) -> Result<Vec<String>>;
    fn restore_book(&self, backup_name: &str) -> Result<RecordBook>;
}

pub use json_backend::JsonStorage;

pub mod book;
pub mod common;
pub mod quota;
pub mod record;

pub use book::RecordBook;
pub use quota::{GoalHistory, PartialQuotaSettings, QuotaSettings, DEFAULT_TARGET_TONS};
pub use record::WeighRecord;

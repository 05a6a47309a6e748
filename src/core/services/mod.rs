pub mod forecast_service;
pub mod quota_service;
pub mod record_service;
pub mod summary_service;

pub use forecast_service::ForecastService;
pub use quota_service::QuotaService;
pub use record_service::RecordService;
pub use summary_service::SummaryService;

use crate::errors::CoreError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("{0}")]
    Invalid(String),
}

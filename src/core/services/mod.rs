pub mod forecast_service;

pub use forecast_service::{Balance, ForecastService};

use crate::{config::ConfigError, errors::ForecastError, storage::StorageError};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Forecast(#[from] ForecastError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

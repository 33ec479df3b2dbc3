//! Error type for `pengawas-store-sqlite`.

use pengawas_core::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Domain rule violations (missing plan, already published, ...).
  #[error(transparent)]
  Core(#[from] pengawas_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown plan status: {0:?}")]
  UnknownStatus(String),
}

impl DomainError for Error {
  fn domain(&self) -> Option<&pengawas_core::Error> {
    match self {
      Error::Core(e) => Some(e),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

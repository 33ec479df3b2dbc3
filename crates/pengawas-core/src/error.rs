//! Error types for `pengawas-core`.

use thiserror::Error;
use uuid::Uuid;

/// The external collaborator a report fetch was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Collaborator {
  PlanStore,
  SchoolDirectory,
  ActivityLog,
  SupervisorDirectory,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("plan not found: {0}")]
  PlanNotFound(Uuid),

  #[error("supervisor not found: {0}")]
  SupervisorNotFound(Uuid),

  #[error("plan {0} is already published")]
  PlanAlreadyPublished(Uuid),

  #[error("plan {id} is incomplete: {reason}")]
  IncompletePlan { id: Uuid, reason: String },

  #[error("invalid period label: {0:?}")]
  InvalidPeriodLabel(String),

  #[error("invalid period: {0}")]
  InvalidPeriod(String),

  /// A collaborator failed while a report was being assembled. The whole
  /// request fails; no partial report is produced.
  #[error("{collaborator} fetch failed: {source}")]
  Fetch {
    collaborator: Collaborator,
    #[source]
    source:       Box<dyn std::error::Error + Send + Sync>,
  },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  pub(crate) fn fetch<E>(collaborator: Collaborator, source: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Fetch { collaborator, source: Box::new(source) }
  }
}

/// Lets generic callers recover the domain error carried by a backend error.
pub trait DomainError {
  fn domain(&self) -> Option<&Error>;
}

impl DomainError for Error {
  fn domain(&self) -> Option<&Error> { Some(self) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use pengawas_core::DomainError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Map a backend error, surfacing domain failures with their own status.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + DomainError + Send + Sync + 'static,
  {
    let mapped = e.domain().and_then(Self::from_domain);
    mapped.unwrap_or_else(|| Self::Store(Box::new(e)))
  }

  /// Map a backend error that carries no domain information.
  pub fn backend<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }

  fn from_domain(e: &pengawas_core::Error) -> Option<Self> {
    use pengawas_core::Error as E;

    match e {
      E::PlanNotFound(_) | E::SupervisorNotFound(_) => Some(Self::NotFound(e.to_string())),
      E::PlanAlreadyPublished(_) => Some(Self::Conflict(e.to_string())),
      E::IncompletePlan { .. } | E::InvalidPeriodLabel(_) | E::InvalidPeriod(_) => {
        Some(Self::BadRequest(e.to_string()))
      }
      E::Fetch { .. } | E::Serialization(_) => None,
    }
  }
}

impl From<pengawas_core::Error> for ApiError {
  fn from(e: pengawas_core::Error) -> Self { Self::store(e) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => {
        error!(error = %e, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

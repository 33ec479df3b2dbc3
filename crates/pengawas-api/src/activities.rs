//! Handlers for `/activities` (mentoring visits).
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/activities` | `?owner_id&start&end`, inclusive dates |
//! | `POST` | `/activities` | Body: [`NewActivity`]; returns 201 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use pengawas_core::{
  directory::{Activity, NewActivity},
  store::PortalStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct RangeParams {
  pub owner_id: Uuid,
  pub start:    NaiveDate,
  pub end:      NaiveDate,
}

/// `GET /activities?owner_id=<id>&start=2025-01-01&end=2025-03-31`
pub async fn list<S: PortalStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<RangeParams>,
) -> Result<Json<Vec<Activity>>, ApiError> {
  if params.end < params.start {
    return Err(ApiError::BadRequest("end is before start".into()));
  }
  let activities = store
    .list_activities_in_range(params.owner_id, params.start, params.end)
    .await
    .map_err(ApiError::backend)?;
  Ok(Json(activities))
}

/// `POST /activities`: returns 201 + the stored activity.
pub async fn create<S: PortalStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewActivity>,
) -> Result<impl IntoResponse, ApiError> {
  if body.school_id.trim().is_empty() {
    return Err(ApiError::BadRequest("school_id must not be empty".into()));
  }
  let activity = store.record_activity(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(activity)))
}

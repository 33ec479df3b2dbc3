//! Handlers for the school and supervisor directories.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/schools` | All schools, by name |
//! | `GET`  | `/schools/:id` | 404 if not found |
//! | `PUT`  | `/schools/:id` | Create or replace |
//! | `GET`  | `/supervisors/:id` | 404 if not found |
//! | `PUT`  | `/supervisors/:id` | Create or replace |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use pengawas_core::{
  directory::{SchoolInfo, Supervisor},
  store::PortalStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

// ─── Schools ──────────────────────────────────────────────────────────────────

/// `GET /schools`
pub async fn list_schools<S: PortalStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<SchoolInfo>>, ApiError> {
  let schools = store.list_schools().await.map_err(ApiError::store)?;
  Ok(Json(schools))
}

/// `GET /schools/:id`
pub async fn get_school<S: PortalStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<SchoolInfo>, ApiError> {
  let ids = [id];
  let school = store
    .get_schools(&ids)
    .await
    .map_err(ApiError::backend)?
    .into_iter()
    .next()
    .ok_or_else(|| ApiError::NotFound(format!("school {} not found", ids[0])))?;
  Ok(Json(school))
}

#[derive(Debug, Deserialize)]
pub struct SchoolBody {
  pub registration_number: String,
  pub name:                String,
  pub region:              String,
}

/// `PUT /schools/:id`
pub async fn put_school<S: PortalStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Json(body): Json<SchoolBody>,
) -> Result<Json<SchoolInfo>, ApiError> {
  if body.name.trim().is_empty() {
    return Err(ApiError::BadRequest("school name must not be empty".into()));
  }
  let school = store
    .upsert_school(SchoolInfo {
      id,
      registration_number: body.registration_number,
      name: body.name,
      region: body.region,
    })
    .await
    .map_err(ApiError::store)?;
  Ok(Json(school))
}

// ─── Supervisors ──────────────────────────────────────────────────────────────

/// `GET /supervisors/:id`
pub async fn get_supervisor<S: PortalStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Supervisor>, ApiError> {
  let supervisor = store
    .get_supervisor(id)
    .await
    .map_err(ApiError::backend)?
    .ok_or_else(|| ApiError::NotFound(format!("supervisor {id} not found")))?;
  Ok(Json(supervisor))
}

#[derive(Debug, Deserialize)]
pub struct SupervisorBody {
  pub name:                String,
  pub registration_number: String,
  pub title:               String,
}

/// `PUT /supervisors/:id`
pub async fn put_supervisor<S: PortalStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<SupervisorBody>,
) -> Result<Json<Supervisor>, ApiError> {
  let supervisor = store
    .upsert_supervisor(Supervisor {
      id,
      name: body.name,
      registration_number: body.registration_number,
      title: body.title,
    })
    .await
    .map_err(ApiError::store)?;
  Ok(Json(supervisor))
}

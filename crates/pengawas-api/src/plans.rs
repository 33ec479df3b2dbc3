//! Handlers for `/plans` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/plans` | `?owner_id` required; newest first |
//! | `POST`   | `/plans` | Body: [`NewPlanBody`]; returns 201 + draft plan |
//! | `GET`    | `/plans/:id` | 404 if not found |
//! | `PUT`    | `/plans/:id/form` | Autosave; body: [`FormData`]; 409 once published |
//! | `POST`   | `/plans/:id/publish` | 400 if the interview is incomplete |
//! | `DELETE` | `/plans/:id` | Drafts only; returns 204 |
//! | `GET`    | `/plans/:id/classification` | Levels and strategy for the current answers |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use pengawas_core::{
  answer::FormData,
  plan::{NewPlan, PlanRecord},
  store::PortalStore,
  strategy::{Classification, classify},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub owner_id: Uuid,
}

/// `GET /plans?owner_id=<id>`
pub async fn list<S: PortalStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<PlanRecord>>, ApiError> {
  let plans = store.list_plans(params.owner_id).await.map_err(ApiError::store)?;
  Ok(Json(plans))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /plans`.
#[derive(Debug, Deserialize)]
pub struct NewPlanBody {
  pub owner_id:     Uuid,
  #[serde(default)]
  pub school_ids:   Vec<String>,
  /// `YYYY` or `YYYY-Tn`.
  pub period_label: String,
}

impl TryFrom<NewPlanBody> for NewPlan {
  type Error = pengawas_core::Error;

  fn try_from(b: NewPlanBody) -> Result<Self, Self::Error> {
    Ok(NewPlan {
      owner_id:     b.owner_id,
      school_ids:   b.school_ids,
      period_label: b.period_label.parse()?,
    })
  }
}

/// `POST /plans`: returns 201 + the draft plan.
pub async fn create<S: PortalStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewPlanBody>,
) -> Result<impl IntoResponse, ApiError> {
  let input = NewPlan::try_from(body)?;
  let plan = store.create_plan(input).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(plan)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /plans/:id`
pub async fn get_one<S: PortalStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<PlanRecord>, ApiError> {
  let plan = store
    .get_plan(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("plan {id} not found")))?;
  Ok(Json(plan))
}

// ─── Autosave ─────────────────────────────────────────────────────────────────

/// `PUT /plans/:id/form`: replaces the whole form. Clients debounce.
pub async fn save_form<S: PortalStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<FormData>,
) -> Result<Json<PlanRecord>, ApiError> {
  let plan = store.save_form_data(id, body).await.map_err(ApiError::store)?;
  Ok(Json(plan))
}

// ─── Publish ──────────────────────────────────────────────────────────────────

/// `POST /plans/:id/publish`
pub async fn publish<S: PortalStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<PlanRecord>, ApiError> {
  let plan = store.publish_plan(id).await.map_err(ApiError::store)?;
  Ok(Json(plan))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /plans/:id`
pub async fn delete_one<S: PortalStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  store.delete_plan(id).await.map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Classification ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PlanClassification {
  pub plan_id:           Uuid,
  #[serde(flatten)]
  pub classification:    Classification,
  /// Unanswered questions; levels are still computed, defaulting low.
  pub missing_questions: Vec<&'static str>,
}

/// `GET /plans/:id/classification`
pub async fn classification<S: PortalStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<PlanClassification>, ApiError> {
  let plan = store
    .get_plan(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("plan {id} not found")))?;

  let answers = &plan.form_data.selected_answers;
  Ok(Json(PlanClassification {
    plan_id:           plan.id,
    classification:    classify(answers),
    missing_questions: answers.missing_questions(),
  }))
}

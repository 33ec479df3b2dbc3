//! Handlers for `/reports` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/reports/triwulan` | `?owner_id&year&quarter` (quarter 1–4) |
//! | `GET`  | `/reports/tahunan`  | `?owner_id&year` |
//!
//! Any upstream failure yields a 500; partial reports are never returned.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use pengawas_core::{
  period::{Period, Quarter},
  report::{Report, build_report},
  store::PortalStore,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct QuarterlyParams {
  pub owner_id: Uuid,
  pub year:     i32,
  pub quarter:  Quarter,
}

#[derive(Debug, Deserialize)]
pub struct AnnualParams {
  pub owner_id: Uuid,
  pub year:     i32,
}

/// `GET /reports/triwulan?owner_id=<id>&year=2025&quarter=2`
pub async fn quarterly<S: PortalStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<QuarterlyParams>,
) -> Result<Json<Report>, ApiError> {
  let period = Period::quarter(params.year, params.quarter);
  report(store.as_ref(), params.owner_id, period).await
}

/// `GET /reports/tahunan?owner_id=<id>&year=2025`
pub async fn annual<S: PortalStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<AnnualParams>,
) -> Result<Json<Report>, ApiError> {
  report(store.as_ref(), params.owner_id, Period::year(params.year)).await
}

async fn report<S: PortalStore>(
  store: &S,
  owner_id: Uuid,
  period: Period,
) -> Result<Json<Report>, ApiError> {
  let report = build_report(store, owner_id, period).await?;
  info!(%owner_id, ?period, rows = report.rows.len(), "report generated");
  Ok(Json(report))
}

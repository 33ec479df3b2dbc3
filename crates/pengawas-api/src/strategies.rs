//! Stateless classification endpoints.
//!
//! `GET /strategies` lists the six profiles; `POST /classify` classifies an
//! answer set without storing anything.

use axum::Json;
use pengawas_core::{
  answer::AnswerSet,
  strategy::{ALL_PROFILES, Classification, StrategyProfile, classify},
};

/// `GET /strategies`
pub async fn list() -> Json<[&'static StrategyProfile; 6]> { Json(ALL_PROFILES) }

/// `POST /classify`, body: `{"q1_1":"k3", ...}`
pub async fn classify_answers(Json(answers): Json<AnswerSet>) -> Json<Classification> {
  Json(classify(&answers))
}

//! JSON REST API for the Pengawas portal.
//!
//! Exposes an axum [`Router`] backed by any [`PortalStore`]. Auth, TLS, and
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", pengawas_api::api_router(store.clone()))
//! ```

pub mod activities;
pub mod directory;
pub mod error;
pub mod plans;
pub mod reports;
pub mod strategies;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use pengawas_core::store::PortalStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: PortalStore + 'static,
{
  Router::new()
    // Plans
    .route("/plans", get(plans::list::<S>).post(plans::create::<S>))
    .route("/plans/{id}", get(plans::get_one::<S>).delete(plans::delete_one::<S>))
    .route("/plans/{id}/form", put(plans::save_form::<S>))
    .route("/plans/{id}/publish", post(plans::publish::<S>))
    .route("/plans/{id}/classification", get(plans::classification::<S>))
    // Classification
    .route("/strategies", get(strategies::list))
    .route("/classify", post(strategies::classify_answers))
    // Directory
    .route("/schools", get(directory::list_schools::<S>))
    .route(
      "/schools/{id}",
      get(directory::get_school::<S>).put(directory::put_school::<S>),
    )
    .route(
      "/supervisors/{id}",
      get(directory::get_supervisor::<S>).put(directory::put_supervisor::<S>),
    )
    // Activities
    .route("/activities", get(activities::list::<S>).post(activities::create::<S>))
    // Reports
    .route("/reports/triwulan", get(reports::quarterly::<S>))
    .route("/reports/tahunan", get(reports::annual::<S>))
    .with_state(store)
}

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
    response::Response,
  };
  use pengawas_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  use super::*;

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    api_router(Arc::new(store))
  }

  async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  fn complete_form() -> Value {
    json!({
      "selectedAnswers": { "q1_1": "k1", "q1_2": "k2", "q2_1": "c5", "q2_2": "c6" },
      "selectedMethods": ["lesson study"]
    })
  }

  /// Supervisor, two schools, and a published Q1 plan covering both.
  async fn seeded(app: &Router) -> (Uuid, String) {
    let owner = Uuid::new_v4();
    let resp = send(
      app,
      Method::PUT,
      &format!("/supervisors/{owner}"),
      Some(json!({
        "name": "Rina Wulandari, S.Pd.",
        "registration_number": "198203142006042011",
        "title": "Pengawas Sekolah Pertama"
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    for (id, name) in [("20400101", "SD Negeri Tegalrejo"), ("20400102", "SD Negeri Bener")] {
      let resp = send(
        app,
        Method::PUT,
        &format!("/schools/{id}"),
        Some(json!({ "registration_number": id, "name": name, "region": "Kota Yogyakarta" })),
      )
      .await;
      assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = send(
      app,
      Method::POST,
      "/plans",
      Some(json!({
        "owner_id": owner,
        "school_ids": ["20400101", "20400102"],
        "period_label": "2025-T1"
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let plan_id = json_body(resp).await["id"].as_str().unwrap().to_owned();

    let resp =
      send(app, Method::PUT, &format!("/plans/{plan_id}/form"), Some(complete_form())).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(app, Method::POST, &format!("/plans/{plan_id}/publish"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["status"], "published");

    (owner, plan_id)
  }

  // ── Plans ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn missing_plan_returns_404() {
    let app = app().await;
    let resp = send(&app, Method::GET, &format!("/plans/{}", Uuid::new_v4()), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(json_body(resp).await["error"].is_string());
  }

  #[tokio::test]
  async fn invalid_period_label_returns_400() {
    let app = app().await;
    let resp = send(
      &app,
      Method::POST,
      "/plans",
      Some(json!({ "owner_id": Uuid::new_v4(), "school_ids": [], "period_label": "Q5-2025" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn publishing_incomplete_plan_returns_400() {
    let app = app().await;
    let resp = send(
      &app,
      Method::POST,
      "/plans",
      Some(json!({ "owner_id": Uuid::new_v4(), "school_ids": ["s1"], "period_label": "2025" })),
    )
    .await;
    let plan_id = json_body(resp).await["id"].as_str().unwrap().to_owned();

    let resp = send(&app, Method::POST, &format!("/plans/{plan_id}/publish"), None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn published_plan_rejects_autosave_with_409() {
    let app = app().await;
    let (_, plan_id) = seeded(&app).await;

    let resp =
      send(&app, Method::PUT, &format!("/plans/{plan_id}/form"), Some(complete_form())).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = send(&app, Method::DELETE, &format!("/plans/{plan_id}"), None).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
  }

  #[tokio::test]
  async fn draft_plan_can_be_deleted() {
    let app = app().await;
    let resp = send(
      &app,
      Method::POST,
      "/plans",
      Some(json!({ "owner_id": Uuid::new_v4(), "period_label": "2025-T4" })),
    )
    .await;
    let plan_id = json_body(resp).await["id"].as_str().unwrap().to_owned();

    let resp = send(&app, Method::DELETE, &format!("/plans/{plan_id}"), None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = send(&app, Method::GET, &format!("/plans/{plan_id}"), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn plan_classification_reports_missing_questions() {
    let app = app().await;
    let resp = send(
      &app,
      Method::POST,
      "/plans",
      Some(json!({ "owner_id": Uuid::new_v4(), "school_ids": ["s1"], "period_label": "2025" })),
    )
    .await;
    let plan_id = json_body(resp).await["id"].as_str().unwrap().to_owned();
    send(
      &app,
      Method::PUT,
      &format!("/plans/{plan_id}/form"),
      Some(json!({ "selectedAnswers": { "q2_1": "c5" } })),
    )
    .await;

    let resp = send(&app, Method::GET, &format!("/plans/{plan_id}/classification"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["reflection"], "berkembang");
    assert_eq!(body["capacity"], "tinggi");
    assert_eq!(body["strategy"]["title"], "Pemicu Perubahan");
    assert_eq!(body["missing_questions"], json!(["q1_1", "q1_2", "q2_2"]));
  }

  // ── Classification ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn classify_endpoint() {
    let app = app().await;
    let resp = send(
      &app,
      Method::POST,
      "/classify",
      Some(json!({ "q1_1": "k1", "q1_2": "k3", "q2_1": "c3", "q2_2": "c4" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["reflection"], "berdaya");
    assert_eq!(body["capacity"], "sedang");
    assert_eq!(body["strategy"]["title"], "Perubahan Berangsur");
  }

  #[tokio::test]
  async fn strategies_lists_six_profiles() {
    let app = app().await;
    let resp = send(&app, Method::GET, "/strategies", None).await;
    let body = json_body(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 6);
  }

  // ── Reports ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn quarterly_report() {
    let app = app().await;
    let (owner, _) = seeded(&app).await;

    let resp = send(
      &app,
      Method::POST,
      "/activities",
      Some(json!({ "owner_id": owner, "school_id": "20400102", "date": "2025-02-03" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = send(
      &app,
      Method::GET,
      &format!("/reports/triwulan?owner_id={owner}&year=2025&quarter=1"),
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;

    assert_eq!(body["supervisor"]["registration_number"], "198203142006042011");
    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["school_name"], "SD Negeri Bener");
    assert_eq!(rows[0]["sequence"], 1);
    assert_eq!(rows[1]["school_name"], "SD Negeri Tegalrejo");
    assert_eq!(rows[1]["strategy"], "Pemicu Perubahan");
    assert_eq!(rows[1]["methods"], json!(["lesson study"]));

    let feb = &body["activities"][1];
    assert_eq!(feb["name"], "Februari");
    assert_eq!(feb["visits"][0]["place"], "SD Negeri Bener");
  }

  #[tokio::test]
  async fn other_quarter_is_empty_and_annual_includes_plan() {
    let app = app().await;
    let (owner, _) = seeded(&app).await;

    let resp = send(
      &app,
      Method::GET,
      &format!("/reports/triwulan?owner_id={owner}&year=2025&quarter=2"),
      None,
    )
    .await;
    assert!(json_body(resp).await["rows"].as_array().unwrap().is_empty());

    let resp =
      send(&app, Method::GET, &format!("/reports/tahunan?owner_id={owner}&year=2025"), None)
        .await;
    let body = json_body(resp).await;
    assert_eq!(body["rows"].as_array().unwrap().len(), 2);
    assert_eq!(body["activities"].as_array().unwrap().len(), 12);
  }

  #[tokio::test]
  async fn report_for_unknown_supervisor_returns_404() {
    let app = app().await;
    let resp = send(
      &app,
      Method::GET,
      &format!("/reports/tahunan?owner_id={}&year=2025", Uuid::new_v4()),
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}

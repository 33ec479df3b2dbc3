//! HTTP server assembly for the Pengawas portal.
//!
//! Mounts the JSON API under `/api`, adds a `/health` probe and request
//! tracing. The binary in `main.rs` handles configuration and startup.

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use pengawas_core::store::PortalStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `PENGAWAS_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  /// SQLite database file; a leading `~/` is expanded at startup.
  pub store_path: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_string(),
      port:       8080,
      store_path: PathBuf::from("pengawas.db"),
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the top-level [`Router`] for the portal server.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: PortalStore + 'static,
{
  Router::new()
    .route("/health", get(health))
    .nest("/api", pengawas_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str { "ok" }

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use pengawas_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    router(Arc::new(store))
  }

  fn parse(toml: &str) -> ServerConfig {
    config::Config::builder()
      .add_source(config::File::from_str(toml, config::FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn config_defaults_fill_missing_keys() {
    let cfg = parse("port = 9000");
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.store_path, PathBuf::from("pengawas.db"));
    assert_eq!(cfg.address(), "127.0.0.1:9000");
  }

  #[test]
  fn config_reads_all_keys() {
    let cfg = parse(
      r#"
        host       = "0.0.0.0"
        port       = 80
        store_path = "/var/lib/pengawas/portal.db"
      "#,
    );
    assert_eq!(cfg.address(), "0.0.0.0:80");
    assert_eq!(cfg.store_path, PathBuf::from("/var/lib/pengawas/portal.db"));
  }

  #[tokio::test]
  async fn health_probe() {
    let resp = app()
      .await
      .oneshot(Request::get("/health").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
  }

  #[tokio::test]
  async fn api_is_mounted_under_prefix() {
    let app = app().await;

    let resp = app
      .clone()
      .oneshot(Request::get("/api/strategies").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let profiles: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(profiles.as_array().unwrap().len(), 6);

    let resp = app
      .oneshot(Request::get("/strategies").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}

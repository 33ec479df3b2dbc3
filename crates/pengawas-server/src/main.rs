//! pengawas server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), applies
//! `PENGAWAS_*` environment overrides, opens the SQLite store and serves the
//! portal API over HTTP.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use pengawas_server::ServerConfig;
use pengawas_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Pengawas supervision portal server")]
struct Cli {
  /// TOML configuration file. Missing files fall back to defaults.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let filter = EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy();
  tracing_subscriber::fmt().with_env_filter(filter).init();

  let cli = Cli::parse();
  let cfg = load_config(&cli.config)?;

  let db_path = home_relative(&cfg.store_path);
  info!(path = %db_path.display(), "opening store");
  let store = SqliteStore::open(&db_path)
    .await
    .with_context(|| format!("cannot open database {}", db_path.display()))?;

  let listener = TcpListener::bind(cfg.address())
    .await
    .with_context(|| format!("cannot bind {}", cfg.address()))?;
  info!("pengawas listening on http://{}", cfg.address());

  axum::serve(listener, pengawas_server::router(Arc::new(store)))
    .await
    .context("http server stopped")
}

/// File settings first, then `PENGAWAS_HOST`, `PENGAWAS_PORT`, ...
fn load_config(path: &Path) -> anyhow::Result<ServerConfig> {
  config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("PENGAWAS"))
    .build()
    .and_then(|settings| settings.try_deserialize())
    .with_context(|| format!("invalid configuration in {}", path.display()))
}

/// Resolve a `~/`-prefixed path against `$HOME`.
fn home_relative(path: &Path) -> PathBuf {
  match (path.strip_prefix("~"), std::env::var_os("HOME")) {
    (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
    _ => path.to_path_buf(),
  }
}

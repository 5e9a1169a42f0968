//! Process-level wiring for the Roster server.
//!
//! Owns the runtime configuration and assembles the full application: the
//! JSON API from `roster-api`, a plain-text health route, and request tracing.

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{Router, routing::get};
use roster_api::{AppState, auth::TokenService};
use roster_core::store::UserStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

/// Body of `GET /`.
pub const HEALTH_MESSAGE: &str = "contacts management is running";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ROSTER_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                String,
  #[serde(default = "default_port")]
  pub port:                u16,
  #[serde(default = "default_store_path")]
  pub store_path:          PathBuf,
  /// HS256 signing secret for bearer tokens.
  pub access_token_secret: String,
  /// Lifetime of issued tokens.
  #[serde(default = "default_token_ttl_secs")]
  pub token_ttl_secs:      u64,
}

fn default_host() -> String { "0.0.0.0".to_owned() }
fn default_port() -> u16 { 5000 }
fn default_store_path() -> PathBuf { PathBuf::from("roster.db") }
fn default_token_ttl_secs() -> u64 { 3600 }

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn token_service(&self) -> TokenService {
    TokenService::new(
      self.access_token_secret.as_bytes(),
      Duration::from_secs(self.token_ttl_secs),
    )
  }
}

// ─── Application ──────────────────────────────────────────────────────────────

/// Build the complete application router over `store`.
pub fn app<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: UserStore + Clone + 'static,
{
  let state = AppState {
    store,
    tokens: Arc::new(config.token_service()),
  };

  Router::new()
    .route("/", get(health))
    .merge(roster_api::api_router(state))
    .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str { HEALTH_MESSAGE }

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use roster_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  fn load(toml: &str) -> Result<ServerConfig, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from_str(toml, config::FileFormat::Toml))
      .build()?
      .try_deserialize()
  }

  #[test]
  fn config_defaults_apply() {
    let cfg = load(r#"access_token_secret = "s3cret""#).unwrap();
    assert_eq!(cfg.host, "0.0.0.0");
    assert_eq!(cfg.port, 5000);
    assert_eq!(cfg.token_ttl_secs, 3600);
    assert_eq!(cfg.address(), "0.0.0.0:5000");
  }

  #[test]
  fn config_overrides_defaults() {
    let cfg = load(
      r#"
        host = "127.0.0.1"
        port = 8080
        store_path = "/tmp/r.db"
        access_token_secret = "s3cret"
        token_ttl_secs = 60
      "#,
    )
    .unwrap();
    assert_eq!(cfg.address(), "127.0.0.1:8080");
    assert_eq!(cfg.store_path, PathBuf::from("/tmp/r.db"));
    assert_eq!(cfg.token_ttl_secs, 60);
  }

  #[test]
  fn config_requires_secret() {
    assert!(load("port = 5000").is_err());
  }

  async fn test_app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let cfg = load(r#"access_token_secret = "s3cret""#).unwrap();
    app(Arc::new(store), &cfg)
  }

  #[tokio::test]
  async fn health_route_answers() {
    let resp = test_app()
      .await
      .oneshot(Request::get("/").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], HEALTH_MESSAGE.as_bytes());
  }

  #[tokio::test]
  async fn api_routes_are_mounted() {
    let resp = test_app()
      .await
      .oneshot(Request::get("/all-users").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let users: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(users, serde_json::json!([]));
  }
}

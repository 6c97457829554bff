//! Runtime wiring for the Folio HTTP server: configuration and the full
//! application router.

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  extract::DefaultBodyLimit,
  http::{HeaderName, HeaderValue, Method, header},
};
use folio_api::AppState;
use folio_core::{filter::PageLimits, store::Repository};
use serde::Deserialize;
use tower_http::{
  cors::{Any, CorsLayer},
  set_header::SetResponseHeaderLayer,
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration. Every key is optional; see [`Default`].
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  pub default_page_limit: u32,
  pub max_page_limit:     u32,
  pub body_limit_bytes:   usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    let limits = PageLimits::default();
    Self {
      host:               "127.0.0.1".to_owned(),
      port:               8080,
      store_path:         PathBuf::from("folio.db"),
      default_page_limit: limits.default_limit,
      max_page_limit:     limits.max_limit,
      body_limit_bytes:   1024 * 1024,
    }
  }
}

impl ServerConfig {
  pub fn page_limits(&self) -> PageLimits {
    PageLimits {
      default_limit: self.default_page_limit,
      max_limit:     self.max_page_limit,
    }
  }

  /// Reject values the server cannot run with.
  pub fn validate(&self) -> anyhow::Result<()> {
    if !self.page_limits().is_consistent() {
      anyhow::bail!(
        "default_page_limit ({}) must be between 1 and max_page_limit ({})",
        self.default_page_limit,
        self.max_page_limit
      );
    }
    if self.body_limit_bytes == 0 {
      anyhow::bail!("body_limit_bytes must be positive");
    }
    Ok(())
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Headers stamped on every response unless a handler already set them.
const SECURITY_HEADERS: [(HeaderName, &str); 5] = [
  (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
  (header::X_FRAME_OPTIONS, "DENY"),
  (header::X_XSS_PROTECTION, "1; mode=block"),
  (header::REFERRER_POLICY, "strict-origin-when-cross-origin"),
  (header::CONTENT_SECURITY_POLICY, "default-src 'self'"),
];

fn cors() -> CorsLayer {
  CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([
      Method::GET,
      Method::POST,
      Method::PUT,
      Method::DELETE,
      Method::OPTIONS,
    ])
    .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
}

/// Build the complete application: the API under `/api/v1`, `/health` at the
/// root, request tracing, CORS, security headers and the JSON body limit.
pub fn app<R>(config: &ServerConfig, repo: Arc<R>) -> Router
where
  R: Repository + 'static,
{
  let state = AppState::new(repo, config.page_limits());

  let mut router = Router::new()
    .nest("/api/v1", folio_api::api_router(state.clone()))
    .merge(folio_api::health_router(state))
    .layer(DefaultBodyLimit::max(config.body_limit_bytes));

  for (name, value) in SECURITY_HEADERS {
    router = router.layer(SetResponseHeaderLayer::if_not_present(
      name,
      HeaderValue::from_static(value),
    ));
  }

  router.layer(cors()).layer(TraceLayer::new_for_http())
}

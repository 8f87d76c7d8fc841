//! HTTP layer for Classbook.
//!
//! Exposes an axum [`Router`] serving the student portal (dashboard, entry
//! forms, CSV export) backed by any [`StudentStore`].

pub mod error;
pub mod flash;
pub mod handlers;
pub mod html;
pub mod pages;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use classbook_core::store::StudentStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use flash::FlashSigner;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `classbook.toml` and
/// `CLASSBOOK_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:           String,
  #[serde(default = "default_port")]
  pub port:           u16,
  #[serde(default = "default_store_path")]
  pub store_path:     PathBuf,
  /// HMAC key for flash tokens. A random key is generated when absent.
  #[serde(default)]
  pub flash_secret:   Option<String>,
  #[serde(default = "default_flash_ttl_secs")]
  pub flash_ttl_secs: u64,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }
fn default_store_path() -> PathBuf { PathBuf::from("classbook.sqlite3") }
fn default_flash_ttl_secs() -> u64 { 60 }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:           default_host(),
      port:           default_port(),
      store_path:     default_store_path(),
      flash_secret:   None,
      flash_ttl_secs: default_flash_ttl_secs(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: StudentStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
  pub flash:  Arc<FlashSigner>,
}

impl<S: StudentStore> AppState<S> {
  /// Build state from a store and config, keying flash tokens from
  /// `config.flash_secret` or a fresh random key.
  pub fn new(store: S, config: ServerConfig) -> Self {
    let flash = match &config.flash_secret {
      Some(secret) => FlashSigner::new(secret.as_bytes(), config.flash_ttl_secs),
      None => {
        tracing::warn!("no flash_secret configured; using a random per-process key");
        FlashSigner::random(config.flash_ttl_secs)
      }
    };
    Self {
      store:  Arc::new(store),
      config: Arc::new(config),
      flash:  Arc::new(flash),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the portal.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: StudentStore + Clone + 'static,
{
  Router::new()
    .route("/", get(handlers::view::handler::<S>).post(handlers::submit::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

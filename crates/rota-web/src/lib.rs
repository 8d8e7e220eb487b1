//! HTTP layer for the Rota event planner.
//!
//! Exposes an axum [`Router`] serving the server-rendered event pages —
//! creation form, creation, detail view, deletion — backed by any
//! [`EventStore`]. Sessions are consumed (never produced) from a signed
//! cookie; every outcome a user should see travels as a flash message on a
//! redirect.

pub mod cache;
pub mod error;
pub mod flash;
pub mod form;
pub mod handlers;
pub mod messages;
pub mod roster;
pub mod session;
pub mod views;

pub use error::Error;

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{
  Router,
  routing::{get, post},
};
use rota_core::store::EventStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use cache::PersonCache;
use handlers::{create, destroy, show, store, update};

// ─── Configuration ────────────────────────────────────────────────────────────

fn default_place() -> String { "bc-Club".to_string() }

fn default_person_cache_ttl_secs() -> u64 { 600 }

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:           String,
  pub port:           u16,
  pub store_path:     PathBuf,
  /// Secret the session cookie signature is computed with.
  pub session_secret: String,
  /// Venue prefilled on the creation form.
  #[serde(default = "default_place")]
  pub default_place:  String,
  #[serde(default = "default_person_cache_ttl_secs")]
  pub person_cache_ttl_secs: u64,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: EventStore> {
  pub store:   Arc<S>,
  pub config:  Arc<ServerConfig>,
  pub persons: Arc<PersonCache>,
}

impl<S: EventStore> AppState<S> {
  pub fn new(store: S, config: ServerConfig) -> Self {
    let ttl = Duration::from_secs(config.person_cache_ttl_secs);
    Self {
      store:   Arc::new(store),
      config:  Arc::new(config),
      persons: Arc::new(PersonCache::new(ttl)),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the event pages.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: EventStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/events/new", get(create::form::<S>))
    .route(
      "/events/new/{year}/{month}/{day}",
      get(create::form_for_date::<S>),
    )
    .route(
      "/events/new/{year}/{month}/{day}/{template_id}",
      get(create::form_with_template::<S>),
    )
    .route("/events", post(store::handler::<S>))
    .route("/events/{id}", get(show::handler::<S>))
    .route("/events/{id}/update", post(update::handler))
    .route("/events/{id}/delete", post(destroy::handler::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

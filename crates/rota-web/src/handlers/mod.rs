//! HTTP request handlers for the event controller.

pub mod create;
pub mod destroy;
pub mod show;
pub mod store;
pub mod update;

use axum::http::{HeaderMap, header};
use chrono::{Datelike, Utc};

/// Redirect target after denied or completed actions: the calendar of the
/// current month.
pub(crate) fn current_month_url() -> String {
  let today = Utc::now().date_naive();
  format!("/calendar/{}/{:02}", today.year(), today.month())
}

/// Where "back" points: the referring page, else `fallback`.
pub(crate) fn back_url(headers: &HeaderMap, fallback: &str) -> String {
  headers
    .get(header::REFERER)
    .and_then(|v| v.to_str().ok())
    .unwrap_or(fallback)
    .to_string()
}

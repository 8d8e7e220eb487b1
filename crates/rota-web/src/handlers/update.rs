//! Event editing — not implemented yet.
//!
//! The edit flow needs a decision on how roster changes interact with the
//! revision log before it can land; until then the route answers 501.

use axum::{
  extract::Path,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use uuid::Uuid;

pub async fn handler(Path(id): Path<Uuid>) -> Response {
  tracing::debug!("update requested for event {id}");
  (StatusCode::NOT_IMPLEMENTED, "noch nicht implementiert").into_response()
}

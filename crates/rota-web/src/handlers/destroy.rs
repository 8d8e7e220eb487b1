//! Event deletion.
//!
//! Only the marketing and club-committee groups may delete. The store
//! removes entries, schedule and event in that dependency order inside one
//! transaction.

use axum::{
  extract::{Path, State},
  http::HeaderMap,
  response::Response,
};
use uuid::Uuid;

use rota_core::store::EventStore;

use crate::{
  AppState,
  error::Error,
  flash::{Flash, redirect_with_flash},
  handlers::{back_url, current_month_url},
  messages,
  session::RequestContext,
};

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  headers: HeaderMap,
) -> Result<Response, Error>
where
  S: EventStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let ctx = RequestContext::from_headers(&headers, &state.config.session_secret);

  if !ctx.may_manage_events() {
    return Ok(redirect_with_flash(
      &current_month_url(),
      Flash::danger(messages::ACCESS_DENIED),
    ));
  }

  let event = match state
    .store
    .get_event(id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
  {
    Some(event) => event,
    None => {
      // A missing delete target is recoverable, not fatal.
      let back = back_url(&headers, &current_month_url());
      return Ok(redirect_with_flash(
        &back,
        Flash::danger(messages::EVENT_DOESNT_EXIST),
      ));
    }
  };

  let actor = ctx.actor();
  tracing::info!(
    "Delete event: {} deleted event {:?} (ID: {id})",
    actor.display_name,
    event.title,
  );

  state
    .store
    .delete_event(id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  Ok(redirect_with_flash(
    &current_month_url(),
    Flash::success(messages::EVENT_DELETE_OK),
  ))
}

//! The event detail page.

use axum::{
  extract::{Path, State},
  http::HeaderMap,
  response::{Html, IntoResponse, Response},
};
use chrono::Utc;
use uuid::Uuid;

use rota_core::store::EventStore;

use crate::{
  AppState,
  error::Error,
  flash::{Flash, clear_consumed_cookies, redirect_with_flash, take_flash},
  handlers::current_month_url,
  messages,
  session::RequestContext,
  views::event_detail::{self, DetailView},
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

  let event = state
    .store
    .get_event(id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or(Error::NotFound)?;

  // Private events are only visible with a session, whoever it belongs to.
  if event.is_private && !ctx.is_authenticated() {
    return Ok(redirect_with_flash(
      &current_month_url(),
      Flash::danger(messages::ACCESS_DENIED),
    ));
  }

  let place = state
    .store
    .get_place(event.place_id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  let schedule = state
    .store
    .schedule_for_event(id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or(Error::NotFound)?;

  let entries = state
    .store
    .entries_with_assignments(schedule.schedule_id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  let clubs = state
    .store
    .list_clubs()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  let persons = state
    .persons
    .get_or_refresh(|| state.store.list_eligible_persons(Utc::now()))
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  // Client IPs stay in storage, never in a view.
  let revisions = schedule.revisions.redacted();

  let flash = take_flash(&headers);
  let html = event_detail::render(&DetailView {
    event: &event,
    place: place.as_ref(),
    schedule: &schedule,
    entries: &entries,
    clubs: &clubs,
    persons: &persons,
    revisions: &revisions,
    show_private_details: ctx.is_authenticated(),
    may_delete: ctx.may_manage_events(),
    flash: flash.as_ref(),
  })?;

  let mut response = Html(html).into_response();
  clear_consumed_cookies(&mut response, flash.is_some(), false);
  Ok(response)
}

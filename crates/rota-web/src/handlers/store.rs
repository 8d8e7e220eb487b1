//! Event creation (write path).
//!
//! One POST creates the whole aggregate: event, schedule with its revision
//! log, and one entry per submitted roster slot — persisted in a single
//! store transaction, so no partially-created event is ever observable.

use axum::{
  extract::State,
  http::HeaderMap,
  response::{IntoResponse, Redirect, Response},
};
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use rota_core::{schedule::Schedule, store::EventStore};

use crate::{
  AppState,
  error::Error,
  flash::{Flash, redirect_back_with_input},
  form::{EventForm, FormData},
  handlers::back_url,
  messages, roster,
  session::RequestContext,
};

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  body: Bytes,
) -> Result<Response, Error>
where
  S: EventStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let ctx = RequestContext::from_headers(&headers, &state.config.session_secret);
  let form = EventForm::from_form(&FormData::parse(&body));

  if !form.passwords_match() {
    let back = back_url(&headers, "/events/new");
    return Ok(redirect_back_with_input(
      &back,
      Flash::danger(messages::PASSWORD_MISMATCH),
      &body,
    ));
  }

  let place = state
    .store
    .ensure_place(&form.place)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  let now = Utc::now();
  let event =
    form.assemble_event(Uuid::new_v4(), place.place_id, now.date_naive());
  let event_id = event.event_id;
  let title = event.title.clone();

  // Resolve every roster slot's job type, creating unknown ones by title.
  let mut job_types = Vec::with_capacity(form.job_types.len());
  for slot in &form.job_types {
    let job_type = state
      .store
      .ensure_job_type(slot)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;
    job_types.push(job_type);
  }

  let schedule_id = Uuid::new_v4();
  let entries = roster::build_entries(schedule_id, &job_types);
  let actor = ctx.actor();
  let revisions = roster::initial_revisions(&entries, &actor, now);

  let schedule = Schedule {
    schedule_id,
    event_id,
    due_date: None,
    title: form.save_as_template.then(|| {
      if form.template_name.is_empty() {
        title.clone()
      } else {
        form.template_name.clone()
      }
    }),
    is_template: form.save_as_template,
    revisions,
  };

  state
    .store
    .create_event(
      event,
      schedule,
      entries.into_iter().map(|(entry, _)| entry).collect(),
    )
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  tracing::info!(
    "Create event: {} created event {title:?} (ID: {event_id})",
    actor.display_name,
  );

  Ok(Redirect::to(&format!("/events/{event_id}")).into_response())
}

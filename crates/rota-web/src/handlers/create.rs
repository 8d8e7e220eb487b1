//! The event-creation form (read-only).
//!
//! Year, month, day and template id arrive as path segments; each is
//! defaulted independently when absent — today's date parts, and the nil
//! UUID for "no template".

use axum::{
  extract::{Path, State},
  http::HeaderMap,
  response::{Html, IntoResponse, Response},
};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use rota_core::store::EventStore;

use crate::{
  AppState,
  error::Error,
  flash::{clear_consumed_cookies, take_flash, take_old_input},
  form::FormData,
  session::RequestContext,
  views::event_form::{self, FormView},
};

pub async fn form<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Result<Response, Error>
where
  S: EventStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  render_form(&state, &headers, None, None).await
}

pub async fn form_for_date<S>(
  State(state): State<AppState<S>>,
  Path((year, month, day)): Path<(i32, u32, u32)>,
  headers: HeaderMap,
) -> Result<Response, Error>
where
  S: EventStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  render_form(&state, &headers, Some((year, month, day)), None).await
}

pub async fn form_with_template<S>(
  State(state): State<AppState<S>>,
  Path((year, month, day, template_id)): Path<(i32, u32, u32, Uuid)>,
  headers: HeaderMap,
) -> Result<Response, Error>
where
  S: EventStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  render_form(&state, &headers, Some((year, month, day)), Some(template_id))
    .await
}

async fn render_form<S>(
  state: &AppState<S>,
  headers: &HeaderMap,
  date_parts: Option<(i32, u32, u32)>,
  template_id: Option<Uuid>,
) -> Result<Response, Error>
where
  S: EventStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let ctx = RequestContext::from_headers(headers, &state.config.session_secret);
  let flash = take_flash(headers);
  let old_body = take_old_input(headers);
  let old = old_body.as_deref().map(FormData::parse);

  let today = Utc::now().date_naive();
  let date = match date_parts {
    Some((year, month, day)) => {
      NaiveDate::from_ymd_opt(year, month, day).unwrap_or(today)
    }
    None => today,
  };

  // The nil UUID stands for "no template".
  let (template_entries, active_template) = match template_id {
    Some(id) if !id.is_nil() => {
      let template = state
        .store
        .get_template(id)
        .await
        .map_err(|e| Error::Store(Box::new(e)))?
        .ok_or(Error::NotFound)?;
      let entries = state
        .store
        .template_entries(id)
        .await
        .map_err(|e| Error::Store(Box::new(e)))?;
      (entries, template.title.unwrap_or_default())
    }
    _ => (Vec::new(), String::new()),
  };

  let places = state
    .store
    .list_places()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  let templates = state
    .store
    .list_templates()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  let job_types = state
    .store
    .list_job_types(false)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  let html = event_form::render(&FormView {
    date,
    places: &places,
    templates: &templates,
    job_types: &job_types,
    template_entries: &template_entries,
    active_template: &active_template,
    default_place: &state.config.default_place,
    authorized: ctx.may_manage_events(),
    flash: flash.as_ref(),
    old: old.as_ref(),
  })?;

  let mut response = Html(html).into_response();
  clear_consumed_cookies(&mut response, flash.is_some(), old.is_some());
  Ok(response)
}

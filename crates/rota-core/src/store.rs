//! The `EventStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g. `rota-store-sqlite`).
//! Higher layers depend on this abstraction, not on any concrete backend.
//!
//! The multi-row create and delete operations are atomic: either the whole
//! event aggregate (event, schedule, entries) exists afterwards, or none of
//! it does.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  event::ClubEvent,
  people::{Club, JobType, NewPerson, Person, Place},
  schedule::{EntryAssignment, Schedule, ScheduleEntry, TemplateEntry},
};

/// Abstraction over a Rota storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait EventStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Lookup data ───────────────────────────────────────────────────────

  fn add_club<'a>(
    &'a self,
    title: &'a str,
  ) -> impl Future<Output = Result<Club, Self::Error>> + Send + 'a;

  /// All clubs, ordered by title.
  fn list_clubs(
    &self,
  ) -> impl Future<Output = Result<Vec<Club>, Self::Error>> + Send + '_;

  fn add_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Persons offered in assignment pickers: linked to a directory account
  /// and either active/candidate members or touched within the last three
  /// months relative to `now`. Ordered by club, then name.
  fn list_eligible_persons(
    &self,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// All venues, ordered by title.
  fn list_places(
    &self,
  ) -> impl Future<Output = Result<Vec<Place>, Self::Error>> + Send + '_;

  /// Find a venue by exact title, creating it when absent.
  fn ensure_place<'a>(
    &'a self,
    title: &'a str,
  ) -> impl Future<Output = Result<Place, Self::Error>> + Send + 'a;

  fn add_job_type<'a>(
    &'a self,
    title: &'a str,
    is_archived: bool,
  ) -> impl Future<Output = Result<JobType, Self::Error>> + Send + 'a;

  /// Job types ordered by title; archived ones only when asked for.
  fn list_job_types(
    &self,
    include_archived: bool,
  ) -> impl Future<Output = Result<Vec<JobType>, Self::Error>> + Send + '_;

  /// Find a job type by exact title, creating it (non-archived) when absent.
  fn ensure_job_type<'a>(
    &'a self,
    title: &'a str,
  ) -> impl Future<Output = Result<JobType, Self::Error>> + Send + 'a;

  // ── Templates ─────────────────────────────────────────────────────────

  /// Schedules flagged as templates, ordered by title.
  fn list_templates(
    &self,
  ) -> impl Future<Output = Result<Vec<Schedule>, Self::Error>> + Send + '_;

  /// A template schedule by id. `None` when absent or not a template.
  fn get_template(
    &self,
    schedule_id: Uuid,
  ) -> impl Future<Output = Result<Option<Schedule>, Self::Error>> + Send + '_;

  /// A template's entries joined with their job types, insertion-ordered.
  fn template_entries(
    &self,
    schedule_id: Uuid,
  ) -> impl Future<Output = Result<Vec<TemplateEntry>, Self::Error>> + Send + '_;

  // ── Events ────────────────────────────────────────────────────────────

  /// Persist a new event together with its schedule (revision log already
  /// assembled by the caller) and shift slots, all-or-nothing.
  fn create_event(
    &self,
    event: ClubEvent,
    schedule: Schedule,
    entries: Vec<ScheduleEntry>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn get_event(
    &self,
    event_id: Uuid,
  ) -> impl Future<Output = Result<Option<ClubEvent>, Self::Error>> + Send + '_;

  /// All events ordered by begin date, then title — the calendar's data
  /// source.
  fn list_events(
    &self,
  ) -> impl Future<Output = Result<Vec<ClubEvent>, Self::Error>> + Send + '_;

  fn get_place(
    &self,
    place_id: Uuid,
  ) -> impl Future<Output = Result<Option<Place>, Self::Error>> + Send + '_;

  fn schedule_for_event(
    &self,
    event_id: Uuid,
  ) -> impl Future<Output = Result<Option<Schedule>, Self::Error>> + Send + '_;

  /// A schedule's entries joined with job type, assigned person and that
  /// person's club, insertion-ordered.
  fn entries_with_assignments(
    &self,
    schedule_id: Uuid,
  ) -> impl Future<Output = Result<Vec<EntryAssignment>, Self::Error>> + Send + '_;

  /// Delete an event with its schedule and all entries, all-or-nothing,
  /// honouring the store's dependency order (entries, then schedule, then
  /// event). Returns `false` when no such event exists.
  fn delete_event(
    &self,
    event_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

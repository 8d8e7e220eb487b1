//! Schedules and their shift slots.
//!
//! A schedule is the roster container of exactly one event. Schedules
//! flagged as templates additionally serve as blueprints: their entries
//! seed the roster of a newly created event.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  people::{Club, JobType, Person},
  revision::RevisionLog,
};

/// The roster container for one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
  pub schedule_id: Uuid,
  pub event_id:    Uuid,
  /// Deadline for sign-ups; always `None` at creation.
  pub due_date:    Option<NaiveDate>,
  /// Display name; set when the schedule doubles as a template.
  pub title:       Option<String>,
  pub is_template: bool,
  pub revisions:   RevisionLog,
}

/// One shift slot within a schedule, optionally assigned to a person.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
  pub entry_id:    Uuid,
  pub schedule_id: Uuid,
  pub job_type_id: Uuid,
  pub person_id:   Option<Uuid>,
}

/// A shift slot joined with its lookup data, for the detail view.
#[derive(Debug, Clone)]
pub struct EntryAssignment {
  pub entry:    ScheduleEntry,
  pub job_type: JobType,
  pub person:   Option<Person>,
  /// The assigned person's club, when one is assigned.
  pub club:     Option<Club>,
}

/// A template's shift slot joined with its job type, used to prefill the
/// creation form.
#[derive(Debug, Clone)]
pub struct TemplateEntry {
  pub entry:    ScheduleEntry,
  pub job_type: JobType,
}

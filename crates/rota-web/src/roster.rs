//! Roster materialisation for a freshly created event.
//!
//! The creation form posts one `jobType` value per shift slot; this module
//! turns the resolved slots into schedule entries and assembles the
//! revision log every new schedule starts with: one genesis entry, then
//! one `Dienst erstellt` entry per slot.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use rota_core::{
  people::JobType,
  revision::{Actor, RevisionEntry, RevisionLog},
  schedule::ScheduleEntry,
};

/// One unassigned shift slot per resolved job type.
pub fn build_entries(
  schedule_id: Uuid,
  job_types: &[JobType],
) -> Vec<(ScheduleEntry, JobType)> {
  job_types
    .iter()
    .map(|job_type| {
      (
        ScheduleEntry {
          entry_id: Uuid::new_v4(),
          schedule_id,
          job_type_id: job_type.job_type_id,
          person_id: None,
        },
        job_type.clone(),
      )
    })
    .collect()
}

/// The log a new schedule is persisted with: genesis plus one entry per
/// shift, so its final length is `entries.len() + 1`.
pub fn initial_revisions(
  entries: &[(ScheduleEntry, JobType)],
  actor: &Actor,
  at: DateTime<Utc>,
) -> RevisionLog {
  let mut log = RevisionLog::new();
  log.append(RevisionEntry::schedule_created(actor, at));
  for (entry, job_type) in entries {
    log.append(RevisionEntry::shift_created(entry, job_type, actor, at));
  }
  log
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use rota_core::revision::{
    ACTION_SCHEDULE_CREATED, ACTION_SHIFT_CREATED,
  };

  use super::*;

  fn job(title: &str) -> JobType {
    JobType {
      job_type_id: Uuid::new_v4(),
      title:       title.to_string(),
      is_archived: false,
    }
  }

  #[test]
  fn log_length_is_slot_count_plus_one() {
    let schedule_id = Uuid::new_v4();
    let entries =
      build_entries(schedule_id, &[job("Bar"), job("Einlass"), job("Licht")]);
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().all(|(e, _)| e.schedule_id == schedule_id));
    assert!(entries.iter().all(|(e, _)| e.person_id.is_none()));

    let actor = Actor::guest("198.51.100.1");
    let at = Utc.with_ymd_and_hms(2016, 3, 12, 21, 0, 0).unwrap();
    let log = initial_revisions(&entries, &actor, at);

    assert_eq!(log.len(), 4);
    assert_eq!(log.entries()[0].action, ACTION_SCHEDULE_CREATED);
    assert!(
      log.entries()[1..]
        .iter()
        .all(|e| e.action == ACTION_SHIFT_CREATED)
    );
    assert_eq!(log.entries()[1].job_type.as_deref(), Some("Bar"));
    assert_eq!(
      log.entries()[1].entry_id,
      Some(entries[0].0.entry_id)
    );
  }

  #[test]
  fn empty_roster_still_gets_a_genesis_entry() {
    let actor = Actor::guest("198.51.100.1");
    let at = Utc.with_ymd_and_hms(2016, 3, 12, 21, 0, 0).unwrap();
    let log = initial_revisions(&[], &actor, at);
    assert_eq!(log.len(), 1);
    assert_eq!(log.entries()[0].action, ACTION_SCHEDULE_CREATED);
  }
}

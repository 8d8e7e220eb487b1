//! The revision log — an append-only record of administrative actions
//! taken on a schedule.
//!
//! The log is persisted as one JSON array per schedule. Entries are never
//! rewritten; creation points only ever append. The serde renames reproduce
//! the wire keys of the historical data, so old logs parse unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Result,
  people::JobType,
  schedule::ScheduleEntry,
};

/// Wire format of the `timestamp` field.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Action label recorded when a schedule is created.
pub const ACTION_SCHEDULE_CREATED: &str = "Dienstplan erstellt";
/// Action label recorded for each shift slot of a fresh roster.
pub const ACTION_SHIFT_CREATED: &str = "Dienst erstellt";

/// Display name recorded for unauthenticated actors.
pub const GUEST_NAME: &str = "Gast";

/// Identity snapshot of whoever performs a recorded action.
#[derive(Debug, Clone)]
pub struct Actor {
  pub user_id:      Option<Uuid>,
  /// Display name, usually "Name (Club)"; [`GUEST_NAME`] when anonymous.
  pub display_name: String,
  pub client_ip:    String,
}

impl Actor {
  pub fn guest(client_ip: impl Into<String>) -> Self {
    Self {
      user_id:      None,
      display_name: GUEST_NAME.to_string(),
      client_ip:    client_ip.into(),
    }
  }
}

/// One recorded action. `from ip` is kept in storage but stripped before
/// the log is handed to a view (see [`RevisionLog::redacted`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionEntry {
  #[serde(rename = "entry id")]
  pub entry_id:  Option<Uuid>,
  #[serde(rename = "job type")]
  pub job_type:  Option<String>,
  pub action:    String,
  #[serde(rename = "old id")]
  pub old_id:    Option<Uuid>,
  #[serde(rename = "old value")]
  pub old_value: Option<String>,
  #[serde(rename = "new id")]
  pub new_id:    Option<Uuid>,
  #[serde(rename = "new value")]
  pub new_value: Option<String>,
  #[serde(rename = "user id")]
  pub user_id:   Option<Uuid>,
  #[serde(rename = "user name")]
  pub user_name: String,
  #[serde(rename = "from ip", default, skip_serializing_if = "Option::is_none")]
  pub from_ip:   Option<String>,
  /// Formatted with [`TIMESTAMP_FORMAT`], UTC.
  pub timestamp: String,
}

impl RevisionEntry {
  /// The genesis entry every schedule starts with.
  pub fn schedule_created(actor: &Actor, at: DateTime<Utc>) -> Self {
    Self {
      entry_id:  None,
      job_type:  None,
      action:    ACTION_SCHEDULE_CREATED.to_string(),
      old_id:    None,
      old_value: None,
      new_id:    None,
      new_value: None,
      user_id:   actor.user_id,
      user_name: actor.display_name.clone(),
      from_ip:   Some(actor.client_ip.clone()),
      timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
    }
  }

  /// Recorded once per shift slot when a roster is materialised.
  pub fn shift_created(
    entry: &ScheduleEntry,
    job_type: &JobType,
    actor: &Actor,
    at: DateTime<Utc>,
  ) -> Self {
    Self {
      entry_id:  Some(entry.entry_id),
      job_type:  Some(job_type.title.clone()),
      action:    ACTION_SHIFT_CREATED.to_string(),
      old_id:    None,
      old_value: None,
      new_id:    None,
      new_value: None,
      user_id:   actor.user_id,
      user_name: actor.display_name.clone(),
      from_ip:   Some(actor.client_ip.clone()),
      timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
    }
  }

  /// Copy without the client IP.
  pub fn redacted(&self) -> Self {
    Self { from_ip: None, ..self.clone() }
  }
}

/// Ordered, append-only list of [`RevisionEntry`] values. Serialises as a
/// bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevisionLog(Vec<RevisionEntry>);

impl RevisionLog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn append(&mut self, entry: RevisionEntry) {
    self.0.push(entry);
  }

  pub fn entries(&self) -> &[RevisionEntry] {
    &self.0
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Entries with the `from ip` field stripped, for display.
  pub fn redacted(&self) -> Vec<RevisionEntry> {
    self.0.iter().map(RevisionEntry::redacted).collect()
  }

  pub fn to_json(&self) -> Result<String> {
    Ok(serde_json::to_string(self)?)
  }

  /// Tolerates the empty string and JSON `null` (both read as an empty
  /// log), matching what old rows may contain.
  pub fn from_json(s: &str) -> Result<Self> {
    if s.trim().is_empty() || s.trim() == "null" {
      return Ok(Self::new());
    }
    Ok(serde_json::from_str(s)?)
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn actor() -> Actor {
    Actor {
      user_id:      Some(Uuid::new_v4()),
      display_name: "Erika Muster (bc-Club)".to_string(),
      client_ip:    "203.0.113.7".to_string(),
    }
  }

  fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2016, 3, 12, 21, 30, 0).unwrap()
  }

  #[test]
  fn wire_keys_match_the_legacy_format() {
    let mut log = RevisionLog::new();
    log.append(RevisionEntry::schedule_created(&actor(), at()));

    let json = log.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let first = &value.as_array().unwrap()[0];

    for key in [
      "entry id",
      "job type",
      "action",
      "old id",
      "old value",
      "new id",
      "new value",
      "user id",
      "user name",
      "from ip",
      "timestamp",
    ] {
      assert!(first.get(key).is_some(), "missing wire key {key:?}");
    }
    assert_eq!(first["action"], ACTION_SCHEDULE_CREATED);
    assert_eq!(first["timestamp"], "2016-03-12 21:30:00");
  }

  #[test]
  fn guest_entries_carry_the_guest_name_and_no_user_id() {
    let entry =
      RevisionEntry::schedule_created(&Actor::guest("198.51.100.1"), at());
    assert_eq!(entry.user_name, GUEST_NAME);
    assert_eq!(entry.user_id, None);
    assert_eq!(entry.from_ip.as_deref(), Some("198.51.100.1"));
  }

  #[test]
  fn redacted_entries_never_serialise_an_ip() {
    let mut log = RevisionLog::new();
    log.append(RevisionEntry::schedule_created(&actor(), at()));

    let redacted = log.redacted();
    assert!(redacted.iter().all(|e| e.from_ip.is_none()));

    let json = serde_json::to_string(&redacted).unwrap();
    assert!(!json.contains("from ip"));

    // The stored form still carries it.
    assert!(log.to_json().unwrap().contains("from ip"));
  }

  #[test]
  fn redacted_json_parses_back() {
    let mut log = RevisionLog::new();
    log.append(RevisionEntry::schedule_created(&actor(), at()));
    let json = serde_json::to_string(&log.redacted()).unwrap();

    let parsed = RevisionLog::from_json(&json).unwrap();
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed.entries()[0].from_ip, None);
  }

  #[test]
  fn empty_and_null_columns_read_as_empty_logs() {
    assert!(RevisionLog::from_json("").unwrap().is_empty());
    assert!(RevisionLog::from_json("null").unwrap().is_empty());
    assert!(RevisionLog::from_json("[]").unwrap().is_empty());
  }
}

//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Row timestamps are RFC 3339 strings; event dates and times are plain
//! `YYYY-MM-DD` / `HH:MM:SS` values. UUIDs are stored as hyphenated
//! lowercase strings. The revision log is one compact JSON array.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rota_core::{
  event::{ClubEvent, EventKind},
  people::{MemberStatus, Person},
  revision::RevisionLog,
  schedule::{Schedule, ScheduleEntry},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn decode_opt_uuid(s: Option<&str>) -> Result<Option<Uuid>> {
  s.map(decode_uuid).transpose()
}

// ─── Timestamps ──────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Plain dates and times ───────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_time(t: NaiveTime) -> String { t.format("%H:%M:%S").to_string() }

pub fn decode_time(s: &str) -> Result<NaiveTime> {
  NaiveTime::parse_from_str(s, "%H:%M:%S")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── MemberStatus ────────────────────────────────────────────────────────────

pub fn encode_member_status(s: MemberStatus) -> &'static str {
  match s {
    MemberStatus::Active => "aktiv",
    MemberStatus::Candidate => "kandidat",
    MemberStatus::Former => "ehemalig",
  }
}

pub fn decode_member_status(s: &str) -> Result<MemberStatus> {
  match s {
    "aktiv" => Ok(MemberStatus::Active),
    "kandidat" => Ok(MemberStatus::Candidate),
    "ehemalig" => Ok(MemberStatus::Former),
    other => {
      Err(rota_core::Error::UnknownMemberStatus(other.to_string()).into())
    }
  }
}

// ─── EventKind ───────────────────────────────────────────────────────────────

pub fn decode_event_kind(code: i64) -> Result<EventKind> {
  EventKind::from_code(code)
    .ok_or_else(|| rota_core::Error::UnknownEventKind(code).into())
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `events` row.
pub struct RawEvent {
  pub event_id:        String,
  pub title:           String,
  pub subtitle:        String,
  pub public_info:     String,
  pub private_details: String,
  pub kind:            i64,
  pub place_id:        String,
  pub begin_date:      String,
  pub end_date:        String,
  pub begin_time:      String,
  pub end_time:        String,
  pub is_private:      bool,
}

impl RawEvent {
  pub fn into_event(self) -> Result<ClubEvent> {
    Ok(ClubEvent {
      event_id:        decode_uuid(&self.event_id)?,
      title:           self.title,
      subtitle:        self.subtitle,
      public_info:     self.public_info,
      private_details: self.private_details,
      kind:            decode_event_kind(self.kind)?,
      place_id:        decode_uuid(&self.place_id)?,
      begin_date:      decode_date(&self.begin_date)?,
      end_date:        decode_date(&self.end_date)?,
      begin_time:      decode_time(&self.begin_time)?,
      end_time:        decode_time(&self.end_time)?,
      is_private:      self.is_private,
    })
  }
}

/// Raw strings read directly from a `schedules` row.
pub struct RawSchedule {
  pub schedule_id: String,
  pub event_id:    String,
  pub due_date:    Option<String>,
  pub title:       Option<String>,
  pub is_template: bool,
  pub revisions:   String,
}

impl RawSchedule {
  pub fn into_schedule(self) -> Result<Schedule> {
    Ok(Schedule {
      schedule_id: decode_uuid(&self.schedule_id)?,
      event_id:    decode_uuid(&self.event_id)?,
      due_date:    self.due_date.as_deref().map(decode_date).transpose()?,
      title:       self.title,
      is_template: self.is_template,
      revisions:   RevisionLog::from_json(&self.revisions)?,
    })
  }
}

/// Raw strings read directly from a `schedule_entries` row.
pub struct RawEntry {
  pub entry_id:    String,
  pub schedule_id: String,
  pub job_type_id: String,
  pub person_id:   Option<String>,
}

impl RawEntry {
  pub fn into_entry(self) -> Result<ScheduleEntry> {
    Ok(ScheduleEntry {
      entry_id:    decode_uuid(&self.entry_id)?,
      schedule_id: decode_uuid(&self.schedule_id)?,
      job_type_id: decode_uuid(&self.job_type_id)?,
      person_id:   decode_opt_uuid(self.person_id.as_deref())?,
    })
  }
}

/// Raw strings read directly from a `persons` row.
pub struct RawPerson {
  pub person_id:  String,
  pub name:       String,
  pub club_id:    String,
  pub status:     String,
  pub ldap_id:    Option<String>,
  pub updated_at: String,
}

impl RawPerson {
  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      person_id:  decode_uuid(&self.person_id)?,
      name:       self.name,
      club_id:    decode_uuid(&self.club_id)?,
      status:     decode_member_status(&self.status)?,
      ldap_id:    self.ldap_id,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

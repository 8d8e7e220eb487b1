//! Club events — the aggregate root of the planner.
//!
//! An event owns exactly one [`Schedule`](crate::schedule::Schedule); the
//! schedule carries the event's id. Dates and times are stored as plain
//! calendar values, not instants.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Integer-coded event category. The codes are part of the persisted data
/// and of the creation form's radio buttons; they must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
  /// Code 0 — regular club programme.
  Regular,
  /// Code 1 — informational entry, no real event.
  Information,
  /// Code 2 — special programme.
  Special,
  /// Code 3 — live band, live DJ or reading.
  LiveAct,
  /// Code 4 — members-only internal event.
  Internal,
  /// Code 5 — external usage of the rooms.
  Usage,
}

impl EventKind {
  pub const ALL: [Self; 6] = [
    Self::Regular,
    Self::Information,
    Self::Special,
    Self::LiveAct,
    Self::Internal,
    Self::Usage,
  ];

  pub fn code(self) -> i64 {
    match self {
      Self::Regular => 0,
      Self::Information => 1,
      Self::Special => 2,
      Self::LiveAct => 3,
      Self::Internal => 4,
      Self::Usage => 5,
    }
  }

  pub fn from_code(code: i64) -> Option<Self> {
    match code {
      0 => Some(Self::Regular),
      1 => Some(Self::Information),
      2 => Some(Self::Special),
      3 => Some(Self::LiveAct),
      4 => Some(Self::Internal),
      5 => Some(Self::Usage),
      _ => None,
    }
  }

  /// German display label, as shown next to the form's radio buttons.
  pub fn label(self) -> &'static str {
    match self {
      Self::Regular => "normales Programm",
      Self::Information => "Information",
      Self::Special => "Spezial",
      Self::LiveAct => "Live Band / Live DJ / Lesung",
      Self::Internal => "interne Veranstaltung",
      Self::Usage => "Nutzung",
    }
  }
}

/// A scheduled club activity with descriptive metadata and a visibility flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubEvent {
  pub event_id:        Uuid,
  pub title:           String,
  pub subtitle:        String,
  /// Shown to everyone, e.g. ticket information.
  pub public_info:     String,
  /// Internal notes, e.g. equipment needs.
  pub private_details: String,
  pub kind:            EventKind,
  pub place_id:        Uuid,
  pub begin_date:      NaiveDate,
  pub end_date:        NaiveDate,
  pub begin_time:      NaiveTime,
  pub end_time:        NaiveTime,
  /// A private event is hidden from visitors without a session.
  pub is_private:      bool,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn kind_codes_round_trip() {
    for kind in EventKind::ALL {
      assert_eq!(EventKind::from_code(kind.code()), Some(kind));
    }
  }

  #[test]
  fn unknown_kind_code_is_rejected() {
    assert_eq!(EventKind::from_code(6), None);
    assert_eq!(EventKind::from_code(-1), None);
  }
}

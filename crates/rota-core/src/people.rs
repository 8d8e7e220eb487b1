//! Shared lookup entities: persons, clubs, venues and job types.
//!
//! These rows are referenced by events and rosters but owned by nobody;
//! venues and job types are created on demand by title.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Membership status of a person. The wire strings are the German values
/// the member directory has always used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberStatus {
  #[serde(rename = "aktiv")]
  Active,
  #[serde(rename = "kandidat")]
  Candidate,
  #[serde(rename = "ehemalig")]
  Former,
}

/// A club member, enriched with their owning club for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
  pub person_id:  Uuid,
  pub name:       String,
  pub club_id:    Uuid,
  pub status:     MemberStatus,
  /// Directory account id; people without one never appear in pickers.
  pub ldap_id:    Option<String>,
  pub updated_at: DateTime<Utc>,
}

/// Input to [`crate::store::EventStore::add_person`]. When `updated_at` is
/// `None` the store stamps the insertion time.
#[derive(Debug, Clone)]
pub struct NewPerson {
  pub name:       String,
  pub club_id:    Uuid,
  pub status:     MemberStatus,
  pub ldap_id:    Option<String>,
  pub updated_at: Option<DateTime<Utc>>,
}

/// One of the sections/clubs a person can belong to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Club {
  pub club_id: Uuid,
  pub title:   String,
}

/// A venue an event takes place at. Looked up by title, created when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
  pub place_id: Uuid,
  pub title:    String,
}

/// A kind of shift work (bar, door, sound…). Archived types are kept for
/// old rosters but no longer offered on the creation form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobType {
  pub job_type_id: Uuid,
  pub title:       String,
  pub is_archived: bool,
}

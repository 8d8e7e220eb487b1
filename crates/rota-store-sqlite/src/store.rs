//! [`SqliteStore`] — the SQLite implementation of [`EventStore`].

use std::path::Path;

use chrono::{DateTime, Months, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use rota_core::{
  event::ClubEvent,
  people::{Club, JobType, NewPerson, Person, Place},
  schedule::{EntryAssignment, Schedule, ScheduleEntry, TemplateEntry},
  store::EventStore,
};

use crate::{
  Error, Result,
  encode::{
    RawEntry, RawEvent, RawPerson, RawSchedule, decode_uuid, encode_date,
    encode_dt, encode_member_status, encode_time, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Rota event store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Row mapping helpers ─────────────────────────────────────────────────────

fn event_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEvent> {
  Ok(RawEvent {
    event_id:        row.get(0)?,
    title:           row.get(1)?,
    subtitle:        row.get(2)?,
    public_info:     row.get(3)?,
    private_details: row.get(4)?,
    kind:            row.get(5)?,
    place_id:        row.get(6)?,
    begin_date:      row.get(7)?,
    end_date:        row.get(8)?,
    begin_time:      row.get(9)?,
    end_time:        row.get(10)?,
    is_private:      row.get(11)?,
  })
}

const EVENT_COLUMNS: &str = "event_id, title, subtitle, public_info, \
   private_details, kind, place_id, begin_date, end_date, begin_time, \
   end_time, is_private";

fn schedule_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSchedule> {
  Ok(RawSchedule {
    schedule_id: row.get(0)?,
    event_id:    row.get(1)?,
    due_date:    row.get(2)?,
    title:       row.get(3)?,
    is_template: row.get(4)?,
    revisions:   row.get(5)?,
  })
}

const SCHEDULE_COLUMNS: &str =
  "schedule_id, event_id, due_date, title, is_template, revisions";

fn person_row_at(
  row: &rusqlite::Row<'_>,
  base: usize,
) -> rusqlite::Result<RawPerson> {
  Ok(RawPerson {
    person_id:  row.get(base)?,
    name:       row.get(base + 1)?,
    club_id:    row.get(base + 2)?,
    status:     row.get(base + 3)?,
    ldap_id:    row.get(base + 4)?,
    updated_at: row.get(base + 5)?,
  })
}

/// One joined row of `entries_with_assignments`.
struct RawAssignment {
  entry:      RawEntry,
  job_title:  String,
  job_archived: bool,
  person:     Option<RawPerson>,
  club_title: Option<String>,
}

impl RawAssignment {
  fn into_assignment(self) -> Result<EntryAssignment> {
    let entry = self.entry.into_entry()?;
    let job_type = JobType {
      job_type_id: entry.job_type_id,
      title:       self.job_title,
      is_archived: self.job_archived,
    };
    let person = self.person.map(RawPerson::into_person).transpose()?;
    let club = match (&person, self.club_title) {
      (Some(p), Some(title)) => Some(Club { club_id: p.club_id, title }),
      _ => None,
    };
    Ok(EntryAssignment { entry, job_type, person, club })
  }
}

// ─── EventStore impl ─────────────────────────────────────────────────────────

impl EventStore for SqliteStore {
  type Error = Error;

  // ── Lookup data ───────────────────────────────────────────────────────────

  async fn add_club(&self, title: &str) -> Result<Club> {
    let club = Club { club_id: Uuid::new_v4(), title: title.to_owned() };

    let id_str = encode_uuid(club.club_id);
    let title_str = club.title.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO clubs (club_id, title) VALUES (?1, ?2)",
          rusqlite::params![id_str, title_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(club)
  }

  async fn list_clubs(&self) -> Result<Vec<Club>> {
    let rows: Vec<(String, String)> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT club_id, title FROM clubs ORDER BY title ASC")?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|(id, title)| Ok(Club { club_id: decode_uuid(&id)?, title }))
      .collect()
  }

  async fn add_person(&self, input: NewPerson) -> Result<Person> {
    let person = Person {
      person_id:  Uuid::new_v4(),
      name:       input.name,
      club_id:    input.club_id,
      status:     input.status,
      ldap_id:    input.ldap_id,
      updated_at: input.updated_at.unwrap_or_else(Utc::now),
    };

    let id_str = encode_uuid(person.person_id);
    let name = person.name.clone();
    let club_str = encode_uuid(person.club_id);
    let status_str = encode_member_status(person.status).to_owned();
    let ldap = person.ldap_id.clone();
    let at_str = encode_dt(person.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO persons (person_id, name, club_id, status, ldap_id, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, name, club_str, status_str, ldap, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(person)
  }

  async fn list_eligible_persons(
    &self,
    now: DateTime<Utc>,
  ) -> Result<Vec<Person>> {
    let cutoff =
      encode_dt(now.checked_sub_months(Months::new(3)).unwrap_or(now));

    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT person_id, name, club_id, status, ldap_id, updated_at
           FROM persons
           WHERE ldap_id IS NOT NULL
             AND (status IN ('aktiv', 'kandidat') OR updated_at >= ?1)
           ORDER BY club_id, name",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![cutoff], |row| person_row_at(row, 0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn list_places(&self) -> Result<Vec<Place>> {
    let rows: Vec<(String, String)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT place_id, title FROM places ORDER BY title ASC")?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|(id, title)| Ok(Place { place_id: decode_uuid(&id)?, title }))
      .collect()
  }

  async fn ensure_place(&self, title: &str) -> Result<Place> {
    let title_str = title.to_owned();
    let fresh_id = encode_uuid(Uuid::new_v4());

    let (id, title): (String, String) = self
      .conn
      .call(move |conn| {
        let existing: Option<String> = conn
          .query_row(
            "SELECT place_id FROM places WHERE title = ?1",
            rusqlite::params![title_str],
            |row| row.get(0),
          )
          .optional()?;

        match existing {
          Some(id) => Ok((id, title_str)),
          None => {
            conn.execute(
              "INSERT INTO places (place_id, title) VALUES (?1, ?2)",
              rusqlite::params![fresh_id, title_str],
            )?;
            Ok((fresh_id, title_str))
          }
        }
      })
      .await?;

    Ok(Place { place_id: decode_uuid(&id)?, title })
  }

  async fn add_job_type(
    &self,
    title: &str,
    is_archived: bool,
  ) -> Result<JobType> {
    let job_type = JobType {
      job_type_id: Uuid::new_v4(),
      title: title.to_owned(),
      is_archived,
    };

    let id_str = encode_uuid(job_type.job_type_id);
    let title_str = job_type.title.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO job_types (job_type_id, title, is_archived)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, title_str, is_archived],
        )?;
        Ok(())
      })
      .await?;

    Ok(job_type)
  }

  async fn list_job_types(
    &self,
    include_archived: bool,
  ) -> Result<Vec<JobType>> {
    let rows: Vec<(String, String, bool)> = self
      .conn
      .call(move |conn| {
        let sql = if include_archived {
          "SELECT job_type_id, title, is_archived FROM job_types
           ORDER BY title ASC"
        } else {
          "SELECT job_type_id, title, is_archived FROM job_types
           WHERE is_archived = 0 ORDER BY title ASC"
        };
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|(id, title, is_archived)| {
        Ok(JobType { job_type_id: decode_uuid(&id)?, title, is_archived })
      })
      .collect()
  }

  async fn ensure_job_type(&self, title: &str) -> Result<JobType> {
    let title_str = title.to_owned();
    let fresh_id = encode_uuid(Uuid::new_v4());

    let (id, title, is_archived): (String, String, bool) = self
      .conn
      .call(move |conn| {
        let existing: Option<(String, bool)> = conn
          .query_row(
            "SELECT job_type_id, is_archived FROM job_types WHERE title = ?1",
            rusqlite::params![title_str],
            |row| Ok((row.get(0)?, row.get(1)?)),
          )
          .optional()?;

        match existing {
          Some((id, is_archived)) => Ok((id, title_str, is_archived)),
          None => {
            conn.execute(
              "INSERT INTO job_types (job_type_id, title, is_archived)
               VALUES (?1, ?2, 0)",
              rusqlite::params![fresh_id, title_str],
            )?;
            Ok((fresh_id, title_str, false))
          }
        }
      })
      .await?;

    Ok(JobType { job_type_id: decode_uuid(&id)?, title, is_archived })
  }

  // ── Templates ─────────────────────────────────────────────────────────────

  async fn list_templates(&self) -> Result<Vec<Schedule>> {
    let raws: Vec<RawSchedule> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT schedule_id, event_id, due_date, title, is_template, revisions
           FROM schedules WHERE is_template = 1 ORDER BY title ASC",
        )?;
        let rows = stmt
          .query_map([], schedule_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSchedule::into_schedule).collect()
  }

  async fn get_template(&self, schedule_id: Uuid) -> Result<Option<Schedule>> {
    let id_str = encode_uuid(schedule_id);

    let raw: Option<RawSchedule> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT schedule_id, event_id, due_date, title, is_template, revisions
               FROM schedules WHERE schedule_id = ?1 AND is_template = 1",
              rusqlite::params![id_str],
              schedule_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSchedule::into_schedule).transpose()
  }

  async fn template_entries(
    &self,
    schedule_id: Uuid,
  ) -> Result<Vec<TemplateEntry>> {
    let id_str = encode_uuid(schedule_id);

    let raws: Vec<(RawEntry, String, bool)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT e.entry_id, e.schedule_id, e.job_type_id, e.person_id,
                  j.title, j.is_archived
           FROM schedule_entries e
           JOIN job_types j ON j.job_type_id = e.job_type_id
           WHERE e.schedule_id = ?1
           ORDER BY e.position",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok((
              RawEntry {
                entry_id:    row.get(0)?,
                schedule_id: row.get(1)?,
                job_type_id: row.get(2)?,
                person_id:   row.get(3)?,
              },
              row.get(4)?,
              row.get(5)?,
            ))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(raw, title, is_archived)| {
        let entry = raw.into_entry()?;
        let job_type = JobType {
          job_type_id: entry.job_type_id,
          title,
          is_archived,
        };
        Ok(TemplateEntry { entry, job_type })
      })
      .collect()
  }

  // ── Events ────────────────────────────────────────────────────────────────

  async fn create_event(
    &self,
    event: ClubEvent,
    schedule: Schedule,
    entries: Vec<ScheduleEntry>,
  ) -> Result<()> {
    let revisions_json = schedule.revisions.to_json()?;

    let ev_id = encode_uuid(event.event_id);
    let place_id = encode_uuid(event.place_id);
    let schedule_id = encode_uuid(schedule.schedule_id);
    let schedule_event_id = encode_uuid(schedule.event_id);
    let due_date = schedule.due_date.map(encode_date);
    let entry_rows: Vec<(String, String, String, Option<String>)> = entries
      .iter()
      .map(|e| {
        (
          encode_uuid(e.entry_id),
          encode_uuid(e.schedule_id),
          encode_uuid(e.job_type_id),
          e.person_id.map(encode_uuid),
        )
      })
      .collect();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        tx.execute(
          "INSERT INTO events (event_id, title, subtitle, public_info,
             private_details, kind, place_id, begin_date, end_date,
             begin_time, end_time, is_private)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
          rusqlite::params![
            ev_id,
            event.title,
            event.subtitle,
            event.public_info,
            event.private_details,
            event.kind.code(),
            place_id,
            encode_date(event.begin_date),
            encode_date(event.end_date),
            encode_time(event.begin_time),
            encode_time(event.end_time),
            event.is_private,
          ],
        )?;

        tx.execute(
          "INSERT INTO schedules (schedule_id, event_id, due_date, title,
             is_template, revisions)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            schedule_id,
            schedule_event_id,
            due_date,
            schedule.title,
            schedule.is_template,
            revisions_json,
          ],
        )?;

        for (position, (entry_id, sched_id, job_type_id, person_id)) in
          entry_rows.iter().enumerate()
        {
          tx.execute(
            "INSERT INTO schedule_entries (entry_id, schedule_id,
               job_type_id, person_id, position)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
              entry_id,
              sched_id,
              job_type_id,
              person_id,
              position as i64,
            ],
          )?;
        }

        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(())
  }

  async fn get_event(&self, event_id: Uuid) -> Result<Option<ClubEvent>> {
    let id_str = encode_uuid(event_id);

    let raw: Option<RawEvent> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {EVENT_COLUMNS} FROM events WHERE event_id = ?1"),
              rusqlite::params![id_str],
              event_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEvent::into_event).transpose()
  }

  async fn list_events(&self) -> Result<Vec<ClubEvent>> {
    let raws: Vec<RawEvent> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {EVENT_COLUMNS} FROM events ORDER BY begin_date, title"
        ))?;
        let rows = stmt
          .query_map([], event_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEvent::into_event).collect()
  }

  async fn get_place(&self, place_id: Uuid) -> Result<Option<Place>> {
    let id_str = encode_uuid(place_id);

    let raw: Option<(String, String)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT place_id, title FROM places WHERE place_id = ?1",
              rusqlite::params![id_str],
              |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?,
        )
      })
      .await?;

    raw
      .map(|(id, title)| Ok(Place { place_id: decode_uuid(&id)?, title }))
      .transpose()
  }

  async fn schedule_for_event(
    &self,
    event_id: Uuid,
  ) -> Result<Option<Schedule>> {
    let id_str = encode_uuid(event_id);

    let raw: Option<RawSchedule> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE event_id = ?1"
              ),
              rusqlite::params![id_str],
              schedule_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSchedule::into_schedule).transpose()
  }

  async fn entries_with_assignments(
    &self,
    schedule_id: Uuid,
  ) -> Result<Vec<EntryAssignment>> {
    let id_str = encode_uuid(schedule_id);

    let raws: Vec<RawAssignment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT e.entry_id, e.schedule_id, e.job_type_id, e.person_id,
                  j.title, j.is_archived,
                  p.person_id, p.name, p.club_id, p.status, p.ldap_id,
                  p.updated_at,
                  c.title
           FROM schedule_entries e
           JOIN job_types j ON j.job_type_id = e.job_type_id
           LEFT JOIN persons p ON p.person_id = e.person_id
           LEFT JOIN clubs c ON c.club_id = p.club_id
           WHERE e.schedule_id = ?1
           ORDER BY e.position",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            let person_id: Option<String> = row.get(6)?;
            let person = match person_id {
              Some(_) => Some(person_row_at(row, 6)?),
              None => None,
            };
            Ok(RawAssignment {
              entry: RawEntry {
                entry_id:    row.get(0)?,
                schedule_id: row.get(1)?,
                job_type_id: row.get(2)?,
                person_id:   row.get(3)?,
              },
              job_title: row.get(4)?,
              job_archived: row.get(5)?,
              person,
              club_title: row.get(12)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAssignment::into_assignment).collect()
  }

  async fn delete_event(&self, event_id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(event_id);

    let deleted: bool = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let schedule_id: Option<String> = tx
          .query_row(
            "SELECT schedule_id FROM schedules WHERE event_id = ?1",
            rusqlite::params![id_str],
            |row| row.get(0),
          )
          .optional()?;

        // Dependency order: entries, then schedule, then event.
        if let Some(sid) = schedule_id {
          tx.execute(
            "DELETE FROM schedule_entries WHERE schedule_id = ?1",
            rusqlite::params![sid],
          )?;
          tx.execute(
            "DELETE FROM schedules WHERE schedule_id = ?1",
            rusqlite::params![sid],
          )?;
        }

        let removed = tx.execute(
          "DELETE FROM events WHERE event_id = ?1",
          rusqlite::params![id_str],
        )?;

        tx.commit()?;
        Ok(removed > 0)
      })
      .await?;

    Ok(deleted)
  }
}

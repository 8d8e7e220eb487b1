//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use uuid::Uuid;

use rota_core::{
  event::{ClubEvent, EventKind},
  people::{MemberStatus, NewPerson},
  revision::{Actor, RevisionEntry, RevisionLog},
  schedule::{Schedule, ScheduleEntry},
  store::EventStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn actor() -> Actor {
  Actor {
    user_id:      Some(Uuid::new_v4()),
    display_name: "Erika Muster (bc-Club)".to_string(),
    client_ip:    "203.0.113.7".to_string(),
  }
}

fn sample_event(place_id: Uuid) -> ClubEvent {
  ClubEvent {
    event_id:        Uuid::new_v4(),
    title:           "Weinabend".to_string(),
    subtitle:        "Jahrgang 2014".to_string(),
    public_info:     "Karten nur im Vorverkauf".to_string(),
    private_details: "DJ-Tisch wird gebraucht".to_string(),
    kind:            EventKind::Regular,
    place_id,
    begin_date:      NaiveDate::from_ymd_opt(2016, 3, 12).unwrap(),
    end_date:        NaiveDate::from_ymd_opt(2016, 3, 13).unwrap(),
    begin_time:      NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
    end_time:        NaiveTime::from_hms_opt(1, 0, 0).unwrap(),
    is_private:      false,
  }
}

/// Event + schedule (+ optional template flag) + `n` bar shifts, persisted
/// in one call. Returns the ids involved.
async fn seed_event(
  s: &SqliteStore,
  n: usize,
  as_template: Option<&str>,
) -> (Uuid, Uuid) {
  let place = s.ensure_place("bc-Club").await.unwrap();
  let job = s.ensure_job_type("Bar").await.unwrap();

  let event = sample_event(place.place_id);
  let event_id = event.event_id;
  let schedule_id = Uuid::new_v4();

  let entries: Vec<ScheduleEntry> = (0..n)
    .map(|_| ScheduleEntry {
      entry_id:    Uuid::new_v4(),
      schedule_id,
      job_type_id: job.job_type_id,
      person_id:   None,
    })
    .collect();

  let at = Utc.with_ymd_and_hms(2016, 3, 1, 12, 0, 0).unwrap();
  let mut revisions = RevisionLog::new();
  revisions.append(RevisionEntry::schedule_created(&actor(), at));
  for entry in &entries {
    revisions.append(RevisionEntry::shift_created(entry, &job, &actor(), at));
  }

  let schedule = Schedule {
    schedule_id,
    event_id,
    due_date: None,
    title: as_template.map(str::to_owned),
    is_template: as_template.is_some(),
    revisions,
  };

  s.create_event(event, schedule, entries).await.unwrap();
  (event_id, schedule_id)
}

// ─── Places and job types ────────────────────────────────────────────────────

#[tokio::test]
async fn ensure_place_creates_then_reuses() {
  let s = store().await;

  let first = s.ensure_place("Jazzkeller").await.unwrap();
  let second = s.ensure_place("Jazzkeller").await.unwrap();
  assert_eq!(first.place_id, second.place_id);

  let all = s.list_places().await.unwrap();
  assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn places_are_listed_in_title_order() {
  let s = store().await;
  s.ensure_place("Zeltplatz").await.unwrap();
  s.ensure_place("Aula").await.unwrap();
  s.ensure_place("Keller").await.unwrap();

  let titles: Vec<_> = s
    .list_places()
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.title)
    .collect();
  assert_eq!(titles, ["Aula", "Keller", "Zeltplatz"]);
}

#[tokio::test]
async fn archived_job_types_are_hidden_by_default() {
  let s = store().await;
  s.add_job_type("Bar", false).await.unwrap();
  s.add_job_type("Garderobe", true).await.unwrap();
  s.add_job_type("Einlass", false).await.unwrap();

  let visible: Vec<_> = s
    .list_job_types(false)
    .await
    .unwrap()
    .into_iter()
    .map(|j| j.title)
    .collect();
  assert_eq!(visible, ["Bar", "Einlass"]);

  let all = s.list_job_types(true).await.unwrap();
  assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn ensure_job_type_keeps_existing_archive_flag() {
  let s = store().await;
  s.add_job_type("Garderobe", true).await.unwrap();

  let found = s.ensure_job_type("Garderobe").await.unwrap();
  assert!(found.is_archived);

  let fresh = s.ensure_job_type("Licht").await.unwrap();
  assert!(!fresh.is_archived);
}

// ─── Eligible persons ────────────────────────────────────────────────────────

#[tokio::test]
async fn eligible_persons_filter_and_order() {
  let s = store().await;
  let club_a = s.add_club("Astra").await.unwrap();
  let club_b = s.add_club("Berg").await.unwrap();

  let now = Utc::now();
  let old = now - Duration::days(200);

  // Active member, stale timestamp: eligible via status.
  s.add_person(NewPerson {
    name:       "Clara".to_string(),
    club_id:    club_b.club_id,
    status:     MemberStatus::Active,
    ldap_id:    Some("clara".to_string()),
    updated_at: Some(old),
  })
  .await
  .unwrap();

  // Former member, recently touched: eligible via recency.
  s.add_person(NewPerson {
    name:       "Anna".to_string(),
    club_id:    club_a.club_id,
    status:     MemberStatus::Former,
    ldap_id:    Some("anna".to_string()),
    updated_at: Some(now - Duration::days(10)),
  })
  .await
  .unwrap();

  // Former member, stale: not eligible.
  s.add_person(NewPerson {
    name:       "Doris".to_string(),
    club_id:    club_a.club_id,
    status:     MemberStatus::Former,
    ldap_id:    Some("doris".to_string()),
    updated_at: Some(old),
  })
  .await
  .unwrap();

  // Candidate without a directory account: never eligible.
  s.add_person(NewPerson {
    name:       "Emil".to_string(),
    club_id:    club_a.club_id,
    status:     MemberStatus::Candidate,
    ldap_id:    None,
    updated_at: Some(now),
  })
  .await
  .unwrap();

  let eligible = s.list_eligible_persons(now).await.unwrap();
  let names: Vec<_> = eligible.iter().map(|p| p.name.as_str()).collect();

  assert_eq!(eligible.len(), 2);
  assert!(names.contains(&"Clara"));
  assert!(names.contains(&"Anna"));

  // Ordered by club first, then name.
  let clubs: Vec<_> = eligible.iter().map(|p| p.club_id).collect();
  let mut sorted = clubs.clone();
  sorted.sort();
  assert_eq!(clubs, sorted);
}

// ─── Event creation ──────────────────────────────────────────────────────────

#[tokio::test]
async fn create_event_persists_the_whole_aggregate() {
  let s = store().await;
  let (event_id, schedule_id) = seed_event(&s, 3, None).await;

  let event = s.get_event(event_id).await.unwrap().unwrap();
  assert_eq!(event.title, "Weinabend");
  assert_eq!(event.kind, EventKind::Regular);
  assert!(!event.is_private);

  let schedule = s.schedule_for_event(event_id).await.unwrap().unwrap();
  assert_eq!(schedule.schedule_id, schedule_id);
  assert_eq!(schedule.due_date, None);
  // Genesis revision plus one per shift.
  assert_eq!(schedule.revisions.len(), 4);
  assert_eq!(
    schedule.revisions.entries()[0].action,
    rota_core::revision::ACTION_SCHEDULE_CREATED
  );

  let entries = s.entries_with_assignments(schedule_id).await.unwrap();
  assert_eq!(entries.len(), 3);
  assert!(entries.iter().all(|a| a.job_type.title == "Bar"));
  assert!(entries.iter().all(|a| a.person.is_none()));
}

#[tokio::test]
async fn get_event_missing_returns_none() {
  let s = store().await;
  assert!(s.get_event(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn events_are_listed_in_begin_date_order() {
  let s = store().await;
  let place = s.ensure_place("bc-Club").await.unwrap();

  for (title, day) in [("Spät", 20), ("Früh", 5), ("Mitte", 12)] {
    let mut event = sample_event(place.place_id);
    event.title = title.to_string();
    event.begin_date = NaiveDate::from_ymd_opt(2016, 3, day).unwrap();
    let event_id = event.event_id;
    let schedule = Schedule {
      schedule_id: Uuid::new_v4(),
      event_id,
      due_date: None,
      title: None,
      is_template: false,
      revisions: RevisionLog::new(),
    };
    s.create_event(event, schedule, Vec::new()).await.unwrap();
  }

  let titles: Vec<_> = s
    .list_events()
    .await
    .unwrap()
    .into_iter()
    .map(|e| e.title)
    .collect();
  assert_eq!(titles, ["Früh", "Mitte", "Spät"]);
}

#[tokio::test]
async fn assignments_join_person_and_club() {
  let s = store().await;
  let club = s.add_club("Astra").await.unwrap();
  let person = s
    .add_person(NewPerson {
      name:       "Clara".to_string(),
      club_id:    club.club_id,
      status:     MemberStatus::Active,
      ldap_id:    Some("clara".to_string()),
      updated_at: None,
    })
    .await
    .unwrap();

  let place = s.ensure_place("bc-Club").await.unwrap();
  let job = s.ensure_job_type("Einlass").await.unwrap();

  let event = sample_event(place.place_id);
  let event_id = event.event_id;
  let schedule_id = Uuid::new_v4();
  let entry = ScheduleEntry {
    entry_id:    Uuid::new_v4(),
    schedule_id,
    job_type_id: job.job_type_id,
    person_id:   Some(person.person_id),
  };
  let schedule = Schedule {
    schedule_id,
    event_id,
    due_date: None,
    title: None,
    is_template: false,
    revisions: RevisionLog::new(),
  };
  s.create_event(event, schedule, vec![entry]).await.unwrap();

  let assignments = s.entries_with_assignments(schedule_id).await.unwrap();
  assert_eq!(assignments.len(), 1);
  let a = &assignments[0];
  assert_eq!(a.job_type.title, "Einlass");
  assert_eq!(a.person.as_ref().unwrap().name, "Clara");
  assert_eq!(a.club.as_ref().unwrap().title, "Astra");
}

// ─── Templates ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn templates_are_listed_and_resolvable() {
  let s = store().await;
  seed_event(&s, 2, Some("Konzertabend")).await;
  seed_event(&s, 1, None).await;

  let templates = s.list_templates().await.unwrap();
  assert_eq!(templates.len(), 1);
  assert_eq!(templates[0].title.as_deref(), Some("Konzertabend"));

  let found = s
    .get_template(templates[0].schedule_id)
    .await
    .unwrap()
    .unwrap();
  assert!(found.is_template);

  let entries = s.template_entries(found.schedule_id).await.unwrap();
  assert_eq!(entries.len(), 2);
  assert_eq!(entries[0].job_type.title, "Bar");
}

#[tokio::test]
async fn non_template_schedules_do_not_resolve_as_templates() {
  let s = store().await;
  let (_, schedule_id) = seed_event(&s, 1, None).await;
  assert!(s.get_template(schedule_id).await.unwrap().is_none());
  assert!(s.get_template(Uuid::new_v4()).await.unwrap().is_none());
}

// ─── Deletion ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_event_removes_entries_schedule_and_event() {
  let s = store().await;
  let (event_id, schedule_id) = seed_event(&s, 3, None).await;

  let deleted = s.delete_event(event_id).await.unwrap();
  assert!(deleted);

  assert!(s.get_event(event_id).await.unwrap().is_none());
  assert!(s.schedule_for_event(event_id).await.unwrap().is_none());
  assert!(
    s.entries_with_assignments(schedule_id)
      .await
      .unwrap()
      .is_empty()
  );
}

#[tokio::test]
async fn delete_missing_event_reports_false() {
  let s = store().await;
  assert!(!s.delete_event(Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
async fn delete_leaves_other_events_alone() {
  let s = store().await;
  let (first, _) = seed_event(&s, 2, None).await;
  let (second, second_schedule) = seed_event(&s, 1, None).await;

  s.delete_event(first).await.unwrap();

  assert!(s.get_event(second).await.unwrap().is_some());
  assert_eq!(
    s.entries_with_assignments(second_schedule)
      .await
      .unwrap()
      .len(),
    1
  );
}

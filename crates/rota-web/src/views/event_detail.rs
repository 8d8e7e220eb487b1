//! The event detail page: event data, roster, assignment pickers and the
//! revision history.
//!
//! The revision entries handed to this view are already redacted; the page
//! never shows a client IP.

use std::collections::HashMap;

use uuid::Uuid;

use rota_core::{
  event::ClubEvent,
  people::{Club, Person, Place},
  revision::RevisionEntry,
  schedule::{EntryAssignment, Schedule},
};

use crate::{error::Error, flash::Flash, views::Page};

pub struct DetailView<'a> {
  pub event:     &'a ClubEvent,
  pub place:     Option<&'a Place>,
  pub schedule:  &'a Schedule,
  pub entries:   &'a [EntryAssignment],
  pub clubs:     &'a [Club],
  /// Candidates for the assignment dropdowns (already cache-served).
  pub persons:   &'a [Person],
  /// Redacted revision entries, oldest first.
  pub revisions: &'a [RevisionEntry],
  /// Whether the internal details block is rendered at all.
  pub show_private_details: bool,
  /// Whether the delete button is rendered.
  pub may_delete: bool,
  pub flash:     Option<&'a Flash>,
}

pub fn render(view: &DetailView<'_>) -> Result<String, Error> {
  let club_titles: HashMap<Uuid, &str> = view
    .clubs
    .iter()
    .map(|c| (c.club_id, c.title.as_str()))
    .collect();

  let mut page = Page::begin(&view.event.title, view.flash)?;

  if !view.event.subtitle.is_empty() {
    page.element("h3", &[], &view.event.subtitle)?;
  }

  // ── Key data ────────────────────────────────────────────────────────────
  page.start("dl", &[])?;
  page.element("dt", &[], "Typ")?;
  page.element("dd", &[], view.event.kind.label())?;

  page.element("dt", &[], "Sektion")?;
  page.element(
    "dd",
    &[],
    view.place.map(|p| p.title.as_str()).unwrap_or("—"),
  )?;

  page.element("dt", &[], "Beginn")?;
  page.element(
    "dd",
    &[],
    &format!(
      "{} um {}",
      view.event.begin_date.format("%d.%m.%Y"),
      view.event.begin_time.format("%H:%M"),
    ),
  )?;
  page.element("dt", &[], "Ende")?;
  page.element(
    "dd",
    &[],
    &format!(
      "{} um {}",
      view.event.end_date.format("%d.%m.%Y"),
      view.event.end_time.format("%H:%M"),
    ),
  )?;

  page.element("dt", &[], "Sichtbarkeit")?;
  page.element(
    "dd",
    &[],
    if view.event.is_private { "intern" } else { "öffentlich" },
  )?;

  if let Some(due_date) = view.schedule.due_date {
    page.element("dt", &[], "Eintragefrist")?;
    page.element("dd", &[], &due_date.format("%d.%m.%Y").to_string())?;
  }
  page.end("dl")?;

  if !view.event.public_info.is_empty() {
    page.element("h4", &[], "Weitere Infos:")?;
    page.element("p", &[], &view.event.public_info)?;
  }

  if view.show_private_details && !view.event.private_details.is_empty() {
    page.element("h4", &[], "Details: (nur intern sichtbar)")?;
    page.element("p", &[], &view.event.private_details)?;
  }

  // ── Roster ──────────────────────────────────────────────────────────────
  page.element("h4", &[], "Dienstplan")?;
  page.start("table", &[("class", "roster")])?;
  page.start("tr", &[])?;
  page.element("th", &[], "Dienst")?;
  page.element("th", &[], "Eingetragen")?;
  page.end("tr")?;

  for assignment in view.entries {
    page.start("tr", &[])?;
    page.element("td", &[], &assignment.job_type.title)?;
    page.start("td", &[])?;
    match &assignment.person {
      Some(person) => {
        let club = assignment
          .club
          .as_ref()
          .map(|c| c.title.as_str())
          .unwrap_or("—");
        page.text(&format!("{} ({club})", person.name))?;
      }
      None => {
        // Unassigned: offer the candidate dropdown.
        let select_name = format!("person-{}", assignment.entry.entry_id);
        page.start("select", &[("name", &select_name)])?;
        page.element("option", &[("value", "")], "frei")?;
        for person in view.persons {
          let club = club_titles
            .get(&person.club_id)
            .copied()
            .unwrap_or("—");
          let id = person.person_id.to_string();
          page.element(
            "option",
            &[("value", &id)],
            &format!("{} ({club})", person.name),
          )?;
        }
        page.end("select")?;
      }
    }
    page.end("td")?;
    page.end("tr")?;
  }
  page.end("table")?;

  // ── Revision history ────────────────────────────────────────────────────
  page.element("h4", &[], "Änderungsverlauf")?;
  page.start("ul", &[("class", "revisions")])?;
  for revision in view.revisions {
    let mut line =
      format!("{} — {}", revision.timestamp, revision.action);
    if let Some(job_type) = &revision.job_type {
      line.push_str(&format!(" ({job_type})"));
    }
    line.push_str(&format!(" — {}", revision.user_name));
    page.element("li", &[], &line)?;
  }
  page.end("ul")?;

  // ── Actions ─────────────────────────────────────────────────────────────
  if view.may_delete {
    let action = format!("/events/{}/delete", view.event.event_id);
    page.start("form", &[("method", "post"), ("action", &action)])?;
    page.element(
      "button",
      &[("type", "submit"), ("class", "btn btn-danger")],
      "Veranstaltung löschen",
    )?;
    page.end("form")?;
  }

  page.finish()
}

//! The event-creation form.
//!
//! Everything the form shows comes from the view model; lookup lists are
//! rendered as datalists plus plain links, so the page works without any
//! script. A rejected submission's values are re-displayed from the
//! preserved form body.

use chrono::{Datelike, NaiveDate};

use rota_core::{
  event::EventKind,
  people::{JobType, Place},
  schedule::{Schedule, TemplateEntry},
};

use crate::{
  error::Error,
  flash::Flash,
  form::FormData,
  messages,
  views::Page,
};

/// Extra blank roster slots rendered below the prefilled ones.
const BLANK_SLOTS: usize = 3;

pub struct FormView<'a> {
  /// The day the form was opened for; drives the date defaults.
  pub date:             NaiveDate,
  pub places:           &'a [Place],
  pub templates:        &'a [Schedule],
  pub job_types:        &'a [JobType],
  /// Entries of the activated template, if one was chosen.
  pub template_entries: &'a [TemplateEntry],
  pub active_template:  &'a str,
  pub default_place:    &'a str,
  pub authorized:       bool,
  pub flash:            Option<&'a Flash>,
  pub old:              Option<&'a FormData>,
}

impl FormView<'_> {
  /// Previously submitted value for `key`, if the form is being re-displayed.
  fn old_value(&self, key: &str) -> Option<&str> {
    self.old.and_then(|data| data.get(key))
  }
}

pub fn render(view: &FormView<'_>) -> Result<String, Error> {
  let mut page = Page::begin("Neue Veranstaltung erstellen", view.flash)?;

  if !view.authorized {
    page.element(
      "div",
      &[("class", "alert alert-danger")],
      messages::ACCESS_DENIED,
    )?;
    return page.finish();
  }

  page.start("form", &[("method", "post"), ("action", "/events")])?;

  // ── Template picker ─────────────────────────────────────────────────────
  page.start("fieldset", &[])?;
  page.element("legend", &[], "Vorlage")?;
  page.element("label", &[("for", "templateName")], "Vorlage:")?;
  page.leaf(
    "input",
    &[
      ("type", "text"),
      ("id", "templateName"),
      ("name", "templateName"),
      ("list", "templates"),
      ("value", view.old_value("templateName").unwrap_or(view.active_template)),
    ],
  )?;
  page.start("datalist", &[("id", "templates")])?;
  for template in view.templates {
    page.leaf(
      "option",
      &[("value", template.title.as_deref().unwrap_or(""))],
    )?;
  }
  page.end("datalist")?;

  page.start("ul", &[("class", "template-links")])?;
  for template in view.templates {
    page.start("li", &[])?;
    let href = format!(
      "/events/new/{}/{:02}/{:02}/{}",
      view.date.year(),
      view.date.month(),
      view.date.day(),
      template.schedule_id,
    );
    page.element(
      "a",
      &[("href", &href)],
      template.title.as_deref().unwrap_or("(ohne Titel)"),
    )?;
    page.end("li")?;
  }
  page.end("ul")?;

  page.start("label", &[])?;
  page.leaf(
    "input",
    &[("type", "checkbox"), ("name", "saveAsTemplate"), ("value", "1")],
  )?;
  page.text("Als neue Vorlage speichern?")?;
  page.end("label")?;
  page.end("fieldset")?;

  // ── Event fields ────────────────────────────────────────────────────────
  page.start("fieldset", &[])?;
  page.element("legend", &[], "Neue Veranstaltung erstellen:")?;

  page.element("label", &[("for", "title")], "Titel:")?;
  page.leaf(
    "input",
    &[
      ("type", "text"),
      ("id", "title"),
      ("name", "title"),
      ("placeholder", "z.B. Weinabend"),
      ("required", "required"),
      ("value", view.old_value("title").unwrap_or("")),
    ],
  )?;

  page.element("label", &[("for", "subtitle")], "Untertitel:")?;
  page.leaf(
    "input",
    &[
      ("type", "text"),
      ("id", "subtitle"),
      ("name", "subtitle"),
      (
        "placeholder",
        "z.B. Das Leben ist zu kurz, um schlechten Wein zu trinken",
      ),
      ("value", view.old_value("subtitle").unwrap_or("")),
    ],
  )?;

  // Type radios; the previously chosen code stays selected, else code 0.
  let chosen_kind = view.old_value("evnt_type").unwrap_or("0");
  page.element("p", &[], "Typ:")?;
  for kind in EventKind::ALL {
    let code = kind.code().to_string();
    page.start("label", &[("class", "radio")])?;
    let mut attrs = vec![
      ("type", "radio"),
      ("name", "evnt_type"),
      ("value", code.as_str()),
    ];
    if code == chosen_kind {
      attrs.push(("checked", "checked"));
    }
    page.leaf("input", &attrs)?;
    page.text(kind.label())?;
    page.end("label")?;
  }

  // Visibility keeps its historical wire meaning: checked ("1") = public.
  page.start("label", &[])?;
  let mut visibility_attrs =
    vec![("type", "checkbox"), ("name", "isPrivate"), ("value", "1")];
  if view.old.is_none() || view.old_value("isPrivate") == Some("1") {
    visibility_attrs.push(("checked", "checked"));
  }
  page.leaf("input", &visibility_attrs)?;
  page.text("Öffentliche Veranstaltung?")?;
  page.end("label")?;

  page.element("label", &[("for", "place")], "Sektion:")?;
  page.leaf(
    "input",
    &[
      ("type", "text"),
      ("id", "place"),
      ("name", "place"),
      ("list", "places"),
      ("value", view.old_value("place").unwrap_or(view.default_place)),
    ],
  )?;
  page.start("datalist", &[("id", "places")])?;
  for place in view.places {
    page.leaf("option", &[("value", place.title.as_str())])?;
  }
  page.end("datalist")?;

  // ── Dates and times ─────────────────────────────────────────────────────
  let begin_date = view.date.format("%Y-%m-%d").to_string();
  let end_date = view
    .date
    .succ_opt()
    .unwrap_or(view.date)
    .format("%Y-%m-%d")
    .to_string();

  page.element("label", &[("for", "beginDate")], "Beginn:")?;
  page.leaf(
    "input",
    &[
      ("type", "date"),
      ("id", "beginDate"),
      ("name", "beginDate"),
      ("value", view.old_value("beginDate").unwrap_or(&begin_date)),
    ],
  )?;
  page.text("um")?;
  page.leaf(
    "input",
    &[
      ("type", "time"),
      ("name", "beginTime"),
      ("value", view.old_value("beginTime").unwrap_or("21:00")),
    ],
  )?;

  page.element("label", &[("for", "endDate")], "Ende:")?;
  page.leaf(
    "input",
    &[
      ("type", "date"),
      ("id", "endDate"),
      ("name", "endDate"),
      ("value", view.old_value("endDate").unwrap_or(&end_date)),
    ],
  )?;
  page.text("um")?;
  page.leaf(
    "input",
    &[
      ("type", "time"),
      ("name", "endTime"),
      ("value", view.old_value("endTime").unwrap_or("01:00")),
    ],
  )?;

  page.element("label", &[("for", "preparationTime")], "DV-Zeit:")?;
  page.leaf(
    "input",
    &[
      ("type", "time"),
      ("id", "preparationTime"),
      ("name", "preparationTime"),
      ("value", view.old_value("preparationTime").unwrap_or("21:00")),
    ],
  )?;
  page.end("fieldset")?;

  // ── Info texts ──────────────────────────────────────────────────────────
  page.start("fieldset", &[])?;
  page.element("legend", &[], "Weitere Infos: (öffentlich)")?;
  page.start(
    "textarea",
    &[
      ("name", "publicInfo"),
      ("rows", "8"),
      ("placeholder", "z.B. Karten nur im Vorverkauf"),
    ],
  )?;
  page.text(view.old_value("publicInfo").unwrap_or(""))?;
  page.end("textarea")?;
  page.end("fieldset")?;

  page.start("fieldset", &[])?;
  page.element("legend", &[], "Details: (nur intern sichtbar)")?;
  page.start(
    "textarea",
    &[
      ("name", "privateDetails"),
      ("rows", "5"),
      ("placeholder", "z.B. DJ-Tisch wird gebraucht"),
    ],
  )?;
  page.text(view.old_value("privateDetails").unwrap_or(""))?;
  page.end("textarea")?;
  page.end("fieldset")?;

  // ── Roster slots ────────────────────────────────────────────────────────
  page.start("fieldset", &[])?;
  page.element("legend", &[], "Dienstplan")?;
  if !view.active_template.is_empty() {
    page.element(
      "p",
      &[],
      &format!("Aktive Vorlage: {}", view.active_template),
    )?;
  }

  // Prefill order: re-displayed submission wins, then template entries.
  let prefilled: Vec<String> = match view.old {
    Some(old) => old
      .values("jobType")
      .into_iter()
      .map(str::to_owned)
      .collect(),
    None => view
      .template_entries
      .iter()
      .map(|e| e.job_type.title.clone())
      .collect(),
  };

  for slot in prefilled
    .iter()
    .map(String::as_str)
    .chain(std::iter::repeat_n("", BLANK_SLOTS))
  {
    page.leaf(
      "input",
      &[
        ("type", "text"),
        ("name", "jobType"),
        ("list", "jobtypes"),
        ("value", slot),
      ],
    )?;
  }
  page.start("datalist", &[("id", "jobtypes")])?;
  for job_type in view.job_types {
    page.leaf("option", &[("value", job_type.title.as_str())])?;
  }
  page.end("datalist")?;
  page.end("fieldset")?;

  // ── Creation password ───────────────────────────────────────────────────
  page.element("label", &[("for", "password")], "Passwort zum Eintragen:")?;
  page.leaf(
    "input",
    &[("type", "password"), ("id", "password"), ("name", "password")],
  )?;
  page.element(
    "label",
    &[("for", "passwordDouble")],
    "Passwort wiederholen:",
  )?;
  page.leaf(
    "input",
    &[
      ("type", "password"),
      ("id", "passwordDouble"),
      ("name", "passwordDouble"),
    ],
  )?;

  page.element(
    "button",
    &[("type", "submit"), ("class", "btn btn-primary")],
    "Veranstaltung mit Dienstplan erstellen",
  )?;
  page.element(
    "a",
    &[("href", "javascript:history.back()"), ("class", "btn btn-default")],
    "Ohne Änderung zurück",
  )?;

  page.end("form")?;
  page.finish()
}

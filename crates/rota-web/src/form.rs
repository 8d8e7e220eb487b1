//! Hand-written `application/x-www-form-urlencoded` decoding and the typed
//! creation-form input.
//!
//! Every field the creation form posts is listed on [`EventForm`] with an
//! explicit rule: copied verbatim, optional with a default, or repeated.
//! Nothing downstream ever touches a raw field name again.

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use rota_core::event::{ClubEvent, EventKind};

// ─── Urlencoded body ─────────────────────────────────────────────────────────

/// Decoded key/value pairs of a form body, in submission order. Repeated
/// keys are kept.
#[derive(Debug, Clone, Default)]
pub struct FormData {
  pairs: Vec<(String, String)>,
}

impl FormData {
  pub fn parse(body: &[u8]) -> Self {
    let raw = String::from_utf8_lossy(body);
    let pairs = raw
      .split('&')
      .filter(|chunk| !chunk.is_empty())
      .map(|chunk| {
        let (key, value) = chunk.split_once('=').unwrap_or((chunk, ""));
        (percent_decode(key), percent_decode(value))
      })
      .collect();
    Self { pairs }
  }

  /// First value for `key`, or `None`.
  pub fn get(&self, key: &str) -> Option<&str> {
    self
      .pairs
      .iter()
      .find_map(|(k, v)| (k == key).then_some(v.as_str()))
  }

  /// First value for `key`, or the empty string.
  pub fn value(&self, key: &str) -> &str {
    self.get(key).unwrap_or("")
  }

  /// All values for `key`, in order.
  pub fn values(&self, key: &str) -> Vec<&str> {
    self
      .pairs
      .iter()
      .filter_map(|(k, v)| (k == key).then_some(v.as_str()))
      .collect()
  }
}

/// Percent-decoding with `+` as space. Malformed escapes pass through
/// verbatim rather than failing the whole request.
fn percent_decode(s: &str) -> String {
  let bytes = s.as_bytes();
  let mut out = Vec::with_capacity(bytes.len());
  let mut i = 0;
  while i < bytes.len() {
    match bytes[i] {
      b'+' => {
        out.push(b' ');
        i += 1;
      }
      b'%' => match (hex_digit(bytes.get(i + 1)), hex_digit(bytes.get(i + 2))) {
        (Some(hi), Some(lo)) => {
          out.push(hi * 16 + lo);
          i += 3;
        }
        _ => {
          out.push(b'%');
          i += 1;
        }
      },
      other => {
        out.push(other);
        i += 1;
      }
    }
  }
  String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(b: Option<&u8>) -> Option<u8> {
  (*b? as char).to_digit(16).map(|d| d as u8)
}

// ─── Typed creation form ─────────────────────────────────────────────────────

/// The creation form, fully typed. Field rules:
///
/// - text fields are copied verbatim (empty string when absent);
/// - `evnt_type` must be a known kind code, else code 0;
/// - dates/times are optional; blanks take their documented defaults at
///   assembly time;
/// - `isPrivate` keeps its historical inverted wire meaning: the value `"1"`
///   marks the event *public*; the parsed field carries the true polarity;
/// - `jobType` repeats, one value per roster slot; blanks are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct EventForm {
  pub title:            String,
  pub subtitle:         String,
  pub public_info:      String,
  pub private_details:  String,
  pub kind:             EventKind,
  pub place:            String,
  pub begin_date:       Option<NaiveDate>,
  pub begin_time:       Option<NaiveTime>,
  pub end_date:         Option<NaiveDate>,
  pub end_time:         Option<NaiveTime>,
  pub is_private:       bool,
  pub password:         String,
  pub password_repeat:  String,
  pub save_as_template: bool,
  pub template_name:    String,
  /// Posted by the form but not persisted anywhere yet.
  pub preparation_time: Option<NaiveTime>,
  pub job_types:        Vec<String>,
}

impl EventForm {
  pub fn from_form(data: &FormData) -> Self {
    Self {
      title:            data.value("title").to_string(),
      subtitle:         data.value("subtitle").to_string(),
      public_info:      data.value("publicInfo").to_string(),
      private_details:  data.value("privateDetails").to_string(),
      kind:             data
        .value("evnt_type")
        .parse::<i64>()
        .ok()
        .and_then(EventKind::from_code)
        .unwrap_or(EventKind::Regular),
      place:            data.value("place").to_string(),
      begin_date:       parse_date(data.value("beginDate")),
      begin_time:       parse_time(data.value("beginTime")),
      end_date:         parse_date(data.value("endDate")),
      end_time:         parse_time(data.value("endTime")),
      // Historical wire inversion: "1" means the event goes public.
      is_private:       data.value("isPrivate") != "1",
      password:         data.value("password").to_string(),
      password_repeat:  data.value("passwordDouble").to_string(),
      save_as_template: data.value("saveAsTemplate") == "1",
      template_name:    data.value("templateName").to_string(),
      preparation_time: parse_time(data.value("preparationTime")),
      job_types:        data
        .values("jobType")
        .into_iter()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .collect(),
    }
  }

  pub fn passwords_match(&self) -> bool {
    self.password == self.password_repeat
  }

  /// Build the event from the typed fields. Blank dates default to `today`,
  /// blank times to midnight.
  pub fn assemble_event(
    &self,
    event_id: Uuid,
    place_id: Uuid,
    today: NaiveDate,
  ) -> ClubEvent {
    let midnight = NaiveTime::MIN;
    ClubEvent {
      event_id,
      title: self.title.clone(),
      subtitle: self.subtitle.clone(),
      public_info: self.public_info.clone(),
      private_details: self.private_details.clone(),
      kind: self.kind,
      place_id,
      begin_date: self.begin_date.unwrap_or(today),
      end_date: self.end_date.unwrap_or(today),
      begin_time: self.begin_time.unwrap_or(midnight),
      end_time: self.end_time.unwrap_or(midnight),
      is_private: self.is_private,
    }
  }
}

/// Blank or unparseable values read as `None` and fall back to the field's
/// default at assembly time.
fn parse_date(s: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

fn parse_time(s: &str) -> Option<NaiveTime> {
  let s = s.trim();
  NaiveTime::parse_from_str(s, "%H:%M:%S")
    .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
    .ok()
}

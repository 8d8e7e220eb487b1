//! Session decoding and the request-scoped context.
//!
//! Sessions are produced elsewhere (the login service); this component only
//! *consumes* them. A session travels as a signed cookie: the base64-encoded
//! JSON payload followed by a dot and a hex SHA-256 signature over
//! `secret.payload`. Tampered or malformed cookies read as "no session".

use axum::http::{HeaderMap, header};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use rota_core::revision::Actor;

/// Cookie carrying the signed session payload.
pub const SESSION_COOKIE: &str = "rota_session";

/// Recorded client IP when no forwarding header is present.
pub const UNKNOWN_IP: &str = "unknown";

/// The user group stored in the session. Groups other than the two
/// privileged ones all behave the same here, so they collapse into
/// [`UserGroup::Mitglied`] on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserGroup {
  Marketing,
  Clubleitung,
  Mitglied,
}

impl<'de> Deserialize<'de> for UserGroup {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    let s = String::deserialize(deserializer)?;
    Ok(match s.as_str() {
      "marketing" => Self::Marketing,
      "clubleitung" => Self::Clubleitung,
      _ => Self::Mitglied,
    })
  }
}

impl UserGroup {
  /// Only marketing and the club committee may create and delete events.
  pub fn may_manage_events(self) -> bool {
    matches!(self, Self::Marketing | Self::Clubleitung)
  }
}

/// The identity fields this component reads from a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
  pub user_id: Uuid,
  pub name:    String,
  pub group:   UserGroup,
  /// Club affiliation, shown next to the name in recorded actions.
  pub club:    String,
}

/// Everything request-scoped the handlers need: who is asking, and from
/// where. Built once per request; nothing reads ambient session state.
#[derive(Debug, Clone)]
pub struct RequestContext {
  pub user:      Option<SessionUser>,
  pub client_ip: String,
}

impl RequestContext {
  pub fn from_headers(headers: &HeaderMap, secret: &str) -> Self {
    let user = cookie_value(headers, SESSION_COOKIE)
      .and_then(|raw| decode_session(raw, secret));

    let client_ip = headers
      .get("x-forwarded-for")
      .and_then(|v| v.to_str().ok())
      .and_then(|v| v.split(',').next())
      .map(|v| v.trim().to_string())
      .unwrap_or_else(|| UNKNOWN_IP.to_string());

    Self { user, client_ip }
  }

  pub fn is_authenticated(&self) -> bool {
    self.user.is_some()
  }

  pub fn may_manage_events(&self) -> bool {
    self
      .user
      .as_ref()
      .is_some_and(|u| u.group.may_manage_events())
  }

  /// The identity snapshot recorded into revision logs.
  pub fn actor(&self) -> Actor {
    match &self.user {
      Some(u) => Actor {
        user_id:      Some(u.user_id),
        display_name: format!("{} ({})", u.name, u.club),
        client_ip:    self.client_ip.clone(),
      },
      None => Actor::guest(self.client_ip.clone()),
    }
  }
}

// ─── Cookie plumbing ─────────────────────────────────────────────────────────

/// Extract a cookie value from the `Cookie` request header.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
  let raw = headers.get(header::COOKIE)?.to_str().ok()?;
  raw.split(';').find_map(|pair| {
    let (key, value) = pair.trim().split_once('=')?;
    (key == name).then_some(value)
  })
}

fn sign(payload: &str, secret: &str) -> String {
  let mut hasher = Sha256::new();
  hasher.update(secret.as_bytes());
  hasher.update(b".");
  hasher.update(payload.as_bytes());
  hex::encode(hasher.finalize())
}

/// Serialise and sign a session payload — the counterpart of
/// [`decode_session`], used by the login service and by tests.
pub fn encode_session(user: &SessionUser, secret: &str) -> String {
  // Serialising a plain struct of strings cannot fail.
  let json = serde_json::to_vec(user).unwrap_or_default();
  let payload = B64.encode(json);
  let signature = sign(&payload, secret);
  format!("{payload}.{signature}")
}

/// Verify and deserialise a session cookie value. Any defect — bad shape,
/// bad signature, bad JSON — reads as "no session".
pub fn decode_session(value: &str, secret: &str) -> Option<SessionUser> {
  let (payload, signature) = value.split_once('.')?;
  if sign(payload, secret) != signature {
    return None;
  }
  let json = B64.decode(payload).ok()?;
  serde_json::from_slice(&json).ok()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn user() -> SessionUser {
    SessionUser {
      user_id: Uuid::new_v4(),
      name:    "Erika Muster".to_string(),
      group:   UserGroup::Marketing,
      club:    "bc-Club".to_string(),
    }
  }

  #[test]
  fn session_round_trip() {
    let u = user();
    let cookie = encode_session(&u, "geheim");
    assert_eq!(decode_session(&cookie, "geheim"), Some(u));
  }

  #[test]
  fn wrong_secret_reads_as_no_session() {
    let cookie = encode_session(&user(), "geheim");
    assert_eq!(decode_session(&cookie, "anders"), None);
  }

  #[test]
  fn tampered_payload_reads_as_no_session() {
    let cookie = encode_session(&user(), "geheim");
    let tampered = format!("AAAA{cookie}");
    assert_eq!(decode_session(&tampered, "geheim"), None);
  }

  #[test]
  fn garbage_reads_as_no_session() {
    assert_eq!(decode_session("", "geheim"), None);
    assert_eq!(decode_session("kein-cookie", "geheim"), None);
  }

  #[test]
  fn unknown_groups_deserialise_as_plain_members() {
    let json = serde_json::json!({
      "user_id": Uuid::new_v4(),
      "name": "Hans",
      "group": "bedienung",
      "club": "bc-Club",
    });
    let parsed: SessionUser = serde_json::from_value(json).unwrap();
    assert_eq!(parsed.group, UserGroup::Mitglied);
    assert!(!parsed.group.may_manage_events());
  }

  #[test]
  fn context_without_cookie_is_anonymous() {
    let headers = HeaderMap::new();
    let ctx = RequestContext::from_headers(&headers, "geheim");
    assert!(!ctx.is_authenticated());
    assert_eq!(ctx.client_ip, UNKNOWN_IP);
    assert_eq!(ctx.actor().display_name, "Gast");
  }

  #[test]
  fn context_reads_cookie_and_forwarded_ip() {
    let u = user();
    let mut headers = HeaderMap::new();
    headers.insert(
      header::COOKIE,
      format!("other=1; {}={}", SESSION_COOKIE, encode_session(&u, "geheim"))
        .parse()
        .unwrap(),
    );
    headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());

    let ctx = RequestContext::from_headers(&headers, "geheim");
    assert_eq!(ctx.user, Some(u));
    assert_eq!(ctx.client_ip, "203.0.113.7");
    assert_eq!(ctx.actor().display_name, "Erika Muster (bc-Club)");
  }
}

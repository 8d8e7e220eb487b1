//! One-shot flash messages and old-input preservation.
//!
//! A flash is a notice attached to the next rendered page after a redirect:
//! the redirect response sets a cookie, the next view renders and clears it.
//! Rejected form submissions additionally carry the raw form body in a
//! second cookie so the form can be re-displayed with the submitted values.

use axum::{
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use serde::{Deserialize, Serialize};

use crate::session::cookie_value;

/// Cookie carrying the flash message.
pub const FLASH_COOKIE: &str = "rota_flash";
/// Cookie carrying a rejected submission's raw form body.
pub const OLD_INPUT_COOKIE: &str = "rota_old";

/// Bootstrap-style severity tag rendered onto the flash banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Danger,
  Success,
}

impl Severity {
  pub fn css_class(self) -> &'static str {
    match self {
      Self::Danger => "alert-danger",
      Self::Success => "alert-success",
    }
  }
}

/// A message plus severity, shown once on the next rendered page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flash {
  pub message:  String,
  pub severity: Severity,
}

impl Flash {
  pub fn danger(message: impl Into<String>) -> Self {
    Self { message: message.into(), severity: Severity::Danger }
  }

  pub fn success(message: impl Into<String>) -> Self {
    Self { message: message.into(), severity: Severity::Success }
  }

  fn to_cookie(&self) -> String {
    // A struct of a string and a unit enum always serialises.
    let json = serde_json::to_vec(self).unwrap_or_default();
    format!("{}={}; Path=/; HttpOnly", FLASH_COOKIE, B64.encode(json))
  }
}

/// Read the flash cookie from a request, if any.
pub fn take_flash(headers: &axum::http::HeaderMap) -> Option<Flash> {
  let raw = cookie_value(headers, FLASH_COOKIE)?;
  let json = B64.decode(raw).ok()?;
  serde_json::from_slice(&json).ok()
}

/// Read the preserved form body from a request, if any.
pub fn take_old_input(headers: &axum::http::HeaderMap) -> Option<Vec<u8>> {
  let raw = cookie_value(headers, OLD_INPUT_COOKIE)?;
  B64.decode(raw).ok()
}

fn clear_cookie(name: &str) -> String {
  format!("{name}=; Path=/; Max-Age=0")
}

/// `303 See Other` to `location`, with a flash for the next page.
pub fn redirect_with_flash(location: &str, flash: Flash) -> Response {
  let mut response =
    (StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response();
  append_set_cookie(&mut response, &flash.to_cookie());
  response
}

/// Like [`redirect_with_flash`], additionally preserving the submitted form
/// body for re-display.
pub fn redirect_back_with_input(
  location: &str,
  flash: Flash,
  raw_form: &[u8],
) -> Response {
  let mut response = redirect_with_flash(location, flash);
  let old = format!(
    "{}={}; Path=/; HttpOnly",
    OLD_INPUT_COOKIE,
    B64.encode(raw_form)
  );
  append_set_cookie(&mut response, &old);
  response
}

/// Attach clearing `Set-Cookie` headers for the one-shot cookies a view has
/// just consumed.
pub fn clear_consumed_cookies(
  response: &mut Response,
  had_flash: bool,
  had_old_input: bool,
) {
  if had_flash {
    append_set_cookie(response, &clear_cookie(FLASH_COOKIE));
  }
  if had_old_input {
    append_set_cookie(response, &clear_cookie(OLD_INPUT_COOKIE));
  }
}

fn append_set_cookie(response: &mut Response, value: &str) {
  if let Ok(header_value) = value.parse() {
    response
      .headers_mut()
      .append(header::SET_COOKIE, header_value);
  }
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderMap;

  use super::*;

  fn headers_with_cookie(cookie: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, cookie.parse().unwrap());
    headers
  }

  #[test]
  fn flash_survives_the_cookie_round_trip() {
    let flash = Flash::danger("Die eingegebenen Passwörter stimmen nicht überein.");
    let response = redirect_with_flash("/events/new", flash.clone());
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let set = response
      .headers()
      .get(header::SET_COOKIE)
      .unwrap()
      .to_str()
      .unwrap()
      .to_string();
    let value = set
      .strip_prefix("rota_flash=")
      .unwrap()
      .split(';')
      .next()
      .unwrap();

    let headers = headers_with_cookie(&format!("{FLASH_COOKIE}={value}"));
    assert_eq!(take_flash(&headers), Some(flash));
  }

  #[test]
  fn old_input_survives_the_cookie_round_trip() {
    let body = b"title=Weinabend&place=bc-Club";
    let response = redirect_back_with_input(
      "/events/new",
      Flash::danger("nope"),
      body,
    );

    let cookies: Vec<_> = response
      .headers()
      .get_all(header::SET_COOKIE)
      .iter()
      .map(|v| v.to_str().unwrap().to_string())
      .collect();
    assert_eq!(cookies.len(), 2);

    let old = cookies
      .iter()
      .find_map(|c| c.strip_prefix("rota_old="))
      .unwrap()
      .split(';')
      .next()
      .unwrap();
    let headers = headers_with_cookie(&format!("{OLD_INPUT_COOKIE}={old}"));
    assert_eq!(take_old_input(&headers).as_deref(), Some(body.as_slice()));
  }

  #[test]
  fn missing_cookies_read_as_none() {
    let headers = HeaderMap::new();
    assert_eq!(take_flash(&headers), None);
    assert_eq!(take_old_input(&headers), None);
  }
}

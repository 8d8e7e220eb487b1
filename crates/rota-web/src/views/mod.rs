//! Server-side HTML generation.
//!
//! Views are plain functions from a view-model struct to an HTML string,
//! built with `quick-xml`'s writer so text and attribute values are always
//! escaped. No template engine, no interpolation into raw strings.

pub mod event_detail;
pub mod event_form;

use std::io::Cursor;

use quick_xml::{
  Writer,
  events::{BytesEnd, BytesStart, BytesText, Event},
};

use crate::{error::Error, flash::Flash};

/// Thin wrapper over the XML writer with HTML-shaped helpers.
pub(crate) struct Markup {
  writer: Writer<Cursor<Vec<u8>>>,
}

impl Markup {
  fn new() -> Self {
    Self { writer: Writer::new(Cursor::new(Vec::new())) }
  }

  fn write(&mut self, event: Event<'_>) -> Result<(), Error> {
    self
      .writer
      .write_event(event)
      .map_err(|e| Error::Render(e.to_string()))
  }

  pub fn start(
    &mut self,
    tag: &str,
    attrs: &[(&str, &str)],
  ) -> Result<(), Error> {
    let mut element = BytesStart::new(tag);
    for attr in attrs {
      element.push_attribute(*attr);
    }
    self.write(Event::Start(element))
  }

  pub fn end(&mut self, tag: &str) -> Result<(), Error> {
    self.write(Event::End(BytesEnd::new(tag)))
  }

  pub fn text(&mut self, text: &str) -> Result<(), Error> {
    self.write(Event::Text(BytesText::new(text)))
  }

  /// A void element, e.g. `<input …/>`.
  pub fn leaf(&mut self, tag: &str, attrs: &[(&str, &str)]) -> Result<(), Error> {
    let mut element = BytesStart::new(tag);
    for attr in attrs {
      element.push_attribute(*attr);
    }
    self.write(Event::Empty(element))
  }

  /// `<tag attrs…>text</tag>` in one call.
  pub fn element(
    &mut self,
    tag: &str,
    attrs: &[(&str, &str)],
    text: &str,
  ) -> Result<(), Error> {
    self.start(tag, attrs)?;
    self.text(text)?;
    self.end(tag)
  }

  fn into_string(self) -> String {
    String::from_utf8_lossy(&self.writer.into_inner().into_inner()).into_owned()
  }
}

/// The document shell shared by all views: doctype, head, body, and the
/// one-shot flash banner right under the heading.
pub(crate) struct Page {
  markup: Markup,
}

impl Page {
  pub fn begin(title: &str, flash: Option<&Flash>) -> Result<Self, Error> {
    let mut markup = Markup::new();
    markup.write(Event::DocType(BytesText::from_escaped("html")))?;
    markup.start("html", &[("lang", "de")])?;
    markup.start("head", &[])?;
    markup.leaf("meta", &[("charset", "utf-8")])?;
    markup.element("title", &[], title)?;
    markup.end("head")?;
    markup.start("body", &[])?;
    markup.element("h2", &[], title)?;

    if let Some(flash) = flash {
      markup.element(
        "div",
        &[("class", &format!("alert {}", flash.severity.css_class()))],
        &flash.message,
      )?;
    }

    Ok(Self { markup })
  }

  pub fn finish(mut self) -> Result<String, Error> {
    self.markup.end("body")?;
    self.markup.end("html")?;
    Ok(self.markup.into_string())
  }
}

impl std::ops::Deref for Page {
  type Target = Markup;
  fn deref(&self) -> &Markup {
    &self.markup
  }
}

impl std::ops::DerefMut for Page {
  fn deref_mut(&mut self) -> &mut Markup {
    &mut self.markup
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn text_and_attributes_are_escaped() {
    let mut page = Page::begin("Test <b>", None).unwrap();
    page
      .leaf("input", &[("value", "a \"quoted\" & <dangerous> value")])
      .unwrap();
    let html = page.finish().unwrap();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Test &lt;b&gt;"));
    assert!(!html.contains("<dangerous>"));
  }

  #[test]
  fn flash_banner_carries_severity_class() {
    let flash = Flash::success("Veranstaltung gelöscht.");
    let page = Page::begin("Seite", Some(&flash)).unwrap();
    let html = page.finish().unwrap();

    assert!(html.contains("alert-success"));
    assert!(html.contains("Veranstaltung gelöscht."));
  }
}

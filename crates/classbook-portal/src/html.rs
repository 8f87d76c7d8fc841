//! Minimal HTML generation on top of `quick-xml`'s writer API.
//!
//! Text and attribute values are always escaped; only the embedded style
//! sheet goes out verbatim through [`HtmlWriter::raw`].

use std::io::Cursor;

use quick_xml::{
  Writer,
  events::{BytesEnd, BytesStart, BytesText, Event},
};

pub type Attrs<'a> = [(&'a str, &'a str)];

pub struct HtmlWriter {
  writer: Writer<Cursor<Vec<u8>>>,
}

impl Default for HtmlWriter {
  fn default() -> Self { Self::new() }
}

impl HtmlWriter {
  /// Start a document with the HTML5 doctype.
  pub fn new() -> Self {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer
      .write_event(Event::DocType(BytesText::from_escaped("html")))
      .unwrap();
    Self { writer }
  }

  pub fn open(&mut self, tag: &str, attrs: &Attrs<'_>) {
    self.writer.write_event(Event::Start(start(tag, attrs))).unwrap();
  }

  pub fn close(&mut self, tag: &str) {
    self.writer.write_event(Event::End(BytesEnd::new(tag))).unwrap();
  }

  pub fn text(&mut self, text: &str) {
    self.writer.write_event(Event::Text(BytesText::new(text))).unwrap();
  }

  /// `<tag attrs>text</tag>`
  pub fn element(&mut self, tag: &str, attrs: &Attrs<'_>, text: &str) {
    self.open(tag, attrs);
    self.text(text);
    self.close(tag);
  }

  /// A void element such as `<input>` or `<meta>`.
  pub fn void(&mut self, tag: &str, attrs: &Attrs<'_>) {
    self.writer.write_event(Event::Empty(start(tag, attrs))).unwrap();
  }

  /// Write `markup` unescaped. Callers pass only compile-time constants.
  pub fn raw(&mut self, markup: &'static str) {
    self
      .writer
      .write_event(Event::Text(BytesText::from_escaped(markup)))
      .unwrap();
  }

  pub fn finish(self) -> String {
    let bytes = self.writer.into_inner().into_inner();
    String::from_utf8_lossy(&bytes).into_owned()
  }
}

fn start<'a>(tag: &'a str, attrs: &Attrs<'_>) -> BytesStart<'a> {
  let mut el = BytesStart::new(tag);
  for &attr in attrs {
    el.push_attribute(attr);
  }
  el
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn document_starts_with_doctype() {
    let w = HtmlWriter::new();
    assert_eq!(w.finish(), "<!DOCTYPE html>");
  }

  #[test]
  fn text_and_attributes_are_escaped() {
    let mut w = HtmlWriter::new();
    w.element("td", &[("title", "a\"b")], "<script>&");
    let html = w.finish();
    assert!(html.contains("title=\"a&quot;b\""), "{html}");
    assert!(html.contains("&lt;script&gt;&amp;"), "{html}");
    assert!(!html.contains("<script>"), "{html}");
  }

  #[test]
  fn void_elements_self_close() {
    let mut w = HtmlWriter::new();
    w.void("input", &[("name", "q"), ("value", "ana")]);
    assert!(w.finish().ends_with("<input name=\"q\" value=\"ana\"/>"));
  }

  #[test]
  fn raw_is_verbatim() {
    let mut w = HtmlWriter::new();
    w.open("style", &[]);
    w.raw("a > b { color: red }");
    w.close("style");
    assert!(w.finish().contains("<style>a > b { color: red }</style>"));
  }
}

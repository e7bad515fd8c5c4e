//! A minimal tag builder for emitting HTML documents. Tags are written
//! directly into a [`String`] with no whitespace between them, so the same
//! sequence of calls always produces the same bytes. Text and attribute values
//! are escaped with [`pulldown_cmark::escape`]: ordinary values go through
//! [`escape_html`] and link targets through [`escape_href`].

use pulldown_cmark::escape::{escape_href, escape_html, StrWrite};
use std::io;

/// The value of a single attribute. The variant selects the escaping.
#[derive(Clone, Copy, Debug)]
pub enum Value<'a> {
    /// Free text, HTML-escaped (e.g., `alt`, `class`, `content`).
    Text(&'a str),

    /// A link target, URL-escaped (e.g., `href`, `src`).
    Url(&'a str),
}

/// A single `name="value"` attribute.
pub type Attr<'a> = (&'a str, Value<'a>);

/// Accumulates an HTML document. See the module docs.
#[derive(Debug, Default)]
pub struct Doc {
    out: String,
}

impl Doc {
    pub fn new() -> Doc {
        Doc::default()
    }

    /// Appends `raw` verbatim. Used for the doctype and for inline
    /// stylesheets, which must not be entity-escaped.
    pub fn asis(&mut self, raw: &str) {
        self.out.push_str(raw);
    }

    /// Appends HTML-escaped text.
    pub fn text(&mut self, text: &str) -> io::Result<()> {
        escape_html(&mut self.out, text)
    }

    /// Appends a self-closing tag, e.g. `<img src="a.jpg" />`.
    pub fn stag(&mut self, name: &str, attrs: &[Attr]) -> io::Result<()> {
        self.open(name, attrs)?;
        self.out.write_str(" />")
    }

    /// Appends an element: the opening tag, whatever `body` writes, then the
    /// closing tag. Nesting calls to `tag` from within `body` produces nested
    /// elements.
    pub fn tag<F>(&mut self, name: &str, attrs: &[Attr], body: F) -> io::Result<()>
    where
        F: FnOnce(&mut Doc) -> io::Result<()>,
    {
        self.open(name, attrs)?;
        self.out.write_str(">")?;
        body(self)?;
        write!(self.out, "</{}>", name)
    }

    /// Consumes the builder and returns the document text.
    pub fn into_string(self) -> String {
        self.out
    }

    // Writes `<name` and the attributes but not the terminating `>` so that
    // [`Doc::stag`] and [`Doc::tag`] can finish the tag differently.
    fn open(&mut self, name: &str, attrs: &[Attr]) -> io::Result<()> {
        write!(self.out, "<{}", name)?;
        for (key, value) in attrs {
            write!(self.out, " {}=\"", key)?;
            match value {
                Value::Text(text) => escape_html(&mut self.out, text)?,
                Value::Url(url) => escape_href(&mut self.out, url)?,
            }
            self.out.write_str("\"")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_nested_tags() -> io::Result<()> {
        let mut doc = Doc::new();
        doc.tag("div", &[("class", Value::Text("container"))], |doc| {
            doc.tag("footer", &[], |doc| doc.text("hi"))
        })?;
        assert_eq!(
            r#"<div class="container"><footer>hi</footer></div>"#,
            doc.into_string()
        );
        Ok(())
    }

    #[test]
    fn test_self_closing_tag() -> io::Result<()> {
        let mut doc = Doc::new();
        doc.stag("meta", &[("charset", Value::Text("utf-8"))])?;
        assert_eq!(r#"<meta charset="utf-8" />"#, doc.into_string());
        Ok(())
    }

    #[test]
    fn test_text_is_escaped() -> io::Result<()> {
        let mut doc = Doc::new();
        doc.text("fish & <chips>")?;
        assert_eq!("fish &amp; &lt;chips&gt;", doc.into_string());
        Ok(())
    }

    #[test]
    fn test_attribute_quotes_are_escaped() -> io::Result<()> {
        let mut doc = Doc::new();
        doc.stag("img", &[("alt", Value::Text(r#"say "cheese""#))])?;
        assert_eq!(r#"<img alt="say &quot;cheese&quot;" />"#, doc.into_string());
        Ok(())
    }

    #[test]
    fn test_url_attribute_is_percent_encoded() -> io::Result<()> {
        let mut doc = Doc::new();
        doc.stag("img", &[("src", Value::Url("images/my photo.jpg"))])?;
        assert_eq!(r#"<img src="images/my%20photo.jpg" />"#, doc.into_string());
        Ok(())
    }

    #[test]
    fn test_asis_is_verbatim() {
        let mut doc = Doc::new();
        doc.asis("<!DOCTYPE html>");
        assert_eq!("<!DOCTYPE html>", doc.into_string());
    }
}

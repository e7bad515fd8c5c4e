//! Renders the gallery document. Rendering is pure: it takes resolved
//! [`Card`]s and produces the page text, so every caption must be known
//! before a page can be built.

use crate::html::{Doc, Value};
use std::io;

/// The directory, relative to the page, from which images are linked. The
/// image tree is copied here at deploy time.
pub const IMAGES_DIRECTORY: &str = "images";

/// The default page title.
pub const DEFAULT_TITLE: &str = "Suns in the Corner of the Page";

/// The default external stylesheet. It is linked, never fetched.
pub const DEFAULT_STYLESHEET_URL: &str =
    "https://cdn.jsdelivr.net/npm/@picocss/pico@1/css/pico.min.css";

// Light blue background; images limited to 90% of the viewport height and
// centered; centered captions.
const INLINE_STYLE: &str = "
html, body {
    background-color: #e6f1ff;
}
body {
    margin: 0;
}
img {
    max-height: 90vh;
    display: block;
    margin-left: auto;
    margin-right: auto;
}
footer {
    text-align: center;
}
";

/// One image and its caption.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card<'a> {
    pub file_name: &'a str,
    pub caption: &'a str,
}

/// The whole gallery document.
pub struct Page<'a> {
    pub title: &'a str,
    pub stylesheet_url: &'a str,

    /// The cards in display order.
    pub cards: &'a [Card<'a>],
}

impl Page<'_> {
    /// Renders the page as an HTML5 document. The light theme is forced
    /// regardless of the viewer's preference.
    pub fn render(&self) -> io::Result<String> {
        let mut doc = Doc::new();
        doc.asis("<!DOCTYPE html>");
        doc.tag(
            "html",
            &[("data-theme", Value::Text("light")), ("lang", Value::Text("en"))],
            |doc| {
                doc.tag("head", &[], |doc| self.head(doc))?;
                doc.tag("body", &[], |doc| {
                    doc.tag("div", &[("class", Value::Text("container"))], |doc| {
                        self.cards.iter().try_for_each(|card| card.render(doc))
                    })
                })
            },
        )?;
        Ok(doc.into_string())
    }

    fn head(&self, doc: &mut Doc) -> io::Result<()> {
        doc.stag("meta", &[("charset", Value::Text("utf-8"))])?;
        doc.stag(
            "meta",
            &[
                ("name", Value::Text("viewport")),
                ("content", Value::Text("width=device-width, initial-scale=1")),
            ],
        )?;
        doc.stag(
            "link",
            &[
                ("rel", Value::Text("stylesheet")),
                ("href", Value::Url(self.stylesheet_url)),
            ],
        )?;
        doc.tag("style", &[], |doc| {
            doc.asis(INLINE_STYLE);
            Ok(())
        })?;
        doc.tag("title", &[], |doc| doc.text(self.title))
    }
}

impl Card<'_> {
    /// Renders the card as an `<article>`: the image, linked to itself in a
    /// new tab, above a `<footer>` holding the caption. The file name is the
    /// image's alt text.
    fn render(&self, doc: &mut Doc) -> io::Result<()> {
        let src = format!("{}/{}", IMAGES_DIRECTORY, encode_segment(self.file_name));
        doc.tag("article", &[], |doc| {
            doc.tag(
                "a",
                &[("href", Value::Url(&src)), ("target", Value::Text("_blank"))],
                |doc| {
                    doc.stag(
                        "img",
                        &[("src", Value::Url(&src)), ("alt", Value::Text(self.file_name))],
                    )
                },
            )?;
            doc.tag("footer", &[], |doc| doc.text(self.caption))
        })
    }
}

// `escape_href` leaves `%`, `#` and `?` alone since they're meaningful in a
// URL, but in a file name they're literal and must be percent-encoded.
fn encode_segment(file_name: &str) -> String {
    let mut out = String::with_capacity(file_name.len());
    for c in file_name.chars() {
        match c {
            '%' => out.push_str("%25"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            _ => out.push(c),
        }
    }
    out
}

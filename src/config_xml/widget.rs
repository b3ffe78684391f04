//! In-place editor for `config.xml` widget documents.
//!
//! Only the `id` and `version` attributes of the root `<widget>` tag and the
//! text of its `<name>` child are touched. Everything else, including
//! whitespace, comments and attribute order, is preserved byte for byte.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::traits::{ConfigDocument, ConfigDocumentError, ConfigDocumentParser, DocumentField};

static WIDGET_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<widget\b[^>]*>").expect("Invalid widget tag regex"));

// Group 1 is the text of `<name>..</name>`; absent for an empty `<name/>`.
static NAME_ELEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<name(?:\s[^>/]*)?(?:/>|>(.*?)</name\s*>)")
        .expect("Invalid name element regex")
});

static ID_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\sid\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("Invalid id attribute regex")
});

static VERSION_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\sversion\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("Invalid version attribute regex")
});

/// A parsed widget configuration document.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetDocument {
    text: String,
}

impl WidgetDocument {
    pub fn parse(text: &str) -> Result<Self, ConfigDocumentError> {
        if !WIDGET_OPEN.is_match(text) {
            return Err(ConfigDocumentError::Malformed(
                "missing <widget> root element".to_string(),
            ));
        }
        Ok(Self {
            text: text.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    fn widget_tag(&self) -> Result<Range<usize>, ConfigDocumentError> {
        WIDGET_OPEN
            .find(&self.text)
            .map(|m| m.range())
            .ok_or_else(|| ConfigDocumentError::Malformed("missing <widget> root element".to_string()))
    }

    fn attribute(&self, attr: &Regex) -> Option<String> {
        let tag = self.widget_tag().ok()?;
        let caps = attr.captures(&self.text[tag])?;
        quoted_value(&caps).map(|m| unescape(m.as_str()))
    }

    fn set_attribute(
        &mut self,
        attr: &Regex,
        name: &str,
        value: &str,
    ) -> Result<(), ConfigDocumentError> {
        let tag = self.widget_tag()?;
        let escaped = escape(value);

        let existing = attr
            .captures(&self.text[tag.clone()])
            .and_then(|caps| quoted_value(&caps).map(|m| m.range()));

        match existing {
            Some(range) => {
                let start = tag.start + range.start;
                let end = tag.start + range.end;
                self.text.replace_range(start..end, &escaped);
            }
            None => {
                let tag_text = &self.text[tag.clone()];
                let close = if tag_text.ends_with("/>") { 2 } else { 1 };
                let at = tag.end - close;
                self.text
                    .insert_str(at, &format!(" {}=\"{}\"", name, escaped));
            }
        }
        Ok(())
    }

    fn name(&self) -> Option<String> {
        let caps = NAME_ELEMENT.captures(&self.text)?;
        Some(
            caps.get(1)
                .map(|m| unescape(m.as_str().trim()))
                .unwrap_or_default(),
        )
    }

    fn set_name(&mut self, value: &str) -> Result<(), ConfigDocumentError> {
        let escaped = escape(value);

        let existing = NAME_ELEMENT.captures(&self.text).map(|caps| {
            let element = caps.get(0).map(|m| m.range()).unwrap_or_default();
            (element, caps.get(1).map(|m| m.range()))
        });
        match existing {
            Some((_, Some(text))) => {
                self.text.replace_range(text, &escaped);
                return Ok(());
            }
            Some((element, None)) => {
                let open = self.text[element.clone()]
                    .trim_end_matches("/>")
                    .trim_end()
                    .to_string();
                self.text
                    .replace_range(element, &format!("{}>{}</name>", open, escaped));
                return Ok(());
            }
            None => {}
        }

        let tag = self.widget_tag()?;
        if self.text[tag.clone()].ends_with("/>") {
            return Err(ConfigDocumentError::MissingField(DocumentField::Name));
        }
        self.text
            .insert_str(tag.end, &format!("\n    <name>{}</name>", escaped));
        Ok(())
    }
}

fn quoted_value<'t>(caps: &Captures<'t>) -> Option<regex::Match<'t>> {
    caps.get(1).or_else(|| caps.get(2))
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn unescape(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

impl ConfigDocument for WidgetDocument {
    fn get(&self, field: DocumentField) -> Option<String> {
        match field {
            DocumentField::Name => self.name(),
            DocumentField::BundleId => self.attribute(&ID_ATTR),
            DocumentField::Version => self.attribute(&VERSION_ATTR),
        }
    }

    fn set(&mut self, field: DocumentField, value: &str) -> Result<(), ConfigDocumentError> {
        match field {
            DocumentField::Name => self.set_name(value),
            DocumentField::BundleId => self.set_attribute(&ID_ATTR, "id", value),
            DocumentField::Version => self.set_attribute(&VERSION_ATTR, "version", value),
        }
    }

    fn serialize(&self) -> String {
        self.text.clone()
    }
}

/// Parser producing [`WidgetDocument`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct WidgetDocumentParser;

impl ConfigDocumentParser for WidgetDocumentParser {
    fn parse(&self, text: &str) -> Result<Box<dyn ConfigDocument>, ConfigDocumentError> {
        Ok(Box::new(WidgetDocument::parse(text)?))
    }
}

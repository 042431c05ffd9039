//! Structural element matching over a parsed page.
//!
//! The admin console names its inputs with short generated identifiers that
//! change between firmware revisions, so nothing here looks for a literal
//! field name. Elements are selected by tag, `type`, the shape of their
//! `value` attribute and, for checkboxes, the text that immediately follows
//! them. Matches are always returned in document order.

use scraper::{ElementRef, Html};

/// A parsed admin page.
pub struct PageDocument {
    html: Html,
}

impl PageDocument {
    pub fn parse(body: &[u8]) -> Self {
        let text = String::from_utf8_lossy(body);
        PageDocument {
            html: Html::parse_document(&text),
        }
    }

    /// All elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.html.tree.root().descendants().filter_map(ElementRef::wrap)
    }

    pub fn find<'a>(&'a self, pattern: ElementPattern<'a>) -> impl Iterator<Item = ElementRef<'a>> {
        self.elements().filter(move |el| pattern.matches(el))
    }

    /// Field names of every element matching `pattern`, in document order.
    pub fn field_names(&self, pattern: ElementPattern<'_>) -> Vec<String> {
        self.find(pattern).filter_map(|el| field_name(&el)).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape<'a> {
    /// `value` attribute present and empty.
    Empty,
    Equals(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementPattern<'a> {
    pub tag: &'a str,
    pub input_type: Option<&'a str>,
    pub value: Option<ValueShape<'a>>,
    pub followed_by_text: Option<&'a str>,
}

impl<'a> ElementPattern<'a> {
    pub const fn tag(tag: &'a str) -> Self {
        ElementPattern {
            tag,
            input_type: None,
            value: None,
            followed_by_text: None,
        }
    }

    pub const fn input(input_type: &'a str) -> Self {
        ElementPattern {
            tag: "input",
            input_type: Some(input_type),
            value: None,
            followed_by_text: None,
        }
    }

    pub const fn with_value(mut self, value: ValueShape<'a>) -> Self {
        self.value = Some(value);
        self
    }

    /// Require the element's next sibling to be a text node containing `text`.
    pub const fn followed_by(mut self, text: &'a str) -> Self {
        self.followed_by_text = Some(text);
        self
    }

    pub fn matches(&self, el: &ElementRef<'_>) -> bool {
        let element = el.value();
        if !element.name().eq_ignore_ascii_case(self.tag) {
            return false;
        }

        if let Some(expected) = self.input_type {
            match element.attr("type") {
                Some(actual) if actual.trim().eq_ignore_ascii_case(expected) => {}
                _ => return false,
            }
        }

        match (self.value, element.attr("value")) {
            (None, _) => {}
            (Some(ValueShape::Empty), Some(v)) if v.is_empty() => {}
            (Some(ValueShape::Equals(expected)), Some(v)) if v == expected => {}
            _ => return false,
        }

        if let Some(needle) = self.followed_by_text {
            let follows = el
                .next_sibling()
                .and_then(|node| node.value().as_text().map(|t| t.contains(needle)))
                .unwrap_or(false);
            if !follows {
                return false;
            }
        }

        // Without a name or id there is nothing we could submit under.
        field_name(el).is_some()
    }
}

/// The name an element is submitted under: `name`, falling back to `id`.
///
/// The console normally sets both to the same value; attribute order in the
/// markup is irrelevant once parsed.
pub fn field_name(el: &ElementRef<'_>) -> Option<String> {
    let element = el.value();
    element
        .attr("name")
        .filter(|n| !n.is_empty())
        .or_else(|| element.attr("id").filter(|n| !n.is_empty()))
        .map(str::to_string)
}

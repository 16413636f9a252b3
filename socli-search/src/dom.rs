//! Narrow document-query boundary over `scraper`.
//!
//! Extraction code only ever needs three things from a page: find elements
//! by selector, read their text, read an attribute. Keeping the surface this
//! small means the rest of the crate never touches the parser directly.

use scraper::{ElementRef, Html, Node, Selector};

pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(raw: &str) -> Self {
        Self {
            html: Html::parse_document(raw),
        }
    }

    pub fn find_all(&self, selector: &Selector) -> Vec<Element<'_>> {
        self.html.select(selector).map(Element).collect()
    }

    pub fn find_first(&self, selector: &Selector) -> Option<Element<'_>> {
        self.html.select(selector).next().map(Element)
    }
}

#[derive(Clone, Copy)]
pub struct Element<'a>(ElementRef<'a>);

impl<'a> Element<'a> {
    pub fn find_all(&self, selector: &Selector) -> Vec<Element<'a>> {
        self.0.select(selector).map(Element).collect()
    }

    pub fn find_first(&self, selector: &Selector) -> Option<Element<'a>> {
        self.0.select(selector).next().map(Element)
    }

    /// All descendant text, concatenated as it appears.
    pub fn text(&self) -> String {
        self.0.text().collect()
    }

    /// Descendant text with whitespace runs collapsed to single spaces.
    pub fn clean_text(&self) -> String {
        collapse_whitespace(&self.text())
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.0.value().attr(name)
    }

    /// Descendant text where each hyperlink reads `"<text> [<href>]"`, so
    /// link destinations survive the conversion to plain text.
    pub fn text_with_links(&self) -> String {
        let mut out = String::new();
        push_linked_text(self.0, &mut out);
        out
    }
}

fn push_linked_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                match (el.name(), el.attr("href")) {
                    ("a", Some(href)) => {
                        let label: String = child_el.text().collect();
                        out.push_str(&format!("{label} [{href}]"));
                    }
                    _ => push_linked_text(child_el, out),
                }
            }
            _ => {}
        }
    }
}

pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

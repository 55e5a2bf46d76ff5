//! Small helpers over `scraper` used by every page parser.

use scraper::{CaseSensitivity, ElementRef, Selector};
use std::str::FromStr;

use crate::errors::ExtractionError;

type Result<T> = std::result::Result<T, ExtractionError>;

/// Parses a CSS selector, reporting the offending source on failure.
pub(crate) fn selector(source: &str) -> Result<Selector> {
    Selector::parse(source).map_err(|_| ExtractionError::Selector {
        selector: source.to_string(),
    })
}

/// First descendant of `scope` matching `source`, or a `Missing` error.
pub(crate) fn select_first<'a>(scope: ElementRef<'a>, source: &str) -> Result<ElementRef<'a>> {
    let sel = selector(source)?;
    let found = scope.select(&sel).next();
    found.ok_or_else(|| ExtractionError::missing(source))
}

/// All descendants of `scope` matching `source`, in document order.
pub(crate) fn select_all<'a>(scope: ElementRef<'a>, source: &str) -> Result<Vec<ElementRef<'a>>> {
    let sel = selector(source)?;
    Ok(scope.select(&sel).collect())
}

/// Whitespace-normalized text of an element.
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first match of `source` under `scope`.
pub(crate) fn select_text(scope: ElementRef<'_>, source: &str) -> Result<String> {
    select_first(scope, source).map(text_of)
}

/// Whether the element carries `class`.
pub(crate) fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element
        .value()
        .has_class(class, CaseSensitivity::CaseSensitive)
}

/// Attribute value, or a `Missing` error naming `context`.
pub(crate) fn attr<'a>(element: ElementRef<'a>, name: &str, context: &str) -> Result<&'a str> {
    element
        .value()
        .attr(name)
        .ok_or_else(|| ExtractionError::missing(format!("{context} [{name}]")))
}

/// Element children, skipping text and comment nodes.
pub(crate) fn child_elements(element: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    element.children().filter_map(ElementRef::wrap)
}

/// Next element sibling, skipping text nodes.
pub(crate) fn next_element_sibling(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

/// Parses trimmed text as a number, reporting `context` on failure.
pub(crate) fn parse_number<T: FromStr>(text: &str, context: &str) -> Result<T> {
    let trimmed = text.trim();
    trimmed
        .parse()
        .map_err(|_| ExtractionError::invalid(context, trimmed))
}

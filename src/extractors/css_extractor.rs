//! Selector cascades
//!
//! A cascade is an ordered table of [`Probe`]s. Each probe pairs a CSS
//! selector with an [`Accessor`] saying what to read from a matched element.
//! [`first_match`] walks the table and returns the first value accepted by
//! the caller, so "try these selectors in order" stays declarative.

use scraper::ElementRef;

use crate::page::{element_text, Page};

/// What to read from a matched element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessor {
    /// Collapsed text content.
    Text,
    /// An attribute value.
    Attr(&'static str),
}

impl Accessor {
    /// Read this accessor from `element`; empty values are absent.
    pub fn read(self, element: ElementRef<'_>) -> Option<String> {
        let value = match self {
            Accessor::Text => element_text(element),
            Accessor::Attr(name) => element.value().attr(name).map(String::from),
        };

        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// One step of a selector cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    pub selector: &'static str,
    pub accessor: Accessor,
}

impl Probe {
    pub const fn text(selector: &'static str) -> Probe {
        Probe {
            selector,
            accessor: Accessor::Text,
        }
    }

    pub const fn attr(selector: &'static str, name: &'static str) -> Probe {
        Probe {
            selector,
            accessor: Accessor::Attr(name),
        }
    }
}

/// Evaluate `probes` in order and return the first value `accept` keeps.
///
/// Within one probe, matched elements are tried in document order.
pub fn first_match<T>(
    page: &Page,
    probes: &[Probe],
    mut accept: impl FnMut(String) -> Option<T>,
) -> Option<T> {
    probes.iter().find_map(|probe| {
        page.select_all(probe.selector)
            .into_iter()
            .filter_map(|el| probe.accessor.read(el))
            .find_map(&mut accept)
    })
}

/// First non-empty value produced by `probes`.
pub fn first_text(page: &Page, probes: &[Probe]) -> Option<String> {
    first_match(page, probes, Some)
}

//! Data-driven selector fallback chains.
//!
//! Each retailer describes a field as an ordered table of [`FieldRule`]s. The
//! table is compiled once when the parser is built; at extraction time the
//! first rule producing a non-empty value wins. Adding a retailer means adding
//! tables, not control flow.

use scraper::{ElementRef, Html, Selector};

/// What to read from an element matched by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Extract {
    /// All descendant text, whitespace collapsed.
    Text,
    /// The named attribute, trimmed.
    Attr(&'static str),
}

/// One step in a field's fallback chain.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldRule {
    pub selector: &'static str,
    pub extract: Extract,
}

impl FieldRule {
    pub(crate) const fn text(selector: &'static str) -> Self {
        Self {
            selector,
            extract: Extract::Text,
        }
    }

    pub(crate) const fn attr(selector: &'static str, name: &'static str) -> Self {
        Self {
            selector,
            extract: Extract::Attr(name),
        }
    }
}

/// Compiles selector strings, skipping any that fail to parse.
///
/// The tables are static, so a bad entry is a programming error; it is logged
/// and dropped rather than taking the whole parser down.
fn compile(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(compiled) => Some(compiled),
        Err(e) => {
            tracing::error!(selector, error = %e, "invalid CSS selector in retailer table; rule skipped");
            None
        }
    }
}

/// A compiled fallback chain for one field.
#[derive(Debug)]
pub(crate) struct FieldChain {
    rules: Vec<(Selector, Extract)>,
}

impl FieldChain {
    pub(crate) fn compile(rules: &[FieldRule]) -> Self {
        let rules = rules
            .iter()
            .filter_map(|rule| compile(rule.selector).map(|sel| (sel, rule.extract)))
            .collect();
        Self { rules }
    }

    /// Returns the first non-empty value the chain can read inside `card`.
    pub(crate) fn first(&self, card: ElementRef<'_>) -> Option<String> {
        self.rules.iter().find_map(|(selector, extract)| {
            card.select(selector)
                .find_map(|element| read(element, *extract))
        })
    }
}

fn read(element: ElementRef<'_>, extract: Extract) -> Option<String> {
    let value = match extract {
        Extract::Text => collapse_whitespace(&element.text().collect::<String>()),
        Extract::Attr(name) => element.value().attr(name)?.trim().to_owned(),
    };
    (!value.is_empty()).then_some(value)
}

/// Joins all whitespace runs (including non-breaking spaces) into single spaces.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Ordered card-container selectors. The first selector that matches at least
/// one element on the page decides the card set.
#[derive(Debug)]
pub(crate) struct CardSelectors {
    selectors: Vec<Selector>,
}

impl CardSelectors {
    pub(crate) fn compile(selectors: &[&'static str]) -> Self {
        Self {
            selectors: selectors.iter().filter_map(|s| compile(s)).collect(),
        }
    }

    /// Card elements in document order.
    pub(crate) fn select<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        self.selectors
            .iter()
            .map(|selector| document.select(selector).collect::<Vec<_>>())
            .find(|cards| !cards.is_empty())
            .unwrap_or_default()
    }
}

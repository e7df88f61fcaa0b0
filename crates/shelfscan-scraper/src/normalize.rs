//! Field normalization shared by every retailer parser.
//!
//! Inputs are raw strings lifted out of card markup; outputs are the
//! canonical forms stored on [`shelfscan_core::ProductRecord`]. Nothing here
//! fails: unusable input becomes `None`.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;

static LEADING_CURRENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([^\d\s.,\-]+)").expect("valid currency prefix regex"));
static TRAILING_CURRENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^\d\s.,\-]+)\s*$").expect("valid currency suffix regex"));
static RATING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:[.,]\d+)?").expect("valid rating regex"));

/// Normalizes a single combined price string to a `.`-separated decimal.
///
/// Currency glyphs, letters and whitespace are dropped. The decimal separator
/// is inferred: when both `,` and `.` occur the last one is the decimal
/// separator; when only one kind occurs once and is followed by one or two
/// digits it is the decimal separator; otherwise it is a thousands separator.
///
/// `"$1,299.00"` → `"1299.00"`, `"1.299,00 €"` → `"1299.00"`,
/// `"129,50 kr"` → `"129.50"`, `"2 999 kr"` → `"2999"`, `"$.99"` → `"0.99"`.
#[must_use]
pub fn normalize_price(raw: &str) -> Option<String> {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    let kept = kept.trim_end_matches(|c| c == '.' || c == ',');

    if !kept.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    // A bare fraction: `.99` and `,99` mean `0.99`.
    let body = kept.trim_start_matches(|c| c == '.' || c == ',');
    if body.len() < kept.len() && body.bytes().all(|b| b.is_ascii_digit()) {
        return Some(format!("0.{body}"));
    }
    let kept = body;

    let last_comma = kept.rfind(',');
    let last_dot = kept.rfind('.');

    let normalized = match (last_comma, last_dot) {
        (Some(c), Some(d)) => {
            let (int_part, frac_part) = kept.split_at(c.max(d));
            format!("{}.{}", digits_only(int_part), digits_only(&frac_part[1..]))
        }
        (Some(pos), None) => resolve_single_separator(kept, ',', pos),
        (None, Some(pos)) => resolve_single_separator(kept, '.', pos),
        (None, None) => kept.to_owned(),
    };

    Some(normalized)
}

fn resolve_single_separator(kept: &str, sep: char, last_pos: usize) -> String {
    let occurrences = kept.matches(sep).count();
    let frac_len = kept.len() - last_pos - 1;
    if occurrences == 1 && (1..=2).contains(&frac_len) {
        let (int_part, frac_part) = kept.split_at(last_pos);
        format!("{int_part}.{}", &frac_part[1..])
    } else {
        digits_only(kept)
    }
}

/// Combines split whole/fraction price parts (`"19"` + `"99"` → `"19.99"`).
///
/// Whole parts often carry a trailing decimal glyph or thousands separators
/// (`"1,299."`); only digits are kept. Returns `None` unless both parts have
/// digits.
#[must_use]
pub fn join_split_price(whole: &str, fraction: &str) -> Option<String> {
    let whole = digits_only(whole);
    let fraction = digits_only(fraction);
    if whole.is_empty() || fraction.is_empty() {
        return None;
    }
    Some(format!("{whole}.{fraction}"))
}

/// Pulls a currency marker off a combined price string: the non-numeric prefix
/// (`"$19.99"` → `"$"`), or failing that the suffix (`"19,99 €"` → `"€"`).
#[must_use]
pub fn currency_from_price_text(text: &str) -> Option<String> {
    LEADING_CURRENCY_RE
        .captures(text)
        .or_else(|| TRAILING_CURRENCY_RE.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_owned())
        .filter(|s| !s.is_empty())
}

/// Numeric portion of a rating label with `.` as decimal separator.
///
/// `"4.5 out of 5 stars"` → `"4.5"`, `"4,5 von 5 Sternen"` → `"4.5"`.
#[must_use]
pub fn normalize_rating(text: &str) -> Option<String> {
    RATING_RE
        .find(text)
        .map(|m| m.as_str().replace(',', "."))
}

/// Review counts keep digits only (`"(12,034)"` → `"12034"`).
#[must_use]
pub fn normalize_count(text: &str) -> Option<String> {
    let digits = digits_only(text);
    (!digits.is_empty()).then_some(digits)
}

/// Resolves `href` against the retailer base URL.
///
/// A base without a scheme is treated as `https://` (`"amazon.de"` →
/// `"https://amazon.de"`). Fragment-only, `javascript:`, `mailto:` and
/// `data:` references, and anything that does not resolve to an http(s) URL,
/// return `None` so a relative path can never leak into a record.
#[must_use]
pub fn resolve_url(base_url: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let base = if base_url.starts_with("http://") || base_url.starts_with("https://") {
        base_url.to_owned()
    } else {
        format!("https://{}", base_url.trim_start_matches('/'))
    };

    let base = Url::parse(&base)
        .inspect_err(|e| tracing::debug!(base_url, error = %e, "base URL does not parse"))
        .ok()?;
    let resolved = base.join(href).ok()?;

    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}

fn digits_only(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;

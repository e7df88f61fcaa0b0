//! Runs a retailer parser over every fetched page.
//!
//! Output order is page order, then card order within each page. Pages are
//! independent: no state carries from one page to the next.

use shelfscan_core::{ProductRecord, RawPage};

use crate::parsers::RetailerParser;

/// Counts gathered while extracting a batch of pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    pub pages: usize,
    /// Pages that produced no product at all (blocked, captcha, end of results).
    pub empty_pages: usize,
    pub records: usize,
}

/// Extracts products from `pages` in slice order.
#[must_use]
pub fn extract_pages(
    parser: &dyn RetailerParser,
    base_url: &str,
    pages: &[RawPage],
) -> Vec<ProductRecord> {
    extract_pages_with_summary(parser, base_url, pages).0
}

/// Like [`extract_pages`], and also reports how many pages came back empty.
#[must_use]
pub fn extract_pages_with_summary(
    parser: &dyn RetailerParser,
    base_url: &str,
    pages: &[RawPage],
) -> (Vec<ProductRecord>, ExtractionSummary) {
    let mut records = Vec::new();
    let mut summary = ExtractionSummary {
        pages: pages.len(),
        ..ExtractionSummary::default()
    };

    for page in pages {
        let page_records = parser.parse_products(&page.html, base_url);
        log_page(parser, page, page_records.len());
        if page_records.is_empty() {
            summary.empty_pages += 1;
        }
        records.extend(page_records);
    }

    summary.records = records.len();
    (records, summary)
}

/// Parses pages on scoped threads, at most one per available core; each
/// thread takes a contiguous run of pages. The result is identical to
/// [`extract_pages`]; only wall-clock time differs.
#[must_use]
pub fn extract_pages_parallel(
    parser: &dyn RetailerParser,
    base_url: &str,
    pages: &[RawPage],
) -> Vec<ProductRecord> {
    let workers = std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);
    extract_pages_in_chunks(parser, base_url, pages, workers)
}

fn extract_pages_in_chunks(
    parser: &dyn RetailerParser,
    base_url: &str,
    pages: &[RawPage],
    workers: usize,
) -> Vec<ProductRecord> {
    if pages.len() < 2 || workers < 2 {
        return extract_pages(parser, base_url, pages);
    }

    let chunk_size = pages.len().div_ceil(workers);
    std::thread::scope(|scope| {
        let handles: Vec<_> = pages
            .chunks(chunk_size)
            .map(|chunk| {
                let handle = scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|page| parser.parse_products(&page.html, base_url))
                        .collect::<Vec<_>>()
                });
                (handle, chunk)
            })
            .collect();

        let mut records = Vec::new();
        for (handle, chunk) in handles {
            match handle.join() {
                Ok(per_page) => {
                    for (page, page_records) in chunk.iter().zip(per_page) {
                        log_page(parser, page, page_records.len());
                        records.extend(page_records);
                    }
                }
                Err(_) => {
                    let first = chunk.first().map_or(0, |p| p.page_number);
                    tracing::error!(
                        first_page = first,
                        pages = chunk.len(),
                        "parser panicked; pages skipped"
                    );
                }
            }
        }
        records
    })
}

fn log_page(parser: &dyn RetailerParser, page: &RawPage, count: usize) {
    if count == 0 {
        tracing::warn!(
            family = %parser.family(),
            page = page.page_number,
            url = page.source_url.as_deref().unwrap_or(""),
            "no products found on page"
        );
    } else {
        tracing::debug!(
            family = %parser.family(),
            page = page.page_number,
            records = count,
            "extracted page"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::AmazonParser;

    fn amazon_card(title: &str, asin: &str) -> String {
        format!(
            r#"<div data-component-type="s-search-result"><h2><a href="/dp/{asin}"><span>{title}</span></a></h2></div>"#
        )
    }

    fn pages() -> Vec<RawPage> {
        vec![
            RawPage::new(1, [amazon_card("A", "1"), amazon_card("B", "2")].concat()),
            RawPage::new(2, "<html><body>Sorry, we just need to make sure you're not a robot</body></html>"),
            RawPage::new(3, [amazon_card("C", "3"), amazon_card("A", "1")].concat()),
        ]
    }

    fn titles(records: &[ProductRecord]) -> Vec<&str> {
        records.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn preserves_page_then_card_order() {
        let parser = AmazonParser::new();
        let records = extract_pages(&parser, "amazon.com", &pages());
        assert_eq!(titles(&records), ["A", "B", "C", "A"]);
    }

    #[test]
    fn summary_counts_empty_pages() {
        let parser = AmazonParser::new();
        let (records, summary) = extract_pages_with_summary(&parser, "amazon.com", &pages());
        assert_eq!(records.len(), 4);
        assert_eq!(
            summary,
            ExtractionSummary {
                pages: 3,
                empty_pages: 1,
                records: 4,
            }
        );
    }

    #[test]
    fn no_pages_yields_nothing() {
        let parser = AmazonParser::new();
        let (records, summary) = extract_pages_with_summary(&parser, "amazon.com", &[]);
        assert!(records.is_empty());
        assert_eq!(summary, ExtractionSummary::default());
    }

    #[test]
    fn chunked_extraction_keeps_page_order_for_any_worker_count() {
        let parser = AmazonParser::new();
        let pages: Vec<RawPage> = (1..=7)
            .map(|n| RawPage::new(n, amazon_card(&format!("T{n}"), &n.to_string())))
            .collect();
        let expected = extract_pages(&parser, "amazon.com", &pages);

        for workers in [1, 2, 3, 4, 16] {
            assert_eq!(
                extract_pages_in_chunks(&parser, "amazon.com", &pages, workers),
                expected,
                "workers = {workers}"
            );
        }
    }

    #[test]
    fn parallel_matches_sequential() {
        let parser = AmazonParser::new();
        let pages = pages();
        assert_eq!(
            extract_pages_parallel(&parser, "amazon.com", &pages),
            extract_pages(&parser, "amazon.com", &pages)
        );
    }
}

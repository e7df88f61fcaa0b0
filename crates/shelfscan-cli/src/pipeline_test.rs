use shelfscan_core::RawPage;
use shelfscan_export::ExportTable;

use super::*;

/// Serves a fixed list of pages.
struct StaticSource {
    pages: Vec<RawPage>,
}

impl StaticSource {
    fn new(pages: Vec<RawPage>) -> Self {
        Self { pages }
    }
}

impl PageSource for StaticSource {
    async fn fetch_pages(&self, request: &FetchRequest) -> Result<Vec<RawPage>, ScraperError> {
        let limit = usize::try_from(request.max_pages).unwrap_or(usize::MAX);
        Ok(self.pages.iter().take(limit).cloned().collect())
    }
}

struct FailingSource;

impl PageSource for FailingSource {
    async fn fetch_pages(&self, _request: &FetchRequest) -> Result<Vec<RawPage>, ScraperError> {
        Err(ScraperError::FeedIo {
            path: "scraped_data.json".to_owned(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        })
    }
}

/// Keeps written tables in memory.
#[derive(Default)]
struct MemorySink {
    tables: Vec<ExportTable>,
}

impl TableSink for MemorySink {
    fn write_table(&mut self, table: &ExportTable) -> Result<PathBuf, ExportError> {
        self.tables.push(table.clone());
        Ok(PathBuf::from("memory.csv"))
    }
}

fn amazon_card(asin: &str, title: &str, whole: &str, fraction: &str) -> String {
    format!(
        r#"<div data-component-type="s-search-result">
             <h2><a href="/dp/{asin}"><span>{title}</span></a></h2>
             <span class="a-price"><span class="a-price-symbol">€</span>
               <span class="a-price-whole">{whole}</span><span class="a-price-fraction">{fraction}</span>
             </span>
           </div>"#
    )
}

fn untitled_card() -> String {
    r#"<div data-component-type="s-search-result"><a href="/dp/GHOST"></a></div>"#.to_owned()
}

fn run_config(max_pages: u32) -> RunConfig {
    RunConfig::new("Philips", "Baby Bottle", None, Some(max_pages), "memory.csv").unwrap()
}

fn capture_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
}

#[tokio::test]
async fn amazon_run_exports_three_unique_records() {
    let pages = vec![
        RawPage::new(
            1,
            [
                amazon_card("A1", "Avent Natural 260 ml", "19", "99"),
                untitled_card(),
                amazon_card("A2", "Avent Anti-Colic 125 ml", "12", "49"),
            ]
            .concat(),
        ),
        RawPage::new(2, "<html><body>no results</body></html>"),
        RawPage::new(3, amazon_card("A3", "Avent Glass 240 ml", "24", "00")),
    ];
    let source = StaticSource::new(pages);
    let mut sink = MemorySink::default();

    let pipeline = Pipeline::new("amazon.de", run_config(3))
        .unwrap()
        .with_capture_date(capture_date());
    let outcome = pipeline.run(&source, &mut sink).await.unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Exported(RunReport {
            pages: 3,
            extracted: 3,
            unique: 3,
            columns: 13,
            destination: PathBuf::from("memory.csv"),
        })
    );

    let table = &sink.tables[0];
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.column_count(), 13);
    assert_eq!(table.cell(0, "Title"), Some("Avent Natural 260 ml"));
    assert_eq!(table.cell(0, "Price"), Some("19.99"));
    assert_eq!(table.cell(0, "Currency"), Some("€"));
    assert_eq!(table.cell(0, "Link"), Some("https://amazon.de/dp/A1"));
    assert_eq!(table.cell(2, "Title"), Some("Avent Glass 240 ml"));
    assert_eq!(table.cell(2, "Market"), Some("Germany"));
    assert_eq!(table.cell(2, "Date"), Some("2024-03-07"));
    assert_eq!(table.cell(2, "SearchTerm"), Some("Philips Baby Bottle"));
}

#[tokio::test]
async fn duplicate_links_across_pages_keep_the_first() {
    let pages = vec![
        RawPage::new(1, amazon_card("A1", "First listing", "10", "00")),
        RawPage::new(2, amazon_card("A1", "Same product again", "11", "00")),
    ];
    let source = StaticSource::new(pages);
    let mut sink = MemorySink::default();

    let outcome = Pipeline::new("amazon.com", run_config(2))
        .unwrap()
        .run(&source, &mut sink)
        .await
        .unwrap();

    let RunOutcome::Exported(report) = outcome else {
        panic!("expected an export");
    };
    assert_eq!(report.extracted, 2);
    assert_eq!(report.unique, 1);
    assert_eq!(sink.tables[0].cell(0, "Title"), Some("First listing"));
}

#[tokio::test]
async fn title_dedup_key_is_honoured() {
    let pages = vec![RawPage::new(
        1,
        [
            amazon_card("A1", "Avent Bottle", "10", "00"),
            amazon_card("A2", "avent  bottle", "10", "00"),
        ]
        .concat(),
    )];
    let source = StaticSource::new(pages);
    let mut sink = MemorySink::default();

    let outcome = Pipeline::new("amazon.com", run_config(1))
        .unwrap()
        .with_dedup_key(DedupKey::Title)
        .run(&source, &mut sink)
        .await
        .unwrap();

    assert!(matches!(outcome, RunOutcome::Exported(RunReport { unique: 1, .. })));
}

#[tokio::test]
async fn parallel_extraction_gives_the_same_table() {
    let pages = vec![
        RawPage::new(1, amazon_card("A1", "One", "1", "00")),
        RawPage::new(2, amazon_card("A2", "Two", "2", "00")),
        RawPage::new(3, amazon_card("A3", "Three", "3", "00")),
    ];
    let source = StaticSource::new(pages);

    let mut sequential = MemorySink::default();
    let mut parallel = MemorySink::default();
    let base = Pipeline::new("amazon.de", run_config(3))
        .unwrap()
        .with_capture_date(capture_date());
    base.run(&source, &mut sequential).await.unwrap();
    let base = base.with_parallel_extraction(true);
    base.run(&source, &mut parallel).await.unwrap();

    assert_eq!(sequential.tables, parallel.tables);
}

#[tokio::test]
async fn empty_fetch_is_no_data_and_skips_export() {
    let source = StaticSource::new(Vec::new());
    let mut sink = MemorySink::default();

    let outcome = Pipeline::new("meds.se", run_config(2))
        .unwrap()
        .run(&source, &mut sink)
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::NoData);
    assert!(sink.tables.is_empty());
}

#[tokio::test]
async fn pages_without_products_still_export_a_header() {
    let source = StaticSource::new(vec![RawPage::new(1, "<p>captcha</p>")]);
    let mut sink = MemorySink::default();

    let outcome = Pipeline::new("apotea.se", run_config(1))
        .unwrap()
        .run(&source, &mut sink)
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        RunOutcome::Exported(RunReport {
            extracted: 0,
            unique: 0,
            columns: 12,
            ..
        })
    ));
    assert_eq!(sink.tables[0].row_count(), 0);
}

#[test]
fn unsupported_retailer_is_a_config_error() {
    let result = Pipeline::new("ebay.com", run_config(1));

    assert!(matches!(
        result,
        Err(PipelineError::Config(ConfigError::UnsupportedRetailer(ref id))) if id == "ebay.com"
    ));
}

#[tokio::test]
async fn fetch_error_propagates() {
    let mut sink = MemorySink::default();
    let result = Pipeline::new("amazon.de", run_config(1))
        .unwrap()
        .run(&FailingSource, &mut sink)
        .await;
    assert!(matches!(result, Err(PipelineError::Fetch(ScraperError::FeedIo { .. }))));
    assert!(sink.tables.is_empty());
}

#[test]
fn profile_is_resolved_once_at_construction() {
    let pipeline = Pipeline::new("https://www.Amazon.de/", run_config(1)).unwrap();
    assert_eq!(pipeline.profile().market_country, "Germany");
    assert_eq!(pipeline.profile().base_url, "amazon.de");
}

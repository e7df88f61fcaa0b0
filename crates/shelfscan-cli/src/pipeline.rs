//! Run orchestration: `Fetch → Extract → Deduplicate → Export`.
//!
//! The retailer is resolved once in [`Pipeline::new`], so an unsupported
//! identifier fails before any page is fetched. Everything after the fetch is
//! synchronous and free of side effects until the sink writes.

use std::path::PathBuf;

use chrono::NaiveDate;
use shelfscan_core::{ConfigError, RetailerProfile, RunConfig};
use shelfscan_export::{format_table, ExportError, RunMetadata, TableSink};
use shelfscan_scraper::{
    dedup_by_key, extract_pages_parallel, extract_pages_with_summary, parser_for, DedupKey,
    FetchRequest, PageSource, RetailerParser, ScraperError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum PipelineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("fetch failed: {0}")]
    Fetch(#[from] ScraperError),

    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

/// Counts and destination of a run that produced an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RunReport {
    pub pages: usize,
    pub extracted: usize,
    pub unique: usize,
    pub columns: usize,
    pub destination: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RunOutcome {
    /// The source returned no pages; nothing was exported.
    NoData,
    Exported(RunReport),
}

pub(crate) struct Pipeline {
    profile: RetailerProfile,
    run: RunConfig,
    parser: Box<dyn RetailerParser>,
    dedup_key: DedupKey,
    capture_date: NaiveDate,
    parallel: bool,
}

impl Pipeline {
    /// Binds `retailer` to its profile and parser.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Config`] if `retailer` is not supported.
    pub(crate) fn new(retailer: &str, run: RunConfig) -> Result<Self, PipelineError> {
        let profile = RetailerProfile::resolve(retailer)?;
        let parser = parser_for(profile.family);
        Ok(Self {
            profile,
            run,
            parser,
            dedup_key: DedupKey::default(),
            capture_date: chrono::Local::now().date_naive(),
            parallel: false,
        })
    }

    #[must_use]
    pub(crate) fn with_dedup_key(mut self, key: DedupKey) -> Self {
        self.dedup_key = key;
        self
    }

    #[must_use]
    pub(crate) fn with_capture_date(mut self, date: NaiveDate) -> Self {
        self.capture_date = date;
        self
    }

    /// Parse pages on scoped threads instead of one after another.
    #[must_use]
    pub(crate) fn with_parallel_extraction(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub(crate) fn profile(&self) -> &RetailerProfile {
        &self.profile
    }

    /// # Errors
    ///
    /// Returns [`PipelineError::Fetch`] when the source fails as a whole and
    /// [`PipelineError::Export`] when the sink cannot write.
    pub(crate) async fn run<S, K>(&self, source: &S, sink: &mut K) -> Result<RunOutcome, PipelineError>
    where
        S: PageSource,
        K: TableSink,
    {
        let retailer = self.profile.retailer;
        let request = FetchRequest {
            profile: self.profile.clone(),
            search_term: self.run.search_term.clone(),
            max_pages: self.run.max_pages,
        };

        tracing::info!(
            %retailer,
            search_term = %request.search_term,
            max_pages = request.max_pages,
            "fetching pages"
        );
        let pages = source.fetch_pages(&request).await?;
        if pages.is_empty() {
            tracing::warn!(%retailer, "no pages fetched; nothing to export");
            return Ok(RunOutcome::NoData);
        }

        let base_url = self.profile.base_url.as_str();
        let records = if self.parallel {
            extract_pages_parallel(self.parser.as_ref(), base_url, &pages)
        } else {
            let (records, summary) =
                extract_pages_with_summary(self.parser.as_ref(), base_url, &pages);
            if summary.empty_pages > 0 {
                tracing::warn!(
                    %retailer,
                    empty_pages = summary.empty_pages,
                    pages = summary.pages,
                    "some pages had no products"
                );
            }
            records
        };
        let extracted = records.len();

        let unique_records = dedup_by_key(records, self.dedup_key.key_fn());
        tracing::info!(
            %retailer,
            extracted,
            unique = unique_records.len(),
            dedup_key = %self.dedup_key,
            "extraction complete"
        );

        let metadata = RunMetadata::new(&self.profile, &self.run, self.capture_date);
        let table = format_table(&unique_records, self.parser.schema(), &metadata);
        let destination = sink.write_table(&table)?;

        Ok(RunOutcome::Exported(RunReport {
            pages: pages.len(),
            extracted,
            unique: unique_records.len(),
            columns: table.column_count(),
            destination,
        }))
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;

use std::path::PathBuf;

use crate::ConfigError;

/// Number of search-result pages fetched when the caller does not say.
pub const DEFAULT_MAX_PAGES: u32 = 2;

/// Parameters of a single scrape run. Built once at pipeline start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub brand: String,
    pub category: String,
    /// Query sent to the retailer. Defaults to `"{brand} {category}"`.
    pub search_term: String,
    pub max_pages: u32,
    pub output_path: PathBuf,
}

impl RunConfig {
    /// Builds a run configuration, deriving the search term from brand and
    /// category when `search_term` is absent or blank.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if `max_pages` is zero or the
    /// resulting search term is empty.
    pub fn new(
        brand: impl Into<String>,
        category: impl Into<String>,
        search_term: Option<String>,
        max_pages: Option<u32>,
        output_path: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let brand = brand.into().trim().to_owned();
        let category = category.into().trim().to_owned();

        let search_term = search_term
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| default_search_term(&brand, &category));

        if search_term.is_empty() {
            return Err(ConfigError::Validation(
                "search term is empty; provide a brand, a category, or an explicit search term"
                    .to_string(),
            ));
        }

        let max_pages = max_pages.unwrap_or(DEFAULT_MAX_PAGES);
        if max_pages == 0 {
            return Err(ConfigError::Validation(
                "max_pages must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            brand,
            category,
            search_term,
            max_pages,
            output_path: output_path.into(),
        })
    }
}

fn default_search_term(brand: &str, category: &str) -> String {
    format!("{brand} {category}").trim().to_owned()
}

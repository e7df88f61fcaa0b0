//! Column layout of an export: the retailer's product schema followed by the
//! run metadata columns, one row per record.

use chrono::NaiveDate;
use serde::Serialize;
use shelfscan_core::{ProductField, ProductRecord, RetailerProfile, RunConfig};

/// Metadata columns appended after the product fields, in order.
pub const METADATA_COLUMNS: [&str; 6] = [
    "Date",
    "Market",
    "Retailer",
    "Brand",
    "Category",
    "SearchTerm",
];

/// Values repeated on every row of one run's export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunMetadata {
    pub capture_date: NaiveDate,
    pub market: String,
    pub retailer: String,
    pub brand: String,
    pub category: String,
    pub search_term: String,
}

impl RunMetadata {
    #[must_use]
    pub fn new(profile: &RetailerProfile, run: &RunConfig, capture_date: NaiveDate) -> Self {
        Self {
            capture_date,
            market: profile.market_country.to_owned(),
            retailer: profile.retailer.to_string(),
            brand: run.brand.clone(),
            category: run.category.clone(),
            search_term: run.search_term.clone(),
        }
    }

    /// `YYYY-MM-DD`.
    #[must_use]
    pub fn date_string(&self) -> String {
        self.capture_date.format("%Y-%m-%d").to_string()
    }

    fn cells(&self) -> [String; 6] {
        [
            self.date_string(),
            self.market.clone(),
            self.retailer.clone(),
            self.brand.clone(),
            self.category.clone(),
            self.search_term.clone(),
        ]
    }
}

/// A rectangular table ready for a [`crate::TableSink`]. Every row has
/// exactly `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Cell at `row`, looked up by column header.
    #[must_use]
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(index).map(String::as_str)
    }
}

/// Lays `records` out under `schema` plus the metadata columns. Absent
/// optional fields become empty cells.
#[must_use]
pub fn format_table(
    records: &[ProductRecord],
    schema: &[ProductField],
    metadata: &RunMetadata,
) -> ExportTable {
    let columns = schema
        .iter()
        .map(|field| field.header().to_owned())
        .chain(METADATA_COLUMNS.iter().map(|&c| c.to_owned()))
        .collect();

    let meta = metadata.cells();
    let rows = records
        .iter()
        .map(|record| {
            schema
                .iter()
                .map(|&field| record.field(field).unwrap_or_default().to_owned())
                .chain(meta.iter().cloned())
                .collect::<Vec<String>>()
        })
        .collect();

    ExportTable { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfscan_core::RetailerId;

    const AMAZON_SCHEMA: &[ProductField] = &[
        ProductField::Title,
        ProductField::Price,
        ProductField::Currency,
        ProductField::Rating,
        ProductField::ReviewsCount,
        ProductField::PackSize,
        ProductField::Link,
    ];

    fn metadata() -> RunMetadata {
        let profile = RetailerProfile::for_retailer(RetailerId::AmazonDe);
        let run = RunConfig::new("Philips", "Baby Bottle", None, None, "out.csv").unwrap();
        RunMetadata::new(&profile, &run, NaiveDate::from_ymd_opt(2024, 3, 7).unwrap())
    }

    fn records() -> Vec<ProductRecord> {
        vec![
            ProductRecord {
                price: Some("19.99".to_owned()),
                currency: Some("€".to_owned()),
                link: Some("https://amazon.de/dp/1".to_owned()),
                ..ProductRecord::titled("One")
            },
            ProductRecord::titled("Two"),
            ProductRecord {
                rating: Some("4.5".to_owned()),
                ..ProductRecord::titled("Three")
            },
        ]
    }

    #[test]
    fn amazon_table_is_three_by_thirteen() {
        let table = format_table(&records(), AMAZON_SCHEMA, &metadata());
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 13);
        assert!(table.rows.iter().all(|row| row.len() == 13));
        assert_eq!(
            table.columns,
            [
                "Title", "Price", "Currency", "Rating", "ReviewsCount", "PackSize", "Link", "Date",
                "Market", "Retailer", "Brand", "Category", "SearchTerm",
            ]
        );
    }

    #[test]
    fn absent_fields_are_empty_cells() {
        let table = format_table(&records(), AMAZON_SCHEMA, &metadata());
        assert_eq!(table.cell(1, "Title"), Some("Two"));
        assert_eq!(table.cell(1, "Price"), Some(""));
        assert_eq!(table.cell(1, "Link"), Some(""));
        assert_eq!(table.cell(2, "Rating"), Some("4.5"));
    }

    #[test]
    fn metadata_repeats_on_every_row() {
        let table = format_table(&records(), AMAZON_SCHEMA, &metadata());
        for row in 0..3 {
            assert_eq!(table.cell(row, "Date"), Some("2024-03-07"));
            assert_eq!(table.cell(row, "Market"), Some("Germany"));
            assert_eq!(table.cell(row, "Retailer"), Some("amazon.de"));
            assert_eq!(table.cell(row, "Brand"), Some("Philips"));
            assert_eq!(table.cell(row, "Category"), Some("Baby Bottle"));
            assert_eq!(table.cell(row, "SearchTerm"), Some("Philips Baby Bottle"));
        }
    }

    #[test]
    fn no_records_still_has_header() {
        let table = format_table(&[], &[ProductField::Title, ProductField::Link], &metadata());
        assert_eq!(table.column_count(), 8);
        assert_eq!(table.row_count(), 0);
    }
}

//! Tabular upload ingestion
//!
//! Turns an uploaded CSV or XLSX file into the ordered list of review
//! texts that will be classified. Null cells are dropped here so every
//! returned entry counts toward exactly one label downstream.

pub mod csv_reader;
pub mod spreadsheet;

use bytes::Bytes;
use tracing::{debug, info};

use crate::types::{AppError, AppResult};

/// Column holding the free-text reviews.
pub const REVIEW_COLUMN: &str = "review";

/// Cell values treated as missing, matching the pandas defaults.
pub const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Csv,
    Xlsx,
}

impl UploadFormat {
    /// Case-sensitive suffix match on the filename.
    pub fn from_filename(filename: &str) -> AppResult<Self> {
        if filename.ends_with(".csv") {
            Ok(UploadFormat::Csv)
        } else if filename.ends_with(".xlsx") {
            Ok(UploadFormat::Xlsx)
        } else {
            Err(AppError::UnsupportedFormat)
        }
    }
}

/// A file received from the client; lives only for the duration of a request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content: Bytes,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }

    pub fn format(&self) -> AppResult<UploadFormat> {
        UploadFormat::from_filename(&self.filename)
    }
}

pub fn is_missing(value: &str) -> bool {
    MISSING_MARKERS.contains(&value)
}

#[derive(Debug, Clone)]
pub struct TabularLoader {
    column: String,
}

impl Default for TabularLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TabularLoader {
    pub fn new() -> Self {
        Self::with_column(REVIEW_COLUMN)
    }

    pub fn with_column(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn load_file(&self, file: &UploadedFile) -> AppResult<Vec<String>> {
        self.load(&file.content, &file.filename)
    }

    /// Parse `content` according to the extension of `filename` and return
    /// the non-null values of the configured column in row order.
    pub fn load(&self, content: &[u8], filename: &str) -> AppResult<Vec<String>> {
        let format = UploadFormat::from_filename(filename)?;
        debug!(filename = %filename, ?format, bytes = content.len(), "Parsing upload");

        let cells = match format {
            UploadFormat::Csv => csv_reader::read_column(content, &self.column)?,
            UploadFormat::Xlsx => spreadsheet::read_column(content, &self.column)?,
        };

        let total = cells.len();
        let reviews: Vec<String> = cells
            .into_iter()
            .flatten()
            .filter(|value| !is_missing(value))
            .collect();

        info!(
            filename = %filename,
            rows = total,
            reviews = reviews.len(),
            "Loaded reviews from upload"
        );

        Ok(reviews)
    }
}

pub fn load_reviews(content: &[u8], filename: &str) -> AppResult<Vec<String>> {
    TabularLoader::new().load(content, filename)
}

//! Output sink trait and error types
//!
//! This module defines the interface every persistence backend implements.
//! Each method writes one unit of work and returns the path it wrote.

use crate::crawler::{AreaEntry, RestaurantLink};
use crate::output::summary::CrawlReport;
use crate::restaurant::RestaurantRecord;
use crate::url::AreaRef;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for everything the pipeline produces
///
/// Implementations create whatever directory structure they need before
/// writing.
pub trait RecordSink {
    /// Writes the area table for one city
    fn write_areas(&self, city: &str, areas: &[AreaEntry]) -> OutputResult<PathBuf>;

    /// Writes the restaurant list for one area
    fn write_restaurant_links(
        &self,
        area: &AreaRef,
        restaurants: &[RestaurantLink],
    ) -> OutputResult<PathBuf>;

    /// Saves a fetched restaurant page verbatim
    fn write_raw_page(&self, stem: &str, body: &str) -> OutputResult<PathBuf>;

    /// Writes one parsed restaurant record
    fn write_record(&self, stem: &str, record: &RestaurantRecord) -> OutputResult<PathBuf>;

    /// Writes the summary of a full crawl
    fn write_report(&self, report: &CrawlReport) -> OutputResult<PathBuf>;
}

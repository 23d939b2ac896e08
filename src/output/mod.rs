//! Output module for persisting harvest results
//!
//! This module handles:
//! - The [`RecordSink`] interface the pipeline writes through
//! - Area tables, restaurant lists, raw pages and records on disk
//! - Markdown summaries of full crawls

mod files;
mod summary;
mod traits;

pub use files::{write_areas_csv, write_links_tsv, FileSink, AREA_HEADER};
pub use summary::{format_markdown_report, CrawlReport};
pub use traits::{OutputError, OutputResult, RecordSink};

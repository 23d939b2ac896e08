//! Filesystem sink
//!
//! Writes every artifact under the configured output root using the fixed
//! [`OutputLayout`] convention.

use crate::config::OutputLayout;
use crate::crawler::{AreaEntry, RestaurantLink};
use crate::output::summary::{format_markdown_report, CrawlReport};
use crate::output::traits::{OutputError, OutputResult, RecordSink};
use crate::restaurant::RestaurantRecord;
use crate::url::AreaRef;
use csv::{QuoteStyle, WriterBuilder};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Header row of the city area table
pub const AREA_HEADER: [&str; 3] = ["area_name", "area_code", "url"];

/// Writes the area table with every field quoted
pub fn write_areas_csv<W: Write>(writer: W, areas: &[AreaEntry]) -> OutputResult<()> {
    let mut csv = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(writer);

    csv.write_record(AREA_HEADER)?;
    for area in areas {
        csv.write_record([area.name.as_str(), area.code.as_str(), area.url.as_str()])?;
    }
    csv.flush().map_err(|source| OutputError::Io {
        path: "<areas>".to_string(),
        source,
    })?;
    Ok(())
}

/// Writes one `name<TAB>url` line per restaurant
///
/// Fields are quoted only when they contain a tab, quote or line break.
pub fn write_links_tsv<W: Write>(writer: W, restaurants: &[RestaurantLink]) -> OutputResult<()> {
    let mut tsv = WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Necessary)
        .has_headers(false)
        .from_writer(writer);

    for restaurant in restaurants {
        tsv.write_record([restaurant.name.as_str(), restaurant.url.as_str()])?;
    }
    tsv.flush().map_err(|source| OutputError::Io {
        path: "<restaurants>".to_string(),
        source,
    })?;
    Ok(())
}

/// Sink writing plain files under an output root
#[derive(Debug, Clone)]
pub struct FileSink {
    layout: OutputLayout,
}

impl FileSink {
    pub fn new(layout: OutputLayout) -> Self {
        Self { layout }
    }

    fn create(&self, path: &Path) -> OutputResult<fs::File> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
        }
        fs::File::create(path).map_err(|source| io_error(path, source))
    }

    fn write_bytes(&self, path: &Path, bytes: &[u8]) -> OutputResult<()> {
        let mut file = self.create(path)?;
        file.write_all(bytes)
            .map_err(|source| io_error(path, source))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> OutputError {
    OutputError::Io {
        path: path.display().to_string(),
        source,
    }
}

impl RecordSink for FileSink {
    fn write_areas(&self, city: &str, areas: &[AreaEntry]) -> OutputResult<PathBuf> {
        let path = self.layout.city_areas(city);
        let file = self.create(&path)?;
        write_areas_csv(file, areas)?;

        tracing::info!("Wrote {} areas to {}", areas.len(), path.display());
        Ok(path)
    }

    fn write_restaurant_links(
        &self,
        area: &AreaRef,
        restaurants: &[RestaurantLink],
    ) -> OutputResult<PathBuf> {
        let path = self.layout.area_restaurants(&area.city, &area.code);
        let file = self.create(&path)?;
        write_links_tsv(file, restaurants)?;

        tracing::info!(
            "Wrote {} restaurants to {}",
            restaurants.len(),
            path.display()
        );
        Ok(path)
    }

    fn write_raw_page(&self, stem: &str, body: &str) -> OutputResult<PathBuf> {
        let path = self.layout.raw_page(stem);
        self.write_bytes(&path, body.as_bytes())?;

        tracing::info!("Saved page to {}", path.display());
        Ok(path)
    }

    fn write_record(&self, stem: &str, record: &RestaurantRecord) -> OutputResult<PathBuf> {
        let path = self.layout.record(stem);
        let mut json = serde_json::to_string_pretty(record)?;
        json.push('\n');
        self.write_bytes(&path, json.as_bytes())?;

        tracing::info!("Wrote record to {}", path.display());
        Ok(path)
    }

    fn write_report(&self, report: &CrawlReport) -> OutputResult<PathBuf> {
        let path = self.layout.report(&report.city, &report.stamp());
        self.write_bytes(&path, format_markdown_report(report).as_bytes())?;

        tracing::info!("Wrote crawl summary to {}", path.display());
        Ok(path)
    }
}

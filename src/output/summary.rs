//! Crawl summary reports
//!
//! A full city crawl records what it collected and every sub-unit it had to
//! skip, so failed URLs can be retried by hand.

use crate::crawler::{Stage, StageFailure};
use chrono::{DateTime, Utc};

/// Outcome of one full city crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub city: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Areas listed on the city sitemap
    pub areas_found: usize,
    /// Areas whose restaurant list was written
    pub areas_walked: usize,
    /// Restaurant links collected across all walked areas
    pub restaurants_found: usize,
    /// Restaurant records written
    pub records_written: usize,
    pub failures: Vec<StageFailure>,
}

impl CrawlReport {
    pub fn new(city: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            city: city.into(),
            started_at,
            finished_at: None,
            areas_found: 0,
            areas_walked: 0,
            restaurants_found: 0,
            records_written: 0,
            failures: Vec::new(),
        }
    }

    /// Compact UTC timestamp of the crawl start, safe for file names
    pub fn stamp(&self) -> String {
        self.started_at.format("%Y%m%dT%H%M%SZ").to_string()
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Number of failures recorded at `stage`
    pub fn failures_at(&self, stage: Stage) -> usize {
        self.failures.iter().filter(|f| f.stage == stage).count()
    }
}

/// Formats a crawl report as markdown
pub fn format_markdown_report(report: &CrawlReport) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Crawl Summary: {}\n\n", report.city));

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    if let Some(finished) = &report.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = report.duration_seconds() {
        md.push_str(&format!("- **Duration**: {} seconds\n", duration));
    }
    md.push('\n');

    md.push_str("## Collected\n\n");
    md.push_str("| Item | Count |\n");
    md.push_str("|------|-------|\n");
    md.push_str(&format!("| Areas found | {} |\n", report.areas_found));
    md.push_str(&format!("| Areas walked | {} |\n", report.areas_walked));
    md.push_str(&format!(
        "| Restaurants found | {} |\n",
        report.restaurants_found
    ));
    md.push_str(&format!(
        "| Records written | {} |\n\n",
        report.records_written
    ));

    md.push_str("## Failures\n\n");
    if report.failures.is_empty() {
        md.push_str("None.\n");
        return md;
    }

    md.push_str("| Stage | URL | Error |\n");
    md.push_str("|-------|-----|-------|\n");
    for failure in &report.failures {
        md.push_str(&format!(
            "| {} | {} | {} |\n",
            failure.stage,
            failure.url,
            failure.message.replace('|', "\\|")
        ));
    }

    md
}

//! Harvest pipeline coordinator
//!
//! This module ties the levels of the crawl together:
//! - City sitemap → area table
//! - Area sitemap and its sound sub-pages → restaurant list
//! - Restaurant page → raw capture and parsed record
//! - Full city crawl with a summary report
//!
//! Everything runs sequentially. Failures of a sub-unit during a full crawl
//! are recorded in the report and the crawl moves on.

use crate::config::{validate, Config, OutputLayout};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::sitemap::{walk_area, walk_city};
use crate::crawler::types::{AreaEntry, AreaHarvest, Stage, StageFailure};
use crate::output::{CrawlReport, FileSink, RecordSink};
use crate::restaurant::{parse_restaurant_page, RestaurantRecord};
use crate::url::{AreaRef, FileNamer, UrlTripleNamer};
use crate::HarvestError;
use chrono::Utc;
use std::collections::HashSet;
use std::path::PathBuf;
use url::Url;

/// Optional caps on how much of a city a full crawl visits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlLimits {
    pub max_areas: Option<usize>,
    pub max_restaurants_per_area: Option<usize>,
}

/// A restaurant page saved verbatim
#[derive(Debug, Clone)]
pub struct CapturedPage {
    /// File stem chosen by the naming policy
    pub stem: String,
    pub raw_path: PathBuf,
    pub body: String,
}

/// A restaurant page saved and parsed
#[derive(Debug, Clone)]
pub struct HarvestedRestaurant {
    pub stem: String,
    pub raw_path: PathBuf,
    pub record_path: PathBuf,
    pub record: RestaurantRecord,
}

/// Main pipeline structure
pub struct Harvester<S = FileSink, N = UrlTripleNamer> {
    base_url: Url,
    fetcher: Fetcher,
    sink: S,
    namer: N,
}

impl Harvester {
    /// Creates a harvester writing files under the configured output root
    ///
    /// # Arguments
    ///
    /// * `config` - The resolved configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Successfully created harvester
    /// * `Err(HarvestError)` - Invalid configuration or HTTP client failure
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let sink = FileSink::new(OutputLayout::from(&config.output));
        Self::with_parts(&config, sink, UrlTripleNamer)
    }
}

impl<S: RecordSink, N: FileNamer> Harvester<S, N> {
    /// Creates a harvester with a custom sink and naming policy
    pub fn with_parts(config: &Config, sink: S, namer: N) -> Result<Self, HarvestError> {
        validate(config)?;
        let base_url = Url::parse(&config.site.base_url)?;
        let fetcher = Fetcher::new(&config.http)?;

        Ok(Self {
            base_url,
            fetcher,
            sink,
            namer,
        })
    }

    /// Walks a city sitemap and writes its area table
    ///
    /// Nothing is written when the city page cannot be fetched.
    pub async fn collect_city(&self, city: &str) -> Result<Vec<AreaEntry>, HarvestError> {
        let areas = walk_city(&self.fetcher, &self.base_url, city).await?;
        self.sink.write_areas(city, &areas)?;
        Ok(areas)
    }

    /// Walks an area and writes its restaurant list
    pub async fn collect_area(&self, area_url: &Url) -> Result<AreaHarvest, HarvestError> {
        let area = AreaRef::from_url(area_url)?;
        self.collect_area_ref(&area).await
    }

    async fn collect_area_ref(&self, area: &AreaRef) -> Result<AreaHarvest, HarvestError> {
        let harvest = walk_area(&self.fetcher, &self.base_url, area).await?;
        self.sink
            .write_restaurant_links(&harvest.area, &harvest.restaurants)?;
        Ok(harvest)
    }

    /// Fetches a restaurant page and saves it verbatim
    ///
    /// The file name is derived before fetching, so a malformed URL never
    /// costs a request.
    pub async fn capture_restaurant(&self, url: &Url) -> Result<CapturedPage, HarvestError> {
        let stem = self.namer.file_stem(url)?;
        let page = self.fetcher.fetch(url).await?;
        let raw_path = self.sink.write_raw_page(&stem, &page.body)?;

        Ok(CapturedPage {
            stem,
            raw_path,
            body: page.body,
        })
    }

    /// Captures a restaurant page, parses it and writes the record
    pub async fn harvest_restaurant(&self, url: &Url) -> Result<HarvestedRestaurant, HarvestError> {
        let captured = self.capture_restaurant(url).await?;
        let record = parse_restaurant_page(&captured.body);
        let record_path = self.sink.write_record(&captured.stem, &record)?;

        Ok(HarvestedRestaurant {
            stem: captured.stem,
            raw_path: captured.raw_path,
            record_path,
            record,
        })
    }

    /// Runs the whole pipeline for one city
    ///
    /// Only a failure on the city sitemap itself, or writing the final
    /// report, is returned as an error. An area listed more than once on the
    /// city sitemap is walked once.
    pub async fn crawl_city(
        &self,
        city: &str,
        limits: CrawlLimits,
    ) -> Result<CrawlReport, HarvestError> {
        let mut report = CrawlReport::new(city, Utc::now());

        // City sitemap failures end the crawl
        let areas = self.collect_city(city).await?;
        report.areas_found = areas.len();

        let mut walked: HashSet<Url> = HashSet::new();
        let max_areas = limits.max_areas.unwrap_or(usize::MAX);
        let max_restaurants = limits.max_restaurants_per_area.unwrap_or(usize::MAX);

        // Walk each distinct area
        for entry in &areas {
            if walked.len() >= max_areas {
                break;
            }
            if !walked.insert(entry.url.clone()) {
                tracing::debug!("Area {} already walked", entry.url);
                continue;
            }

            let harvest = match self.collect_area(&entry.url).await {
                Ok(harvest) => harvest,
                Err(e) => {
                    tracing::warn!("Skipping area {} ({}): {}", entry.name, entry.url, e);
                    report.failures.push(StageFailure::new(
                        stage_for(&e, Stage::AreaSitemap),
                        entry.url.as_str(),
                        &e,
                    ));
                    continue;
                }
            };

            report.areas_walked += 1;
            report.restaurants_found += harvest.restaurants.len();
            report.failures.extend(harvest.failures);

            // Capture and parse its restaurants
            for restaurant in harvest.restaurants.iter().take(max_restaurants) {
                match self.harvest_restaurant(&restaurant.url).await {
                    Ok(_) => report.records_written += 1,
                    Err(e) => {
                        tracing::warn!(
                            "Skipping restaurant {} ({}): {}",
                            restaurant.name,
                            restaurant.url,
                            e
                        );
                        report.failures.push(StageFailure::new(
                            stage_for(&e, Stage::RestaurantPage),
                            restaurant.url.as_str(),
                            &e,
                        ));
                    }
                }
            }
        }

        // Write the summary
        report.finished_at = Some(Utc::now());
        self.sink.write_report(&report)?;

        tracing::info!(
            "Crawl of {} finished: {} areas walked, {} records written, {} failures",
            city,
            report.areas_walked,
            report.records_written,
            report.failures.len()
        );

        Ok(report)
    }
}

fn stage_for(error: &HarvestError, fetch_stage: Stage) -> Stage {
    match error {
        HarvestError::Output(_) => Stage::Output,
        _ => fetch_stage,
    }
}

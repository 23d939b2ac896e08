//! Crawler module for sitemap walking and page capture
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching with error classification
//! - Anchor extraction with href resolution
//! - City and area sitemap walking
//! - Overall pipeline coordination

mod coordinator;
mod fetcher;
mod links;
mod sitemap;
mod types;

pub use coordinator::{CapturedPage, CrawlLimits, HarvestedRestaurant, Harvester};
pub use fetcher::{build_http_client, fetch_url, FetchedPage, Fetcher};
pub use links::{extract_links, visible_text, ExtractedLink};
pub use sitemap::{
    city_sitemap_url, parse_city_sitemap, parse_restaurant_links, parse_sound_links, walk_area,
    walk_city,
};
pub use types::{AreaEntry, AreaHarvest, RestaurantLink, Stage, StageFailure};

use crate::config::Config;
use crate::output::CrawlReport;
use crate::HarvestError;

/// Runs a complete crawl of one city
///
/// This is the main entry point for a full harvest. It will:
/// 1. Walk the city sitemap and write the area table
/// 2. Walk every area and write its restaurant list
/// 3. Capture and parse every restaurant page
/// 4. Write a markdown summary of the run
///
/// # Arguments
///
/// * `config` - The resolved configuration
/// * `city` - City slug, e.g. `"tokyo"`
/// * `limits` - Optional caps on areas and restaurants
pub async fn crawl(
    config: Config,
    city: &str,
    limits: CrawlLimits,
) -> Result<CrawlReport, HarvestError> {
    Harvester::new(config)?.crawl_city(city, limits).await
}

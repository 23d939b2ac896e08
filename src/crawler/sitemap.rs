//! Sitemap walker for the city and area levels
//!
//! The `parse_*` functions apply each level's matching rules to one fetched
//! document. The `walk_*` functions fetch and combine them. Walking is
//! sequential and output keeps document order.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::links::extract_links;
use crate::crawler::types::{AreaEntry, AreaHarvest, RestaurantLink, Stage, StageFailure};
use crate::url::{
    is_area_link, is_restaurant_link, is_valid_city_slug, last_path_segment, sound_segment,
    AreaRef,
};
use crate::{HarvestError, UrlFormatError};
use url::Url;

/// URL of a city's sitemap index
pub fn city_sitemap_url(base: &Url, city: &str) -> Result<Url, HarvestError> {
    if !is_valid_city_slug(city) {
        return Err(UrlFormatError::CitySlug(city.to_string()).into());
    }
    Ok(base.join(&format!("/sitemap/{}/", city))?)
}

/// Extracts area entries from a city sitemap page
///
/// Duplicate hrefs produce duplicate entries.
pub fn parse_city_sitemap(html: &str, page_url: &Url, base: &Url, city: &str) -> Vec<AreaEntry> {
    extract_links(html, page_url, |url| is_area_link(url, base, city))
        .into_iter()
        .map(|link| AreaEntry {
            code: last_path_segment(&link.url).unwrap_or_default(),
            name: link.text,
            url: link.url,
        })
        .collect()
}

/// Extracts the sound sub-page URLs from an area page
///
/// A sub-page linked more than once is returned once, at its first position.
pub fn parse_sound_links(html: &str, area: &AreaRef) -> Vec<Url> {
    let mut sound_links: Vec<Url> = Vec::new();

    for link in extract_links(html, &area.url, |url| sound_segment(url, &area.url).is_some()) {
        if !sound_links.contains(&link.url) {
            sound_links.push(link.url);
        }
    }

    sound_links
}

/// Extracts restaurant links from a sound sub-page
///
/// Anchors with empty visible text are dropped even when the href matches.
pub fn parse_restaurant_links(
    html: &str,
    page_url: &Url,
    base: &Url,
    city: &str,
) -> Vec<RestaurantLink> {
    extract_links(html, page_url, |url| is_restaurant_link(url, base, city))
        .into_iter()
        .filter(|link| !link.text.is_empty())
        .map(|link| RestaurantLink {
            name: link.text,
            url: link.url,
        })
        .collect()
}

/// Walks a city sitemap and returns its areas
///
/// A failure fetching the city page is returned to the caller.
pub async fn walk_city(
    fetcher: &Fetcher,
    base: &Url,
    city: &str,
) -> Result<Vec<AreaEntry>, HarvestError> {
    let sitemap_url = city_sitemap_url(base, city)?;
    tracing::info!("Walking {} sitemap: {}", Stage::CitySitemap, sitemap_url);

    let page = fetcher.fetch(&sitemap_url).await?;
    let areas = parse_city_sitemap(&page.body, &page.url, base, city);

    tracing::info!("Found {} areas for {}", areas.len(), city);
    Ok(areas)
}

/// Walks an area page and every sound sub-page below it
///
/// A failure fetching the area page itself is returned to the caller. A
/// failure fetching one sound sub-page is logged, recorded in
/// [`AreaHarvest::failures`] and skipped.
pub async fn walk_area(
    fetcher: &Fetcher,
    base: &Url,
    area: &AreaRef,
) -> Result<AreaHarvest, HarvestError> {
    tracing::info!("Walking {}: {}", Stage::AreaSitemap, area.url);

    // Fetch the area page
    let page = fetcher.fetch(&area.url).await?;
    let sound_links = parse_sound_links(&page.body, area);
    tracing::debug!(
        "Area {} has {} sound sub-pages",
        area.code,
        sound_links.len()
    );

    let mut restaurants = Vec::new();
    let mut failures = Vec::new();

    // One failed sub-page must not lose the others
    for sound_url in sound_links {
        match fetcher.fetch(&sound_url).await {
            Ok(sound_page) => {
                let found =
                    parse_restaurant_links(&sound_page.body, &sound_page.url, base, &area.city);
                tracing::debug!("{} restaurants on {}", found.len(), sound_url);
                restaurants.extend(found);
            }
            Err(e) => {
                tracing::warn!("Skipping {} {}: {}", Stage::SoundPage, sound_url, e);
                failures.push(StageFailure::new(Stage::SoundPage, sound_url.as_str(), &e));
            }
        }
    }

    tracing::info!(
        "Found {} restaurants in {} ({} sound sub-pages skipped)",
        restaurants.len(),
        area.code,
        failures.len()
    );

    Ok(AreaHarvest {
        area: area.clone(),
        restaurants,
        failures,
    })
}

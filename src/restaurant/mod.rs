//! Restaurant page parser
//!
//! Turns one restaurant page into a [`RestaurantRecord`]. Every site-specific
//! selector, label and pattern lives in this module. Each extraction step is
//! independent: a step that finds nothing leaves its fields empty and never
//! fails the parse.
//!
//! Steps:
//! - JSON-LD Restaurant entity: name, rating, review count, genres, telephone
//! - Page text: nearest station
//! - Info tables: address
//! - Header budget block: dinner and lunch price ranges

mod budget;
mod details;
mod jsonld;

pub use budget::{extract_price_range, parse_price_range, MealTime, PriceRange};
pub use details::{extract_address, extract_closest_station};
pub use jsonld::{extract_structured_fields, StructuredFields};

use crate::ParseError;
use scraper::Html;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Normalized metadata for one restaurant page
///
/// Absent values are empty strings or an empty genre list, never missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RestaurantRecord {
    pub restaurant_name: String,
    pub review_score: String,
    pub review_count: String,
    pub restaurant_genre: Vec<String>,
    pub closest_train_station: String,
    pub address: String,
    pub telephone: String,
    pub price_dinner_min: String,
    pub price_dinner_max: String,
    pub price_lunch_min: String,
    pub price_lunch_max: String,
}

/// Parses one restaurant page
///
/// # Example
///
/// ```
/// use good_spots::restaurant::parse_restaurant_page;
///
/// let html = r#"<script type="application/ld+json">{"@type":"Restaurant","name":"Foo"}</script>"#;
/// let record = parse_restaurant_page(html);
/// assert_eq!(record.restaurant_name, "Foo");
/// assert_eq!(record.address, "");
/// ```
pub fn parse_restaurant_page(html: &str) -> RestaurantRecord {
    let document = Html::parse_document(html);

    // Each step falls back to empty fields on its own
    let structured = extract_structured_fields(&document).unwrap_or_default();
    let dinner = extract_price_range(&document, MealTime::Dinner).unwrap_or_default();
    let lunch = extract_price_range(&document, MealTime::Lunch).unwrap_or_default();

    RestaurantRecord {
        restaurant_name: structured.name,
        review_score: structured.review_score,
        review_count: structured.review_count,
        restaurant_genre: structured.genres,
        closest_train_station: extract_closest_station(&document),
        address: extract_address(&document),
        telephone: structured.telephone,
        price_dinner_min: dinner.min,
        price_dinner_max: dinner.max,
        price_lunch_min: lunch.min,
        price_lunch_max: lunch.max,
    }
}

/// Reads a saved page from disk and parses it
///
/// Invalid UTF-8 is replaced rather than rejected. Only an unreadable file
/// is an error.
pub fn parse_restaurant_file(path: &Path) -> Result<RestaurantRecord, ParseError> {
    let bytes = std::fs::read(path).map_err(|source| ParseError::Unreadable {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_restaurant_page(&String::from_utf8_lossy(&bytes)))
}

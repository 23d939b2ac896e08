//! Restaurant entity from `<script type="application/ld+json">` blocks

use crate::ParseError;
use scraper::{Html, Selector};
use serde_json::Value;

/// Separator between cuisines in `servesCuisine`
const GENRE_SEPARATOR: char = '、';

/// Fields taken from the structured-data block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredFields {
    pub name: String,
    pub review_score: String,
    pub review_count: String,
    pub genres: Vec<String>,
    pub telephone: String,
}

/// Finds the first Restaurant entity in the document's JSON-LD blocks
///
/// Malformed blocks are logged and skipped. Returns `None` when no block
/// describes a restaurant.
pub fn extract_structured_fields(document: &Html) -> Option<StructuredFields> {
    let selector = Selector::parse(r#"script[type="application/ld+json"]"#).ok()?;

    for script in document.select(&selector) {
        let raw: String = script.text().collect();
        let value = match parse_block(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!("Ignoring JSON-LD block: {}", e);
                continue;
            }
        };

        // First Restaurant entity wins
        if let Some(entity) = candidates(value).into_iter().find(is_restaurant) {
            return Some(fields_from_entity(&entity));
        }
    }

    None
}

fn parse_block(raw: &str) -> Result<Value, ParseError> {
    Ok(serde_json::from_str(raw.trim())?)
}

/// Top-level object, array members and `@graph` members, in that order
fn candidates(value: Value) -> Vec<Value> {
    let mut items = match value {
        Value::Array(items) => items,
        other => vec![other],
    };

    let graph: Vec<Value> = items
        .iter()
        .filter_map(|item| item.get("@graph").and_then(Value::as_array))
        .flatten()
        .cloned()
        .collect();
    items.extend(graph);

    items
}

fn is_restaurant(item: &Value) -> bool {
    match item.get("@type") {
        Some(Value::String(kind)) => kind == "Restaurant",
        Some(Value::Array(kinds)) => kinds.iter().any(|k| k.as_str() == Some("Restaurant")),
        _ => false,
    }
}

fn fields_from_entity(entity: &Value) -> StructuredFields {
    let rating = entity.get("aggregateRating");

    StructuredFields {
        name: scalar_text(entity.get("name")),
        review_score: scalar_text(rating.and_then(|r| r.get("ratingValue"))),
        review_count: scalar_text(rating.and_then(|r| r.get("ratingCount"))),
        genres: split_genres(entity.get("servesCuisine")),
        telephone: scalar_text(entity.get("telephone")),
    }
}

/// Strings verbatim, numbers in their JSON spelling, anything else empty
fn scalar_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn split_genres(value: Option<&Value>) -> Vec<String> {
    let pieces: Vec<String> = match value {
        Some(Value::String(s)) => s.split(GENRE_SEPARATOR).map(str::to_string).collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .flat_map(|s| s.split(GENRE_SEPARATOR))
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };

    pieces
        .into_iter()
        .map(|genre| genre.trim().to_string())
        .filter(|genre| !genre.is_empty())
        .collect()
}

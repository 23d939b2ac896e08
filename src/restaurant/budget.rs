//! Dinner and lunch price ranges from the header budget block
//!
//! Markup shape:
//!
//! ```html
//! <div class="rdheader-budget">
//!   <p><i class="c-rating-v3__time--dinner">夜</i>
//!      <a class="rdheader-budget__price-target">￥5,000～￥5,999</a></p>
//!   <p><i class="c-rating-v3__time--lunch">昼</i>
//!      <a class="rdheader-budget__price-target">～￥999</a></p>
//! </div>
//! ```

use crate::crawler::visible_text;
use crate::ParseError;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

const BUDGET_CONTAINER: &str = "div.rdheader-budget";
const DINNER_MARKER: &str = "i.c-rating-v3__time--dinner";
const LUNCH_MARKER: &str = "i.c-rating-v3__time--lunch";
const PRICE_TARGET: &str = "a.rdheader-budget__price-target";

/// Meal time a budget line applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealTime {
    Dinner,
    Lunch,
}

impl MealTime {
    fn marker(&self) -> &'static str {
        match self {
            Self::Dinner => DINNER_MARKER,
            Self::Lunch => LUNCH_MARKER,
        }
    }
}

/// Minimum and maximum amounts with grouping commas removed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceRange {
    pub min: String,
    pub max: String,
}

fn range_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"[￥¥]([0-9,]+)\s*[～〜~]\s*[￥¥]([0-9,]+)").ok())
        .as_ref()
}

fn max_only_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[～〜~]\s*[￥¥]([0-9,]+)").ok())
        .as_ref()
}

/// Parses `￥N～￥M` for either meal time
///
/// Lunch lines may show only a ceiling (`～￥M`), read as a range starting at
/// zero. Dinner lines always need both amounts.
///
/// # Examples
///
/// ```
/// use good_spots::restaurant::{parse_price_range, MealTime};
///
/// let dinner = parse_price_range("￥5,000～￥5,999", MealTime::Dinner).unwrap();
/// assert_eq!((dinner.min.as_str(), dinner.max.as_str()), ("5000", "5999"));
///
/// let lunch = parse_price_range("～￥999", MealTime::Lunch).unwrap();
/// assert_eq!((lunch.min.as_str(), lunch.max.as_str()), ("0", "999"));
///
/// assert_eq!(parse_price_range("～￥999", MealTime::Dinner), None);
/// ```
pub fn parse_price_range(text: &str, meal: MealTime) -> Option<PriceRange> {
    let text = text.trim();

    if meal == MealTime::Lunch {
        if let Some(caps) = max_only_pattern().and_then(|p| p.captures(text)) {
            return Some(PriceRange {
                min: "0".to_string(),
                max: strip_grouping(caps.get(1)?.as_str()),
            });
        }
    }

    let caps = range_pattern()?.captures(text)?;
    Some(PriceRange {
        min: strip_grouping(caps.get(1)?.as_str()),
        max: strip_grouping(caps.get(2)?.as_str()),
    })
}

fn strip_grouping(amount: &str) -> String {
    amount.replace(',', "")
}

/// Price range for one meal time, or `None` when the page shows none
pub fn extract_price_range(document: &Html, meal: MealTime) -> Option<PriceRange> {
    let container = select_first(document.root_element(), BUDGET_CONTAINER)?;
    let marker = select_first(container, meal.marker())?;

    // A marker without a price link means the markup moved
    let text = match price_text(marker, meal) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!("{}", e);
            return None;
        }
    };

    let range = parse_price_range(&text, meal);
    if range.is_none() {
        tracing::debug!("Unrecognised {:?} price text {:?}", meal, text);
    }
    range
}

/// Text of the price link sharing a paragraph with `marker`
fn price_text(marker: ElementRef, meal: MealTime) -> Result<String, ParseError> {
    let paragraph = marker
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "p")
        .ok_or_else(|| {
            ParseError::UnexpectedShape(format!("{:?} budget marker outside a paragraph", meal))
        })?;

    let target = select_first(paragraph, PRICE_TARGET).ok_or_else(|| {
        ParseError::UnexpectedShape(format!("{:?} budget line has no price link", meal))
    })?;

    Ok(visible_text(&target))
}

fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    let found = scope.select(&selector).next();
    found
}

//! Station and address scraping from page text and info tables

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

/// Label preceding the nearest station in the page text
const STATION_LABEL: &str = "最寄り駅";
/// Suffix meaning "station", dropped from the captured name
const STATION_SUFFIX: char = '駅';
/// Table header text marking the address row
const ADDRESS_LABEL: &str = "住所";

fn station_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(&format!(r"{}[:：]\s*(\S+)", STATION_LABEL)).ok())
        .as_ref()
}

/// Nearest train station named after the `最寄り駅:` label, without the `駅` suffix
pub fn extract_closest_station(document: &Html) -> String {
    let Some(pattern) = station_pattern() else {
        return String::new();
    };

    let page_text: String = document.root_element().text().collect();
    pattern
        .captures(&page_text)
        .and_then(|caps| caps.get(1))
        .map(|m| {
            let name = m.as_str();
            name.strip_suffix(STATION_SUFFIX).unwrap_or(name).to_string()
        })
        .unwrap_or_default()
}

/// Address from the cell following an `住所` cell, first line only
///
/// Every table row is scanned and the last matching row wins.
pub fn extract_address(document: &Html) -> String {
    let (Ok(row_selector), Ok(cell_selector)) = (Selector::parse("tr"), Selector::parse("th, td"))
    else {
        return String::new();
    };

    let mut address = String::new();

    for row in document.select(&row_selector) {
        let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
        for (i, cell) in cells.iter().enumerate() {
            if !cell_text(cell).contains(ADDRESS_LABEL) {
                continue;
            }
            // Later rows overwrite earlier ones
            if let Some(next) = cells.get(i + 1) {
                address = first_line(&cell_text(next));
            }
        }
    }

    address
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn first_line(text: &str) -> String {
    text.lines().next().unwrap_or_default().trim().to_string()
}

use crate::config::types::OutputConfig;
use std::path::{Path, PathBuf};

/// Fixed subpath convention under the output root
///
/// ```text
/// {root}/cities/{city}.csv
/// {root}/{city}/{area_code}.txt
/// {root}/restaurants/{stem}.html
/// {root}/restaurants/{stem}.json
/// {root}/reports/{city}-{stamp}.md
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Area table for one city
    pub fn city_areas(&self, city: &str) -> PathBuf {
        self.root.join("cities").join(format!("{}.csv", city))
    }

    /// Restaurant list for one area
    pub fn area_restaurants(&self, city: &str, area_code: &str) -> PathBuf {
        self.root.join(city).join(format!("{}.txt", area_code))
    }

    /// Directory holding raw pages and parsed records
    pub fn restaurants_dir(&self) -> PathBuf {
        self.root.join("restaurants")
    }

    /// Raw capture of one restaurant page
    pub fn raw_page(&self, stem: &str) -> PathBuf {
        self.restaurants_dir().join(format!("{}.html", stem))
    }

    /// Parsed metadata record of one restaurant page
    pub fn record(&self, stem: &str) -> PathBuf {
        self.restaurants_dir().join(format!("{}.json", stem))
    }

    /// Markdown summary of one full crawl
    pub fn report(&self, city: &str, stamp: &str) -> PathBuf {
        self.root
            .join("reports")
            .join(format!("{}-{}.md", city, stamp))
    }
}

impl From<&OutputConfig> for OutputLayout {
    fn from(config: &OutputConfig) -> Self {
        Self::new(config.root.clone())
    }
}

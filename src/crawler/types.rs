use crate::url::AreaRef;
use std::fmt;
use url::Url;

/// One area listed on a city sitemap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaEntry {
    /// Visible link text
    pub name: String,
    /// Last path segment of `url`; not guaranteed unique
    pub code: String,
    pub url: Url,
}

/// One restaurant listed on an area's sound sub-page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantLink {
    /// Visible link text, never empty
    pub name: String,
    pub url: Url,
}

/// Everything collected while walking one area
#[derive(Debug, Clone)]
pub struct AreaHarvest {
    pub area: AreaRef,
    /// Restaurants in sound sub-page order, then document order
    pub restaurants: Vec<RestaurantLink>,
    /// Sound sub-pages that could not be fetched
    pub failures: Vec<StageFailure>,
}

/// Pipeline stage a failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    CitySitemap,
    AreaSitemap,
    SoundPage,
    RestaurantPage,
    Output,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CitySitemap => "city sitemap",
            Self::AreaSitemap => "area sitemap",
            Self::SoundPage => "sound sub-page",
            Self::RestaurantPage => "restaurant page",
            Self::Output => "output",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sub-unit of work that was skipped, with enough context to retry it by hand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFailure {
    pub stage: Stage,
    pub url: String,
    pub message: String,
}

impl StageFailure {
    pub fn new(stage: Stage, url: impl Into<String>, error: impl fmt::Display) -> Self {
        Self {
            stage,
            url: url.into(),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.stage, self.url, self.message)
    }
}

use crate::url::matcher::is_valid_city_slug;
use crate::UrlFormatError;
use url::Url;

/// An area sitemap page, identified by its city and area code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaRef {
    pub city: String,
    pub code: String,
    pub url: Url,
}

impl AreaRef {
    /// Derives the city and area code from `/sitemap/{city}/{code}/`
    pub fn from_url(url: &Url) -> Result<Self, UrlFormatError> {
        let malformed = || UrlFormatError::AreaPath {
            url: url.to_string(),
        };

        let mut segments: Vec<&str> = url.path_segments().ok_or_else(malformed)?.collect();
        if segments.last() == Some(&"") {
            segments.pop();
        }

        match segments.as_slice() {
            ["sitemap", city, code] if is_valid_city_slug(city) && !code.is_empty() => Ok(Self {
                city: city.to_string(),
                code: code.to_string(),
                url: with_trailing_slash(url),
            }),
            _ => Err(malformed()),
        }
    }

    /// Parses `url` and derives the area reference
    pub fn parse(url: &str) -> Result<Self, UrlFormatError> {
        let parsed = Url::parse(url).map_err(|_| UrlFormatError::AreaPath {
            url: url.to_string(),
        })?;
        Self::from_url(&parsed)
    }
}

/// Relative sound hrefs resolve against the area only when its path is a directory
fn with_trailing_slash(url: &Url) -> Url {
    let mut normalized = url.clone();
    if !normalized.path().ends_with('/') {
        let path = format!("{}/", normalized.path());
        normalized.set_path(&path);
    }
    normalized
}

/// Last non-empty path segment of a URL
pub fn last_path_segment(url: &Url) -> Option<String> {
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .map(str::to_string)
}

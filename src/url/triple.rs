use crate::UrlFormatError;
use url::Url;

/// Path segments identifying one restaurant within the site hierarchy
///
/// A restaurant URL looks like `/{city}/{top_level_area}/{lower_level_area}/{restaurant_id}/`.
/// Only used to derive a stable file name; never persisted on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTriple {
    pub city: String,
    pub top_level_area: String,
    pub lower_level_area: String,
    pub restaurant_id: String,
}

impl UrlTriple {
    /// Extracts the triple from a restaurant URL
    ///
    /// Segments past the restaurant ID (review or menu sub-pages) are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use url::Url;
    /// use good_spots::url::UrlTriple;
    ///
    /// let url = Url::parse("https://tabelog.com/tokyo/A1317/A131706/13120700/").unwrap();
    /// let triple = UrlTriple::from_url(&url).unwrap();
    /// assert_eq!(triple.file_name(), "tokyo-A1317-A131706-13120700.html");
    /// ```
    pub fn from_url(url: &Url) -> Result<Self, UrlFormatError> {
        let malformed = || UrlFormatError::RestaurantPath {
            url: url.to_string(),
        };

        let mut segments: Vec<&str> = url.path_segments().ok_or_else(malformed)?.collect();
        if segments.last() == Some(&"") {
            segments.pop();
        }

        match segments.as_slice() {
            [city, top, lower, id, ..]
                if [city, top, lower, id].iter().all(|s| !s.is_empty()) =>
            {
                Ok(Self {
                    city: city.to_string(),
                    top_level_area: top.to_string(),
                    lower_level_area: lower.to_string(),
                    restaurant_id: id.to_string(),
                })
            }
            _ => Err(malformed()),
        }
    }

    /// Parses `url` and extracts the triple
    pub fn parse(url: &str) -> Result<Self, UrlFormatError> {
        let parsed = Url::parse(url).map_err(|_| UrlFormatError::RestaurantPath {
            url: url.to_string(),
        })?;
        Self::from_url(&parsed)
    }

    /// Segments joined by hyphens, without extension
    pub fn file_stem(&self) -> String {
        format!(
            "{}-{}-{}-{}",
            self.city, self.top_level_area, self.lower_level_area, self.restaurant_id
        )
    }

    /// Name of the raw page capture
    pub fn file_name(&self) -> String {
        format!("{}.html", self.file_stem())
    }
}

/// Naming policy for files derived from a restaurant URL
///
/// The sink appends the extension appropriate to what it writes.
pub trait FileNamer {
    fn file_stem(&self, url: &Url) -> Result<String, UrlFormatError>;
}

/// Names files after the restaurant's [`UrlTriple`]
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlTripleNamer;

impl FileNamer for UrlTripleNamer {
    fn file_stem(&self, url: &Url) -> Result<String, UrlFormatError> {
        UrlTriple::from_url(url).map(|triple| triple.file_stem())
    }
}

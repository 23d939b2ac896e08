//! Site-specific link predicates for each sitemap level
//!
//! All predicates take already-resolved absolute URLs; relative hrefs are
//! resolved by the link extractor before they get here.

use percent_encoding::percent_decode_str;
use url::Url;

/// Longest sound grouping segment, in characters
const MAX_SOUND_SEGMENT_CHARS: usize = 2;

/// Checks whether two URLs share scheme, host and port
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.origin() == b.origin()
}

/// Checks whether a link on a city sitemap points at one of its areas
///
/// Area links live at `/sitemap/{city}/A.../` on the same site as `base`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use good_spots::url::is_area_link;
///
/// let base = Url::parse("https://tabelog.com/").unwrap();
/// let area = Url::parse("https://tabelog.com/sitemap/tokyo/A1301-A130101/").unwrap();
/// let other = Url::parse("https://tabelog.com/sitemap/osaka/A2701-A270101/").unwrap();
///
/// assert!(is_area_link(&area, &base, "tokyo"));
/// assert!(!is_area_link(&other, &base, "tokyo"));
/// ```
pub fn is_area_link(url: &Url, base: &Url, city: &str) -> bool {
    if !same_origin(url, base) || url.query().is_some() {
        return false;
    }

    let path = url.path();
    path.starts_with(&format!("/sitemap/{}/A", city)) && path.ends_with('/')
}

/// Returns the decoded sound segment if `url` is a sound sub-page of `area_url`
///
/// A sound sub-page is a direct child of the area page whose single path
/// segment is one or two characters long once percent-decoding is undone.
/// Characters are counted as Unicode scalar values so kana groupings measure
/// the same as their romanised forms.
pub fn sound_segment(url: &Url, area_url: &Url) -> Option<String> {
    if !same_origin(url, area_url) || url.query().is_some() || url.fragment().is_some() {
        return None;
    }

    let area_path = area_url.path().trim_end_matches('/');
    let rest = url.path().strip_prefix(area_path)?.strip_prefix('/')?;
    let segment = rest.strip_suffix('/')?;

    if segment.is_empty() || segment.contains('/') {
        return None;
    }

    let decoded = percent_decode_str(segment).decode_utf8().ok()?;
    let length = decoded.chars().count();
    if length == 0 || length > MAX_SOUND_SEGMENT_CHARS {
        return None;
    }

    Some(decoded.into_owned())
}

/// Checks whether a link is a restaurant detail page within `city`
///
/// Restaurant pages live at `/{city}/A<digits>/A<digits>/<digits>/`. Deeper
/// pages under a restaurant (reviews, menus, photos) are not matched.
pub fn is_restaurant_link(url: &Url, base: &Url, city: &str) -> bool {
    if !same_origin(url, base) || url.query().is_some() {
        return false;
    }

    let Some(path) = url.path().strip_prefix('/') else {
        return false;
    };
    let Some(path) = path.strip_suffix('/') else {
        return false;
    };

    let segments: Vec<&str> = path.split('/').collect();
    match segments.as_slice() {
        [slug, top, lower, id] => {
            *slug == city && is_area_code(top) && is_area_code(lower) && is_numeric(id)
        }
        _ => false,
    }
}

/// Checks a city slug is usable as a single path segment
pub fn is_valid_city_slug(city: &str) -> bool {
    !city.is_empty()
        && city
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn is_area_code(segment: &str) -> bool {
    segment.strip_prefix('A').is_some_and(is_numeric)
}

fn is_numeric(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit())
}

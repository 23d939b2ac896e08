//! URL handling module for Good Spots
//!
//! This module provides the link predicates for each sitemap level, area URL
//! decomposition, and the naming policy that turns a restaurant URL into a
//! file name.

mod area;
mod matcher;
mod triple;

// Re-export main functions
pub use area::{last_path_segment, AreaRef};
pub use matcher::{
    is_area_link, is_restaurant_link, is_valid_city_slug, same_origin, sound_segment,
};
pub use triple::{FileNamer, UrlTriple, UrlTripleNamer};

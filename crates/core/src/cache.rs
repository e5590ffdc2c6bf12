//! Cache-Control policy for uploaded objects

/// Directive for HTML entry points, which must always be revalidated
pub const NO_CACHE: &str = "no-cache, no-store, must-revalidate";

/// Directive for fingerprinted static assets
pub const IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Resolve the Cache-Control header for an object
///
/// The `.html` rule is checked before the `/assets/` rule, so an HTML file
/// under an assets directory is still never cached. Objects matching
/// neither rule get no Cache-Control header.
pub fn cache_control(file_name: &str, key: &str) -> Option<&'static str> {
    if file_name.ends_with(".html") {
        Some(NO_CACHE)
    } else if key.contains("/assets/") {
        Some(IMMUTABLE)
    } else {
        None
    }
}

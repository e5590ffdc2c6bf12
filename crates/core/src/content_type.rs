//! Content-Type resolution from file extensions

use std::path::Path;

/// Content type used when the extension is unknown or missing
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Lowercase extension (with leading dot) to MIME type
const CONTENT_TYPES: &[(&str, &str)] = &[
    (".html", "text/html; charset=utf-8"),
    (".css", "text/css; charset=utf-8"),
    (".js", "application/javascript; charset=utf-8"),
    (".json", "application/json; charset=utf-8"),
    (".png", "image/png"),
    (".jpg", "image/jpeg"),
    (".jpeg", "image/jpeg"),
    (".gif", "image/gif"),
    (".svg", "image/svg+xml"),
    (".ico", "image/x-icon"),
    (".webp", "image/webp"),
    (".woff", "font/woff"),
    (".woff2", "font/woff2"),
    (".ttf", "font/ttf"),
    (".eot", "application/vnd.ms-fontobject"),
    (".map", "application/json"),
    (".txt", "text/plain; charset=utf-8"),
    (".xml", "application/xml"),
];

/// Resolve the Content-Type for a file name
///
/// The lookup is case-insensitive on the extension. Names without an
/// extension, including dotfiles such as `.env`, resolve to
/// [`DEFAULT_CONTENT_TYPE`].
pub fn content_type_for(file_name: &str) -> &'static str {
    let Some(ext) = Path::new(file_name).extension() else {
        return DEFAULT_CONTENT_TYPE;
    };
    let ext = format!(".{}", ext.to_string_lossy().to_lowercase());

    CONTENT_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

//! Storage capability used by the uploader
//!
//! The uploader only ever needs to write a local file to a key, so the
//! trait stays that narrow. SDK adapters implement it; tests mock it.

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

/// Headers attached to every uploaded object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectHeaders {
    /// Value of the `Content-Type` header
    pub content_type: String,
    /// Value of the `Cache-Control` header, omitted when `None`
    pub cache_control: Option<&'static str>,
}

impl ObjectHeaders {
    /// Resolve headers for a file name uploaded under `key`
    pub fn for_file(file_name: &str, key: &str) -> Self {
        Self {
            content_type: crate::content_type::content_type_for(file_name).to_string(),
            cache_control: crate::cache::cache_control(file_name, key),
        }
    }
}

/// Object storage operations required by the uploader
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload the contents of `local_path` to `bucket/key` with the given headers
    async fn put_object_from_file(
        &self,
        bucket: &str,
        key: &str,
        local_path: &Path,
        headers: &ObjectHeaders,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_for_html() {
        let headers = ObjectHeaders::for_file("index.html", "site/index.html");
        assert_eq!(headers.content_type, "text/html; charset=utf-8");
        assert_eq!(headers.cache_control, Some(crate::cache::NO_CACHE));
    }

    #[test]
    fn test_headers_for_plain_file() {
        let headers = ObjectHeaders::for_file("robots.txt", "robots.txt");
        assert_eq!(headers.content_type, "text/plain; charset=utf-8");
        assert_eq!(headers.cache_control, None);
    }
}

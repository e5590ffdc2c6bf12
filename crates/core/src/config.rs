//! Connection settings and pre-flight validation

use std::fmt;
use std::path::Path;

use url::Url;

use crate::error::{Error, Result};

/// Region used when none is given on the command line
pub const DEFAULT_REGION: &str = "ap-southeast-1";

/// Derive the service endpoint for a region
pub fn endpoint_for_region(region: &str) -> String {
    format!("https://oss-{region}.aliyuncs.com")
}

/// Access key pair passed to the storage service
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub access_key_secret: String,
}

impl Credentials {
    pub fn new(access_key_id: impl Into<String>, access_key_secret: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"***")
            .finish()
    }
}

/// Everything needed to construct a storage client
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Absolute http(s) endpoint URL
    pub endpoint: String,
    /// Region used for request signing
    pub region: String,
    pub credentials: Credentials,
    /// Address buckets as `endpoint/bucket` instead of `bucket.endpoint`
    pub path_style: bool,
}

impl StoreConfig {
    /// Build a config, deriving the endpoint from the region unless one is given
    pub fn new(
        region: impl Into<String>,
        endpoint: Option<String>,
        credentials: Credentials,
        path_style: bool,
    ) -> Result<Self> {
        let region = region.into();
        if region.trim().is_empty() {
            return Err(Error::Config("region cannot be empty".to_string()));
        }

        let endpoint = match endpoint {
            Some(e) => e,
            None => endpoint_for_region(&region),
        };
        validate_endpoint(&endpoint)?;

        Ok(Self {
            endpoint,
            region,
            credentials,
            path_style,
        })
    }
}

fn validate_endpoint(endpoint: &str) -> Result<()> {
    let url = Url::parse(endpoint)
        .map_err(|e| Error::Config(format!("invalid endpoint '{endpoint}': {e}")))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(Error::Config(format!(
                "invalid endpoint '{endpoint}': unsupported scheme '{other}'"
            )));
        }
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(Error::Config(format!("invalid endpoint '{endpoint}': missing host")));
    }

    Ok(())
}

/// Check that the upload source exists and is a directory
pub fn ensure_source_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else if path.exists() {
        Err(Error::Config(format!(
            "source is not a directory: {}",
            path.display()
        )))
    } else {
        Err(Error::Config(format!(
            "source directory does not exist: {}",
            path.display()
        )))
    }
}

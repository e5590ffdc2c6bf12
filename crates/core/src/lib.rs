//! ossync-core: Core library for the ossync uploader
//!
//! This crate provides everything the uploader does that is not tied to a
//! particular storage SDK:
//! - Content-type resolution from file extensions
//! - Cache-control policy for uploaded objects
//! - Endpoint and source directory configuration
//! - The ObjectStore trait the uploader writes through
//! - The directory walker that turns files into uploads
//!
//! Keeping the SDK out of this crate lets the walker be tested against a
//! mocked store.

pub mod cache;
pub mod config;
pub mod content_type;
pub mod error;
pub mod traits;
pub mod upload;

pub use cache::cache_control;
pub use config::{Credentials, DEFAULT_REGION, StoreConfig, endpoint_for_region, ensure_source_dir};
pub use content_type::{DEFAULT_CONTENT_TYPE, content_type_for};
pub use error::{Error, Result};
pub use traits::{ObjectHeaders, ObjectStore};
pub use upload::{UploadSummary, UploadTask, object_key, upload_directory};

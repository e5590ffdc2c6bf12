//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from ossync-core.

use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use ossync_core::{Credentials, Error, ObjectHeaders, ObjectStore, Result, StoreConfig};

/// Service error codes that mean the request was not authorized
const AUTH_ERROR_CODES: &[&str] = &[
    "AccessDenied",
    "InvalidAccessKeyId",
    "SignatureDoesNotMatch",
    "InvalidSecurity",
    "ExpiredToken",
];

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
    config: StoreConfig,
}

impl S3Client {
    /// Create a new S3 client from a store configuration
    ///
    /// No request is sent here; credentials are only checked by the service
    /// on the first upload.
    pub async fn new(config: StoreConfig) -> Self {
        let credentials = Self::authenticate(&config.credentials);

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(aws_config::Region::new(config.region.clone()))
            .endpoint_url(&config.endpoint)
            .load()
            .await;

        // Checksums only when the operation demands them; non-AWS services
        // reject the default trailing checksum on PutObject.
        // Each upload is attempted exactly once.
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.path_style)
            .retry_config(aws_sdk_s3::config::retry::RetryConfig::disabled())
            .request_checksum_calculation(
                aws_sdk_s3::config::RequestChecksumCalculation::WhenRequired,
            )
            .build();

        tracing::debug!(
            endpoint = %config.endpoint,
            region = %config.region,
            path_style = config.path_style,
            "Created S3 client"
        );

        Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
            config,
        }
    }

    /// Turn an access key pair into a static credentials provider
    pub fn authenticate(credentials: &Credentials) -> aws_credential_types::Credentials {
        aws_credential_types::Credentials::new(
            credentials.access_key_id.clone(),
            credentials.access_key_secret.clone(),
            None, // session token
            None, // expiry
            "ossync-static-credentials",
        )
    }

    /// Endpoint this client sends requests to
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Get the underlying aws-sdk-s3 client
    pub fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }

    /// Map an SDK error into an ossync error with a detailed message
    fn map_sdk_error<E>(error: &SdkError<E>) -> Error
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
    {
        match error {
            SdkError::ServiceError(service_err) => {
                let err = service_err.err();
                let status = service_err.raw().status().as_u16();
                let code = err.code().unwrap_or("Unknown");
                let mut msg = format!("Service error: {code} (status: {status})");
                if let Some(message) = err.message() {
                    msg.push_str(&format!(": {message}"));
                }
                if AUTH_ERROR_CODES.contains(&code) || status == 401 || status == 403 {
                    Error::Auth(msg)
                } else {
                    Error::Network(msg)
                }
            }
            SdkError::ConstructionFailure(err) => {
                Error::General(format!("Request construction failed: {err:?}"))
            }
            SdkError::TimeoutError(_) => Error::Network("Request timeout".to_string()),
            SdkError::DispatchFailure(err) => {
                Error::Network(format!("Network dispatch error: {err:?}"))
            }
            SdkError::ResponseError(err) => Error::Network(format!("Response error: {err:?}")),
            _ => Error::Network(error.to_string()),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn put_object_from_file(
        &self,
        bucket: &str,
        key: &str,
        local_path: &Path,
        headers: &ObjectHeaders,
    ) -> Result<()> {
        let body = ByteStream::from_path(local_path).await.map_err(|e| {
            Error::General(format!("Failed to read {}: {e}", local_path.display()))
        })?;

        let mut request = self
            .inner
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .content_type(&headers.content_type);

        if let Some(cc) = headers.cache_control {
            request = request.cache_control(cc);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Self::map_sdk_error(&e))?;

        tracing::debug!(
            bucket,
            key,
            etag = response.e_tag().unwrap_or_default(),
            "Uploaded object"
        );

        Ok(())
    }
}

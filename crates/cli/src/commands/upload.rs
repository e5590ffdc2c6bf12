//! upload command - Upload a local directory to a bucket
//!
//! Validates the source directory, builds the storage client, uploads every
//! file under the source and reports one line per file plus a summary.

use std::path::PathBuf;

use clap::Args;
use ossync_core::{Credentials, DEFAULT_REGION, StoreConfig, ensure_source_dir, upload_directory};
use ossync_s3::S3Client;
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

const SEPARATOR: &str = "----------------------------------------";

/// Arguments for uploading a directory
#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Access key ID for the storage service
    #[arg(long)]
    pub access_key_id: String,

    /// Access key secret for the storage service
    #[arg(long)]
    pub access_key_secret: String,

    /// Target bucket name
    #[arg(long)]
    pub bucket: String,

    /// Service region, used to derive the endpoint
    #[arg(long, default_value = DEFAULT_REGION)]
    pub region: String,

    /// Local directory to upload
    #[arg(long)]
    pub source_dir: PathBuf,

    /// Key prefix prepended to every uploaded object
    #[arg(long, default_value = "")]
    pub prefix: String,

    /// Endpoint URL overriding the one derived from the region
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Use path-style bucket addressing (endpoint/bucket/key)
    #[arg(long)]
    pub path_style: bool,
}

#[derive(Debug, Serialize)]
struct UploadOutput {
    endpoint: String,
    bucket: String,
    source: String,
    prefix: String,
    uploaded: usize,
    failed: usize,
    failures: Vec<FailedObject>,
}

#[derive(Debug, Serialize)]
struct FailedObject {
    key: String,
    error: String,
}

/// Execute the upload command
pub async fn execute(args: UploadArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    // Nothing touches the network until the source is known to be usable
    if let Err(e) = ensure_source_dir(&args.source_dir) {
        formatter.error(&e.to_string());
        return ExitCode::GeneralError;
    }

    let credentials = Credentials::new(&args.access_key_id, &args.access_key_secret);
    let store_config = match StoreConfig::new(
        &args.region,
        args.endpoint.clone(),
        credentials,
        args.path_style,
    ) {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::GeneralError;
        }
    };

    let client = S3Client::new(store_config).await;

    let source = args.source_dir.display().to_string();
    tracing::debug!(bucket = %args.bucket, source = %source, prefix = %args.prefix, "Starting upload");
    print_preflight(&formatter, client.endpoint(), &args.bucket, &source, &args.prefix);

    let mut failures = Vec::new();
    let summary = upload_directory(
        &client,
        &args.bucket,
        &args.source_dir,
        &args.prefix,
        |key, result| match result {
            Ok(()) => formatter.success(key),
            Err(e) => {
                formatter.failure(&format!("{key}: {e}"));
                failures.push(FailedObject {
                    key: key.to_string(),
                    error: e.to_string(),
                });
            }
        },
    )
    .await;

    if formatter.is_json() {
        formatter.json(&UploadOutput {
            endpoint: client.endpoint().to_string(),
            bucket: args.bucket.clone(),
            source,
            prefix: args.prefix.clone(),
            uploaded: summary.uploaded,
            failed: summary.failed,
            failures,
        });
    } else {
        if summary.uploaded == 0 && summary.failed == 0 {
            formatter.warning(&format!("No files found under {source}"));
        }
        formatter.println(&formatter.style_dim(SEPARATOR));
        formatter.println(&summary.to_string());
    }

    ExitCode::from_summary(&summary)
}

fn print_preflight(formatter: &Formatter, endpoint: &str, bucket: &str, source: &str, prefix: &str) {
    let prefix = if prefix.is_empty() {
        formatter.style_dim("(none)")
    } else {
        prefix.to_string()
    };

    formatter.println(&format!(
        "{} {}",
        formatter.style_key("Endpoint:"),
        formatter.style_url(endpoint)
    ));
    formatter.println(&format!(
        "{} {}",
        formatter.style_key("Bucket:"),
        formatter.style_name(bucket)
    ));
    formatter.println(&format!("{} {source}", formatter.style_key("Source:")));
    formatter.println(&format!("{} {prefix}", formatter.style_key("Prefix:")));
    formatter.println("");
    formatter.println("Uploading files...");
    formatter.println(&formatter.style_dim(SEPARATOR));
}

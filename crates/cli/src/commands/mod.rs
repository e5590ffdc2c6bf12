//! Command-line definition and dispatch

use clap::Parser;

use crate::exit_code::ExitCode;
use crate::output::OutputConfig;

pub mod upload;

/// Upload a local directory to an object storage bucket
#[derive(Parser, Debug)]
#[command(name = "ossync", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub upload: upload::UploadArgs,

    /// Output a JSON summary instead of text
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Only print failures and errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Run the upload described by the parsed command line
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        quiet: cli.quiet,
    };

    upload::execute(cli.upload, output_config).await
}

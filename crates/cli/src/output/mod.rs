//! Output handling for human-readable and JSON modes

mod formatter;

pub use formatter::Formatter;

/// Output options shared by every command
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Emit a single JSON document instead of text
    pub json: bool,
    /// Disable colored output
    pub no_color: bool,
    /// Only print failures and errors
    pub quiet: bool,
}

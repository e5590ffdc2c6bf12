//! Process exit codes

use ossync_core::UploadSummary;

/// Exit status reported to the shell
///
/// Argument errors are reported by clap with its own status (2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Every file was uploaded, or there was nothing to upload
    Success = 0,
    /// Invalid source directory or endpoint, or a failed upload
    GeneralError = 1,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Any failed file makes the whole run fail
    pub fn from_summary(summary: &UploadSummary) -> Self {
        if summary.is_success() {
            ExitCode::Success
        } else {
            ExitCode::GeneralError
        }
    }
}

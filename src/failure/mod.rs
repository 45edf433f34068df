//! Failure classification: how far a failure reaches into the run.
//!
//! Every error is caught by the component that owns the failing entity and
//! turned into a log line plus a signal. [`FailureKind`] records which of the
//! four outcomes applies so log lines carry the same vocabulary everywhere.

use crate::download::DownloadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FailureKind {
    /// Stops the whole run: album page unreachable, table missing, no rows.
    FatalToRun,
    /// Skips the current row; the run continues with the next one.
    FatalToRow,
    /// A download attempt failed and may be retried.
    Retryable,
    /// A candidate media URL or filename was refused before any request.
    RejectedInput,
}

impl FailureKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::FatalToRun => "fatal-to-run",
            Self::FatalToRow => "fatal-to-row",
            Self::Retryable => "retryable",
            Self::RejectedInput => "rejected-input",
        }
    }
}

/// Classifies a download error.
///
/// Errors from a single attempt are retryable; once the budget is spent the
/// failure only costs the current row.
#[must_use]
pub fn classify_download_error(error: &DownloadError) -> FailureKind {
    match error {
        DownloadError::InvalidMediaUrl { .. } | DownloadError::EmptyFilename { .. } => {
            FailureKind::RejectedInput
        }
        DownloadError::RetriesExhausted { .. } => FailureKind::FatalToRow,
        DownloadError::Network { .. }
        | DownloadError::Timeout { .. }
        | DownloadError::HttpStatus { .. }
        | DownloadError::Io { .. } => FailureKind::Retryable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_rejected_input() {
        let error = DownloadError::invalid_media_url("/cp/a.mp3");
        assert_eq!(classify_download_error(&error), FailureKind::RejectedInput);
        let error = DownloadError::empty_filename("https://cdn.example/a.mp3");
        assert_eq!(classify_download_error(&error), FailureKind::RejectedInput);
    }

    #[test]
    fn test_classify_attempt_errors_are_retryable() {
        let error = DownloadError::http_status("https://cdn.example/a.mp3", 500);
        assert_eq!(classify_download_error(&error), FailureKind::Retryable);
        let error = DownloadError::io(
            "/tmp/downloaded/a.mp3",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(classify_download_error(&error), FailureKind::Retryable);
    }

    #[test]
    fn test_classify_exhausted_is_fatal_to_row() {
        let error = DownloadError::retries_exhausted(
            "https://cdn.example/a.mp3",
            3,
            DownloadError::Timeout {
                url: "https://cdn.example/a.mp3".to_string(),
            },
        );
        assert_eq!(classify_download_error(&error), FailureKind::FatalToRow);
    }

    #[test]
    fn test_labels_are_distinct() {
        let labels = [
            FailureKind::FatalToRun.label(),
            FailureKind::FatalToRow.label(),
            FailureKind::Retryable.label(),
            FailureKind::RejectedInput.label(),
        ];
        for (i, a) in labels.iter().enumerate() {
            for b in &labels[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for people photographing a whiteboard.
//
// Every technical error maps to plain English with a suggestion and the
// HTTP-style status code a serving layer should answer with.

use crate::error::TafelError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A collaborator hiccup; the same request may succeed later.
    Transient,
    /// The user must change the photo or the request.
    ActionRequired,
    /// Something is wrong on our side; retrying will not help.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Whether an automatic retry makes sense. Segmentation is deterministic,
    /// so only collaborator failures qualify.
    pub retriable: bool,
    pub severity: Severity,
    /// Status code for an HTTP front end (400, 413, 415, 422 or 500).
    pub status_code: u16,
}

/// Convert a `TafelError` into a `HumanError`.
pub fn humanize_error(err: &TafelError) -> HumanError {
    match err {
        TafelError::NoRegionsDetected => HumanError {
            message: "No mathematical problems were found on the board.".into(),
            suggestion: "Make sure the writing is dark, in focus and fills a good part of the photo, then try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
            status_code: 400,
        },

        TafelError::InvalidTargetCount { min, max, .. } => HumanError {
            message: "The number of expected problems is out of range.".into(),
            suggestion: format!("Ask for between {min} and {max} problems."),
            retriable: false,
            severity: Severity::ActionRequired,
            status_code: 422,
        },

        TafelError::InvalidPaddingRatio(ratio) => HumanError {
            message: "The crop margin is out of range.".into(),
            suggestion: format!("Use a padding ratio between 0.0 and 1.0 (got {ratio})."),
            retriable: false,
            severity: Severity::ActionRequired,
            status_code: 422,
        },

        TafelError::InvalidImage(_) | TafelError::ImageError(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
            status_code: 400,
        },

        TafelError::UnsupportedFormat(detail) => HumanError {
            message: "This type of file isn't supported.".into(),
            suggestion: format!("Upload a PNG, JPEG, WebP or BMP photo. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
            status_code: 415,
        },

        TafelError::FileTooLarge { max, .. } => HumanError {
            message: "This photo is too large.".into(),
            suggestion: format!(
                "Photos can be at most {} MB. Try a lower resolution.",
                max / (1024 * 1024)
            ),
            retriable: false,
            severity: Severity::ActionRequired,
            status_code: 413,
        },

        TafelError::Recognition(_) | TafelError::Normalization(_) => HumanError {
            message: "A problem could not be read.".into(),
            suggestion: "The recognition service may be busy. Try again in a moment.".into(),
            retriable: true,
            severity: Severity::Transient,
            status_code: 500,
        },

        TafelError::InvalidConfig(detail) => HumanError {
            message: "The segmentation settings are invalid.".into(),
            suggestion: format!("Fix the configuration and try again. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
            status_code: 500,
        },

        TafelError::Io(io_err) => HumanError {
            message: "A file could not be read or written.".into(),
            suggestion: format!("Check the path and permissions. ({io_err})"),
            retriable: false,
            severity: Severity::Permanent,
            status_code: 500,
        },

        TafelError::Serialization(_) => HumanError {
            message: "Some data could not be read.".into(),
            suggestion: "Check that the configuration file is valid JSON.".into(),
            retriable: false,
            severity: Severity::Permanent,
            status_code: 500,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_board_is_a_bad_request() {
        let human = humanize_error(&TafelError::NoRegionsDetected);
        assert_eq!(human.status_code, 400);
        assert!(!human.retriable);
    }

    #[test]
    fn target_count_is_unprocessable() {
        let human = humanize_error(&TafelError::InvalidTargetCount {
            target: 0,
            min: 1,
            max: 20,
        });
        assert_eq!(human.status_code, 422);
        assert!(human.suggestion.contains("between 1 and 20"));
    }

    #[test]
    fn collaborator_failures_are_retriable() {
        let human = humanize_error(&TafelError::Recognition("timeout".into()));
        assert!(human.retriable);
        assert_eq!(human.severity, Severity::Transient);
    }

    #[test]
    fn oversized_upload_mentions_limit() {
        let human = humanize_error(&TafelError::FileTooLarge {
            size: 20 * 1024 * 1024,
            max: 10 * 1024 * 1024,
        });
        assert_eq!(human.status_code, 413);
        assert!(human.suggestion.contains("10 MB"));
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for shell surfaces.
//
// Every engine error is mapped to plain English with a clear suggestion so
// callers can show it directly, without interpreting the taxonomy themselves.

use crate::error::FyloraError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Environment problem (missing renderer, missing models) — may work on
    /// another device or after setup.
    Transient,
    /// User must change their input (supply a password, pick another file).
    ActionRequired,
    /// Cannot be fixed by retrying or changing options.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `FyloraError` into a `HumanError` suitable for direct display.
pub fn humanize_error(err: &FyloraError) -> HumanError {
    match err {
        FyloraError::UnsupportedOperation(id) => HumanError {
            message: "This tool isn't available.".into(),
            suggestion: format!("\"{id}\" is not a supported operation on this device."),
            severity: Severity::Permanent,
        },

        FyloraError::NoInput => HumanError {
            message: "No file was selected.".into(),
            suggestion: "Choose at least one file, then try again.".into(),
            severity: Severity::ActionRequired,
        },

        FyloraError::MissingPassword => HumanError {
            message: "A password is needed.".into(),
            suggestion: "Enter a password, then run the operation again.".into(),
            severity: Severity::ActionRequired,
        },

        FyloraError::IncorrectPassword => HumanError {
            message: "That password didn't work.".into(),
            suggestion: "Check the password and try again.".into(),
            severity: Severity::ActionRequired,
        },

        FyloraError::CorruptedDocument(detail) => HumanError {
            message: "This PDF couldn't be read.".into(),
            suggestion: format!("The file may be damaged or not a real PDF. ({detail})"),
            severity: Severity::Permanent,
        },

        FyloraError::MissingSearchText => HumanError {
            message: "No search text was given.".into(),
            suggestion: "Type the text you want to annotate, then try again.".into(),
            severity: Severity::ActionRequired,
        },

        FyloraError::TextNotFound(term) => HumanError {
            message: format!("\"{term}\" wasn't found."),
            suggestion: "Check the spelling, or search for a shorter phrase.".into(),
            severity: Severity::ActionRequired,
        },

        FyloraError::Render(detail) => HumanError {
            message: "Pages couldn't be rendered.".into(),
            suggestion: format!("The page renderer isn't available here. ({detail})"),
            severity: Severity::Transient,
        },

        FyloraError::Ocr(detail) => HumanError {
            message: "Text recognition failed.".into(),
            suggestion: format!("OCR models may be missing on this device. ({detail})"),
            severity: Severity::Transient,
        },

        FyloraError::Encryption(detail) => HumanError {
            message: "The PDF couldn't be protected.".into(),
            suggestion: format!("Try again with a different file. ({detail})"),
            severity: Severity::Permanent,
        },

        FyloraError::Pdf(detail) | FyloraError::Archive(detail) | FyloraError::Image(detail) => {
            HumanError {
                message: "Something went wrong while processing.".into(),
                suggestion: format!("Try again with a different file. ({detail})"),
                severity: Severity::Permanent,
            }
        }

        FyloraError::Io(err) => HumanError {
            message: "A file couldn't be read or written.".into(),
            suggestion: format!("Check disk space and permissions. ({err})"),
            severity: Severity::Transient,
        },

        FyloraError::Serialization(err) => HumanError {
            message: "Settings couldn't be read.".into(),
            suggestion: format!("Reset the tool options and try again. ({err})"),
            severity: Severity::Permanent,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_password_is_actionable() {
        let human = humanize_error(&FyloraError::IncorrectPassword);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.message.contains("password"));
    }

    #[test]
    fn text_not_found_names_the_term() {
        let human = humanize_error(&FyloraError::TextNotFound("invoice".into()));
        assert!(human.message.contains("invoice"));
    }
}

//! Error handling for the weld CLI.
//!
//! Structured errors with user-facing messages, actionable suggestions,
//! and exit-code mapping.

use std::error::Error as _;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use weld_core::error::{ErrorCategory as CoreCategory, WeldError};

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// The requested root path does not exist or is not a directory.
    #[error("invalid path: {}", .path.display())]
    InvalidPath { path: PathBuf },

    /// An error propagated from the core.
    ///
    /// Wrapped here so the CLI can attach suggestions drawn from the core
    /// error's category without touching core internals.
    #[error("generation failed: {0}")]
    Core(#[from] WeldError),

    /// An I/O operation failed outside the core.
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// User-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidPath { path } => vec![
                format!("'{}' is not a directory", path.display()),
                "Pass --path pointing at a directory containing a manifest".into(),
            ],
            Self::Core(core) => core.suggestions(),
            Self::Io { message, .. } => vec![
                format!("I/O operation failed: {message}"),
                "Check file permissions and available disk space".into(),
            ],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidPath { .. } => ErrorCategory::UserError,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::Io { .. } => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "\n{} {}\n\n",
            "\u{2717}".red().bold(),
            "Error:".red().bold()
        ));
        out.push_str(&format!("  {}\n", self.to_string().red()));

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                out.push_str(&format!("  {} {}\n", "\u{2192}".dimmed(), err.to_string().dimmed()));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                out.push_str(&format!("  {suggestion}\n"));
            }
        }
        out
    }

    /// Plain-text version of [`Self::format_colored`] — no ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!("\nError: {self}\n"));

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                out.push_str(&format!("  Caused by: {err}\n"));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for suggestion in &suggestions {
                out.push_str(&format!("  {suggestion}\n"));
            }
        }
        out
    }

    /// Log the error using tracing, at a severity matching its category.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("user error: {self}"),
            ErrorCategory::NotFound => tracing::warn!("not found: {self}"),
            ErrorCategory::Configuration => tracing::error!("configuration error: {self}"),
            ErrorCategory::Internal => tracing::error!("internal error: {self}"),
        }
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UserError,
    NotFound,
    Configuration,
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use weld_core::manifest::ManifestError;

    #[test]
    fn manifest_not_found_exits_with_three() {
        let err = CliError::Core(WeldError::Manifest(ManifestError::NotFound(PathBuf::from(
            "/x",
        ))));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn invalid_path_is_a_user_error() {
        let err = CliError::InvalidPath {
            path: PathBuf::from("/nope"),
        };
        assert_eq!(err.exit_code(), 2);
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn format_plain_contains_error_and_suggestions() {
        let err = CliError::InvalidPath {
            path: PathBuf::from("/nope"),
        };
        let formatted = err.format_plain(false);
        assert!(formatted.contains("Error:"));
        assert!(formatted.contains("Suggestions:"));
    }
}

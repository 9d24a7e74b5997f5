//! Centralized error handling for wattscope.
//!
//! Three categories matter to callers:
//!
//! - [`WattscopeError::Load`]: the dataset could not be read or parsed.
//!   Fatal to initialization; the GUI renders a terminal error panel.
//! - [`WattscopeError::InsufficientData`]: a derived computation had too few
//!   valid observations for the current filter combination. Recovered locally
//!   by the affected chart (empty/placeholder render), never propagated to
//!   other charts.
//! - [`WattscopeError::DimensionMismatch`]: a programming-contract violation
//!   (mismatched series lengths passed to correlation). A defect, not a
//!   runtime condition to recover from.

use std::fmt;

/// Main error type for wattscope operations.
#[derive(Debug)]
pub enum WattscopeError {
    /// Dataset read/parse failure (missing file, malformed rows,
    /// missing required column).
    Load(String),

    /// A derived computation has too few valid observations.
    InsufficientData(String),

    /// Mismatched series lengths passed to a paired computation.
    DimensionMismatch { left: usize, right: usize },

    /// I/O errors (file operations, log directory, etc.)
    Io(std::io::Error),

    /// Generic error with context.
    Other(String),
}

impl fmt::Display for WattscopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(msg) => write!(f, "Data load error: {msg}"),
            Self::InsufficientData(msg) => write!(f, "Insufficient data: {msg}"),
            Self::DimensionMismatch { left, right } => {
                write!(f, "Dimension mismatch: {left} vs {right} observations")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for WattscopeError {}

impl From<std::io::Error> for WattscopeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for WattscopeError {
    fn from(err: csv::Error) -> Self {
        Self::Load(err.to_string())
    }
}

impl From<anyhow::Error> for WattscopeError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

/// Result type alias for wattscope operations.
pub type Result<T> = std::result::Result<T, WattscopeError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<WattscopeError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: WattscopeError = e.into();
            WattscopeError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: WattscopeError = e.into();
            WattscopeError::Other(format!("{}: {}", f(), err))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WattscopeError::Load("missing column 'Year'".to_owned());
        assert_eq!(err.to_string(), "Data load error: missing column 'Year'");
    }

    #[test]
    fn test_dimension_mismatch_display() {
        let err = WattscopeError::DimensionMismatch { left: 4, right: 7 };
        assert_eq!(err.to_string(), "Dimension mismatch: 4 vs 7 observations");
    }

    #[test]
    fn test_result_context() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "energy.csv",
        ));

        let result: Result<()> = result.context("Failed to read dataset");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read dataset")
        );
    }
}

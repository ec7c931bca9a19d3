//! Error types shared by every engine

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the projection engines and catalog loaders
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid parameter `{field}`: {reason}")]
    InvalidParameters { field: String, reason: String },

    #[error("Malformed catalog: {0}")]
    MalformedCatalog(String),

    #[error("Failed to load catalog {path}: {reason}")]
    CatalogLoad { path: PathBuf, reason: String },

    #[error("Scenario `{label}` failed: {source}")]
    Scenario {
        label: String,
        #[source]
        source: Box<EngineError>,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidParameters`]
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        EngineError::InvalidParameters {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Reject NaN/inf and negative values
pub(crate) fn ensure_non_negative(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(EngineError::invalid(field, format!("must be finite, got {}", value)));
    }
    if value < 0.0 {
        return Err(EngineError::invalid(field, format!("must be >= 0, got {}", value)));
    }
    Ok(())
}

/// Reject NaN/inf and values <= 0
pub(crate) fn ensure_positive(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(EngineError::invalid(field, format!("must be finite, got {}", value)));
    }
    if value <= 0.0 {
        return Err(EngineError::invalid(field, format!("must be > 0, got {}", value)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_message_names_field() {
        let err = EngineError::invalid("principal", "must be > 0, got -1");
        assert_eq!(err.to_string(), "Invalid parameter `principal`: must be > 0, got -1");
    }

    #[test]
    fn test_guards() {
        assert!(ensure_non_negative("rate", 0.0).is_ok());
        assert!(ensure_non_negative("rate", -0.01).is_err());
        assert!(ensure_non_negative("rate", f64::NAN).is_err());
        assert!(ensure_positive("years", 0.0).is_err());
        assert!(ensure_positive("years", f64::INFINITY).is_err());
        assert!(ensure_positive("years", 1.0).is_ok());
    }

    #[test]
    fn test_scenario_error_wraps_source() {
        let err = EngineError::Scenario {
            label: "bank A".to_string(),
            source: Box::new(EngineError::invalid("term_months", "must be > 0")),
        };
        assert!(err.to_string().starts_with("Scenario `bank A` failed"));
        assert!(std::error::Error::source(&err).is_some());
    }
}

use reqwest::header::InvalidHeaderValue;
// src/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BreweryError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Field '{field}' has unexpected type: {found}")]
    UnexpectedType { field: String, found: String },

    #[error("Cannot convert {field}: no value supplied")]
    TypeConversion { field: String },

    #[error("Cannot convert {field}={value} to float")]
    ValueParsing { field: String, value: String },

    #[error("Coordinate values must be within interval [-180, 180], got {field}={value}")]
    RangeViolation { field: String, value: f64 },

    #[error("Invalid {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("HTTP {status} for {url}")]
    Transport { url: String, status: u16 },

    #[error("Failed to parse response from {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Unsupported export format: '{0}'. Expected a .json or .csv file")]
    UnsupportedFormat(String),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("URL parsing failed: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(InvalidHeaderValue),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON processing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BreweryError {
    /// Shorthand for building an `InvalidValue` error.
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        BreweryError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Returns `true` for the errors raised while building a `Coordinate`.
    ///
    /// These are the only failures `Address::from_fields` absorbs; everything
    /// else propagates to the caller.
    pub fn is_coordinate_error(&self) -> bool {
        matches!(
            self,
            BreweryError::TypeConversion { .. }
                | BreweryError::ValueParsing { .. }
                | BreweryError::RangeViolation { .. }
        )
    }

    /// HTTP status carried by a `Transport` error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            BreweryError::Transport { status, .. } => Some(*status),
            BreweryError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

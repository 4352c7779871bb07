use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Field-level errors
// ---------------------------------------------------------------------------

/// A price cell that does not follow the `$1,234.50` currency format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{raw}' is not a valid price")]
pub struct ParseError {
    pub raw: String,
}

/// An availability cell outside the `t` / `f` encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{raw}' is not a recognised availability flag (expected 't' or 'f')")]
pub struct UnrecognizedEncodingError {
    pub raw: String,
}

/// Why a single data row was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error(transparent)]
    Price(#[from] ParseError),

    #[error(transparent)]
    Encoding(#[from] UnrecognizedEncodingError),

    #[error("'{value}' is not a YYYY-MM-DD date")]
    Date { value: String },

    #[error("{column} = '{value}' is out of range")]
    OutOfRange { column: &'static str, value: String },

    #[error("{column} is empty")]
    EmptyField { column: &'static str },

    #[error("field {field} is not valid UTF-8")]
    Utf8 { field: usize },
}

// ---------------------------------------------------------------------------
// Load errors
// ---------------------------------------------------------------------------

/// Everything that can go wrong while building a [`Dataset`](super::model::Dataset).
#[derive(Debug, Error)]
pub enum DataError {
    #[error("{source_name}: cannot read {}", path.display())]
    Load {
        source_name: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{source_name}: malformed CSV")]
    Csv {
        source_name: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("{source_name}: missing required column '{column}'")]
    MissingColumn {
        source_name: &'static str,
        column: &'static str,
    },

    #[error("{source_name}: row {row} rejected")]
    Row {
        source_name: &'static str,
        /// 1-based data row (the header is not counted).
        row: usize,
        #[source]
        source: RowError,
    },

    #[error("boundaries: {} is not valid JSON", path.display())]
    Geo {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("boundaries: {} is not a GeoJSON FeatureCollection: {reason}", path.display())]
    GeoShape { path: PathBuf, reason: String },
}

impl DataError {
    /// Name of the input the error refers to.
    pub fn source_name(&self) -> &'static str {
        match self {
            DataError::Load { source_name, .. }
            | DataError::Csv { source_name, .. }
            | DataError::MissingColumn { source_name, .. }
            | DataError::Row { source_name, .. } => source_name,
            DataError::Geo { .. } | DataError::GeoShape { .. } => "boundaries",
        }
    }
}

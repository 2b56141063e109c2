use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    /// The supplied workbook is not a usable table (no sheets, bad shape, etc.).
    InvalidInput(String),
    /// Category table rejected (duplicate name, no keywords, ...).
    InvalidCategory(String),
    /// File type the ingestion layer cannot decode.
    UnsupportedFormat(String),
    /// Spreadsheet decoder failure.
    Workbook(String),
    /// Configuration load / deserialization error.
    Config(String),
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::InvalidCategory(msg) => write!(f, "invalid category table: {msg}"),
            Self::UnsupportedFormat(ext) => write!(f, "unsupported file format: {ext}"),
            Self::Workbook(msg) => write!(f, "cannot read workbook: {msg}"),
            Self::Config(msg) => write!(f, "config error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for AggregateError {}

impl From<std::io::Error> for AggregateError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<config::ConfigError> for AggregateError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<csv::Error> for AggregateError {
    fn from(e: csv::Error) -> Self {
        Self::Workbook(e.to_string())
    }
}

impl From<calamine::Error> for AggregateError {
    fn from(e: calamine::Error) -> Self {
        Self::Workbook(e.to_string())
    }
}

// src/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered, but not with a success status.
    #[error("{provider} returned {status} for {url}: {body}")]
    Api {
        provider: &'static str,
        status: u16,
        url: String,
        body: String,
    },

    /// Name has no `#<number>` suffix to take the collection id from.
    #[error("Malformed name {0:?}: expected '... #<number>'")]
    MalformedName(String),

    #[error("Column '{0}' not present in data")]
    MissingColumn(String),

    /// Sink pre-check: the item at `index` lacks a key field of the table.
    #[error("Item {index} is missing required key '{key}'; nothing was written")]
    MissingKey { index: usize, key: String },

    #[error("No input for stage '{0}': run the previous stage or use cached data")]
    MissingStageInput(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Sink error: {0}")]
    Sink(String),
}

pub type Result<T> = std::result::Result<T, Error>;

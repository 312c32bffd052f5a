//! Error types for cardwatch

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A notification matched the template but its verb is not one we know
    #[error("Unrecognized verb '{verb}' in transaction text: {fragment}")]
    UnrecognizedVerb { verb: String, fragment: String },

    #[error("Invalid amount '{amount}' in transaction text: {fragment}")]
    InvalidAmount { amount: String, fragment: String },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

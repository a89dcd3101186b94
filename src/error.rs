use thiserror::Error;

use crate::pattern::Field;

#[derive(Error, Debug)]
pub enum KopeckError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Tokenize error: {0}")]
    Tokenize(String),
    #[error("Dictionary error on line {line}: {message}")]
    Dictionary { line: usize, message: String },
    #[error("Parse error in {field} field: {text:?}")]
    Parse { field: Field, text: String },
    #[error("Internal invariant violated: {0}")]
    Invariant(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("Server error: {0}")]
    Server(String),
}

pub type Result<T> = std::result::Result<T, KopeckError>;

// Helper conversions
impl From<config::ConfigError> for KopeckError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
impl From<std::io::Error> for KopeckError {
    fn from(e: std::io::Error) -> Self { Self::Io(e.to_string()) }
}

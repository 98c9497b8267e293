use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DopplerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("satellite not found in catalog: {0}")]
    NotFound(String),
    #[error("catalog download failed: {0}")]
    Network(String),
    #[error("catalog read error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid TLE for {name}: {message}")]
    InvalidTle { name: String, message: String },
    #[error("propagation error: {0}")]
    Propagation(String),
    #[error("invalid observer: {0}")]
    InvalidObserver(String),
}

impl From<reqwest::Error> for PredictError {
    fn from(err: reqwest::Error) -> Self {
        PredictError::Network(err.to_string())
    }
}

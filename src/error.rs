use thiserror::Error;

#[derive(Error, Debug)]
pub enum StroopError {
    /// Fatal at startup: the game refuses to run with an unusable catalog.
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// Highscore could not be read or written. Recovered locally.
    #[error("highscore persistence failed: {0}")]
    Persistence(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl StroopError {
    pub fn config(msg: impl Into<String>) -> Self {
        StroopError::Configuration(msg.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, StroopError::Configuration(_))
    }
}

pub type Result<T> = std::result::Result<T, StroopError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IssueFeedError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<arboard::Error> for IssueFeedError {
    fn from(err: arboard::Error) -> Self {
        IssueFeedError::Clipboard(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IssueFeedError>;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("No strikes available for {0}")]
    NoStrikes(String),

    #[error("No reference price available for {0}")]
    NoReferencePrice(String),

    #[error("Need at least {needed} future expiries, resolved {resolved}")]
    InsufficientExpiries { needed: usize, resolved: usize },

    #[error("{0}")]
    Other(String),
}

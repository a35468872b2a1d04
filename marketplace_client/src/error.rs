use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum MarketplaceApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Could not reach the marketplace API: {0}")]
    Transport(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("The marketplace API returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for MarketplaceApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::JsonError(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

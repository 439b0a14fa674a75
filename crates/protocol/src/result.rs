pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to connect to broker: {0}")]
    Connect(String),

    #[error("connection lost: {0}")]
    Disconnected(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TransportError>;

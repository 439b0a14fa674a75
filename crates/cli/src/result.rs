#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("node error: {0}")]
    Node(#[from] node::NodeError),

    #[error("configuration error: {0}")]
    Config(#[from] node_config::ConfigError),

    #[error("transport error: {0}")]
    Transport(#[from] transport::TransportError),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, CliError>;

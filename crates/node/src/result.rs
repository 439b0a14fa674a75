#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("transport error: {0}")]
    Transport(#[from] transport::TransportError),

    #[error("malformed payload: {0}")]
    Malformed(#[from] protocol::Error),

    #[error(
        "client id collision: a peer announced ClientID {0}, which matches this node's own \
         ClientID -- aborting startup"
    )]
    ClientIdCollision(primitives::ClientId),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, NodeError>;

mod result;

pub mod fake;
pub mod mqtt;

pub use result::{Result, TransportError};

use async_trait::async_trait;
use protocol::Topic;
use tokio::sync::mpsc;

/// A single delivered (topic, payload) pair, payload is UTF-8 JSON.
pub type Inbound = (Topic, Vec<u8>);

/// Publish/subscribe transport the node's dispatcher drives. Implementations
/// hand inbound messages to the dispatcher over an internal channel rather
/// than a polling API, so the dispatcher can `tokio::select!` across the
/// transport and its own timers uniformly.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn publish(&self, topic: Topic, payload: Vec<u8>) -> Result<()>;

    async fn subscribe(&self, topics: &[Topic]) -> Result<()>;

    /// Hands ownership of the inbound channel to the caller. Must be called
    /// exactly once, before the dispatch loop starts.
    fn take_inbound(&mut self) -> mpsc::UnboundedReceiver<Inbound>;
}

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use protocol::Topic;
use tokio::sync::mpsc;

use crate::{Inbound, Result, Transport};

struct FakeNode {
    topics: HashSet<Topic>,
    sender: mpsc::UnboundedSender<Inbound>,
}

/// Shared broker standing in for an MQTT broker in tests: several
/// [`FakeTransport`]s register against the same hub and publishes fan out
/// to every other node subscribed to that topic. The publisher never
/// receives its own publish back, as if connected without MQTT5 local
/// loopback.
#[derive(Default)]
pub struct FakeHub {
    nodes: Mutex<Vec<FakeNode>>,
}

impl FakeHub {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

pub struct FakeTransport {
    hub: Arc<FakeHub>,
    index: usize,
    inbound_rx: Option<mpsc::UnboundedReceiver<Inbound>>,
}

impl FakeTransport {
    pub fn new(hub: &Arc<FakeHub>) -> Self {
        let (sender, rx) = mpsc::unbounded_channel();

        let index = {
            let mut nodes = hub.nodes.lock().expect("fake hub lock poisoned");
            nodes.push(FakeNode {
                topics: HashSet::new(),
                sender,
            });
            nodes.len() - 1
        };

        Self {
            hub: hub.clone(),
            index,
            inbound_rx: Some(rx),
        }
    }
}

#[async_trait::async_trait]
impl Transport for FakeTransport {
    async fn publish(&self, topic: Topic, payload: Vec<u8>) -> Result<()> {
        let nodes = self.hub.nodes.lock().expect("fake hub lock poisoned");

        // Mirrors a broker/client configured without local loopback (MQTT5's
        // "No Local" subscription option): a node never receives its own
        // publish back, which is what the protocol's ClientID collision
        // check assumes when it treats any observed match as a genuine peer.
        for (index, node) in nodes.iter().enumerate() {
            if index != self.index && node.topics.contains(&topic) {
                let _ = node.sender.send((topic, payload.clone()));
            }
        }

        Ok(())
    }

    async fn subscribe(&self, topics: &[Topic]) -> Result<()> {
        let mut nodes = self.hub.nodes.lock().expect("fake hub lock poisoned");
        nodes[self.index].topics.extend(topics.iter().copied());

        Ok(())
    }

    fn take_inbound(&mut self) -> mpsc::UnboundedReceiver<Inbound> {
        self.inbound_rx
            .take()
            .expect("inbound channel already taken")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_only_to_subscribed_nodes() {
        let hub = FakeHub::new();

        let a = FakeTransport::new(&hub);
        let mut b = FakeTransport::new(&hub);
        let mut c = FakeTransport::new(&hub);
        let mut rx_b = b.take_inbound();
        let mut rx_c = c.take_inbound();

        b.subscribe(&[Topic::Init]).await.unwrap();
        // c does not subscribe to anything.

        a.publish(Topic::Init, b"payload".to_vec()).await.unwrap();

        let (topic, payload) = rx_b.recv().await.unwrap();
        assert_eq!(topic, Topic::Init);
        assert_eq!(payload, b"payload");

        assert!(rx_c.try_recv().is_err());
    }

    #[tokio::test]
    async fn does_not_echo_a_publish_back_to_its_own_publisher() {
        let hub = FakeHub::new();

        let mut a = FakeTransport::new(&hub);
        let mut rx_a = a.take_inbound();

        a.subscribe(&[Topic::Init]).await.unwrap();
        a.publish(Topic::Init, b"payload".to_vec()).await.unwrap();

        assert!(rx_a.try_recv().is_err());
    }

    #[tokio::test]
    async fn fans_out_to_every_subscriber() {
        let hub = FakeHub::new();

        let a = FakeTransport::new(&hub);
        let mut b = FakeTransport::new(&hub);
        let mut rx_b = b.take_inbound();

        b.subscribe(&[Topic::Voting]).await.unwrap();
        a.publish(Topic::Voting, b"vote".to_vec()).await.unwrap();

        let (topic, payload) = rx_b.recv().await.unwrap();
        assert_eq!(topic, Topic::Voting);
        assert_eq!(payload, b"vote");
    }
}

use std::time::Duration;

use protocol::Topic;
use rumqttc::{AsyncClient, Event as MqttEvent, MqttOptions, Packet, QoS};
use telemetry::{error, warn};
use tokio::sync::mpsc;

use crate::{Inbound, Result, Transport, TransportError};

/// Transport backed by a real MQTT 3.1.1 broker via `rumqttc`.
pub struct MqttTransport {
    client: AsyncClient,
    inbound_rx: Option<mpsc::UnboundedReceiver<Inbound>>,
}

impl MqttTransport {
    /// Connects to `host:port` as `client_id`, validating the connection
    /// with one round of the event loop before returning (a failed first
    /// poll is treated as a startup-fatal connection error per the
    /// protocol's error handling design). On success, spawns a background
    /// task that forwards every inbound publish to an internal channel for
    /// the rest of the process's lifetime; a later disconnect is logged and
    /// ends that task, which the dispatcher observes as its inbound channel
    /// closing.
    pub async fn connect(client_id: &str, host: &str, port: u16) -> Result<Self> {
        let mut options = MqttOptions::new(client_id, host, port);
        options.set_keep_alive(Duration::from_secs(30));

        let (client, mut eventloop) = AsyncClient::new(options, 100);

        eventloop
            .poll()
            .await
            .map_err(|err| TransportError::Connect(err.to_string()))?;

        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            loop {
                match eventloop.poll().await {
                    Ok(MqttEvent::Incoming(Packet::Publish(publish))) => {
                        match publish.topic.parse::<Topic>() {
                            Ok(topic) => {
                                if tx.send((topic, publish.payload.to_vec())).is_err() {
                                    break;
                                }
                            },
                            Err(_) => {
                                warn!("dropping message on unroutable topic: {}", publish.topic);
                            },
                        }
                    },
                    Ok(_) => {},
                    Err(err) => {
                        error!("mqtt connection lost: {err}");
                        break;
                    },
                }
            }
        });

        Ok(Self {
            client,
            inbound_rx: Some(rx),
        })
    }
}

#[async_trait::async_trait]
impl Transport for MqttTransport {
    async fn publish(&self, topic: Topic, payload: Vec<u8>) -> Result<()> {
        self.client
            .publish(topic.as_str(), QoS::AtLeastOnce, false, payload)
            .await
            .map_err(|err| TransportError::Other(err.to_string()))
    }

    async fn subscribe(&self, topics: &[Topic]) -> Result<()> {
        for topic in topics {
            self.client
                .subscribe(topic.as_str(), QoS::AtLeastOnce)
                .await
                .map_err(|err| TransportError::Other(err.to_string()))?;
        }

        Ok(())
    }

    fn take_inbound(&mut self) -> mpsc::UnboundedReceiver<Inbound> {
        self.inbound_rx
            .take()
            .expect("inbound channel already taken")
    }
}

use node::Node;
use node_config::CohortConfig;
use telemetry::info;
use transport::mqtt::MqttTransport;

mod cli;
pub mod result;

pub use cli::Args;
pub use result::{CliError, Result};

/// Connects to the broker per `args` and runs a single cohort node to
/// completion (which, per the protocol's no-failover guarantee, is
/// "forever" in the Running phase barring a fatal transport error).
///
/// Configuration is assembled in increasing priority: built-in defaults,
/// then `COHORT_*` environment variables, then explicitly passed CLI
/// flags, so a flag always wins over an environment variable and an
/// environment variable always wins over the default.
pub async fn run(args: Args) -> Result<()> {
    let mut config = CohortConfig::from_env(args.cohort_size)?;

    if let Some(client_id) = args.client_id {
        config = config.with_client_id(client_id);
    }

    let broker_host = args.broker_host.unwrap_or_else(|| config.broker_host.clone());
    let broker_port = args.broker_port.unwrap_or(config.broker_port);
    config = config.with_broker(broker_host, broker_port);

    if let Some(max_difficulty) = args.max_difficulty {
        config = config.with_max_difficulty(max_difficulty)?;
    }

    info!(
        cohort_size = config.cohort_size,
        client_id = config.client_id,
        broker = %format!("{}:{}", config.broker_host, config.broker_port),
        "connecting to broker"
    );

    let transport = MqttTransport::connect(
        &config.client_id.to_string(),
        &config.broker_host,
        config.broker_port,
    )
    .await?;

    let node = Node::new(config, transport);

    node.run().await?;

    Ok(())
}

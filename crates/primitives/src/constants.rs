use std::time::Duration;

/// Default cohort size used when the CLI is invoked without a positional
/// argument, or with an unparseable one.
pub const DEFAULT_COHORT_SIZE: usize = 3;

/// Lower/upper bounds for the challenge difficulty a controller may draw.
pub const MIN_DIFFICULTY: u32 = 1;
pub const MAX_DIFFICULTY: u32 = 20;
pub const DEFAULT_MAX_DIFFICULTY: u32 = 5;

/// How often Init/Election periodically re-announce this node's
/// contribution.
pub const REANNOUNCE_INTERVAL: Duration = Duration::from_secs(2);

/// Spacing between the trailing broadcasts a node emits right before
/// leaving Init, meant to help late joiners converge.
pub const TRAILING_BROADCAST_INTERVAL: Duration = Duration::from_millis(200);
pub const TRAILING_BROADCAST_COUNT: usize = 3;

/// How long the controller waits for the network to quiesce before
/// issuing the first challenge, and between a resolved challenge and the
/// next one.
pub const CONTROLLER_SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Mining worker cooperative-yield cadence.
pub const NONCE_YIELD_INTERVAL: u64 = 50_000;
pub const NONCE_YIELD_DURATION: Duration = Duration::from_millis(1);

pub const DEFAULT_MQTT_BROKER_HOST: &str = "broker.emqx.io";
pub const DEFAULT_MQTT_BROKER_PORT: u16 = 1883;

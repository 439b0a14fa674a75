use clap::Parser;

/// Runs a single cohort node until a fatal transport error or ClientID
/// collision terminates it.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Args {
    /// Size of the cohort (N) this node expects to converge with. Falls
    /// back to the default if absent or unparseable.
    #[clap(default_value_t = primitives::DEFAULT_COHORT_SIZE)]
    pub cohort_size: usize,

    /// MQTT broker host. Falls back to `COHORT_BROKER_HOST`, then the
    /// built-in default, when absent.
    #[clap(long, value_parser)]
    pub broker_host: Option<String>,

    /// MQTT broker port. Falls back to `COHORT_BROKER_PORT`, then the
    /// built-in default, when absent.
    #[clap(long, value_parser)]
    pub broker_port: Option<u16>,

    /// Pins this node's ClientID instead of drawing one at random.
    /// Primarily useful for deterministic tests.
    #[clap(long, value_parser)]
    pub client_id: Option<primitives::ClientId>,

    /// Upper bound (inclusive) on the difficulty the controller may draw.
    /// Falls back to `COHORT_MAX_DIFFICULTY`, then the built-in default,
    /// when absent.
    #[clap(long, value_parser)]
    pub max_difficulty: Option<u32>,

    /// Render logs as pretty, human-readable text instead of flattened
    /// JSON.
    #[clap(long, action)]
    pub pretty_logs: bool,
}

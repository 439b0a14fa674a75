mod result;

pub use result::{ConfigError, Result};

use std::time::Duration;

use primitives::{
    random_id, ClientId, DEFAULT_COHORT_SIZE, DEFAULT_ID_SPACE, DEFAULT_MAX_DIFFICULTY,
    DEFAULT_MQTT_BROKER_HOST, DEFAULT_MQTT_BROKER_PORT, REANNOUNCE_INTERVAL,
};
use serde::Deserialize;

/// Process-wide, immutable configuration for a single cohort node.
///
/// Built once at startup from CLI flags layered over environment
/// variables and defaults (see [`CohortConfig::from_sources`]), then
/// shared read-only across the node's tasks.
#[derive(Debug, Clone, Deserialize)]
pub struct CohortConfig {
    /// Size of the cohort this node expects to converge with (N).
    pub cohort_size: usize,

    /// MQTT broker host to connect to.
    pub broker_host: String,

    /// MQTT broker port.
    pub broker_port: u16,

    /// This node's ClientID. Randomly generated unless explicitly pinned
    /// (primarily useful for deterministic tests).
    pub client_id: ClientId,

    /// Upper bound for the difficulty the controller may draw, inclusive.
    pub max_difficulty: u32,

    /// Interval between Init/Election re-announcements.
    #[serde(skip, default = "default_reannounce_interval")]
    pub reannounce_interval: Duration,
}

fn default_reannounce_interval() -> Duration {
    REANNOUNCE_INTERVAL
}

impl CohortConfig {
    /// Layers `COHORT_*` environment variables (e.g. `COHORT_BROKER_HOST`,
    /// `COHORT_BROKER_PORT`, `COHORT_MAX_DIFFICULTY`) over the defaults for
    /// the given cohort size.
    pub fn from_env(cohort_size: usize) -> Result<Self> {
        let base = Self::new(cohort_size);

        let overlay = config::Config::builder()
            .add_source(config::Environment::with_prefix("COHORT").separator("_"))
            .build()?;

        let broker_host = overlay
            .get_string("broker_host")
            .unwrap_or(base.broker_host.clone());
        let broker_port = overlay.get_int("broker_port").map(|p| p as u16).unwrap_or(base.broker_port);
        let max_difficulty = overlay
            .get_int("max_difficulty")
            .map(|d| d as u32)
            .unwrap_or(base.max_difficulty);

        base.with_broker(broker_host, broker_port)
            .with_max_difficulty(max_difficulty)
    }

    /// Builds a configuration for the given cohort size, drawing a fresh
    /// random ClientID and defaulting everything else.
    pub fn new(cohort_size: usize) -> Self {
        Self {
            cohort_size,
            client_id: random_id(DEFAULT_ID_SPACE),
            ..Self::default()
        }
    }

    pub fn with_client_id(mut self, client_id: ClientId) -> Self {
        self.client_id = client_id;
        self
    }

    pub fn with_broker(mut self, host: impl Into<String>, port: u16) -> Self {
        self.broker_host = host.into();
        self.broker_port = port;
        self
    }

    pub fn with_max_difficulty(mut self, max_difficulty: u32) -> Result<Self> {
        if !(primitives::MIN_DIFFICULTY..=primitives::MAX_DIFFICULTY).contains(&max_difficulty) {
            return Err(ConfigError::InvalidDifficulty(max_difficulty));
        }

        self.max_difficulty = max_difficulty;
        Ok(self)
    }
}

impl Default for CohortConfig {
    fn default() -> Self {
        Self {
            cohort_size: DEFAULT_COHORT_SIZE,
            broker_host: DEFAULT_MQTT_BROKER_HOST.to_string(),
            broker_port: DEFAULT_MQTT_BROKER_PORT,
            client_id: random_id(DEFAULT_ID_SPACE),
            max_difficulty: DEFAULT_MAX_DIFFICULTY,
            reannounce_interval: REANNOUNCE_INTERVAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_honors_cohort_size() {
        let config = CohortConfig::new(7);
        assert_eq!(config.cohort_size, 7);
    }

    #[test]
    fn rejects_out_of_range_difficulty() {
        let config = CohortConfig::default();
        assert!(config.with_max_difficulty(0).is_err());
        assert!(CohortConfig::default().with_max_difficulty(21).is_err());
    }

    #[test]
    fn accepts_boundary_difficulty() {
        assert!(CohortConfig::default().with_max_difficulty(1).is_ok());
        assert!(CohortConfig::default().with_max_difficulty(20).is_ok());
    }
}

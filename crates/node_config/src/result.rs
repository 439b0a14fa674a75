#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("difficulty bound {0} is out of the permitted range [1, 20]")]
    InvalidDifficulty(u32),

    #[error("failed to load configuration: {0}")]
    Source(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

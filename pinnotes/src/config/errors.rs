use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid ipfs api url \"{url}\": {reason}")]
    InvalidIpfsApiUrl {
        url: String,
        reason: String,
    },

    #[error("{name} must be greater than zero")]
    Zero {
        name: &'static str,
    },

    #[error("unsupported cid version {0}, expected 0 or 1")]
    UnsupportedCidVersion(u8),

    #[error(transparent)]
    Figment(#[from] figment::Error),
}

impl ConfigError {
    pub fn zero(name: &'static str) -> Self {
        ConfigError::Zero { name }
    }
}

use faststr::FastStr;
use thiserror::Error;

/// Returned when a string cannot be used as a metadata key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid metadata key: {:?}", .key.as_str())]
pub struct InvalidMetadataKey {
    key: FastStr,
}

impl InvalidMetadataKey {
    pub(crate) fn new(key: impl Into<FastStr>) -> Self {
        Self { key: key.into() }
    }

    /// The rejected key, as given.
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse header config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

//! Error types for the cradle engine and settings layer

use thiserror::Error;

/// Errors surfaced by the cradle engine and its configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CradleError {
    /// A drag command named a ball that does not exist
    #[error("ball index {index} out of range (cradle has {len} balls)")]
    InvalidIndex { index: usize, len: usize },

    /// A simulation parameter is outside its physical domain
    #[error("invalid parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f32 },

    /// Stored or supplied settings could not be parsed
    #[error("settings: {0}")]
    Settings(String),
}

impl From<serde_json::Error> for CradleError {
    fn from(err: serde_json::Error) -> Self {
        CradleError::Settings(err.to_string())
    }
}

use thiserror::Error;
use updraft_provider::{ProviderError, UpdateTypeParseError};

use crate::comparator::VersionParseError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpdateError {
    #[error("Missing required option: {option}")]
    MissingOption { option: &'static str },

    #[error("Invalid value for {option}: {details}")]
    InvalidOption {
        option: &'static str,
        details: String,
    },

    #[error("Could not convert store version {input} to a semantic version")]
    Conversion { input: String },

    #[error("Failed to compare versions: {0}")]
    Comparison(#[from] VersionParseError),

    #[error("Provider error during {operation}: {source}")]
    Provider {
        operation: &'static str,
        #[source]
        source: ProviderError,
    },

    #[error("No tokio runtime is running to deliver provider events")]
    NoRuntime,
}

impl UpdateError {
    pub fn provider(operation: &'static str, source: ProviderError) -> Self {
        Self::Provider { operation, source }
    }

    pub fn invalid_option(option: &'static str, details: impl Into<String>) -> Self {
        Self::InvalidOption {
            option,
            details: details.into(),
        }
    }

    /// Errors caused by how the call was set up rather than by the provider.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingOption { .. } | Self::InvalidOption { .. }
        )
    }
}

impl From<UpdateTypeParseError> for UpdateError {
    fn from(error: UpdateTypeParseError) -> Self {
        Self::invalid_option("update_type", error.to_string())
    }
}

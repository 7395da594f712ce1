use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Provider call failed: {details}")]
    CallFailed { details: String },

    #[error("Malformed provider payload ({operation}): {details}")]
    MalformedPayload {
        operation: &'static str,
        details: String,
    },

    #[error("Operation not supported by this provider: {operation}")]
    Unsupported { operation: &'static str },
}

impl ProviderError {
    pub fn call_failed(details: impl Into<String>) -> Self {
        Self::CallFailed {
            details: details.into(),
        }
    }

    pub fn malformed(operation: &'static str, details: impl Into<String>) -> Self {
        Self::MalformedPayload {
            operation,
            details: details.into(),
        }
    }

    pub fn malformed_from<E>(operation: &'static str, error: E) -> Self
    where
        E: std::fmt::Display,
    {
        Self::malformed(operation, error.to_string())
    }
}

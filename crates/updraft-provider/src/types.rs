use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::ProviderError;

/// Where the provider stands with respect to a store update.
///
/// Only [`AvailabilityStatus::Available`] means a newer build can be started;
/// the remaining states describe an update that is absent, unknown or already
/// moving through the download/install pipeline.
///
/// The wire name and the display name are the same kebab-case string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AvailabilityStatus {
    Available,
    Unavailable,
    Unknown,
    #[serde(alias = "developerTriggered")]
    DeveloperTriggered,
    Canceled,
    Downloaded,
    Downloading,
    Failed,
    Installed,
    Installing,
    Pending,
}

impl AvailabilityStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Unavailable => "unavailable",
            Self::Unknown => "unknown",
            Self::DeveloperTriggered => "developer-triggered",
            Self::Canceled => "canceled",
            Self::Downloaded => "downloaded",
            Self::Downloading => "downloading",
            Self::Failed => "failed",
            Self::Installed => "installed",
            Self::Installing => "installing",
            Self::Pending => "pending",
        }
    }

    #[must_use]
    pub fn is_available(self) -> bool {
        self == Self::Available
    }
}

impl fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The store's own version representation, such as a numeric build code or a
/// free-form version name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NativeVersion {
    Code(u64),
    Name(String),
}

impl fmt::Display for NativeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{code}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl From<u64> for NativeVersion {
    fn from(code: u64) -> Self {
        Self::Code(code)
    }
}

impl From<&str> for NativeVersion {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for NativeVersion {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// Raw answer of an availability query, returned verbatim to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityInfo {
    pub status: AvailabilityStatus,
    pub native_version: NativeVersion,
    #[serde(default)]
    pub immediate_allowed: bool,
    #[serde(default)]
    pub flexible_allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staleness_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_priority: Option<u8>,
    /// Provider fields this crate does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AvailabilityInfo {
    #[must_use]
    pub fn new(status: AvailabilityStatus, native_version: impl Into<NativeVersion>) -> Self {
        Self {
            status,
            native_version: native_version.into(),
            immediate_allowed: false,
            flexible_allowed: false,
            staleness_days: None,
            update_priority: None,
            extra: Map::new(),
        }
    }

    /// Decode a JSON availability payload handed over by a platform bridge.
    ///
    /// # Errors
    /// Returns [`ProviderError::MalformedPayload`] when required fields are
    /// missing or carry the wrong type.
    pub fn from_value(value: Value) -> Result<Self, ProviderError> {
        serde_json::from_value(value)
            .map_err(|error| ProviderError::malformed_from("query availability", error))
    }
}

/// Serialized as `IMMEDIATE`/`FLEXIBLE`; parsed case-insensitively from both
/// strings and JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum UpdateType {
    Immediate,
    #[default]
    Flexible,
}

impl UpdateType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Immediate => "IMMEDIATE",
            Self::Flexible => "FLEXIBLE",
        }
    }
}

impl fmt::Display for UpdateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Expected IMMEDIATE or FLEXIBLE update type, got: {input}")]
pub struct UpdateTypeParseError {
    pub input: String,
}

impl FromStr for UpdateType {
    type Err = UpdateTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("immediate") {
            Ok(Self::Immediate)
        } else if trimmed.eq_ignore_ascii_case("flexible") {
            Ok(Self::Flexible)
        } else {
            Err(UpdateTypeParseError {
                input: s.to_string(),
            })
        }
    }
}

impl TryFrom<String> for UpdateType {
    type Error = UpdateTypeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A byte counter as it appears on the wire: some bridges send numbers, others
/// send numeric-looking strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawByteCount {
    Number(serde_json::Number),
    Text(String),
}

impl From<u64> for RawByteCount {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for RawByteCount {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Status update exactly as emitted by the provider, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStatusEvent {
    pub status: AvailabilityStatus,
    #[serde(default)]
    pub bytes_downloaded: Option<RawByteCount>,
    #[serde(default)]
    pub total_bytes_to_download: Option<RawByteCount>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawStatusEvent {
    #[must_use]
    pub fn new(
        status: AvailabilityStatus,
        bytes_downloaded: impl Into<RawByteCount>,
        total_bytes_to_download: impl Into<RawByteCount>,
    ) -> Self {
        Self {
            status,
            bytes_downloaded: Some(bytes_downloaded.into()),
            total_bytes_to_download: Some(total_bytes_to_download.into()),
            extra: Map::new(),
        }
    }

    /// Decode a JSON status payload handed over by a platform bridge.
    ///
    /// # Errors
    /// Returns [`ProviderError::MalformedPayload`] when the payload has no
    /// recognizable status.
    pub fn from_value(value: Value) -> Result<Self, ProviderError> {
        serde_json::from_value(value)
            .map_err(|error| ProviderError::malformed_from("status event", error))
    }
}

/// Outcome of a user-facing update flow (accepted, declined, ...). The payload
/// is opaque to this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultEvent(pub Value);

impl From<Value> for ResultEvent {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use updraft_provider::{AvailabilityStatus, RawByteCount, RawStatusEvent};

/// A normalized byte counter.
///
/// Transport values that do not start with a base-10 integer degrade to
/// [`ByteCount::NotANumber`] rather than failing the whole event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteCount {
    Bytes(i64),
    NotANumber,
}

impl ByteCount {
    #[must_use]
    pub fn value(self) -> Option<i64> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            Self::NotANumber => None,
        }
    }

    #[must_use]
    pub fn from_raw(raw: Option<&RawByteCount>) -> Self {
        match raw {
            Some(RawByteCount::Number(number)) => number
                .as_i64()
                .or_else(|| number.as_u64().map(|n| i64::try_from(n).unwrap_or(i64::MAX)))
                .or_else(|| number.as_f64().and_then(truncate_float))
                .map_or(Self::NotANumber, Self::Bytes),
            Some(RawByteCount::Text(text)) => parse_leading_int(text),
            None => Self::NotANumber,
        }
    }
}

// NaN serializes as JSON null, matching what a JS bridge would emit.
impl Serialize for ByteCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Bytes(bytes) => serializer.serialize_i64(*bytes),
            Self::NotANumber => serializer.serialize_f64(f64::NAN),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn truncate_float(value: f64) -> Option<i64> {
    value.is_finite().then(|| value.trunc() as i64)
}

/// Base-10 leading-integer parse: optional whitespace and sign, then digits.
/// Anything after the digits is ignored.
fn parse_leading_int(text: &str) -> ByteCount {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return ByteCount::NotANumber;
    }

    let digits = &rest[..digits_len];
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    ByteCount::Bytes(if negative { -magnitude } else { magnitude })
}

/// Progress update as delivered to status listeners.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEvent {
    pub status: AvailabilityStatus,
    pub bytes_downloaded: ByteCount,
    pub total_bytes_to_download: ByteCount,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StatusEvent {
    #[must_use]
    pub fn from_raw(raw: RawStatusEvent) -> Self {
        Self {
            status: raw.status,
            bytes_downloaded: ByteCount::from_raw(raw.bytes_downloaded.as_ref()),
            total_bytes_to_download: ByteCount::from_raw(raw.total_bytes_to_download.as_ref()),
            extra: raw.extra,
        }
    }

    /// Fraction of the download completed, when both counters are usable.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> Option<f64> {
        let downloaded = self.bytes_downloaded.value()?;
        let total = self.total_bytes_to_download.value()?;
        (total > 0).then(|| downloaded as f64 / total as f64)
    }

    #[must_use]
    pub fn is_lossy(&self) -> bool {
        self.bytes_downloaded == ByteCount::NotANumber
            || self.total_bytes_to_download == ByteCount::NotANumber
    }
}

impl From<RawStatusEvent> for StatusEvent {
    fn from(raw: RawStatusEvent) -> Self {
        Self::from_raw(raw)
    }
}

mod error;
mod traits;
mod types;

pub use error::ProviderError;
pub use traits::UpdateProvider;
pub use types::{
    AvailabilityInfo, AvailabilityStatus, NativeVersion, RawByteCount, RawStatusEvent,
    ResultEvent, UpdateType, UpdateTypeParseError,
};

//! Update decision and event distribution for updraft.
//!
//! This crate sits between an [`UpdateProvider`] and the application:
//! - Deciding whether the store version is worth updating to.
//! - Pluggable version comparison and native-version conversion.
//! - Fanning provider status/result events out to registered listeners.
//! - Switching the provider's status stream on and off with listener presence.

mod comparator;
mod coordinator;
mod decision;
mod error;
mod events;
mod registry;

/// Version comparison strategies and the default dotted comparator.
pub use comparator::{
    NumericComparator, SemverComparator, VersionComparator, VersionParseError, compare_versions,
};
/// Provider bridge owning both listener registries.
pub use coordinator::{
    ResultListener, StartUpdateOptions, StatusListener, StreamState, UpdateCoordinator,
};
/// Update decision inputs, output and the stateless decision call.
pub use decision::{CheckOptions, NeedsUpdateResponse, SemverConverter, check_needs_update};
pub use error::UpdateError;
/// Normalized status events.
pub use events::{ByteCount, StatusEvent};
pub use registry::{Listener, ListenerRegistry};

pub use updraft_provider::{
    AvailabilityInfo, AvailabilityStatus, NativeVersion, ProviderError, RawByteCount,
    RawStatusEvent, ResultEvent, UpdateProvider, UpdateType,
};

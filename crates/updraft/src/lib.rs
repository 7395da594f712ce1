//! Store update checks and update event fan-out.
//!
//! [`Updater`] wires an [`UpdateProvider`] to persisted [`UpdaterSettings`];
//! the decision engine and listener plumbing live in `updraft-core` and are
//! re-exported here.

mod error;
mod logging;
mod settings;
mod updater;

pub use error::SettingsError;
pub use settings::{ComparatorKind, UpdaterSettings};
pub use updater::Updater;

pub use updraft_core::*;
pub use updraft_platform::{AppPaths, AppPathsError};

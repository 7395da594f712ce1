use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};
use updraft_provider::{AvailabilityInfo, NativeVersion, UpdateProvider};

use crate::comparator::{NumericComparator, VersionComparator};
use crate::error::UpdateError;

/// Maps the store's native version (for example a build code) to a dotted
/// version comparable with the running one. `None` or an empty string means
/// the value could not be converted.
pub trait SemverConverter: Send + Sync {
    fn to_semver(&self, native: &NativeVersion) -> Option<String>;
}

impl<F> SemverConverter for F
where
    F: Fn(&NativeVersion) -> Option<String> + Send + Sync,
{
    fn to_semver(&self, native: &NativeVersion) -> Option<String> {
        self(native)
    }
}

#[derive(Clone, Default)]
pub struct CheckOptions {
    pub cur_version: Option<String>,
    pub to_semver_converter: Option<Arc<dyn SemverConverter>>,
    pub custom_version_comparator: Option<Arc<dyn VersionComparator>>,
}

impl CheckOptions {
    #[must_use]
    pub fn new(cur_version: impl Into<String>) -> Self {
        Self {
            cur_version: Some(cur_version.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_converter(mut self, converter: impl SemverConverter + 'static) -> Self {
        self.to_semver_converter = Some(Arc::new(converter));
        self
    }

    #[must_use]
    pub fn with_comparator(mut self, comparator: impl VersionComparator + 'static) -> Self {
        self.custom_version_comparator = Some(Arc::new(comparator));
        self
    }

    fn current_version(&self) -> Result<&str, UpdateError> {
        self.cur_version
            .as_deref()
            .map(str::trim)
            .filter(|version| !version.is_empty())
            .ok_or(UpdateError::MissingOption {
                option: "cur_version",
            })
    }
}

impl fmt::Debug for CheckOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckOptions")
            .field("cur_version", &self.cur_version)
            .field("has_converter", &self.to_semver_converter.is_some())
            .field("has_comparator", &self.custom_version_comparator.is_some())
            .finish()
    }
}

/// Recommendation returned by [`check_needs_update`].
///
/// `reason` is set exactly when `should_update` is `false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeedsUpdateResponse {
    pub should_update: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub other: AvailabilityInfo,
}

/// Ask the provider whether a newer store version exists and whether it is
/// worth updating to.
///
/// # Errors
/// - [`UpdateError::MissingOption`] when `cur_version` is absent; the provider
///   is not queried.
/// - [`UpdateError::Provider`] when the availability query fails.
/// - [`UpdateError::Conversion`] when the converter yields nothing.
/// - [`UpdateError::Comparison`] when a version cannot be parsed.
pub async fn check_needs_update(
    provider: &dyn UpdateProvider,
    options: &CheckOptions,
) -> Result<NeedsUpdateResponse, UpdateError> {
    let cur_version = options.current_version()?;

    let info = provider
        .query_availability()
        .await
        .map_err(|error| UpdateError::provider("check needs update", error))?;

    decide(info, cur_version, options)
}

fn decide(
    info: AvailabilityInfo,
    cur_version: &str,
    options: &CheckOptions,
) -> Result<NeedsUpdateResponse, UpdateError> {
    if !info.status.is_available() {
        debug!("No update offered by provider (status: {})", info.status);
        return Ok(NeedsUpdateResponse {
            should_update: false,
            store_version: None,
            reason: Some(format!(
                "{} means there's no new version available",
                info.status
            )),
            other: info,
        });
    }

    let native = info.native_version.to_string();
    let (store_version, converted) = match &options.to_semver_converter {
        Some(converter) => {
            let semver = converter
                .to_semver(&info.native_version)
                .filter(|version| !version.trim().is_empty())
                .ok_or_else(|| UpdateError::Conversion {
                    input: native.clone(),
                })?;
            (semver, true)
        }
        None => (native.clone(), false),
    };

    let ordering = match &options.custom_version_comparator {
        Some(comparator) => comparator.compare(&store_version, cur_version)?,
        None => NumericComparator.compare(&store_version, cur_version)?,
    };
    debug!("Store version {store_version} vs current {cur_version}: {ordering:?}");

    if ordering == Ordering::Greater {
        return Ok(NeedsUpdateResponse {
            should_update: true,
            store_version: Some(store_version),
            reason: None,
            other: info,
        });
    }

    let origin = if converted && store_version != native {
        format!(" - originated from {native}")
    } else {
        String::new()
    };
    Ok(NeedsUpdateResponse {
        should_update: false,
        reason: Some(format!(
            "current version ({cur_version}) is already later than the latest store version ({store_version}{origin})"
        )),
        store_version: Some(store_version),
        other: info,
    })
}

use std::sync::Arc;

use updraft_core::{
    CheckOptions, NeedsUpdateResponse, ResultListener, StartUpdateOptions, StatusListener,
    UpdateCoordinator, UpdateError, UpdateProvider,
};

use crate::settings::UpdaterSettings;

/// Application-facing entry point: a coordinator plus the user's settings.
pub struct Updater {
    settings: UpdaterSettings,
    coordinator: UpdateCoordinator,
}

impl Updater {
    /// # Panics
    /// Panics when called outside a tokio runtime, like
    /// [`UpdateCoordinator::new`].
    #[must_use]
    pub fn new(provider: Arc<dyn UpdateProvider>, settings: UpdaterSettings) -> Self {
        Self {
            settings,
            coordinator: UpdateCoordinator::new(provider),
        }
    }

    /// # Errors
    /// Returns [`UpdateError::NoRuntime`] outside a tokio runtime.
    pub fn try_new(
        provider: Arc<dyn UpdateProvider>,
        settings: UpdaterSettings,
    ) -> Result<Self, UpdateError> {
        Ok(Self {
            settings,
            coordinator: UpdateCoordinator::try_new(provider)?,
        })
    }

    #[must_use]
    pub fn settings(&self) -> &UpdaterSettings {
        &self.settings
    }

    #[must_use]
    pub fn coordinator(&self) -> &UpdateCoordinator {
        &self.coordinator
    }

    /// Check against the running version using the configured comparator.
    ///
    /// # Errors
    /// See [`UpdateCoordinator::check_needs_update`].
    pub async fn check_needs_update(
        &self,
        cur_version: &str,
    ) -> Result<NeedsUpdateResponse, UpdateError> {
        self.check_needs_update_with(CheckOptions::new(cur_version))
            .await
    }

    /// Check with caller-supplied options. A comparator set on `options`
    /// wins over the configured one.
    ///
    /// # Errors
    /// See [`UpdateCoordinator::check_needs_update`].
    pub async fn check_needs_update_with(
        &self,
        mut options: CheckOptions,
    ) -> Result<NeedsUpdateResponse, UpdateError> {
        if options.custom_version_comparator.is_none() {
            options.custom_version_comparator = Some(self.settings.comparator.comparator());
        }
        self.coordinator.check_needs_update(&options).await
    }

    /// Start an update of the preferred type.
    ///
    /// # Errors
    /// See [`UpdateCoordinator::start_update`].
    pub async fn start_update(&self) -> Result<(), UpdateError> {
        self.start_update_with(&StartUpdateOptions::new(
            self.settings.preferred_update_type,
        ))
        .await
    }

    /// # Errors
    /// See [`UpdateCoordinator::start_update`].
    pub async fn start_update_with(&self, options: &StartUpdateOptions) -> Result<(), UpdateError> {
        self.coordinator.start_update(options).await
    }

    pub fn install_update(&self) {
        self.coordinator.install_update();
    }

    pub fn add_status_update_listener(&self, listener: &StatusListener) {
        self.coordinator.add_status_update_listener(listener);
    }

    pub fn remove_status_update_listener(&self, listener: &StatusListener) {
        self.coordinator.remove_status_update_listener(listener);
    }

    pub fn add_result_listener(&self, listener: &ResultListener) {
        self.coordinator.add_result_listener(listener);
    }

    pub fn remove_result_listener(&self, listener: &ResultListener) {
        self.coordinator.remove_result_listener(listener);
    }
}

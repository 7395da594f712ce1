use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, info, warn};
use serde::Deserialize;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use updraft_provider::{RawStatusEvent, ResultEvent, UpdateProvider, UpdateType};

use crate::decision::{CheckOptions, NeedsUpdateResponse, check_needs_update};
use crate::error::UpdateError;
use crate::events::StatusEvent;
use crate::registry::{Listener, ListenerRegistry};

pub type StatusListener = Listener<StatusEvent>;
pub type ResultListener = Listener<ResultEvent>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Disabled,
    Enabled,
}

impl StreamState {
    /// Next state for the given listener count, or `None` when the provider
    /// does not need to be told anything.
    #[must_use]
    pub fn transition(self, listeners: usize) -> Option<Self> {
        match (self, listeners) {
            (Self::Disabled, n) if n > 0 => Some(Self::Enabled),
            (Self::Enabled, 0) => Some(Self::Disabled),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_enabled(self) -> bool {
        self == Self::Enabled
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartUpdateOptions {
    #[serde(default)]
    pub update_type: Option<UpdateType>,
}

impl StartUpdateOptions {
    #[must_use]
    pub fn new(update_type: UpdateType) -> Self {
        Self {
            update_type: Some(update_type),
        }
    }

    /// Build options from a user-supplied update type name.
    ///
    /// # Errors
    /// Returns [`UpdateError::InvalidOption`] for anything other than
    /// `IMMEDIATE` or `FLEXIBLE`.
    pub fn from_name(name: &str) -> Result<Self, UpdateError> {
        Ok(Self::new(name.parse()?))
    }
}

/// Long-lived bridge between one update provider and the application.
///
/// Construction subscribes to both provider channels; the subscriptions live
/// as long as the coordinator. The event pumps run on the tokio runtime the
/// coordinator is created in.
pub struct UpdateCoordinator {
    provider: Arc<dyn UpdateProvider>,
    status_listeners: Arc<ListenerRegistry<StatusEvent>>,
    result_listeners: Arc<ListenerRegistry<ResultEvent>>,
    status_stream: Mutex<StreamState>,
    pumps: Vec<JoinHandle<()>>,
}

impl UpdateCoordinator {
    /// # Panics
    /// Panics when called outside a tokio runtime; use [`Self::try_new`] where
    /// that cannot be guaranteed.
    #[must_use]
    pub fn new(provider: Arc<dyn UpdateProvider>) -> Self {
        Self::on_runtime(provider, &Handle::current())
    }

    /// # Errors
    /// Returns [`UpdateError::NoRuntime`] without subscribing to the provider
    /// when no tokio runtime is running on this thread.
    pub fn try_new(provider: Arc<dyn UpdateProvider>) -> Result<Self, UpdateError> {
        let handle = Handle::try_current().map_err(|_| UpdateError::NoRuntime)?;
        Ok(Self::on_runtime(provider, &handle))
    }

    fn on_runtime(provider: Arc<dyn UpdateProvider>, runtime: &Handle) -> Self {
        let status_listeners = Arc::new(ListenerRegistry::new());
        let result_listeners = Arc::new(ListenerRegistry::new());

        let pumps = vec![
            spawn_status_pump(
                runtime,
                provider.subscribe_status_events(),
                Arc::clone(&status_listeners),
            ),
            spawn_result_pump(
                runtime,
                provider.subscribe_result_events(),
                Arc::clone(&result_listeners),
            ),
        ];
        debug!("Subscribed to {} provider events", provider.name());

        Self {
            provider,
            status_listeners,
            result_listeners,
            status_stream: Mutex::new(StreamState::Disabled),
            pumps,
        }
    }

    #[must_use]
    pub fn provider(&self) -> &dyn UpdateProvider {
        self.provider.as_ref()
    }

    /// See [`check_needs_update`].
    ///
    /// # Errors
    /// Propagates configuration, provider, conversion and comparison errors.
    pub async fn check_needs_update(
        &self,
        options: &CheckOptions,
    ) -> Result<NeedsUpdateResponse, UpdateError> {
        check_needs_update(self.provider.as_ref(), options).await
    }

    /// Start the store update flow.
    ///
    /// # Errors
    /// Returns [`UpdateError::MissingOption`] without calling the provider when
    /// no update type is given, and [`UpdateError::Provider`] when the
    /// provider refuses to start.
    pub async fn start_update(&self, options: &StartUpdateOptions) -> Result<(), UpdateError> {
        let update_type = options.update_type.ok_or(UpdateError::MissingOption {
            option: "update_type",
        })?;

        info!("Starting {update_type} update via {}", self.provider.name());
        self.provider
            .start_update(update_type)
            .await
            .map_err(|error| UpdateError::provider("start update", error))
    }

    pub fn install_update(&self) {
        info!("Requesting install of downloaded update");
        self.provider.trigger_install();
    }

    pub fn add_status_update_listener(&self, listener: &StatusListener) {
        let mut stream = self
            .status_stream
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !self.status_listeners.add(listener) {
            debug!("Status listener already registered");
            return;
        }
        self.sync_status_stream(&mut stream);
    }

    pub fn remove_status_update_listener(&self, listener: &StatusListener) {
        let mut stream = self
            .status_stream
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !self.status_listeners.remove(listener) {
            debug!("Status listener was not registered");
            return;
        }
        self.sync_status_stream(&mut stream);
    }

    fn sync_status_stream(&self, stream: &mut StreamState) {
        if let Some(next) = stream.transition(self.status_listeners.len()) {
            debug!(
                "{} status stream",
                if next.is_enabled() { "Enabling" } else { "Disabling" }
            );
            self.provider.set_status_stream_enabled(next.is_enabled());
            *stream = next;
        }
    }

    pub fn add_result_listener(&self, listener: &ResultListener) {
        if !self.result_listeners.add(listener) {
            debug!("Result listener already registered");
        }
    }

    pub fn remove_result_listener(&self, listener: &ResultListener) {
        if !self.result_listeners.remove(listener) {
            debug!("Result listener was not registered");
        }
    }

    #[must_use]
    pub fn status_stream_enabled(&self) -> bool {
        self.status_stream
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_enabled()
    }

    #[must_use]
    pub fn status_listener_count(&self) -> usize {
        self.status_listeners.len()
    }

    #[must_use]
    pub fn result_listener_count(&self) -> usize {
        self.result_listeners.len()
    }
}

impl Drop for UpdateCoordinator {
    fn drop(&mut self) {
        for pump in &self.pumps {
            pump.abort();
        }
    }
}

fn spawn_status_pump(
    runtime: &Handle,
    mut events: mpsc::UnboundedReceiver<RawStatusEvent>,
    listeners: Arc<ListenerRegistry<StatusEvent>>,
) -> JoinHandle<()> {
    runtime.spawn(async move {
        while let Some(raw) = events.recv().await {
            let event = StatusEvent::from_raw(raw);
            if event.is_lossy() {
                warn!(
                    "Status event with non-numeric byte counts delivered as-is: {:?}",
                    event.status
                );
            }
            listeners.emit(&event);
        }
        warn!("Provider status channel closed");
    })
}

fn spawn_result_pump(
    runtime: &Handle,
    mut events: mpsc::UnboundedReceiver<ResultEvent>,
    listeners: Arc<ListenerRegistry<ResultEvent>>,
) -> JoinHandle<()> {
    runtime.spawn(async move {
        while let Some(event) = events.recv().await {
            listeners.emit(&event);
        }
        warn!("Provider result channel closed");
    })
}

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::ProviderError;
use crate::types::{AvailabilityInfo, RawStatusEvent, ResultEvent, UpdateType};

/// The platform update mechanism (store SDK, package manager, ...).
///
/// Implementations own downloading and installing; callers only ask whether
/// an update exists, kick off the flow and listen to what it reports.
#[async_trait]
pub trait UpdateProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn query_availability(&self) -> Result<AvailabilityInfo, ProviderError>;

    async fn start_update(&self, update_type: UpdateType) -> Result<(), ProviderError>;

    /// Complete a downloaded flexible update. Fire-and-forget.
    fn trigger_install(&self);

    /// Turn the provider's progress reporting on or off. Events are only
    /// worth producing while somebody is listening.
    fn set_status_stream_enabled(&self, enabled: bool);

    fn subscribe_status_events(&self) -> mpsc::UnboundedReceiver<RawStatusEvent>;

    fn subscribe_result_events(&self) -> mpsc::UnboundedReceiver<ResultEvent>;
}

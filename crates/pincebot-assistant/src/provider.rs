use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::AssistantError;
use crate::stream::StreamEvent;

/// A documentation assistant that answers one question as a stream of events.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Ask `query` and push [`StreamEvent`]s into `tx` until the answer is
    /// complete. Transport and status failures are returned; failures after
    /// the stream has started are sent as [`StreamEvent::Error`].
    async fn send_stream(
        &self,
        query: &str,
        tx: mpsc::Sender<StreamEvent>,
    ) -> Result<(), AssistantError>;
}

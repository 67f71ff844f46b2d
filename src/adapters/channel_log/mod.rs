// Channel log adapter - Batch log sink delivered to the controlling side

use async_trait::async_trait;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::ports::*;

/// Log sink that queues every line for the controller and mirrors it to tracing
///
/// Lines are delivered whole and in order. Once every sender is dropped the
/// receiver yields `None`, which marks the end of the batch log.
#[derive(Clone)]
pub struct ChannelLogAdapter {
    sender: UnboundedSender<String>,
}

impl ChannelLogAdapter {
    /// Create a sink and the receiver the controller reads from
    pub fn channel() -> (Self, UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl LogPort for ChannelLogAdapter {
    async fn append(&self, line: &str) {
        info!(target: "skraper_encoder::batch", "{}", line);

        if self.sender.send(line.to_string()).is_err() {
            debug!("Batch log receiver dropped; line kept in tracing only");
        }
    }
}

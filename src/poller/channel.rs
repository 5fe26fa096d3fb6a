use tokio::sync::oneshot::{self, error::TryRecvError, Receiver, Sender};
use tracing::error;

/// Create a pair of channel.
pub fn new() -> (ProducerChannel, ConsumerChannel) {
    let (tx_init, rx_init) = oneshot::channel::<()>();
    let (tx_close, rx_close) = oneshot::channel::<()>();
    (
        ProducerChannel::new(tx_init, rx_close),
        ConsumerChannel::new(tx_close, rx_init),
    )
}

/// Communication channel half in the poller.
///
/// Using this channel, the poller does the following.
///
/// - Send `Initialized` event once every table got its first cursors.
/// - Receive `Stop polling` event from the channel half.
#[derive(Debug)]
pub struct ProducerChannel {
    /// Sender half to send `Initialized` event.
    sender: Option<Sender<()>>,

    /// Receiver half to receive `Close` event.
    receiver: Receiver<()>,
}

impl ProducerChannel {
    fn new(sender: Sender<()>, receiver: Receiver<()>) -> Self {
        Self {
            sender: Some(sender),
            receiver,
        }
    }

    /// Send `Initialized` event to the channel half.
    pub fn send_init(&mut self) {
        if let Some(tx) = self.sender.take() {
            if tx.send(()).is_err() {
                error!("Unexpected error during sending initialized event: receiver dropped");
            }
        }
    }

    /// Return true if the `Stop polling` event is received or the other half is gone.
    pub fn should_close(&mut self) -> bool {
        !matches!(self.receiver.try_recv(), Err(TryRecvError::Empty))
    }

    /// Wait for the `Stop polling` event or for the other half to be dropped.
    ///
    /// Must not be awaited again once it has completed.
    pub async fn closed(&mut self) {
        let _ = (&mut self.receiver).await;
    }
}

/// Communication channel half to the poller.
///
/// Using this channel, you can do the following.
///
/// - Confirm that the poller has initialized its tables or not.
/// - Send `Stop polling` event to the poller.
#[derive(Debug)]
pub struct ConsumerChannel {
    /// Sender half to send `Close` event.
    sender: Option<Sender<()>>,

    /// Receiver half to receive `Initialized` event.
    receiver: Receiver<()>,

    initialized: bool,
}

impl ConsumerChannel {
    fn new(sender: Sender<()>, receiver: Receiver<()>) -> Self {
        Self {
            sender: Some(sender),
            receiver,
            initialized: false,
        }
    }

    /// Send `Stop polling` event to the poller. The passed closure is executed only when
    /// sending event fails.
    pub fn close(&mut self, f: impl FnOnce()) {
        if let Some(tx) = self.sender.take() {
            let _ = tx.send(()).map_err(|_| f());
        }
    }

    /// Return true once the poller has initialized every table.
    pub fn initialized(&mut self) -> bool {
        if !self.initialized {
            self.initialized = self.receiver.try_recv().is_ok();
        }
        self.initialized
    }
}

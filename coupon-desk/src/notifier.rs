use coupon_shared::FeedbackMessage;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Single notification slot with auto-dismiss.
///
/// Showing a message replaces whatever is displayed and cancels the pending
/// dismiss timer, so only the latest message's timer ever fires.
#[derive(Debug)]
pub struct Notifier {
    slot: Arc<watch::Sender<Option<FeedbackMessage>>>,
    dismiss_timer: Option<JoinHandle<()>>,
}

impl Notifier {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            slot: Arc::new(slot),
            dismiss_timer: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<FeedbackMessage>> {
        self.slot.subscribe()
    }

    pub fn current(&self) -> Option<FeedbackMessage> {
        self.slot.borrow().clone()
    }

    /// Must be called from within a tokio runtime
    pub fn show(&mut self, message: FeedbackMessage) {
        self.cancel_timer();

        let display_for = message.display_duration();
        self.slot.send_replace(Some(message));

        let slot = Arc::clone(&self.slot);
        self.dismiss_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(display_for).await;
            slot.send_replace(None);
        }));
    }

    pub fn dismiss(&mut self) {
        self.cancel_timer();
        self.slot.send_replace(None);
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.dismiss_timer.take() {
            timer.abort();
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// A full slow cycle (or the startup pass) has been applied.
    Metrics,
    Clock,
}

/// Fan-out of change notifications to every live subscriber.
#[derive(Debug, Default)]
pub struct Notifier {
    subscribers: Vec<mpsc::UnboundedSender<Change>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<Change> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Sends `change` to every subscriber, dropping those whose receiver is gone.
    pub fn publish(&mut self, change: Change) {
        self.subscribers.retain(|tx| tx.send(change).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

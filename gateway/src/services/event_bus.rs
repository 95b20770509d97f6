// gateway/src/services/event_bus.rs

use crate::models::PaymentEvent;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// In-process, fire-and-forget bus for payment domain events.
///
/// Publishing never blocks and never fails the caller: with no subscriber the
/// event is dropped, and a slow subscriber loses the oldest events.
#[derive(Clone)]
pub struct EventBus {
  sender: broadcast::Sender<PaymentEvent>,
}

impl Default for EventBus {
  fn default() -> Self {
    Self::new(256)
  }
}

impl EventBus {
  pub fn new(capacity: usize) -> Self {
    let (sender, _) = broadcast::channel(capacity);
    Self { sender }
  }

  pub fn subscribe(&self) -> broadcast::Receiver<PaymentEvent> {
    self.sender.subscribe()
  }

  /// Returns how many subscribers received the event.
  pub fn publish(&self, event: PaymentEvent) -> usize {
    let name = event.name();
    let event_id = event.event_id;
    match self.sender.send(event) {
      Ok(receivers) => {
        debug!(event = name, %event_id, receivers, "Event published.");
        receivers
      }
      Err(_) => {
        debug!(event = name, %event_id, "Event published with no subscribers.");
        0
      }
    }
  }
}

/// Logs every event until the bus is dropped. Spawned once by the server.
pub async fn log_events(mut receiver: broadcast::Receiver<PaymentEvent>) {
  loop {
    match receiver.recv().await {
      Ok(event) => info!(event = event.name(), event_id = %event.event_id, payload = ?event.kind, "Payment event."),
      Err(broadcast::error::RecvError::Lagged(skipped)) => warn!(skipped, "Event logger lagged behind."),
      Err(broadcast::error::RecvError::Closed) => break,
    }
  }
}

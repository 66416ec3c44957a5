//! Push destinations for check results.
//!
//! A [`Sink`] is the only thing a [`Monitor`](crate::schedule::Monitor)
//! knows about its observers. Accepting connections and framing messages
//! on the wire belong to the transport, which subscribes to one of the
//! adapters below.

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc};

use crate::monitor::errors::DeliveryError;
use crate::monitor::models::{CheckResult, Report};

/// Accepts a [`CheckResult`] and delivers it to zero or more observers.
///
/// Delivery may fail independently of the check. Implementations handle
/// their own synchronisation if other producers share them.
#[async_trait]
pub trait Sink: Send + Sync {
  async fn deliver(&self, result: &CheckResult) -> Result<(), DeliveryError>;
}

/// Fans report lines out to any number of observers.
///
/// Having no observers at all is not a delivery failure. Observers that
/// fall more than `capacity` lines behind lose the oldest lines.
#[derive(Debug, Clone)]
pub struct BroadcastSink {
  sender: broadcast::Sender<String>,
}

impl BroadcastSink {
  /// Creates a sink keeping up to `capacity` lines for slow observers.
  pub fn new(capacity: usize) -> Self {
    let (sender, _) = broadcast::channel(capacity.max(1));

    Self { sender }
  }

  /// Registers a new observer. It receives lines delivered from now on.
  pub fn subscribe(&self) -> broadcast::Receiver<String> {
    self.sender.subscribe()
  }

  /// Number of observers currently subscribed.
  pub fn observer_count(&self) -> usize {
    self.sender.receiver_count()
  }
}

#[async_trait]
impl Sink for BroadcastSink {
  async fn deliver(&self, result: &CheckResult) -> Result<(), DeliveryError> {
    let line = Report::now(result.clone()).line();

    match self.sender.send(line) {
      Ok(observers) => tracing::debug!("Result delivered to {} observers", observers),
      Err(_) => tracing::debug!("No observers connected, result dropped"),
    }

    Ok(())
  }
}

/// Delivers report lines to a single observer over a bounded channel.
///
/// Delivery waits while the channel is full and fails once the observer
/// has dropped its receiver.
#[derive(Debug, Clone)]
pub struct ChannelSink {
  sender: mpsc::Sender<String>,
}

impl ChannelSink {
  /// Creates a sink and the receiver its single observer reads from.
  pub fn new(capacity: usize) -> (Self, mpsc::Receiver<String>) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));

    (Self { sender }, receiver)
  }
}

#[async_trait]
impl Sink for ChannelSink {
  async fn deliver(&self, result: &CheckResult) -> Result<(), DeliveryError> {
    let line = Report::now(result.clone()).line();

    self
      .sender
      .send(line)
      .await
      .map_err(|_| DeliveryError::Closed)
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use super::*;

  fn success() -> CheckResult {
    CheckResult::Success {
      latency: Duration::from_millis(50),
      status_code: 200,
    }
  }

  #[tokio::test]
  async fn broadcast_without_observers() {
    let sink = BroadcastSink::new(8);

    assert_eq!(sink.observer_count(), 0);
    assert!(
      sink.deliver(&success()).await.is_ok(),
      "no observers is not an error"
    );
  }

  #[tokio::test]
  async fn broadcast_to_every_observer() {
    let sink = BroadcastSink::new(8);
    let mut first = sink.subscribe();
    let mut second = sink.subscribe();

    assert_eq!(sink.observer_count(), 2, "both observers are counted");

    sink.deliver(&success()).await.unwrap();
    sink
      .deliver(&CheckResult::unexpected_status(503))
      .await
      .unwrap();

    for observer in [&mut first, &mut second] {
      let line = observer.recv().await.unwrap();
      assert!(line.ends_with("Web app responded in 50.0ms (status 200)"));

      let line = observer.recv().await.unwrap();
      assert!(line.ends_with("Web app returned status code 503"));
    }
  }

  #[tokio::test]
  async fn channel_delivers_lines() {
    let (sink, mut receiver) = ChannelSink::new(4);

    sink
      .deliver(&CheckResult::transport_error("Timeout was reached"))
      .await
      .unwrap();

    let line = receiver.recv().await.unwrap();
    assert!(line.ends_with("Error checking web app: Timeout was reached"));
  }

  #[tokio::test]
  async fn channel_closed() {
    let (sink, receiver) = ChannelSink::new(4);
    drop(receiver);

    assert!(matches!(
      sink.deliver(&success()).await,
      Err(DeliveryError::Closed)
    ));
  }
}

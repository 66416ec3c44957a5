//! A module for running checks of a target at a regular interval.
//!
//! The [`Monitor`] owns one background task which wakes up every
//! [`interval`](CheckTarget::interval), runs a single check and forwards
//! the result to its [`Sink`].
//!
//! - Ticks run one after another, so results reach the sink in the order
//!   they were scheduled.
//! - A tick that overruns its period makes the monitor skip the overdue
//!   ticks instead of queueing them.
//! - Failed checks and failed deliveries never stop the monitor.
//!
//! Lifecycle: `Idle --start()--> Running --stop()--> Stopped`. A stopped
//! monitor cannot be restarted, build a new one instead.
//!
//! # Example
//!
//! ```rust, no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use webpulse_core::monitor::models::CheckTarget;
//! use webpulse_core::monitor::sink::BroadcastSink;
//! use webpulse_core::schedule::Monitor;
//!
//! async fn watch() {
//!   let target = CheckTarget::new("https://example.com", Duration::from_secs(10)).unwrap();
//!   let sink = BroadcastSink::new(16);
//!   let mut observer = sink.subscribe();
//!
//!   let mut monitor = Monitor::new(target, Arc::new(sink));
//!   monitor.start().unwrap();
//!
//!   println!("{}", observer.recv().await.unwrap());
//!
//!   monitor.stop().await.unwrap();
//! }
//!
//! # tokio_test::block_on(async {
//! watch().await;
//! # })
//! ```

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::measure;
use crate::monitor::errors::MonitorError;
use crate::monitor::models::CheckTarget;
use crate::monitor::probes::{HttpProbe, Probe};
use crate::monitor::sink::Sink;

/// Lifecycle state of a [`Monitor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonitorState {
  /// Built but not started yet.
  Idle,

  /// The check loop is running.
  Running,

  /// Stopped for good.
  Stopped,
}

/// Periodically checks a [`CheckTarget`] and delivers every result to a
/// [`Sink`].
///
/// Whoever builds the monitor owns its lifecycle and is expected to call
/// [`stop`](Monitor::stop) on shutdown. Dropping a running monitor cancels
/// its loop as well, without the delivery guarantee of `stop`.
pub struct Monitor {
  target: CheckTarget,
  sink: Arc<dyn Sink>,
  probe: Arc<dyn Probe>,
  state: MonitorState,
  cancel: CancellationToken,
  gate: Arc<Mutex<()>>,
}

impl Monitor {
  /// Creates an idle monitor checking `target` over HTTP.
  ///
  /// No I/O is performed until [`start`](Monitor::start).
  pub fn new(target: CheckTarget, sink: Arc<dyn Sink>) -> Self {
    Self::with_probe(target, sink, Arc::new(HttpProbe))
  }

  /// Creates an idle monitor using a custom [`Probe`].
  pub fn with_probe(target: CheckTarget, sink: Arc<dyn Sink>, probe: Arc<dyn Probe>) -> Self {
    Self {
      target,
      sink,
      probe,
      state: MonitorState::Idle,
      cancel: CancellationToken::new(),
      gate: Arc::new(Mutex::new(())),
    }
  }

  /// Current lifecycle state.
  pub fn state(&self) -> MonitorState {
    self.state
  }

  /// The target this monitor checks.
  pub fn target(&self) -> &CheckTarget {
    &self.target
  }

  /// Spawns the check loop on the current tokio runtime and returns
  /// immediately. The first check runs one interval later.
  ///
  /// Fails with [`MonitorError::InvalidState`] unless the monitor is idle,
  /// and with [`MonitorError::NoRuntime`] outside of a tokio runtime.
  pub fn start(&mut self) -> Result<(), MonitorError> {
    self.expect_state(MonitorState::Idle)?;

    let runtime = Handle::try_current().map_err(|_| MonitorError::NoRuntime)?;
    let ticker = Ticker {
      target: self.target.clone(),
      sink: Arc::clone(&self.sink),
      probe: Arc::clone(&self.probe),
      cancel: self.cancel.clone(),
      gate: Arc::clone(&self.gate),
    };

    runtime.spawn(ticker.run());
    self.state = MonitorState::Running;

    tracing::info!(
      "Monitoring {} every {:?}",
      self.target.url(),
      self.target.interval()
    );

    Ok(())
  }

  /// Stops the check loop.
  ///
  /// A pending timer wait is cancelled at once, and so is a delivery the
  /// sink has not accepted yet. Once `stop` returns the sink receives
  /// nothing more; a check still in flight runs to its own timeout and its
  /// result is discarded.
  ///
  /// Fails with [`MonitorError::InvalidState`] unless the monitor is
  /// running, so a second call is rejected.
  pub async fn stop(&mut self) -> Result<(), MonitorError> {
    self.expect_state(MonitorState::Running)?;

    self.state = MonitorState::Stopped;
    self.cancel.cancel();

    let _delivery = self.gate.lock().await;

    tracing::info!("Stopped monitoring {}", self.target.url());

    Ok(())
  }

  fn expect_state(&self, expected: MonitorState) -> Result<(), MonitorError> {
    if self.state != expected {
      return Err(MonitorError::InvalidState {
        expected,
        actual: self.state,
      });
    }

    Ok(())
  }
}

impl Drop for Monitor {
  fn drop(&mut self) {
    self.cancel.cancel();
  }
}

/// The state moved into the background task.
struct Ticker {
  target: CheckTarget,
  sink: Arc<dyn Sink>,
  probe: Arc<dyn Probe>,
  cancel: CancellationToken,
  gate: Arc<Mutex<()>>,
}

impl Ticker {
  async fn run(self) {
    let period = self.target.interval();
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
      tokio::select! {
        biased;
        _ = self.cancel.cancelled() => break,
        _ = interval.tick() => {}
      }

      let (delivered, elapsed) = measure!({ self.tick().await });

      if !delivered {
        break;
      }

      if elapsed > period {
        tracing::warn!(
          "Check of {} took {:?}, longer than the {:?} interval, skipping overdue ticks",
          self.target.url(),
          elapsed,
          period
        );
      }
    }

    tracing::debug!("Check loop for {} finished", self.target.url());
  }

  /// Runs one check-and-deliver sequence.
  ///
  /// Returns `false` when the monitor was stopped while checking, in which
  /// case the result is dropped.
  async fn tick(&self) -> bool {
    let result = self.probe.check(&self.target).await;

    let _delivery = self.gate.lock().await;

    if self.cancel.is_cancelled() {
      tracing::debug!("Monitor stopped, discarding result: {}", result);
      return false;
    }

    tracing::debug!("{}: {}", self.target.url(), result);

    // A backed up sink must not hold `stop` hostage.
    tokio::select! {
      biased;
      _ = self.cancel.cancelled() => {
        tracing::debug!("Monitor stopped, abandoning delivery: {}", result);
        return false;
      }
      delivered = self.sink.deliver(&result) => {
        if let Err(error) = delivered {
          tracing::warn!("Failed to deliver result for {}: {}", self.target.url(), error);
        }
      }
    }

    true
  }
}

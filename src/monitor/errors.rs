//! A module describing check, delivery and lifecycle errors.

use std::fmt;

use thiserror::Error;

use crate::schedule::MonitorState;

/// Why a single check did not succeed.
///
/// A failed check is not an error of the monitor itself: it is reported
/// as a [`CheckResult::Failure`](crate::monitor::models::CheckResult::Failure)
/// and the loop keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
  /// The request could not complete (DNS, connect, timeout, TLS).
  TransportError,

  /// The request completed but the target answered with a non-200 status.
  UnexpectedStatus,
}

impl fmt::Display for FailureReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FailureReason::TransportError => f.write_str("transport error"),
      FailureReason::UnexpectedStatus => f.write_str("unexpected status"),
    }
  }
}

/// Errors a [`Sink`](crate::monitor::sink::Sink) may return when it cannot
/// forward a result.
#[derive(Error, Debug)]
pub enum DeliveryError {
  /// The observer side of the channel has gone away.
  #[error("Sink is closed")]
  Closed,

  /// Any transport specific failure.
  #[error("Delivery failed: {0}")]
  Transport(String),
}

/// Errors returned to the owner of a [`Monitor`](crate::schedule::Monitor).
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MonitorError {
  /// `start` or `stop` was called out of sequence.
  #[error("Invalid monitor state. Expected: {expected:?}, actual: {actual:?}")]
  InvalidState {
    expected: MonitorState,
    actual: MonitorState,
  },

  /// `start` was called outside of a tokio runtime.
  #[error("No tokio runtime available to run the monitor")]
  NoRuntime,
}

/// Errors that can occur while building a
/// [`CheckTarget`](crate::monitor::models::CheckTarget).
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
  /// The target URL is empty.
  #[error("Target URL is empty")]
  EmptyUrl,

  /// The check interval is zero.
  #[error("Check interval must be greater than zero")]
  ZeroInterval,

  /// The per-check timeout is zero.
  #[error("Check timeout must be greater than zero")]
  ZeroTimeout,
}

/// Errors raised while performing an HTTP check.
///
/// These never leave the probe: they are folded into a
/// [`FailureReason::TransportError`] result.
#[derive(Error, Debug)]
pub enum ProbeError {
  /// curl could not set up or complete the request.
  #[error("{0}")]
  Curl(#[from] curl::Error),

  /// The blocking worker running the request did not finish.
  #[error("Probe worker failed: {0}")]
  Worker(#[from] tokio::task::JoinError),
}

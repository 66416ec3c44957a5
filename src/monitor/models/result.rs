use std::fmt;
use std::time::Duration;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::monitor::errors::FailureReason;

/// The outcome of a single check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckResult {
  /// The target answered with `200 OK`.
  Success {
    /// Time between issuing the request and receiving the full header block.
    latency: Duration,
    status_code: u16,
  },

  /// The check failed.
  Failure {
    reason: FailureReason,
    detail: String,
    /// Present when the target answered at all.
    status_code: Option<u16>,
  },
}

impl CheckResult {
  pub fn transport_error(detail: impl Into<String>) -> Self {
    CheckResult::Failure {
      reason: FailureReason::TransportError,
      detail: detail.into(),
      status_code: None,
    }
  }

  pub fn unexpected_status(status_code: u16) -> Self {
    CheckResult::Failure {
      reason: FailureReason::UnexpectedStatus,
      detail: String::from("unexpected status"),
      status_code: Some(status_code),
    }
  }

  pub fn is_success(&self) -> bool {
    matches!(self, CheckResult::Success { .. })
  }

  pub fn latency(&self) -> Option<Duration> {
    match self {
      CheckResult::Success { latency, .. } => Some(*latency),
      CheckResult::Failure { .. } => None,
    }
  }

  pub fn status_code(&self) -> Option<u16> {
    match self {
      CheckResult::Success { status_code, .. } => Some(*status_code),
      CheckResult::Failure { status_code, .. } => *status_code,
    }
  }

  pub fn reason(&self) -> Option<FailureReason> {
    match self {
      CheckResult::Success { .. } => None,
      CheckResult::Failure { reason, .. } => Some(*reason),
    }
  }
}

impl fmt::Display for CheckResult {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CheckResult::Success {
        latency,
        status_code,
      } => write!(
        f,
        "Web app responded in {:.1}ms (status {})",
        latency.as_secs_f64() * 1000.0,
        status_code
      ),
      CheckResult::Failure {
        status_code: Some(code),
        ..
      } => write!(f, "Web app returned status code {}", code),
      CheckResult::Failure { detail, .. } => write!(f, "Error checking web app: {}", detail),
    }
  }
}

/// A [`CheckResult`] stamped with the time it was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
  pub timestamp: OffsetDateTime,
  pub result: CheckResult,
}

impl Report {
  /// Stamps `result` with the current UTC time.
  pub fn now(result: CheckResult) -> Self {
    Self {
      timestamp: OffsetDateTime::now_utc(),
      result,
    }
  }

  /// Renders the text line delivered to observers.
  pub fn line(&self) -> String {
    let timestamp = self
      .timestamp
      .format(&Rfc3339)
      .unwrap_or_else(|_| self.timestamp.unix_timestamp().to_string());

    format!("{} {}", timestamp, self.result)
  }
}

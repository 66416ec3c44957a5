use std::time::Duration;

use crate::monitor::errors::ConfigError;

/// Timeout applied to a single check unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// The endpoint a monitor checks and how often it does so.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckTarget {
  url: String,
  interval: Duration,
  timeout: Duration,
}

impl CheckTarget {
  /// Creates a target with the [default timeout](DEFAULT_TIMEOUT).
  pub fn new(url: impl Into<String>, interval: Duration) -> Result<Self, ConfigError> {
    let url = url.into();

    if url.trim().is_empty() {
      return Err(ConfigError::EmptyUrl);
    }

    if interval.is_zero() {
      return Err(ConfigError::ZeroInterval);
    }

    Ok(Self {
      url,
      interval,
      timeout: DEFAULT_TIMEOUT,
    })
  }

  /// Overrides the per-check timeout.
  pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
    if timeout.is_zero() {
      return Err(ConfigError::ZeroTimeout);
    }

    self.timeout = timeout;

    Ok(self)
  }

  pub fn url(&self) -> &str {
    &self.url
  }

  pub fn interval(&self) -> Duration {
    self.interval
  }

  pub fn timeout(&self) -> Duration {
    self.timeout
  }
}

/// Deserializable target configuration, loaded before a monitor is built.
#[derive(Debug, serde::Deserialize)]
pub struct TargetConfig {
  /// Absolute URL of the checked endpoint.
  pub url: String,

  /// How often the monitor should perform a check, in seconds.
  #[serde(default = "default_check_frequency")]
  pub check_frequency: u64,

  /// Maximum time, in seconds, to wait for a response before timing out.
  #[serde(default = "default_timeout")]
  pub timeout: u64,
}

fn default_check_frequency() -> u64 {
  10
}

fn default_timeout() -> u64 {
  DEFAULT_TIMEOUT.as_secs()
}

impl TryFrom<TargetConfig> for CheckTarget {
  type Error = ConfigError;

  fn try_from(config: TargetConfig) -> Result<Self, Self::Error> {
    CheckTarget::new(config.url, Duration::from_secs(config.check_frequency))?
      .with_timeout(Duration::from_secs(config.timeout))
  }
}

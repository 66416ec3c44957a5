mod http;

use async_trait::async_trait;

use crate::monitor::models::{CheckResult, CheckTarget};

pub use http::HttpProbe;

/// Performs one bounded check against a target.
///
/// Implementations must not panic on network failures: every outcome is
/// represented as a [`CheckResult`].
#[async_trait]
pub trait Probe: Send + Sync {
  async fn check(&self, target: &CheckTarget) -> CheckResult;
}

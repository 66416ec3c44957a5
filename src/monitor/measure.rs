use crate::monitor::models::{CheckResult, CheckTarget};
use crate::monitor::probes::{HttpProbe, Probe};

#[doc(hidden)]
#[macro_export]
macro_rules! measure {
  ($block:block) => {{
    let start = std::time::Instant::now();
    let result = { $block };

    (result, start.elapsed())
  }};
}

impl CheckTarget {
  /// Performs a single HTTP check of this target asynchronously.
  ///
  /// Issues a `GET` to [`url`](CheckTarget::url) bounded by
  /// [`timeout`](CheckTarget::timeout) and returns:
  ///
  /// - [`CheckResult::Success`] with the header latency when the target
  ///   answers `200 OK`.
  /// - [`CheckResult::Failure`] with
  ///   [`UnexpectedStatus`](crate::monitor::errors::FailureReason::UnexpectedStatus)
  ///   for any other status.
  /// - [`CheckResult::Failure`] with
  ///   [`TransportError`](crate::monitor::errors::FailureReason::TransportError)
  ///   when no response was received.
  pub async fn check(&self) -> CheckResult {
    HttpProbe.check(self).await
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use httpmock::Method::GET;
  use httpmock::MockServer;

  use super::*;
  use crate::monitor::errors::FailureReason;

  #[test]
  fn measure_macro() {
    let ((), elapsed) = measure!({
      std::thread::sleep(Duration::from_millis(50));
    });

    assert!(elapsed >= Duration::from_millis(50));
  }

  #[tokio::test]
  async fn check_target_with_success() {
    let server = MockServer::start_async().await;

    let mock = server
      .mock_async(|when, then| {
        when.method(GET).path("/check");
        then.status(200).body("index");
      })
      .await;

    let target = CheckTarget::new(server.url("/check"), Duration::from_secs(10)).unwrap();
    let result = target.check().await;

    mock.assert_async().await;

    assert!(
      result.is_success() && result.latency().is_some(),
      "check has latency"
    );
  }

  #[tokio::test]
  async fn check_target_with_error() {
    let server = MockServer::start_async().await;

    let mock = server
      .mock_async(|when, then| {
        when.method(GET).path("/check");
        then.status(500);
      })
      .await;

    let target = CheckTarget::new(server.url("/check"), Duration::from_secs(10)).unwrap();
    let result = target.check().await;

    mock.assert_async().await;

    assert_eq!(
      result.reason(),
      Some(FailureReason::UnexpectedStatus),
      "check has error"
    );
    assert_eq!(result.status_code(), Some(500));
  }
}

use std::time::{Duration, Instant};

use async_trait::async_trait;
use curl::easy::{Easy2, Handler, HttpVersion, WriteError};
use tokio::task;

use crate::monitor::errors::ProbeError;
use crate::monitor::models::{CheckResult, CheckTarget};
use crate::monitor::probes::Probe;

/// Collects the moment the response header block was fully received.
///
/// The body is drained and dropped.
#[derive(Default)]
struct ResponseHeaders {
  received_at: Option<Instant>,
}

impl Handler for ResponseHeaders {
  fn write(&mut self, data: &[u8]) -> Result<usize, WriteError> {
    Ok(data.len())
  }

  fn header(&mut self, data: &[u8]) -> bool {
    // The header block ends with an empty line. With interim responses
    // (`100 Continue`) the last block wins.
    if data == b"\r\n" || data == b"\n" {
      self.received_at = Some(Instant::now());
    }

    true
  }
}

/// Performs a single `GET` with curl and classifies the outcome.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpProbe;

impl HttpProbe {
  /// Returns the response status code and the header latency.
  async fn perform(target: &CheckTarget) -> Result<(u16, Duration), ProbeError> {
    let url = target.url().to_owned();
    let timeout = target.timeout();

    task::spawn_blocking(move || -> Result<(u16, Duration), ProbeError> {
      let mut request = Easy2::new(ResponseHeaders::default());
      request.url(url.as_str())?;
      request.get(true)?;
      request.timeout(timeout)?;
      request.connect_timeout(timeout)?;
      request.signal(false)?;
      request.follow_location(false)?;
      request.http_version(HttpVersion::V2TLS)?;

      let start = Instant::now();
      request.perform()?;

      let status = request.response_code()? as u16;
      let latency = match request.get_ref().received_at {
        Some(received_at) => received_at.saturating_duration_since(start),
        None => request.starttransfer_time()?,
      };

      Ok((status, latency))
    })
    .await?
  }
}

#[async_trait]
impl Probe for HttpProbe {
  async fn check(&self, target: &CheckTarget) -> CheckResult {
    match HttpProbe::perform(target).await {
      Ok((200, latency)) => CheckResult::Success {
        latency,
        status_code: 200,
      },
      Ok((status, _)) => {
        tracing::warn!("{} returned status code {}", target.url(), status);
        CheckResult::unexpected_status(status)
      }
      Err(error) => {
        tracing::warn!("Error checking {}: {}", target.url(), error);
        CheckResult::transport_error(error.to_string())
      }
    }
  }
}

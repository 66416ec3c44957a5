//! A module for checking an HTTP endpoint and pushing the results.
//!
//! # Example
//!
//! ```rust, no_run
//! use std::time::Duration;
//!
//! use webpulse_core::monitor::models::CheckTarget;
//!
//! async fn check_once() {
//!   let target = CheckTarget::new("https://example.com", Duration::from_secs(10))
//!     .and_then(|target| target.with_timeout(Duration::from_secs(3)))
//!     .unwrap();
//!
//!   let result = target.check().await;
//!
//!   assert!(result.is_success() && result.latency().is_some());
//! }
//!
//! # tokio_test::block_on(async {
//! check_once().await;
//! # })
//! ```

mod measure;

pub mod errors;
pub mod models;
pub mod probes;
pub mod sink;

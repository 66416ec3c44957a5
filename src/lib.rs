#![forbid(unsafe_code)]

//! Webpulse core library.
//!
//! ## Features
//!
//! - **monitor** – Models, errors and the HTTP [Probe](monitor::probes::Probe)
//!   for checking a single endpoint, plus the [Sink](monitor::sink::Sink)
//!   capability results are pushed to.
//! - **schedule** – Provides the [Monitor](schedule::Monitor), which checks
//!   a [CheckTarget](monitor::models::CheckTarget) at a regular interval and
//!   delivers every result to its sink until it is stopped.

pub mod monitor;
pub mod schedule;

//! A module containing a set of models for checks and their results.

mod result;
mod target;

pub use result::{CheckResult, Report};
pub use target::{CheckTarget, DEFAULT_TIMEOUT, TargetConfig};

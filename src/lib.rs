//! pushjobs - job state of a CI push
//!
//! Takes the job records of one push and decides what a push view shows:
//! which jobs are visible under the active filter, which render as
//! individual buttons and which fold into per-status counts, and which
//! failures are likely intermittent rather than regressions.
//!
//! ## Layout
//!
//! - [`domain`]: jobs, groups and platforms, enrichment and task-run parsing
//! - [`filter`]: the job filter and per-platform visibility
//! - [`push`]: confirm-group matching, intermittent detection, count
//!   aggregation and the [`push::PushJobs`] wiring
//! - [`selection`]: the job control registry, URL parameters and the
//!   selected-job store
//! - [`config`]: `.pushjobs/config.toml`

pub mod config;
pub mod domain;
pub mod filter;
pub mod push;
pub mod selection;

pub use domain::*;

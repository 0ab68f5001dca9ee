//! Job filtering
//!
//! - [`FilterModel`]: the predicate deciding whether a job matches the
//!   active filters
//! - [`JobFilter`]: the configurable implementation (result status,
//!   classification state, tier and search terms)
//! - [`VisibilityFilter`]: applies a model to a platform row and rolls the
//!   result up into group and platform visibility

mod visibility;

pub use visibility::VisibilityFilter;

use serde::{Deserialize, Serialize};

use crate::domain::{Job, is_classified};

/// Every result status a filter can select
pub const ALL_RESULT_STATUSES: [&str; 10] = [
    "testfailed",
    "busted",
    "exception",
    "success",
    "retry",
    "usercancel",
    "superseded",
    "running",
    "pending",
    "runnable",
];

/// Decides whether a job matches the active filters
pub trait FilterModel: Send + Sync {
    fn show_job(&self, job: &Job) -> bool;
}

impl<F> FilterModel for F
where
    F: Fn(&Job) -> bool + Send + Sync,
{
    fn show_job(&self, job: &Job) -> bool {
        self(job)
    }
}

fn default_result_status() -> Vec<String> {
    ALL_RESULT_STATUSES.iter().map(|s| s.to_string()).collect()
}

fn default_classified_state() -> Vec<String> {
    vec!["classified".to_string(), "unclassified".to_string()]
}

fn default_tier() -> Vec<u8> {
    vec![1, 2]
}

/// Filter settings, as stored in config and toggled by the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFilter {
    /// Result statuses to show
    #[serde(default = "default_result_status")]
    pub result_status: Vec<String>,

    /// Any of `classified`, `unclassified`
    #[serde(default = "default_classified_state")]
    pub classified_state: Vec<String>,

    /// Tiers to show. Jobs without a tier always pass.
    #[serde(default = "default_tier")]
    pub tier: Vec<u8>,

    /// Terms that must all appear in a job's search string
    #[serde(default)]
    pub search: Vec<String>,
}

impl Default for JobFilter {
    fn default() -> Self {
        Self {
            result_status: default_result_status(),
            classified_state: default_classified_state(),
            tier: default_tier(),
            search: Vec::new(),
        }
    }
}

impl JobFilter {
    /// Show only failures nobody has classified yet
    pub fn unclassified_failures() -> Self {
        Self {
            result_status: vec![
                "testfailed".to_string(),
                "busted".to_string(),
                "exception".to_string(),
            ],
            classified_state: vec!["unclassified".to_string()],
            ..Self::default()
        }
    }

    pub fn with_search<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.search = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        self
    }

    /// Toggle a single result status on or off
    pub fn toggle_result_status(&mut self, status: &str) {
        if let Some(pos) = self.result_status.iter().position(|s| s == status) {
            self.result_status.remove(pos);
        } else {
            self.result_status.push(status.to_string());
        }
    }

    fn check_classified_state(&self, job: &Job) -> bool {
        let classified = is_classified(job);
        let allows = |state: &str| self.classified_state.iter().any(|s| s == state);

        if classified {
            allows("classified")
        } else {
            allows("unclassified")
        }
    }

    fn check_field_filters(&self, job: &Job) -> bool {
        if let Some(tier) = job.tier {
            if !self.tier.is_empty() && !self.tier.contains(&tier) {
                return false;
            }
        }

        let search_str = job.search_str.to_lowercase();
        self.search
            .iter()
            .all(|term| search_str.contains(&term.to_lowercase()))
    }
}

impl FilterModel for JobFilter {
    fn show_job(&self, job: &Job) -> bool {
        // Runnable jobs ignore result and classification filters
        if !job.is_runnable() {
            if !self.result_status.iter().any(|s| *s == job.result_status) {
                return false;
            }
            if !self.check_classified_state(job) {
                return false;
            }
        }

        self.check_field_filters(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{JobResult, JobState};

    fn job(result: JobResult) -> Job {
        let mut job = Job::new(1, "mochitest-browser", "bc", "linux64")
            .with_group("Mochitest", "M")
            .with_option("opt")
            .completed(result);
        job.add_aggregate_fields();
        job
    }

    #[test]
    fn test_default_filter_shows_everything() {
        let filter = JobFilter::default();
        assert!(filter.show_job(&job(JobResult::Success)));
        assert!(filter.show_job(&job(JobResult::Testfailed).with_classification(4)));
    }

    #[test]
    fn test_result_status_filter() {
        let mut filter = JobFilter::default();
        filter.toggle_result_status("success");
        assert!(!filter.show_job(&job(JobResult::Success)));
        assert!(filter.show_job(&job(JobResult::Busted)));

        filter.toggle_result_status("success");
        assert!(filter.show_job(&job(JobResult::Success)));
    }

    #[test]
    fn test_unclassified_failures_filter() {
        let filter = JobFilter::unclassified_failures();
        assert!(filter.show_job(&job(JobResult::Testfailed)));
        assert!(!filter.show_job(&job(JobResult::Testfailed).with_classification(2)));
        assert!(!filter.show_job(&job(JobResult::Success)));
    }

    #[test]
    fn test_runnable_skips_status_filters() {
        let filter = JobFilter::unclassified_failures();
        let mut runnable = Job::new(2, "build", "B", "linux64").with_state(JobState::Runnable);
        runnable.tier = None;
        runnable.add_aggregate_fields();
        assert!(filter.show_job(&runnable));
    }

    #[test]
    fn test_search_requires_all_terms() {
        let filter = JobFilter::default().with_search(["Mochitest", "bc"]);
        assert!(filter.show_job(&job(JobResult::Success)));

        let filter = JobFilter::default().with_search(["mochitest", "reftest"]);
        assert!(!filter.show_job(&job(JobResult::Success)));
    }

    #[test]
    fn test_tier_filter() {
        let filter = JobFilter::default();
        assert!(!filter.show_job(&job(JobResult::Success).with_tier(3)));
        assert!(filter.show_job(&job(JobResult::Success).with_tier(2)));
    }

    #[test]
    fn test_closure_as_filter_model() {
        let only_failures = |j: &Job| j.result == JobResult::Testfailed;
        assert!(only_failures.show_job(&job(JobResult::Testfailed)));
        assert!(!only_failures.show_job(&job(JobResult::Success)));
    }
}

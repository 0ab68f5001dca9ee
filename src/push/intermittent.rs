//! Intermittent failure detection.
//!
//! A job type that both passes and fails within one push is treated as
//! noise unless a confirm-failure rerun reproduces the failure:
//! - retriggers only: intermittent when at most half of the runs failed
//! - a green confirm rerun: intermittent
//! - a failing confirm rerun: a confirmed regression, never intermittent

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::domain::{Group, Job, JobResult};

/// Failure ratio tolerated without a confirm rerun
const RETRIGGER_THRESHOLD: f64 = 0.5;

/// Name of the job a confirm-failure job reruns
fn confirm_base_name(job_type_name: &str) -> &str {
    job_type_name.split("-cf").next().unwrap_or(job_type_name)
}

/// Job-type names in `group_jobs` classified intermittent.
///
/// `confirm_group` is the group's matched "-cf" group, if any.
pub fn intermittent_job_type_names(
    group_jobs: &[Job],
    confirm_group: Option<&Group>,
) -> BTreeSet<String> {
    let mut job_count_by_name: HashMap<&str, usize> = HashMap::new();
    let mut failed_job_type_names: HashMap<&str, Vec<u64>> = HashMap::new();

    for job in group_jobs {
        let name = job.job_type_name.as_str();
        let count = job_count_by_name.entry(name).or_default();
        // retry, usercancel etc. say nothing about the test
        if !job.result.is_signal() {
            continue;
        }
        *count += 1;

        if job.result == JobResult::Testfailed {
            failed_job_type_names.entry(name).or_default().push(job.id);
        }
    }

    let mut job_count_by_confirm_name: HashMap<&str, usize> = HashMap::new();
    let mut confirmed_job_names: HashSet<&str> = HashSet::new();

    if let Some(confirm_group) = confirm_group {
        for cf_job in &confirm_group.jobs {
            if cf_job.result == JobResult::Unknown {
                continue;
            }

            let base = confirm_base_name(&cf_job.job_type_name);
            // Only names with a signal-bearing run in this group count
            let Some((&name, _)) = job_count_by_name
                .get_key_value(base)
                .filter(|(_, count)| **count > 0)
            else {
                continue;
            };

            *job_count_by_confirm_name.entry(name).or_default() += 1;
            if cf_job.result == JobResult::Testfailed {
                confirmed_job_names.insert(name);
            }
        }
    }

    let mut intermittent = BTreeSet::new();
    for job in group_jobs {
        let name = job.job_type_name.as_str();
        if confirmed_job_names.contains(name) {
            continue;
        }

        let green_confirm = job_count_by_confirm_name.get(name).is_some_and(|&n| n > 0);

        if job.result == JobResult::Success {
            if let Some(failures) = failed_job_type_names.get(name) {
                let threshold = if green_confirm { 1.0 } else { RETRIGGER_THRESHOLD };
                let total = job_count_by_name.get(name).copied().unwrap_or(0);
                if total > 0 && failures.len() as f64 / total as f64 <= threshold {
                    intermittent.insert(name.to_string());
                }
            }
        }

        if green_confirm {
            intermittent.insert(name.to_string());
        }
    }

    if !intermittent.is_empty() {
        tracing::debug!("Intermittent job types: {:?}", intermittent);
    }
    intermittent
}

/// Whether a job's failure should be shown as intermittent
pub fn is_intermittent(job: &Job, intermittent_names: &BTreeSet<String>) -> bool {
    job.result == JobResult::Testfailed && intermittent_names.contains(&job.job_type_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: u64, name: &str, result: JobResult) -> Job {
        Job::new(id, name, "1", "linux64").completed(result)
    }

    fn confirm(jobs: Vec<Job>) -> Group {
        let mut group = Group::new(1, "M-cf", 3, "Mochitest", "linux64", "opt");
        group.jobs = jobs;
        group
    }

    #[test]
    fn test_one_of_three_failing_is_intermittent() {
        let jobs = vec![
            job(1, "A", JobResult::Testfailed),
            job(2, "A", JobResult::Success),
            job(3, "A", JobResult::Success),
        ];
        assert!(intermittent_job_type_names(&jobs, None).contains("A"));
    }

    #[test]
    fn test_two_of_three_failing_is_not_intermittent() {
        let jobs = vec![
            job(1, "A", JobResult::Testfailed),
            job(2, "A", JobResult::Testfailed),
            job(3, "A", JobResult::Success),
        ];
        assert!(!intermittent_job_type_names(&jobs, None).contains("A"));
    }

    #[test]
    fn test_half_failing_is_intermittent() {
        let jobs = vec![job(1, "A", JobResult::Testfailed), job(2, "A", JobResult::Success)];
        assert!(intermittent_job_type_names(&jobs, None).contains("A"));
    }

    #[test]
    fn test_green_confirm_marks_intermittent() {
        let jobs = vec![job(1, "A", JobResult::Testfailed)];
        let cf = confirm(vec![job(10, "A-cf", JobResult::Success)]);
        assert!(intermittent_job_type_names(&jobs, Some(&cf)).contains("A"));
    }

    #[test]
    fn test_failing_confirm_is_a_regression() {
        let jobs = vec![
            job(1, "A", JobResult::Testfailed),
            job(2, "A", JobResult::Success),
            job(3, "A", JobResult::Success),
        ];
        let cf = confirm(vec![
            job(10, "A-cf", JobResult::Success),
            job(11, "A-cf", JobResult::Testfailed),
        ]);
        assert!(!intermittent_job_type_names(&jobs, Some(&cf)).contains("A"));
    }

    #[test]
    fn test_unknown_confirm_results_ignored() {
        let jobs = vec![job(1, "A", JobResult::Testfailed)];
        let mut pending = job(10, "A-cf", JobResult::Unknown);
        pending.state = crate::domain::JobState::Running;
        let cf = confirm(vec![pending]);
        assert!(intermittent_job_type_names(&jobs, Some(&cf)).is_empty());
    }

    #[test]
    fn test_retries_are_not_signal() {
        // Two retries must not dilute the failure ratio
        let jobs = vec![
            job(1, "A", JobResult::Testfailed),
            job(2, "A", JobResult::Retry),
            job(3, "A", JobResult::Usercancel),
        ];
        assert!(intermittent_job_type_names(&jobs, None).is_empty());
    }

    #[test]
    fn test_confirm_only_counts_names_with_signal() {
        let jobs = vec![job(1, "A", JobResult::Retry)];
        let cf = confirm(vec![job(10, "A-cf", JobResult::Success)]);
        assert!(intermittent_job_type_names(&jobs, Some(&cf)).is_empty());
    }

    #[test]
    fn test_names_are_independent() {
        let jobs = vec![
            job(1, "A", JobResult::Testfailed),
            job(2, "A", JobResult::Success),
            job(3, "B", JobResult::Testfailed),
            job(4, "C", JobResult::Success),
        ];
        let names = intermittent_job_type_names(&jobs, None);
        assert_eq!(names.into_iter().collect::<Vec<_>>(), ["A"]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(intermittent_job_type_names(&[], None).is_empty());
        let cf = confirm(Vec::new());
        assert!(intermittent_job_type_names(&[], Some(&cf)).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let jobs = vec![
            job(1, "B", JobResult::Testfailed),
            job(2, "B", JobResult::Success),
            job(3, "A", JobResult::Testfailed),
            job(4, "A", JobResult::Success),
        ];
        let cf = confirm(vec![job(10, "A-cf", JobResult::Success)]);
        let first = intermittent_job_type_names(&jobs, Some(&cf));
        for _ in 0..5 {
            assert_eq!(intermittent_job_type_names(&jobs, Some(&cf)), first);
        }
    }

    #[test]
    fn test_is_intermittent_only_for_failures() {
        let names: BTreeSet<String> = ["A".to_string()].into_iter().collect();
        assert!(is_intermittent(&job(1, "A", JobResult::Testfailed), &names));
        assert!(!is_intermittent(&job(2, "A", JobResult::Success), &names));
        assert!(!is_intermittent(&job(3, "B", JobResult::Testfailed), &names));
    }
}

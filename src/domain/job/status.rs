use super::{Job, JobState};

/// Result statuses that are always rendered as individual buttons
pub const FAILURE_RESULTS: [&str; 3] = ["testfailed", "busted", "exception"];

/// Classification ids that count as "unclassified"
const UNCLASSIFIED_IDS: [u32; 2] = [6, 8];

/// The status shown for a job: its result once completed, its state otherwise
pub fn result_status(job: &Job) -> &'static str {
    match job.state {
        JobState::Completed => job.result.as_str(),
        state => state.as_str(),
    }
}

/// Visual class of a job button
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BtnClass {
    /// Result status, `unknown` when absent
    pub status: String,
    pub is_classified: bool,
}

fn classified_id(failure_classification_id: u32) -> bool {
    failure_classification_id > 1 && !UNCLASSIFIED_IDS.contains(&failure_classification_id)
}

pub fn get_btn_class(result_status: Option<&str>, failure_classification_id: u32) -> BtnClass {
    let status = match result_status {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => "unknown".to_string(),
    };

    BtnClass {
        status,
        is_classified: classified_id(failure_classification_id),
    }
}

pub fn is_classified(job: &Job) -> bool {
    classified_id(job.failure_classification_id)
}

/// A failing job nobody has classified yet
pub fn is_unclassified_failure(job: &Job) -> bool {
    FAILURE_RESULTS.contains(&job.result.as_str()) && !is_classified(job)
}

pub fn is_reftest(job: &Job) -> bool {
    [&job.job_group_name, &job.job_type_name]
        .iter()
        .any(|name| name.to_lowercase().contains("reftest"))
        || job.job_type_name.contains("test-verify")
        || job.job_type_symbol.contains("wrench")
}

pub fn is_perf_test(job: &Job) -> bool {
    [&job.job_group_name, &job.job_type_name].iter().any(|name| {
        let name = name.to_lowercase();
        ["talos", "raptor", "browsertime", "perftest"]
            .iter()
            .any(|kind| name.contains(kind))
    })
}

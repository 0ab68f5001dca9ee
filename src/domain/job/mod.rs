mod enrich;
mod status;

pub use status::{
    BtnClass, FAILURE_RESULTS, get_btn_class, is_classified, is_perf_test, is_reftest,
    is_unclassified_failure, result_status,
};

use serde::{Deserialize, Serialize};

/// Unique identifier for a job
pub type JobId = u64;

/// Scheduling state of a CI job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    /// Scheduled but not started
    #[default]
    Pending,
    /// Currently executing
    Running,
    /// Finished; `result` is meaningful
    Completed,
    /// Selectable but not yet scheduled
    Runnable,
    /// Any state this crate does not know about
    #[serde(other)]
    Unknown,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Running => "running",
            JobState::Completed => "completed",
            JobState::Runnable => "runnable",
            JobState::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a CI job. `Unknown` until the job completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobResult {
    Success,
    Testfailed,
    Busted,
    Exception,
    Retry,
    Usercancel,
    Superseded,
    #[default]
    #[serde(other)]
    Unknown,
}

impl JobResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobResult::Success => "success",
            JobResult::Testfailed => "testfailed",
            JobResult::Busted => "busted",
            JobResult::Exception => "exception",
            JobResult::Retry => "retry",
            JobResult::Usercancel => "usercancel",
            JobResult::Superseded => "superseded",
            JobResult::Unknown => "unknown",
        }
    }

    /// Results that carry pass/fail signal. Retries and cancellations don't.
    pub fn is_signal(&self) -> bool {
        matches!(
            self,
            JobResult::Success | JobResult::Testfailed | JobResult::Exception | JobResult::Busted
        )
    }
}

impl std::fmt::Display for JobResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_classification() -> u32 {
    1
}

/// One CI task execution record within a push.
///
/// The fields after `end_timestamp` are derived: `visible`/`selected` are
/// rewritten by the visibility filter, the rest by
/// [`Job::add_aggregate_fields`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,

    /// Push this job belongs to
    #[serde(default)]
    pub push_id: u64,

    pub job_type_name: String,
    pub job_type_symbol: String,

    #[serde(default)]
    pub job_group_name: String,

    #[serde(default)]
    pub job_group_symbol: String,

    pub platform: String,

    #[serde(default)]
    pub platform_option: String,

    /// CI priority class; runnable jobs have none
    #[serde(default)]
    pub tier: Option<u8>,

    #[serde(default)]
    pub state: JobState,

    #[serde(default)]
    pub result: JobResult,

    /// 1 = unclassified, 6 = new failure, 7 = autoclassified intermittent,
    /// 8 = not a failure, anything else above 1 = classified
    #[serde(default = "default_classification")]
    pub failure_classification_id: u32,

    /// Taskcluster task id, when the record carries it separately
    #[serde(default)]
    pub task_id: Option<String>,

    #[serde(default)]
    pub retry_id: Option<u32>,

    /// `"<taskId>.<retryId>"`
    #[serde(default)]
    pub task_run: String,

    #[serde(default)]
    pub signature: String,

    #[serde(default)]
    pub submit_timestamp: i64,

    #[serde(default)]
    pub start_timestamp: i64,

    /// Zero while the job is still running
    #[serde(default)]
    pub end_timestamp: i64,

    #[serde(default)]
    pub visible: bool,

    #[serde(default)]
    pub selected: bool,

    #[serde(default)]
    pub result_status: String,

    /// Run time in whole minutes
    #[serde(default)]
    pub duration: Option<i64>,

    #[serde(default)]
    pub search_str: String,

    #[serde(default)]
    pub hover_text: String,
}

impl Job {
    /// Create a pending job with only the identifying fields set.
    pub fn new(
        id: JobId,
        job_type_name: impl Into<String>,
        job_type_symbol: impl Into<String>,
        platform: impl Into<String>,
    ) -> Self {
        Self {
            id,
            push_id: 0,
            job_type_name: job_type_name.into(),
            job_type_symbol: job_type_symbol.into(),
            job_group_name: String::new(),
            job_group_symbol: String::new(),
            platform: platform.into(),
            platform_option: String::new(),
            tier: Some(1),
            state: JobState::Pending,
            result: JobResult::Unknown,
            failure_classification_id: 1,
            task_id: None,
            retry_id: None,
            task_run: String::new(),
            signature: String::new(),
            submit_timestamp: 0,
            start_timestamp: 0,
            end_timestamp: 0,
            visible: true,
            selected: false,
            result_status: String::new(),
            duration: None,
            search_str: String::new(),
            hover_text: String::new(),
        }
    }

    /// Mark the job completed with the given result
    pub fn completed(mut self, result: JobResult) -> Self {
        self.state = JobState::Completed;
        self.result = result;
        self.result_status = result_status(&self).to_string();
        self
    }

    pub fn with_state(mut self, state: JobState) -> Self {
        self.state = state;
        self.result_status = result_status(&self).to_string();
        self
    }

    pub fn with_task_run(mut self, task_run: impl Into<String>) -> Self {
        self.task_run = task_run.into();
        self
    }

    pub fn with_group(mut self, name: impl Into<String>, symbol: impl Into<String>) -> Self {
        self.job_group_name = name.into();
        self.job_group_symbol = symbol.into();
        self
    }

    pub fn with_tier(mut self, tier: u8) -> Self {
        self.tier = Some(tier);
        self
    }

    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.platform_option = option.into();
        self
    }

    pub fn with_classification(mut self, failure_classification_id: u32) -> Self {
        self.failure_classification_id = failure_classification_id;
        self
    }

    /// Tier used for grouping. Jobs without one group with tier 1.
    pub fn effective_tier(&self) -> u8 {
        self.tier.unwrap_or(1)
    }

    pub fn is_runnable(&self) -> bool {
        self.state == JobState::Runnable
    }

    /// Whether the derived status is one of the failure results
    pub fn is_failure_status(&self) -> bool {
        FAILURE_RESULTS.contains(&self.result_status.as_str())
    }
}

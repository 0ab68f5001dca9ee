//! Core domain types for pushjobs

mod group;
mod job;
mod push;
mod task_run;

pub use group::{Group, Platform, group_map_key, ordered_platforms, option_rank};
pub use job::{
    BtnClass, FAILURE_RESULTS, Job, JobId, JobResult, JobState, get_btn_class, is_classified,
    is_perf_test, is_reftest, is_unclassified_failure, result_status,
};
pub use push::{JobDataError, PushData};
pub use task_run::{TaskRun, get_task_run, task_run_str};

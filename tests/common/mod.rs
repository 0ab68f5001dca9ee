//! Shared test utilities for push fixtures

#![allow(dead_code)]

use std::path::PathBuf;
use tempfile::TempDir;

use pushjobs::{Job, JobResult, PushData};

pub const TASK_A: &str = "A1B2C3D4Q5C1234567890A";
pub const TASK_B: &str = "B1B2C3D4Q5C1234567890A";
pub const TASK_C: &str = "C1B2C3D4Q5C1234567890A";

/// A completed job in group `M` on linux64/opt
pub fn job(id: u64, name: &str, result: JobResult) -> Job {
    let mut job = Job::new(id, name, name.to_lowercase(), "linux64")
        .with_group("Mochitest", "M")
        .with_option("opt")
        .with_task_run(format!("task-{id}.0"))
        .completed(result);
    job.push_id = 1;
    job.add_aggregate_fields();
    job
}

/// Push JSON with a failing and passing mochitest, a confirm rerun, a
/// build and a runnable job
pub const PUSH_JSON: &str = r#"{
  "push_id": 7,
  "revision": "f00dfeed",
  "jobs": [
    {
      "id": 1, "job_type_name": "mochitest-1", "job_type_symbol": "1",
      "job_group_name": "Mochitest", "job_group_symbol": "M",
      "platform": "windows11-64", "platform_option": "debug", "tier": 1,
      "state": "completed", "result": "testfailed",
      "task_id": "A1B2C3D4Q5C1234567890A", "retry_id": 0,
      "start_timestamp": 1000, "end_timestamp": 1600
    },
    {
      "id": 2, "job_type_name": "mochitest-1", "job_type_symbol": "1",
      "job_group_name": "Mochitest", "job_group_symbol": "M",
      "platform": "windows11-64", "platform_option": "debug", "tier": 1,
      "state": "completed", "result": "success",
      "task_id": "A1B2C3D4Q5C1234567890A", "retry_id": 1,
      "start_timestamp": 2000, "end_timestamp": 2060
    },
    {
      "id": 3, "job_type_name": "mochitest-1-cf", "job_type_symbol": "1",
      "job_group_name": "Mochitest", "job_group_symbol": "M-cf",
      "platform": "windows11-64", "platform_option": "debug", "tier": 3,
      "state": "completed", "result": "success",
      "task_run": "C1B2C3D4Q5C1234567890A.0"
    },
    {
      "id": 4, "job_type_name": "build", "job_type_symbol": "B",
      "platform": "linux64", "platform_option": "opt", "tier": 1,
      "state": "completed", "result": "success",
      "task_run": "B1B2C3D4Q5C1234567890A.0"
    },
    {
      "id": 5, "job_type_name": "lint", "job_type_symbol": "L",
      "platform": "linux64", "platform_option": "opt",
      "state": "runnable"
    }
  ]
}"#;

/// Write `PUSH_JSON` to a temp file
pub fn push_file() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("push.json");
    std::fs::write(&path, PUSH_JSON).expect("Failed to write push file");
    (dir, path)
}

pub fn push_data() -> PushData {
    PushData::from_json(PUSH_JSON).expect("fixture is valid")
}

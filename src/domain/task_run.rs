//! Task-run identifiers (`"<taskId>.<runId>"`)

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A 22-character taskcluster slug followed by an optional run id. The
/// legacy `-` separator is accepted alongside `.`.
static TASK_RUN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([A-Za-z0-9_-]{8}[Q-T][A-Za-z0-9_-][CGKOSWaeimquy26-][A-Za-z0-9_-]{10}[AQgw])(?:[.-](\d+))?$",
    )
    .expect("task run pattern is a valid regex")
});

/// A parsed task run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRun {
    pub task_id: Option<String>,
    pub run_id: Option<String>,
}

impl TaskRun {
    /// True when parsing failed
    pub fn is_empty(&self) -> bool {
        self.task_id.is_none()
    }
}

/// Parse a task-run string. Anything malformed yields an empty `TaskRun`.
pub fn get_task_run(task_run: &str) -> TaskRun {
    let Some(caps) = TASK_RUN_PATTERN.captures(task_run) else {
        if !task_run.is_empty() {
            tracing::debug!("Ignoring malformed task run: {:?}", task_run);
        }
        return TaskRun::default();
    };

    TaskRun {
        task_id: caps.get(1).map(|m| m.as_str().to_string()),
        run_id: caps.get(2).map(|m| m.as_str().to_string()),
    }
}

pub fn task_run_str(task_id: &str, retry_id: u32) -> String {
    format!("{}.{}", task_id, retry_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TASK_ID: &str = "A1B2C3D4Q5C1234567890A";

    #[test]
    fn test_parses_task_and_run() {
        let run = get_task_run(&format!("{TASK_ID}.0"));
        assert_eq!(run.task_id.as_deref(), Some(TASK_ID));
        assert_eq!(run.run_id.as_deref(), Some("0"));

        let run = get_task_run(&format!("{TASK_ID}.12"));
        assert_eq!(run.run_id.as_deref(), Some("12"));
    }

    #[test]
    fn test_accepts_legacy_dash_separator() {
        let run = get_task_run(&format!("{TASK_ID}-1"));
        assert_eq!(run.task_id.as_deref(), Some(TASK_ID));
        assert_eq!(run.run_id.as_deref(), Some("1"));
    }

    #[test]
    fn test_bare_task_id_has_no_run() {
        let run = get_task_run(TASK_ID);
        assert_eq!(run.task_id.as_deref(), Some(TASK_ID));
        assert!(run.run_id.is_none());
    }

    #[test]
    fn test_malformed_yields_empty() {
        assert!(get_task_run("too-short").is_empty());
        assert!(get_task_run("invalid").is_empty());
        assert!(get_task_run("").is_empty());
        // Position 8 must be one of Q-T
        assert!(get_task_run("A1B2C3D4A5C1234567890A.0").is_empty());
        assert_eq!(get_task_run("too-short"), TaskRun::default());
    }

    #[test]
    fn test_task_run_str() {
        assert_eq!(task_run_str("ABC123", 0), "ABC123.0");
        assert_eq!(task_run_str("XYZ", 5), "XYZ.5");
    }
}

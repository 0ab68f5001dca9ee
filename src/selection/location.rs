//! URL query parameters that carry selection state
//!
//! Updates replace the current history entry; nothing navigates.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Numeric id of the selected job (legacy)
pub const SELECTED_JOB: &str = "selectedJob";
/// `"<taskId>.<runId>"` of the selected job
pub const SELECTED_TASK_RUN: &str = "selectedTaskRun";
/// `expanded` or `collapsed`
pub const GROUP_STATE: &str = "group_state";
pub const REVISION: &str = "revision";

/// Shared view of the page's query parameters
#[derive(Debug, Clone, Default)]
pub struct Location {
    params: Arc<Mutex<BTreeMap<String, String>>>,
}

impl Location {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string (`a=1&b=2`, leading `?` optional)
    pub fn from_query(query: &str) -> Self {
        let params = query
            .trim_start_matches('?')
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((key, value)) => (key.to_string(), value.to_string()),
                None => (pair.to_string(), String::new()),
            })
            .collect();

        Self {
            params: Arc::new(Mutex::new(params)),
        }
    }

    pub fn get_url_param(&self, key: &str) -> Option<String> {
        let guard = self.params.lock().unwrap_or_else(|e| e.into_inner());
        guard.get(key).filter(|v| !v.is_empty()).cloned()
    }

    /// Set or, with `None`, remove a parameter
    pub fn set_url_param(&self, key: &str, value: Option<&str>) {
        let mut guard = self.params.lock().unwrap_or_else(|e| e.into_inner());
        match value {
            Some(value) => {
                guard.insert(key.to_string(), value.to_string());
            }
            None => {
                guard.remove(key);
            }
        }
    }

    /// Apply several updates under one lock
    pub fn set_url_params(&self, updates: &[(&str, Option<&str>)]) {
        let mut guard = self.params.lock().unwrap_or_else(|e| e.into_inner());
        for (key, value) in updates {
            match value {
                Some(value) => {
                    guard.insert(key.to_string(), value.to_string());
                }
                None => {
                    guard.remove(*key);
                }
            }
        }
    }

    pub fn to_query(&self) -> String {
        let guard = self.params.lock().unwrap_or_else(|e| e.into_inner());
        guard
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn selected_task_run(&self) -> Option<String> {
        self.get_url_param(SELECTED_TASK_RUN)
    }

    /// Whether `group_state=expanded`
    pub fn groups_expanded(&self) -> bool {
        self.get_url_param(GROUP_STATE).as_deref() == Some("expanded")
    }
}

use chrono::Utc;

use super::{Job, result_status};
use crate::domain::task_run_str;

/// Suffix the backfill tooling appends to job symbols
const BACKFILL_SUFFIX: &str = "-bk";

impl Job {
    /// Derive `result_status`, `duration`, `search_str` and `hover_text`.
    ///
    /// Runs once per job when data arrives. A duration that is already set
    /// is kept; a job that has not ended is measured up to now.
    pub fn add_aggregate_fields(&mut self) -> &mut Self {
        self.result_status = result_status(self).to_string();

        if self.task_run.is_empty() {
            if let Some(task_id) = &self.task_id {
                self.task_run = task_run_str(task_id, self.retry_id.unwrap_or(0));
            }
        }

        if self.duration.is_none() {
            let end = if self.end_timestamp > 0 {
                self.end_timestamp
            } else {
                Utc::now().timestamp()
            };
            let minutes = ((end - self.start_timestamp) as f64 / 60.0).round() as i64;
            self.duration = Some(minutes.max(1));
        }

        self.search_str = self.build_search_str();
        self.hover_text = self.build_hover_text();
        self
    }

    fn build_search_str(&self) -> String {
        let type_symbol = self
            .job_type_symbol
            .strip_suffix(BACKFILL_SUFFIX)
            .unwrap_or(&self.job_type_symbol);
        let group_symbol = if self.job_group_symbol == "?" {
            ""
        } else {
            self.job_group_symbol.as_str()
        };

        let mut parts: Vec<String> = Vec::with_capacity(4);
        if !self.platform_option.is_empty() {
            parts.push(self.platform_option.clone());
        }
        if !self.job_group_name.is_empty() && self.job_group_name != "unknown" {
            parts.push(self.job_group_name.clone());
        }
        parts.push(self.job_type_name.clone());
        parts.push(format!("{}({})", group_symbol, type_symbol));

        parts.join(" ").to_lowercase()
    }

    fn build_hover_text(&self) -> String {
        let duration = self.duration.unwrap_or(1);
        let unit = if duration == 1 { "min" } else { "mins" };
        format!(
            "{} - {} - ({} {})",
            self.job_type_name, self.result_status, duration, unit
        )
    }
}

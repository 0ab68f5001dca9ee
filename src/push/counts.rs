//! Splitting a group's jobs into individual buttons and per-status counts

use std::collections::HashMap;

use crate::domain::{Group, Job};

/// Jobs of one result status folded into a single count badge
#[derive(Debug, Clone, PartialEq)]
pub struct JobCount<'a> {
    pub status: String,
    pub count_text: String,
    pub count: usize,
    /// Last job folded into this bucket
    pub last_job: &'a Job,
    /// Some folded job is the selected task run
    pub selected: bool,
}

impl JobCount<'_> {
    /// Tooltip for the badge
    pub fn title(&self) -> String {
        format!("{} {} jobs in group", self.count, self.count_text)
    }
}

/// Partition of a group's visible jobs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ButtonsAndCounts<'a> {
    pub buttons: Vec<&'a Job>,
    pub counts: Vec<JobCount<'a>>,
}

impl ButtonsAndCounts<'_> {
    /// Number of jobs represented, buttons and badges together
    pub fn total(&self) -> usize {
        self.buttons.len() + self.counts.iter().map(|c| c.count).sum::<usize>()
    }
}

/// Decides which jobs of a group render on their own
#[derive(Debug, Clone, Copy, Default)]
pub struct CountAggregator {
    /// Group expanded by the user, or all group counts expanded
    pub expanded: bool,
    /// Show every job whose symbol appears more than once
    pub duplicate_jobs_visible: bool,
}

impl CountAggregator {
    pub fn new(expanded: bool, duplicate_jobs_visible: bool) -> Self {
        Self {
            expanded,
            duplicate_jobs_visible,
        }
    }

    pub fn group_buttons_and_counts<'a>(
        &self,
        jobs: &'a [Job],
        selected_task_run: Option<&str>,
    ) -> ButtonsAndCounts<'a> {
        if self.expanded {
            return ButtonsAndCounts {
                buttons: jobs.iter().filter(|j| j.visible).collect(),
                counts: Vec::new(),
            };
        }

        let mut type_symbol_counts: HashMap<&str, usize> = HashMap::new();
        for job in jobs {
            *type_symbol_counts.entry(job.job_type_symbol.as_str()).or_default() += 1;
        }

        let mut buttons: Vec<&Job> = Vec::new();
        // Buckets in first-seen order
        let mut buckets: Vec<JobCount<'a>> = Vec::new();

        for job in jobs.iter().filter(|j| j.visible) {
            let duplicated = type_symbol_counts
                .get(job.job_type_symbol.as_str())
                .is_some_and(|&n| n > 1);

            if job.is_failure_status() || (duplicated && self.duplicate_jobs_visible) {
                buttons.push(job);
                continue;
            }

            let is_selected = selected_task_run
                .is_some_and(|tr| !tr.is_empty() && job.task_run == tr);

            match buckets.iter_mut().find(|b| b.status == job.result_status) {
                Some(bucket) => {
                    bucket.count += 1;
                    bucket.last_job = job;
                    bucket.selected |= is_selected;
                }
                None => buckets.push(JobCount {
                    status: job.result_status.clone(),
                    count_text: job.result_status.clone(),
                    count: 1,
                    last_job: job,
                    selected: is_selected,
                }),
            }
        }

        let mut counts = Vec::new();
        for bucket in buckets {
            if bucket.count == 1 {
                buttons.push(bucket.last_job);
            } else {
                counts.push(bucket);
            }
        }

        ButtonsAndCounts { buttons, counts }
    }

    /// Partition a group's jobs. Loose tier-1 jobs without a group symbol
    /// always render as buttons.
    pub fn for_group<'a>(&self, group: &'a Group, selected_task_run: Option<&str>) -> ButtonsAndCounts<'a> {
        let aggregator = if group.is_ungrouped() {
            CountAggregator { expanded: true, ..*self }
        } else {
            *self
        };
        aggregator.group_buttons_and_counts(&group.jobs, selected_task_run)
    }
}

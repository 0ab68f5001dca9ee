//! The selected job of a push view
//!
//! Selection is applied to the registry immediately so the highlighted
//! button follows the keyboard, while committing it (store state and URL)
//! can be debounced. A newer selection aborts a pending commit.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::location::{Location, REVISION, SELECTED_JOB, SELECTED_TASK_RUN};
use super::registry::{JobKey, SharedRegistry};
use crate::domain::{Job, JobId, get_task_run, is_unclassified_failure};

/// Navigation direction for [`SelectedJobStore::change_job`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

impl Direction {
    fn step(self, current: Option<usize>, len: usize) -> usize {
        match (self, current) {
            (Direction::Next, Some(idx)) if idx + 1 < len => idx + 1,
            (Direction::Next, _) => 0,
            (Direction::Previous, Some(idx)) if idx > 0 => idx - 1,
            (Direction::Previous, _) => len - 1,
        }
    }
}

/// Result of resolving the selection from URL parameters
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    Selected(Job),
    Cleared,
    /// The URL names a task that is not part of the loaded jobs
    NotLoaded(String),
}

/// Result of keyboard navigation
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeJob {
    Selected(Job),
    NoneAvailable(&'static str),
}

/// Selected job plus the pending debounced commit
pub struct SelectedJobStore {
    registry: SharedRegistry,
    location: Location,
    selected: Arc<Mutex<Option<Job>>>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

fn commit_selection(selected: &Mutex<Option<Job>>, location: &Location, job: &Job) {
    let id = job.id.to_string();
    let task_run = (!job.task_run.is_empty()).then_some(job.task_run.as_str());
    location.set_url_params(&[(SELECTED_JOB, Some(id.as_str())), (SELECTED_TASK_RUN, task_run)]);

    *selected.lock().unwrap_or_else(|e| e.into_inner()) = Some(job.clone());
    tracing::debug!("Committed selection of job {}", job.id);
}

impl SelectedJobStore {
    pub fn new(registry: SharedRegistry, location: Location) -> Self {
        Self {
            registry,
            location,
            selected: Arc::new(Mutex::new(None)),
            pending: Mutex::new(None),
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn selected_job(&self) -> Option<Job> {
        self.selected.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Whether a debounced commit is still waiting to fire
    pub fn has_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    fn cancel_pending(&self) {
        if let Some(task) = self.pending.lock().unwrap_or_else(|e| e.into_inner()).take() {
            if !task.is_finished() {
                tracing::debug!("Cancelled pending selection commit");
            }
            task.abort();
        }
    }

    /// Move the registry's selection pointer to `job`. A job without a
    /// mounted control still becomes the selection, only nothing is
    /// highlighted.
    fn select_instance(&self, job: &Job) {
        if let Some(previous) = self.registry.currently_selected_instance() {
            previous.set_selected(false);
        }

        match self.registry.set_currently_selected(job.id) {
            Some(handle) => handle.set_selected(true),
            None => tracing::debug!("Job {} has no mounted control", job.id),
        }
    }

    fn deselect(&self) {
        if let Some(previous) = self.registry.currently_selected_instance() {
            previous.set_selected(false);
        }
        self.registry.clear_currently_selected();
        *self.selected.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Select `job` and commit it after `timeout`. A zero timeout, or no
    /// running tokio runtime, commits synchronously.
    pub fn set_selected_job(&self, job: &Job, timeout: Duration) {
        self.cancel_pending();
        self.select_instance(job);

        let runtime = if timeout.is_zero() {
            None
        } else {
            Handle::try_current().ok()
        };

        match runtime {
            Some(runtime) => {
                let selected = Arc::clone(&self.selected);
                let location = self.location.clone();
                let job = job.clone();
                let task = runtime.spawn(async move {
                    tokio::time::sleep(timeout).await;
                    commit_selection(&selected, &location, &job);
                });
                *self.pending.lock().unwrap_or_else(|e| e.into_inner()) = Some(task);
            }
            None => commit_selection(&self.selected, &self.location, job),
        }
    }

    /// Drop the selection unless jobs are pinned. The URL parameters are
    /// removed either way.
    pub fn clear_selected_job(&self, count_pinned_jobs: usize) {
        self.cancel_pending();
        if count_pinned_jobs == 0 {
            self.deselect();
        }
        self.location
            .set_url_params(&[(SELECTED_TASK_RUN, None), (SELECTED_JOB, None)]);
    }

    /// Apply `job` as the selection and normalise the URL to
    /// `selectedTaskRun`
    fn select_from_url(&self, job: &Job) -> SyncOutcome {
        self.cancel_pending();
        self.location
            .set_url_params(&[(SELECTED_JOB, None), (SELECTED_TASK_RUN, Some(job.task_run.as_str()))]);
        self.select_instance(job);
        *self.selected.lock().unwrap_or_else(|e| e.into_inner()) = Some(job.clone());
        SyncOutcome::Selected(job.clone())
    }

    /// The task is not among the loaded jobs. A page opened on a specific
    /// revision simply drops the selection.
    fn not_loaded(&self, message: String) -> SyncOutcome {
        self.deselect();
        if self.location.get_url_param(REVISION).is_some() {
            return SyncOutcome::Cleared;
        }

        self.location
            .set_url_params(&[(SELECTED_JOB, None), (SELECTED_TASK_RUN, None)]);
        tracing::info!("{}", message);
        SyncOutcome::NotLoaded(message)
    }

    /// Resolve the selection from `selectedTaskRun`, falling back to the
    /// legacy `selectedJob` id
    pub fn sync_from_url(&self, job_map: &HashMap<JobId, Job>) -> SyncOutcome {
        if let Some(selected_task_run) = self.location.selected_task_run() {
            let parsed = get_task_run(&selected_task_run);
            let Some(task_id) = parsed.task_id else {
                self.location
                    .set_url_params(&[(SELECTED_JOB, None), (SELECTED_TASK_RUN, None)]);
                self.deselect();
                return SyncOutcome::Cleared;
            };

            let mut runs: Vec<(Option<u32>, &Job)> = job_map
                .values()
                .filter_map(|job| {
                    let run = get_task_run(&job.task_run);
                    (run.task_id.as_deref() == Some(task_id.as_str()))
                        .then(|| (run.run_id.and_then(|r| r.parse().ok()), job))
                })
                .collect();
            runs.sort_by_key(|(retry_id, job)| (*retry_id, job.id));

            let wanted: Option<u32> = parsed.run_id.as_deref().and_then(|r| r.parse().ok());
            let task = match parsed.run_id {
                Some(_) => runs.iter().find(|(retry_id, _)| *retry_id == wanted),
                None => runs.last(),
            };

            return match task {
                Some((_, job)) => self.select_from_url(job),
                None => {
                    let message = match &parsed.run_id {
                        Some(run_id) => format!("Task not loaded: {}, run {}", task_id, run_id),
                        None => format!("Task not loaded: {}", task_id),
                    };
                    self.not_loaded(message)
                }
            };
        }

        if let Some(selected_job) = self.location.get_url_param(SELECTED_JOB) {
            let Ok(job_id) = selected_job.trim().parse::<JobId>() else {
                self.deselect();
                return SyncOutcome::Cleared;
            };

            return match job_map.get(&job_id) {
                Some(job) => self.select_from_url(job),
                None => self.not_loaded(format!("Job ID not loaded: {}", job_id)),
            };
        }

        self.deselect();
        SyncOutcome::Cleared
    }

    /// Select the next or previous job, wrapping end to end.
    ///
    /// `jobs` is every job of the view in display order. Visible jobs are
    /// navigable, and so is the current selection even after filtering hid
    /// it, since it is the anchor navigation starts from. When nothing is
    /// selectable the selection is cleared as by
    /// [`SelectedJobStore::clear_selected_job`].
    pub fn change_job(
        &self,
        direction: Direction,
        unclassified_only: bool,
        count_pinned_jobs: usize,
        jobs: &[&Job],
        timeout: Duration,
    ) -> ChangeJob {
        let current = self
            .registry
            .currently_selected_job_id()
            .or_else(|| self.selected_job().map(|job| JobKey::from(job.id)));
        let is_current = |job: &Job| current.as_ref() == Some(&JobKey::from(job.id));

        let navigable: Vec<&Job> = jobs
            .iter()
            .copied()
            .filter(|job| {
                is_current(*job)
                    || (job.visible && (!unclassified_only || is_unclassified_failure(job)))
            })
            .collect();

        if !navigable.is_empty() {
            let current_idx = navigable.iter().position(|job| is_current(*job));
            let idx = direction.step(current_idx, navigable.len());

            if current_idx != Some(idx) {
                let job = navigable[idx];
                self.set_selected_job(job, timeout);
                return ChangeJob::Selected(job.clone());
            }
        }

        self.clear_selected_job(count_pinned_jobs);
        ChangeJob::NoneAvailable(if unclassified_only {
            "No unclassified failures to select"
        } else {
            "No jobs to select"
        })
    }
}

impl Drop for SelectedJobStore {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

//! Job state of a single push
//!
//! [`PushJobs`] owns the platform rows of one push and wires the pieces
//! together: visibility filtering, confirm-group matching, intermittent
//! classification and button/count aggregation.

mod confirm;
mod counts;
mod intermittent;

pub use confirm::confirm_groups;
pub use counts::{ButtonsAndCounts, CountAggregator, JobCount};
pub use intermittent::{intermittent_job_type_names, is_intermittent};

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use crate::domain::{Group, Job, JobId, Platform, PushData, ordered_platforms};
use crate::filter::{FilterModel, VisibilityFilter};
use crate::selection::PlatformRefilter;

/// Push state shared with rendered controls
pub type SharedPush = Arc<Mutex<PushJobs>>;

/// Platform rows and jobs of one push
#[derive(Debug, Clone)]
pub struct PushJobs {
    pub push_id: u64,
    pub revision: String,
    pub platforms: Vec<Platform>,
}

impl PushJobs {
    /// Build platform rows from loaded push data. Platforms come out in
    /// display order.
    pub fn new(push: PushData) -> Self {
        let platforms = Platform::from_jobs(push.jobs);
        let platforms = ordered_platforms(&platforms).into_iter().cloned().collect();

        Self {
            push_id: push.push_id,
            revision: push.revision,
            platforms,
        }
    }

    pub fn into_shared(self) -> SharedPush {
        Arc::new(Mutex::new(self))
    }

    /// Recompute visibility of one platform row
    pub fn filter_platform(
        &mut self,
        platform_idx: usize,
        filter: &dyn FilterModel,
        runnable_visible: bool,
        selected_task_run: Option<&str>,
    ) -> bool {
        match self.platforms.get_mut(platform_idx) {
            Some(platform) => VisibilityFilter::new(filter, runnable_visible)
                .filter_platform(platform, selected_task_run),
            None => false,
        }
    }

    /// Recompute visibility of every platform row
    pub fn filter_all(
        &mut self,
        filter: &dyn FilterModel,
        runnable_visible: bool,
        selected_task_run: Option<&str>,
    ) {
        VisibilityFilter::new(filter, runnable_visible)
            .filter_platforms(&mut self.platforms, selected_task_run);
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.platforms.iter().flat_map(|p| p.groups.iter())
    }

    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.groups().flat_map(|g| g.jobs.iter())
    }

    pub fn find_job(&self, id: JobId) -> Option<&Job> {
        self.jobs().find(|j| j.id == id)
    }

    pub fn job_map(&self) -> HashMap<JobId, Job> {
        self.jobs().map(|j| (j.id, j.clone())).collect()
    }

    /// Parent group map key to its confirm-failure group
    pub fn confirm_groups(&self) -> HashMap<String, &Group> {
        confirm_groups(self.groups())
    }

    /// Intermittent names of a single group
    pub fn group_intermittents(
        &self,
        group: &Group,
        confirm: &HashMap<String, &Group>,
    ) -> BTreeSet<String> {
        intermittent_job_type_names(&group.jobs, confirm.get(&group.map_key).copied())
    }

    /// Intermittent job-type names across the whole push
    pub fn intermittent_job_type_names(&self) -> BTreeSet<String> {
        let confirm = self.confirm_groups();
        self.groups()
            .flat_map(|g| self.group_intermittents(g, &confirm))
            .collect()
    }

    /// Whether `job` failed intermittently in this push
    pub fn is_intermittent(&self, job: &Job) -> bool {
        is_intermittent(job, &self.intermittent_job_type_names())
    }

    /// Buttons and counts of every visible group, in display order
    pub fn group_buttons_and_counts<'a>(
        &'a self,
        aggregator: CountAggregator,
        selected_task_run: Option<&str>,
    ) -> Vec<(&'a Group, ButtonsAndCounts<'a>)> {
        self.platforms
            .iter()
            .filter(|p| p.visible)
            .flat_map(|p| p.groups.iter().filter(|g| g.visible))
            .map(|g| (g, aggregator.for_group(g, selected_task_run)))
            .collect()
    }

    /// Visible jobs in display order, the order keyboard navigation walks
    pub fn visible_jobs(&self) -> Vec<&Job> {
        self.platforms
            .iter()
            .filter(|p| p.visible)
            .flat_map(|p| p.groups.iter().filter(|g| g.visible))
            .flat_map(|g| g.jobs.iter().filter(|j| j.visible))
            .collect()
    }

    /// Callback a rendered control uses to refilter its platform row.
    ///
    /// The callback locks `shared`: do not select or refilter a control
    /// while holding that lock, or the thread deadlocks.
    pub fn platform_refilter(
        shared: &SharedPush,
        platform_idx: usize,
        filter: Arc<dyn FilterModel>,
        runnable_visible: bool,
    ) -> PlatformRefilter {
        let push = Arc::clone(shared);
        Arc::new(move |selected_task_run: Option<String>| {
            let mut push = push.lock().unwrap_or_else(|e| e.into_inner());
            push.filter_platform(
                platform_idx,
                filter.as_ref(),
                runnable_visible,
                selected_task_run.as_deref(),
            );
        })
    }
}

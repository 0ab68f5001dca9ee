use super::FilterModel;
use crate::domain::{Job, Platform};

/// Computes `visible`/`selected` for every job of a platform row.
///
/// Nothing here tracks dependencies: whenever the filter, the URL's
/// selected task run or the runnable toggle changes, the caller must run
/// [`VisibilityFilter::filter_platform`] again before reading `visible`.
pub struct VisibilityFilter<'a> {
    pub filter: &'a dyn FilterModel,
    pub runnable_visible: bool,
}

impl<'a> VisibilityFilter<'a> {
    pub fn new(filter: &'a dyn FilterModel, runnable_visible: bool) -> Self {
        Self {
            filter,
            runnable_visible,
        }
    }

    /// Visibility of a single job.
    ///
    /// The selected job stays visible even when the filter rejects it, so
    /// next/previous navigation keeps an anchor until the selection moves.
    pub fn job_visible(&self, job: &Job, selected_task_run: Option<&str>) -> bool {
        let candidate = self.filter.show_job(job) || is_selected(job, selected_task_run);
        if job.is_runnable() {
            candidate && self.runnable_visible
        } else {
            candidate
        }
    }

    /// Rewrite job, group and platform flags. Returns the platform's
    /// visibility.
    pub fn filter_platform(&self, platform: &mut Platform, selected_task_run: Option<&str>) -> bool {
        let selected_task_run = selected_task_run.filter(|tr| !tr.is_empty());

        platform.visible = false;
        for group in &mut platform.groups {
            group.visible = false;
            for job in &mut group.jobs {
                job.visible = self.job_visible(job, selected_task_run);
                job.selected = is_selected(job, selected_task_run);
                group.visible |= job.visible;
            }
            platform.visible |= group.visible;
        }

        platform.visible
    }

    pub fn filter_platforms(&self, platforms: &mut [Platform], selected_task_run: Option<&str>) {
        for platform in platforms {
            self.filter_platform(platform, selected_task_run);
        }
    }
}

fn is_selected(job: &Job, selected_task_run: Option<&str>) -> bool {
    selected_task_run.is_some_and(|tr| !tr.is_empty() && job.task_run == tr)
}

//! The live control behind a rendered job button

use std::sync::{Arc, Mutex};

use super::location::Location;
use super::registry::{ControlProps, JobControl, JobKey, SharedRegistry};
use crate::domain::Job;
use crate::filter::{FilterModel, VisibilityFilter};

/// Recompute a platform row's visibility given the selected task run
pub type PlatformRefilter = Arc<dyn Fn(Option<String>) + Send + Sync>;

/// Filter inputs and the platform callback a button is rendered with
#[derive(Clone)]
pub struct ButtonCallbacks {
    pub filter: Arc<dyn FilterModel>,
    pub runnable_visible: bool,
    pub filter_platform: PlatformRefilter,
}

impl ButtonCallbacks {
    pub fn new(filter: Arc<dyn FilterModel>, runnable_visible: bool, filter_platform: PlatformRefilter) -> Self {
        Self {
            filter,
            runnable_visible,
            filter_platform,
        }
    }

    fn job_visible(&self, job: &Job, selected_task_run: Option<&str>) -> bool {
        VisibilityFilter::new(self.filter.as_ref(), self.runnable_visible).job_visible(job, selected_task_run)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct ButtonState {
    selected: bool,
    runnable_selected: bool,
    visible: bool,
}

/// A mounted job button.
///
/// Registers itself on [`JobButton::mount`], re-registers on
/// [`JobButton::update`] and leaves the registry on
/// [`JobButton::unmount`].
pub struct JobButton {
    job: Mutex<Job>,
    callbacks: Mutex<ButtonCallbacks>,
    state: Mutex<ButtonState>,
    location: Location,
    registry: SharedRegistry,
}

impl JobButton {
    /// Create the control and register it under the job's id
    pub fn mount(
        job: Job,
        callbacks: ButtonCallbacks,
        location: Location,
        registry: SharedRegistry,
    ) -> Arc<JobButton> {
        let selected = location
            .selected_task_run()
            .is_some_and(|tr| tr == job.task_run);
        let visible = job.visible;
        let id = job.id;

        let button = Arc::new(JobButton {
            job: Mutex::new(job),
            callbacks: Mutex::new(callbacks),
            state: Mutex::new(ButtonState {
                selected,
                runnable_selected: false,
                visible,
            }),
            location,
            registry,
        });

        button.registry.register(id, button.clone());
        button
    }

    /// Swap in a new job and callbacks, then overwrite the registry entry
    /// so lookups and selection never reach the stale ones
    pub fn update(self: &Arc<Self>, job: Job, callbacks: ButtonCallbacks) {
        let old_id = {
            let mut current = self.job.lock().unwrap_or_else(|e| e.into_inner());
            let old_id = current.id;
            *current = job;
            old_id
        };
        *self.callbacks.lock().unwrap_or_else(|e| e.into_inner()) = callbacks;
        let new_id = self.job_id();

        if old_id != new_id {
            self.registry.unregister(old_id);
        }
        self.registry.register(new_id, self.clone());
    }

    pub fn unmount(&self) {
        self.registry.unregister(self.job_id());
    }

    pub fn job_id(&self) -> u64 {
        self.job.lock().unwrap_or_else(|e| e.into_inner()).id
    }

    pub fn key(&self) -> JobKey {
        JobKey::from(self.job_id())
    }

    pub fn is_selected(&self) -> bool {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).selected
    }

    pub fn is_runnable_selected(&self) -> bool {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).runnable_selected
    }

    fn job(&self) -> Job {
        self.job.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn callbacks(&self) -> ButtonCallbacks {
        self.callbacks.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Store the new visibility, then refilter the platform row with no
    /// lock of this button held
    fn apply(&self, selected: Option<bool>, selected_task_run: Option<String>) {
        let job = self.job();
        let callbacks = self.callbacks();
        let visible = callbacks.job_visible(&job, selected_task_run.as_deref());
        {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(selected) = selected {
                state.selected = selected;
            }
            state.visible = visible;
        }

        (callbacks.filter_platform)(selected_task_run);
    }
}

impl JobControl for JobButton {
    fn props(&self) -> ControlProps {
        let visible = self.state.lock().unwrap_or_else(|e| e.into_inner()).visible;
        ControlProps {
            job: self.job(),
            visible,
        }
    }

    fn set_selected(&self, selected: bool) {
        let task_run = selected.then(|| self.job().task_run);
        self.apply(Some(selected), task_run);
    }

    fn toggle_runnable_selected(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.runnable_selected = !state.runnable_selected;
    }

    fn refilter(&self) {
        self.apply(None, self.location.selected_task_run());
    }
}

//! Job selection
//!
//! Rendered job controls register in a [`SharedRegistry`] keyed by job id,
//! so hotkeys and URL sync can reach a specific control without walking
//! push, platform and group rows. [`SelectedJobStore`] owns the selected
//! job and keeps the URL parameters in [`Location`] in step with it.

mod button;
mod location;
mod registry;
mod store;

pub use button::{ButtonCallbacks, JobButton, PlatformRefilter};
pub use location::{GROUP_STATE, Location, REVISION, SELECTED_JOB, SELECTED_TASK_RUN};
pub use registry::{
    ControlProps, JobButtonRegistry, JobControl, JobHandle, JobKey, SharedRegistry,
    get_job_button_instance, init, register_job_button, unregister_job_button,
};
pub use store::{ChangeJob, Direction, SelectedJobStore, SyncOutcome};

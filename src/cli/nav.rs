//! Next/previous job command implementation

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

use pushjobs::config::Config;
use pushjobs::filter::{FilterModel, JobFilter};
use pushjobs::push::PushJobs;
use pushjobs::selection::{
    self, ButtonCallbacks, ChangeJob, Direction, JobButton, Location, SELECTED_TASK_RUN, SelectedJobStore,
    SharedRegistry, SyncOutcome,
};
use pushjobs::Job;

/// Mount a control per job, restore the selection from `from` and move it
/// one job in `direction`
pub async fn nav_command(
    push_path: &Path,
    config: &Config,
    direction: Direction,
    from: Option<String>,
    unclassified: bool,
) -> Result<()> {
    let data = super::load_push(push_path)?;
    let filter: Arc<dyn FilterModel> = Arc::new(if unclassified {
        JobFilter::unclassified_failures()
    } else {
        config.filter.clone()
    });
    let runnable_visible = config.display.runnable_visible;

    let location = Location::new();
    location.set_url_param(SELECTED_TASK_RUN, from.as_deref());

    selection::init();
    let registry = SharedRegistry::global();
    let shared = PushJobs::new(data).into_shared();

    let jobs: Vec<(usize, Job)> = {
        let mut push = shared.lock().unwrap_or_else(|e| e.into_inner());
        push.filter_all(filter.as_ref(), runnable_visible, location.selected_task_run().as_deref());
        push.platforms
            .iter()
            .enumerate()
            .flat_map(|(idx, p)| p.jobs().map(move |job| (idx, job.clone())))
            .collect()
    };

    let buttons: Vec<Arc<JobButton>> = jobs
        .into_iter()
        .map(|(idx, job)| {
            let refilter = PushJobs::platform_refilter(&shared, idx, filter.clone(), runnable_visible);
            let callbacks = ButtonCallbacks::new(filter.clone(), runnable_visible, refilter);
            JobButton::mount(job, callbacks, location.clone(), registry.clone())
        })
        .collect();

    let store = SelectedJobStore::new(registry.clone(), location.clone());
    let job_map = shared.lock().unwrap_or_else(|e| e.into_inner()).job_map();
    if let SyncOutcome::NotLoaded(message) = store.sync_from_url(&job_map) {
        warn!("{}", message);
    }

    // Selection may have refiltered a platform row, so snapshot afterwards
    let snapshot: Vec<Job> = shared
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .jobs()
        .cloned()
        .collect();
    let ordered: Vec<&Job> = snapshot.iter().collect();

    let debounce = config.selection_debounce();
    match store.change_job(direction, unclassified, 0, &ordered, debounce) {
        ChangeJob::Selected(job) => {
            tokio::time::sleep(debounce).await;
            while store.has_pending() {
                tokio::task::yield_now().await;
            }

            println!("{} {} ({})", job.task_run, job.job_type_name, job.result_status);
            println!("{}", store.location().to_query());
        }
        ChangeJob::NoneAvailable(notice) => println!("{}", notice),
    }

    for button in buttons {
        button.unmount();
    }
    Ok(())
}

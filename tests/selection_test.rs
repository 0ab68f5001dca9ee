//! Integration tests for the job control registry and the selected-job store

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{TASK_A, TASK_B, TASK_C};
use pushjobs::filter::{FilterModel, JobFilter};
use pushjobs::push::PushJobs;
use pushjobs::selection::{
    self, ButtonCallbacks, ChangeJob, ControlProps, Direction, JobButton, JobControl, JobHandle, Location,
    SELECTED_JOB, SELECTED_TASK_RUN, SelectedJobStore, SharedRegistry, SyncOutcome,
};
use pushjobs::{Job, JobResult};

struct StubControl(Job);

impl JobControl for StubControl {
    fn props(&self) -> ControlProps {
        ControlProps {
            job: self.0.clone(),
            visible: true,
        }
    }
    fn set_selected(&self, _selected: bool) {}
    fn toggle_runnable_selected(&self) {}
    fn refilter(&self) {}
}

fn stub(id: u64) -> JobHandle {
    Arc::new(StubControl(Job::new(id, "stub", "S", "linux64")))
}

#[test]
fn test_global_registry_normalises_ids() {
    selection::init();
    let handle = stub(42);

    selection::register_job_button(42u64, handle.clone());
    let by_str = selection::get_job_button_instance("42").unwrap();
    let by_num = selection::get_job_button_instance(42u64).unwrap();
    assert!(Arc::ptr_eq(&by_str, &handle));
    assert!(Arc::ptr_eq(&by_num, &handle));

    selection::unregister_job_button(42u64);
    assert!(selection::get_job_button_instance(42u64).is_none());
}

#[test]
fn test_register_get_unregister_round_trip() {
    let registry = SharedRegistry::new();
    for id in [1u64, 17, 300, 9_000_000] {
        let handle = stub(id);
        registry.register(id, handle.clone());
        assert!(Arc::ptr_eq(&registry.get(id).unwrap(), &handle));
        registry.unregister(id);
        assert!(registry.get(id).is_none());
    }
    assert!(registry.is_empty());
}

#[test]
fn test_unregister_clears_selection_pointer() {
    let registry = SharedRegistry::new();
    registry.register(5u64, stub(5));
    registry.set_currently_selected(5u64);
    assert_eq!(registry.currently_selected_job_id().map(|k| k.to_string()), Some("5".to_string()));

    registry.unregister(5u64);
    assert!(registry.currently_selected_job_id().is_none());
    assert!(registry.currently_selected_instance().is_none());
}

/// A push with every job mounted as a control, as a rendered view would
struct View {
    push: pushjobs::push::SharedPush,
    buttons: Vec<Arc<JobButton>>,
    store: SelectedJobStore,
    location: Location,
}

fn mount_view(filter: JobFilter, query: &str) -> View {
    let registry = SharedRegistry::new();
    let location = Location::from_query(query);
    let filter: Arc<dyn FilterModel> = Arc::new(filter);
    let push = PushJobs::new(common::push_data()).into_shared();

    let jobs: Vec<(usize, Job)> = {
        let mut guard = push.lock().unwrap();
        guard.filter_all(filter.as_ref(), false, location.selected_task_run().as_deref());
        guard
            .platforms
            .iter()
            .enumerate()
            .flat_map(|(idx, p)| p.jobs().map(move |j| (idx, j.clone())))
            .collect()
    };

    let buttons = jobs
        .into_iter()
        .map(|(idx, job)| {
            let refilter = PushJobs::platform_refilter(&push, idx, filter.clone(), false);
            let callbacks = ButtonCallbacks::new(filter.clone(), false, refilter);
            JobButton::mount(job, callbacks, location.clone(), registry.clone())
        })
        .collect();

    View {
        store: SelectedJobStore::new(registry, location.clone()),
        push,
        buttons,
        location,
    }
}

impl View {
    fn button(&self, id: u64) -> &Arc<JobButton> {
        self.buttons.iter().find(|b| b.job_id() == id).unwrap()
    }

    fn job_map(&self) -> std::collections::HashMap<u64, Job> {
        self.push.lock().unwrap().job_map()
    }

    fn jobs(&self) -> Vec<Job> {
        self.push.lock().unwrap().jobs().cloned().collect()
    }
}

#[test]
fn test_url_selection_selects_mounted_control() {
    let view = mount_view(JobFilter::default(), &format!("selectedTaskRun={TASK_A}.1"));

    // Mounting already reflects the URL
    assert!(view.button(2).is_selected());

    let outcome = view.store.sync_from_url(&view.job_map());
    assert!(matches!(outcome, SyncOutcome::Selected(ref job) if job.id == 2));
    assert!(view.button(2).is_selected());
    assert!(!view.button(1).is_selected());
}

#[test]
fn test_selection_keeps_filtered_job_visible() {
    let view = mount_view(JobFilter::unclassified_failures(), "");
    let build = view.push.lock().unwrap().find_job(4).cloned().unwrap();
    assert!(!build.visible);

    view.store.set_selected_job(&build, Duration::ZERO);
    assert!(view.button(4).is_selected());
    {
        let push = view.push.lock().unwrap();
        assert!(push.find_job(4).unwrap().visible);
        assert!(push.platforms[0].visible);
    }

    view.store.clear_selected_job(0);
    assert!(!view.button(4).is_selected());
    assert!(!view.push.lock().unwrap().platforms[0].visible);
    assert_eq!(view.location.get_url_param(SELECTED_JOB), None);
}

#[test]
fn test_button_visibility_matches_push() {
    let view = mount_view(JobFilter::default(), "");
    let runnable = view.button(5);

    for selected in [true, false] {
        runnable.set_selected(selected);
        let in_push = view.push.lock().unwrap().find_job(5).unwrap().visible;
        assert!(!in_push);
        assert_eq!(runnable.props().visible, in_push);
    }
}

#[test]
fn test_keyboard_navigation_over_push() {
    let view = mount_view(JobFilter::default(), "");
    let jobs = view.jobs();
    let ordered: Vec<&Job> = jobs.iter().collect();

    let mut seen = Vec::new();
    for _ in 0..5 {
        match view.store.change_job(Direction::Next, false, 0, &ordered, Duration::ZERO) {
            ChangeJob::Selected(job) => seen.push(job.id),
            ChangeJob::NoneAvailable(notice) => panic!("{}", notice),
        }
    }
    // linux64 build first, then the windows mochitests; the runnable job is
    // hidden and the walk wraps back to the start
    assert_eq!(seen, [4, 1, 2, 3, 4]);
    assert!(view.button(4).is_selected());
    assert_eq!(view.location.selected_task_run(), Some(format!("{TASK_B}.0")));
}

#[test]
fn test_unclassified_navigation_reports_when_empty() {
    let view = mount_view(JobFilter::default(), &format!("selectedTaskRun={TASK_C}.0"));
    view.store.sync_from_url(&view.job_map());

    let jobs = view.jobs();
    let ordered: Vec<&Job> = jobs.iter().collect();
    let first = view.store.change_job(Direction::Next, true, 0, &ordered, Duration::ZERO);
    assert!(matches!(first, ChangeJob::Selected(ref job) if job.id == 1));

    let mut passing = view.jobs();
    for job in &mut passing {
        job.result = JobResult::Success;
        job.result_status = "success".to_string();
        job.visible = true;
    }
    let ordered: Vec<&Job> = passing.iter().collect();
    view.store.clear_selected_job(0);
    assert_eq!(
        view.store.change_job(Direction::Previous, true, 0, &ordered, Duration::ZERO),
        ChangeJob::NoneAvailable("No unclassified failures to select")
    );
}

#[tokio::test(start_paused = true)]
async fn test_rapid_navigation_commits_last_job() {
    let view = mount_view(JobFilter::default(), "");
    let jobs = view.jobs();
    let ordered: Vec<&Job> = jobs.iter().collect();
    let debounce = Duration::from_millis(200);

    for _ in 0..3 {
        view.store.change_job(Direction::Next, false, 0, &ordered, debounce);
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(view.store.has_pending());
    assert!(view.store.selected_job().is_none());
    assert!(view.button(2).is_selected());

    tokio::time::sleep(debounce).await;
    assert_eq!(view.store.selected_job().map(|j| j.id), Some(2));
    assert_eq!(view.location.get_url_param(SELECTED_JOB).as_deref(), Some("2"));
    assert_eq!(view.location.get_url_param(SELECTED_TASK_RUN), Some(format!("{TASK_A}.1")));
}

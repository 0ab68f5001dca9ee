//! Show command implementation

use anyhow::Result;
use std::collections::BTreeSet;
use std::path::Path;

use pushjobs::config::Config;
use pushjobs::filter::JobFilter;
use pushjobs::push::{ButtonsAndCounts, CountAggregator, PushJobs, is_intermittent};
use pushjobs::selection::{GROUP_STATE, Location, REVISION, SELECTED_TASK_RUN};
use pushjobs::{Group, Job, get_btn_class};

pub struct ShowOptions {
    pub search: Vec<String>,
    pub selected_task_run: Option<String>,
    pub expanded: bool,
    pub duplicates: bool,
    pub runnable: bool,
    pub unclassified: bool,
}

fn render_button(job: &Job, selected_task_run: Option<&str>, intermittent: &BTreeSet<String>) -> String {
    let btn = get_btn_class(Some(job.result_status.as_str()), job.failure_classification_id);
    let mut text = job.job_type_symbol.clone();

    if is_intermittent(job, intermittent) {
        text.push('~');
    } else if job.is_failure_status() && !btn.is_classified {
        text.push('!');
    } else if btn.is_classified {
        text.push('*');
    }

    if selected_task_run.is_some_and(|tr| tr == job.task_run) {
        format!("[{}]", text)
    } else {
        text
    }
}

fn render_group(
    group: &Group,
    partition: &ButtonsAndCounts<'_>,
    selected_task_run: Option<&str>,
    intermittent: &BTreeSet<String>,
) -> String {
    let mut cells: Vec<String> = partition
        .buttons
        .iter()
        .map(|job| render_button(job, selected_task_run, intermittent))
        .collect();
    for count in &partition.counts {
        let cell = format!("+{}:{}", count.count, count.status);
        cells.push(if count.selected { format!("[{}]", cell) } else { cell });
    }

    if group.is_ungrouped() {
        cells.join(" ")
    } else {
        format!("{}( {} )", group.symbol, cells.join(" "))
    }
}

/// Print one line per visible platform row
pub async fn show_command(push_path: &Path, config: &Config, options: ShowOptions) -> Result<()> {
    let data = super::load_push(push_path)?;

    let mut filter = if options.unclassified {
        JobFilter::unclassified_failures()
    } else {
        config.filter.clone()
    };
    if !options.search.is_empty() {
        filter = filter.with_search(&options.search);
    }

    let location = Location::new();
    location.set_url_params(&[
        (REVISION, Some(data.revision.as_str())),
        (SELECTED_TASK_RUN, options.selected_task_run.as_deref()),
        (GROUP_STATE, options.expanded.then_some("expanded")),
    ]);
    let selected_task_run = location.selected_task_run();
    let selected = selected_task_run.as_deref();

    let runnable_visible = options.runnable || config.display.runnable_visible;
    let mut push = PushJobs::new(data);
    push.filter_all(&filter, runnable_visible, selected);

    let intermittent = push.intermittent_job_type_names();
    let aggregator = CountAggregator::new(
        location.groups_expanded() || config.groups_expanded(),
        options.duplicates || config.display.duplicate_jobs_visible,
    );

    println!("Push {} ({})", push.push_id, push.revision);

    let mut shown = 0;
    for platform in push.platforms.iter().filter(|p| p.visible) {
        let groups: Vec<String> = platform
            .groups
            .iter()
            .filter(|g| g.visible)
            .map(|g| render_group(g, &aggregator.for_group(g, selected), selected, &intermittent))
            .collect();

        println!("  {:<24} {:<8} {}", platform.name, platform.option, groups.join(" "));
        shown += 1;
    }

    if shown == 0 {
        println!("  No jobs match the current filters.");
    }
    if !intermittent.is_empty() {
        let names: Vec<_> = intermittent.into_iter().collect();
        println!("\nIntermittent (~): {}", names.join(", "));
    }

    Ok(())
}

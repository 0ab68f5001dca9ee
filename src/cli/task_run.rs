//! Task-run command implementation

use anyhow::{Result, bail};

use pushjobs::get_task_run;

/// Parse and print a task-run string
pub fn task_run_command(value: &str) -> Result<()> {
    let task_run = get_task_run(value);
    let Some(task_id) = task_run.task_id else {
        bail!("Invalid task run: {}", value);
    };

    println!("task_id: {}", task_id);
    match task_run.run_id {
        Some(run_id) => println!("run_id:  {}", run_id),
        None => println!("run_id:  (latest)"),
    }
    Ok(())
}

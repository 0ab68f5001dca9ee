//! Intermittent command implementation

use anyhow::Result;
use std::path::Path;

use pushjobs::push::PushJobs;

/// Print the intermittent job types of every group
pub async fn intermittent_command(push_path: &Path) -> Result<()> {
    let push = PushJobs::new(super::load_push(push_path)?);
    let confirm = push.confirm_groups();

    let mut found = 0;
    for platform in &push.platforms {
        for group in platform.groups.iter().filter(|g| !g.is_confirm_failure()) {
            let names = push.group_intermittents(group, &confirm);
            if names.is_empty() {
                continue;
            }

            let label = if group.symbol.is_empty() { &group.name } else { &group.symbol };
            let names: Vec<_> = names.into_iter().collect();
            println!(
                "{} {} {} (tier {}): {}",
                platform.name,
                platform.option,
                label,
                group.tier,
                names.join(", ")
            );
            found += names.len();
        }
    }

    if found == 0 {
        println!("No intermittent failures in push {}.", push.push_id);
    }
    Ok(())
}

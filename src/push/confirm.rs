//! Linking confirm-failure ("-cf") groups to the groups they rerun.
//!
//! Confirm-failure jobs always run at tier 3 while the job being confirmed
//! may be tier 1 or 2, so the parent is found by substituting each tier
//! into the `-cf` group's map key and probing the existing groups.

use std::collections::{HashMap, HashSet};

use crate::domain::Group;

/// Map from a parent group's map key to its confirm-failure group.
pub fn confirm_groups<'a, I>(groups: I) -> HashMap<String, &'a Group>
where
    I: IntoIterator<Item = &'a Group>,
{
    let groups: Vec<&Group> = groups.into_iter().collect();
    let keys: HashSet<&str> = groups.iter().map(|g| g.map_key.as_str()).collect();
    let mut matched = HashMap::new();

    for group in groups.iter().filter(|g| g.is_confirm_failure()) {
        let needle = format!("-cf{}", group.tier);
        if !group.map_key.contains(&needle) {
            continue;
        }

        let parent = (1..=3u8)
            .map(|tier| group.map_key.replacen(&needle, &tier.to_string(), 1))
            .find(|candidate| keys.contains(candidate.as_str()));

        match parent {
            Some(parent_key) => {
                tracing::debug!("Confirm group {} matches {}", group.map_key, parent_key);
                matched.insert(parent_key, *group);
            }
            None => tracing::debug!("Confirm group {} has no parent group", group.map_key),
        }
    }

    matched
}

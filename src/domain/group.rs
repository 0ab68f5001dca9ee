use serde::{Deserialize, Serialize};

use super::Job;

/// Rank of build options within a platform row. Unknown options sort last.
const OPTION_ORDER: [&str; 9] = [
    "opt",
    "pgo",
    "asan",
    "tsan",
    "debug",
    "cc",
    "addon",
    "all",
    "debug-isolated-process",
];

/// Composite group key: push id, group symbol, tier, platform and build
/// option, concatenated without separators. A confirm-failure group at
/// tier 3 therefore carries `-cf3` in its key.
pub fn group_map_key(push_id: u64, symbol: &str, tier: u8, platform: &str, option: &str) -> String {
    format!("{}{}{}{}{}", push_id, symbol, tier, platform, option)
}

/// Cluster of related jobs sharing platform, tier and build type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub map_key: String,
    pub symbol: String,
    pub tier: u8,
    pub name: String,
    pub jobs: Vec<Job>,
    /// True iff any job is visible
    #[serde(default)]
    pub visible: bool,
}

impl Group {
    pub fn new(push_id: u64, symbol: &str, tier: u8, name: &str, platform: &str, option: &str) -> Self {
        Self {
            map_key: group_map_key(push_id, symbol, tier, platform, option),
            symbol: symbol.to_string(),
            tier,
            name: name.to_string(),
            jobs: Vec::new(),
            visible: false,
        }
    }

    /// Whether this is a confirm-failure rerun group
    pub fn is_confirm_failure(&self) -> bool {
        self.symbol.ends_with("-cf")
    }

    /// Tier-1 jobs without a group symbol are rendered loose, not as a group
    pub fn is_ungrouped(&self) -> bool {
        self.tier == 1 && self.symbol.is_empty()
    }
}

/// One platform row of a push
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub name: String,
    pub option: String,
    pub groups: Vec<Group>,
    /// True iff any group is visible
    #[serde(default)]
    pub visible: bool,
}

impl Platform {
    pub fn new(name: impl Into<String>, option: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            option: option.into(),
            groups: Vec::new(),
            visible: false,
        }
    }

    /// Group `jobs` into platform rows, groups in first-seen order.
    pub fn from_jobs(jobs: Vec<Job>) -> Vec<Platform> {
        let mut platforms: Vec<Platform> = Vec::new();

        for job in jobs {
            let platform_idx = match platforms
                .iter()
                .position(|p| p.name == job.platform && p.option == job.platform_option)
            {
                Some(idx) => idx,
                None => {
                    platforms.push(Platform::new(&job.platform, &job.platform_option));
                    platforms.len() - 1
                }
            };
            let platform = &mut platforms[platform_idx];

            let key = group_map_key(
                job.push_id,
                &job.job_group_symbol,
                job.effective_tier(),
                &job.platform,
                &job.platform_option,
            );
            match platform.groups.iter_mut().find(|g| g.map_key == key) {
                Some(group) => group.jobs.push(job),
                None => {
                    let mut group = Group::new(
                        job.push_id,
                        &job.job_group_symbol,
                        job.effective_tier(),
                        &job.job_group_name,
                        &job.platform,
                        &job.platform_option,
                    );
                    group.jobs.push(job);
                    platform.groups.push(group);
                }
            }
        }

        platforms
    }

    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.groups.iter().flat_map(|g| g.jobs.iter())
    }
}

pub fn option_rank(option: &str) -> usize {
    OPTION_ORDER
        .iter()
        .position(|o| *o == option)
        .unwrap_or(OPTION_ORDER.len())
}

/// Platforms ordered by name, then build option rank. Returns a new
/// sequence; the input is left untouched.
pub fn ordered_platforms(platforms: &[Platform]) -> Vec<&Platform> {
    let mut ordered: Vec<&Platform> = platforms.iter().collect();
    ordered.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then_with(|| option_rank(&a.option).cmp(&option_rank(&b.option)))
            .then_with(|| a.option.cmp(&b.option))
    });
    ordered
}

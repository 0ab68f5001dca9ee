//! Display settings

use serde::{Deserialize, Serialize};

/// Whether job groups start collapsed into counts or expanded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupState {
    #[default]
    Collapsed,
    Expanded,
}

impl GroupState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupState::Collapsed => "collapsed",
            GroupState::Expanded => "expanded",
        }
    }

    pub fn is_expanded(&self) -> bool {
        *self == GroupState::Expanded
    }
}

/// How the job list is rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default)]
    pub group_state: GroupState,

    /// Show every job of a duplicated symbol instead of folding it into a count
    #[serde(default)]
    pub duplicate_jobs_visible: bool,

    /// Expand counts in every group regardless of `group_state`
    #[serde(default)]
    pub group_counts_expanded: bool,

    /// Show jobs that can be scheduled but have not run
    #[serde(default)]
    pub runnable_visible: bool,

    /// Delay before a keyboard selection is committed to the URL
    #[serde(default = "default_selection_debounce_ms")]
    pub selection_debounce_ms: u64,
}

fn default_selection_debounce_ms() -> u64 {
    200
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            group_state: GroupState::default(),
            duplicate_jobs_visible: false,
            group_counts_expanded: false,
            runnable_visible: false,
            selection_debounce_ms: default_selection_debounce_ms(),
        }
    }
}

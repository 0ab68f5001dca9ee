//! Registry of live job controls
//!
//! Hotkeys and URL sync need to reach a specific job's control without
//! walking push → platform → group → job, and without asking the rendered
//! output which job looks selected. Controls register themselves when
//! mounted, overwrite their entry whenever their job or callbacks change,
//! and unregister when unmounted.
//!
//! [`SharedRegistry::global`] is the process-wide instance used by the
//! free functions at the bottom of this module. Views that must not share
//! state (several pushes, tests) create their own [`SharedRegistry`].

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::domain::{Job, JobId};

/// Registry key. Numeric and string ids of the same job are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobKey(String);

impl JobKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! job_key_from_int {
    ($($ty:ty),*) => {
        $(impl From<$ty> for JobKey {
            fn from(id: $ty) -> Self {
                JobKey(id.to_string())
            }
        })*
    };
}

job_key_from_int!(u32, u64, usize, i32, i64);

impl From<&str> for JobKey {
    fn from(id: &str) -> Self {
        JobKey(id.trim().to_string())
    }
}

impl From<String> for JobKey {
    fn from(id: String) -> Self {
        JobKey::from(id.as_str())
    }
}

impl From<&JobKey> for JobKey {
    fn from(key: &JobKey) -> Self {
        key.clone()
    }
}

/// Snapshot of a control's inputs
#[derive(Debug, Clone, PartialEq)]
pub struct ControlProps {
    pub job: Job,
    pub visible: bool,
}

/// A mounted job control that can be driven imperatively
pub trait JobControl: Send + Sync {
    fn props(&self) -> ControlProps;

    fn set_selected(&self, selected: bool);

    fn toggle_runnable_selected(&self);

    /// Recompute visibility of the control's platform row
    fn refilter(&self);
}

pub type JobHandle = Arc<dyn JobControl>;

/// Map from job id to live control, plus the currently selected id
#[derive(Default)]
pub struct JobButtonRegistry {
    buttons: HashMap<JobKey, JobHandle>,
    currently_selected: Option<JobKey>,
}

impl fmt::Debug for JobButtonRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobButtonRegistry")
            .field("buttons", &self.buttons.len())
            .field("currently_selected", &self.currently_selected)
            .finish()
    }
}

impl JobButtonRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a control, replacing any previous one for the same id.
    /// Returns the replaced control.
    pub fn register(&mut self, id: impl Into<JobKey>, handle: JobHandle) -> Option<JobHandle> {
        let key = id.into();
        let previous = self.buttons.insert(key.clone(), handle);
        if previous.is_some() {
            tracing::trace!("Replaced job control {}", key);
        }
        previous
    }

    /// Remove a control. Clears the selection pointer if it pointed here.
    pub fn unregister(&mut self, id: impl Into<JobKey>) -> Option<JobHandle> {
        let key = id.into();
        if self.currently_selected.as_ref() == Some(&key) {
            tracing::debug!("Unregistered the selected job control {}", key);
            self.currently_selected = None;
        }
        self.buttons.remove(&key)
    }

    /// `None` for unknown ids. A control may be legitimately unmounted
    /// while someone still holds its id.
    pub fn get(&self, id: impl Into<JobKey>) -> Option<JobHandle> {
        self.buttons.get(&id.into()).cloned()
    }

    pub fn contains(&self, id: impl Into<JobKey>) -> bool {
        self.buttons.contains_key(&id.into())
    }

    /// Point the selection at a registered control. Returns it, or `None`
    /// (and clears the pointer) when no control is registered for `id`.
    pub fn set_currently_selected(&mut self, id: impl Into<JobKey>) -> Option<JobHandle> {
        let key = id.into();
        match self.buttons.get(&key).cloned() {
            Some(handle) => {
                self.currently_selected = Some(key);
                Some(handle)
            }
            None => {
                self.currently_selected = None;
                None
            }
        }
    }

    pub fn clear_currently_selected(&mut self) {
        self.currently_selected = None;
    }

    pub fn currently_selected_job_id(&self) -> Option<&JobKey> {
        self.currently_selected.as_ref()
    }

    /// The selected control, looked up fresh so a replaced entry is never
    /// returned stale
    pub fn currently_selected_instance(&self) -> Option<JobHandle> {
        self.currently_selected
            .as_ref()
            .and_then(|key| self.buttons.get(key).cloned())
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    pub fn clear(&mut self) {
        self.buttons.clear();
        self.currently_selected = None;
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Shared handle
// ═══════════════════════════════════════════════════════════════════════

static GLOBAL: Lazy<SharedRegistry> = Lazy::new(SharedRegistry::new);

/// Cloneable, lock-guarded registry handle.
///
/// Handles are cloned out before use so no control is ever invoked while
/// the lock is held.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<Mutex<JobButtonRegistry>>,
}

impl SharedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry
    pub fn global() -> SharedRegistry {
        GLOBAL.clone()
    }

    fn with<R>(&self, f: impl FnOnce(&mut JobButtonRegistry) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }

    pub fn register(&self, id: impl Into<JobKey>, handle: JobHandle) -> Option<JobHandle> {
        self.with(|r| r.register(id, handle))
    }

    pub fn unregister(&self, id: impl Into<JobKey>) -> Option<JobHandle> {
        self.with(|r| r.unregister(id))
    }

    pub fn get(&self, id: impl Into<JobKey>) -> Option<JobHandle> {
        self.with(|r| r.get(id))
    }

    pub fn set_currently_selected(&self, id: impl Into<JobKey>) -> Option<JobHandle> {
        self.with(|r| r.set_currently_selected(id))
    }

    pub fn clear_currently_selected(&self) {
        self.with(|r| r.clear_currently_selected())
    }

    pub fn currently_selected_job_id(&self) -> Option<JobKey> {
        self.with(|r| r.currently_selected_job_id().cloned())
    }

    pub fn currently_selected_instance(&self) -> Option<JobHandle> {
        self.with(|r| r.currently_selected_instance())
    }

    pub fn len(&self) -> usize {
        self.with(|r| r.len())
    }

    pub fn is_empty(&self) -> bool {
        self.with(|r| r.is_empty())
    }

    /// Drop every entry and the selection pointer
    pub fn clear(&self) {
        self.with(|r| r.clear())
    }
}

/// Reset the process-wide registry, e.g. when a new push replaces the view
pub fn init() {
    SharedRegistry::global().clear();
}

pub fn register_job_button(id: impl Into<JobKey>, handle: JobHandle) {
    SharedRegistry::global().register(id, handle);
}

pub fn unregister_job_button(id: impl Into<JobKey>) {
    SharedRegistry::global().unregister(id);
}

pub fn get_job_button_instance(id: impl Into<JobKey>) -> Option<JobHandle> {
    SharedRegistry::global().get(id)
}

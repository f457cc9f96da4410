use super::kv::KeyValueStore;
use crate::domain::{Subject, Task, ViewMode};
use crate::store::Store;
use crate::timer::TimerSettings;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

pub const SUBJECTS_KEY: &str = "studyflow_subjects";
pub const TASKS_KEY: &str = "studyflow_tasks";
pub const VIEW_KEY: &str = "studyflow_currentView";
pub const TIMER_SETTINGS_KEY: &str = "studyflow_timerSettings";

/// Everything restored at startup
#[derive(Debug, Clone, Default)]
pub struct SavedState {
    pub subjects: Vec<Subject>,
    pub tasks: Vec<Task>,
    pub view: ViewMode,
    pub timer_settings: TimerSettings,
}

fn read_key(kv: &dyn KeyValueStore, key: &str) -> Option<String> {
    match kv.get(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "could not read saved value, using default");
            None
        }
    }
}

fn load_json<T: DeserializeOwned>(kv: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = read_key(kv, key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "saved value is malformed, using default");
            None
        }
    }
}

/// Load each key on its own; anything missing or unreadable falls back to
/// its default instead of failing the whole restore
pub fn load_state(kv: &dyn KeyValueStore) -> SavedState {
    let subjects: Vec<Subject> = load_json(kv, SUBJECTS_KEY).unwrap_or_default();
    let tasks: Vec<Task> = load_json(kv, TASKS_KEY).unwrap_or_default();

    let view = read_key(kv, VIEW_KEY)
        .and_then(|raw| match raw.trim().trim_matches('"').parse::<ViewMode>() {
            Ok(view) => Some(view),
            Err(e) => {
                tracing::warn!(error = %e, "saved view mode is invalid, using default");
                None
            }
        })
        .unwrap_or_default();

    let timer_settings = load_json::<TimerSettings>(kv, TIMER_SETTINGS_KEY)
        .map(|settings| {
            if !settings.is_valid() {
                tracing::warn!(?settings, "saved timer durations out of range, using defaults for them");
            }
            settings.normalized()
        })
        .unwrap_or_default();

    SavedState {
        subjects,
        tasks,
        view,
        timer_settings,
    }
}

/// Which parts of the saved state are out of date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Changes {
    pub plan: bool,
    pub view: bool,
    pub timer_settings: bool,
}

impl Changes {
    #[cfg(test)]
    pub const ALL: Self = Self {
        plan: true,
        view: true,
        timer_settings: true,
    };

    pub fn any(&self) -> bool {
        self.plan || self.view || self.timer_settings
    }
}

/// Write the keys named by `changes`; keys left alone keep whatever is on
/// disk, even if it failed to load. An empty store removes the plan keys.
pub fn save_state(
    kv: &mut dyn KeyValueStore,
    store: &Store,
    view: ViewMode,
    timer_settings: &TimerSettings,
    changes: Changes,
) -> Result<()> {
    if changes.plan {
        if store.is_empty() {
            clear_plan(kv)?;
        } else {
            let subjects = serde_json::to_string_pretty(store.subjects()).context("Failed to encode subjects")?;
            let tasks = serde_json::to_string_pretty(store.tasks()).context("Failed to encode tasks")?;
            kv.set(SUBJECTS_KEY, &subjects)?;
            kv.set(TASKS_KEY, &tasks)?;
        }
    }
    if changes.view {
        kv.set(VIEW_KEY, view.as_str())?;
    }
    if changes.timer_settings {
        let settings = serde_json::to_string_pretty(timer_settings).context("Failed to encode timer settings")?;
        kv.set(TIMER_SETTINGS_KEY, &settings)?;
    }
    Ok(())
}

/// Drop the saved plan, keeping view mode and timer settings
pub fn clear_plan(kv: &mut dyn KeyValueStore) -> Result<()> {
    kv.remove(SUBJECTS_KEY)?;
    kv.remove(TASKS_KEY)?;
    Ok(())
}

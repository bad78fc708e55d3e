//! Unsaved-change tracking for the agent form.

use voxagent_core::constants::UNSAVED_CHANGES_PROMPT;
use voxagent_core::AgentData;

/// Compares drafts against the last saved payload.
#[derive(Debug, Clone, Default)]
pub struct UnsavedChanges {
    baseline: Option<AgentData>,
}

impl UnsavedChanges {
    /// Tracker whose baseline is `saved`; `None` treats every draft as dirty.
    pub fn new(saved: Option<AgentData>) -> Self {
        Self { baseline: saved }
    }

    pub fn mark_saved(&mut self, saved: AgentData) {
        self.baseline = Some(saved);
    }

    pub fn baseline(&self) -> Option<&AgentData> {
        self.baseline.as_ref()
    }

    pub fn is_dirty(&self, current: &AgentData) -> bool {
        self.baseline.as_ref() != Some(current)
    }

    /// Whether leaving the form may proceed. `confirm` is asked only when
    /// `current` differs from the baseline.
    pub fn confirm_navigation<F>(&self, current: &AgentData, confirm: F) -> bool
    where
        F: FnOnce(&str) -> bool,
    {
        !self.is_dirty(current) || confirm(UNSAVED_CHANGES_PROMPT)
    }
}

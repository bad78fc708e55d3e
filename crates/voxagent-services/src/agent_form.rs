//! Agent form controller
//!
//! Owns the draft being edited together with its attachment uploads and
//! drives validation, saving and test calls. The attachments sent with a save
//! are exactly the remote ids of the uploads completed at that moment.

use std::sync::Arc;

use voxagent_core::constants::{
    PHONE_NUMBER_REQUIRED_MESSAGE, REQUIRED_FIELDS_BEFORE_TEST_MESSAGE, REQUIRED_FIELDS_MESSAGE,
};
use voxagent_core::{
    Agent, AgentData, AgentService, AttachmentService, TestCallData, TestCallResponse,
};

use crate::agent_save::AgentSaver;
use crate::notifications::Notifier;
use crate::test_call::TestCaller;
use crate::unsaved::UnsavedChanges;
use crate::uploads::UploadOrchestrator;

pub struct AgentForm {
    draft: AgentData,
    uploads: UploadOrchestrator,
    saver: AgentSaver,
    test_caller: TestCaller,
    unsaved: UnsavedChanges,
    notifier: Arc<dyn Notifier>,
}

impl AgentForm {
    /// Form for a new agent, starting from the default draft.
    pub fn new(
        agents: Arc<dyn AgentService>,
        attachments: Arc<dyn AttachmentService>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let draft = AgentData::default();
        let unsaved = UnsavedChanges::new(Some(draft.with_attachments(Vec::new())));

        Self {
            draft,
            uploads: UploadOrchestrator::new(attachments),
            saver: AgentSaver::new(agents.clone(), notifier.clone()),
            test_caller: TestCaller::new(agents, notifier.clone()),
            unsaved,
            notifier,
        }
    }

    /// Form for an existing agent. Opens clean: its stored data is the baseline.
    pub fn edit(
        agents: Arc<dyn AgentService>,
        attachments: Arc<dyn AttachmentService>,
        notifier: Arc<dyn Notifier>,
        agent: Agent,
    ) -> Self {
        let mut form = Self::new(agents, attachments, notifier).with_agent_id(agent.id);
        form.load_draft(agent.data);
        form
    }

    /// Edit an agent that already exists; saves update it.
    pub fn with_agent_id(self, agent_id: impl Into<String>) -> Self {
        Self {
            saver: self.saver.with_agent_id(agent_id),
            ..self
        }
    }

    pub fn draft(&self) -> &AgentData {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut AgentData {
        &mut self.draft
    }

    pub fn set_draft(&mut self, draft: AgentData) {
        self.draft = draft;
    }

    /// Replace the draft and take it as the unsaved-changes baseline.
    pub fn load_draft(&mut self, draft: AgentData) {
        // Attachments come from the upload list, not the draft.
        self.unsaved.mark_saved(draft.with_attachments(Vec::new()));
        self.draft = draft;
    }

    pub fn uploads(&self) -> &UploadOrchestrator {
        &self.uploads
    }

    pub async fn agent_id(&self) -> Option<String> {
        self.saver.agent_id().await
    }

    pub fn is_saving(&self) -> bool {
        self.saver.is_saving()
    }

    pub fn is_testing(&self) -> bool {
        self.test_caller.is_testing()
    }

    /// The draft carrying the currently confirmed attachment ids.
    pub async fn build_agent_data(&self) -> AgentData {
        let attachment_ids = self.uploads.confirmed_remote_ids().await;
        self.draft.with_attachments(attachment_ids)
    }

    /// Validate and save the agent. Failures are notified and yield `None`.
    pub async fn save(&mut self) -> Option<Agent> {
        let missing = self.draft.missing_required_fields();
        if !missing.is_empty() {
            tracing::warn!(missing = ?missing, "Agent draft is incomplete");
            self.notifier.error(REQUIRED_FIELDS_MESSAGE);
            return None;
        }

        if self.uploads.has_pending_uploads().await {
            tracing::info!("Saving agent while attachment uploads are still running");
        }

        let data = self.build_agent_data().await;
        match self.saver.save(&data).await {
            Ok((agent, _)) => {
                self.unsaved.mark_saved(data);
                Some(agent)
            }
            Err(_) => None,
        }
    }

    /// Start a test call, saving a never-saved agent first.
    pub async fn test_call(&mut self, data: &TestCallData) -> Option<TestCallResponse> {
        if data.phone_number.trim().is_empty() {
            self.notifier.error(PHONE_NUMBER_REQUIRED_MESSAGE);
            return None;
        }

        let agent_id = match self.saver.agent_id().await {
            Some(id) => id,
            None => {
                if !self.draft.has_required_fields() {
                    self.notifier.error(REQUIRED_FIELDS_BEFORE_TEST_MESSAGE);
                    return None;
                }
                self.save().await?.id
            }
        };

        self.test_caller.start_test_call(&agent_id, data).await
    }

    pub async fn has_unsaved_changes(&self) -> bool {
        let current = self.build_agent_data().await;
        self.unsaved.is_dirty(&current)
    }

    /// Whether the user may leave the form; asks `confirm` only when dirty.
    pub async fn confirm_navigation<F>(&self, confirm: F) -> bool
    where
        F: FnOnce(&str) -> bool,
    {
        let current = self.build_agent_data().await;
        self.unsaved.confirm_navigation(&current, confirm)
    }
}

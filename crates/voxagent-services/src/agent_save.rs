//! Agent save coordination: create on first save, update afterwards.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use voxagent_core::constants::{AGENT_CREATED_MESSAGE, AGENT_UPDATED_MESSAGE};
use voxagent_core::{Agent, AgentData, AgentService, ApiError, ApiResult};

use crate::notifications::Notifier;

/// Which backend operation a successful save performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Updated,
}

pub struct AgentSaver {
    service: Arc<dyn AgentService>,
    notifier: Arc<dyn Notifier>,
    agent_id: RwLock<Option<String>>,
    last_error: RwLock<Option<ApiError>>,
    saving: AtomicBool,
}

/// Clears the saving flag when a save ends.
struct SavingFlag<'a>(&'a AtomicBool);

impl Drop for SavingFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl AgentSaver {
    pub fn new(service: Arc<dyn AgentService>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            service,
            notifier,
            agent_id: RwLock::new(None),
            last_error: RwLock::new(None),
            saving: AtomicBool::new(false),
        }
    }

    /// Saver for an agent that already exists on the backend.
    pub fn with_agent_id(self, agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: RwLock::new(Some(agent_id.into())),
            ..self
        }
    }

    pub async fn agent_id(&self) -> Option<String> {
        self.agent_id.read().await.clone()
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    pub async fn last_error(&self) -> Option<ApiError> {
        self.last_error.read().await.clone()
    }

    /// Create or update the agent and notify the outcome.
    pub async fn save(&self, data: &AgentData) -> ApiResult<(Agent, SaveOutcome)> {
        self.saving.store(true, Ordering::Release);
        let _flag = SavingFlag(&self.saving);
        *self.last_error.write().await = None;

        let existing = self.agent_id().await;
        let result = match existing.as_deref() {
            Some(id) => self
                .service
                .update_agent(id, data)
                .await
                .map(|agent| (agent, SaveOutcome::Updated)),
            None => self
                .service
                .create_agent(data)
                .await
                .map(|agent| (agent, SaveOutcome::Created)),
        };

        match result {
            Ok((agent, outcome)) => {
                match outcome {
                    SaveOutcome::Created => {
                        *self.agent_id.write().await = Some(agent.id.clone());
                        tracing::info!(agent_id = %agent.id, "Agent created");
                        self.notifier.success(AGENT_CREATED_MESSAGE, None);
                    }
                    SaveOutcome::Updated => {
                        tracing::info!(agent_id = %agent.id, "Agent updated");
                        self.notifier.success(AGENT_UPDATED_MESSAGE, None);
                    }
                }
                Ok((agent, outcome))
            }
            Err(err) => {
                tracing::error!(
                    agent_id = ?existing,
                    error = %err,
                    "Failed to save agent"
                );
                self.notifier.error(&err.user_message());
                *self.last_error.write().await = Some(err.clone());
                Err(err)
            }
        }
    }
}

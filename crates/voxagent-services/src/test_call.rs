//! Test calls against a saved agent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use voxagent_core::constants::{TEST_CALL_STARTED_DESCRIPTION, TEST_CALL_STARTED_MESSAGE};
use voxagent_core::{AgentService, TestCallData, TestCallResponse};

use crate::notifications::Notifier;

pub struct TestCaller {
    service: Arc<dyn AgentService>,
    notifier: Arc<dyn Notifier>,
    testing: AtomicBool,
}

impl TestCaller {
    pub fn new(service: Arc<dyn AgentService>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            service,
            notifier,
            testing: AtomicBool::new(false),
        }
    }

    pub fn is_testing(&self) -> bool {
        self.testing.load(Ordering::Acquire)
    }

    /// Ask the backend to call `data.phone_number` with the agent.
    ///
    /// Failures are notified and yield `None`.
    pub async fn start_test_call(
        &self,
        agent_id: &str,
        data: &TestCallData,
    ) -> Option<TestCallResponse> {
        self.testing.store(true, Ordering::Release);
        let result = self.service.start_test_call(agent_id, data).await;
        self.testing.store(false, Ordering::Release);

        match result {
            Ok(response) => {
                tracing::info!(
                    agent_id = %agent_id,
                    call_id = %response.call_id,
                    status = %response.status,
                    "Test call initiated"
                );
                self.notifier.success(
                    TEST_CALL_STARTED_MESSAGE,
                    Some(TEST_CALL_STARTED_DESCRIPTION),
                );
                Some(response)
            }
            Err(err) => {
                tracing::error!(agent_id = %agent_id, error = %err, "Test call failed");
                self.notifier.error(&err.user_message());
                None
            }
        }
    }
}

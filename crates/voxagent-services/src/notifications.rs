//! User notification sink
//!
//! The form services report outcomes as toast-style notifications. The CLI
//! logs them through `tracing`; tests record them in memory.

use std::sync::Mutex;

/// Notification surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success {
        message: String,
        description: Option<String>,
    },
    Error {
        message: String,
    },
    Info {
        message: String,
    },
}

impl Notification {
    pub fn message(&self) -> &str {
        match self {
            Notification::Success { message, .. }
            | Notification::Error { message }
            | Notification::Info { message } => message,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notification::Error { .. })
    }
}

pub trait Notifier: Send + Sync {
    fn success(&self, message: &str, description: Option<&str>);

    fn error(&self, message: &str);

    fn info(&self, message: &str);
}

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str, description: Option<&str>) {
        match description {
            Some(description) => tracing::info!(description = %description, "{}", message),
            None => tracing::info!("{}", message),
        }
    }

    fn error(&self, message: &str) {
        tracing::error!("{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }
}

/// Records notifications in order of arrival.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.lock().last().cloned()
    }

    pub fn errors(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|n| n.is_error())
            .map(|n| n.message().to_string())
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn push(&self, notification: Notification) {
        self.lock().push(notification);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
        // A poisoned lock still holds a consistent Vec.
        self.notifications
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Notifier for MemoryNotifier {
    fn success(&self, message: &str, description: Option<&str>) {
        self.push(Notification::Success {
            message: message.to_string(),
            description: description.map(str::to_string),
        });
    }

    fn error(&self, message: &str) {
        self.push(Notification::Error {
            message: message.to_string(),
        });
    }

    fn info(&self, message: &str) {
        self.push(Notification::Info {
            message: message.to_string(),
        });
    }
}

//! User-facing notifications.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// One-way sink for operation outcomes shown to the user.
pub trait Notifier: Send + Sync {
    /// Report a success.
    fn notify(&self, message: &str);

    /// Report a failure.
    fn notify_error(&self, message: &str);
}

/// Texts shown for each outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// A new product was added.
    pub added: String,
    /// Requested quantity exceeds stock.
    pub out_of_stock: String,
    /// Adding a product failed.
    pub add_failed: String,
    /// Removing a product failed.
    pub remove_failed: String,
    /// Changing a quantity failed.
    pub update_failed: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            added: "Produto Adicionado".to_string(),
            out_of_stock: "Quantidade solicitada fora de estoque".to_string(),
            add_failed: "Erro na adição do produto".to_string(),
            remove_failed: "Erro na remoção do produto".to_string(),
            update_failed: "Erro na alteração de quantidade do produto".to_string(),
        }
    }
}

/// Notifier that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _message: &str) {}

    fn notify_error(&self, _message: &str) {}
}

/// Severity of a recorded notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A notification captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Notifier that keeps every call, in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    calls: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications so far.
    pub fn notifications(&self) -> Vec<Notification> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Messages of error notifications so far.
    pub fn errors(&self) -> Vec<String> {
        self.messages_at(NotificationLevel::Error)
    }

    /// Messages of success notifications so far.
    pub fn infos(&self) -> Vec<String> {
        self.messages_at(NotificationLevel::Info)
    }

    /// Check if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.notifications().is_empty()
    }

    /// Forget recorded notifications.
    pub fn clear(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
    }

    fn messages_at(&self, level: NotificationLevel) -> Vec<String> {
        self.notifications()
            .into_iter()
            .filter(|n| n.level == level)
            .map(|n| n.message)
            .collect()
    }

    fn record(&self, level: NotificationLevel, message: &str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(Notification {
                level,
                message: message.to_string(),
            });
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.record(NotificationLevel::Info, message);
    }

    fn notify_error(&self, message: &str) {
        self.record(NotificationLevel::Error, message);
    }
}

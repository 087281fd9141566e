//! User-visible notifications.
//!
//! Tracker operations and games describe what the user should be told.
//! Presenting it (toast, log line, test buffer) is the job of a
//! [`Notifier`] supplied by the surrounding UI layer.

use serde::{Deserialize, Serialize};

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Default,
    Destructive,
}

/// A fire-and-forget message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Default,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }
}

/// Receives notifications produced by the domain.
pub trait Notifier {
    fn notify(&mut self, notification: Notification);

    fn notify_all(&mut self, notifications: impl IntoIterator<Item = Notification>)
    where
        Self: Sized,
    {
        for n in notifications {
            self.notify(n);
        }
    }
}

impl<N: Notifier + ?Sized> Notifier for &mut N {
    fn notify(&mut self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// Forwards notifications to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notification: Notification) {
        match notification.severity {
            Severity::Default => {
                log::info!("{}: {}", notification.title, notification.description)
            }
            Severity::Destructive => {
                log::warn!("{}: {}", notification.title, notification.description)
            }
        }
    }
}

/// Buffers notifications in memory, in arrival order.
#[derive(Debug, Default, Clone)]
pub struct CollectingNotifier {
    pub received: Vec<Notification>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.received.iter().map(|n| n.title.as_str()).collect()
    }

    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.received)
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&mut self, notification: Notification) {
        self.received.push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_notifier_keeps_order() {
        let mut sink = CollectingNotifier::new();
        sink.notify(Notification::info("First", "a"));
        sink.notify(Notification::destructive("Second", "b"));
        assert_eq!(sink.titles(), vec!["First", "Second"]);
        assert_eq!(sink.received[1].severity, Severity::Destructive);
    }

    fn send_two<N: Notifier>(mut notifier: N) {
        notifier.notify_all(vec![
            Notification::info("One", ""),
            Notification::info("Two", ""),
        ]);
    }

    #[test]
    fn notify_through_mut_reference() {
        let mut sink = CollectingNotifier::new();
        send_two(&mut sink);
        assert_eq!(sink.drain().len(), 2);
        assert!(sink.received.is_empty());
    }
}

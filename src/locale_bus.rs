use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use crate::{locale::Locale, LOCALE_BUS_CAPACITY};

/// Payload of the `languageChanged` signal: `{ "language": "<tag>" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageChanged {
    pub language: Locale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleEvent {
    /// Label of the window that published the change.
    pub origin: String,
    pub payload: LanguageChanged,
}

/// Fire-and-forget fan-out of language changes to every subscribed window.
#[derive(Debug, Clone)]
pub struct LocaleBus {
    sender: broadcast::Sender<LocaleEvent>,
}

impl Default for LocaleBus {
    fn default() -> Self {
        Self::new(LOCALE_BUS_CAPACITY)
    }
}

impl LocaleBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Returns how many subscribers were handed the event.
    pub fn publish(&self, origin: &str, language: Locale) -> usize {
        let event = LocaleEvent {
            origin: origin.to_string(),
            payload: LanguageChanged { language },
        };
        // No subscribers is a normal state for a single-window process.
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> LocaleSubscription {
        LocaleSubscription {
            receiver: self.sender.subscribe(),
        }
    }
}

#[derive(Debug)]
pub struct LocaleSubscription {
    receiver: broadcast::Receiver<LocaleEvent>,
}

impl LocaleSubscription {
    /// Consumes every pending event and returns the newest one, unless the
    /// newest was published by `skip_origin` itself.
    pub fn drain_latest(&mut self, skip_origin: &str) -> Option<LocaleEvent> {
        let mut latest: Option<LocaleEvent> = None;
        loop {
            match self.receiver.try_recv() {
                Ok(event) => latest = Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "locale subscription lagged behind");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => {
                    return latest.filter(|event| event.origin != skip_origin);
                }
            }
        }
    }

    /// Waits for the next event. `None` once every publisher is gone.
    pub async fn recv(&mut self) -> Option<LocaleEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "locale subscription lagged behind");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_serializes_as_language_object() {
        let payload = LanguageChanged {
            language: Locale::ZhCn,
        };
        assert_eq!(
            serde_json::to_value(payload).expect("serialize payload"),
            serde_json::json!({ "language": "zh-CN" })
        );
    }

    #[test]
    fn publish_without_subscribers_is_not_an_error() {
        let bus = LocaleBus::default();
        assert_eq!(bus.publish("main", Locale::EnUs), 0);
    }

    #[test]
    fn drain_latest_returns_newest_foreign_event() {
        let bus = LocaleBus::default();
        let mut settings = bus.subscribe();

        bus.publish("settings", Locale::EnUs);
        bus.publish("main", Locale::EnUs);
        bus.publish("new_project", Locale::ZhCn);

        let latest = settings.drain_latest("settings").expect("foreign event");
        assert_eq!(latest.origin, "new_project");
        assert_eq!(latest.payload.language, Locale::ZhCn);
        assert_eq!(settings.drain_latest("settings"), None);
    }

    #[test]
    fn drain_latest_ignores_backlog_superseded_by_own_switch() {
        let bus = LocaleBus::default();
        let mut settings = bus.subscribe();

        bus.publish("main", Locale::ZhCn);
        bus.publish("settings", Locale::EnUs);

        assert_eq!(settings.drain_latest("settings"), None);
    }

    #[test]
    fn drain_latest_recovers_from_lag() {
        let bus = LocaleBus::new(2);
        let mut subscription = bus.subscribe();
        for locale in [Locale::EnUs, Locale::ZhCn, Locale::EnUs, Locale::ZhCn] {
            bus.publish("main", locale);
        }

        let latest = subscription.drain_latest("settings").expect("event after lag");
        assert_eq!(latest.payload.language, Locale::ZhCn);
    }
}

//! Notification transport seam.
//!
//! The engine does not define the transport of notifications; it defines
//! that a dispatch attempt occurs per requested channel and that channel
//! failures are independently observable. `Notifier` is the seam, the
//! production implementation hands messages to the gateway processes, and
//! `mock::MockNotifier` records calls for tests.

use crate::models::{Channel, WaitlistEntry};
use thiserror::Error;

/// A failed dispatch attempt on one channel. The detail is recorded on
/// the notification log row, never escalated to fail the call.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct DispatchError(pub String);

/// Trait for notification dispatch (enables mocking).
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Dispatch one message on one channel.
    async fn send(
        &self,
        channel: Channel,
        entry: &WaitlistEntry,
        message: &str,
    ) -> Result<(), DispatchError>;
}

/// Production notifier.
///
/// SMS and push delivery run through out-of-process gateway workers that
/// consume the notification log; this implementation validates the
/// addressing it can check locally and logs the handoff.
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn send(
        &self,
        channel: Channel,
        entry: &WaitlistEntry,
        message: &str,
    ) -> Result<(), DispatchError> {
        if channel == Channel::Sms && entry.player_phone.is_none() {
            return Err(DispatchError("no phone number on file".to_string()));
        }

        tracing::info!(
            target: "floor.services.notifier",
            entry_id = %entry.entry_id,
            channel = channel.as_str(),
            message_len = message.len(),
            "Notification dispatched"
        );

        Ok(())
    }
}

/// Mock notifier module for testing.
pub mod mock {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use uuid::Uuid;

    /// One recorded dispatch.
    #[derive(Debug, Clone)]
    pub struct RecordedSend {
        pub channel: Channel,
        pub entry_id: Uuid,
        pub message: String,
    }

    /// Mock notifier that records every dispatch and can be configured to
    /// fail specific channels.
    #[derive(Default)]
    pub struct MockNotifier {
        sends: Mutex<Vec<RecordedSend>>,
        failing_channels: HashSet<Channel>,
    }

    impl MockNotifier {
        /// Create a mock where every channel succeeds.
        pub fn succeeding() -> Self {
            Self::default()
        }

        /// Create a mock where the given channels fail.
        pub fn failing_on(channels: &[Channel]) -> Self {
            Self {
                sends: Mutex::new(Vec::new()),
                failing_channels: channels.iter().copied().collect(),
            }
        }

        /// All dispatches attempted so far, in order.
        pub fn sends(&self) -> Vec<RecordedSend> {
            self.sends
                .lock()
                .map(|guard| guard.clone())
                .unwrap_or_default()
        }

        pub fn send_count(&self) -> usize {
            self.sends.lock().map(|guard| guard.len()).unwrap_or(0)
        }
    }

    #[async_trait::async_trait]
    impl Notifier for MockNotifier {
        async fn send(
            &self,
            channel: Channel,
            entry: &WaitlistEntry,
            message: &str,
        ) -> Result<(), DispatchError> {
            if let Ok(mut guard) = self.sends.lock() {
                guard.push(RecordedSend {
                    channel,
                    entry_id: entry.entry_id,
                    message: message.to_string(),
                });
            }

            if self.failing_channels.contains(&channel) {
                return Err(DispatchError(format!(
                    "mock failure on {}",
                    channel.as_str()
                )));
            }

            Ok(())
        }
    }
}

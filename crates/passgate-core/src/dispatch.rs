//! Delivery of notification intents, fire-and-forget.
//!
//! Delivery failures are logged and never roll back the transition that
//! produced the intent; retries are the dispatcher's business.

use crate::engine::NotificationIntent;
use crate::model::ActorId;

/// Error reported by a dispatcher for one undeliverable intent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("delivery to {recipient} failed: {reason}")]
pub struct DeliveryError {
    pub recipient: ActorId,
    pub reason: String,
}

/// Consumes notification intents and delivers them over some channel.
pub trait NotificationDispatcher {
    /// Deliver one intent.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] when the channel rejects the message; the
    /// caller logs and moves on.
    fn deliver(&self, intent: &NotificationIntent) -> Result<(), DeliveryError>;
}

/// Deliver every intent, logging failures without propagating them.
/// Returns how many intents were delivered.
pub fn dispatch_all(
    dispatcher: &dyn NotificationDispatcher,
    intents: &[NotificationIntent],
) -> usize {
    let mut delivered = 0;
    for intent in intents {
        match dispatcher.deliver(intent) {
            Ok(()) => delivered += 1,
            Err(err) => {
                tracing::warn!(
                    recipient = %err.recipient,
                    template = ?intent.template,
                    "notification delivery failed: {}",
                    err.reason
                );
            }
        }
    }
    delivered
}

/// Dispatcher that records deliveries in the log and nothing else. Useful as
/// a default for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDispatcher;

impl NotificationDispatcher for LogDispatcher {
    fn deliver(&self, intent: &NotificationIntent) -> Result<(), DeliveryError> {
        tracing::info!(
            recipient = %intent.recipient,
            template = ?intent.template,
            request = %intent.payload.request.id,
            "notification"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DeliveryError, NotificationDispatcher, dispatch_all};
    use crate::diff::EditedFields;
    use crate::engine::{NotificationIntent, Payload, Template};
    use crate::model::{ActorId, Request, RequestId, Status};
    use std::sync::Mutex;

    struct FlakyDispatcher {
        reject: ActorId,
        delivered: Mutex<Vec<ActorId>>,
    }

    impl NotificationDispatcher for FlakyDispatcher {
        fn deliver(&self, intent: &NotificationIntent) -> Result<(), DeliveryError> {
            if intent.recipient == self.reject {
                return Err(DeliveryError {
                    recipient: intent.recipient,
                    reason: "recipient unreachable".to_string(),
                });
            }
            self.delivered
                .lock()
                .expect("test dispatcher lock")
                .push(intent.recipient);
            Ok(())
        }
    }

    fn intent(recipient: ActorId) -> NotificationIntent {
        NotificationIntent::new(
            recipient,
            Template::ReviewRequested,
            Payload {
                request: Request {
                    id: RequestId(1),
                    user_id: ActorId(42),
                    operator_id: None,
                    division: None,
                    direction: None,
                    checkpoint: None,
                    date_start: None,
                    date_end: None,
                    time_start: None,
                    time_end: None,
                    car_brand: None,
                    people_count: None,
                    leader_name: None,
                    cargo: None,
                    purpose: "supply run".to_string(),
                    status: Status::New,
                    edited_fields: EditedFields::default(),
                    reason: None,
                    version: 1,
                },
                reason: None,
            },
        )
    }

    #[test]
    fn failures_do_not_stop_the_rest() {
        let dispatcher = FlakyDispatcher {
            reject: ActorId(2),
            delivered: Mutex::new(Vec::new()),
        };
        let intents = [intent(ActorId(1)), intent(ActorId(2)), intent(ActorId(3))];
        let delivered = dispatch_all(&dispatcher, &intents);
        assert_eq!(delivered, 2);
        assert_eq!(
            *dispatcher.delivered.lock().expect("test dispatcher lock"),
            vec![ActorId(1), ActorId(3)]
        );
    }
}

//! Notification-intent modeling.
//!
//! The engine never talks to a chat platform. Each transition returns a list
//! of intents — who must be told what, with a snapshot of the request taken
//! after the transition — and a dispatcher owned by the shell delivers them.
//! Intents are produced and discarded per call, never persisted.

use serde::{Deserialize, Serialize};

use crate::model::{ActorId, Request};

/// Which message the recipient should receive.
///
/// Each variant corresponds to one message the workflow sends; renderers own
/// the wording. `DuplicateReviewRequested` additionally implies an
/// operator-selection control in interactive shells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Template {
    // To administrators.
    /// A new submission awaits review.
    ReviewRequested,
    /// The submitter edited a field; the request needs a fresh review.
    EditedReviewRequested,
    /// The submitter wants the crossing run again; pick an operator.
    DuplicateReviewRequested,
    /// The assigned operator executed the crossing.
    CompletedNotice,
    /// The assigned operator executed a duplicated crossing.
    DuplicateCompletedNotice,
    /// The assigned operator declined the work order.
    OperatorCancelledNotice,
    /// The submitter withdrew the request.
    UserCancelledNotice,

    // To the submitter.
    /// The request was accepted and an operator is working it.
    Approved,
    /// The request was handed to an operator without a status change.
    HandedToOperator,
    /// The duplicated request was handed to an operator.
    DuplicateHandedToOperator,
    /// An admin needs more information; see the attached reason.
    ClarificationRequested,
    /// An admin rejected the request; see the attached reason.
    CancelledByAdmin,
    /// The crossing was executed.
    Completed,
    /// The duplicated crossing was executed.
    DuplicateCompleted,
    /// The operator declined the work order; see the attached reason.
    CancelledByOperator,

    // To the assigned operator.
    /// A request to execute, with its full snapshot.
    WorkOrder,
    /// A duplicated request to execute.
    DuplicateWorkOrder,
    /// The submitter withdrew a request assigned to you.
    UserCancelledOrder,
}

/// Data the renderer needs beyond the template choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// Snapshot of the request after the transition.
    pub request: Request,
    /// Reason text for clarification/cancellation templates.
    #[serde(default)]
    pub reason: Option<String>,
}

/// "Tell this actor this information."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationIntent {
    pub recipient: ActorId,
    pub template: Template,
    pub payload: Payload,
}

impl NotificationIntent {
    #[must_use]
    pub const fn new(recipient: ActorId, template: Template, payload: Payload) -> Self {
        Self {
            recipient,
            template,
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NotificationIntent, Payload, Template};
    use crate::diff::EditedFields;
    use crate::model::{ActorId, Request, RequestId, Status};

    fn snapshot() -> Request {
        Request {
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
        }
    }

    #[test]
    fn intents_roundtrip_through_json() {
        let intent = NotificationIntent::new(
            ActorId(1),
            Template::ReviewRequested,
            Payload {
                request: snapshot(),
                reason: None,
            },
        );
        let json = serde_json::to_string(&intent).expect("serialize");
        let back: NotificationIntent = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, intent);
    }

    #[test]
    fn template_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Template::DuplicateReviewRequested).expect("serialize"),
            "\"duplicate_review_requested\""
        );
    }
}

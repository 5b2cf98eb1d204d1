//! The request lifecycle engine.
//!
//! Owns the status state machine: which actions are legal in which status,
//! who may invoke them, and which field mutations, operator assignments, and
//! notification intents each transition produces. The engine performs no I/O
//! of its own — it reads one row, validates against that snapshot, writes the
//! new row through the store's compare-and-set, and hands the resulting
//! intents back to the caller.
//!
//! Validation order for every mutating call:
//! 1. time-window gate (`OutsideAllowedWindow`)
//! 2. actor existence, role, and block state (`Forbidden`)
//! 3. ownership for user actions (`Forbidden`)
//! 4. assignment for operator actions (`Forbidden`)
//! 5. current-state legality (`InvalidTransition`)
//! 6. required inputs: reason text, operator selection (`MissingInput`)
//!
//! Only after all six pass does the engine mutate state and emit intents.

pub mod action;
pub mod authorize;
pub mod notify;

pub use action::Action;
pub use authorize::authorize;
pub use notify::{NotificationIntent, Payload, Template};

use chrono::NaiveDateTime;

use crate::error::EngineError;
use crate::model::{
    Actor, ActorId, DraftRequest, EditableField, Request, RequestId, Role, Status,
};
use crate::store::{ActorDirectory, RequestStore};
use crate::window::AllowedWindow;

/// What a successful engine call returns: the stored row after the
/// transition and the intents the shell must hand to its dispatcher.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub request: Request,
    pub notifications: Vec<NotificationIntent>,
}

/// The lifecycle engine. Stateless between calls; sessions belong to the
/// shell, rows belong to the store.
pub struct Engine<'a, S, D> {
    store: &'a S,
    directory: &'a D,
    window: AllowedWindow,
}

impl<'a, S, D> Engine<'a, S, D>
where
    S: RequestStore,
    D: ActorDirectory,
{
    #[must_use]
    pub const fn new(store: &'a S, directory: &'a D, window: AllowedWindow) -> Self {
        Self {
            store,
            directory,
            window,
        }
    }

    /// The configured service window, for shells that render it.
    #[must_use]
    pub const fn window(&self) -> AllowedWindow {
        self.window
    }

    /// Create a request from a finished draft. The row starts in `New` and
    /// every admin is asked to review it.
    ///
    /// # Errors
    ///
    /// `OutsideAllowedWindow`, `Forbidden` (unknown/blocked/non-user actor),
    /// `MissingInput` (blank purpose), or a store failure.
    pub fn submit(
        &self,
        user: ActorId,
        draft: &DraftRequest,
        now: NaiveDateTime,
    ) -> Result<Outcome, EngineError> {
        self.check_window(now)?;
        let actor = self.lookup_actor(user, "submit")?;
        if actor.blocked || actor.role != Role::User {
            return Err(EngineError::Forbidden {
                actor: user,
                action: "submit",
            });
        }
        if draft.purpose.trim().is_empty() {
            return Err(EngineError::MissingInput {
                what: "purpose text",
            });
        }

        let stored = self.store.create(user, draft)?;
        tracing::info!(request = %stored.id, user = %user, "request submitted");

        let payload = Payload {
            request: stored.clone(),
            reason: None,
        };
        let notifications = self
            .admin_ids()?
            .into_iter()
            .map(|admin| NotificationIntent::new(admin, Template::ReviewRequested, payload.clone()))
            .collect();
        Ok(Outcome {
            request: stored,
            notifications,
        })
    }

    /// Apply one action to an existing request.
    ///
    /// Reads the current row, validates in the documented order, writes the
    /// new row against the version it read, and returns the intents to
    /// deliver. A concurrent writer surfaces as `Conflict`; the engine never
    /// retries and never blind-overwrites.
    ///
    /// # Errors
    ///
    /// Any [`EngineError`]; the request is unchanged on every error path.
    pub fn apply(
        &self,
        actor: ActorId,
        id: RequestId,
        action: &Action,
        now: NaiveDateTime,
    ) -> Result<Outcome, EngineError> {
        self.check_window(now)?;
        let actor = self.lookup_actor(actor, action.name())?;
        let row = self.store.get(id)?;
        authorize(&actor, &row, action)?;
        if !action::is_legal(row.status, row.has_operator(), action) {
            return Err(EngineError::InvalidTransition {
                status: row.status,
                action: action.name(),
            });
        }

        let prior_version = row.version;
        let prior_status = row.status;
        let prev_operator = row.operator_id;
        let mut next = row;
        let mut reason_payload = None;
        // (recipient, template) pairs; payloads are materialized from the
        // stored row once the write succeeds.
        let mut plan: Vec<(ActorId, Template)> = Vec::new();

        match action {
            Action::Approve { operator } => {
                let operator = self.required_operator(*operator)?;
                next.status = Status::InProgress;
                next.operator_id = Some(operator.id);
                // Review is complete; the dirty markers have served their
                // purpose.
                next.edited_fields.clear();
                plan.push((next.user_id, Template::Approved));
                plan.push((operator.id, Template::WorkOrder));
            }
            Action::Clarify { reason } => {
                let reason = required_reason(reason.as_deref())?;
                next.status = Status::OnClarification;
                next.reason = Some(reason.clone());
                reason_payload = Some(reason);
                plan.push((next.user_id, Template::ClarificationRequested));
            }
            Action::CancelByAdmin { reason } => {
                let reason = required_reason(reason.as_deref())?;
                next.status = Status::Cancelled;
                next.reason = Some(reason.clone());
                next.operator_id = None;
                reason_payload = Some(reason);
                plan.push((next.user_id, Template::CancelledByAdmin));
            }
            Action::EditField { field, value } => {
                let name = field.trim();
                if name.is_empty() {
                    return Err(EngineError::MissingInput { what: "field name" });
                }
                // Known fields mutate the typed record; unknown names are
                // still recorded in the edited set (accepted opaquely).
                if let Ok(parsed) = name.parse::<EditableField>() {
                    next.apply_edit(parsed, value)
                        .map_err(|_| EngineError::MissingInput {
                            what: "numeric people count",
                        })?;
                }
                next.edited_fields.merge(name);
                next.status = Status::Edited;
                for admin in self.admin_ids()? {
                    plan.push((admin, Template::EditedReviewRequested));
                }
            }
            Action::Duplicate => {
                next.status = Status::Duplicated;
                for admin in self.admin_ids()? {
                    plan.push((admin, Template::DuplicateReviewRequested));
                }
            }
            Action::AssignOperator { operator } => {
                let operator = self.required_operator(*operator)?;
                next.operator_id = Some(operator.id);
                if prior_status == Status::Duplicated {
                    plan.push((operator.id, Template::DuplicateWorkOrder));
                    plan.push((next.user_id, Template::DuplicateHandedToOperator));
                } else {
                    plan.push((operator.id, Template::WorkOrder));
                    plan.push((next.user_id, Template::HandedToOperator));
                }
            }
            Action::Complete => {
                next.status = Status::Completed;
                next.operator_id = None;
                plan.push((next.user_id, Template::Completed));
                for admin in self.admin_ids()? {
                    plan.push((admin, Template::CompletedNotice));
                }
            }
            Action::CompleteDuplicate => {
                next.status = Status::Completed;
                next.operator_id = None;
                plan.push((next.user_id, Template::DuplicateCompleted));
                for admin in self.admin_ids()? {
                    plan.push((admin, Template::DuplicateCompletedNotice));
                }
            }
            Action::CancelByOperator { reason } => {
                let reason = required_reason(reason.as_deref())?;
                next.status = Status::Cancelled;
                next.reason = Some(reason.clone());
                next.operator_id = None;
                reason_payload = Some(reason);
                plan.push((next.user_id, Template::CancelledByOperator));
                for admin in self.admin_ids()? {
                    plan.push((admin, Template::OperatorCancelledNotice));
                }
            }
            Action::CancelByUser => {
                next.status = Status::Cancelled;
                next.operator_id = None;
                for admin in self.admin_ids()? {
                    plan.push((admin, Template::UserCancelledNotice));
                }
                if let Some(operator) = prev_operator {
                    plan.push((operator, Template::UserCancelledOrder));
                }
            }
        }

        debug_assert!(
            next.operator_invariant_holds(),
            "transition must preserve the operator assignment invariant"
        );

        let stored = self.store.update(&next, prior_version)?;
        tracing::info!(
            request = %stored.id,
            actor = %actor.id,
            action = action.name(),
            from = %prior_status,
            to = %stored.status,
            "transition applied"
        );

        let payload = Payload {
            request: stored.clone(),
            reason: reason_payload,
        };
        let notifications = plan
            .into_iter()
            .map(|(recipient, template)| {
                NotificationIntent::new(recipient, template, payload.clone())
            })
            .collect();
        Ok(Outcome {
            request: stored,
            notifications,
        })
    }

    fn check_window(&self, now: NaiveDateTime) -> Result<(), EngineError> {
        if self.window.allows(now.time()) {
            Ok(())
        } else {
            Err(EngineError::OutsideAllowedWindow {
                start: self.window.start(),
                end: self.window.end(),
            })
        }
    }

    fn lookup_actor(&self, id: ActorId, action: &'static str) -> Result<Actor, EngineError> {
        self.directory
            .get_actor(id)?
            .ok_or(EngineError::Forbidden { actor: id, action })
    }

    /// Resolve a required operator selection. The selected actor must exist,
    /// carry the operator role, and not be blocked.
    fn required_operator(&self, operator: Option<ActorId>) -> Result<Actor, EngineError> {
        let missing = EngineError::MissingInput {
            what: "operator selection",
        };
        let Some(id) = operator else {
            return Err(missing);
        };
        match self.directory.get_actor(id)? {
            Some(actor) if actor.role == Role::Operator && !actor.blocked => Ok(actor),
            _ => Err(missing),
        }
    }

    fn admin_ids(&self) -> Result<Vec<ActorId>, EngineError> {
        let admins = self.directory.list_admins()?;
        if admins.is_empty() {
            tracing::warn!("no administrators in the directory; review intents will be empty");
        }
        Ok(admins.into_iter().map(|admin| admin.id).collect())
    }
}

fn required_reason(reason: Option<&str>) -> Result<String, EngineError> {
    match reason.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(EngineError::MissingInput { what: "reason text" }),
    }
}

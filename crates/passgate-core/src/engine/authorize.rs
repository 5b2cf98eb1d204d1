//! Centralized authorization for every transition.
//!
//! One function answers role, block, ownership, and assignment questions so
//! no handler carries its own ad hoc checks. Order matters and mirrors the
//! engine's validation sequence: block state, then role, then
//! ownership/assignment for the role-specific actions.

use super::action::Action;
use crate::error::EngineError;
use crate::model::{Actor, Request};

/// Allow or deny `actor` performing `action` on `request`.
///
/// # Errors
///
/// Returns [`EngineError::Forbidden`] when the actor is blocked, carries the
/// wrong role, does not own the request (user actions), or is not its
/// assigned operator (operator actions).
pub fn authorize(actor: &Actor, request: &Request, action: &Action) -> Result<(), EngineError> {
    let deny = || EngineError::Forbidden {
        actor: actor.id,
        action: action.name(),
    };

    if actor.blocked {
        return Err(deny());
    }
    if actor.role != action.required_role() {
        return Err(deny());
    }
    if action.requires_ownership() && actor.id != request.user_id {
        return Err(deny());
    }
    if action.requires_assignment() && request.operator_id != Some(actor.id) {
        return Err(deny());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::authorize;
    use crate::diff::EditedFields;
    use crate::engine::Action;
    use crate::error::EngineError;
    use crate::model::{Actor, ActorId, Request, RequestId, Role, Status};

    fn request_in_progress() -> Request {
        Request {
            id: RequestId(5),
            user_id: ActorId(42),
            operator_id: Some(ActorId(7)),
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
            purpose: "night convoy".to_string(),
            status: Status::InProgress,
            edited_fields: EditedFields::default(),
            reason: None,
            version: 3,
        }
    }

    #[test]
    fn wrong_role_is_forbidden() {
        let user = Actor::new(ActorId(42), Role::User);
        let action = Action::Approve {
            operator: Some(ActorId(7)),
        };
        let err = authorize(&user, &request_in_progress(), &action).expect_err("deny");
        assert!(matches!(err, EngineError::Forbidden { .. }));
    }

    #[test]
    fn blocked_actor_is_forbidden_even_with_right_role() {
        let mut admin = Actor::new(ActorId(1), Role::Admin);
        admin.blocked = true;
        let action = Action::Approve {
            operator: Some(ActorId(7)),
        };
        assert!(authorize(&admin, &request_in_progress(), &action).is_err());

        admin.blocked = false;
        assert!(authorize(&admin, &request_in_progress(), &action).is_ok());
    }

    #[test]
    fn user_actions_require_ownership() {
        let owner = Actor::new(ActorId(42), Role::User);
        let stranger = Actor::new(ActorId(43), Role::User);
        let request = request_in_progress();

        assert!(authorize(&owner, &request, &Action::Duplicate).is_ok());
        assert!(authorize(&stranger, &request, &Action::Duplicate).is_err());
        assert!(authorize(&stranger, &request, &Action::CancelByUser).is_err());
    }

    #[test]
    fn operator_actions_require_assignment() {
        let assigned = Actor::new(ActorId(7), Role::Operator);
        let other = Actor::new(ActorId(9), Role::Operator);
        let request = request_in_progress();

        assert!(authorize(&assigned, &request, &Action::Complete).is_ok());
        assert!(authorize(&other, &request, &Action::Complete).is_err());

        let mut unassigned = request;
        unassigned.operator_id = None;
        unassigned.status = Status::Edited;
        assert!(authorize(&assigned, &unassigned, &Action::Complete).is_err());
    }
}

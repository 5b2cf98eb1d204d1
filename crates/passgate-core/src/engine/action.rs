//! The closed set of workflow actions and the state-legality table.

use crate::model::{ActorId, Role, Status};

/// Everything an actor can ask the engine to do to an existing request.
///
/// Required inputs are carried as `Option` so that their absence is a
/// validated `MissingInput` decision rather than a shell-side panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Admin accepts the request and hands it to an operator.
    Approve { operator: Option<ActorId> },
    /// Admin sends the request back to the submitter with a reason.
    Clarify { reason: Option<String> },
    /// Admin rejects the request with a reason.
    CancelByAdmin { reason: Option<String> },
    /// Submitter changes one field; the request returns to admin attention.
    EditField { field: String, value: String },
    /// Submitter asks for the request to be run again.
    Duplicate,
    /// Admin attaches (or reattaches) an operator without changing status.
    AssignOperator { operator: Option<ActorId> },
    /// Assigned operator reports the crossing executed.
    Complete,
    /// Assigned operator reports a duplicated crossing executed.
    CompleteDuplicate,
    /// Assigned operator declines the work order with a reason.
    CancelByOperator { reason: Option<String> },
    /// Submitter withdraws the request.
    CancelByUser,
}

impl Action {
    /// Short verb used in error messages and logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Approve { .. } => "approve",
            Self::Clarify { .. } => "clarify",
            Self::CancelByAdmin { .. } => "cancel",
            Self::EditField { .. } => "edit a field",
            Self::Duplicate => "duplicate",
            Self::AssignOperator { .. } => "assign an operator",
            Self::Complete => "complete",
            Self::CompleteDuplicate => "complete a duplicate",
            Self::CancelByOperator { .. } => "cancel as operator",
            Self::CancelByUser => "withdraw",
        }
    }

    /// The single role allowed to invoke this action.
    #[must_use]
    pub const fn required_role(&self) -> Role {
        match self {
            Self::Approve { .. }
            | Self::Clarify { .. }
            | Self::CancelByAdmin { .. }
            | Self::AssignOperator { .. } => Role::Admin,
            Self::EditField { .. } | Self::Duplicate | Self::CancelByUser => Role::User,
            Self::Complete | Self::CompleteDuplicate | Self::CancelByOperator { .. } => {
                Role::Operator
            }
        }
    }

    /// User actions additionally require ownership of the request.
    #[must_use]
    pub const fn requires_ownership(&self) -> bool {
        matches!(self.required_role(), Role::User)
    }

    /// Operator actions additionally require the acting operator to be the
    /// one assigned to the request.
    #[must_use]
    pub const fn requires_assignment(&self) -> bool {
        matches!(self.required_role(), Role::Operator)
    }
}

/// Whether `action` is listed for a request in `status`, distinguishing
/// operator-attached sub-states via `has_operator`.
///
/// Terminal statuses are handled by the caller before this table is
/// consulted; they are never legal here either.
#[must_use]
pub fn is_legal(status: Status, has_operator: bool, action: &Action) -> bool {
    if status.is_terminal() {
        return false;
    }
    match action {
        // New and Edited reviews approve into InProgress; re-approving an
        // InProgress request is the supported operator-reassignment path.
        Action::Approve { .. } => {
            matches!(status, Status::New | Status::Edited | Status::InProgress)
        }
        Action::Clarify { .. } => matches!(status, Status::New),
        Action::CancelByAdmin { .. } => {
            matches!(status, Status::New | Status::Edited | Status::Duplicated)
        }
        Action::EditField { .. } | Action::Duplicate | Action::CancelByUser => true,
        Action::AssignOperator { .. } => {
            matches!(status, Status::Duplicated | Status::Edited | Status::InProgress)
        }
        Action::Complete | Action::CompleteDuplicate => match status {
            Status::InProgress => true,
            Status::Duplicated => has_operator,
            _ => false,
        },
        Action::CancelByOperator { .. } => match status {
            Status::InProgress => true,
            Status::Duplicated | Status::Edited => has_operator,
            _ => false,
        },
    }
}

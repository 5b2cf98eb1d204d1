//! Console notification dispatcher.
//!
//! Stands in for the chat channel: renders each intent as one line on
//! stdout addressed to the recipient. Wording follows the messages the
//! workflow has always sent; interactive shells replace this wholesale.

use std::io::{self, Write};

use passgate_core::dispatch::{DeliveryError, NotificationDispatcher};
use passgate_core::{NotificationIntent, Template};

/// Renders intents to stdout, one line per recipient.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleDispatcher;

fn message(intent: &NotificationIntent) -> String {
    let id = intent.payload.request.id;
    let reason = intent.payload.reason.as_deref().unwrap_or("");
    match intent.template {
        Template::ReviewRequested => format!("Request #{id} awaits review."),
        Template::EditedReviewRequested => {
            format!("Request #{id} was edited by the submitter and needs a fresh review.")
        }
        Template::DuplicateReviewRequested => {
            format!("Request #{id} should be run again; pick an operator.")
        }
        Template::CompletedNotice => format!("Request #{id} was executed by the operator."),
        Template::DuplicateCompletedNotice => {
            format!("Request #{id} was duplicated and executed by the operator.")
        }
        Template::OperatorCancelledNotice => {
            format!("Request #{id} was cancelled by the operator. Reason: {reason}")
        }
        Template::UserCancelledNotice => {
            format!("Request #{id} was withdrawn by the submitter.")
        }
        Template::Approved => {
            format!("Your request #{id} was taken into work by an operator.")
        }
        Template::HandedToOperator => format!("Your request #{id} was handed to an operator."),
        Template::DuplicateHandedToOperator => {
            format!("Your request #{id} was duplicated to an operator.")
        }
        Template::ClarificationRequested => {
            format!("Your request #{id} needs clarification. Reason: {reason}")
        }
        Template::CancelledByAdmin => {
            format!("Your request #{id} was cancelled. Reason: {reason}")
        }
        Template::Completed => format!("Your request #{id} was executed by the operator."),
        Template::DuplicateCompleted => {
            format!("Your request #{id} was duplicated and executed by the operator.")
        }
        Template::CancelledByOperator => {
            format!("Your request #{id} was cancelled by the operator. Reason: {reason}")
        }
        Template::WorkOrder => format!("Work order: request #{id}."),
        Template::DuplicateWorkOrder => format!("Duplicate work order: request #{id}."),
        Template::UserCancelledOrder => {
            format!("Request #{id} assigned to you was withdrawn by the submitter.")
        }
    }
}

impl NotificationDispatcher for ConsoleDispatcher {
    fn deliver(&self, intent: &NotificationIntent) -> Result<(), DeliveryError> {
        let stdout = io::stdout();
        let mut w = stdout.lock();
        writeln!(w, "notify {} <- {}", intent.recipient, message(intent)).map_err(|err| {
            DeliveryError {
                recipient: intent.recipient,
                reason: err.to_string(),
            }
        })
    }
}

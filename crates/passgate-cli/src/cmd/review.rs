//! Administrator review commands: approve, clarify, cancel, assign.

use clap::Args;

use passgate_core::{Action, ActorId};

use super::{Ctx, run_transition};

#[derive(Args, Debug)]
pub struct ApproveArgs {
    /// Request id.
    pub id: i64,

    /// Acting admin's actor id.
    #[arg(long)]
    pub actor: i64,

    /// Operator to hand the request to.
    #[arg(long)]
    pub operator: Option<i64>,
}

#[derive(Args, Debug)]
pub struct ClarifyArgs {
    /// Request id.
    pub id: i64,

    /// Acting admin's actor id.
    #[arg(long)]
    pub actor: i64,

    /// Why the request needs clarification.
    #[arg(long)]
    pub reason: Option<String>,
}

#[derive(Args, Debug)]
pub struct CancelArgs {
    /// Request id.
    pub id: i64,

    /// Acting admin's actor id.
    #[arg(long)]
    pub actor: i64,

    /// Why the request is cancelled.
    #[arg(long)]
    pub reason: Option<String>,
}

#[derive(Args, Debug)]
pub struct AssignArgs {
    /// Request id.
    pub id: i64,

    /// Acting admin's actor id.
    #[arg(long)]
    pub actor: i64,

    /// Operator to attach; reassigns when one is already attached.
    #[arg(long)]
    pub operator: Option<i64>,
}

pub fn run_approve(args: &ApproveArgs, ctx: &Ctx) -> anyhow::Result<()> {
    run_transition(
        ctx,
        args.actor,
        args.id,
        &Action::Approve {
            operator: args.operator.map(ActorId),
        },
    )
}

pub fn run_clarify(args: &ClarifyArgs, ctx: &Ctx) -> anyhow::Result<()> {
    run_transition(
        ctx,
        args.actor,
        args.id,
        &Action::Clarify {
            reason: args.reason.clone(),
        },
    )
}

pub fn run_cancel(args: &CancelArgs, ctx: &Ctx) -> anyhow::Result<()> {
    run_transition(
        ctx,
        args.actor,
        args.id,
        &Action::CancelByAdmin {
            reason: args.reason.clone(),
        },
    )
}

pub fn run_assign(args: &AssignArgs, ctx: &Ctx) -> anyhow::Result<()> {
    run_transition(
        ctx,
        args.actor,
        args.id,
        &Action::AssignOperator {
            operator: args.operator.map(ActorId),
        },
    )
}

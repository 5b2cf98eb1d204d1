//! Operator commands: complete, complete a duplicate, cancel, schedule view.

use std::io::Write as _;

use chrono::{Duration, NaiveDate};
use clap::Args;
use serde::Serialize;

use passgate_core::{Action, ActorId, Request, RequestStore as _};

use super::{Ctx, run_transition};
use crate::output::{render, write_request};

#[derive(Args, Debug)]
pub struct CompleteArgs {
    /// Request id.
    pub id: i64,

    /// Acting operator's actor id.
    #[arg(long)]
    pub actor: i64,
}

#[derive(Args, Debug)]
pub struct OperatorCancelArgs {
    /// Request id.
    pub id: i64,

    /// Acting operator's actor id.
    #[arg(long)]
    pub actor: i64,

    /// Why the work order is declined.
    #[arg(long)]
    pub reason: Option<String>,
}

#[derive(Args, Debug)]
pub struct ScheduleArgs {
    /// Operator whose schedule view to render.
    #[arg(long)]
    pub operator: i64,

    /// Range start, YYYY-MM-DD. Defaults to yesterday.
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Range end, YYYY-MM-DD. Defaults to tomorrow.
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct ScheduleOutput {
    ok: bool,
    from: NaiveDate,
    to: NaiveDate,
    requests: Vec<Request>,
}

pub fn run_complete(args: &CompleteArgs, ctx: &Ctx) -> anyhow::Result<()> {
    run_transition(ctx, args.actor, args.id, &Action::Complete)
}

pub fn run_complete_dup(args: &CompleteArgs, ctx: &Ctx) -> anyhow::Result<()> {
    run_transition(ctx, args.actor, args.id, &Action::CompleteDuplicate)
}

pub fn run_operator_cancel(args: &OperatorCancelArgs, ctx: &Ctx) -> anyhow::Result<()> {
    run_transition(
        ctx,
        args.actor,
        args.id,
        &Action::CancelByOperator {
            reason: args.reason.clone(),
        },
    )
}

/// The operator's working view: yesterday through tomorrow by default, the
/// way dispatch desks look at it.
pub fn run_schedule(args: &ScheduleArgs, ctx: &Ctx) -> anyhow::Result<()> {
    let today = chrono::Local::now().date_naive();
    let from = args.from.unwrap_or_else(|| today - Duration::days(1));
    let to = args.to.unwrap_or_else(|| today + Duration::days(1));

    let requests = ctx
        .store
        .list_by_operator_and_date_range(ActorId(args.operator), from, to)?;
    let result = ScheduleOutput {
        ok: true,
        from,
        to,
        requests,
    };
    render(ctx.output, &result, |r, w| {
        if r.requests.is_empty() {
            return writeln!(w, "no requests between {} and {}", r.from, r.to);
        }
        for request in &r.requests {
            write_request(w, request)?;
        }
        writeln!(w, "{} request(s)", r.requests.len())
    })
}

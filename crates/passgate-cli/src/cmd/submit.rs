//! `passgate submit` — create a request from a finished draft.

use std::io::Write as _;

use clap::Args;

use passgate_core::dispatch::dispatch_all;
use passgate_core::{ActorId, DraftRequest};

use super::{Ctx, NotificationSummary, TransitionOutput, now};
use crate::dispatch::ConsoleDispatcher;
use crate::output::{CliError, render, render_error};

#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Submitting user's actor id.
    #[arg(long)]
    pub user: i64,

    /// Purpose of the crossing; the whole message for free-form requests.
    #[arg(long)]
    pub purpose: String,

    #[arg(long)]
    pub division: Option<String>,

    #[arg(long)]
    pub direction: Option<String>,

    #[arg(long)]
    pub checkpoint: Option<String>,

    /// Start date, YYYY-MM-DD.
    #[arg(long)]
    pub date_start: Option<String>,

    /// End date, YYYY-MM-DD.
    #[arg(long)]
    pub date_end: Option<String>,

    /// Start time, HH:MM.
    #[arg(long)]
    pub time_start: Option<String>,

    /// End time, HH:MM.
    #[arg(long)]
    pub time_end: Option<String>,

    #[arg(long)]
    pub car_brand: Option<String>,

    #[arg(long)]
    pub people_count: Option<u32>,

    #[arg(long)]
    pub leader_name: Option<String>,

    #[arg(long)]
    pub cargo: Option<String>,
}

impl SubmitArgs {
    fn draft(&self) -> DraftRequest {
        DraftRequest {
            division: self.division.clone(),
            direction: self.direction.clone(),
            checkpoint: self.checkpoint.clone(),
            date_start: self.date_start.clone(),
            date_end: self.date_end.clone(),
            time_start: self.time_start.clone(),
            time_end: self.time_end.clone(),
            car_brand: self.car_brand.clone(),
            people_count: self.people_count,
            leader_name: self.leader_name.clone(),
            cargo: self.cargo.clone(),
            purpose: self.purpose.clone(),
        }
    }
}

pub fn run(args: &SubmitArgs, ctx: &Ctx) -> anyhow::Result<()> {
    let engine = ctx.engine();
    match engine.submit(ActorId(args.user), &args.draft(), now()) {
        Ok(outcome) => {
            if !ctx.output.is_json() {
                dispatch_all(&ConsoleDispatcher, &outcome.notifications);
            }
            let result = TransitionOutput {
                ok: true,
                id: outcome.request.id.0,
                status: outcome.request.status.to_string(),
                operator_id: None,
                version: outcome.request.version,
                notifications: outcome
                    .notifications
                    .iter()
                    .map(|intent| NotificationSummary {
                        recipient: intent.recipient.0,
                        template: intent.template,
                    })
                    .collect(),
            };
            render(ctx.output, &result, |r, w| {
                writeln!(w, "✓ request {} submitted ({})", r.id, r.status)
            })
        }
        Err(err) => {
            render_error(ctx.output, &CliError::from(&err))?;
            anyhow::bail!("{err}")
        }
    }
}

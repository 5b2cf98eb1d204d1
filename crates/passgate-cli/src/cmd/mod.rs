//! Command handlers. Each module owns its clap `Args` structs and a `run`
//! function; everything state-changing funnels through [`run_transition`].

pub mod actors;
pub mod init;
pub mod operator_cmds;
pub mod requests;
pub mod review;
pub mod submit;
pub mod user_cmds;

use std::io::Write as _;

use passgate_core::dispatch::dispatch_all;
use passgate_core::{Action, ActorId, AllowedWindow, Engine, RequestId, Template};
use passgate_store::SqliteStore;
use serde::Serialize;

use crate::dispatch::ConsoleDispatcher;
use crate::output::{CliError, OutputMode, render, render_error};

/// Shared command context: the opened store (also the actor directory), the
/// configured service window, and the output mode.
pub struct Ctx {
    pub store: SqliteStore,
    pub window: AllowedWindow,
    pub output: OutputMode,
}

impl Ctx {
    pub const fn engine(&self) -> Engine<'_, SqliteStore, SqliteStore> {
        Engine::new(&self.store, &self.store, self.window)
    }
}

/// The caller's local wall clock; the engine gates on its time of day.
pub fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

#[derive(Debug, Serialize)]
pub struct NotificationSummary {
    pub recipient: i64,
    pub template: Template,
}

/// JSON contract for every state-changing command.
#[derive(Debug, Serialize)]
pub struct TransitionOutput {
    pub ok: bool,
    pub id: i64,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<i64>,
    pub version: u64,
    pub notifications: Vec<NotificationSummary>,
}

/// Apply one action through the engine and render the outcome.
///
/// Human mode prints the notification lines through the console dispatcher;
/// JSON mode folds the notifications into the output object instead so
/// stdout stays a single parseable document.
pub fn run_transition(ctx: &Ctx, actor: i64, id: i64, action: &Action) -> anyhow::Result<()> {
    let engine = ctx.engine();
    match engine.apply(ActorId(actor), RequestId(id), action, now()) {
        Ok(outcome) => {
            if !ctx.output.is_json() {
                dispatch_all(&ConsoleDispatcher, &outcome.notifications);
            }
            let result = TransitionOutput {
                ok: true,
                id: outcome.request.id.0,
                status: outcome.request.status.to_string(),
                operator_id: outcome.request.operator_id.map(|op| op.0),
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
                match r.operator_id {
                    Some(op) => writeln!(w, "✓ request {}: {} (operator {op})", r.id, r.status),
                    None => writeln!(w, "✓ request {}: {}", r.id, r.status),
                }
            })
        }
        Err(err) => {
            render_error(ctx.output, &CliError::from(&err))?;
            anyhow::bail!("{err}")
        }
    }
}

//! Read-only request views: show one, list all.
//!
//! Reads bypass the engine (and therefore the service window) by design.

use std::io::Write as _;
use std::str::FromStr;

use anyhow::Context as _;
use clap::Args;
use serde::Serialize;

use passgate_core::{Request, RequestId, RequestStore as _, Status};

use super::Ctx;
use crate::output::{CliError, render, render_error, write_request};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Request id.
    pub id: i64,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only requests in this status.
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
struct ShowOutput {
    ok: bool,
    request: Request,
}

#[derive(Debug, Serialize)]
struct ListOutput {
    ok: bool,
    requests: Vec<Request>,
}

pub fn run_show(args: &ShowArgs, ctx: &Ctx) -> anyhow::Result<()> {
    match ctx.store.get(RequestId(args.id)) {
        Ok(request) => {
            let result = ShowOutput { ok: true, request };
            render(ctx.output, &result, |r, w| write_request(w, &r.request))
        }
        Err(err) => {
            let engine_err = passgate_core::EngineError::from(err.clone());
            render_error(ctx.output, &CliError::from(&engine_err))?;
            anyhow::bail!("{err}")
        }
    }
}

pub fn run_list(args: &ListArgs, ctx: &Ctx) -> anyhow::Result<()> {
    let status = args
        .status
        .as_deref()
        .map(Status::from_str)
        .transpose()
        .context("unknown status filter")?;

    let mut requests = ctx.store.list_all()?;
    if let Some(status) = status {
        requests.retain(|request| request.status == status);
    }

    let result = ListOutput { ok: true, requests };
    render(ctx.output, &result, |r, w| {
        for request in &r.requests {
            writeln!(
                w,
                "{:<6} {:<16} user {}{}",
                request.id.to_string(),
                request.status.to_string(),
                request.user_id,
                request
                    .operator_id
                    .map(|op| format!("  operator {op}"))
                    .unwrap_or_default()
            )?;
        }
        writeln!(w, "{} request(s)", r.requests.len())
    })
}

#[cfg(test)]
mod tests {
    use super::{ListArgs, ShowArgs};
    use clap::Parser;

    #[derive(Parser)]
    struct ShowWrapper {
        #[command(flatten)]
        args: ShowArgs,
    }

    #[derive(Parser)]
    struct ListWrapper {
        #[command(flatten)]
        args: ListArgs,
    }

    #[test]
    fn show_args_parse() {
        let w = ShowWrapper::parse_from(["test", "7"]);
        assert_eq!(w.args.id, 7);
    }

    #[test]
    fn list_args_parse_status_filter() {
        let w = ListWrapper::parse_from(["test", "--status", "in_progress"]);
        assert_eq!(w.args.status.as_deref(), Some("in_progress"));
    }
}

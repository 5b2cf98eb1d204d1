//! `passgate actor` — directory administration: add, promote, block.

use std::io::Write as _;
use std::str::FromStr;

use anyhow::Context as _;
use clap::{Args, Subcommand};
use serde::Serialize;

use passgate_core::{Actor, ActorId, Role};

use super::Ctx;
use crate::output::render;

#[derive(Subcommand, Debug)]
pub enum ActorCmd {
    /// Add an actor or replace its directory entry.
    Add(AddArgs),
    /// Change an actor's role.
    Role(RoleArgs),
    /// Block an actor from all actions.
    Block(IdArgs),
    /// Lift an actor's block.
    Unblock(IdArgs),
    /// List directory entries.
    List(ListArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Actor id from the chat platform.
    #[arg(long)]
    pub id: i64,

    /// Role: user, operator, or admin.
    #[arg(long, default_value = "user")]
    pub role: String,

    /// Display name.
    #[arg(long)]
    pub name: Option<String>,

    /// Platform username.
    #[arg(long)]
    pub username: Option<String>,
}

#[derive(Args, Debug)]
pub struct RoleArgs {
    /// Actor id.
    #[arg(long)]
    pub id: i64,

    /// New role: user, operator, or admin.
    #[arg(long)]
    pub role: String,
}

#[derive(Args, Debug)]
pub struct IdArgs {
    /// Actor id.
    #[arg(long)]
    pub id: i64,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only actors with this role.
    #[arg(long)]
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
struct ActorOutput {
    ok: bool,
    id: i64,
    role: Role,
    blocked: bool,
}

#[derive(Debug, Serialize)]
struct ActorListOutput {
    ok: bool,
    actors: Vec<Actor>,
}

pub fn run(cmd: &ActorCmd, ctx: &Ctx) -> anyhow::Result<()> {
    match cmd {
        ActorCmd::Add(args) => add(args, ctx),
        ActorCmd::Role(args) => set_role(args, ctx),
        ActorCmd::Block(args) => set_blocked(args, ctx, true),
        ActorCmd::Unblock(args) => set_blocked(args, ctx, false),
        ActorCmd::List(args) => list(args, ctx),
    }
}

fn parse_role(raw: &str) -> anyhow::Result<Role> {
    Role::from_str(raw).with_context(|| format!("unknown role '{raw}' (user|operator|admin)"))
}

fn lookup(ctx: &Ctx, id: ActorId) -> anyhow::Result<Actor> {
    use passgate_core::ActorDirectory as _;
    ctx.store
        .get_actor(id)?
        .with_context(|| format!("actor {id} is not in the directory"))
}

fn render_actor(ctx: &Ctx, actor: &Actor, verb: &str) -> anyhow::Result<()> {
    let result = ActorOutput {
        ok: true,
        id: actor.id.0,
        role: actor.role,
        blocked: actor.blocked,
    };
    let verb = verb.to_string();
    render(ctx.output, &result, move |r, w| {
        writeln!(w, "✓ actor {}: {verb} ({})", r.id, r.role)
    })
}

fn add(args: &AddArgs, ctx: &Ctx) -> anyhow::Result<()> {
    let actor = Actor {
        id: ActorId(args.id),
        username: args.username.clone(),
        full_name: args.name.clone(),
        role: parse_role(&args.role)?,
        blocked: false,
    };
    ctx.store.upsert_actor(&actor)?;
    render_actor(ctx, &actor, "added")
}

fn set_role(args: &RoleArgs, ctx: &Ctx) -> anyhow::Result<()> {
    let role = parse_role(&args.role)?;
    let id = ActorId(args.id);
    if !ctx.store.set_actor_role(id, role)? {
        anyhow::bail!("actor {id} is not in the directory");
    }
    let actor = lookup(ctx, id)?;
    render_actor(ctx, &actor, "role changed")
}

fn set_blocked(args: &IdArgs, ctx: &Ctx, blocked: bool) -> anyhow::Result<()> {
    let id = ActorId(args.id);
    if !ctx.store.set_actor_blocked(id, blocked)? {
        anyhow::bail!("actor {id} is not in the directory");
    }
    let actor = lookup(ctx, id)?;
    render_actor(ctx, &actor, if blocked { "blocked" } else { "unblocked" })
}

fn list(args: &ListArgs, ctx: &Ctx) -> anyhow::Result<()> {
    use passgate_core::ActorDirectory as _;
    let actors = match args.role.as_deref() {
        None => ctx.store.list_actors()?,
        Some(raw) => match parse_role(raw)? {
            Role::Operator => ctx.store.list_operators()?,
            Role::Admin => ctx.store.list_admins()?,
            Role::User => ctx
                .store
                .list_actors()?
                .into_iter()
                .filter(|actor| actor.role == Role::User)
                .collect(),
        },
    };
    let result = ActorListOutput { ok: true, actors };
    render(ctx.output, &result, |r, w| {
        for actor in &r.actors {
            writeln!(
                w,
                "{:<12} {:<9} {}{}",
                actor.id,
                actor.role.to_string(),
                actor.full_name.as_deref().unwrap_or("-"),
                if actor.blocked { "  [blocked]" } else { "" }
            )?;
        }
        writeln!(w, "{} actor(s)", r.actors.len())
    })
}

#[cfg(test)]
mod tests {
    use super::{AddArgs, parse_role};
    use clap::Parser;
    use passgate_core::Role;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: AddArgs,
    }

    #[test]
    fn add_args_parse() {
        let w = Wrapper::parse_from(["test", "--id", "7", "--role", "operator"]);
        assert_eq!(w.args.id, 7);
        assert_eq!(w.args.role, "operator");
        assert!(w.args.name.is_none());
    }

    #[test]
    fn role_parsing_rejects_unknown() {
        assert_eq!(parse_role("admin").expect("known"), Role::Admin);
        assert!(parse_role("root").is_err());
    }
}

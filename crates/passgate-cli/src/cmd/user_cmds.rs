//! Submitter commands: edit a field, duplicate, withdraw.

use clap::Args;

use passgate_core::Action;

use super::{Ctx, run_transition};

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Request id.
    pub id: i64,

    /// Acting submitter's actor id.
    #[arg(long)]
    pub actor: i64,

    /// Field name (division, checkpoint, date_start, ..., purpose).
    #[arg(long)]
    pub field: String,

    /// New value; empty clears the field.
    #[arg(long, default_value = "")]
    pub value: String,
}

#[derive(Args, Debug)]
pub struct DuplicateArgs {
    /// Request id.
    pub id: i64,

    /// Acting submitter's actor id.
    #[arg(long)]
    pub actor: i64,
}

#[derive(Args, Debug)]
pub struct UserCancelArgs {
    /// Request id.
    pub id: i64,

    /// Acting submitter's actor id.
    #[arg(long)]
    pub actor: i64,
}

pub fn run_edit(args: &EditArgs, ctx: &Ctx) -> anyhow::Result<()> {
    run_transition(
        ctx,
        args.actor,
        args.id,
        &Action::EditField {
            field: args.field.clone(),
            value: args.value.clone(),
        },
    )
}

pub fn run_duplicate(args: &DuplicateArgs, ctx: &Ctx) -> anyhow::Result<()> {
    run_transition(ctx, args.actor, args.id, &Action::Duplicate)
}

pub fn run_user_cancel(args: &UserCancelArgs, ctx: &Ctx) -> anyhow::Result<()> {
    run_transition(ctx, args.actor, args.id, &Action::CancelByUser)
}

#[cfg(test)]
mod tests {
    use super::EditArgs;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: EditArgs,
    }

    #[test]
    fn edit_args_parse() {
        let w = Wrapper::parse_from([
            "test",
            "7",
            "--actor",
            "42",
            "--field",
            "checkpoint",
            "--value",
            "south gate",
        ]);
        assert_eq!(w.args.id, 7);
        assert_eq!(w.args.field, "checkpoint");
        assert_eq!(w.args.value, "south gate");
    }

    #[test]
    fn edit_value_defaults_to_empty_for_clearing() {
        let w = Wrapper::parse_from(["test", "7", "--actor", "42", "--field", "cargo"]);
        assert_eq!(w.args.value, "");
    }
}

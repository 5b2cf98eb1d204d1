#![forbid(unsafe_code)]

mod cmd;
mod dispatch;
mod output;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use passgate_core::config::{self, Config};
use passgate_store::SqliteStore;

use cmd::Ctx;
use output::OutputMode;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "passgate: approval workflow for checkpoint-crossing requests",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Path to the configuration file (default: ./passgate.toml, then the
    /// user config directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the store database path.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    const fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize the store and write a default config.
    Init(cmd::init::InitArgs),

    /// Manage the actor directory.
    #[command(subcommand)]
    Actor(cmd::actors::ActorCmd),

    /// Submit a new request as a user.
    Submit(cmd::submit::SubmitArgs),

    /// Show one request.
    Show(cmd::requests::ShowArgs),

    /// List requests.
    List(cmd::requests::ListArgs),

    /// Operator schedule view (yesterday through tomorrow by default).
    Schedule(cmd::operator_cmds::ScheduleArgs),

    /// Approve a request and hand it to an operator (admin).
    Approve(cmd::review::ApproveArgs),

    /// Send a request back for clarification (admin).
    Clarify(cmd::review::ClarifyArgs),

    /// Cancel a request with a reason (admin).
    Cancel(cmd::review::CancelArgs),

    /// Attach or reattach an operator without a status change (admin).
    Assign(cmd::review::AssignArgs),

    /// Edit one field of your request (submitter).
    Edit(cmd::user_cmds::EditArgs),

    /// Ask for your request to be run again (submitter).
    Duplicate(cmd::user_cmds::DuplicateArgs),

    /// Report the crossing executed (assigned operator).
    Complete(cmd::operator_cmds::CompleteArgs),

    /// Report a duplicated crossing executed (assigned operator).
    CompleteDup(cmd::operator_cmds::CompleteArgs),

    /// Decline the work order with a reason (assigned operator).
    OperatorCancel(cmd::operator_cmds::OperatorCancelArgs),

    /// Withdraw your request (submitter).
    UserCancel(cmd::user_cmds::UserCancelArgs),
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("PASSGATE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolution order: `--config`, then `./passgate.toml`, then the user
/// config directory, then built-in defaults.
fn resolve_config(explicit: Option<&Path>) -> anyhow::Result<(Config, PathBuf)> {
    if let Some(path) = explicit {
        return Ok((config::load_config(path)?, path.to_path_buf()));
    }
    let local = PathBuf::from("passgate.toml");
    if local.exists() {
        return Ok((config::load_config(&local)?, local));
    }
    Ok((config::load_user_config()?, local))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (config, config_path) = resolve_config(cli.config.as_deref())?;
    let db_path = cli.db.clone().unwrap_or_else(|| config.store.path.clone());
    let window = config.window.allowed_window().context("invalid [window] config")?;
    tracing::debug!(
        config = %config_path.display(),
        db = %db_path.display(),
        "resolved configuration"
    );

    let ctx = Ctx {
        store: SqliteStore::open(&db_path)?,
        window,
        output: cli.output_mode(),
    };

    match &cli.command {
        Commands::Init(args) => cmd::init::run(args, &ctx, &config_path, &db_path),
        Commands::Actor(sub) => cmd::actors::run(sub, &ctx),
        Commands::Submit(args) => cmd::submit::run(args, &ctx),
        Commands::Show(args) => cmd::requests::run_show(args, &ctx),
        Commands::List(args) => cmd::requests::run_list(args, &ctx),
        Commands::Schedule(args) => cmd::operator_cmds::run_schedule(args, &ctx),
        Commands::Approve(args) => cmd::review::run_approve(args, &ctx),
        Commands::Clarify(args) => cmd::review::run_clarify(args, &ctx),
        Commands::Cancel(args) => cmd::review::run_cancel(args, &ctx),
        Commands::Assign(args) => cmd::review::run_assign(args, &ctx),
        Commands::Edit(args) => cmd::user_cmds::run_edit(args, &ctx),
        Commands::Duplicate(args) => cmd::user_cmds::run_duplicate(args, &ctx),
        Commands::Complete(args) => cmd::operator_cmds::run_complete(args, &ctx),
        Commands::CompleteDup(args) => cmd::operator_cmds::run_complete_dup(args, &ctx),
        Commands::OperatorCancel(args) => cmd::operator_cmds::run_operator_cancel(args, &ctx),
        Commands::UserCancel(args) => cmd::user_cmds::run_user_cancel(args, &ctx),
    }
}

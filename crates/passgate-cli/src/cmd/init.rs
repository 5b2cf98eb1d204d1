//! `passgate init` — create the config file and the store database.

use std::io::Write as _;
use std::path::Path;

use clap::Args;
use serde::Serialize;

use super::Ctx;
use crate::output::render;

#[derive(Args, Debug)]
pub struct InitArgs {}

#[derive(Debug, Serialize)]
struct InitOutput {
    ok: bool,
    db: String,
    config: String,
    config_created: bool,
}

/// Write a default `passgate.toml` when none exists; the store database was
/// already created (and migrated) when the context opened it.
pub fn run(
    _args: &InitArgs,
    ctx: &Ctx,
    config_path: &Path,
    db_path: &Path,
) -> anyhow::Result<()> {
    let config_created = if config_path.exists() {
        false
    } else {
        let default = toml::to_string_pretty(&passgate_core::config::Config::default())?;
        std::fs::write(config_path, default)?;
        true
    };

    let result = InitOutput {
        ok: true,
        db: db_path.display().to_string(),
        config: config_path.display().to_string(),
        config_created,
    };
    render(ctx.output, &result, |r, w| {
        writeln!(w, "✓ store ready at {}", r.db)?;
        if r.config_created {
            writeln!(w, "✓ wrote default config to {}", r.config)
        } else {
            writeln!(w, "✓ using existing config at {}", r.config)
        }
    })
}

// src/cli/mod.rs

//! The `cmdline` binary: loads a declared command tree and parses the trailing arguments
//! against it.

use crate::{
    core::{command::Command, config_loader},
    system::logger::{ConsoleLogger, Logger},
};
use anyhow::Result;
use clap::Parser;
use colored::*;
use std::{
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicU8, Ordering},
    },
};

/// cmdline: run an argument list through a command tree declared in TOML.
#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// The TOML file declaring the command tree.
    #[arg(long, short)]
    pub config: PathBuf,

    /// The command label reported as `command` / `$0`.
    #[arg(long, default_value = "app")]
    pub name: String,

    /// The arguments to parse. Put them after `--` when they start with a dash.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl Cli {
    /// The invocation sequence handed to the tree: program, label, then the arguments.
    pub fn invocation(&self) -> Vec<String> {
        let mut argv = vec![env!("CARGO_PKG_NAME").to_string(), self.name.clone()];
        argv.extend(self.args.iter().cloned());
        argv
    }
}

/// Exit code when a handler failed or no action matched.
pub const EXIT_FAILURE: u8 = 1;
/// Exit code when the arguments themselves were rejected.
pub const EXIT_USAGE: u8 = 2;

/// Runs the CLI against the console and returns the process exit code: `0` on success,
/// [`EXIT_USAGE`] when any parse error was reported, [`EXIT_FAILURE`] for other errors.
pub async fn run(cli: Cli) -> Result<u8> {
    run_with(cli, ConsoleLogger).await
}

/// Same as [`run`], printing through `logger`.
pub async fn run_with<L>(cli: Cli, logger: L) -> Result<u8>
where
    L: Logger + Clone + 'static,
{
    log::debug!("CLI args parsed: {:?}", cli);
    let config = config_loader::read_config(&cli.config)?;

    let exit_code = Arc::new(AtomicU8::new(0));
    let root = Command::new();
    let code = Arc::clone(&exit_code);
    let sink = logger.clone();
    root.console(logger).error(move |err| {
        let severity = if err.is_parse_error() { EXIT_USAGE } else { EXIT_FAILURE };
        code.fetch_max(severity, Ordering::SeqCst);
        sink.error(&format!("{}: {}", "Error".red().bold(), err));
    });
    config_loader::apply(&root, &config)?;

    root.ready(&cli.invocation()).await?;
    Ok(exit_code.load(Ordering::SeqCst))
}

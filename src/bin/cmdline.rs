// src/bin/cmdline.rs

use clap::Parser;
use cmdline::cli::{self, Cli};
use colored::*;

/// Sets up logging, parses the binary's own flags and runs the declared tree.
/// Exits with 2 on rejected arguments and 1 on any other error.
#[tokio::main]
async fn main() {
    env_logger::init();

    match cli::run(Cli::parse()).await {
        Ok(0) => {}
        Ok(code) => std::process::exit(i32::from(code)),
        Err(e) => {
            eprintln!("\n{}: {}", "Error".red().bold(), e);
            std::process::exit(i32::from(cli::EXIT_FAILURE));
        }
    }
}

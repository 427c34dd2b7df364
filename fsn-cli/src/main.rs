// SPDX-License-Identifier: AGPL-3.0-or-later
//! fsnative CLI
//!
//! Inspect and change file metadata, symlinks and protected secrets from
//! the command line.

mod commands;

use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fsn")]
#[command(author, version, about = "fsnative - file metadata, links and secure blobs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show packed attributes of one or more paths
    Stat {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Describe a symlink itself instead of its target
        #[arg(short = 'n', long)]
        no_follow: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the file type code of a path
    #[command(name = "type")]
    Kind {
        path: PathBuf,

        /// Describe a symlink itself instead of its target
        #[arg(short = 'n', long)]
        no_follow: bool,
    },

    /// Toggle write and execute bits for owner, group and other
    #[command(group(ArgGroup::new("write").args(["writable", "readonly"])))]
    #[command(group(ArgGroup::new("exec").args(["executable", "no_executable"])))]
    Chmod {
        path: PathBuf,

        /// Add write permission
        #[arg(short, long)]
        writable: bool,

        /// Remove write permission
        #[arg(short, long)]
        readonly: bool,

        /// Add execute permission
        #[arg(short = 'x', long)]
        executable: bool,

        /// Remove execute permission
        #[arg(short = 'X', long)]
        no_executable: bool,
    },

    /// Create a symbolic link
    Ln {
        /// Text the link points at
        target: PathBuf,

        /// Link to create
        link: PathBuf,
    },

    /// Print the target of a symbolic link
    Readlink { link: PathBuf },

    /// Follow a chain of links to the regular file at its end
    Resolve { path: PathBuf },

    /// Check whether the current user may execute a file
    Executable { path: PathBuf },

    /// Show what this platform supports
    Platform,

    /// Protect a secret read from stdin and print the blob as hex
    Protect,

    /// Recover a secret from a hex blob
    Unprotect { blob: String },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("FSN_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Stat { paths, no_follow, json } => commands::stat(&paths, !no_follow, json),
        Commands::Kind { path, no_follow } => commands::kind(&path, !no_follow),
        Commands::Chmod {
            path,
            writable,
            readonly,
            executable,
            no_executable,
        } => {
            let write = (writable || readonly).then_some(writable);
            let exec = (executable || no_executable).then_some(executable);
            commands::chmod(&path, write, exec)
        }
        Commands::Ln { target, link } => commands::ln(&target, &link),
        Commands::Readlink { link } => commands::readlink(&link),
        Commands::Resolve { path } => commands::resolve(&path),
        Commands::Executable { path } => commands::executable(&path),
        Commands::Platform => commands::platform(),
        Commands::Protect => commands::protect(),
        Commands::Unprotect { blob } => commands::unprotect(&blob),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

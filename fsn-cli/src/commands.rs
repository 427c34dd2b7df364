// SPDX-License-Identifier: AGPL-3.0-or-later
//! CLI command implementations

use console::style;
use fsn_core::{
    link,
    mode::{self, ModeChange, ModeOutcome},
    stat, FileAttributes, FileKind, NativeError, PlatformCapabilities,
};
use serde::Serialize;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};
use thiserror::Error;
use tracing::warn;

/// Errors surfaced to the terminal
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Native(#[from] NativeError),

    #[error("Invalid blob: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Nothing to change: pass --writable/--readonly and/or --executable/--no-executable")]
    NoModeChange,
}

pub type CliResult<T> = Result<T, CliError>;

/// Format entry kind
fn format_kind(kind: FileKind) -> String {
    match kind {
        FileKind::Directory => style("d").cyan().to_string(),
        FileKind::File => "-".to_string(),
        FileKind::Symlink => style("l").magenta().to_string(),
        FileKind::Other => "?".to_string(),
        FileKind::Error => style("!").red().to_string(),
    }
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Permissions")]
    perms: String,
    #[tabled(rename = "Owner")]
    uid: String,
    #[tabled(rename = "Group")]
    gid: String,
    #[tabled(rename = "Packed")]
    packed: String,
    #[tabled(rename = "Path")]
    path: String,
}

impl StatRow {
    fn new(path: &Path, attrs: &FileAttributes) -> Self {
        let ids = |id: u32| if attrs.kind.is_error() { "-".to_string() } else { id.to_string() };
        Self {
            kind: format_kind(attrs.kind),
            perms: attrs.permissions.to_string(),
            uid: ids(attrs.uid),
            gid: ids(attrs.gid),
            packed: format!("{:#06x}", attrs.pack()),
            path: path.display().to_string(),
        }
    }
}

#[derive(Serialize)]
struct StatJson<'a> {
    path: &'a Path,
    packed: i32,
    #[serde(flatten)]
    attributes: FileAttributes,
}

/// Collect attributes, recording failed paths as the error kind.
fn collect_attributes(paths: &[PathBuf], follow_links: bool) -> (Vec<FileAttributes>, bool) {
    let mut all_ok = true;
    let attrs = paths
        .iter()
        .map(|path| {
            stat::attributes(path, follow_links).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "stat failed");
                all_ok = false;
                FileAttributes::failed()
            })
        })
        .collect();
    (attrs, all_ok)
}

/// Show packed attributes
pub fn stat(paths: &[PathBuf], follow_links: bool, json: bool) -> CliResult<bool> {
    let (attrs, all_ok) = collect_attributes(paths, follow_links);

    if json {
        let entries: Vec<StatJson<'_>> = paths
            .iter()
            .zip(&attrs)
            .map(|(path, attributes)| StatJson {
                path,
                packed: attributes.pack(),
                attributes: *attributes,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        let rows: Vec<StatRow> = paths.iter().zip(&attrs).map(|(p, a)| StatRow::new(p, a)).collect();
        println!("{}", Table::new(rows));
    }

    Ok(all_ok)
}

/// Print the type code and name
pub fn kind(path: &Path, follow_links: bool) -> CliResult<bool> {
    let kind = stat::file_kind(path, follow_links)?;
    println!("{} {}", kind.code(), kind);
    Ok(true)
}

pub fn chmod(path: &Path, writable: Option<bool>, executable: Option<bool>) -> CliResult<bool> {
    let change = ModeChange { writable, executable };
    if change.is_noop() {
        return Err(CliError::NoModeChange);
    }

    match mode::change_mode(path, change)? {
        ModeOutcome::Unchanged { mode } => {
            println!("{} unchanged ({:o})", path.display(), mode);
        }
        ModeOutcome::Changed { from, to } => {
            println!("{}: {:o} -> {}", path.display(), from, style(format!("{to:o}")).green());
        }
    }
    Ok(true)
}

pub fn ln(target: &Path, link_path: &Path) -> CliResult<bool> {
    link::create_link(target, link_path)?;
    println!("{} -> {}", link_path.display(), target.display());
    Ok(true)
}

pub fn readlink(link_path: &Path) -> CliResult<bool> {
    println!("{}", link::read_link_target(link_path)?.display());
    Ok(true)
}

pub fn resolve(path: &Path) -> CliResult<bool> {
    println!("{}", link::resolve_link_chain(path)?.display());
    Ok(true)
}

/// Exit status reflects the answer
pub fn executable(path: &Path) -> CliResult<bool> {
    let executable = stat::is_executable(path)?;
    println!("{}", if executable { style("yes").green() } else { style("no").red() });
    Ok(executable)
}

pub fn platform() -> CliResult<bool> {
    let caps = PlatformCapabilities::detect();
    let flag = |on: bool| if on { style("yes").green() } else { style("no").red() };
    println!("  POSIX metadata: {}", flag(caps.posix_metadata));
    println!("  Symlinks:       {}", flag(caps.symlinks));
    println!("  Secure blobs:   {}", flag(caps.secure_blob));
    Ok(true)
}

/// Read the secret as the first line of stdin.
fn read_secret(input: impl BufRead) -> CliResult<String> {
    let mut line = String::new();
    let mut input = input;
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub fn protect() -> CliResult<bool> {
    let secret = read_secret(io::stdin().lock())?;
    let blob = fsn_secure::protect(&secret)?;
    println!("{}", hex::encode(blob));
    Ok(true)
}

pub fn unprotect(blob: &str) -> CliResult<bool> {
    let blob = hex::decode(blob.trim())?;
    println!("{}", fsn_secure::unprotect(&blob)?);
    Ok(true)
}

//! Command-line interface definitions for the `cinder-volumes` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::{Args, Parser, ValueEnum};

/// Top-level CLI for the `cinder-volumes` binary.
#[derive(Debug, Parser)]
#[command(
    name = "cinder-volumes",
    about = "List and manage OpenStack Block Storage v3 volumes",
    arg_required_else_help = true
)]
pub(crate) enum Cli {
    /// List volumes with details, following every page.
    #[command(name = "list", about = "List volumes with details")]
    List(ListCommand),
    /// Show one volume.
    #[command(name = "show", about = "Show one volume")]
    Show(ShowCommand),
    /// Create a volume.
    #[command(name = "create", about = "Create a volume")]
    Create(CreateCommand),
    /// Update a volume's name, description, or metadata.
    #[command(name = "update", about = "Update a volume's name, description, or metadata")]
    Update(UpdateCommand),
    /// Delete a volume.
    #[command(name = "delete", about = "Delete a volume")]
    Delete(DeleteCommand),
    /// Wait until a volume reaches a status.
    #[command(name = "wait", about = "Wait until a volume reaches a status")]
    Wait(WaitCommand),
}

/// Sort direction accepted by `list --sort-dir`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum SortDirArg {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

/// Arguments for `cinder-volumes list`.
#[derive(Debug, Args)]
pub(crate) struct ListCommand {
    /// Only volumes with this name.
    #[arg(long)]
    pub(crate) name: Option<String>,
    /// Only volumes in this status (for example `available`).
    #[arg(long)]
    pub(crate) status: Option<String>,
    /// Include volumes of every project (requires admin rights).
    #[arg(long)]
    pub(crate) all_tenants: bool,
    /// Only volumes carrying this metadata pair; repeatable.
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub(crate) metadata: Vec<(String, String)>,
    /// Maximum number of volumes per page.
    #[arg(long)]
    pub(crate) limit: Option<u32>,
    /// Attribute to sort by.
    #[arg(long)]
    pub(crate) sort_key: Option<String>,
    /// Sort direction.
    #[arg(long, value_enum)]
    pub(crate) sort_dir: Option<SortDirArg>,
}

/// Arguments for `cinder-volumes show`.
#[derive(Debug, Args)]
pub(crate) struct ShowCommand {
    /// Volume identifier.
    pub(crate) id: String,
}

/// Arguments for `cinder-volumes create`.
#[derive(Debug, Args)]
pub(crate) struct CreateCommand {
    /// Size in GiB; required unless a source is given.
    #[arg(long)]
    pub(crate) size: Option<u64>,
    /// Display name.
    #[arg(long)]
    pub(crate) name: Option<String>,
    /// Display description.
    #[arg(long)]
    pub(crate) description: Option<String>,
    /// Volume type.
    #[arg(long)]
    pub(crate) volume_type: Option<String>,
    /// Availability zone.
    #[arg(long)]
    pub(crate) availability_zone: Option<String>,
    /// Restore from this backup.
    #[arg(long)]
    pub(crate) backup_id: Option<String>,
    /// Create from this snapshot.
    #[arg(long)]
    pub(crate) snapshot_id: Option<String>,
    /// Clone this volume.
    #[arg(long = "source-volid")]
    pub(crate) source_vol_id: Option<String>,
    /// Write this image onto the volume.
    #[arg(long)]
    pub(crate) image_id: Option<String>,
    /// Allow attaching to several instances.
    #[arg(long)]
    pub(crate) multiattach: bool,
    /// Metadata pair; repeatable.
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub(crate) metadata: Vec<(String, String)>,
}

/// Arguments for `cinder-volumes update`.
#[derive(Debug, Args)]
pub(crate) struct UpdateCommand {
    /// Volume identifier.
    pub(crate) id: String,
    /// New name; pass an empty string to clear it.
    #[arg(long)]
    pub(crate) name: Option<String>,
    /// New description; pass an empty string to clear it.
    #[arg(long)]
    pub(crate) description: Option<String>,
    /// Replacement metadata pair; repeatable.
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub(crate) metadata: Vec<(String, String)>,
}

/// Arguments for `cinder-volumes delete`.
#[derive(Debug, Args)]
pub(crate) struct DeleteCommand {
    /// Volume identifier.
    pub(crate) id: String,
    /// Delete the volume's snapshots too.
    #[arg(long)]
    pub(crate) cascade: bool,
}

/// Arguments for `cinder-volumes wait`.
#[derive(Debug, Args)]
pub(crate) struct WaitCommand {
    /// Volume identifier.
    pub(crate) id: String,
    /// Status to wait for (for example `available`).
    pub(crate) status: String,
    /// Give up after this many seconds.
    #[arg(long, default_value_t = 300)]
    pub(crate) timeout_secs: u64,
    /// Seconds between polls.
    #[arg(long, default_value_t = 2)]
    pub(crate) interval_secs: u64,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_owned(), value.to_owned())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

//! Binary entry point for the `cinder-volumes` CLI.

mod cli;

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::process;
use std::time::Duration;

use clap::Parser;
use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cinder_volumes::volumes::{
    self, CreateOpts, DeleteOpts, ListOpts, SortDir, UpdateOpts, WaitOptions,
};
use cinder_volumes::{
    BlockStorageConfig, HttpTransport, ServiceClient, VolumeError, VolumeStatus,
};

use cli::{
    Cli, CreateCommand, DeleteCommand, ListCommand, SortDirArg, UpdateCommand, WaitCommand,
};

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("volume request failed: {0}")]
    Volume(#[from] VolumeError),
    #[error("failed to write output: {0}")]
    Output(String),
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let cancel = cancel_on_interrupt();
    let exit_code = match dispatch(cli, &cancel).await {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

fn cancel_on_interrupt() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, cancelling request");
            trigger.cancel();
        }
    });
    cancel
}

fn connect() -> Result<ServiceClient<HttpTransport>, CliError> {
    let config =
        BlockStorageConfig::load_without_cli_args().map_err(|err| CliError::Config(err.to_string()))?;
    ServiceClient::from_config(&config).map_err(config_failure)
}

fn config_failure(err: VolumeError) -> CliError {
    match err {
        VolumeError::Config(message) => CliError::Config(message),
        other => CliError::Volume(other),
    }
}

async fn dispatch(cli: Cli, cancel: &CancellationToken) -> Result<(), CliError> {
    let client = connect()?;
    match cli {
        Cli::List(args) => {
            let page = volumes::list(&client, &list_opts(args))?
                .all_pages(cancel)
                .await?;
            print_json(&volumes::extract_volumes(&page)?)
        }
        Cli::Show(args) => {
            let volume = volumes::get(&client, cancel, &args.id).await?.extract()?;
            print_json(&volume)
        }
        Cli::Create(args) => {
            let volume = volumes::create(&client, cancel, &create_opts(args), None)
                .await?
                .extract()?;
            print_json(&volume)
        }
        Cli::Update(args) => {
            let id = args.id.clone();
            let volume = volumes::update(&client, cancel, &id, &update_opts(args))
                .await?
                .extract()?;
            print_json(&volume)
        }
        Cli::Delete(args) => delete_volume(&client, cancel, &args).await,
        Cli::Wait(args) => {
            let (status, options) = wait_target(&args);
            let volume =
                volumes::wait_for_status(&client, cancel, &args.id, &status, &options).await?;
            print_json(&volume)
        }
    }
}

async fn delete_volume(
    client: &ServiceClient<HttpTransport>,
    cancel: &CancellationToken,
    args: &DeleteCommand,
) -> Result<(), CliError> {
    let opts = DeleteOpts {
        cascade: args.cascade,
    };
    volumes::delete(client, cancel, &args.id, &opts).await?;
    info!(volume_id = %args.id, "delete accepted");
    Ok(())
}

fn list_opts(args: ListCommand) -> ListOpts {
    ListOpts {
        all_tenants: args.all_tenants,
        metadata: args.metadata.into_iter().collect(),
        name: args.name,
        status: args.status.map(VolumeStatus::from),
        sort_key: args.sort_key,
        sort_dir: args.sort_dir.map(|dir| match dir {
            SortDirArg::Asc => SortDir::Asc,
            SortDirArg::Desc => SortDir::Desc,
        }),
        limit: args.limit,
        ..ListOpts::default()
    }
}

fn create_opts(args: CreateCommand) -> CreateOpts {
    CreateOpts {
        size: args.size,
        name: args.name.unwrap_or_default(),
        description: args.description.unwrap_or_default(),
        volume_type: args.volume_type.unwrap_or_default(),
        availability_zone: args.availability_zone.unwrap_or_default(),
        snapshot_id: args.snapshot_id.unwrap_or_default(),
        source_vol_id: args.source_vol_id.unwrap_or_default(),
        backup_id: args.backup_id.unwrap_or_default(),
        image_id: args.image_id.unwrap_or_default(),
        metadata: args.metadata.into_iter().collect(),
        multiattach: args.multiattach,
        ..CreateOpts::default()
    }
}

fn update_opts(args: UpdateCommand) -> UpdateOpts {
    let metadata: BTreeMap<String, String> = args.metadata.into_iter().collect();
    UpdateOpts {
        name: args.name,
        description: args.description,
        metadata: (!metadata.is_empty()).then_some(metadata),
    }
}

fn wait_target(args: &WaitCommand) -> (VolumeStatus, WaitOptions) {
    let options = WaitOptions {
        poll_interval: Duration::from_secs(args.interval_secs),
        timeout: Duration::from_secs(args.timeout_secs),
    };
    (VolumeStatus::from(args.status.as_str()), options)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    write_json(io::stdout().lock(), value)
}

fn write_json<T: Serialize>(mut target: impl Write, value: &T) -> Result<(), CliError> {
    let rendered =
        serde_json::to_string_pretty(value).map_err(|err| CliError::Output(err.to_string()))?;
    writeln!(target, "{rendered}").map_err(|err| CliError::Output(err.to_string()))
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}

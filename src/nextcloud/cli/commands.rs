//! # CLI Commands
//!
//! - `run()`: parses arguments, sets up logging and dispatches
//! - `init_context()`: validates the connection settings and builds the
//!   `AppContext` every handler receives
//! - `handle_*()`: call the API facade and print the result
//!
//! Nothing here keeps global state: the context is built once per
//! invocation and passed down explicitly.

use super::render::{print_messages, render_created_share, render_share_list};
use super::setup::{
    print_grouped_help, Cli, Commands, FileCommands, GroupFolderAction, ShareAction,
    SharingCommands,
};
use clap::Parser;
use env_logger::Env;
use log::debug;
use nextcloud::api::CloudApi;
use nextcloud::commands::share::ShareKind;
use nextcloud::commands::upload::UploadStrategy;
use nextcloud::config::ClientConfig;
use nextcloud::error::Result;
use nextcloud::store::client::NextcloudClient;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

struct AppContext {
    api: CloudApi<NextcloudClient>,
    json: bool,
}

pub fn run() -> Result<()> {
    let mut cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(command) = cli.command.take() else {
        print_grouped_help();
        return Ok(());
    };

    let ctx = init_context(&cli)?;

    match command {
        Commands::Files(cmd) => match cmd {
            FileCommands::Upload {
                path,
                fail_fast,
                files,
            } => {
                let strategy = if fail_fast {
                    UploadStrategy::FailFast
                } else {
                    UploadStrategy::BestEffort
                };
                handle_upload(&ctx, files, path, strategy)
            }
            FileCommands::UploadDir { pattern, dest } => handle_upload_dir(&ctx, &pattern, &dest),
            FileCommands::Mkdir { path } => handle_mkdir(&ctx, &path),
            FileCommands::Rm { path } => handle_rm(&ctx, &path),
            FileCommands::Download { remote, output } => handle_download(&ctx, &remote, output),
            FileCommands::Exists { path } => handle_exists(&ctx, &path),
        },
        Commands::Sharing(cmd) => match cmd {
            SharingCommands::Share { action } => match action {
                ShareAction::Drop { path } => handle_create_share(&ctx, &path, ShareKind::FileDrop),
                ShareAction::ReadOnly { path } => {
                    handle_create_share(&ctx, &path, ShareKind::ReadOnly)
                }
                ShareAction::List { path } => handle_list_shares(&ctx, &path),
                ShareAction::Delete { id } => handle_delete_share(&ctx, id),
            },
            SharingCommands::GroupFolder { action } => match action {
                GroupFolderAction::Create {
                    mount_point,
                    groups,
                    permissions,
                } => handle_group_folder(&ctx, &mount_point, &groups, permissions),
            },
        },
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let config = ClientConfig::new(
        cli.url.clone().unwrap_or_default(),
        cli.username.clone().unwrap_or_default(),
        cli.password.clone().unwrap_or_default(),
    )
    .with_timeout(cli.timeout.map(Duration::from_secs))
    .with_error_detection(cli.error_detection.into());

    let client = NextcloudClient::from_config(&config)?;
    debug!("using {} as {}", client.base_url(), client.username());

    let cwd = std::env::current_dir()?;
    Ok(AppContext {
        api: CloudApi::new(client, cwd),
        json: cli.json,
    })
}

fn handle_upload(
    ctx: &AppContext,
    files: Vec<PathBuf>,
    target: Option<String>,
    strategy: UploadStrategy,
) -> Result<()> {
    let result = ctx.api.upload(&files, target.as_deref(), strategy)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_upload_dir(ctx: &AppContext, pattern: &str, dest: &str) -> Result<()> {
    let result = ctx.api.upload_pattern(pattern, dest)?;
    for path in &result.uploaded {
        println!("{}", path.display());
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_mkdir(ctx: &AppContext, path: &str) -> Result<()> {
    let result = ctx.api.mkdir(path)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_rm(ctx: &AppContext, path: &str) -> Result<()> {
    let result = ctx.api.delete(path)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_download(ctx: &AppContext, remote: &str, output: Option<PathBuf>) -> Result<()> {
    let result = ctx.api.download(remote, output.as_deref())?;
    if let Some(data) = &result.data {
        let mut stdout = io::stdout().lock();
        stdout.write_all(data)?;
        stdout.flush()?;
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_exists(ctx: &AppContext, path: &str) -> Result<()> {
    let result = ctx.api.exists(path)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_create_share(ctx: &AppContext, path: &str, kind: ShareKind) -> Result<()> {
    let result = ctx.api.create_share(path, kind)?;
    if let Some(share) = &result.share {
        print!("{}", render_created_share(share, ctx.json)?);
    }
    if !ctx.json {
        print_messages(&result.messages);
    }
    Ok(())
}

fn handle_list_shares(ctx: &AppContext, path: &str) -> Result<()> {
    let result = ctx.api.list_shares(path)?;
    if let Some(share) = &result.share {
        print!("{}", render_share_list(share, ctx.json)?);
    }
    if !ctx.json {
        print_messages(&result.messages);
    }
    Ok(())
}

fn handle_delete_share(ctx: &AppContext, id: u64) -> Result<()> {
    let result = ctx.api.delete_share(id)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_group_folder(
    ctx: &AppContext,
    mount_point: &str,
    groups: &[String],
    permissions: Option<u32>,
) -> Result<()> {
    let result = ctx.api.create_group_folder(mount_point, groups, permissions)?;
    if ctx.json {
        if let Some(folder) = &result.share {
            print!("{}", render_created_share(folder, true)?);
        }
    } else {
        print_messages(&result.messages);
    }
    Ok(())
}

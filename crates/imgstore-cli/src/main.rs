use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use imgstore_core::{ErrorKind, GatewayBuilder, GatewayConfig, GatewayError, ImageGateway, ImageInfo};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(author, version, about = "Admission-controlled local image store", long_about = None)]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    /// Default log level (RUST_LOG overrides)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct StoreArgs {
    /// Storage root directory
    #[arg(long, env = "IMGSTORE_ROOT", default_value = imgstore_core::config::DEFAULT_ROOT_DIR, global = true)]
    root: PathBuf,

    /// Extension appended on upload (no leading dot)
    #[arg(long, env = "IMGSTORE_EXTENSION", default_value = imgstore_core::config::DEFAULT_EXTENSION, global = true)]
    ext: String,

    /// Concurrent uploads + single-image reads
    #[arg(long, env = "IMGSTORE_UPLOAD_READ_LIMIT", default_value_t = imgstore_core::config::DEFAULT_UPLOAD_READ_LIMIT, global = true)]
    upload_read_limit: usize,

    /// Concurrent listings
    #[arg(long, env = "IMGSTORE_LIST_LIMIT", default_value_t = imgstore_core::config::DEFAULT_LIST_LIMIT, global = true)]
    list_limit: usize,

    /// Create the storage root if it does not exist
    #[arg(long, global = true)]
    create_root: bool,
}

impl StoreArgs {
    fn to_config(&self) -> GatewayConfig {
        GatewayConfig {
            upload_read_limit: self.upload_read_limit,
            list_limit: self.list_limit,
            root_dir: self.root.clone(),
            extension: self.ext.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Store a file under <IDENTIFIER>.<ext>
    Upload { identifier: String, file: PathBuf },
    /// List every file in the storage root
    List,
    /// Fetch a stored file by its full name (e.g. cat.jpg)
    Get {
        name: String,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Show admission budgets
    Status,
}

#[derive(Serialize)]
struct ListedImage {
    name: String,
    creation_date: String,
    modification_date: String,
}

impl From<&ImageInfo> for ListedImage {
    fn from(info: &ImageInfo) -> Self {
        Self {
            name: info.name.clone(),
            creation_date: info.creation_display(),
            modification_date: info.modification_display(),
        }
    }
}

fn exit_code(kind: ErrorKind) -> ExitCode {
    match kind {
        ErrorKind::Internal => ExitCode::from(1),
        ErrorKind::NotFound => ExitCode::from(2),
        ErrorKind::Cancelled => ExitCode::from(130),
    }
}

async fn run(gateway: &ImageGateway, command: Commands, cancel: &CancellationToken) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Upload { identifier, file } => {
            let bytes = tokio::fs::read(&file).await?;
            let name = gateway.upload(&identifier, &bytes, cancel).await?;
            println!("{name}");
        }
        Commands::List => {
            let images = gateway.list_images(cancel).await?;
            let listed: Vec<ListedImage> = images.iter().map(ListedImage::from).collect();
            println!("{}", serde_json::to_string_pretty(&listed)?);
        }
        Commands::Get { name, out } => {
            let bytes = gateway.get_image(&name, cancel).await?;
            match out {
                Some(path) => tokio::fs::write(&path, &bytes).await?,
                None => {
                    let mut stdout = tokio::io::stdout();
                    stdout.write_all(&bytes).await?;
                    stdout.flush().await?;
                }
            }
        }
        Commands::Status => {
            println!("{}", serde_json::to_string_pretty(&gateway.status())?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let level: tracing::Level = cli.log_level.parse().unwrap_or(tracing::Level::INFO);

    // stdout はコマンド出力用、ログは stderr へ
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::from_level(level).into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    if cli.store.create_root
        && let Err(e) = std::fs::create_dir_all(&cli.store.root)
    {
        eprintln!("cannot create {}: {e}", cli.store.root.display());
        return ExitCode::FAILURE;
    }

    let gateway = match GatewayBuilder::from_config(cli.store.to_config()).build() {
        Ok(gateway) => gateway,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(root = %cli.store.root.display(), ext = %cli.store.ext, "image store ready");

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received, cancelling request");
                cancel.cancel();
            }
        }
    });

    match run(&gateway, cli.command, &cancel).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            match e.downcast_ref::<GatewayError>() {
                Some(gw) => exit_code(gw.kind()),
                None => ExitCode::FAILURE,
            }
        }
    }
}

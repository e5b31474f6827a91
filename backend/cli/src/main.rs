mod config_cmd;
mod context;
mod documents_cmd;
mod scan_cmd;
mod sign_cmd;
mod terminal_output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use uuid::Uuid;

use scanflow_logging::init_logger;

use context::Context;

#[derive(Parser)]
#[command(name = "scanflow")]
#[command(about = "ScanFlow: AI document scanner")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.scanflow/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze an image and store it as a document
    Scan {
        /// JPEG, PNG, WebP or GIF file
        image: PathBuf,
    },
    /// List stored documents, newest first
    List,
    /// Show one document
    Show { id: Uuid },
    /// Attach a signature drawn from recorded strokes
    Sign {
        id: Uuid,
        /// Strokes as inline JSON or a JSON file: [[{"x":..,"y":..}, ...], ...]
        #[arg(long)]
        strokes: String,
        /// Also write the signature PNG here
        #[arg(long)]
        png: Option<PathBuf>,
    },
    /// Delete a document
    Delete { id: Uuid },
    /// Print a printable text view of a document
    Export {
        id: Uuid,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Show the effective configuration
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let ctx = match Context::load(cli.config.as_deref()).await {
        Ok(ctx) => ctx,
        Err(e) => {
            init_logger(None, "info", false);
            return Err(e);
        }
    };

    let logging = ctx.config.logging();
    init_logger(logging.dir.as_deref(), logging.level(), logging.json());

    match cli.command {
        Commands::Scan { image } => scan_cmd::run(&ctx, &image).await?,
        Commands::List => documents_cmd::list(&ctx).await?,
        Commands::Show { id } => documents_cmd::show(&ctx, id).await?,
        Commands::Sign { id, strokes, png } => {
            sign_cmd::run(&ctx, id, &strokes, png.as_deref()).await?
        }
        Commands::Delete { id } => documents_cmd::delete(&ctx, id).await?,
        Commands::Export { id, out } => documents_cmd::export(&ctx, id, out.as_deref()).await?,
        Commands::Config { init: true } => config_cmd::init(&ctx).await?,
        Commands::Config { init: false } => config_cmd::show(&ctx).await?,
    }

    Ok(())
}

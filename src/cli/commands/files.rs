use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::cli::context::AppContext;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::files::Delivery;

#[derive(Subcommand)]
pub enum FileCommands {
    #[command(about = "Resolve a file URL, using the cache when possible")]
    Url {
        #[arg(help = "File ID")]
        id: Uuid,
        #[arg(long, help = "Issue a time-limited signed URL")]
        signed: bool,
        #[arg(long, default_value = "storage", help = "storage or network")]
        via: Delivery,
    },

    #[command(about = "Drop every cached URL for a file")]
    Invalidate {
        #[arg(help = "File ID")]
        id: Uuid,
    },

    #[command(about = "Drop cached URLs for the file a URL points at")]
    InvalidateUrl {
        #[arg(help = "Previously issued file URL")]
        url: String,
    },
}

pub async fn handle(cmd: FileCommands, ctx: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    if matches!(cmd, FileCommands::Invalidate { .. } | FileCommands::InvalidateUrl { .. }) {
        ctx.require_shared_cache()?;
    }
    let urls = ctx.file_urls().await?;

    match cmd {
        FileCommands::Url { id, signed, via } => {
            let url = urls.resolve_url(id, signed, via).await?;
            match output_format {
                OutputFormat::Json => output_success(&output_format, "Resolved file URL", Some(json!({ "id": id, "url": url }))),
                OutputFormat::Text => {
                    println!("{}", url);
                    Ok(())
                }
            }
        }
        FileCommands::Invalidate { id } => {
            urls.invalidate(id).await?;
            output_success(&output_format, &format!("Invalidated cached URLs for {}", id), Some(json!({ "id": id })))
        }
        FileCommands::InvalidateUrl { url } => {
            let id = urls.invalidate_by_url(&url).await?;
            output_success(&output_format, &format!("Invalidated cached URLs for {}", id), Some(json!({ "id": id })))
        }
    }
}

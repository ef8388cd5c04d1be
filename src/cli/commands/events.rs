use chrono::{DateTime, Utc};
use clap::Subcommand;
use uuid::Uuid;

use super::PageArgs;
use crate::cli::context::AppContext;
use crate::cli::utils::{output_item, output_page};
use crate::cli::OutputFormat;
use crate::services::{EventFilter, EventService};

#[derive(Subcommand)]
pub enum EventCommands {
    #[command(about = "List events in start order")]
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long, help = "Title contains")]
        title: Option<String>,
        #[arg(long, help = "Starting at or after (RFC 3339)")]
        from: Option<DateTime<Utc>>,
        #[arg(long, help = "Ending at or before (RFC 3339)")]
        to: Option<DateTime<Utc>>,
    },

    #[command(about = "Show one event with its image URL")]
    Show {
        #[arg(help = "Event ID")]
        id: Uuid,
    },
}

pub async fn handle(cmd: EventCommands, ctx: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        EventCommands::List { page, title, from, to } => {
            let request = ctx.page_request(page.page, page.limit)?;
            let filter = EventFilter { title, start_date: from, end_date: to };
            let result = EventService::new(ctx.pool.clone())
                .list(request, &filter)
                .await?;

            output_page(&output_format, "events", &result, |e| {
                format!("{}  {}  {}", e.id, e.start_date_time.format("%Y-%m-%d %H:%M"), e.title)
            })
        }
        EventCommands::Show { id } => {
            let detail = EventService::new(ctx.pool.clone())
                .get_detail(id, &ctx.file_urls().await?)
                .await?;

            output_item(&output_format, &detail, |d| {
                let mut lines = vec![
                    format!("{} ({})", d.event.title, d.event.id),
                    format!("Starts: {}", d.event.start_date_time),
                    format!("Ends:   {}", d.event.end_date_time),
                ];
                if let Some(location) = &d.event.location {
                    lines.push(format!("Where:  {}", location));
                }
                if let Some(url) = &d.image_url {
                    lines.push(format!("Image:  {}", url));
                }
                lines.join("\n")
            })
        }
    }
}

use chrono::{DateTime, Utc};
use clap::Subcommand;
use uuid::Uuid;

use super::PageArgs;
use crate::cli::context::AppContext;
use crate::cli::utils::{output_item, output_page};
use crate::cli::OutputFormat;
use crate::services::{SermonFilter, SermonService};

#[derive(Subcommand)]
pub enum SermonCommands {
    #[command(about = "List sermons, newest first")]
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long, help = "Preacher name contains")]
        preacher: Option<String>,
        #[arg(long, help = "Title contains")]
        title: Option<String>,
        #[arg(long, help = "Exact preaching date (RFC 3339)")]
        date: Option<DateTime<Utc>>,
    },

    #[command(about = "Show one sermon")]
    Show {
        #[arg(help = "Sermon ID")]
        id: Uuid,
    },
}

pub async fn handle(cmd: SermonCommands, ctx: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        SermonCommands::List { page, preacher, title, date } => {
            let request = ctx.page_request(page.page, page.limit)?;
            let filter = SermonFilter { preacher, title, date_preached: date };
            let result = SermonService::new(ctx.pool.clone()).list(request, &filter).await?;

            output_page(&output_format, "sermons", &result, |s| {
                format!("{}  {}  {}  {}", s.id, s.date_preached.format("%Y-%m-%d"), s.preacher, s.title)
            })
        }
        SermonCommands::Show { id } => {
            let sermon = SermonService::new(ctx.pool.clone()).get(id).await?;

            output_item(&output_format, &sermon, |s| {
                let mut lines = vec![
                    format!("{} ({})", s.title, s.id),
                    format!("Preacher: {}", s.preacher),
                    format!("Preached: {}", s.date_preached.format("%Y-%m-%d")),
                ];
                if let Some(scripture) = &s.scripture_text {
                    lines.push(format!("Scripture: {}", scripture));
                }
                if let Some(description) = &s.description {
                    lines.push(String::new());
                    lines.push(description.clone());
                }
                lines.join("\n")
            })
        }
    }
}

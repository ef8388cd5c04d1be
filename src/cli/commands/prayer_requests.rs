use clap::Subcommand;
use uuid::Uuid;

use super::PageArgs;
use crate::cli::context::AppContext;
use crate::cli::utils::{output_item, output_page};
use crate::cli::OutputFormat;
use crate::services::{PrayerRequestFilter, PrayerRequestService};

#[derive(Subcommand)]
pub enum PrayerRequestCommands {
    #[command(about = "List prayer requests, newest first")]
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long, help = "Only answered (true) or open (false) requests")]
        answered: Option<bool>,
    },

    #[command(about = "Show one prayer request")]
    Show {
        #[arg(help = "Prayer request ID")]
        id: Uuid,
    },
}

pub async fn handle(cmd: PrayerRequestCommands, ctx: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        PrayerRequestCommands::List { page, answered } => {
            let request = ctx.page_request(page.page, page.limit)?;
            let filter = PrayerRequestFilter { is_answered: answered };
            let result = PrayerRequestService::new(ctx.pool.clone()).list(request, &filter).await?;

            output_page(&output_format, "prayer requests", &result, |p| {
                let status = if p.is_answered { "answered" } else { "open" };
                format!("{}  [{}]  {}", p.id, status, p.title)
            })
        }
        PrayerRequestCommands::Show { id } => {
            let prayer_request = PrayerRequestService::new(ctx.pool.clone()).get(id).await?;

            output_item(&output_format, &prayer_request, |p| {
                let status = if p.is_answered { "answered" } else { "open" };
                format!("{} ({}) [{}]\n\n{}", p.title, p.id, status, p.content)
            })
        }
    }
}

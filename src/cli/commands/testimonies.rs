use clap::Subcommand;
use uuid::Uuid;

use super::PageArgs;
use crate::cli::context::AppContext;
use crate::cli::utils::{output_item, output_page};
use crate::cli::OutputFormat;
use crate::services::{TestimonyFilter, TestimonyService};

#[derive(Subcommand)]
pub enum TestimonyCommands {
    #[command(about = "List testimonies, newest first")]
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long, help = "Only approved (true) or pending (false) testimonies")]
        approved: Option<bool>,
    },

    #[command(about = "Show one testimony")]
    Show {
        #[arg(help = "Testimony ID")]
        id: Uuid,
    },
}

pub async fn handle(cmd: TestimonyCommands, ctx: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TestimonyCommands::List { page, approved } => {
            let request = ctx.page_request(page.page, page.limit)?;
            let filter = TestimonyFilter { is_approved: approved };
            let result = TestimonyService::new(ctx.pool.clone()).list(request, &filter).await?;

            output_page(&output_format, "testimonies", &result, |t| {
                let status = if t.is_approved { "approved" } else { "pending" };
                format!("{}  [{}]  {}", t.id, status, t.title)
            })
        }
        TestimonyCommands::Show { id } => {
            let testimony = TestimonyService::new(ctx.pool.clone()).get(id).await?;

            output_item(&output_format, &testimony, |t| {
                let status = if t.is_approved { "approved" } else { "pending" };
                format!("{} ({}) [{}]\n\n{}", t.title, t.id, status, t.content)
            })
        }
    }
}

use clap::Subcommand;

use super::PageArgs;
use crate::cli::context::AppContext;
use crate::cli::utils::output_page;
use crate::cli::OutputFormat;
use crate::services::{DepartmentFilter, DepartmentService};

#[derive(Subcommand)]
pub enum DepartmentCommands {
    #[command(about = "List departments with their members")]
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long, help = "Department name contains")]
        name: Option<String>,
    },
}

pub async fn handle(cmd: DepartmentCommands, ctx: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        DepartmentCommands::List { page, name } => {
            let request = ctx.page_request(page.page, page.limit)?;
            let result = DepartmentService::new(ctx.pool.clone())
                .list(request, &DepartmentFilter { name })
                .await?;

            output_page(&output_format, "departments", &result, |d| {
                format!("{}  {}  ({} members)", d.department.id, d.department.name, d.members.len())
            })
        }
    }
}

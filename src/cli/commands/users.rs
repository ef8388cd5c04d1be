use chrono::{DateTime, Utc};
use clap::Subcommand;
use uuid::Uuid;

use super::PageArgs;
use crate::cli::context::AppContext;
use crate::cli::utils::{output_item, output_page};
use crate::cli::OutputFormat;
use crate::services::{UserFilter, UserService};

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "List users, newest first")]
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long, help = "First or last name contains")]
        name: Option<String>,
        #[arg(long, help = "Email contains")]
        email: Option<String>,
        #[arg(long, help = "Joined at or after (RFC 3339)")]
        from: Option<DateTime<Utc>>,
        #[arg(long, help = "Joined at or before (RFC 3339)")]
        to: Option<DateTime<Utc>>,
    },

    #[command(about = "Show a user profile with its image URL")]
    Show {
        #[arg(help = "User ID")]
        id: Uuid,
    },
}

pub async fn handle(cmd: UserCommands, ctx: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        UserCommands::List { page, name, email, from, to } => {
            let request = ctx.page_request(page.page, page.limit)?;
            let filter = UserFilter { name, email, date_from: from, date_to: to };
            let result = UserService::new(ctx.pool.clone())
                .list(request, &filter)
                .await?;

            output_page(&output_format, "users", &result, |u| {
                format!("{}  {} {}  <{}>  {}", u.id, u.first_name, u.last_name, u.email, u.role)
            })
        }
        UserCommands::Show { id } => {
            let profile = UserService::new(ctx.pool.clone())
                .get_profile(id, &ctx.file_urls().await?)
                .await?;

            output_item(&output_format, &profile, |p| {
                let mut lines = vec![
                    format!("{} {} ({})", p.user.first_name, p.user.last_name, p.user.id),
                    format!("Email: {}", p.user.email),
                    format!("Role:  {}", p.user.role),
                ];
                if let Some(url) = &p.profile_image_url {
                    lines.push(format!("Image: {}", url));
                }
                lines.join("\n")
            })
        }
    }
}

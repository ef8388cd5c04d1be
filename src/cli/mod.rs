pub mod commands;
pub mod context;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::config;
use context::AppContext;

#[derive(Parser)]
#[command(name = "church-connect")]
#[command(about = "Church Connect - paginated listings and file URL cache maintenance")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Sermon archive")]
    Sermons {
        #[command(subcommand)]
        cmd: commands::sermons::SermonCommands,
    },

    #[command(about = "Church events")]
    Events {
        #[command(subcommand)]
        cmd: commands::events::EventCommands,
    },

    #[command(about = "Prayer requests")]
    PrayerRequests {
        #[command(subcommand)]
        cmd: commands::prayer_requests::PrayerRequestCommands,
    },

    #[command(about = "Member testimonies")]
    Testimonies {
        #[command(subcommand)]
        cmd: commands::testimonies::TestimonyCommands,
    },

    #[command(about = "Departments and their members")]
    Departments {
        #[command(subcommand)]
        cmd: commands::departments::DepartmentCommands,
    },

    #[command(about = "Member accounts")]
    Users {
        #[command(subcommand)]
        cmd: commands::users::UserCommands,
    },

    #[command(about = "File URL resolution and cache invalidation")]
    Files {
        #[command(subcommand)]
        cmd: commands::files::FileCommands,
    },

    #[command(about = "Check database connectivity")]
    Health,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let ctx = AppContext::connect(config()).await?;

    match cli.command {
        Commands::Sermons { cmd } => commands::sermons::handle(cmd, &ctx, output_format).await,
        Commands::Events { cmd } => commands::events::handle(cmd, &ctx, output_format).await,
        Commands::PrayerRequests { cmd } => commands::prayer_requests::handle(cmd, &ctx, output_format).await,
        Commands::Testimonies { cmd } => commands::testimonies::handle(cmd, &ctx, output_format).await,
        Commands::Departments { cmd } => commands::departments::handle(cmd, &ctx, output_format).await,
        Commands::Users { cmd } => commands::users::handle(cmd, &ctx, output_format).await,
        Commands::Files { cmd } => commands::files::handle(cmd, &ctx, output_format).await,
        Commands::Health => commands::health::handle(&ctx, output_format).await,
    }
}

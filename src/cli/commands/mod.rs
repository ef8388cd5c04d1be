pub mod departments;
pub mod events;
pub mod files;
pub mod health;
pub mod prayer_requests;
pub mod sermons;
pub mod testimonies;
pub mod users;

use clap::Args;

/// `--page`/`--limit`; missing values fall back to the pagination config.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct PageArgs {
    #[arg(long, help = "Page number, starting at 1")]
    pub page: Option<u64>,
    #[arg(long, help = "Records per page")]
    pub limit: Option<u64>,
}

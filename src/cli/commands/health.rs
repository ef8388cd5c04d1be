use serde_json::json;

use crate::cli::context::AppContext;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::Database;
use crate::error::ServiceError;

pub async fn handle(ctx: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    Database::health_check(&ctx.pool).await.map_err(ServiceError::from)?;
    output_success(
        &output_format,
        "Database reachable",
        Some(json!({
            "status": "ok",
            "environment": ctx.config.environment,
            "timestamp": chrono::Utc::now(),
        })),
    )
}

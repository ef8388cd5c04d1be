use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::File;
use crate::database::PgTable;
use crate::error::ServiceError;
use crate::pagination::{FindManyArgs, PageSource};
use crate::query::Where;

/// Maps file ids to storage keys and back.
#[async_trait]
pub trait FileLookup: Send + Sync {
    /// Fails with `NotFound` when no such file exists.
    async fn storage_key(&self, file_id: Uuid) -> Result<String, ServiceError>;

    async fn file_id_for_key(&self, key: &str) -> Result<Option<Uuid>, ServiceError>;
}

/// Reads the `files` table.
pub struct PgFileLookup {
    files: PgTable<File>,
}

impl PgFileLookup {
    pub fn new(pool: PgPool) -> Self {
        Self {
            files: PgTable::new(File::TABLE, pool),
        }
    }
}

#[async_trait]
impl FileLookup for PgFileLookup {
    async fn storage_key(&self, file_id: Uuid) -> Result<String, ServiceError> {
        match self.files.find_by_id(file_id, None).await? {
            Some(file) => Ok(file.key),
            None => Err(ServiceError::not_found("File not found")),
        }
    }

    async fn file_id_for_key(&self, key: &str) -> Result<Option<Uuid>, ServiceError> {
        let args = FindManyArgs {
            where_clause: Some(Where::eq("key", key)),
            take: 1,
            ..Default::default()
        };
        let rows = self.files.find_many(args).await?;
        Ok(rows.into_iter().next().map(|file| file.id))
    }
}

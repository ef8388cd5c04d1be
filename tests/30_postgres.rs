use anyhow::Result;
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

use church_connect_api::config::DatabaseConfig;
use church_connect_api::database::models::File;
use church_connect_api::database::{Database, PgCacheStore, PgTable};
use church_connect_api::files::{CacheStore, FileLookup, PgFileLookup};
use church_connect_api::pagination::{paginate, PageRequest};
use church_connect_api::query::{OrderBy, QuerySpec, Where};

// These tests run against DATABASE_URL and are skipped when it is not set.
// A single connection keeps the temporary `files` table visible to every query.
async fn pool() -> Result<Option<PgPool>> {
    let _ = dotenvy::dotenv();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping");
        return Ok(None);
    };
    let config = DatabaseConfig { url: Some(url), max_connections: 1, connection_timeout_secs: 5 };
    Ok(Some(Database::connect(&config).await?))
}

async fn temp_files(pool: &PgPool, keys: &[&str]) -> Result<Vec<Uuid>> {
    sqlx::query(
        "CREATE TEMP TABLE files (
            id UUID PRIMARY KEY,
            key TEXT NOT NULL,
            name TEXT NOT NULL,
            content_type TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    )
    .execute(pool)
    .await?;

    let mut ids = Vec::new();
    for (i, key) in keys.iter().enumerate() {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO files (id, key, name, content_type, created_at) VALUES ($1, $2, $3, 'image/png', now() + make_interval(secs => $4))")
            .bind(id)
            .bind(*key)
            .bind(format!("file-{}", i))
            .bind(i as f64)
            .execute(pool)
            .await?;
        ids.push(id);
    }
    Ok(ids)
}

#[tokio::test]
async fn table_source_paginates_with_filter_and_order() -> Result<()> {
    let Some(pool) = pool().await? else { return Ok(()) };
    temp_files(&pool, &["a/1.png", "a/2.png", "a/3.png", "b/1.png"]).await?;

    let files: PgTable<File> = PgTable::new(File::TABLE, pool.clone());
    let spec = QuerySpec::new()
        .filter(Some(Where::icontains("key", "a/")))
        .order_by(OrderBy::desc("created_at"));
    let page = paginate(&files, PageRequest::new(1, 2)?, spec).await?;

    assert_eq!(page.meta.total, 3);
    assert_eq!(page.meta.last_page, 2);
    assert_eq!(page.data.iter().map(|f| f.key.as_str()).collect::<Vec<_>>(), vec!["a/3.png", "a/2.png"]);
    Ok(())
}

#[tokio::test]
async fn file_lookup_maps_ids_and_keys() -> Result<()> {
    let Some(pool) = pool().await? else { return Ok(()) };
    let ids = temp_files(&pool, &["events/banner.png"]).await?;
    let lookup = PgFileLookup::new(pool.clone());

    assert_eq!(lookup.storage_key(ids[0]).await?, "events/banner.png");
    assert_eq!(lookup.file_id_for_key("events/banner.png").await?, Some(ids[0]));
    assert!(lookup.storage_key(Uuid::new_v4()).await.unwrap_err().is_not_found());
    Ok(())
}

#[tokio::test]
async fn pg_cache_store_honours_expiry() -> Result<()> {
    let Some(pool) = pool().await? else { return Ok(()) };
    let store = PgCacheStore::new(pool);
    store.ensure_schema().await?;

    let key = format!("file:{}:true:false", Uuid::new_v4());
    store.set(&key, "https://one", Duration::from_secs(60)).await?;
    store.set(&key, "https://two", Duration::from_secs(60)).await?;
    assert_eq!(store.get(&key).await?.as_deref(), Some("https://two"));

    store.delete(&key).await?;
    assert_eq!(store.get(&key).await?, None);

    store.set(&key, "https://short", Duration::from_secs(1)).await?;
    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert_eq!(store.get(&key).await?, None);
    store.purge_expired().await?;
    Ok(())
}

#[tokio::test]
async fn page_beyond_bigint_offset_is_empty() -> Result<()> {
    let Some(pool) = pool().await? else { return Ok(()) };
    temp_files(&pool, &["a/1.png", "a/2.png"]).await?;

    let files: PgTable<File> = PgTable::new(File::TABLE, pool.clone());
    let page = paginate(&files, PageRequest::new(1_000_000_000_000_000_000, 10)?, QuerySpec::new()).await?;
    assert!(page.data.is_empty());
    assert_eq!(page.meta.total, 2);
    assert_eq!(page.meta.next, None);

    // a limit past the bigint range still renders a valid LIMIT
    let page = paginate(&files, PageRequest::new(1, u64::MAX)?, QuerySpec::new()).await?;
    assert_eq!(page.data.len(), 2);
    Ok(())
}

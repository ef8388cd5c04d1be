mod common;

use anyhow::Result;
use std::sync::atomic::Ordering;
use std::time::Duration;
use uuid::Uuid;

use church_connect_api::files::{CacheStore, Delivery, FileUrlSettings, UrlCacheKey};
use common::{harness, harness_with, CountingGenerator, StaticLookup};

fn sermon_audio() -> (Uuid, StaticLookup) {
    let id = Uuid::new_v4();
    (id, StaticLookup::with(&[(id, "sermons/2024/easter.mp3")]))
}

#[tokio::test(start_paused = true)]
async fn signed_delivery_url_is_served_from_cache_within_ttl() -> Result<()> {
    let (id, lookup) = sermon_audio();
    let h = harness(lookup, CountingGenerator::default());

    let first = h.cache.resolve_url(id, true, Delivery::Network).await?;
    tokio::time::advance(Duration::from_secs(599)).await;
    let second = h.cache.resolve_url(id, true, Delivery::Network).await?;

    assert_eq!(first, second);
    assert_eq!(h.generator.delivery_signed.load(Ordering::SeqCst), 1);
    assert_eq!(h.lookup.calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn expired_entry_is_regenerated_and_repopulated() -> Result<()> {
    let (id, lookup) = sermon_audio();
    let h = harness(lookup, CountingGenerator::default());

    let first = h.cache.resolve_url(id, true, Delivery::Network).await?;
    tokio::time::advance(Duration::from_secs(600)).await;
    let second = h.cache.resolve_url(id, true, Delivery::Network).await?;

    assert_ne!(first, second);
    assert_eq!(h.generator.delivery_signed.load(Ordering::SeqCst), 2);

    let key = UrlCacheKey::new(id, true, Delivery::Network).to_string();
    assert_eq!(h.store.get(&key).await?, Some(second));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn presigned_storage_url_is_cached_for_ninety_percent_of_expiry() -> Result<()> {
    let (id, lookup) = sermon_audio();
    let h = harness(lookup, CountingGenerator::default());

    let first = h.cache.resolve_url(id, true, Delivery::Storage).await?;
    assert_eq!(*h.generator.last_expiry.lock().unwrap(), Some(Duration::from_secs(3600)));

    tokio::time::advance(Duration::from_secs(3239)).await;
    assert_eq!(h.cache.resolve_url(id, true, Delivery::Storage).await?, first);
    assert_eq!(h.generator.storage_signed.load(Ordering::SeqCst), 1);

    tokio::time::advance(Duration::from_secs(1)).await;
    h.cache.resolve_url(id, true, Delivery::Storage).await?;
    assert_eq!(h.generator.storage_signed.load(Ordering::SeqCst), 2);
    Ok(())
}

#[tokio::test]
async fn each_combination_uses_exactly_one_generation_path() -> Result<()> {
    let (id, lookup) = sermon_audio();
    let h = harness(lookup, CountingGenerator::default());

    let storage = h.cache.resolve_url(id, false, Delivery::Storage).await?;
    let network = h.cache.resolve_url(id, false, Delivery::Network).await?;
    assert_eq!(storage, "https://media.s3.test/sermons/2024/easter.mp3");
    assert_eq!(network, "https://cdn.test/sermons/2024/easter.mp3");
    assert_eq!(h.generator.stable.load(Ordering::SeqCst), 2);

    h.cache.resolve_url(id, true, Delivery::Storage).await?;
    h.cache.resolve_url(id, true, Delivery::Network).await?;
    assert_eq!(h.generator.storage_signed.load(Ordering::SeqCst), 1);
    assert_eq!(h.generator.delivery_signed.load(Ordering::SeqCst), 1);
    assert_eq!(h.generator.upstream_calls(), 4);
    assert_eq!(h.store.len().await, 4);
    Ok(())
}

#[tokio::test]
async fn unknown_file_is_not_found_and_writes_nothing() -> Result<()> {
    let (_, lookup) = sermon_audio();
    let h = harness(lookup, CountingGenerator::default());

    let err = h.cache.resolve_url(Uuid::new_v4(), true, Delivery::Network).await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(h.generator.upstream_calls(), 0);
    assert!(h.store.is_empty().await);
    Ok(())
}

#[tokio::test]
async fn upstream_failures_propagate_without_caching() -> Result<()> {
    let (id, lookup) = sermon_audio();
    let h = harness(lookup, CountingGenerator::failing());

    let err = h.cache.resolve_url(id, true, Delivery::Storage).await.unwrap_err();
    assert_eq!(err.error_code(), "UPSTREAM_ERROR");
    assert!(h.store.is_empty().await);
    Ok(())
}

#[tokio::test]
async fn invalidate_drops_every_combination() -> Result<()> {
    let (id, lookup) = sermon_audio();
    let h = harness(lookup, CountingGenerator::default());

    for signed in [false, true] {
        for via in [Delivery::Storage, Delivery::Network] {
            h.cache.resolve_url(id, signed, via).await?;
        }
    }
    assert_eq!(h.store.len().await, 4);

    h.cache.invalidate(id).await?;
    assert!(h.store.is_empty().await);

    // next resolution goes upstream again
    h.cache.resolve_url(id, true, Delivery::Network).await?;
    assert_eq!(h.generator.delivery_signed.load(Ordering::SeqCst), 2);
    Ok(())
}

#[tokio::test]
async fn invalidate_leaves_other_files_alone() -> Result<()> {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let h = harness(StaticLookup::with(&[(a, "a.png"), (b, "b.png")]), CountingGenerator::default());

    h.cache.resolve_url(a, false, Delivery::Storage).await?;
    h.cache.resolve_url(b, false, Delivery::Storage).await?;
    h.cache.invalidate(a).await?;

    assert_eq!(h.store.len().await, 1);
    let key = UrlCacheKey::new(b, false, Delivery::Storage).to_string();
    assert!(h.store.get(&key).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn invalidate_by_url_resolves_the_owning_file() -> Result<()> {
    let (id, lookup) = sermon_audio();
    let h = harness(lookup, CountingGenerator::default());

    let url = h.cache.resolve_url(id, true, Delivery::Network).await?;
    h.cache.resolve_url(id, false, Delivery::Storage).await?;

    assert_eq!(h.cache.invalidate_by_url(&url).await?, id);
    assert!(h.store.is_empty().await);

    let err = h.cache.invalidate_by_url("https://cdn.test/unknown.mp3").await.unwrap_err();
    assert!(err.is_not_found());
    Ok(())
}

#[tokio::test]
async fn sub_second_ttl_is_not_cached() -> Result<()> {
    let (id, lookup) = sermon_audio();
    let settings = FileUrlSettings {
        signed_url_expiry: Duration::from_secs(1),
        default_ttl: Duration::from_secs(600),
    };
    let h = harness_with(lookup, CountingGenerator::default(), settings);

    h.cache.resolve_url(id, true, Delivery::Storage).await?;
    h.cache.resolve_url(id, true, Delivery::Storage).await?;

    assert!(h.store.is_empty().await);
    assert_eq!(h.generator.storage_signed.load(Ordering::SeqCst), 2);
    Ok(())
}

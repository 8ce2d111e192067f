use std::path::PathBuf;
use std::sync::Arc;

use revocal::application::ports::{CacheBegin, CacheError, RunCache};
use revocal::domain::{
    content_hash, FingerprintInputs, MediaKind, PipelineRun, RunFingerprint, RunParams,
    RunState, SourceMedia, SubstitutionRule,
};
use revocal::infrastructure::cache::InMemoryRunCache;

fn fingerprint(threshold: u8) -> RunFingerprint {
    let hash = content_hash(b"media");
    FingerprintInputs {
        source_content_hash: &hash,
        language: "en",
        transcription_model: "whisper-small",
        punctuation_model: "fullstop-punctuation",
        threshold,
        rules: &[SubstitutionRule::new("nick", vec!["alex".into()])],
    }
    .fingerprint()
}

fn complete_run() -> PipelineRun {
    let mut run = PipelineRun::new(
        SourceMedia::new(PathBuf::from("input.wav"), MediaKind::Audio),
        RunParams {
            language: "en".into(),
            transcription_model: "whisper-small".into(),
            punctuation_model: "fullstop-punctuation".into(),
        },
    );
    run.state = RunState::Complete;
    run
}

#[tokio::test]
async fn given_empty_cache_when_beginning_then_caller_owns_the_execution() {
    let cache = InMemoryRunCache::new();
    let fp = fingerprint(90);

    assert!(matches!(cache.begin(&fp).await.unwrap(), CacheBegin::Started));
}

#[tokio::test]
async fn given_published_run_when_beginning_again_then_cached_copy_is_returned() {
    let cache = InMemoryRunCache::new();
    let fp = fingerprint(90);
    let run = complete_run();

    assert!(matches!(cache.begin(&fp).await.unwrap(), CacheBegin::Started));
    cache.publish(&fp, Some(run.clone())).await.unwrap();

    match cache.begin(&fp).await.unwrap() {
        CacheBegin::Cached(cached) => assert_eq!(cached.id, run.id),
        other => panic!("expected cached run, got {:?}", std::mem::discriminant(&other)),
    }
    assert_eq!(cache.get(&fp).await.unwrap().map(|r| r.id), Some(run.id));
}

#[tokio::test]
async fn given_in_flight_execution_when_joining_then_waiter_receives_the_result() {
    let cache = Arc::new(InMemoryRunCache::new());
    let fp = fingerprint(90);
    let run = complete_run();

    assert!(matches!(cache.begin(&fp).await.unwrap(), CacheBegin::Started));

    let mut rx = match cache.begin(&fp).await.unwrap() {
        CacheBegin::Joined(rx) => rx,
        _ => panic!("expected to join the in-flight execution"),
    };

    let publisher = {
        let cache = cache.clone();
        let fp = fp.clone();
        let run = run.clone();
        tokio::spawn(async move { cache.publish(&fp, Some(run)).await })
    };

    rx.changed().await.unwrap();
    let received = rx.borrow().clone();
    assert_eq!(received.map(|r| r.id), Some(run.id));
    publisher.await.unwrap().unwrap();
}

#[tokio::test]
async fn given_failed_execution_when_publishing_none_then_fingerprint_is_retryable() {
    let cache = InMemoryRunCache::new();
    let fp = fingerprint(90);

    assert!(matches!(cache.begin(&fp).await.unwrap(), CacheBegin::Started));
    cache.publish(&fp, None).await.unwrap();

    // Failure left nothing cached; the next caller starts fresh.
    assert!(cache.get(&fp).await.unwrap().is_none());
    assert!(matches!(cache.begin(&fp).await.unwrap(), CacheBegin::Started));
}

#[tokio::test]
async fn given_no_in_flight_entry_when_publishing_then_publish_is_rejected() {
    let cache = InMemoryRunCache::new();
    let fp = fingerprint(90);

    assert!(matches!(
        cache.publish(&fp, Some(complete_run())).await,
        Err(CacheError::NotInFlight(_))
    ));
}

#[tokio::test]
async fn given_ready_entry_when_publishing_then_entry_survives_the_rejection() {
    let cache = InMemoryRunCache::new();
    let fp = fingerprint(90);
    let run = complete_run();

    assert!(matches!(cache.begin(&fp).await.unwrap(), CacheBegin::Started));
    cache.publish(&fp, Some(run.clone())).await.unwrap();

    assert!(matches!(
        cache.publish(&fp, Some(complete_run())).await,
        Err(CacheError::NotInFlight(_))
    ));
    assert_eq!(cache.get(&fp).await.unwrap().map(|r| r.id), Some(run.id));
}

#[tokio::test]
async fn given_in_flight_execution_when_evicting_then_eviction_is_refused() {
    let cache = InMemoryRunCache::new();
    let fp = fingerprint(90);

    assert!(matches!(cache.begin(&fp).await.unwrap(), CacheBegin::Started));
    assert!(matches!(cache.evict(&fp).await, Err(CacheError::Busy(_))));
}

#[tokio::test]
async fn given_ready_entry_when_evicting_then_next_begin_starts_fresh() {
    let cache = InMemoryRunCache::new();
    let fp = fingerprint(90);

    assert!(matches!(cache.begin(&fp).await.unwrap(), CacheBegin::Started));
    cache.publish(&fp, Some(complete_run())).await.unwrap();

    cache.evict(&fp).await.unwrap();
    assert!(cache.get(&fp).await.unwrap().is_none());
    assert!(matches!(cache.begin(&fp).await.unwrap(), CacheBegin::Started));
}

#[tokio::test]
async fn given_absent_entry_when_evicting_then_eviction_is_a_no_op() {
    let cache = InMemoryRunCache::new();
    assert!(cache.evict(&fingerprint(90)).await.is_ok());
}

#[tokio::test]
async fn given_different_thresholds_when_caching_then_entries_do_not_collide() {
    let cache = InMemoryRunCache::new();
    let low = fingerprint(80);
    let high = fingerprint(90);

    assert!(matches!(cache.begin(&low).await.unwrap(), CacheBegin::Started));
    cache.publish(&low, Some(complete_run())).await.unwrap();

    assert!(matches!(cache.begin(&high).await.unwrap(), CacheBegin::Started));
}

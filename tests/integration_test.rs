use std::net::Ipv4Addr;
use std::sync::Arc;

use chrono::{TimeDelta, Utc};

use wallpaper_agent::application::dto::Upload;
use wallpaper_agent::application::errors::{ActivateError, StoreError};
use wallpaper_agent::application::ports::{
    ActivePointer, BlobBackend, HostsError, WallpaperApplier,
};
use wallpaper_agent::application::retention::SweepState;
use wallpaper_agent::application::use_cases::{ActivateWallpaper, HostsReconciler};
use wallpaper_agent::domain::value_objects::{ContentHash, WallpaperStyle};
use wallpaper_agent::infrastructure::hosts::FsHostsFile;

mod test_fixtures;
use test_fixtures::{HostsFixture, RecordingApplier, TestEnvironment};

const LOCAL: Ipv4Addr = Ipv4Addr::LOCALHOST;

fn reconciler(fixture: &HostsFixture) -> HostsReconciler {
    HostsReconciler::new(Arc::new(FsHostsFile::new(&fixture.path)), LOCAL)
}

// ---------------------------------------------------------------------------
// Blob store
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_puts_store_one_copy() {
    let env = TestEnvironment::new();
    let payload: &'static [u8] = b"the same wallpaper from many uploaders";

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let store = Arc::clone(&env.store);
            tokio::spawn(async move { store.put(Upload::new(payload)).await })
        })
        .collect();

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.unwrap().expect("put failed"));
    }

    let first = outcomes[0].id;
    assert!(outcomes.iter().all(|o| o.id == first));
    assert_eq!(outcomes.iter().filter(|o| o.created).count(), 1);
    assert_eq!(env.backend.len(), 1);
}

#[tokio::test]
async fn test_get_returns_stored_bytes() {
    let env = TestEnvironment::new();
    let data = vec![0xFFu8, 0xD8, 0xFF, 0xE0, 0x00, 0x10];

    let outcome = env
        .store
        .put(
            Upload::new(data.clone())
                .with_mime_type("image/png")
                .with_original_name("beach.png"),
        )
        .await
        .unwrap();
    let content = env.store.get(&outcome.id).await.unwrap();

    assert_eq!(&content.data[..], &data[..]);
    assert_eq!(content.mime_type, "image/png");
    assert_eq!(content.original_name, "beach.png");
    assert_eq!(outcome.content_hash, ContentHash::of(&data));
}

#[tokio::test]
async fn test_put_defaults_metadata() {
    let env = TestEnvironment::new();
    let outcome = env.store.put(Upload::new(&b"abc"[..])).await.unwrap();

    let record = env.store.info(&outcome.id).await.unwrap();
    assert_eq!(record.mime_type(), "image/jpeg");
    assert_eq!(record.original_name(), "wallpaper.jpg");
    assert!(record.last_used_at().is_none());
}

#[tokio::test]
async fn test_delete_then_put_creates_fresh_record() {
    let env = TestEnvironment::new();
    let first = env.store.put(Upload::new(&b"again"[..])).await.unwrap();

    env.store.delete(&first.id).await.unwrap();
    assert!(matches!(
        env.store.delete(&first.id).await,
        Err(StoreError::NotFound(_))
    ));

    let second = env.store.put(Upload::new(&b"again"[..])).await.unwrap();
    assert!(second.created);
    assert_ne!(second.id, first.id);
}

// ---------------------------------------------------------------------------
// Usage tracking
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_last_used_never_decreases() {
    let env = TestEnvironment::new();
    let id = env.seed(b"used", 1, None).await;
    let future = Utc::now() + TimeDelta::days(1);

    env.backend.touch_last_used(&id, future).await.unwrap();
    env.tracker.mark_used(&id).await;

    let record = env.store.info(&id).await.unwrap();
    assert_eq!(record.last_used_at(), Some(future));
}

#[tokio::test]
async fn test_activate_marks_used_and_points_at_wallpaper() {
    let env = TestEnvironment::new();
    let applier = Arc::new(RecordingApplier::default());
    let activate = ActivateWallpaper::new(
        Arc::clone(&env.store),
        Arc::clone(&env.tracker),
        Arc::clone(&applier) as Arc<dyn WallpaperApplier>,
    );

    let outcome = activate
        .execute(Upload::new(&b"sunset"[..]), WallpaperStyle::Span)
        .await
        .unwrap();

    assert_eq!(env.pointer.get().await.unwrap(), Some(outcome.id));
    let record = env.store.info(&outcome.id).await.unwrap();
    assert!(record.last_used_at().is_some());

    let applied = applier.applied.lock();
    assert_eq!(applied.len(), 1);
    assert_eq!(&applied[0].0[..], b"sunset");
    assert_eq!(applied[0].1, WallpaperStyle::Span);
}

#[tokio::test]
async fn test_failed_activation_keeps_blob_unused() {
    let env = TestEnvironment::new();
    let activate = ActivateWallpaper::new(
        Arc::clone(&env.store),
        Arc::clone(&env.tracker),
        Arc::new(RecordingApplier::failing()),
    );

    let err = activate
        .execute(Upload::new(&b"broken"[..]), WallpaperStyle::Fill)
        .await
        .unwrap_err();

    assert!(matches!(err, ActivateError::Apply(_)));
    assert_eq!(env.pointer.get().await.unwrap(), None);
}

// ---------------------------------------------------------------------------
// Retention
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_retention_deletes_only_expired() {
    let env = TestEnvironment::new();
    let a = env.seed(b"forty days old", 40, None).await;
    let b = env.seed(b"ten days old", 10, None).await;
    let used = env.seed(b"old but used last week", 90, Some(7)).await;

    let report = env.sweeper(30).sweep_once().await.unwrap();

    assert_eq!(report.deleted, 1);
    assert!(!env.exists(&a).await);
    assert!(env.exists(&b).await);
    assert!(env.exists(&used).await);
}

#[tokio::test]
async fn test_retention_protects_current_wallpaper() {
    let env = TestEnvironment::new();
    let current = env.seed(b"on screen for months", 120, Some(60)).await;
    env.pointer.set(current).await.unwrap();

    let report = env.sweeper(30).sweep_once().await.unwrap();

    assert_eq!(report.deleted, 0);
    assert_eq!(report.protected, 1);
    assert!(env.exists(&current).await);
}

#[tokio::test]
async fn test_retention_is_idempotent() {
    let env = TestEnvironment::new();
    for i in 0..5u8 {
        env.seed(&[i; 8], 45, None).await;
    }
    let keep = env.seed(b"recent", 2, None).await;
    let sweeper = env.sweeper(30);

    let first = sweeper.sweep_once().await.unwrap();
    let second = sweeper.sweep_once().await.unwrap();

    assert_eq!(first.deleted, 5);
    assert_eq!(second.deleted, 0);
    assert_eq!(second.scanned, 0);
    assert!(env.exists(&keep).await);
    assert_eq!(sweeper.state(), SweepState::Idle);
}

#[tokio::test]
async fn test_retention_pages_through_large_sets() {
    let env = TestEnvironment::new();
    for i in 0..250u16 {
        env.seed(&i.to_be_bytes(), 31, None).await;
    }

    let report = env.sweeper(30).sweep_once().await.unwrap();

    assert_eq!(report.deleted, 250);
    assert!(env.backend.is_empty());
}

// ---------------------------------------------------------------------------
// Hosts file
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_block_twice_writes_one_line() {
    let fixture = HostsFixture::with_content("127.0.0.1 localhost\n");
    let hosts = reconciler(&fixture);

    assert_eq!(hosts.block(&["ads.example.com"]).await.unwrap(), 1);
    assert_eq!(hosts.block(&["ads.example.com"]).await.unwrap(), 0);

    assert_eq!(
        fixture.content(),
        "127.0.0.1 localhost\n127.0.0.1 ads.example.com\n"
    );
}

#[tokio::test]
async fn test_unblock_removes_and_list_excludes() {
    let fixture = HostsFixture::with_content("127.0.0.1 localhost\n");
    let hosts = reconciler(&fixture);

    hosts.block(&["tracker.net", "ads.net"]).await.unwrap();
    assert_eq!(
        hosts.list().await.unwrap(),
        vec!["localhost", "tracker.net", "ads.net"]
    );

    assert_eq!(hosts.unblock(&["tracker.net"]).await.unwrap(), 1);
    assert_eq!(hosts.list().await.unwrap(), vec!["localhost", "ads.net"]);
}

#[tokio::test]
async fn test_mixed_case_entries_block_then_unblock() {
    let fixture = HostsFixture::with_content("127.0.0.1 X.com\n127.0.0.1 MyHost\n");
    let hosts = reconciler(&fixture);

    assert_eq!(hosts.block(&["x.com"]).await.unwrap(), 0);
    assert_eq!(hosts.unblock(&["x.com"]).await.unwrap(), 1);
    assert_eq!(hosts.unblock(&["MyHost"]).await.unwrap(), 1);

    assert!(hosts.list().await.unwrap().is_empty());
    assert_eq!(fixture.content(), "");
}

#[tokio::test]
async fn test_normalization_collapses_variants() {
    let fixture = HostsFixture::with_content("");
    let hosts = reconciler(&fixture);

    let added = hosts
        .block(&["https://Example.com/", "example.com", "  http://EXAMPLE.com  "])
        .await
        .unwrap();

    assert_eq!(added, 1);
    assert_eq!(fixture.content(), "127.0.0.1 example.com\n");
}

#[tokio::test]
async fn test_unblock_substring_removes_related_hosts() {
    let fixture = HostsFixture::with_content(
        "127.0.0.1 ads\n127.0.0.1 myads.example.com\n127.0.0.1 news.example.com\n",
    );

    let removed = reconciler(&fixture).unblock(&["ads"]).await.unwrap();

    assert_eq!(removed, 2);
    assert_eq!(fixture.content(), "127.0.0.1 news.example.com\n");
}

#[tokio::test]
async fn test_unrelated_lines_keep_order_and_endings() {
    let original = "# managed by IT\r\n10.0.0.5 nas.lan\r\n\r\n127.0.0.1 block.me\r\n::1 localhost\r\n";
    let fixture = HostsFixture::with_content(original);

    reconciler(&fixture).unblock(&["block.me"]).await.unwrap();

    assert_eq!(
        fixture.content(),
        "# managed by IT\r\n10.0.0.5 nas.lan\r\n\r\n::1 localhost\r\n"
    );
}

#[tokio::test]
async fn test_block_keeps_unterminated_last_line() {
    let fixture = HostsFixture::with_content("10.0.0.5 nas.lan");

    reconciler(&fixture).block(&["x.com"]).await.unwrap();

    assert_eq!(fixture.content(), "10.0.0.5 nas.lan\n127.0.0.1 x.com\n");
}

#[tokio::test]
async fn test_missing_hosts_file_reads_as_empty() {
    let fixture = HostsFixture::missing();
    let hosts = reconciler(&fixture);

    assert!(hosts.list().await.unwrap().is_empty());
    assert_eq!(hosts.unblock(&["x.com"]).await.unwrap(), 0);
    assert!(!fixture.path.exists());

    assert_eq!(hosts.block(&["x.com"]).await.unwrap(), 1);
    assert_eq!(fixture.content(), "127.0.0.1 x.com\n");
}

#[tokio::test]
async fn test_invalid_domain_rejects_whole_call() {
    let fixture = HostsFixture::with_content("");

    let err = reconciler(&fixture)
        .block(&["good.com", "bad.com#comment"])
        .await
        .unwrap_err();

    assert!(matches!(err, HostsError::InvalidInput(_)));
    assert_eq!(fixture.content(), "");
}

#[tokio::test]
async fn test_concurrent_blocks_are_serialized() {
    let fixture = HostsFixture::with_content("");
    let hosts = Arc::new(reconciler(&fixture));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let hosts = Arc::clone(&hosts);
            tokio::spawn(async move {
                hosts
                    .block(&[format!("site{}.com", i % 4)])
                    .await
                    .unwrap()
            })
        })
        .collect();
    let mut added = 0;
    for handle in handles {
        added += handle.await.unwrap();
    }

    assert_eq!(added, 4);
    assert_eq!(hosts.list().await.unwrap().len(), 4);
}

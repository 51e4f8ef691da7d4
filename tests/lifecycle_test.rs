//! Install and activate: seed provisioning and generation sweep.

mod common;

use std::sync::Arc;

use common::{FakeFetcher, harness, harness_with, url};
use stowaway::{
    CacheStorage, CacheWriteMode, EventOutcome, FetchOutcome, MemoryCacheStorage, Request,
    Response, StowawayError, WorkerEvent, WorkerState,
};

// ============================================================================
// Provisioning
// ============================================================================

#[tokio::test]
async fn install_caches_every_seed() {
    let h = harness("v1", &["/", "/index.html"]);
    h.fetcher.route(&url("/"), Response::ok("root"));
    h.fetcher.route(&url("/index.html"), Response::ok("index"));

    h.controller.install().await.unwrap();

    assert_eq!(h.controller.state(), WorkerState::Installed);
    assert_eq!(h.caches.keys().await.unwrap(), vec!["v1"]);
    assert_eq!(h.caches.entry_count("v1").await, Some(2));

    let root = h
        .caches
        .match_request("v1", &Request::get(&url("/")).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(root.text(), "root");
    let index = h
        .caches
        .match_request("v1", &Request::get(&url("/index.html")).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(index.text(), "index");
}

#[tokio::test]
async fn install_resolves_absolute_seeds_as_given() {
    let font = "https://fonts.example.net/css?family=Inter";
    let h = harness("v1", &["/", font]);
    h.fetcher.route(&url("/"), Response::ok("root"));
    h.fetcher.route(font, Response::ok("font-css"));

    h.controller.install().await.unwrap();

    let cached = h
        .caches
        .match_request("v1", &Request::get(font).unwrap())
        .await
        .unwrap();
    assert_eq!(cached.unwrap().text(), "font-css");
}

#[tokio::test]
async fn install_is_all_or_nothing_on_network_failure() {
    let h = harness("v1", &["/", "/index.html"]);
    h.fetcher.set_offline(true);

    let err = h.controller.install().await.unwrap_err();

    assert!(matches!(err, StowawayError::Provisioning { .. }));
    assert_eq!(h.controller.state(), WorkerState::Redundant);
    assert!(!h.caches.has("v1").await.unwrap());
}

#[tokio::test]
async fn install_fails_on_error_status_and_stores_nothing() {
    let h = harness("v1", &["/", "/missing.css"]);
    h.fetcher.route(&url("/"), Response::ok("root"));
    // "/missing.css" has no route: the fake answers 404

    let err = h.controller.install().await.unwrap_err();

    match err {
        StowawayError::Provisioning { url: failed, reason } => {
            assert_eq!(failed, url("/missing.css"));
            assert!(reason.contains("404"));
        }
        other => panic!("expected Provisioning, got {other:?}"),
    }
    assert!(!h.caches.has("v1").await.unwrap());
}

#[tokio::test]
async fn install_fails_when_seeds_exceed_generation_capacity() {
    let seeds = ["/", "/index.html", "/app.js", "/style.css"];
    let h = harness_with(
        "v1",
        &seeds,
        Arc::new(MemoryCacheStorage::with_max_entries(2)),
        Arc::new(FakeFetcher::new()),
        CacheWriteMode::Await,
    );
    for seed in seeds {
        h.fetcher.route(&url(seed), Response::ok(seed));
    }

    let err = h.controller.install().await.unwrap_err();

    assert!(matches!(err, StowawayError::Cache(_)));
    assert_eq!(h.controller.state(), WorkerState::Redundant);
    assert!(!h.caches.has("v1").await.unwrap());
}

#[tokio::test]
async fn install_fetches_each_seed_once() {
    let h = harness("v1", &["/", "/index.html"]);
    h.fetcher.route(&url("/"), Response::ok("root"));
    h.fetcher.route(&url("/index.html"), Response::ok("index"));

    h.controller.install().await.unwrap();

    assert_eq!(h.fetcher.call_count(&url("/")), 1);
    assert_eq!(h.fetcher.call_count(&url("/index.html")), 1);
}

// ============================================================================
// Generation sweep
// ============================================================================

#[tokio::test]
async fn activate_removes_prior_generations() {
    let caches = Arc::new(MemoryCacheStorage::new());
    caches.open("github-chat-v0.9.0").await.unwrap();
    caches.open("unrelated").await.unwrap();

    let h = harness_with(
        "v2",
        &["/"],
        caches,
        Arc::new(FakeFetcher::new()),
        CacheWriteMode::Await,
    );
    h.fetcher.route(&url("/"), Response::ok("root"));

    h.controller.install().await.unwrap();
    let deleted = h.controller.activate().await.unwrap();

    assert_eq!(deleted, 2);
    assert_eq!(h.caches.keys().await.unwrap(), vec!["v2"]);
    assert_eq!(h.controller.state(), WorkerState::Activated);
}

#[tokio::test]
async fn upgrade_discards_old_contents() {
    let caches = Arc::new(MemoryCacheStorage::new());
    let fetcher = Arc::new(FakeFetcher::new());
    fetcher.route(&url("/"), Response::ok("old root"));

    let v1 = harness_with("v1", &["/"], caches.clone(), fetcher.clone(), CacheWriteMode::Await);
    v1.controller.install().await.unwrap();
    v1.controller.activate().await.unwrap();

    fetcher.route(&url("/"), Response::ok("new root"));
    let v2 = harness_with("v2", &["/"], caches.clone(), fetcher.clone(), CacheWriteMode::Await);
    v2.controller.install().await.unwrap();
    v2.controller.activate().await.unwrap();

    assert_eq!(caches.keys().await.unwrap(), vec!["v2"]);
    assert!(
        caches
            .match_request("v1", &Request::get(&url("/")).unwrap())
            .await
            .unwrap()
            .is_none()
    );

    fetcher.set_offline(true);
    let outcome = v2
        .controller
        .handle_fetch(&Request::get(&url("/")).unwrap())
        .await
        .unwrap();
    assert_eq!(outcome.into_response().unwrap().text(), "new root");
}

#[tokio::test]
async fn activate_with_only_current_generation_deletes_nothing() {
    let h = harness("v1", &[]);
    h.controller.install().await.unwrap();
    assert_eq!(h.controller.activate().await.unwrap(), 0);
    assert_eq!(h.caches.keys().await.unwrap(), vec!["v1"]);
}

#[tokio::test]
async fn activate_after_failed_install_keeps_previous_generation() {
    let caches = Arc::new(MemoryCacheStorage::new());
    let fetcher = Arc::new(FakeFetcher::new());
    fetcher.route(&url("/"), Response::ok("root"));
    fetcher.route(&url("/index.html"), Response::ok("index"));

    let v1 = harness_with(
        "v1",
        &["/", "/index.html"],
        caches.clone(),
        fetcher.clone(),
        CacheWriteMode::Await,
    );
    v1.controller.install().await.unwrap();
    v1.controller.activate().await.unwrap();

    fetcher.set_offline(true);
    let v2 = harness_with(
        "v2",
        &["/", "/index.html"],
        caches.clone(),
        fetcher.clone(),
        CacheWriteMode::Await,
    );
    v2.controller.install().await.unwrap_err();

    let err = v2.controller.activate().await.unwrap_err();

    assert!(matches!(
        err,
        StowawayError::Lifecycle {
            event: "activate",
            state: WorkerState::Redundant
        }
    ));
    assert_eq!(v2.controller.state(), WorkerState::Redundant);
    assert_eq!(caches.keys().await.unwrap(), vec!["v1"]);

    let nav = Request::navigate(&url("/rooms/general")).unwrap();
    let outcome = v1.controller.handle_fetch(&nav).await.unwrap();
    assert_eq!(outcome.into_response().unwrap().text(), "index");
}

#[tokio::test]
async fn activate_before_install_is_refused() {
    let h = harness("v2", &["/"]);
    h.caches.open("v1").await.unwrap();

    let err = h.controller.activate().await.unwrap_err();

    assert!(matches!(
        err,
        StowawayError::Lifecycle {
            state: WorkerState::Parsed,
            ..
        }
    ));
    assert_eq!(h.controller.state(), WorkerState::Parsed);
    assert_eq!(h.caches.keys().await.unwrap(), vec!["v1"]);
}

#[tokio::test]
async fn second_activation_is_refused() {
    let h = harness("v1", &[]);
    h.controller.install().await.unwrap();
    h.controller.activate().await.unwrap();
    h.caches.open("late").await.unwrap();

    let err = h.controller.activate().await.unwrap_err();

    assert!(matches!(
        err,
        StowawayError::Lifecycle {
            state: WorkerState::Activated,
            ..
        }
    ));
    assert_eq!(h.controller.state(), WorkerState::Activated);
    assert_eq!(h.caches.keys().await.unwrap(), vec!["v1", "late"]);
}

// ============================================================================
// Lifecycle gating and dispatch
// ============================================================================

#[tokio::test]
async fn fetch_before_activation_passes_through() {
    let h = harness("v1", &["/"]);
    h.fetcher.route(&url("/"), Response::ok("root"));
    h.controller.install().await.unwrap();

    let outcome = h
        .controller
        .handle_fetch(&Request::get(&url("/")).unwrap())
        .await
        .unwrap();

    assert_eq!(outcome, FetchOutcome::Passthrough);
}

#[tokio::test]
async fn dispatch_drives_full_lifecycle() {
    let h = harness("v1", &["/"]);
    h.fetcher.route(&url("/"), Response::ok("root"));
    assert_eq!(h.controller.state(), WorkerState::Parsed);

    let installed = h.controller.dispatch(WorkerEvent::Install).await.unwrap();
    assert_eq!(installed, EventOutcome::Installed);

    let activated = h.controller.dispatch(WorkerEvent::Activate).await.unwrap();
    assert_eq!(activated, EventOutcome::Activated { deleted: 0 });

    let fetched = h
        .controller
        .dispatch(WorkerEvent::Fetch(Request::get(&url("/")).unwrap()))
        .await
        .unwrap();
    match fetched {
        EventOutcome::Fetch(FetchOutcome::Respond(resp)) => assert_eq!(resp.text(), "root"),
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[tokio::test]
async fn dispatched_activate_after_failed_install_is_refused() {
    let h = harness("v2", &["/"]);
    h.caches.open("v1").await.unwrap();
    h.fetcher.set_offline(true);

    h.controller.dispatch(WorkerEvent::Install).await.unwrap_err();
    let err = h
        .controller
        .dispatch(WorkerEvent::Activate)
        .await
        .unwrap_err();

    assert!(matches!(err, StowawayError::Lifecycle { .. }));
    assert_eq!(h.caches.keys().await.unwrap(), vec!["v1"]);
}

#[tokio::test]
async fn version_is_a_construction_value() {
    let a = harness("alpha", &[]);
    let b = harness("beta", &[]);
    assert_eq!(a.controller.version(), "alpha");
    assert_eq!(b.controller.version(), "beta");
}

//! Integration tests for the feed worker, pump and watchers.

mod common;

use gmtable_app::config::WatchTarget;
use gmtable_app::error::AppError;
use gmtable_app::feed;
use gmtable_app::watch::Watchers;
use gmtable_core::record::{Record, RecordTag};
use gmtable_test_support::{ManualBridge, RecordingHandler, act, gmc, scenario, scene};

use common::{ScriptedSource, jsonl, line_source};

#[tokio::test]
async fn test_run_routes_feed_records_to_matching_subscriptions() {
    // Arrange
    let (hub, bridge) = ManualBridge::<Record>::connect();
    let sub = hub.subscribe(RecordTag::Gmc, 42);
    let recorder = RecordingHandler::new();
    sub.on_message().listen(recorder.handler());
    let text = jsonl(&[gmc(42, 10), scene(42), gmc(7, 3), gmc(42, 8)]);

    // Act
    let stats = feed::run(line_source(text), 2, bridge.publisher())
        .await
        .unwrap();

    // Assert
    assert_eq!(stats.published, 4);
    assert_eq!(stats.deliveries, 2);
    assert_eq!(stats.skipped, 0);
    assert_eq!(recorder.received(), vec![gmc(42, 10), gmc(42, 8)]);
}

#[tokio::test]
async fn test_run_counts_skipped_lines() {
    let (_hub, bridge) = ManualBridge::<Record>::connect();
    let text = format!("{}\n{{broken\n\n{}", jsonl(&[act(1)]), jsonl(&[act(2)]));

    let stats = feed::run(line_source(text), 8, bridge.publisher())
        .await
        .unwrap();

    assert_eq!(stats.published, 2);
    assert_eq!(stats.skipped, 1);
}

#[tokio::test]
async fn test_watchers_count_deliveries_and_detach_cleanly() {
    // Arrange
    let (hub, bridge) = ManualBridge::<Record>::connect();
    let watchers = Watchers::attach(
        &hub,
        &[
            WatchTarget {
                tag: RecordTag::Scenario,
                id: 1,
            },
            WatchTarget {
                tag: RecordTag::Scene,
                id: 1,
            },
        ],
    );
    let source = ScriptedSource::new(vec![scenario(1), scene(1), scenario(2), scene(1)]);

    // Act
    let stats = feed::run(source, 1, bridge.publisher()).await.unwrap();

    // Assert
    assert_eq!(stats.deliveries, 3);
    assert_eq!(watchers.deliveries(), 3);
    watchers.detach();
    assert!(hub.is_idle());
}

#[tokio::test]
async fn test_run_surfaces_source_errors_after_pumping_earlier_records() {
    // Arrange
    let (hub, bridge) = ManualBridge::<Record>::connect();
    let sub = hub.subscribe(RecordTag::Scenario, 5);
    let recorder = RecordingHandler::new();
    sub.on_message().listen(recorder.handler());
    let source = ScriptedSource::failing_after(vec![scenario(5)]);

    // Act
    let result = feed::run(source, 4, bridge.publisher()).await;

    // Assert
    assert!(matches!(result, Err(AppError::Io(_))));
    assert_eq!(recorder.count(), 1);
}

#[tokio::test]
async fn test_run_after_hub_dropped_publishes_nowhere() {
    let (hub, bridge) = ManualBridge::<Record>::connect();
    drop(hub);

    let stats = feed::run(ScriptedSource::new(vec![gmc(1, 0)]), 1, bridge.publisher())
        .await
        .unwrap();

    assert_eq!(stats.published, 1);
    assert_eq!(stats.deliveries, 0);
}

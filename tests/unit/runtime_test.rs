//! Tests for tokio spawner and observer monitor

use std::time::Duration;

use lot_simulator::core::{
    FixedDwell, Lot, LotObserver, ShutdownSignal, SimError, Spawn, Vehicle,
};
use lot_simulator::runtime::{render, spawn_monitor, OccupancyView, ReportFormat, TokioSpawner};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tokio_spawner_spawn() {
    let spawner = TokioSpawner::new(tokio::runtime::Handle::current());

    let (tx, rx) = tokio::sync::oneshot::channel();
    spawner.spawn(async move {
        tx.send(123).unwrap();
    });

    let result = rx.await.expect("oneshot result");
    assert_eq!(result, 123);
}

#[test]
fn test_current_spawner_needs_runtime() {
    let err = TokioSpawner::current().unwrap_err();
    assert!(matches!(err, SimError::Runtime(_)));
}

#[tokio::test(start_paused = true)]
async fn test_monitor_polls_until_cancelled() {
    let lot = Lot::new(
        2,
        FixedDwell(Duration::from_secs(60)),
        TokioSpawner::current().unwrap(),
    )
    .unwrap();
    lot.enter(Vehicle::new(1));

    let (stop, listener) = ShutdownSignal::channel();
    let monitor = spawn_monitor(
        lot.clone(),
        Duration::from_millis(700),
        ReportFormat::Text,
        listener,
    );

    // Ticks at 0, 0.7, 1.4 and 2.1 s.
    tokio::time::sleep(Duration::from_millis(2200)).await;
    stop.cancel();
    let polls = monitor.await.unwrap();
    assert_eq!(polls, 4);
    assert_eq!(lot.snapshot().occupied_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_json_render_of_live_lot() {
    let lot = Lot::new(
        3,
        FixedDwell(Duration::from_secs(60)),
        TokioSpawner::current().unwrap(),
    )
    .unwrap();
    lot.enter(Vehicle::new(5));
    lot.enter(Vehicle::new(6));

    let view = OccupancyView::from(&lot.snapshot());
    let json = render(&view, ReportFormat::Json).unwrap();
    let parsed: OccupancyView = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, view);
    assert_eq!(parsed.free, 1);
}

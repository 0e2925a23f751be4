//! Tests for occupancy views and utility functions

use lot_simulator::core::Snapshot;
use lot_simulator::runtime::{render, OccupancyView, ReportFormat, SpotView};
use lot_simulator::util::now_ms;

fn snapshot() -> Snapshot {
    Snapshot {
        occupied: vec![true, true, false, true],
        holder: vec![1, 2, 0, 5],
        cursor: 0,
        available_permits: 1,
        waiting: vec![],
    }
}

#[test]
fn test_occupancy_view_from_snapshot() {
    let view = OccupancyView::from(&snapshot());
    assert_eq!(view.capacity, 4);
    assert_eq!(view.occupied, 3);
    assert_eq!(view.free, 1);
    assert_eq!(
        view.spots[2],
        SpotView {
            index: 2,
            vehicle: None
        }
    );
    assert_eq!(view.spots[3].vehicle, Some(5));
}

#[test]
fn test_summary_line() {
    let view = OccupancyView::from(&snapshot());
    assert_eq!(view.summary_line(), "occupied 3/4 free 1 waiting [] | 1 2 . 5");
    assert_eq!(render(&view, ReportFormat::Text).unwrap(), view.summary_line());
}

#[test]
fn test_json_render_fields() {
    let view = OccupancyView::from(&snapshot());
    let value: serde_json::Value =
        serde_json::from_str(&render(&view, ReportFormat::Json).unwrap()).unwrap();
    assert_eq!(value["occupied"], 3);
    assert_eq!(value["spots"][1]["vehicle"], 2);
    assert!(value["spots"][2]["vehicle"].is_null());
}

#[test]
fn test_now_ms_advances() {
    let a = now_ms();
    let b = now_ms();
    assert!(a > 0);
    assert!(b >= a);
}

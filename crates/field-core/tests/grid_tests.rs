// Spatial hash grid and line buffer tests.

use field_core::constants::{CONN_DIST, MAX_LINES};
use field_core::grid::{LineBuffer, SpatialHashGrid};
use glam::Vec3;

fn positions_of(points: &[[f32; 3]]) -> Vec<f32> {
    points.iter().flatten().copied().collect()
}

#[test]
fn cluster_of_five_yields_all_ten_pairs_once() {
    // Five nodes pairwise within the threshold plus one far outlier: every
    // close pair appears exactly once, the outlier contributes nothing.
    let points = [
        [0.0, 0.0, 0.0],
        [0.1, 0.0, 0.0],
        [0.2, 0.0, 0.0],
        [0.0, 0.1, 0.0],
        [0.1, 0.1, 0.0],
        [5.0, 5.0, 5.0],
    ];
    let positions = positions_of(&points);
    let mut grid = SpatialHashGrid::new();
    let mut lines = LineBuffer::new();
    grid.recompute(&positions, points.len(), &mut lines);
    assert_eq!(lines.tensor_count(), 10);
    assert_eq!(lines.vertex_count(), 20);
}

#[test]
fn pairs_straddling_cell_borders_are_found() {
    // Two nodes just under the threshold but in different hash cells.
    let positions = positions_of(&[
        [CONN_DIST - 0.01, 0.0, 0.0],
        [2.0 * CONN_DIST - 0.05, 0.0, 0.0],
    ]);
    let mut grid = SpatialHashGrid::new();
    let mut lines = LineBuffer::new();
    grid.recompute(&positions, 2, &mut lines);
    assert_eq!(lines.tensor_count(), 1);

    let (a, b) = lines.segment(0);
    assert!(a.distance(b) < CONN_DIST);
}

#[test]
fn line_budget_truncates_dense_clusters() {
    // 40 coincident-ish nodes produce 780 candidate pairs; the buffer must
    // stop exactly at the budget instead of growing.
    let mut points = Vec::new();
    for i in 0..40 {
        let f = i as f32 * 0.002;
        points.push([f, f * 0.5, 0.0]);
    }
    let positions = positions_of(&points);
    let mut grid = SpatialHashGrid::new();
    let mut lines = LineBuffer::new();
    grid.recompute(&positions, points.len(), &mut lines);
    assert_eq!(lines.tensor_count(), MAX_LINES);

    // A full tensor region leaves no room for extras.
    lines.begin_extra();
    assert!(!lines.push_extra(Vec3::ZERO, Vec3::ONE));
    assert_eq!(lines.extra_count(), 0);
}

#[test]
fn extra_segments_append_after_tensor_region() {
    let positions = positions_of(&[[0.0, 0.0, 0.0], [0.1, 0.0, 0.0]]);
    let mut grid = SpatialHashGrid::new();
    let mut lines = LineBuffer::new();
    grid.recompute(&positions, 2, &mut lines);
    assert_eq!(lines.tensor_count(), 1);

    lines.begin_extra();
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = Vec3::new(4.0, 5.0, 6.0);
    assert!(lines.push_extra(a, b));
    assert_eq!(lines.segment_count(), 2);

    // Slot 0 is still the proximity segment; the extra landed at slot 1.
    let (ea, eb) = lines.segment(1);
    assert_eq!(ea, a);
    assert_eq!(eb, b);

    // Rewriting extras does not disturb the tensor region.
    let (ta, tb) = lines.segment(0);
    lines.begin_extra();
    assert!(lines.push_extra(b, a));
    assert_eq!(lines.segment(0), (ta, tb));
    assert_eq!(lines.segment_count(), 2);
}

#[test]
fn recompute_replaces_previous_connections() {
    let close = positions_of(&[[0.0, 0.0, 0.0], [0.1, 0.0, 0.0]]);
    let far = positions_of(&[[0.0, 0.0, 0.0], [3.0, 0.0, 0.0]]);
    let mut grid = SpatialHashGrid::new();
    let mut lines = LineBuffer::new();
    grid.recompute(&close, 2, &mut lines);
    assert_eq!(lines.tensor_count(), 1);
    grid.recompute(&far, 2, &mut lines);
    assert_eq!(lines.tensor_count(), 0);
    assert_eq!(lines.vertex_count(), 0);
}

use gloam_geom::{Vec2, clip_distance, is_blocked, segments_intersect};
use proptest::prelude::*;

fn v(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y)
}

#[test]
fn crossing_segments_intersect() {
    assert!(segments_intersect(
        v(0.0, 0.0),
        v(10.0, 10.0),
        v(0.0, 10.0),
        v(10.0, 0.0)
    ));
}

#[test]
fn disjoint_segments_do_not_intersect() {
    assert!(!segments_intersect(
        v(0.0, 0.0),
        v(10.0, 0.0),
        v(0.0, 5.0),
        v(10.0, 5.0)
    ));
    assert!(!segments_intersect(
        v(0.0, 0.0),
        v(1.0, 1.0),
        v(5.0, 5.0),
        v(6.0, 4.0)
    ));
}

#[test]
fn parallel_segments_do_not_intersect() {
    // Strictly parallel, non-overlapping.
    assert!(!segments_intersect(
        v(0.0, 0.0),
        v(10.0, 10.0),
        v(1.0, 0.0),
        v(11.0, 10.0)
    ));
    // Collinear overlap is also reported as non-intersecting.
    assert!(!segments_intersect(
        v(0.0, 0.0),
        v(10.0, 0.0),
        v(5.0, 0.0),
        v(15.0, 0.0)
    ));
}

#[test]
fn endpoint_touch_counts_as_intersection() {
    assert!(segments_intersect(
        v(0.0, 0.0),
        v(10.0, 0.0),
        v(10.0, -5.0),
        v(10.0, 5.0)
    ));
}

#[test]
fn single_vertex_wall_never_blocks() {
    // A one-vertex "wall" sitting exactly on the sight line must be ignored.
    let wall = vec![v(5.0, 5.0)];
    let polylines = [wall.as_slice()];
    assert!(!is_blocked(polylines, v(0.0, 0.0), v(10.0, 10.0)));
}

#[test]
fn two_vertex_wall_blocks_crossing_line() {
    let wall = vec![v(5.0, -5.0), v(5.0, 5.0)];
    let polylines = [wall.as_slice()];
    assert!(is_blocked(polylines, v(0.0, 0.0), v(10.0, 0.0)));
    // Line of sight that stops short of the wall is clear.
    assert!(!is_blocked(polylines, v(0.0, 0.0), v(4.0, 0.0)));
}

#[test]
fn multi_segment_polyline_blocks_on_any_segment() {
    let wall = vec![v(0.0, 10.0), v(10.0, 10.0), v(10.0, 0.0)];
    let polylines = [wall.as_slice()];
    // Crosses the second segment only.
    assert!(is_blocked(polylines, v(5.0, 5.0), v(15.0, 5.0)));
}

#[test]
fn clip_distance_clear_ray_is_unbounded() {
    let dist = clip_distance([].into_iter(), v(0.0, 0.0), v(1.0, 0.0), 50.0);
    assert_eq!(dist, f32::INFINITY);
    // A wall past the probe range leaves the ray clear too.
    let wall = vec![v(60.0, -20.0), v(60.0, 20.0)];
    let polylines = [wall.as_slice()];
    let dist = clip_distance(polylines, v(0.0, 0.0), v(1.0, 0.0), 50.0);
    assert_eq!(dist, f32::INFINITY);
}

#[test]
fn clip_distance_stops_at_wall() {
    let wall = vec![v(30.0, -20.0), v(30.0, 20.0)];
    let polylines = [wall.as_slice()];
    let dist = clip_distance(polylines, v(0.0, 0.0), v(1.0, 0.0), 50.0);
    assert!((dist - 30.0).abs() < 1e-3, "dist = {}", dist);
}

#[test]
fn clip_distance_picks_nearest_of_several() {
    let far = vec![v(40.0, -20.0), v(40.0, 20.0)];
    let near = vec![v(10.0, -20.0), v(10.0, 20.0)];
    let polylines = [far.as_slice(), near.as_slice()];
    let dist = clip_distance(polylines, v(0.0, 0.0), v(1.0, 0.0), 50.0);
    assert!((dist - 10.0).abs() < 1e-3, "dist = {}", dist);
}

fn coord() -> impl Strategy<Value = f32> {
    (-1000i32..1000).prop_map(|n| n as f32)
}

fn point() -> impl Strategy<Value = Vec2> {
    (coord(), coord()).prop_map(|(x, y)| Vec2::new(x, y))
}

proptest! {
    // The parametric test is symmetric in its two segment arguments: the
    // swapped form computes the same quotients with roles exchanged, so the
    // result is identical even under IEEE rounding.
    #[test]
    fn intersection_is_symmetric(a1 in point(), a2 in point(), b1 in point(), b2 in point()) {
        prop_assert_eq!(
            segments_intersect(a1, a2, b1, b2),
            segments_intersect(b1, b2, a1, a2)
        );
    }

    #[test]
    fn segment_never_intersects_distant_parallel_copy(a1 in point(), a2 in point()) {
        // Translate perpendicular-ish by a fixed offset; identical direction
        // keeps the determinant at exactly zero.
        let off = Vec2::new(0.0, 5000.0);
        prop_assert!(!segments_intersect(a1, a2, a1 + off, a2 + off));
    }
}

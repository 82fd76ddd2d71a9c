use millpath_core::{ControlPoint, Point, ShapeError};
use millpath_designer::tessellate::{self, PointAccumulator, BEZIER_DEPTH, SPLINE_DEPTH};
use proptest::prelude::*;

#[test]
fn test_bezier_run_between_anchors() {
    let entries = [
        ControlPoint::anchor(0.0, 0.0),
        ControlPoint::control(5.0, 10.0),
        ControlPoint::anchor(10.0, 0.0),
    ];
    let points = tessellate::polyline(&entries, "polyline").unwrap();

    assert_eq!(points.len(), (1 << BEZIER_DEPTH) + 1);
    assert_eq!(points[0], Point::new(0.0, 0.0));
    assert_eq!(points[points.len() - 1], Point::new(10.0, 0.0));
    // Apex of the quadratic sits halfway to the control point.
    assert_eq!(points[8], Point::new(5.0, 5.0));
}

#[test]
fn test_straight_runs_and_curves_keep_order() {
    let entries = [
        ControlPoint::anchor(0.0, 0.0),
        ControlPoint::anchor(10.0, 0.0),
        ControlPoint::control(15.0, 0.0),
        ControlPoint::control(15.0, 5.0),
        ControlPoint::anchor(10.0, 5.0),
        ControlPoint::anchor(0.0, 5.0),
    ];
    let points = tessellate::polyline(&entries, "polyline").unwrap();

    assert_eq!(points.len(), 2 + (1 << BEZIER_DEPTH) + 1);
    assert_eq!(points[1], Point::new(10.0, 0.0));
    assert_eq!(points[points.len() - 2], Point::new(10.0, 5.0));
    assert_eq!(points[points.len() - 1], Point::new(0.0, 5.0));
}

#[test]
fn test_spline_passes_through_knots() {
    let entries = [
        ControlPoint::anchor(0.0, 0.0),
        ControlPoint::through(5.0, 4.0),
        ControlPoint::through(10.0, 0.0),
        ControlPoint::anchor(15.0, 0.0),
    ];
    let points = tessellate::polyline(&entries, "polyline").unwrap();

    for knot in &entries {
        assert!(points.contains(&knot.position), "missing {}", knot.position);
    }
    assert_eq!(points.len(), 3 * (1 << SPLINE_DEPTH) + 1);
}

#[test]
fn test_closed_spline_ends_where_it_starts() {
    let entries = [
        ControlPoint::through(0.0, 0.0),
        ControlPoint::through(10.0, 0.0),
        ControlPoint::through(10.0, 10.0),
        ControlPoint::through(0.0, 10.0),
        ControlPoint::through(0.0, 0.0),
    ];
    let points = tessellate::polyline(&entries, "polyline").unwrap();

    assert_eq!(points.first(), points.last());
    // A closed run bows outwards on every side.
    assert!(points.iter().any(|p| p.y < -0.5));
    assert!(points.iter().any(|p| p.x > 10.5));
}

#[test]
fn test_knot_after_controls_joins_without_duplicate() {
    let entries = [
        ControlPoint::anchor(0.0, 0.0),
        ControlPoint::control(2.0, 2.0),
        ControlPoint::through(4.0, 0.0),
        ControlPoint::through(8.0, 0.0),
    ];
    let points = tessellate::polyline(&entries, "polyline").unwrap();

    assert_eq!(points.len(), (1 << BEZIER_DEPTH) + (1 << SPLINE_DEPTH) + 1);
    for pair in points.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
}

#[test]
fn test_trailing_control_is_rejected() {
    let entries = [
        ControlPoint::anchor(0.0, 0.0),
        ControlPoint::control(2.0, 2.0),
        ControlPoint::control(4.0, 2.0),
    ];
    let err = tessellate::polyline(&entries, "curve").unwrap_err();
    assert_eq!(err, ShapeError::missing("curve", "point"));
}

proptest! {
    #[test]
    fn prop_degree_one_is_two_points(
        ax in -100.0f64..100.0, ay in -100.0f64..100.0,
        bx in -100.0f64..100.0, by in -100.0f64..100.0,
        depth in 0u32..8,
    ) {
        prop_assume!((ax, ay) != (bx, by));
        let mut out = PointAccumulator::new();
        tessellate::bezier(&[Point::new(ax, ay), Point::new(bx, by)], depth, &mut out);
        prop_assert_eq!(out.points(), &[Point::new(ax, ay), Point::new(bx, by)][..]);
    }

    #[test]
    fn prop_cubic_has_two_pow_depth_segments(
        coords in prop::collection::vec(-50.0f64..50.0, 8),
        depth in 0u32..6,
    ) {
        let control: Vec<Point> = coords.chunks(2).map(|c| Point::new(c[0], c[1])).collect();
        prop_assume!(control[0] != control[3]);
        let mut out = PointAccumulator::new();
        tessellate::bezier(&control, depth, &mut out);

        prop_assert!(out.len() <= (1usize << depth) + 1);
        prop_assert_eq!(out.points()[0], control[0]);
        prop_assert_eq!(*out.points().last().unwrap(), control[3]);
    }
}

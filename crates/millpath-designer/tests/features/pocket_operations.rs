use millpath_core::{Point, Result, Tool, ToolRegistry};
use millpath_designer::font_manager::{GlyphOutliner, GlyphRequest};
use millpath_designer::pocket_operations::{contains_point, DEFAULT_SCAN_STEP};
use millpath_designer::{NodeKind, PathKind, PocketGenerator, Shape, ShapeContext, ShapeNode};

struct NoGlyphs;

impl GlyphOutliner for NoGlyphs {
    fn outline(&self, _request: &GlyphRequest<'_>) -> Result<Vec<Vec<Point>>> {
        Ok(Vec::new())
    }
}

fn square(x: f64, y: f64, size: f64) -> Vec<Point> {
    vec![
        Point::new(x, y),
        Point::new(x + size, y),
        Point::new(x + size, y + size),
        Point::new(x, y + size),
        Point::new(x, y),
    ]
}

#[test]
fn test_circle_pocket_stays_one_radius_inside() {
    let mut tools = ToolRegistry::new();
    tools.insert("flat-4", Tool::new(4.0).unwrap());
    let ctx = ShapeContext::new(&tools, &NoGlyphs);
    let node = ShapeNode::new(NodeKind::Circle)
        .child("center", "0,0")
        .child("radius", "50")
        .child("depth", "0,-1,1")
        .attribute("tool", "flat-4")
        .attribute("pocket", "true");
    let Some(Shape::Circle(circle)) = Shape::extract(&node, "disc", &ctx).unwrap() else {
        panic!("expected a circle");
    };
    let paths = Shape::Circle(circle.clone()).execute(&ctx).unwrap();
    let pocket = &paths.pockets[0];

    assert_eq!(pocket.kind, PathKind::Segments);
    let (radius, tool_radius) = (50.0f64, 2.0);
    // Radial distance between a chord midpoint and the true circle.
    let sagitta = radius * (1.0 - (circle.angle_step() / 2.0).cos());

    let runs = pocket.runs();
    assert!(runs.len() > 40);
    for segment in runs {
        let (entry, exit) = (segment[0], segment[1]);
        assert_eq!(entry.y, exit.y);
        assert!(entry.x <= exit.x);

        let half = (radius * radius - entry.y * entry.y).sqrt();
        // Sagitta measured along the scanline grows as the row nears the poles.
        let tolerance = DEFAULT_SCAN_STEP + sagitta * radius / half + 1e-9;
        let expected_entry = -half + tool_radius;
        let expected_exit = half - tool_radius;
        assert!(
            (entry.x - expected_entry).abs() <= tolerance,
            "entry {entry} off by {}",
            entry.x - expected_entry
        );
        assert!(
            (exit.x - expected_exit).abs() <= tolerance,
            "exit {exit} off by {}",
            exit.x - expected_exit
        );
    }
}

#[test]
fn test_rows_are_one_radius_apart() {
    let tool = Tool::new(2.0).unwrap();
    let pocket = PocketGenerator::default().generate("pocket", &square(0.0, 0.0, 10.0), &[], &tool);

    let rows: Vec<f64> = pocket.runs().iter().map(|run| run[0].y).collect();
    assert_eq!(rows.first(), Some(&1.0));
    for pair in rows.windows(2) {
        assert!((pair[1] - pair[0] - 1.0).abs() < 1e-9);
    }
}

#[test]
fn test_narrow_boundary_has_no_segments() {
    let tool = Tool::new(6.0).unwrap();
    let pocket = PocketGenerator::default().generate("slot", &square(0.0, 0.0, 4.0), &[], &tool);
    assert!(pocket.is_empty());
}

#[test]
fn test_hole_splits_rows() {
    let outer = square(0.0, 0.0, 30.0);
    let hole = square(10.0, 10.0, 10.0);
    let tool = Tool::new(2.0).unwrap();
    let pocket = PocketGenerator::default().generate("ring", &outer, &[hole.clone()], &tool);

    let across_hole: Vec<_> = pocket
        .runs()
        .into_iter()
        .filter(|run| run[0].y > 10.5 && run[0].y < 19.5)
        .collect();
    assert!(!across_hole.is_empty());
    for run in across_hole {
        for point in run {
            assert!(
                point.x <= 9.0 + 0.15 || point.x >= 21.0 - 0.15,
                "{point} cuts into the island"
            );
        }
    }
    assert!(contains_point(&Point::new(5.0, 5.0), &[outer.clone(), hole.clone()]));
    assert!(!contains_point(&Point::new(15.0, 15.0), &[outer, hole]));
}

#[test]
fn test_open_boundary_is_closed() {
    let open = vec![
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(10.0, 10.0),
        Point::new(0.0, 10.0),
    ];
    let tool = Tool::new(2.0).unwrap();
    let generator = PocketGenerator::default();
    assert_eq!(
        generator.generate("a", &open, &[], &tool).points,
        generator.generate("a", &square(0.0, 0.0, 10.0), &[], &tool).points
    );
}

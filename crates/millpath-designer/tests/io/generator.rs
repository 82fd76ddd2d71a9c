use millpath_core::{Error, Point, Program, ProgramEvent, Result, ShapeError, Tool, ToolRegistry};
use millpath_designer::font_manager::{GlyphOutliner, GlyphRequest};
use millpath_designer::{
    GeneratorSettings, NodeKind, ProgramGenerator, ShapeDocument, ShapeNode,
};
use millpath_settings::{Config, ErrorPolicy};
use tempfile::TempDir;

struct NoGlyphs;

impl GlyphOutliner for NoGlyphs {
    fn outline(&self, _request: &GlyphRequest<'_>) -> Result<Vec<Vec<Point>>> {
        Ok(Vec::new())
    }
}

fn generator(settings: GeneratorSettings) -> ProgramGenerator {
    let mut tools = ToolRegistry::new();
    tools.insert("flat-2", Tool::new(2.0).unwrap());
    ProgramGenerator::new(settings, tools).with_outliner(NoGlyphs)
}

fn line(x: f64) -> ShapeNode {
    ShapeNode::new(NodeKind::Line)
        .child("point", format!("{x},0"))
        .child("point", format!("{x},10"))
        .child("depth", "0,-1,1")
}

fn bad_circle() -> ShapeNode {
    ShapeNode::new(NodeKind::Circle)
        .named("broken")
        .child("center", "0,0")
        .child("radius", "5")
        .child("depth", "0,-1,0")
}

fn drain(rx: &mut tokio::sync::broadcast::Receiver<ProgramEvent>) -> Vec<ProgramEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[test]
fn test_generation_is_repeatable() {
    let document = ShapeDocument::new(vec![
        line(0.0),
        ShapeNode::new(NodeKind::Rectangle)
            .child("corner", "0,0")
            .child("corner", "12,8")
            .child("depth", "0,-1.5,0.5")
            .attribute("tool", "flat-2")
            .attribute("pocket", "true"),
    ]);
    let generator = generator(GeneratorSettings::default());
    let mut program = Program::new();

    generator.generate(&document, &mut program).unwrap();
    let first = program.to_gcode();
    generator.generate(&document, &mut program).unwrap();
    assert_eq!(program.to_gcode(), first);
}

#[test]
fn test_abort_keeps_earlier_shapes() {
    let document = ShapeDocument::new(vec![line(0.0), bad_circle(), line(5.0)]);
    let mut program = Program::new();
    let mut rx = program.subscribe();

    let err = generator(GeneratorSettings::default())
        .generate(&document, &mut program)
        .unwrap_err();

    match err {
        Error::Shape(ShapeError::InvalidArgument { shape, parameter, .. }) => {
            assert_eq!(shape, "broken");
            assert_eq!(parameter, "depth");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(program.len(), 6);
    assert_eq!(
        drain(&mut rx),
        vec![
            ProgramEvent::Cleared,
            ProgramEvent::LinesAppended { start: 0, count: 6 },
            ProgramEvent::PassFinished {
                lines: 6,
                succeeded: false
            },
        ]
    );
}

#[test]
fn test_skip_shape_policy_continues() {
    let settings = GeneratorSettings {
        error_policy: ErrorPolicy::SkipShape,
        ..GeneratorSettings::default()
    };
    let document = ShapeDocument::new(vec![line(0.0), bad_circle(), line(5.0)]);
    let mut program = Program::new();

    let report = generator(settings).generate(&document, &mut program).unwrap();

    assert_eq!(report.shapes.len(), 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].name, "broken");
    assert_eq!(report.line_count(), program.len());
    assert_eq!(program.len(), 12);
}

#[test]
fn test_events_for_successful_pass() {
    let document = ShapeDocument::new(vec![line(0.0), line(5.0)]);
    let mut program = Program::new();
    let mut rx = program.subscribe();

    generator(GeneratorSettings::default())
        .generate(&document, &mut program)
        .unwrap();

    assert_eq!(
        drain(&mut rx),
        vec![
            ProgramEvent::Cleared,
            ProgramEvent::LinesAppended { start: 0, count: 6 },
            ProgramEvent::LinesAppended { start: 6, count: 6 },
            ProgramEvent::PassFinished {
                lines: 12,
                succeeded: true
            },
        ]
    );
}

#[test]
fn test_translate_scopes_nest_and_close() {
    let document = ShapeDocument::new(vec![
        ShapeNode::new(NodeKind::Translate)
            .child("offset", "10,0")
            .node(
                ShapeNode::new(NodeKind::Translate)
                    .child("offset", "0,5")
                    .node(
                        ShapeNode::new(NodeKind::Drill)
                            .child("point", "1,1")
                            .child("depth", "0,-1,1"),
                    ),
            ),
        ShapeNode::new(NodeKind::Drill)
            .child("point", "1,1")
            .child("depth", "0,-1,1"),
    ]);
    let mut program = Program::new();
    let report = generator(GeneratorSettings::default())
        .generate(&document, &mut program)
        .unwrap();

    assert_eq!(report.shapes.len(), 2);
    assert_eq!(report.shapes[0].toolpaths.primary[0].points, vec![Point::new(11.0, 6.0)]);
    assert_eq!(report.shapes[1].toolpaths.primary[0].points, vec![Point::new(1.0, 1.0)]);
}

#[test]
fn test_bad_translate_offset_aborts() {
    let document = ShapeDocument::new(vec![ShapeNode::new(NodeKind::Translate)
        .child("offset", "ten,0")
        .node(line(0.0))]);
    let mut program = Program::new();
    let err = generator(GeneratorSettings::default())
        .generate(&document, &mut program)
        .unwrap_err();

    assert!(matches!(
        err.as_shape_error(),
        Some(ShapeError::InvalidNumber { .. })
    ));
    assert!(program.is_empty());
}

#[test]
fn test_unsupported_nodes_are_skipped() {
    let json = r#"{
        "nodes": [
            { "kind": "ellipse", "children": [ { "name": "center", "value": "0,0" } ] },
            { "kind": "drill", "children": [
                { "name": "point", "value": "2,2" },
                { "name": "depth", "value": "0,-1,1" }
            ] }
        ]
    }"#;
    let document = ShapeDocument::from_json(json).unwrap();
    let mut program = Program::new();
    let report = generator(GeneratorSettings::default())
        .generate(&document, &mut program)
        .unwrap();

    assert_eq!(report.shapes.len(), 1);
    assert_eq!(report.shapes[0].kind, NodeKind::Drill);
    assert!(report.skipped.is_empty());
}

#[test]
fn test_fragments_wrap_program() {
    let dir = TempDir::new().unwrap();
    let prologue = dir.path().join("start.nc");
    std::fs::write(&prologue, "G21\nG90").unwrap();

    let settings = GeneratorSettings {
        prologue: Some(prologue),
        epilogue: Some(dir.path().join("missing.nc")),
        ..GeneratorSettings::default()
    };
    let document = ShapeDocument::new(vec![ShapeNode::new(NodeKind::Drill)
        .child("point", "0,0")
        .child("depth", "0,-1,1")]);
    let mut program = Program::new();
    generator(settings).generate(&document, &mut program).unwrap();

    assert_eq!(program.prologue(), Some("G21\nG90"));
    assert_eq!(program.epilogue(), None);
    assert!(program.to_gcode().starts_with("G21\nG90\nG0 X0 Y0 Z5 ; drill 1\n"));
}

#[test]
fn test_settings_from_config() {
    let mut config = Config::default();
    config.machine.safety_height = 12.5;
    config.generation.error_policy = ErrorPolicy::SkipShape;
    config.tools.insert("flat-3".to_string(), 3.0);

    let generator = ProgramGenerator::from_config(&config).unwrap();
    assert_eq!(generator.settings().safety_height, 12.5);
    assert_eq!(generator.settings().error_policy, ErrorPolicy::SkipShape);
    assert_eq!(generator.tools().get("flat-3").map(|t| t.radius()), Some(1.5));
}

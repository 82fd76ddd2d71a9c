use millpath_core::{DepthRange, Point, Program, Result, ToolRegistry};
use millpath_designer::font_manager::{GlyphOutliner, GlyphRequest};
use millpath_designer::{
    GcodeEmitter, GeneratorSettings, NodeKind, ProgramGenerator, ShapeDocument, ShapeNode,
    ToolPath,
};

struct NoGlyphs;

impl GlyphOutliner for NoGlyphs {
    fn outline(&self, _request: &GlyphRequest<'_>) -> Result<Vec<Vec<Point>>> {
        Ok(Vec::new())
    }
}

fn generator() -> ProgramGenerator {
    ProgramGenerator::new(GeneratorSettings::default(), ToolRegistry::new()).with_outliner(NoGlyphs)
}

#[test]
fn test_line_then_drill_program_text() {
    let document = ShapeDocument::new(vec![
        ShapeNode::new(NodeKind::Line)
            .child("point", "0,0")
            .child("point", "10,0")
            .child("depth", "0,-1,0.5"),
        ShapeNode::new(NodeKind::Drill)
            .child("point", "20,5")
            .child("depth", "0,-3,1"),
    ]);
    let mut program = Program::new();
    generator().generate(&document, &mut program).unwrap();

    let expected = [
        "G0 X0 Y0 Z5 ; line 1",
        "G1 Z0",
        "G1 X10",
        "G1 Z-0.5",
        "G1 X0",
        "G1 Z-1",
        "G1 X10",
        "G0 Z5",
        "G0 X20 Y5 ; drill 2",
        "G1 Z0",
        "G1 Z-1",
        "G0 Z5",
    ];
    let mut text = expected.join("\n");
    text.push('\n');
    assert_eq!(program.to_gcode(), text);
}

#[test]
fn test_named_rectangle_passes() {
    let document = ShapeDocument::new(vec![ShapeNode::new(NodeKind::Rectangle)
        .named("frame")
        .child("corner", "0,0")
        .child("corner", "10,5")
        .child("depth", "-1,-2,1")]);
    let mut program = Program::new();
    generator().generate(&document, &mut program).unwrap();

    let lines: Vec<String> = program.lines().iter().map(|l| l.to_string()).collect();
    assert_eq!(
        lines,
        vec![
            "G0 X0 Y0 Z5 ; frame",
            "G1 Z-1",
            "G1 X10",
            "G1 Y5",
            "G1 X0",
            "G1 Y0",
            "G1 Z-2",
            "G1 Y5",
            "G1 X10",
            "G1 Y0",
            "G1 X0",
            "G0 Z5",
        ]
    );
}

#[test]
fn test_emitter_state_carries_across_paths() {
    let mut emitter = GcodeEmitter::new(5.0);
    let depth = DepthRange::new(0.0, 0.0, 1.0).unwrap();

    emitter.emit_path(&ToolPath::new("a", vec![Point::new(1.0, 1.0), Point::new(2.0, 1.0)]), &depth);
    let second = emitter.emit_path(&ToolPath::new("b", vec![Point::new(2.0, 3.0)]), &depth);

    assert_eq!(second[0].to_string(), "G0 Y3 ; b");
    assert_eq!(emitter.position(), (Some(2.0), Some(3.0), Some(5.0)));
}

#[test]
fn test_every_line_starts_with_motion_command() {
    let document = ShapeDocument::new(vec![ShapeNode::new(NodeKind::Circle)
        .child("center", "0,0")
        .child("radius", "5")
        .child("depth", "0,-0.3,0.1")]);
    let mut program = Program::new();
    generator().generate(&document, &mut program).unwrap();

    assert!(!program.is_empty());
    for line in program.lines() {
        let command = line.value('G').expect("motion command");
        assert!(command == 0.0 || command == 1.0);
    }
}

#[test]
fn test_shape_name_cannot_add_program_lines() {
    let document = ShapeDocument::new(vec![ShapeNode::new(NodeKind::Drill)
        .named("hole\nG1 Z-50")
        .child("point", "0,0")
        .child("depth", "0,-1,1")]);
    let mut program = Program::new();
    generator().generate(&document, &mut program).unwrap();

    let gcode = program.to_gcode();
    assert_eq!(program.len(), 4);
    assert_eq!(gcode.lines().count(), 4);
    assert_eq!(gcode.lines().next(), Some("G0 X0 Y0 Z5 ; hole G1 Z-50"));
    assert!(!gcode.lines().any(|l| l.starts_with("G1 Z-50")));
}

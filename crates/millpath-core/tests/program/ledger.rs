use millpath_core::{EventDispatcher, Program, ProgramEvent, ProgramLine};

fn line(x: f64) -> ProgramLine {
    ProgramLine::new().with_field('G', 1.0).with_field('X', x)
}

#[test]
fn test_clear_drops_fragments() {
    let mut program = Program::new();
    program.set_prologue(Some("G21".to_string()));
    program.append(vec![line(1.0)]);
    program.clear();

    assert!(program.prologue().is_none());
    assert_eq!(program.to_gcode(), "");
}

#[test]
fn test_shared_dispatcher_reaches_subscriber() {
    let dispatcher = EventDispatcher::new(16);
    let mut rx = dispatcher.subscribe();
    let mut program = Program::with_dispatcher(dispatcher);

    program.append(vec![line(1.0), line(2.0)]);
    program.finish_pass(false);

    assert_eq!(
        rx.try_recv().unwrap(),
        ProgramEvent::LinesAppended { start: 0, count: 2 }
    );
    assert_eq!(
        rx.try_recv().unwrap(),
        ProgramEvent::PassFinished {
            lines: 2,
            succeeded: false
        }
    );
}

#[test]
fn test_rendering_is_stable() {
    let mut program = Program::new();
    program.append(vec![line(0.5), line(-12.125).with_comment("edge")]);
    let first = program.to_gcode();
    assert_eq!(first, "G1 X0.5\nG1 X-12.125 ; edge\n");
    assert_eq!(first, program.to_gcode());
}

#[test]
fn test_comment_line_breaks_stay_on_one_line() {
    let mut program = Program::new();
    program.append(vec![line(0.0).with_comment("hole\nG1 Z-50\r\nM30")]);

    let gcode = program.to_gcode();
    assert_eq!(gcode.lines().count(), program.len());
    assert_eq!(gcode, "G1 X0 ; hole G1 Z-50  M30\n");
}

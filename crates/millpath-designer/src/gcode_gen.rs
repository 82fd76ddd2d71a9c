//! G-code generation from toolpaths.
//!
//! The emitter remembers the last value it wrote for each axis and leaves an
//! axis out of a line when its rounded value has not changed. The motion
//! command is always written.

use crate::toolpath::{PathKind, ToolPath};
use millpath_core::{round_value, DepthRange, Point, ProgramLine};

const RAPID: f64 = 0.0;
const FEED: f64 = 1.0;

/// Differential G-code emitter for one generation pass.
#[derive(Debug, Clone)]
pub struct GcodeEmitter {
    /// Safe Z height for rapid moves between paths
    pub safety_height: f64,
    last_x: Option<f64>,
    last_y: Option<f64>,
    last_z: Option<f64>,
}

impl GcodeEmitter {
    /// Creates an emitter with no axis position known yet.
    pub fn new(safety_height: f64) -> Self {
        Self {
            safety_height,
            last_x: None,
            last_y: None,
            last_z: None,
        }
    }

    /// Last emitted `(X, Y, Z)`.
    pub fn position(&self) -> (Option<f64>, Option<f64>, Option<f64>) {
        (self.last_x, self.last_y, self.last_z)
    }

    /// Emits every pass of a toolpath at the depths of `depth`.
    ///
    /// A continuous path is one run; a segment path is one run per segment.
    /// Each run is: rapid to its first point at safety height, then for each
    /// pass a plunge and a traverse (alternating direction), then a rapid
    /// retract. The first rapid carries the path name as comment.
    pub fn emit_path(&mut self, path: &ToolPath, depth: &DepthRange) -> Vec<ProgramLine> {
        let passes = depth.pass_depths();
        let mut lines = Vec::new();

        for (index, run) in path.runs().into_iter().enumerate() {
            let comment = (index == 0).then(|| path.name.clone());
            self.emit_run(run, &passes, comment, &mut lines);
        }

        if path.kind == PathKind::Segments {
            tracing::trace!(
                "Pocket '{}' emitted {} lines over {} segments",
                path.name,
                lines.len(),
                path.runs().len()
            );
        }
        lines
    }

    fn emit_run(
        &mut self,
        run: &[Point],
        passes: &[f64],
        comment: Option<String>,
        lines: &mut Vec<ProgramLine>,
    ) {
        let Some(first) = run.first() else {
            return;
        };

        let mut line = self.motion(RAPID, Some(first.x), Some(first.y), Some(self.safety_height));
        line.comment = comment;
        lines.push(line);

        for (pass, &z) in passes.iter().enumerate() {
            let ordered: Vec<&Point> = if pass % 2 == 0 {
                run.iter().collect()
            } else {
                run.iter().rev().collect()
            };
            let entry = ordered[0];
            lines.push(self.motion(FEED, Some(entry.x), Some(entry.y), Some(z)));
            for point in &ordered[1..] {
                lines.push(self.motion(FEED, Some(point.x), Some(point.y), None));
            }
        }

        lines.push(self.motion(RAPID, None, None, Some(self.safety_height)));
    }

    /// Builds one motion line, writing only the axes that changed.
    pub fn motion(&mut self, command: f64, x: Option<f64>, y: Option<f64>, z: Option<f64>) -> ProgramLine {
        let mut line = ProgramLine::new().with_field('G', command);
        for (letter, value, last) in [
            ('X', x, &mut self.last_x),
            ('Y', y, &mut self.last_y),
            ('Z', z, &mut self.last_z),
        ] {
            let Some(value) = value else {
                continue;
            };
            let rounded = round_value(value);
            if *last != Some(rounded) {
                line = line.with_field(letter, rounded);
                *last = Some(rounded);
            }
        }
        line
    }
}

//! A [`DrawSurface`] that records calls instead of drawing them.
//!
//! Used to assert exactly what an effect asked the backend to draw (how many
//! connection lines, at which opacity) without depending on rasterization.

use glam::DVec2;

use crate::color::Rgba;
use crate::draw::{DrawSurface, Paint};
use crate::surface::Surface;

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Resize(Surface),
    Clear,
    Circle {
        center: DVec2,
        radius: f64,
        color: Rgba,
        glow: f64,
    },
    Line {
        from: DVec2,
        to: DVec2,
        width: f64,
        color: Rgba,
    },
    Path {
        points: Vec<DVec2>,
        paint: Paint,
    },
}

/// Records every call in order. Colors are stored already clamped, the way a
/// real backend would receive them.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    size: Surface,
    commands: Vec<DrawCommand>,
}

impl Recorder {
    pub fn new(size: Surface) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    pub fn size(&self) -> Surface {
        self.size
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Returns the recorded commands, leaving the log empty.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Recorded lines as `(from, to, color)`.
    pub fn lines(&self) -> impl Iterator<Item = (DVec2, DVec2, Rgba)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Line { from, to, color, .. } => Some((*from, *to, *color)),
            _ => None,
        })
    }

    /// Recorded circles as `(center, radius, color)`.
    pub fn circles(&self) -> impl Iterator<Item = (DVec2, f64, Rgba)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Circle {
                center,
                radius,
                color,
                ..
            } => Some((*center, *radius, *color)),
            _ => None,
        })
    }
}

impl DrawSurface for Recorder {
    fn resize(&mut self, size: Surface) {
        self.size = size;
        self.commands.push(DrawCommand::Resize(size));
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba, glow: f64) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color: color.clamped(),
            glow,
        });
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color: color.clamped(),
        });
    }

    fn fill_path(&mut self, points: &[DVec2], paint: &Paint) {
        self.commands.push(DrawCommand::Path {
            points: points.to_vec(),
            paint: paint.clone(),
        });
    }
}

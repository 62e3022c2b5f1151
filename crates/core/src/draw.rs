//! The drawing-surface abstraction every effect renders through.
//!
//! The operations mirror the subset of the 2D canvas API the effects need, so
//! the browser backend is a thin translation while [`Raster`](crate::raster::Raster)
//! and [`Recorder`](crate::record::Recorder) implement the same calls on the CPU.

use glam::DVec2;

use crate::color::Rgba;
use crate::surface::Surface;

/// A color stop of a [`LinearGradient`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    /// Position along the gradient axis in [0, 1].
    pub offset: f64,
    pub color: Rgba,
}

/// Linear gradient between two points, sampled by projection onto the axis.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: DVec2,
    pub end: DVec2,
    stops: Vec<ColorStop>,
}

impl LinearGradient {
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Self {
            start,
            end,
            stops: Vec::new(),
        }
    }

    /// Adds a stop, keeping stops ordered by offset. Offsets are clamped to [0, 1].
    pub fn with_stop(mut self, offset: f64, color: Rgba) -> Self {
        let offset = offset.clamp(0.0, 1.0);
        let idx = self.stops.partition_point(|s| s.offset <= offset);
        self.stops.insert(idx, ColorStop { offset, color });
        self
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Color at parameter `t` along the axis (clamped to [0, 1]).
    ///
    /// Before the first stop and after the last, the end colors extend.
    /// A gradient with no stops is transparent.
    pub fn sample(&self, t: f64) -> Rgba {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return Rgba::TRANSPARENT,
        };
        if t <= first.offset {
            return first.color;
        }
        if t >= last.offset {
            return last.color;
        }
        let idx = self.stops.partition_point(|s| s.offset <= t);
        let (lo, hi) = (&self.stops[idx - 1], &self.stops[idx]);
        let span = hi.offset - lo.offset;
        if span <= 0.0 {
            return hi.color;
        }
        lo.color.lerp(hi.color, (t - lo.offset) / span)
    }

    /// Color at a point on the surface.
    pub fn color_at(&self, point: DVec2) -> Rgba {
        let axis = self.end - self.start;
        let len2 = axis.length_squared();
        if len2 == 0.0 {
            return self.sample(0.0);
        }
        self.sample((point - self.start).dot(axis) / len2)
    }
}

/// How a filled path is colored.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Linear(LinearGradient),
}

impl Paint {
    /// Color at a point on the surface.
    pub fn color_at(&self, point: DVec2) -> Rgba {
        match self {
            Paint::Solid(c) => *c,
            Paint::Linear(g) => g.color_at(point),
        }
    }
}

/// A 2D drawing surface.
///
/// Colors passed in may carry out-of-range alpha; implementations clamp.
pub trait DrawSurface {
    /// Resizes the backing store. Contents are discarded.
    fn resize(&mut self, size: Surface);

    /// Clears every pixel to transparent.
    fn clear(&mut self);

    /// Fills a disc. A positive `glow` adds a soft halo of that blur radius
    /// in the same color.
    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba, glow: f64);

    /// Strokes a straight line segment.
    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba);

    /// Fills the closed polygon through `points` (non-zero winding).
    fn fill_path(&mut self, points: &[DVec2], paint: &Paint);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Srgb;

    fn red(a: f64) -> Rgba {
        Srgb::from_rgb8(255, 0, 0).with_alpha(a)
    }

    fn blue(a: f64) -> Rgba {
        Srgb::from_rgb8(0, 0, 255).with_alpha(a)
    }

    fn horizontal() -> LinearGradient {
        LinearGradient::new(DVec2::ZERO, DVec2::new(100.0, 0.0))
            .with_stop(0.0, red(1.0))
            .with_stop(1.0, blue(1.0))
    }

    #[test]
    fn stops_are_kept_sorted() {
        let g = LinearGradient::new(DVec2::ZERO, DVec2::X)
            .with_stop(1.0, red(1.0))
            .with_stop(0.0, blue(1.0))
            .with_stop(0.5, red(0.5));
        let offsets: Vec<f64> = g.stops().iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn sample_hits_stops_exactly() {
        let g = horizontal();
        assert_eq!(g.sample(0.0), red(1.0));
        assert_eq!(g.sample(1.0), blue(1.0));
    }

    #[test]
    fn sample_interpolates_between_stops() {
        let mid = horizontal().sample(0.5);
        assert!((mid.r - 0.5).abs() < 1e-12);
        assert!((mid.b - 0.5).abs() < 1e-12);
    }

    #[test]
    fn color_at_projects_onto_axis() {
        let g = horizontal();
        // Vertical offset does not matter for a horizontal gradient.
        assert_eq!(g.color_at(DVec2::new(50.0, 0.0)), g.color_at(DVec2::new(50.0, 80.0)));
        assert_eq!(g.color_at(DVec2::new(-20.0, 0.0)), red(1.0));
        assert_eq!(g.color_at(DVec2::new(140.0, 0.0)), blue(1.0));
    }

    #[test]
    fn empty_gradient_is_transparent() {
        let g = LinearGradient::new(DVec2::ZERO, DVec2::X);
        assert_eq!(g.sample(0.3), Rgba::TRANSPARENT);
    }

    #[test]
    fn degenerate_axis_uses_first_stop() {
        let g = LinearGradient::new(DVec2::ONE, DVec2::ONE)
            .with_stop(0.0, red(1.0))
            .with_stop(1.0, blue(1.0));
        assert_eq!(g.color_at(DVec2::new(9.0, 9.0)), red(1.0));
    }

    #[test]
    fn solid_paint_is_uniform() {
        let p = Paint::Solid(red(0.4));
        assert_eq!(p.color_at(DVec2::ZERO), p.color_at(DVec2::new(1e3, -1e3)));
    }
}

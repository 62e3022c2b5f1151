//! CPU implementation of [`DrawSurface`].
//!
//! A [`Raster`] is a straight-alpha RGBA buffer composited with source-over,
//! the canvas default. It is what the CLI renders snapshots into and what the
//! tests inspect pixel by pixel. Antialiasing is a one-pixel linear ramp on
//! shape edges; polygon fills sample pixel centers.

use glam::DVec2;

use crate::color::Rgba;
use crate::draw::{DrawSurface, Paint};
use crate::geometry::{coverage, segment_distance};
use crate::surface::Surface;

/// Fraction of the disc color's alpha carried by the inner edge of a glow halo.
const GLOW_STRENGTH: f64 = 0.5;

/// Straight-alpha RGBA pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    size: Surface,
    pixels: Vec<Rgba>,
}

impl Raster {
    /// Creates a transparent raster.
    pub fn new(size: Surface) -> Self {
        Self {
            size,
            pixels: vec![Rgba::TRANSPARENT; pixel_count(size)],
        }
    }

    pub fn size(&self) -> Surface {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Row-major pixel data.
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.size.width as usize + x as usize)
            .copied()
    }

    /// Sum of alpha over all pixels; a cheap "how much was drawn" measure.
    pub fn total_alpha(&self) -> f64 {
        self.pixels.iter().map(|p| p.a).sum()
    }

    /// Composites `color` at `coverage` onto pixel `(x, y)` with source-over.
    fn blend(&mut self, x: i64, y: i64, color: Rgba, coverage: f64) {
        if x < 0 || y < 0 || x >= i64::from(self.size.width) || y >= i64::from(self.size.height) {
            return;
        }
        let src = color.clamped();
        let sa = src.a * coverage.clamp(0.0, 1.0);
        if sa <= 0.0 {
            return;
        }
        let idx = y as usize * self.size.width as usize + x as usize;
        let dst = self.pixels[idx];
        let out_a = sa + dst.a * (1.0 - sa);
        let mix = |s: f64, d: f64| (s * sa + d * dst.a * (1.0 - sa)) / out_a;
        self.pixels[idx] = Rgba {
            r: mix(src.r, dst.r),
            g: mix(src.g, dst.g),
            b: mix(src.b, dst.b),
            a: out_a,
        };
    }

    /// Integer pixel bounds covering `[min, max]`, clipped to the raster.
    fn clip(&self, min: DVec2, max: DVec2) -> Option<(i64, i64, i64, i64)> {
        if self.size.is_empty() {
            return None;
        }
        let x0 = (min.x.floor() as i64).max(0);
        let y0 = (min.y.floor() as i64).max(0);
        let x1 = (max.x.ceil() as i64).min(i64::from(self.size.width) - 1);
        let y1 = (max.y.ceil() as i64).min(i64::from(self.size.height) - 1);
        (x0 <= x1 && y0 <= y1).then_some((x0, y0, x1, y1))
    }
}

fn pixel_count(size: Surface) -> usize {
    size.width as usize * size.height as usize
}

fn center(x: i64, y: i64) -> DVec2 {
    DVec2::new(x as f64 + 0.5, y as f64 + 0.5)
}

impl DrawSurface for Raster {
    fn resize(&mut self, size: Surface) {
        self.size = size;
        self.pixels = vec![Rgba::TRANSPARENT; pixel_count(size)];
    }

    fn clear(&mut self) {
        self.pixels.fill(Rgba::TRANSPARENT);
    }

    fn fill_circle(&mut self, c: DVec2, radius: f64, color: Rgba, glow: f64) {
        if radius.is_nan() || radius <= 0.0 {
            return;
        }
        let glow = glow.max(0.0);
        let reach = radius + glow + 1.0;
        let Some((x0, y0, x1, y1)) = self.clip(c - DVec2::splat(reach), c + DVec2::splat(reach))
        else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = center(x, y).distance(c);
                if glow > 0.0 && d > radius && d < radius + glow {
                    let t = 1.0 - (d - radius) / glow;
                    self.blend(x, y, color, GLOW_STRENGTH * t * t);
                }
                let cov = coverage(d, radius);
                if cov > 0.0 {
                    self.blend(x, y, color, cov);
                }
            }
        }
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba) {
        if width.is_nan() || width <= 0.0 {
            return;
        }
        let half = width / 2.0;
        let pad = DVec2::splat(half + 1.0);
        let Some((x0, y0, x1, y1)) = self.clip(from.min(to) - pad, from.max(to) + pad) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let cov = coverage(segment_distance(center(x, y), from, to), half);
                if cov > 0.0 {
                    self.blend(x, y, color, cov);
                }
            }
        }
    }

    fn fill_path(&mut self, points: &[DVec2], paint: &Paint) {
        if points.len() < 3 {
            return;
        }
        let (min, max) = points
            .iter()
            .fold((points[0], points[0]), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        let Some((x0, y0, x1, y1)) = self.clip(min, max) else {
            return;
        };
        let mut crossings: Vec<(f64, i32)> = Vec::new();
        for y in y0..=y1 {
            let yc = y as f64 + 0.5;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                if (a.y <= yc) != (b.y <= yc) {
                    let x = a.x + (yc - a.y) * (b.x - a.x) / (b.y - a.y);
                    let dir = if b.y > a.y { 1 } else { -1 };
                    crossings.push((x, dir));
                }
            }
            crossings.sort_by(|l, r| l.0.total_cmp(&r.0));
            let mut winding = 0;
            for pair in crossings.windows(2) {
                winding += pair[0].1;
                if winding == 0 {
                    continue;
                }
                let (start, end) = (pair[0].0, pair[1].0);
                let first = ((start - 0.5).ceil() as i64).max(x0);
                let last = ((end - 0.5).ceil() as i64 - 1).min(x1);
                for x in first..=last {
                    let c = paint.color_at(center(x, y));
                    self.blend(x, y, c, 1.0);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Srgb;
    use crate::draw::LinearGradient;

    fn accent(a: f64) -> Rgba {
        Srgb::from_rgb8(0, 212, 255).with_alpha(a)
    }

    fn raster(w: u32, h: u32) -> Raster {
        Raster::new(Surface::new(w, h))
    }

    #[test]
    fn new_raster_is_transparent() {
        let r = raster(8, 4);
        assert_eq!(r.pixels().len(), 32);
        assert_eq!(r.total_alpha(), 0.0);
    }

    #[test]
    fn pixel_outside_is_none() {
        let r = raster(4, 4);
        assert!(r.pixel(4, 0).is_none());
        assert!(r.pixel(0, 4).is_none());
        assert!(r.pixel(3, 3).is_some());
    }

    #[test]
    fn fill_circle_covers_center_not_corner() {
        let mut r = raster(20, 20);
        r.fill_circle(DVec2::new(10.0, 10.0), 3.0, accent(1.0), 0.0);
        assert!((r.pixel(10, 10).unwrap().a - 1.0).abs() < 1e-12);
        assert_eq!(r.pixel(0, 0).unwrap().a, 0.0);
    }

    #[test]
    fn glow_extends_beyond_radius() {
        let mut plain = raster(40, 40);
        let mut glowing = raster(40, 40);
        let c = DVec2::new(20.0, 20.0);
        plain.fill_circle(c, 2.0, accent(1.0), 0.0);
        glowing.fill_circle(c, 2.0, accent(1.0), 15.0);
        assert_eq!(plain.pixel(28, 20).unwrap().a, 0.0);
        assert!(glowing.pixel(28, 20).unwrap().a > 0.0);
        assert!(glowing.total_alpha() > plain.total_alpha());
    }

    #[test]
    fn zero_alpha_draws_nothing() {
        let mut r = raster(10, 10);
        r.fill_circle(DVec2::new(5.0, 5.0), 3.0, accent(0.0), 15.0);
        r.stroke_line(DVec2::ZERO, DVec2::new(9.0, 9.0), 1.0, accent(0.0));
        assert_eq!(r.total_alpha(), 0.0);
    }

    #[test]
    fn negative_alpha_is_clamped_not_subtracted() {
        let mut r = raster(10, 10);
        r.fill_circle(DVec2::new(5.0, 5.0), 3.0, accent(1.0), 0.0);
        let before = r.total_alpha();
        r.fill_circle(DVec2::new(5.0, 5.0), 3.0, accent(-0.5), 0.0);
        assert_eq!(r.total_alpha(), before);
    }

    #[test]
    fn source_over_accumulates_alpha() {
        let mut r = raster(1, 1);
        r.fill_circle(DVec2::new(0.5, 0.5), 5.0, accent(0.5), 0.0);
        r.fill_circle(DVec2::new(0.5, 0.5), 5.0, accent(0.5), 0.0);
        assert!((r.pixel(0, 0).unwrap().a - 0.75).abs() < 1e-12);
    }

    #[test]
    fn stroke_line_marks_pixels_along_segment() {
        let mut r = raster(20, 5);
        r.stroke_line(DVec2::new(0.0, 2.5), DVec2::new(20.0, 2.5), 1.0, accent(1.0));
        for x in 0..20 {
            assert!(r.pixel(x, 2).unwrap().a > 0.9, "pixel {x} not stroked");
            assert_eq!(r.pixel(x, 0).unwrap().a, 0.0);
        }
    }

    #[test]
    fn fill_path_fills_rectangle_interior() {
        let mut r = raster(10, 10);
        let rect = [
            DVec2::new(2.0, 2.0),
            DVec2::new(8.0, 2.0),
            DVec2::new(8.0, 8.0),
            DVec2::new(2.0, 8.0),
        ];
        r.fill_path(&rect, &Paint::Solid(accent(1.0)));
        assert_eq!(r.pixel(5, 5).unwrap().a, 1.0);
        assert_eq!(r.pixel(2, 2).unwrap().a, 1.0);
        assert_eq!(r.pixel(7, 7).unwrap().a, 1.0);
        assert_eq!(r.pixel(8, 5).unwrap().a, 0.0);
        assert_eq!(r.pixel(1, 5).unwrap().a, 0.0);
        let filled = r.pixels().iter().filter(|p| p.a > 0.0).count();
        assert_eq!(filled, 36);
    }

    #[test]
    fn fill_path_with_gradient_varies_across_axis() {
        let mut r = raster(100, 4);
        let rect = [
            DVec2::new(0.0, 0.0),
            DVec2::new(100.0, 0.0),
            DVec2::new(100.0, 4.0),
            DVec2::new(0.0, 4.0),
        ];
        let g = LinearGradient::new(DVec2::ZERO, DVec2::new(100.0, 0.0))
            .with_stop(0.0, Srgb::from_rgb8(255, 0, 0).with_alpha(1.0))
            .with_stop(1.0, Srgb::from_rgb8(0, 0, 255).with_alpha(1.0));
        r.fill_path(&rect, &Paint::Linear(g));
        let left = r.pixel(0, 1).unwrap();
        let right = r.pixel(99, 1).unwrap();
        assert!(left.r > 0.95 && left.b < 0.05);
        assert!(right.b > 0.95 && right.r < 0.05);
    }

    #[test]
    fn fill_path_ignores_degenerate_input() {
        let mut r = raster(10, 10);
        r.fill_path(&[DVec2::ZERO, DVec2::ONE], &Paint::Solid(accent(1.0)));
        assert_eq!(r.total_alpha(), 0.0);
    }

    #[test]
    fn drawing_on_empty_raster_is_noop() {
        let mut r = raster(0, 0);
        r.fill_circle(DVec2::ZERO, 3.0, accent(1.0), 15.0);
        r.fill_path(
            &[DVec2::ZERO, DVec2::X, DVec2::ONE],
            &Paint::Solid(accent(1.0)),
        );
        assert!(r.pixels().is_empty());
    }

    #[test]
    fn resize_discards_contents() {
        let mut r = raster(10, 10);
        r.fill_circle(DVec2::new(5.0, 5.0), 3.0, accent(1.0), 0.0);
        r.resize(Surface::new(6, 3));
        assert_eq!(r.size(), Surface::new(6, 3));
        assert_eq!(r.pixels().len(), 18);
        assert_eq!(r.total_alpha(), 0.0);
    }

    #[test]
    fn clear_keeps_size() {
        let mut r = raster(10, 10);
        r.fill_circle(DVec2::new(5.0, 5.0), 3.0, accent(1.0), 0.0);
        r.clear();
        assert_eq!(r.size(), Surface::new(10, 10));
        assert_eq!(r.total_alpha(), 0.0);
    }
}

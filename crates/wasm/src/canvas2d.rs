//! [`DrawSurface`] over a browser `CanvasRenderingContext2d`.

use std::f64::consts::TAU;

use driftfield_core::{DVec2, DrawSurface, EngineError, Paint, Rgba, Surface};
use log::warn;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

/// A canvas element and its 2D context.
pub struct Canvas2d {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Canvas2d {
    /// Wraps `canvas`, acquiring its 2D context.
    ///
    /// Returns `EngineError::SurfaceUnavailable` if the context is missing.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, EngineError> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|obj| obj.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or_else(|| EngineError::SurfaceUnavailable("no 2d context".into()))?;
        Ok(Self { canvas, ctx })
    }

    /// Locates the canvas with id `id` in `document`.
    pub fn by_id(document: &Document, id: &str) -> Result<Self, EngineError> {
        let canvas = document
            .get_element_by_id(id)
            .ok_or_else(|| EngineError::SurfaceUnavailable(format!("no element #{id}")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| EngineError::SurfaceUnavailable(format!("#{id} is not a canvas")))?;
        Self::new(canvas)
    }

    pub fn element(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn trace_path(&self, points: &[DVec2]) {
        self.ctx.begin_path();
        if let Some((first, rest)) = points.split_first() {
            self.ctx.move_to(first.x, first.y);
            for p in rest {
                self.ctx.line_to(p.x, p.y);
            }
        }
        self.ctx.close_path();
    }
}

impl DrawSurface for Canvas2d {
    fn resize(&mut self, size: Surface) {
        self.canvas.set_width(size.width);
        self.canvas.set_height(size.height);
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba, glow: f64) {
        if radius.is_nan() || radius <= 0.0 {
            return;
        }
        let css = color.to_css();
        self.ctx.save();
        if glow > 0.0 {
            self.ctx.set_shadow_blur(glow);
            self.ctx.set_shadow_color(&css);
        }
        self.ctx.set_fill_style_str(&css);
        self.ctx.begin_path();
        if let Err(e) = self.ctx.arc(center.x, center.y, radius, 0.0, TAU) {
            warn!("driftfield: arc rejected: {e:?}");
        } else {
            self.ctx.fill();
        }
        self.ctx.restore();
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba) {
        self.ctx.save();
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width);
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
        self.ctx.restore();
    }

    fn fill_path(&mut self, points: &[DVec2], paint: &Paint) {
        if points.len() < 3 {
            return;
        }
        self.ctx.save();
        match paint {
            Paint::Solid(color) => self.ctx.set_fill_style_str(&color.to_css()),
            Paint::Linear(g) => {
                let gradient = self
                    .ctx
                    .create_linear_gradient(g.start.x, g.start.y, g.end.x, g.end.y);
                for stop in g.stops() {
                    if let Err(e) = gradient.add_color_stop(stop.offset as f32, &stop.color.to_css()) {
                        warn!("driftfield: rejected gradient stop: {e:?}");
                    }
                }
                self.ctx.set_fill_style_canvas_gradient(&gradient);
            }
        }
        self.trace_path(points);
        self.ctx.fill();
        self.ctx.restore();
    }
}

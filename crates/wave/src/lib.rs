#![deny(unsafe_code)]
//! Wave background effect.
//!
//! A single flowing band: the top edge follows
//! `y = height/2 + sin(x/wavelength + time) * amplitude`, sampled every
//! `spacing` pixels, and the band is filled down to the bottom of the surface
//! with a faint horizontal accent → secondary → accent gradient. The only
//! state is the elapsed time, advanced once per frame.

use driftfield_core::error::EngineError;
use driftfield_core::params::param_f64;
use driftfield_core::{
    DVec2, DrawSurface, Effect, LinearGradient, Paint, Surface, Theme, Viewport,
};
use log::{debug, trace};
use serde_json::{json, Value};

/// Time advance per frame.
const DEFAULT_TIME_STEP: f64 = 0.01;
/// Horizontal distance between samples of the wave edge.
const DEFAULT_SPACING: f64 = 50.0;
/// Divisor of `x` inside the sine.
const DEFAULT_WAVELENGTH: f64 = 200.0;
/// Vertical swing of the edge around mid-height.
const DEFAULT_AMPLITUDE: f64 = 100.0;
/// Alpha of every gradient stop.
const DEFAULT_GRADIENT_ALPHA: f64 = 0.1;

/// Tunable constants of the wave band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    pub time_step: f64,
    pub spacing: f64,
    pub wavelength: f64,
    pub amplitude: f64,
    pub gradient_alpha: f64,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            time_step: DEFAULT_TIME_STEP,
            spacing: DEFAULT_SPACING,
            wavelength: DEFAULT_WAVELENGTH,
            amplitude: DEFAULT_AMPLITUDE,
            gradient_alpha: DEFAULT_GRADIENT_ALPHA,
        }
    }
}

impl WaveParams {
    /// Extracts parameters from a JSON object, falling back to defaults, and
    /// validates the result.
    pub fn from_json(params: &Value) -> Result<Self, EngineError> {
        let parsed = Self {
            time_step: param_f64(params, "time_step", DEFAULT_TIME_STEP),
            spacing: param_f64(params, "spacing", DEFAULT_SPACING),
            wavelength: param_f64(params, "wavelength", DEFAULT_WAVELENGTH),
            amplitude: param_f64(params, "amplitude", DEFAULT_AMPLITUDE),
            gradient_alpha: param_f64(params, "gradient_alpha", DEFAULT_GRADIENT_ALPHA),
        };
        parsed.validate()?;
        Ok(parsed)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let invalid = |name: &str, reason: &str| EngineError::InvalidParam {
            name: name.to_string(),
            reason: reason.to_string(),
        };
        if !self.time_step.is_finite() {
            return Err(invalid("time_step", "must be finite"));
        }
        // Sampling loops on spacing; it must advance.
        if !(self.spacing.is_finite() && self.spacing >= 1.0) {
            return Err(invalid("spacing", "must be at least 1"));
        }
        if !(self.wavelength.is_finite() && self.wavelength > 0.0) {
            return Err(invalid("wavelength", "must be positive"));
        }
        if !self.amplitude.is_finite() {
            return Err(invalid("amplitude", "must be finite"));
        }
        if !(0.0..=1.0).contains(&self.gradient_alpha) {
            return Err(invalid("gradient_alpha", "must be in [0, 1]"));
        }
        Ok(())
    }
}

/// The wave band: surface dimensions plus elapsed time.
pub struct WaveBackground {
    surface: Surface,
    time: f64,
    params: WaveParams,
    theme: Theme,
}

impl WaveBackground {
    /// Sizes the background to `viewport` with time at zero.
    pub fn new(viewport: &dyn Viewport, params: WaveParams) -> Result<Self, EngineError> {
        params.validate()?;
        let mut wave = Self {
            surface: Surface::default(),
            time: 0.0,
            params,
            theme: Theme::default(),
        };
        wave.resize(viewport);
        Ok(wave)
    }

    pub fn from_json(viewport: &dyn Viewport, json_params: &Value) -> Result<Self, EngineError> {
        Self::new(viewport, WaveParams::from_json(json_params)?)
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Stores the viewport's current size.
    pub fn resize(&mut self, viewport: &dyn Viewport) {
        let size = viewport.size();
        if size != self.surface {
            debug!("wave surface {}x{}", size.width, size.height);
        }
        self.surface = size;
    }

    /// Elapsed animation time.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn wave_params(&self) -> &WaveParams {
        &self.params
    }

    /// Height of the wave edge at `x` for the current time.
    pub fn edge_y(&self, x: f64) -> f64 {
        let mid = f64::from(self.surface.height) / 2.0;
        mid + (x / self.params.wavelength + self.time).sin() * self.params.amplitude
    }

    /// Outline of the band: edge samples at `x = 0, spacing, …` up to and
    /// including the first sample at or past the right edge, then the
    /// bottom-right and bottom-left corners.
    pub fn wave_points(&self) -> Vec<DVec2> {
        let extent = self.surface.extent();
        let mut points = Vec::new();
        let mut k = 0_u32;
        loop {
            let x = f64::from(k) * self.params.spacing;
            points.push(DVec2::new(x, self.edge_y(x)));
            if x >= extent.x {
                break;
            }
            k += 1;
        }
        points.push(extent);
        points.push(DVec2::new(0.0, extent.y));
        points
    }

    /// Horizontal accent → secondary → accent gradient across the surface.
    pub fn gradient(&self) -> LinearGradient {
        let alpha = self.params.gradient_alpha;
        let accent = self.theme.accent.with_alpha(alpha);
        LinearGradient::new(DVec2::ZERO, DVec2::new(self.surface.extent().x, 0.0))
            .with_stop(0.0, accent)
            .with_stop(0.5, self.theme.secondary.with_alpha(alpha))
            .with_stop(1.0, accent)
    }

    /// Advances time, clears, and fills the band.
    pub fn tick(&mut self, canvas: &mut dyn DrawSurface) {
        self.time += self.params.time_step;
        canvas.clear();
        if self.surface.is_empty() {
            return;
        }
        let points = self.wave_points();
        canvas.fill_path(&points, &Paint::Linear(self.gradient()));
        trace!("wave t={:.2}, {} points", self.time, points.len());
    }
}

impl Effect for WaveBackground {
    fn surface(&self) -> Surface {
        self.surface
    }

    fn resize(&mut self, viewport: &dyn Viewport) {
        WaveBackground::resize(self, viewport);
    }

    fn tick(&mut self, canvas: &mut dyn DrawSurface) {
        WaveBackground::tick(self, canvas);
    }

    fn params(&self) -> Value {
        json!({
            "time_step": self.params.time_step,
            "spacing": self.params.spacing,
            "wavelength": self.params.wavelength,
            "amplitude": self.params.amplitude,
            "gradient_alpha": self.params.gradient_alpha,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "time_step": {
                "type": "number",
                "default": DEFAULT_TIME_STEP,
                "min": 0.0,
                "max": 0.2,
                "description": "Time advance per frame"
            },
            "spacing": {
                "type": "number",
                "default": DEFAULT_SPACING,
                "min": 1.0,
                "max": 400.0,
                "description": "Horizontal distance between edge samples"
            },
            "wavelength": {
                "type": "number",
                "default": DEFAULT_WAVELENGTH,
                "min": 10.0,
                "max": 2000.0,
                "description": "Divisor of x inside the sine"
            },
            "amplitude": {
                "type": "number",
                "default": DEFAULT_AMPLITUDE,
                "min": 0.0,
                "max": 500.0,
                "description": "Vertical swing of the edge around mid-height"
            },
            "gradient_alpha": {
                "type": "number",
                "default": DEFAULT_GRADIENT_ALPHA,
                "min": 0.0,
                "max": 1.0,
                "description": "Alpha of every gradient stop"
            }
        })
    }
}

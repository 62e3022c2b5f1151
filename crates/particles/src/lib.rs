#![deny(unsafe_code)]
//! Particle field effect.
//!
//! A field of drifting points sized to the viewport: roughly one particle per
//! 15 000 square pixels. Every frame each particle moves, is pushed away from
//! the pointer, damps, bounces off the edges, and pulses; then every pair
//! closer than the connection distance is joined by a faint accent line whose
//! opacity falls off linearly with distance.
//!
//! A viewport change resizes the field and regenerates every particle from
//! scratch; a bare [`ParticleSystem::resize`] only syncs the dimensions.

pub mod connections;
pub mod particle;

use driftfield_core::error::EngineError;
use driftfield_core::params::{param_f64, param_opt_f64, param_string};
use driftfield_core::{DVec2, DrawSurface, Effect, Surface, Theme, Viewport, Xorshift64};
use log::{debug, trace};
use serde_json::{json, Value};

pub use connections::{Connection, ConnectionMode};
pub use particle::Particle;

/// Square pixels of surface per particle.
const DEFAULT_DENSITY: f64 = 15_000.0;
/// At most one particle per square pixel.
const MIN_DENSITY: f64 = 1.0;
/// Half-width of the initial velocity range per axis.
const DEFAULT_SPEED: f64 = 0.25;
const DEFAULT_MIN_RADIUS: f64 = 1.0;
const DEFAULT_MAX_RADIUS: f64 = 3.0;
const DEFAULT_MIN_OPACITY: f64 = 0.2;
const DEFAULT_MAX_OPACITY: f64 = 1.0;
/// Pointer distance below which particles are pushed away.
const DEFAULT_REPULSION_RADIUS: f64 = 150.0;
/// Velocity change at full repulsion force.
const DEFAULT_REPULSION_STRENGTH: f64 = 0.01;
/// Per-frame velocity multiplier.
const DEFAULT_DAMPING: f64 = 0.99;
/// Pulse phase advance per frame, in radians.
const DEFAULT_PHASE_STEP: f64 = 0.02;
/// Particles closer than this are connected.
const DEFAULT_CONNECTION_DISTANCE: f64 = 120.0;
/// Opacity of a connection between coincident particles.
const DEFAULT_CONNECTION_OPACITY: f64 = 0.3;
const DEFAULT_LINE_WIDTH: f64 = 0.5;
/// Blur radius of the halo around each disc.
const DEFAULT_GLOW: f64 = 15.0;

/// Tunable constants of the particle field.
///
/// [`Default`] reproduces the portfolio page exactly; `max_speed` is an
/// optional ceiling that is off unless set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleParams {
    pub density: f64,
    pub speed: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    pub min_opacity: f64,
    pub max_opacity: f64,
    pub repulsion_radius: f64,
    pub repulsion_strength: f64,
    pub damping: f64,
    pub phase_step: f64,
    pub connection_distance: f64,
    pub connection_opacity: f64,
    pub line_width: f64,
    pub glow: f64,
    pub max_speed: Option<f64>,
    pub connection_mode: ConnectionMode,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            density: DEFAULT_DENSITY,
            speed: DEFAULT_SPEED,
            min_radius: DEFAULT_MIN_RADIUS,
            max_radius: DEFAULT_MAX_RADIUS,
            min_opacity: DEFAULT_MIN_OPACITY,
            max_opacity: DEFAULT_MAX_OPACITY,
            repulsion_radius: DEFAULT_REPULSION_RADIUS,
            repulsion_strength: DEFAULT_REPULSION_STRENGTH,
            damping: DEFAULT_DAMPING,
            phase_step: DEFAULT_PHASE_STEP,
            connection_distance: DEFAULT_CONNECTION_DISTANCE,
            connection_opacity: DEFAULT_CONNECTION_OPACITY,
            line_width: DEFAULT_LINE_WIDTH,
            glow: DEFAULT_GLOW,
            max_speed: None,
            connection_mode: ConnectionMode::Pairwise,
        }
    }
}

impl ParticleParams {
    /// Extracts parameters from a JSON object, falling back to defaults, and
    /// validates the result.
    pub fn from_json(params: &Value) -> Result<Self, EngineError> {
        let mode = param_string(params, "connection_mode", ConnectionMode::Pairwise.name());
        let parsed = Self {
            density: param_f64(params, "density", DEFAULT_DENSITY),
            speed: param_f64(params, "speed", DEFAULT_SPEED),
            min_radius: param_f64(params, "min_radius", DEFAULT_MIN_RADIUS),
            max_radius: param_f64(params, "max_radius", DEFAULT_MAX_RADIUS),
            min_opacity: param_f64(params, "min_opacity", DEFAULT_MIN_OPACITY),
            max_opacity: param_f64(params, "max_opacity", DEFAULT_MAX_OPACITY),
            repulsion_radius: param_f64(params, "repulsion_radius", DEFAULT_REPULSION_RADIUS),
            repulsion_strength: param_f64(params, "repulsion_strength", DEFAULT_REPULSION_STRENGTH),
            damping: param_f64(params, "damping", DEFAULT_DAMPING),
            phase_step: param_f64(params, "phase_step", DEFAULT_PHASE_STEP),
            connection_distance: param_f64(
                params,
                "connection_distance",
                DEFAULT_CONNECTION_DISTANCE,
            ),
            connection_opacity: param_f64(params, "connection_opacity", DEFAULT_CONNECTION_OPACITY),
            line_width: param_f64(params, "line_width", DEFAULT_LINE_WIDTH),
            glow: param_f64(params, "glow", DEFAULT_GLOW),
            max_speed: param_opt_f64(params, "max_speed"),
            connection_mode: ConnectionMode::from_name(&mode)?,
        };
        parsed.validate()?;
        Ok(parsed)
    }

    /// Rejects values that would make spawning or drawing meaningless.
    pub fn validate(&self) -> Result<(), EngineError> {
        check("density", self.density >= MIN_DENSITY, "must be at least 1")?;
        check("speed", self.speed >= 0.0, "must be non-negative")?;
        check("min_radius", self.min_radius > 0.0, "must be positive")?;
        check(
            "max_radius",
            self.max_radius >= self.min_radius,
            "must be at least min_radius",
        )?;
        check(
            "min_opacity",
            self.min_opacity > 0.0 && self.min_opacity <= 1.0,
            "must be in (0, 1]",
        )?;
        check(
            "max_opacity",
            self.max_opacity >= self.min_opacity && self.max_opacity <= 1.0,
            "must be in [min_opacity, 1]",
        )?;
        check("repulsion_radius", self.repulsion_radius >= 0.0, "must be non-negative")?;
        check("repulsion_strength", self.repulsion_strength.is_finite(), "must be finite")?;
        check(
            "damping",
            (0.0..=1.0).contains(&self.damping),
            "must be in [0, 1]",
        )?;
        check("phase_step", self.phase_step.is_finite(), "must be finite")?;
        check(
            "connection_distance",
            self.connection_distance >= 0.0,
            "must be non-negative",
        )?;
        check(
            "connection_opacity",
            (0.0..=1.0).contains(&self.connection_opacity),
            "must be in [0, 1]",
        )?;
        check("line_width", self.line_width > 0.0, "must be positive")?;
        check("glow", self.glow >= 0.0, "must be non-negative")?;
        if let Some(max_speed) = self.max_speed {
            check("max_speed", max_speed > 0.0, "must be positive")?;
        }
        Ok(())
    }

    /// Particles spawned for `surface`: `floor(area / density)`.
    pub fn particle_count(&self, surface: Surface) -> usize {
        (surface.area() as f64 / self.density).floor() as usize
    }

    fn to_json(self) -> Value {
        json!({
            "density": self.density,
            "speed": self.speed,
            "min_radius": self.min_radius,
            "max_radius": self.max_radius,
            "min_opacity": self.min_opacity,
            "max_opacity": self.max_opacity,
            "repulsion_radius": self.repulsion_radius,
            "repulsion_strength": self.repulsion_strength,
            "damping": self.damping,
            "phase_step": self.phase_step,
            "connection_distance": self.connection_distance,
            "connection_opacity": self.connection_opacity,
            "line_width": self.line_width,
            "glow": self.glow,
            "max_speed": self.max_speed,
            "connection_mode": self.connection_mode.name(),
        })
    }
}

/// Fails with `InvalidParam` unless `ok`. NaN comparisons are false, so NaN
/// values fail every range check.
fn check(name: &str, ok: bool, reason: &str) -> Result<(), EngineError> {
    if ok {
        Ok(())
    } else {
        Err(EngineError::InvalidParam {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    }
}

/// The particle field: surface dimensions, particles, and the shared pointer.
pub struct ParticleSystem {
    surface: Surface,
    particles: Vec<Particle>,
    pointer: Option<DVec2>,
    rng: Xorshift64,
    params: ParticleParams,
    theme: Theme,
}

impl ParticleSystem {
    /// Sizes the field to `viewport` and spawns the initial batch.
    ///
    /// Returns `EngineError::InvalidParam` if `params` fail validation.
    pub fn new(
        viewport: &dyn Viewport,
        seed: u64,
        params: ParticleParams,
    ) -> Result<Self, EngineError> {
        params.validate()?;
        let mut system = Self {
            surface: Surface::default(),
            particles: Vec::new(),
            pointer: None,
            rng: Xorshift64::new(seed),
            params,
            theme: Theme::default(),
        };
        system.resize(viewport);
        system.regenerate_particles();
        Ok(system)
    }

    /// Creates a particle field from a JSON params object.
    pub fn from_json(
        viewport: &dyn Viewport,
        seed: u64,
        json_params: &Value,
    ) -> Result<Self, EngineError> {
        Self::new(viewport, seed, ParticleParams::from_json(json_params)?)
    }

    /// Returns the system drawing with `theme`.
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

    /// Stores the viewport's current size. Spawns nothing.
    pub fn resize(&mut self, viewport: &dyn Viewport) {
        let size = viewport.size();
        if size != self.surface {
            debug!(
                "particle surface {}x{} -> {}x{}",
                self.surface.width, self.surface.height, size.width, size.height
            );
        }
        self.surface = size;
    }

    /// Discards every particle and spawns a fresh batch for the current surface.
    pub fn regenerate_particles(&mut self) {
        let count = self.params.particle_count(self.surface);
        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            let particle = Particle::spawn(&mut self.rng, self.surface, &self.params);
            self.particles.push(particle);
        }
        debug!(
            "regenerated {count} particles for {}x{}",
            self.surface.width, self.surface.height
        );
    }

    /// Clears the canvas, updates and draws every particle in creation order,
    /// then draws the connections between the updated positions.
    pub fn tick(&mut self, canvas: &mut dyn DrawSurface) {
        canvas.clear();
        let surface = self.surface;
        let pointer = self.pointer;
        for particle in &mut self.particles {
            particle.update(pointer, surface, &self.params);
            particle.render(canvas, &self.theme, &self.params);
        }
        let drawn = self.draw_connections(canvas);
        trace!("ticked {} particles, {drawn} connections", self.particles.len());
    }

    fn draw_connections(&self, canvas: &mut dyn DrawSurface) -> usize {
        let positions = self.positions();
        let reach = self.params.connection_distance;
        let found = connections::find(self.params.connection_mode, &positions, reach);
        for c in &found {
            let color = self
                .theme
                .accent
                .with_alpha(c.opacity(reach, self.params.connection_opacity));
            canvas.stroke_line(positions[c.a], positions[c.b], self.params.line_width, color);
        }
        found.len()
    }

    /// Connections between the current particle positions.
    pub fn connections(&self) -> Vec<Connection> {
        connections::find(
            self.params.connection_mode,
            &self.positions(),
            self.params.connection_distance,
        )
    }

    fn positions(&self) -> Vec<DVec2> {
        self.particles.iter().map(Particle::position).collect()
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn pointer(&self) -> Option<DVec2> {
        self.pointer
    }

    pub fn particle_params(&self) -> &ParticleParams {
        &self.params
    }
}

impl Effect for ParticleSystem {
    fn surface(&self) -> Surface {
        self.surface
    }

    fn resize(&mut self, viewport: &dyn Viewport) {
        ParticleSystem::resize(self, viewport);
    }

    fn on_viewport_change(&mut self, viewport: &dyn Viewport) {
        ParticleSystem::resize(self, viewport);
        self.regenerate_particles();
    }

    fn tick(&mut self, canvas: &mut dyn DrawSurface) {
        ParticleSystem::tick(self, canvas);
    }

    fn set_pointer(&mut self, position: DVec2) {
        self.pointer = Some(position);
    }

    fn clear_pointer(&mut self) {
        self.pointer = None;
    }

    fn params(&self) -> Value {
        self.params.to_json()
    }

    fn param_schema(&self) -> Value {
        json!({
            "density": {
                "type": "number",
                "default": DEFAULT_DENSITY,
                "min": 1000.0,
                "max": 100000.0,
                "description": "Square pixels of surface per particle"
            },
            "speed": {
                "type": "number",
                "default": DEFAULT_SPEED,
                "min": 0.0,
                "max": 5.0,
                "description": "Half-width of the initial velocity range per axis"
            },
            "min_radius": {
                "type": "number",
                "default": DEFAULT_MIN_RADIUS,
                "min": 0.1,
                "max": 10.0,
                "description": "Smallest spawned radius"
            },
            "max_radius": {
                "type": "number",
                "default": DEFAULT_MAX_RADIUS,
                "min": 0.1,
                "max": 10.0,
                "description": "Upper bound of the spawned radius"
            },
            "min_opacity": {
                "type": "number",
                "default": DEFAULT_MIN_OPACITY,
                "min": 0.0,
                "max": 1.0,
                "description": "Smallest spawned base opacity"
            },
            "max_opacity": {
                "type": "number",
                "default": DEFAULT_MAX_OPACITY,
                "min": 0.0,
                "max": 1.0,
                "description": "Upper bound of the spawned base opacity"
            },
            "repulsion_radius": {
                "type": "number",
                "default": DEFAULT_REPULSION_RADIUS,
                "min": 0.0,
                "max": 500.0,
                "description": "Pointer distance below which particles are pushed away"
            },
            "repulsion_strength": {
                "type": "number",
                "default": DEFAULT_REPULSION_STRENGTH,
                "min": 0.0,
                "max": 0.1,
                "description": "Velocity change per frame at full repulsion"
            },
            "damping": {
                "type": "number",
                "default": DEFAULT_DAMPING,
                "min": 0.0,
                "max": 1.0,
                "description": "Per-frame velocity multiplier"
            },
            "phase_step": {
                "type": "number",
                "default": DEFAULT_PHASE_STEP,
                "min": 0.0,
                "max": 0.5,
                "description": "Pulse phase advance per frame in radians"
            },
            "connection_distance": {
                "type": "number",
                "default": DEFAULT_CONNECTION_DISTANCE,
                "min": 0.0,
                "max": 400.0,
                "description": "Particles closer than this are joined by a line"
            },
            "connection_opacity": {
                "type": "number",
                "default": DEFAULT_CONNECTION_OPACITY,
                "min": 0.0,
                "max": 1.0,
                "description": "Line opacity at zero distance"
            },
            "line_width": {
                "type": "number",
                "default": DEFAULT_LINE_WIDTH,
                "min": 0.1,
                "max": 5.0,
                "description": "Connection line width"
            },
            "glow": {
                "type": "number",
                "default": DEFAULT_GLOW,
                "min": 0.0,
                "max": 50.0,
                "description": "Blur radius of the halo around each disc"
            },
            "max_speed": {
                "type": "number",
                "default": null,
                "min": 0.0,
                "max": 10.0,
                "description": "Optional speed ceiling applied after damping"
            },
            "connection_mode": {
                "type": "string",
                "default": "pairwise",
                "options": ["pairwise", "grid"],
                "description": "Pairwise scan or spatial grid; both find the same lines"
            }
        })
    }
}

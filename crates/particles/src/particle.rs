//! A single drifting point of the particle field.

use driftfield_core::geometry::{falloff, pulse, reflect};
use driftfield_core::{DVec2, DrawSurface, Surface, Theme, Xorshift64};

use crate::ParticleParams;

/// Radius swing of the pulse, in pixels.
const PULSE_RADIUS: f64 = 0.5;
/// Opacity swing of the pulse.
const PULSE_OPACITY: f64 = 0.2;
/// Inner core radius as a fraction of the pulsing radius.
const CORE_SCALE: f64 = 0.4;
/// Inner core opacity as a fraction of the pulsing opacity.
const CORE_OPACITY: f64 = 0.8;

/// One point in the field.
///
/// `radius` and `opacity` are fixed at spawn; `phase` only ever grows.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    position: DVec2,
    velocity: DVec2,
    radius: f64,
    opacity: f64,
    phase: f64,
}

impl Particle {
    pub fn new(position: DVec2, velocity: DVec2, radius: f64, opacity: f64, phase: f64) -> Self {
        Self {
            position,
            velocity,
            radius,
            opacity,
            phase,
        }
    }

    /// Spawns a particle uniformly over `surface` with randomized motion and looks.
    pub fn spawn(rng: &mut Xorshift64, surface: Surface, params: &ParticleParams) -> Self {
        let extent = surface.extent();
        let position = DVec2::new(rng.next_f64() * extent.x, rng.next_f64() * extent.y);
        let velocity = DVec2::new(rng.next_signed(params.speed), rng.next_signed(params.speed));
        let radius = rng.next_range(params.min_radius, params.max_radius);
        let opacity = rng.next_range(params.min_opacity, params.max_opacity);
        let phase = rng.next_angle();
        Self::new(position, velocity, radius, opacity, phase)
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Advances one frame: move, push away from the pointer, damp, bounce
    /// off the surface edges, and advance the pulse.
    pub fn update(&mut self, pointer: Option<DVec2>, surface: Surface, params: &ParticleParams) {
        self.position += self.velocity;

        if let Some(pointer) = pointer {
            let delta = pointer - self.position;
            let distance = delta.length();
            if distance > 0.0 {
                let force = falloff(distance, params.repulsion_radius);
                if force > 0.0 {
                    let angle = delta.y.atan2(delta.x);
                    let push = DVec2::new(angle.cos(), angle.sin());
                    self.velocity -= push * force * params.repulsion_strength;
                }
            }
        }

        self.velocity *= params.damping;
        if let Some(max_speed) = params.max_speed {
            self.velocity = self.velocity.clamp_length_max(max_speed);
        }

        let extent = surface.extent();
        let (x, vx) = reflect(self.position.x, self.velocity.x, extent.x);
        let (y, vy) = reflect(self.position.y, self.velocity.y, extent.y);
        self.position = DVec2::new(x, y);
        self.velocity = DVec2::new(vx, vy);

        self.phase += params.phase_step;
    }

    /// Radius after the pulse, never negative.
    pub fn pulsing_radius(&self) -> f64 {
        (self.radius + pulse(self.phase, PULSE_RADIUS)).max(0.0)
    }

    /// Opacity after the pulse, clamped to [0, 1].
    pub fn pulsing_opacity(&self) -> f64 {
        (self.opacity + pulse(self.phase, PULSE_OPACITY)).clamp(0.0, 1.0)
    }

    /// Draws the glowing accent disc and its bright core.
    pub fn render(&self, canvas: &mut dyn DrawSurface, theme: &Theme, params: &ParticleParams) {
        let radius = self.pulsing_radius();
        let opacity = self.pulsing_opacity();
        canvas.fill_circle(
            self.position,
            radius,
            theme.accent.with_alpha(opacity),
            params.glow,
        );
        canvas.fill_circle(
            self.position,
            radius * CORE_SCALE,
            theme.core.with_alpha(opacity * CORE_OPACITY),
            0.0,
        );
    }
}

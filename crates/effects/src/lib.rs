#![deny(unsafe_code)]
//! Effect registry: maps effect names to implementations, and composes the
//! page layers on the CPU.
//!
//! This crate sits between `driftfield-core` (which defines the `Effect` trait)
//! and the individual effect crates (`driftfield-particles`,
//! `driftfield-wave`). Both the CLI and the WASM bindings depend on it so the
//! name dispatch lives in one place.

pub mod page;
pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

use driftfield_core::error::EngineError;
use driftfield_core::{ContentType, DVec2, DrawSurface, Effect, Surface, Theme, Viewport};
use driftfield_particles::ParticleSystem;
use driftfield_wave::WaveBackground;
use serde_json::Value;

pub use page::Page;

/// All available effect names.
const EFFECT_NAMES: &[&str] = &["particles", "waves"];

/// Every page effect behind one type.
///
/// Delegates `Effect` trait methods to the wrapped effect. Use
/// [`EffectKind::from_name`] for string-based construction (CLI, WASM).
pub enum EffectKind {
    /// Drifting, connected particle field.
    Particles(ParticleSystem),
    /// Flowing gradient wave band.
    Waves(WaveBackground),
}

impl EffectKind {
    /// Constructs an effect by name.
    ///
    /// Returns `EngineError::UnknownEffect` if the name is not recognized, or
    /// `EngineError::InvalidParam` if `params` fail validation. `seed` only
    /// affects the particle field.
    pub fn from_name(
        name: &str,
        viewport: &dyn Viewport,
        seed: u64,
        params: &Value,
    ) -> Result<Self, EngineError> {
        match name {
            "particles" => Ok(EffectKind::Particles(ParticleSystem::from_json(
                viewport, seed, params,
            )?)),
            "waves" => Ok(EffectKind::Waves(WaveBackground::from_json(viewport, params)?)),
            _ => Err(EngineError::UnknownEffect(name.to_string())),
        }
    }

    /// Constructs the effect a scene layer shows.
    pub fn for_content(
        content: ContentType,
        viewport: &dyn Viewport,
        seed: u64,
        params: &Value,
    ) -> Result<Self, EngineError> {
        Self::from_name(content.effect_name(), viewport, seed, params)
    }

    /// Returns a slice of all recognized effect names.
    pub fn list_effects() -> &'static [&'static str] {
        EFFECT_NAMES
    }

    /// Registry name of this effect.
    pub fn name(&self) -> &'static str {
        match self {
            EffectKind::Particles(_) => "particles",
            EffectKind::Waves(_) => "waves",
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        match self {
            EffectKind::Particles(e) => e.set_theme(theme),
            EffectKind::Waves(e) => e.set_theme(theme),
        }
    }

    /// Number of live particles; `None` for effects without particles.
    pub fn particle_count(&self) -> Option<usize> {
        match self {
            EffectKind::Particles(e) => Some(e.particles().len()),
            EffectKind::Waves(_) => None,
        }
    }
}

impl Effect for EffectKind {
    fn surface(&self) -> Surface {
        match self {
            EffectKind::Particles(e) => Effect::surface(e),
            EffectKind::Waves(e) => Effect::surface(e),
        }
    }

    fn resize(&mut self, viewport: &dyn Viewport) {
        match self {
            EffectKind::Particles(e) => Effect::resize(e, viewport),
            EffectKind::Waves(e) => Effect::resize(e, viewport),
        }
    }

    fn on_viewport_change(&mut self, viewport: &dyn Viewport) {
        match self {
            EffectKind::Particles(e) => e.on_viewport_change(viewport),
            EffectKind::Waves(e) => e.on_viewport_change(viewport),
        }
    }

    fn tick(&mut self, canvas: &mut dyn DrawSurface) {
        match self {
            EffectKind::Particles(e) => Effect::tick(e, canvas),
            EffectKind::Waves(e) => Effect::tick(e, canvas),
        }
    }

    fn set_pointer(&mut self, position: DVec2) {
        match self {
            EffectKind::Particles(e) => e.set_pointer(position),
            EffectKind::Waves(e) => e.set_pointer(position),
        }
    }

    fn clear_pointer(&mut self) {
        match self {
            EffectKind::Particles(e) => e.clear_pointer(),
            EffectKind::Waves(e) => e.clear_pointer(),
        }
    }

    fn params(&self) -> Value {
        match self {
            EffectKind::Particles(e) => e.params(),
            EffectKind::Waves(e) => e.params(),
        }
    }

    fn param_schema(&self) -> Value {
        match self {
            EffectKind::Particles(e) => e.param_schema(),
            EffectKind::Waves(e) => e.param_schema(),
        }
    }
}

//! CPU composition root: one animated effect per scene layer.
//!
//! Each layer of the [`Scene`] gets its own [`Animation`] rendering into a
//! [`Raster`]; [`Page::to_rgba`] composites them over the theme background.
//! The CLI renders pages and single effects through this type.

use driftfield_core::error::EngineError;
use driftfield_core::{
    Animation, ContentType, DVec2, Layer, Raster, Scene, Surface, Theme, Viewport,
};
use log::{debug, info};
use serde_json::{json, Value};

use crate::pixel::compose;
use crate::EffectKind;

/// Animated layers plus the scene that orders and blends them.
pub struct Page {
    scene: Scene,
    theme: Theme,
    layers: Vec<Animation<EffectKind, Raster>>,
}

impl Page {
    /// The portfolio page: waves under particles (or waves alone when
    /// `enable_particles` is false).
    ///
    /// `params` may hold one object per effect name, e.g.
    /// `{"particles": {"density": 8000}, "waves": {"amplitude": 60}}`.
    pub fn portfolio(
        size: Surface,
        theme: Theme,
        seed: u64,
        enable_particles: bool,
        params: &Value,
    ) -> Result<Self, EngineError> {
        let scene = Scene::page(size, theme.background, enable_particles)?;
        Self::from_scene(scene, theme, seed, params)
    }

    /// A page showing a single effect over the theme background.
    ///
    /// `params` are the effect's own parameters.
    pub fn single(
        name: &str,
        size: Surface,
        theme: Theme,
        seed: u64,
        params: &Value,
    ) -> Result<Self, EngineError> {
        let content = match name {
            "particles" => ContentType::Particles,
            "waves" => ContentType::Waves,
            _ => return Err(EngineError::UnknownEffect(name.to_string())),
        };
        let mut scene = Scene::new(size, theme.background)?;
        scene.add_layer(Layer::new(name, content))?;
        Self::from_scene(scene, theme, seed, &json!({ name: params }))
    }

    /// Builds one effect per layer of `scene`.
    pub fn from_scene(
        scene: Scene,
        theme: Theme,
        seed: u64,
        params: &Value,
    ) -> Result<Self, EngineError> {
        let size = scene.size();
        let empty = json!({});
        let mut layers = Vec::with_capacity(scene.layers().len());
        for layer in scene.layers() {
            let content = layer.content_type();
            let effect_params = params.get(content.effect_name()).unwrap_or(&empty);
            let mut effect = EffectKind::for_content(content, &size, seed, effect_params)?;
            effect.set_theme(theme);
            layers.push(Animation::start(effect, Raster::new(size)));
        }
        info!(
            "page {}x{} with layers [{}]",
            size.width,
            size.height,
            scene
                .layers()
                .iter()
                .map(Layer::name)
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(Self {
            scene,
            theme,
            layers,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// The effect behind the layer called `name`.
    pub fn effect(&self, name: &str) -> Result<&EffectKind, EngineError> {
        let idx = self.scene.index_of(name)?;
        Ok(self.layers[idx].effect())
    }

    /// Advances every running layer by one frame.
    pub fn tick(&mut self) {
        for layer in &mut self.layers {
            layer.frame();
        }
    }

    /// Advances every layer by `frames` frames.
    pub fn run_for(&mut self, frames: u64) {
        for layer in &mut self.layers {
            layer.run_for(frames);
        }
        debug!("page advanced {frames} frames");
    }

    pub fn set_pointer(&mut self, position: DVec2) {
        for layer in &mut self.layers {
            layer.set_pointer(position);
        }
    }

    pub fn clear_pointer(&mut self) {
        for layer in &mut self.layers {
            layer.clear_pointer();
        }
    }

    /// Follows a viewport resize: the scene, every effect, and every raster.
    pub fn resize(&mut self, viewport: &dyn Viewport) -> Result<(), EngineError> {
        self.scene.resize(viewport.size())?;
        for layer in &mut self.layers {
            layer.resize(viewport);
        }
        Ok(())
    }

    /// Switches theme for the background and every effect.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.scene.set_background(theme.background);
        for layer in &mut self.layers {
            layer.effect_mut().set_theme(theme);
        }
    }

    /// Stops every layer's loop; further ticks draw nothing new.
    pub fn teardown(&self) {
        for layer in &self.layers {
            layer.teardown();
        }
    }

    /// Composited, opaque RGBA8 pixels of the last frame.
    pub fn to_rgba(&self) -> Result<Vec<u8>, EngineError> {
        let rasters: Vec<&Raster> = self.layers.iter().map(Animation::canvas).collect();
        compose(&self.scene, &rasters)
    }
}

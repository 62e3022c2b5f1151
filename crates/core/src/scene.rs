//! Page layer stack.
//!
//! A [`Scene`] holds the page dimensions, the theme background, and an ordered
//! stack of [`Layer`]s rendered bottom-to-top (index 0 = bottom). The default
//! page puts the wave background under the particle field.

use serde::{Deserialize, Serialize};

use crate::color::Srgb;
use crate::error::EngineError;
use crate::surface::Surface;

/// Canvas opacity of the wave background layer on the page.
pub const WAVE_LAYER_OPACITY: f64 = 0.1;

/// Which effect a layer shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Particles,
    Waves,
}

impl ContentType {
    /// Effect registry name of this content.
    pub fn effect_name(self) -> &'static str {
        match self {
            ContentType::Particles => "particles",
            ContentType::Waves => "waves",
        }
    }
}

/// A single layer in the page stack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Layer {
    name: String,
    opacity: f64,
    visible: bool,
    content_type: ContentType,
}

impl Layer {
    /// Creates a visible, fully opaque layer.
    pub fn new(name: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            name: name.into(),
            opacity: 1.0,
            visible: true,
            content_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the opacity in [0.0, 1.0].
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Sets the opacity, clamping to [0.0, 1.0].
    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// Returns the layer with the given opacity, clamped to [0.0, 1.0].
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.set_opacity(opacity);
        self
    }
}

/// Page dimensions, background, and layer stack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scene {
    size: Surface,
    background: Srgb,
    layers: Vec<Layer>,
}

impl Scene {
    /// Creates an empty scene.
    ///
    /// Returns `EngineError::InvalidDimensions` if either dimension is zero.
    pub fn new(size: Surface, background: Srgb) -> Result<Self, EngineError> {
        if size.is_empty() {
            return Err(EngineError::InvalidDimensions);
        }
        Ok(Self {
            size,
            background,
            layers: Vec::new(),
        })
    }

    /// The portfolio page stack: waves at low opacity under the particle field.
    ///
    /// With `particles` false only the wave layer is present.
    pub fn page(size: Surface, background: Srgb, particles: bool) -> Result<Self, EngineError> {
        let mut scene = Self::new(size, background)?;
        scene.add_layer(Layer::new("waves", ContentType::Waves).with_opacity(WAVE_LAYER_OPACITY))?;
        if particles {
            scene.add_layer(Layer::new("particles", ContentType::Particles))?;
        }
        Ok(scene)
    }

    pub fn size(&self) -> Surface {
        self.size
    }

    /// Follows a viewport resize.
    ///
    /// Returns `EngineError::InvalidDimensions` if either dimension is zero.
    pub fn resize(&mut self, size: Surface) -> Result<(), EngineError> {
        if size.is_empty() {
            return Err(EngineError::InvalidDimensions);
        }
        self.size = size;
        Ok(())
    }

    pub fn background(&self) -> Srgb {
        self.background
    }

    /// Sets the background color (theme switch).
    pub fn set_background(&mut self, background: Srgb) {
        self.background = background;
    }

    /// Layers in bottom-to-top order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Adds a layer to the top of the stack.
    ///
    /// Returns `EngineError::DuplicateLayerName` if the name is taken.
    pub fn add_layer(&mut self, layer: Layer) -> Result<(), EngineError> {
        if self.layers.iter().any(|l| l.name == layer.name) {
            return Err(EngineError::DuplicateLayerName(layer.name));
        }
        self.layers.push(layer);
        Ok(())
    }

    pub fn layer(&self, name: &str) -> Result<&Layer, EngineError> {
        self.index_of(name).map(|idx| &self.layers[idx])
    }

    pub fn layer_mut(&mut self, name: &str) -> Result<&mut Layer, EngineError> {
        let idx = self.index_of(name)?;
        Ok(&mut self.layers[idx])
    }

    /// Stack position of a layer (0 = bottom).
    pub fn index_of(&self, name: &str) -> Result<usize, EngineError> {
        self.layers
            .iter()
            .position(|l| l.name == name)
            .ok_or_else(|| EngineError::LayerNotFound(name.to_string()))
    }
}

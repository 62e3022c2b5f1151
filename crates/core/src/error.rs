//! Error types for driftfield.
//!
//! The simulations themselves never fail; errors only arise at the edges where
//! names, colors, parameters, and surfaces come from the outside world.

use thiserror::Error;

/// Errors produced at the boundaries of the effect pipeline.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Width or height was zero where a drawable image is required.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// An effect name did not match any registered effect.
    #[error("unknown effect: {0}")]
    UnknownEffect(String),

    /// A theme name did not match any built-in theme.
    #[error("unknown theme: {0}")]
    UnknownTheme(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A parameter was present but its value is unusable.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParam { name: String, reason: String },

    /// A scene already holds a layer with this name.
    #[error("duplicate layer name: {0}")]
    DuplicateLayerName(String),

    /// No layer with this name exists in the scene.
    #[error("layer not found: {0}")]
    LayerNotFound(String),

    /// Two images had different sizes where they must match.
    #[error("dimension mismatch: ({lhs_w}, {lhs_h}) vs ({rhs_w}, {rhs_h})")]
    DimensionMismatch {
        lhs_w: u32,
        lhs_h: u32,
        rhs_w: u32,
        rhs_h: u32,
    },

    /// The drawing surface could not be located or has no usable context.
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// Writing output failed.
    #[error("i/o error: {0}")]
    Io(String),
}

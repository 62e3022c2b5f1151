#![deny(unsafe_code)]
//! Core types and traits for driftfield, the animated background of a
//! portfolio page.
//!
//! Provides the `Effect` trait, the `Animation` frame driver with its
//! `CancelToken`, `Surface`/`Viewport`, the `DrawSurface` abstraction with its
//! CPU (`Raster`) and recording (`Recorder`) backends, the page `Scene`,
//! color types, `Theme`, the `Xorshift64` PRNG, and parameter helpers.

pub mod color;
pub mod draw;
pub mod effect;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod params;
pub mod prng;
pub mod raster;
pub mod record;
pub mod scene;
pub mod surface;
pub mod theme;

pub use color::{Rgba, Srgb};
pub use draw::{ColorStop, DrawSurface, LinearGradient, Paint};
pub use effect::Effect;
pub use error::EngineError;
pub use frame::{Animation, CancelToken, FrameStatus};
pub use prng::Xorshift64;
pub use raster::Raster;
pub use record::{DrawCommand, Recorder};
pub use scene::{ContentType, Layer, Scene};
pub use surface::{Surface, Viewport};
pub use theme::Theme;

pub use glam::DVec2;

//! Surface dimensions and the viewport they are synced from.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Pixel dimensions of a drawing surface.
///
/// Zero-sized surfaces are allowed (a collapsed browser window reports 0×0);
/// they simply hold no particles and draw nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `width * height` without overflow.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Far corner of the surface as a vector.
    pub fn extent(&self) -> DVec2 {
        DVec2::new(f64::from(self.width), f64::from(self.height))
    }

    /// Whether `point` lies within `[0, width] × [0, height]` (edges included).
    pub fn contains(&self, point: DVec2) -> bool {
        let e = self.extent();
        (0.0..=e.x).contains(&point.x) && (0.0..=e.y).contains(&point.y)
    }

    /// Returns `true` if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Source of the current viewport size.
///
/// The browser host reads `window.innerWidth/innerHeight`; tests and the CLI
/// use a fixed [`Surface`].
pub trait Viewport {
    fn size(&self) -> Surface;
}

impl Viewport for Surface {
    fn size(&self) -> Surface {
        *self
    }
}

//! Pure-computation conversion from layer rasters to an RGBA8 pixel buffer.
//!
//! This module is always available (no feature gate) so the `png` snapshot
//! path and any in-memory consumer share the same compositing.

use driftfield_core::error::EngineError;
use driftfield_core::{Raster, Rgba, Scene};

/// Composites the scene's layers bottom-to-top over its background.
///
/// `rasters[i]` holds the pixels of `scene.layers()[i]`. Hidden layers are
/// skipped; each visible layer is blended source-over with its pixel alpha
/// scaled by the layer opacity. The result is opaque and
/// `width * height * 4` bytes long.
///
/// Returns `EngineError::LayerNotFound` if a layer has no raster and
/// `EngineError::DimensionMismatch` if a raster is not the scene's size.
pub fn compose(scene: &Scene, rasters: &[&Raster]) -> Result<Vec<u8>, EngineError> {
    let size = scene.size();
    let bg = scene.background();
    let mut out = vec![[bg.r, bg.g, bg.b]; size.width as usize * size.height as usize];

    for (i, layer) in scene.layers().iter().enumerate() {
        let raster = rasters
            .get(i)
            .ok_or_else(|| EngineError::LayerNotFound(layer.name().to_string()))?;
        if raster.size() != size {
            return Err(EngineError::DimensionMismatch {
                lhs_w: size.width,
                lhs_h: size.height,
                rhs_w: raster.width(),
                rhs_h: raster.height(),
            });
        }
        if !layer.visible() || layer.opacity() <= 0.0 {
            continue;
        }
        for (dst, src) in out.iter_mut().zip(raster.pixels()) {
            blend_over(dst, src, layer.opacity());
        }
    }

    Ok(out
        .into_iter()
        .flat_map(|[r, g, b]| [channel(r), channel(g), channel(b), 255u8])
        .collect())
}

fn blend_over(dst: &mut [f64; 3], src: &Rgba, opacity: f64) {
    let a = (src.a * opacity).clamp(0.0, 1.0);
    if a <= 0.0 {
        return;
    }
    dst[0] = src.r * a + dst[0] * (1.0 - a);
    dst[1] = src.g * a + dst[1] * (1.0 - a);
    dst[2] = src.b * a + dst[2] * (1.0 - a);
}

fn channel(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftfield_core::{ContentType, DVec2, DrawSurface, Layer, Srgb, Surface, Theme};

    fn scene(size: Surface) -> Scene {
        Scene::page(size, Theme::dark().background, true).unwrap()
    }

    #[test]
    fn empty_layers_give_background() {
        let size = Surface::new(4, 3);
        let rasters = [Raster::new(size), Raster::new(size)];
        let buf = compose(&scene(size), &[&rasters[0], &rasters[1]]).unwrap();
        assert_eq!(buf.len(), 4 * 3 * 4);
        for px in buf.chunks_exact(4) {
            assert_eq!(px, &[0x0a, 0x0a, 0x0f, 255]);
        }
    }

    #[test]
    fn layer_opacity_scales_contribution() {
        let size = Surface::new(2, 2);
        let mut s = Scene::new(size, Srgb::from_rgb8(0, 0, 0)).unwrap();
        s.add_layer(Layer::new("waves", ContentType::Waves).with_opacity(0.1))
            .unwrap();
        let mut raster = Raster::new(size);
        raster.fill_path(
            &[
                DVec2::new(0.0, 0.0),
                DVec2::new(2.0, 0.0),
                DVec2::new(2.0, 2.0),
                DVec2::new(0.0, 2.0),
            ],
            &driftfield_core::Paint::Solid(Srgb::from_rgb8(255, 255, 255).with_alpha(1.0)),
        );
        let buf = compose(&s, &[&raster]).unwrap();
        // white at 10% over black
        assert_eq!(buf[0], 26);
        assert_eq!(buf[3], 255);
    }

    #[test]
    fn hidden_layers_are_skipped() {
        let size = Surface::new(3, 3);
        let mut s = scene(size);
        s.layer_mut("particles").unwrap().set_visible(false);
        let waves = Raster::new(size);
        let mut particles = Raster::new(size);
        particles.fill_circle(DVec2::new(1.5, 1.5), 2.0, Srgb::from_rgb8(255, 0, 0).with_alpha(1.0), 0.0);
        let buf = compose(&s, &[&waves, &particles]).unwrap();
        assert_eq!(&buf[16..20], &[0x0a, 0x0a, 0x0f, 255]);
    }

    #[test]
    fn missing_raster_is_an_error() {
        let size = Surface::new(2, 2);
        let waves = Raster::new(size);
        assert!(matches!(
            compose(&scene(size), &[&waves]),
            Err(EngineError::LayerNotFound(name)) if name == "particles"
        ));
    }

    #[test]
    fn size_mismatch_is_an_error() {
        let size = Surface::new(4, 4);
        let waves = Raster::new(size);
        let particles = Raster::new(Surface::new(5, 4));
        assert!(matches!(
            compose(&scene(size), &[&waves, &particles]),
            Err(EngineError::DimensionMismatch { rhs_w: 5, .. })
        ));
    }

    mod proptests {
        use super::*;
        use driftfield_core::Paint;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn output_is_opaque_and_sized(
                w in 1u32..12,
                h in 1u32..12,
                opacity in -1.0_f64..2.0,
                alpha in 0.0_f64..=1.0,
            ) {
                let size = Surface::new(w, h);
                let mut s = Scene::new(size, Srgb::from_rgb8(20, 40, 60)).unwrap();
                s.add_layer(Layer::new("waves", ContentType::Waves).with_opacity(opacity))
                    .unwrap();
                let mut raster = Raster::new(size);
                raster.fill_path(
                    &[
                        DVec2::new(0.0, 0.0),
                        DVec2::new(w as f64, 0.0),
                        DVec2::new(w as f64, h as f64),
                    ],
                    &Paint::Solid(Srgb::from_rgb8(250, 10, 10).with_alpha(alpha)),
                );
                let buf = compose(&s, &[&raster]).unwrap();
                prop_assert_eq!(buf.len(), (w * h * 4) as usize);
                prop_assert!(buf.chunks_exact(4).all(|px| px[3] == 255));
            }
        }
    }
}

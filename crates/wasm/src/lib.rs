#![deny(unsafe_code)]
//! Browser bindings for driftfield.
//!
//! [`PageEffects`] is the composition root a page script constructs once:
//! it attaches the particle field to an existing canvas, creates the wave
//! background canvas behind the content, and owns both loops until
//! [`PageEffects::teardown`].
//!
//! ```js
//! import init, { PageEffects } from "./driftfield_wasm.js";
//! await init();
//! const effects = new PageEffects("particle-canvas", true, "dark", null);
//! themeButton.onclick = () => effects.toggle_theme();
//! ```

pub mod canvas2d;
pub mod live;
pub mod viewport;

use driftfield_core::{DVec2, EngineError, Theme};
use driftfield_particles::{ParticleParams, ParticleSystem};
use driftfield_wave::{WaveBackground, WaveParams};
use log::{info, warn, Level};
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, MouseEvent, Window};

use crate::canvas2d::Canvas2d;
use crate::live::LiveLayer;
use crate::viewport::WindowViewport;

/// Page-level styling of the wave canvas: fixed, full-viewport, behind the
/// content, ignoring the pointer, at 10% opacity.
const WAVE_CANVAS_STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("top", "0"),
    ("left", "0"),
    ("width", "100%"),
    ("height", "100%"),
    ("pointer-events", "none"),
    ("z-index", "-1"),
    ("opacity", "0.1"),
];

#[wasm_bindgen(start)]
pub fn start() {
    let _ = console_log::init_with_level(Level::Info);
    console_error_panic_hook::set_once();
    info!("driftfield: logging initialized");
}

fn to_js(e: EngineError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn browser() -> Result<(Window, Document), EngineError> {
    let window =
        web_sys::window().ok_or_else(|| EngineError::SurfaceUnavailable("no window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| EngineError::SurfaceUnavailable("no document".into()))?;
    Ok((window, document))
}

/// Reads and validates the `"waves"` and `"particles"` sections before any
/// layer touches the page.
fn parse_sections(params: &Value) -> Result<(WaveParams, ParticleParams), EngineError> {
    let empty = serde_json::json!({});
    let section = |name: &str| params.get(name).unwrap_or(&empty);
    Ok((
        WaveParams::from_json(section("waves"))?,
        ParticleParams::from_json(section("particles"))?,
    ))
}

/// Seed from the clock so every page load differs.
fn clock_seed() -> u64 {
    js_sys::Date::now().to_bits()
}

/// The particle field bound to an existing canvas.
///
/// A missing canvas or context yields an inactive layer instead of an error.
#[wasm_bindgen]
pub struct ParticleLayer {
    live: Option<LiveLayer<ParticleSystem>>,
}

#[wasm_bindgen]
impl ParticleLayer {
    /// Attaches to the canvas with id `canvas_id` using default parameters.
    pub fn attach(canvas_id: &str) -> ParticleLayer {
        Self::attach_with(canvas_id, ParticleParams::default(), Theme::default())
    }

    /// Whether the layer found its canvas and is animating.
    pub fn is_active(&self) -> bool {
        self.live.as_ref().is_some_and(LiveLayer::is_running)
    }

    pub fn particle_count(&self) -> u32 {
        self.live
            .as_ref()
            .map_or(0, |l| l.with_effect(|ps| ps.particles().len() as u32))
    }

    pub fn teardown(&mut self) {
        if let Some(live) = self.live.as_mut() {
            live.teardown();
        }
    }
}

impl ParticleLayer {
    fn attach_with(canvas_id: &str, params: ParticleParams, theme: Theme) -> ParticleLayer {
        match Self::try_attach(canvas_id, params, theme) {
            Ok(live) => ParticleLayer { live: Some(live) },
            Err(e) => {
                warn!("driftfield: particle layer disabled: {e}");
                ParticleLayer { live: None }
            }
        }
    }

    fn try_attach(
        canvas_id: &str,
        params: ParticleParams,
        theme: Theme,
    ) -> Result<LiveLayer<ParticleSystem>, EngineError> {
        let (window, document) = browser()?;
        let canvas = Canvas2d::by_id(&document, canvas_id)?;
        let viewport = WindowViewport::new(window.clone());
        let system = ParticleSystem::new(&viewport, clock_seed(), params)?.with_theme(theme);
        info!(
            "driftfield: {} particles on #{canvas_id}",
            system.particles().len()
        );

        let mut live = LiveLayer::start(window.clone(), system, canvas);
        live.listen(&window, "resize", move |anim, _| anim.resize(&viewport))?;
        live.listen(&window, "mousemove", |anim, event| {
            if let Some(m) = event.dyn_ref::<MouseEvent>() {
                anim.set_pointer(DVec2::new(f64::from(m.client_x()), f64::from(m.client_y())));
            }
        })?;
        if let Some(root) = document.document_element() {
            live.listen(&root, "mouseleave", |anim, _| anim.clear_pointer())?;
        }
        Ok(live)
    }

    fn set_theme(&self, theme: Theme) {
        if let Some(live) = self.live.as_ref() {
            live.with_effect(|ps| ps.set_theme(theme));
        }
    }
}

/// The wave background on a canvas of its own, created behind the page.
#[wasm_bindgen]
pub struct WaveLayer {
    live: Option<LiveLayer<WaveBackground>>,
    canvas: Option<HtmlCanvasElement>,
}

#[wasm_bindgen]
impl WaveLayer {
    /// Creates the wave canvas with default parameters.
    pub fn create() -> Result<WaveLayer, JsValue> {
        Self::create_with(WaveParams::default(), Theme::default()).map_err(to_js)
    }

    pub fn is_active(&self) -> bool {
        self.live.as_ref().is_some_and(LiveLayer::is_running)
    }

    /// Stops the loop and removes the canvas from the page.
    pub fn teardown(&mut self) {
        if let Some(live) = self.live.as_mut() {
            live.teardown();
        }
        if let Some(canvas) = self.canvas.take() {
            canvas.remove();
        }
    }
}

impl WaveLayer {
    fn create_with(params: WaveParams, theme: Theme) -> Result<WaveLayer, EngineError> {
        let (window, document) = browser()?;
        let unavailable = |what: &str| EngineError::SurfaceUnavailable(what.to_string());

        let element: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(|_| unavailable("cannot create canvas"))?
            .dyn_into()
            .map_err(|_| unavailable("created element is not a canvas"))?;
        let style = element.style();
        for (name, value) in WAVE_CANVAS_STYLE {
            style
                .set_property(name, value)
                .map_err(|_| unavailable("cannot style wave canvas"))?;
        }
        let body = document.body().ok_or_else(|| unavailable("no body"))?;

        let viewport = WindowViewport::new(window.clone());
        let wave = WaveBackground::new(&viewport, params)?.with_theme(theme);
        let canvas = Canvas2d::new(element.clone())?;
        let mut live = LiveLayer::start(window.clone(), wave, canvas);
        live.listen(&window, "resize", move |anim, _| anim.resize(&viewport))?;

        // Only a fully wired layer reaches the page.
        body.prepend_with_node_1(&element)
            .map_err(|_| unavailable("cannot insert wave canvas"))?;

        Ok(WaveLayer {
            live: Some(live),
            canvas: Some(element),
        })
    }

    fn set_theme(&self, theme: Theme) {
        if let Some(live) = self.live.as_ref() {
            live.with_effect(|w| w.set_theme(theme));
        }
    }
}

impl Drop for WaveLayer {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Both page layers and the active theme.
#[wasm_bindgen]
pub struct PageEffects {
    theme: Theme,
    particles: Option<ParticleLayer>,
    waves: WaveLayer,
}

#[wasm_bindgen]
impl PageEffects {
    /// Mounts the page effects.
    ///
    /// `params_json`, when given, is a JSON object with optional
    /// `"particles"` and `"waves"` parameter objects.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: &str,
        enable_particles: bool,
        theme: &str,
        params_json: Option<String>,
    ) -> Result<PageEffects, JsValue> {
        let theme = Theme::from_name(theme).map_err(to_js)?;
        let params: Value = match params_json {
            Some(text) => serde_json::from_str(&text)
                .map_err(|e| JsValue::from_str(&format!("invalid params JSON: {e}")))?,
            None => Value::Null,
        };
        let (wave_params, particle_params) = parse_sections(&params).map_err(to_js)?;

        let waves = WaveLayer::create_with(wave_params, theme).map_err(to_js)?;
        let particles = if enable_particles {
            Some(ParticleLayer::attach_with(canvas_id, particle_params, theme))
        } else {
            info!("driftfield: particles disabled");
            None
        };

        Ok(PageEffects {
            theme,
            particles,
            waves,
        })
    }

    /// Switches both layers to the named theme.
    pub fn set_theme(&mut self, name: &str) -> Result<(), JsValue> {
        let theme = Theme::from_name(name).map_err(to_js)?;
        self.apply_theme(theme);
        Ok(())
    }

    /// Flips between dark and light; returns the new theme name.
    pub fn toggle_theme(&mut self) -> String {
        self.apply_theme(self.theme.toggled());
        self.theme.name().to_string()
    }

    pub fn theme_name(&self) -> String {
        self.theme.name().to_string()
    }

    pub fn particles_active(&self) -> bool {
        self.particles.as_ref().is_some_and(ParticleLayer::is_active)
    }

    /// Stops both loops and detaches every listener.
    pub fn teardown(&mut self) {
        if let Some(p) = self.particles.as_mut() {
            p.teardown();
        }
        self.waves.teardown();
        info!("driftfield: page effects torn down");
    }
}

impl PageEffects {
    fn apply_theme(&mut self, theme: Theme) {
        self.theme = theme;
        if let Some(p) = self.particles.as_ref() {
            p.set_theme(theme);
        }
        self.waves.set_theme(theme);
    }
}

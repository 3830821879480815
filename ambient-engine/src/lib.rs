use js_sys::{Float32Array, Object, Reflect};
use wasm_bindgen::prelude::*;

// ============================================================================
// AMBIENT ENGINE - Scroll reveals, streaming text, floating tokens, 3D field
// ============================================================================
//
// The JS host owns the DOM, timers, observers and the GL context.
// Everything it applies (styles, text prefixes, offsets, matrices) is
// computed here.

pub mod config;
pub mod field;
pub mod particles;
pub mod reveal;
pub mod rng;
pub mod stream;

use config::{
    ConfigError, FieldConfig, ParticleConfig, RevealConfig, SpeedRange, StaggerConfig, StreamConfig,
};
use field::{AmbientField, Camera, Pointer};
use particles::ParticleField;
use reveal::{Intersection, Rect, RevealTrigger, StaggerReveal, Style, Viewport};
use rng::XorShift;
use stream::{Step, TextStream, Ticket, TypingHeader};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("ambient-engine ready");
}

// ============================================================================
// Reveal
// ============================================================================

#[wasm_bindgen(js_name = RevealTrigger)]
pub struct WebReveal {
    inner: RevealTrigger,
}

#[wasm_bindgen(js_class = RevealTrigger)]
impl WebReveal {
    /// opts: { direction?: "up"|"down"|"left"|"right", delay?: s, threshold? }
    #[wasm_bindgen(constructor)]
    pub fn new(opts: JsValue) -> Result<WebReveal, JsError> {
        let cfg = rejected(reveal_config(&opts))?;
        Ok(Self { inner: rejected(RevealTrigger::new(cfg))? })
    }

    pub fn observe(&mut self, is_intersecting: bool, ratio: f32) -> bool {
        self.inner.observe(Intersection::new(is_intersecting, ratio))
    }

    #[wasm_bindgen(js_name = observeRect)]
    pub fn observe_rect(&mut self, left: f32, top: f32, width: f32, height: f32, vw: f32, vh: f32) -> bool {
        self.inner.observe_rect(Rect::new(left, top, width, height), Viewport::new(vw, vh))
    }

    pub fn unmount(&mut self) { self.inner.unmount(); }

    #[wasm_bindgen(getter)]
    pub fn visible(&self) -> bool { self.inner.is_visible() }

    #[wasm_bindgen(getter)]
    pub fn observing(&self) -> bool { self.inner.is_observing() }

    pub fn style(&self) -> JsValue { style_object(&self.inner.style()) }
}

#[wasm_bindgen(js_name = StaggerReveal)]
pub struct WebStagger {
    inner: StaggerReveal,
}

#[wasm_bindgen(js_class = StaggerReveal)]
impl WebStagger {
    /// opts: { staggerDelay?: s, threshold? }
    #[wasm_bindgen(constructor)]
    pub fn new(children: u32, opts: JsValue) -> Result<WebStagger, JsError> {
        let mut cfg = StaggerConfig::default();
        if let Some(v) = get_f32(&opts, "staggerDelay") { cfg.stagger = v; }
        if let Some(v) = get_f32(&opts, "threshold") { cfg.threshold = v; }
        Ok(Self { inner: rejected(StaggerReveal::new(children as usize, cfg))? })
    }

    pub fn observe(&mut self, is_intersecting: bool, ratio: f32) -> bool {
        self.inner.observe(Intersection::new(is_intersecting, ratio))
    }

    #[wasm_bindgen(js_name = observeRect)]
    pub fn observe_rect(&mut self, left: f32, top: f32, width: f32, height: f32, vw: f32, vh: f32) -> bool {
        self.inner.observe_rect(Rect::new(left, top, width, height), Viewport::new(vw, vh))
    }

    pub fn unmount(&mut self) { self.inner.unmount(); }

    #[wasm_bindgen(getter)]
    pub fn visible(&self) -> bool { self.inner.is_visible() }

    #[wasm_bindgen(getter)]
    pub fn observing(&self) -> bool { self.inner.is_observing() }

    #[wasm_bindgen(js_name = childStyle)]
    pub fn child_style(&self, index: u32) -> JsValue {
        style_object(&self.inner.child_style(index as usize))
    }
}

// ============================================================================
// Streaming text
// ============================================================================
//
// Steps come back as `null` (nothing to do), `{ done: true }`, or
// `{ ticket, delay }`: call `fire(ticket)` after `delay` ms.

#[wasm_bindgen(js_name = TypingStream)]
pub struct WebStream {
    inner: TextStream<XorShift>,
}

#[wasm_bindgen(js_class = TypingStream)]
impl WebStream {
    /// opts: { delay?: ms, speed?: { min, max }, tokenSize?, threshold?, seed? }
    #[wasm_bindgen(constructor)]
    pub fn new(text: String, opts: JsValue) -> Result<WebStream, JsError> {
        let cfg = rejected(stream_config(&opts, StreamConfig::text()))?;
        let rng = XorShift::new(seed(&opts));
        Ok(Self { inner: rejected(TextStream::new(text, cfg, rng))? })
    }

    pub fn observe(&mut self, is_intersecting: bool, ratio: f32) -> JsValue {
        step_object(self.inner.observe(Intersection::new(is_intersecting, ratio)))
    }

    pub fn fire(&mut self, ticket: u32) -> JsValue {
        step_object(self.inner.fire(Ticket::from_id(ticket)))
    }

    pub fn unmount(&mut self) { self.inner.unmount(); }

    #[wasm_bindgen(getter)]
    pub fn text(&self) -> String { self.inner.text().to_string() }

    #[wasm_bindgen(getter)]
    pub fn active(&self) -> bool { self.inner.is_active() }

    #[wasm_bindgen(getter)]
    pub fn cursor(&self) -> bool { self.inner.show_cursor() }
}

#[wasm_bindgen(js_name = TypingHeader)]
pub struct WebHeader {
    inner: TypingHeader<XorShift>,
}

#[wasm_bindgen(js_class = TypingHeader)]
impl WebHeader {
    #[wasm_bindgen(constructor)]
    pub fn new(prefix: String, title: String, suffix: Option<String>, opts: JsValue) -> Result<WebHeader, JsError> {
        let cfg = rejected(stream_config(&opts, StreamConfig::header()))?;
        let rng = XorShift::new(seed(&opts));
        let inner = rejected(TypingHeader::with_config(prefix, &title, suffix.as_deref(), cfg, rng))?;
        Ok(Self { inner })
    }

    pub fn observe(&mut self, is_intersecting: bool, ratio: f32) -> JsValue {
        step_object(self.inner.stream_mut().observe(Intersection::new(is_intersecting, ratio)))
    }

    pub fn fire(&mut self, ticket: u32) -> JsValue {
        step_object(self.inner.stream_mut().fire(Ticket::from_id(ticket)))
    }

    pub fn unmount(&mut self) { self.inner.stream_mut().unmount(); }

    #[wasm_bindgen(getter)]
    pub fn prefix(&self) -> String { self.inner.prefix().to_string() }

    #[wasm_bindgen(getter, js_name = prefixVisible)]
    pub fn prefix_visible(&self) -> bool { self.inner.prefix_visible() }

    #[wasm_bindgen(getter)]
    pub fn text(&self) -> String { self.inner.stream().text().to_string() }

    #[wasm_bindgen(getter)]
    pub fn active(&self) -> bool { self.inner.stream().is_active() }

    #[wasm_bindgen(getter)]
    pub fn cursor(&self) -> bool { self.inner.stream().show_cursor() }
}

// ============================================================================
// Floating tokens
// ============================================================================

#[wasm_bindgen(js_name = ParticleField)]
pub struct WebParticles {
    inner: ParticleField,
}

#[wasm_bindgen(js_class = ParticleField)]
impl WebParticles {
    /// Mount. Call only on the client so layout never has to match a server pass.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, opts: JsValue) -> Result<WebParticles, JsError> {
        let mut cfg = ParticleConfig::default();
        if let Some(v) = get_u32(&opts, "count") { cfg.display_count = v as usize; }
        if let Some(v) = get_f32(&opts, "radius") { cfg.radius = v; }
        if let Some(v) = get_f32(&opts, "push") { cfg.push = v; }
        let mut rng = XorShift::new(seed(&opts));
        let inner = rejected(ParticleField::new(cfg, Viewport::new(width, height), &mut rng))?;
        Ok(Self { inner })
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f32, y: f32) { self.inner.pointer_move(x, y); }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.inner.resize(Viewport::new(width, height));
    }

    #[wasm_bindgen(getter)]
    pub fn length(&self) -> u32 { self.inner.len() as u32 }

    /// Token text, `undefined` past the end
    pub fn label(&self, i: u32) -> Option<String> {
        self.inner.label(i as usize).map(str::to_string)
    }

    /// Per token: [left %, top %, opacity, font px, delay s]
    pub fn layout(&self) -> Float32Array {
        let f = &self.inner;
        let mut buf = Vec::with_capacity(f.len() * 5);
        for i in 0..f.len() {
            buf.extend_from_slice(&[f.left(i), f.top(i), f.base_opacity(i), f.font_size(i), f.delay(i)]);
        }
        Float32Array::from(&buf[..])
    }

    // Runtime state, see particles::STRIDE
    pub fn output_ptr(&self) -> *const f32 { self.inner.output().as_ptr() }
    pub fn output_len(&self) -> usize { self.inner.output().len() }

    #[wasm_bindgen(js_name = highlightColor)]
    pub fn highlight_color() -> String { particles::HIGHLIGHT_COLOR.to_string() }

    #[wasm_bindgen(js_name = highlightGlow)]
    pub fn highlight_glow() -> String { particles::HIGHLIGHT_GLOW.to_string() }
}

// ============================================================================
// 3D field
// ============================================================================

#[wasm_bindgen(js_name = AmbientField)]
pub struct WebField {
    inner: AmbientField,
    camera: Camera,
}

#[wasm_bindgen(js_class = AmbientField)]
impl WebField {
    /// opts: { pointCount?, lineCount?, damping?, seed?, aspect? }
    #[wasm_bindgen(constructor)]
    pub fn new(opts: JsValue) -> Result<WebField, JsError> {
        let cfg = rejected(field_config(&opts))?;
        let mut rng = XorShift::new(seed(&opts));
        let camera = Camera { aspect: get_f32(&opts, "aspect").unwrap_or(1.0), ..Camera::default() };
        Ok(Self { inner: rejected(AmbientField::new(cfg, &mut rng))?, camera })
    }

    /// Pointer in client px; viewport size for normalization
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.inner.pointer_move(Pointer::from_client(x, y, width, height));
    }

    /// Frame callback with the host clock's elapsed seconds
    pub fn tick(&mut self, elapsed: f32) { self.inner.tick(elapsed); }

    pub fn resize(&mut self, width: f32, height: f32) {
        if height > 0.0 {
            self.camera.aspect = width / height;
        }
    }

    // Geometry (stable for the life of the field)
    pub fn cloud_positions_ptr(&self) -> *const f32 { self.inner.cloud().positions.as_ptr() }
    pub fn cloud_colors_ptr(&self) -> *const f32 { self.inner.cloud().colors.as_ptr() }
    pub fn cloud_len(&self) -> usize { self.inner.cloud().len() }
    pub fn line_positions_ptr(&self) -> *const f32 { self.inner.lines().positions.as_ptr() }
    pub fn line_colors_ptr(&self) -> *const f32 { self.inner.lines().colors.as_ptr() }
    pub fn line_len(&self) -> usize { self.inner.lines().len() }

    // Transforms (column-major)
    #[wasm_bindgen(js_name = cloudMatrix)]
    pub fn cloud_matrix(&self) -> Float32Array { Float32Array::from(&self.inner.cloud_matrix().to_cols_array()[..]) }

    #[wasm_bindgen(js_name = lineMatrix)]
    pub fn line_matrix(&self) -> Float32Array { Float32Array::from(&self.inner.line_matrix().to_cols_array()[..]) }

    #[wasm_bindgen(js_name = orbMatrix)]
    pub fn orb_matrix(&self, i: u32) -> Float32Array {
        let i = (i as usize).min(field::ORBS.len() - 1);
        Float32Array::from(&self.inner.orb_matrix(i).to_cols_array()[..])
    }

    #[wasm_bindgen(js_name = viewProjection)]
    pub fn view_projection(&self) -> Float32Array {
        Float32Array::from(&self.camera.view_projection().to_cols_array()[..])
    }
}

// ============================================================================
// JS interop helpers
// ============================================================================

fn rejected<T>(r: Result<T, ConfigError>) -> Result<T, ConfigError> {
    if let Err(e) = &r {
        log::warn!("rejected configuration: {e}");
    }
    r
}

fn style_object(s: &Style) -> JsValue {
    let obj = Object::new();
    set(&obj, "opacity", s.opacity.into());
    set(&obj, "x", s.x.into());
    set(&obj, "y", s.y.into());
    set(&obj, "duration", s.duration.into());
    set(&obj, "delay", s.delay.into());
    if let Some(e) = s.easing {
        set(&obj, "ease", Float32Array::from(&e[..]).into());
    }
    obj.into()
}

fn step_object(step: Option<Step>) -> JsValue {
    match step {
        None => JsValue::NULL,
        Some(Step::Finished) => {
            let obj = Object::new();
            set(&obj, "done", JsValue::TRUE);
            obj.into()
        }
        Some(Step::Sleep { ticket, delay_ms }) => {
            let obj = Object::new();
            set(&obj, "ticket", ticket.id().into());
            set(&obj, "delay", delay_ms.into());
            obj.into()
        }
    }
}

fn set(obj: &Object, key: &str, value: JsValue) {
    // Setting a plain data property on a fresh Object cannot throw
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value);
}

fn get(obj: &JsValue, key: &str) -> Option<JsValue> {
    if !obj.is_object() {
        return None;
    }
    let v = Reflect::get(obj, &JsValue::from_str(key)).ok()?;
    if v.is_undefined() || v.is_null() {
        return None;
    }
    Some(v)
}

fn get_f32(obj: &JsValue, key: &str) -> Option<f32> {
    get(obj, key)?.as_f64().map(|n| n as f32)
}

fn get_u32(obj: &JsValue, key: &str) -> Option<u32> {
    let n = get(obj, key)?.as_f64()?;
    if !n.is_finite() {
        return None;
    }
    Some(n.round().clamp(0.0, 4294967295.0) as u32)
}

fn get_string(obj: &JsValue, key: &str) -> Option<String> {
    get(obj, key)?.as_string()
}

fn seed(opts: &JsValue) -> u32 {
    get_u32(opts, "seed").unwrap_or_else(|| (js_sys::Math::random() * u32::MAX as f64) as u32)
}

fn reveal_config(opts: &JsValue) -> Result<RevealConfig, ConfigError> {
    let mut cfg = RevealConfig::default();
    if let Some(d) = get_string(opts, "direction") { cfg.direction = d.parse()?; }
    if let Some(v) = get_f32(opts, "delay") { cfg.delay = v; }
    if let Some(v) = get_f32(opts, "threshold") { cfg.threshold = v; }
    Ok(cfg)
}

fn stream_config(opts: &JsValue, base: StreamConfig) -> Result<StreamConfig, ConfigError> {
    let mut cfg = base;
    if let Some(v) = get_f32(opts, "delay") { cfg.delay = v; }
    if let Some(v) = get_u32(opts, "tokenSize") { cfg.chunk_size = v as usize; }
    if let Some(v) = get_f32(opts, "threshold") { cfg.threshold = v; }
    if let Some(speed) = get(opts, "speed") {
        cfg.speed = SpeedRange::new(
            get_f32(&speed, "min").unwrap_or(cfg.speed.min),
            get_f32(&speed, "max").unwrap_or(cfg.speed.max),
        );
    }
    cfg.validate()?;
    Ok(cfg)
}

fn field_config(opts: &JsValue) -> Result<FieldConfig, ConfigError> {
    let mut cfg = FieldConfig::default();
    if let Some(v) = get_u32(opts, "pointCount") { cfg.point_count = v as usize; }
    if let Some(v) = get_u32(opts, "lineCount") { cfg.line_count = v as usize; }
    if let Some(v) = get_f32(opts, "damping") { cfg.damping = v; }
    cfg.validate()?;
    Ok(cfg)
}

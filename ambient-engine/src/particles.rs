// particles.rs - Floating code tokens that shy away from the pointer
//
// Layout is randomized once at mount and never changes. Pointer moves run a
// linear scan over the tokens and write their runtime transform into a flat
// buffer the host copies onto the spans.
//
// Output layout (per token, f32):
//   [dx px, dy px, scale, opacity, highlight (0 or 1)]

use crate::config::{ConfigError, ParticleConfig};
use crate::reveal::Viewport;
use crate::rng::Rng;

pub const CODE_TOKENS: [&str; 44] = [
    "def", "class", "async", "await", "import", "from", "return",
    "tensor", "embed", "transform", "layer", "neural", "forward",
    "model", "train", "optimize", "gradient", "backprop",
    "<AI>", "</AI>", "[]", "{}", "=>", "...", "||",
    "vLLM", "LangGraph", "Milvus", "Next.js", "PyTorch",
    "attention", "tokens", "softmax", "embedding",
    "0x1a", "0xff", "async/await", "RAG", "LLM",
    "GPU", "tensor", "vector", "query", "prompt",
];

pub const HIGHLIGHT_COLOR: &str = "#818cf8";
pub const HIGHLIGHT_GLOW: &str = "0 0 10px #6366f1";

pub const STRIDE: usize = 5;

// Monospace advance and line box relative to font size
const GLYPH_ASPECT: f32 = 0.6;
const LINE_HEIGHT: f32 = 1.2;

/// Displacement magnitude for a token `distance` px from the pointer
#[inline]
pub fn repel(distance: f32, radius: f32, push: f32) -> f32 {
    if distance < radius && radius > 0.0 {
        (radius - distance) / radius * push
    } else {
        0.0
    }
}

pub struct ParticleField {
    labels: Vec<&'static str>,

    // Layout (fixed at mount)
    left: Vec<f32>,  // percent
    top: Vec<f32>,   // percent
    base_opacity: Vec<f32>,
    font_size: Vec<f32>,
    delay: Vec<f32>,

    // Runtime
    dx: Vec<f32>,
    dy: Vec<f32>,
    scale: Vec<f32>,
    opacity: Vec<f32>,
    lit: Vec<bool>,
    original: Vec<Option<f32>>,

    viewport: Viewport,
    config: ParticleConfig,
    out: Vec<f32>,
}

impl ParticleField {
    /// Mount: assign every displayed token its random layout
    pub fn new(config: ParticleConfig, viewport: Viewport, rng: &mut impl Rng) -> Result<Self, ConfigError> {
        config.validate()?;
        let n = config.display_count.min(CODE_TOKENS.len());
        let labels: Vec<&'static str> = CODE_TOKENS[..n].to_vec();

        let mut left = Vec::with_capacity(n);
        let mut top = Vec::with_capacity(n);
        let mut base_opacity = Vec::with_capacity(n);
        let mut font_size = Vec::with_capacity(n);
        let mut delay = Vec::with_capacity(n);

        for i in 0..n {
            left.push(rng.next_f32() * 100.0);
            top.push(rng.next_f32() * 100.0);
            base_opacity.push(rng.range(config.opacity.0, config.opacity.1));
            font_size.push(rng.range(config.font_size.0, config.font_size.1));
            delay.push(i as f32 * config.stagger);
        }

        log::debug!("particles: mounted {n} tokens");

        let mut field = Self {
            labels,
            opacity: base_opacity.clone(),
            left,
            top,
            base_opacity,
            font_size,
            delay,
            dx: vec![0.0; n],
            dy: vec![0.0; n],
            scale: vec![1.0; n],
            lit: vec![false; n],
            original: vec![None; n],
            viewport,
            config,
            out: vec![0.0; n * STRIDE],
        };
        field.encode();
        Ok(field)
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Label box size in px, estimated from the monospace font
    fn extent(&self, i: usize) -> (f32, f32) {
        let chars = self.labels[i].chars().count() as f32;
        let size = self.font_size[i];
        (chars * size * GLYPH_ASPECT, size * LINE_HEIGHT)
    }

    /// Current on-screen center, including the applied displacement
    pub fn center(&self, i: usize) -> (f32, f32) {
        let (w, h) = self.extent(i);
        let x = self.left[i] / 100.0 * self.viewport.width + w * 0.5 + self.dx[i];
        let y = self.top[i] / 100.0 * self.viewport.height + h * 0.5 + self.dy[i];
        (x, y)
    }

    /// Pointer moved to (px, py) in viewport px
    pub fn pointer_move(&mut self, px: f32, py: f32) {
        let radius = self.config.radius;
        let push = self.config.push;

        for i in 0..self.labels.len() {
            let (tx, ty) = self.center(i);
            let (vx, vy) = (tx - px, ty - py);
            let d = (vx * vx + vy * vy).sqrt();

            if d < radius {
                if self.original[i].is_none() {
                    self.original[i] = Some(self.opacity[i]);
                }
                let force = repel(d, radius, push);
                let (ux, uy) = if d > 0.0 { (vx / d, vy / d) } else { (1.0, 0.0) };
                self.dx[i] = ux * force;
                self.dy[i] = uy * force;
                self.scale[i] = self.config.highlight_scale;
                self.opacity[i] = 1.0;
                self.lit[i] = true;
            } else {
                self.dx[i] = 0.0;
                self.dy[i] = 0.0;
                self.scale[i] = 1.0;
                self.opacity[i] = self.original[i].unwrap_or(self.base_opacity[i]);
                self.lit[i] = false;
            }
        }

        self.encode();
    }

    fn encode(&mut self) {
        for i in 0..self.labels.len() {
            let o = i * STRIDE;
            self.out[o] = self.dx[i];
            self.out[o + 1] = self.dy[i];
            self.out[o + 2] = self.scale[i];
            self.out[o + 3] = self.opacity[i];
            self.out[o + 4] = if self.lit[i] { 1.0 } else { 0.0 };
        }
    }

    pub fn len(&self) -> usize { self.labels.len() }
    pub fn is_empty(&self) -> bool { self.labels.is_empty() }
    pub fn label(&self, i: usize) -> Option<&'static str> { self.labels.get(i).copied() }
    pub fn left(&self, i: usize) -> f32 { self.left[i] }
    pub fn top(&self, i: usize) -> f32 { self.top[i] }
    pub fn base_opacity(&self, i: usize) -> f32 { self.base_opacity[i] }
    pub fn font_size(&self, i: usize) -> f32 { self.font_size[i] }
    pub fn delay(&self, i: usize) -> f32 { self.delay[i] }

    pub fn offset(&self, i: usize) -> (f32, f32) { (self.dx[i], self.dy[i]) }
    pub fn scale(&self, i: usize) -> f32 { self.scale[i] }
    pub fn opacity(&self, i: usize) -> f32 { self.opacity[i] }
    pub fn is_lit(&self, i: usize) -> bool { self.lit[i] }

    pub fn output(&self) -> &[f32] { &self.out }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{FixedRng, XorShift};

    fn field() -> ParticleField {
        ParticleField::new(ParticleConfig::default(), Viewport::new(1000.0, 1000.0), &mut XorShift::new(3)).unwrap()
    }

    #[test]
    fn repel_is_zero_at_radius_and_monotone() {
        assert_eq!(repel(150.0, 150.0, 30.0), 0.0);
        assert_eq!(repel(200.0, 150.0, 30.0), 0.0);
        assert_eq!(repel(0.0, 150.0, 30.0), 30.0);

        let mut prev = f32::INFINITY;
        for step in 0..=150 {
            let m = repel(step as f32, 150.0, 30.0);
            assert!(m <= prev);
            prev = m;
        }
        assert!(repel(149.999, 150.0, 30.0) < 1e-3);
    }

    #[test]
    fn layout_ranges() {
        let f = field();
        assert_eq!(f.len(), 25);
        assert_eq!(f.label(0), Some("def"));
        assert_eq!(f.label(24), Some("||"));
        assert_eq!(f.label(25), None);
        for i in 0..f.len() {
            assert!((0.0..100.0).contains(&f.left(i)));
            assert!((0.0..100.0).contains(&f.top(i)));
            assert!((0.1..0.4).contains(&f.base_opacity(i)));
            assert!((12.0..20.0).contains(&f.font_size(i)));
            assert!((f.delay(i) - i as f32 * 0.2).abs() < 1e-6);
            assert_eq!(f.opacity(i), f.base_opacity(i));
        }
    }

    #[test]
    fn resize_rescales_centers() {
        let mut f = field();
        let i = (0..f.len()).find(|&i| f.left(i) > 20.0).unwrap();
        let (left, top) = (f.left(i), f.top(i));
        let (x0, y0) = f.center(i);

        f.resize(Viewport::new(2000.0, 1000.0));
        assert_eq!((f.left(i), f.top(i)), (left, top));
        let (x1, y1) = f.center(i);
        assert!((x1 - x0 - left / 100.0 * 1000.0).abs() < 1e-3);
        assert_eq!(y1, y0);

        // The stale center is now more than a radius away
        f.pointer_move(x0, y0);
        assert!(!f.is_lit(i));

        f.pointer_move(x1, y1);
        assert!(f.is_lit(i));
        assert_eq!(f.offset(i), (30.0, 0.0));
    }

    #[test]
    fn pushes_near_token_away_from_pointer() {
        let mut f = field();
        let (cx, cy) = f.center(0);
        f.pointer_move(cx - 50.0, cy);

        let (dx, dy) = f.offset(0);
        assert!((dx - 100.0 / 150.0 * 30.0).abs() < 1e-3);
        assert!(dy.abs() < 1e-3);
        assert_eq!(f.opacity(0), 1.0);
        assert_eq!(f.scale(0), 1.2);
        assert!(f.is_lit(0));
    }

    #[test]
    fn pointer_on_center_pushes_along_x() {
        let mut f = field();
        let (cx, cy) = f.center(0);
        f.pointer_move(cx, cy);
        assert_eq!(f.offset(0), (30.0, 0.0));
    }

    #[test]
    fn far_pointer_restores_baseline() {
        let mut f = field();
        let base = f.base_opacity(0);
        let (cx, cy) = f.center(0);

        f.pointer_move(cx + 10.0, cy);
        assert_eq!(f.opacity(0), 1.0);

        // Repeated resets keep the captured value.
        for _ in 0..3 {
            f.pointer_move(-10_000.0, -10_000.0);
            assert_eq!(f.opacity(0), base);
            assert_eq!(f.offset(0), (0.0, 0.0));
            assert_eq!(f.scale(0), 1.0);
            assert!(!f.is_lit(0));
        }
    }

    #[test]
    fn output_buffer_tracks_state() {
        let mut f = field();
        let (cx, cy) = f.center(3);
        f.pointer_move(cx, cy + 20.0);
        let o = 3 * STRIDE;
        let out = f.output();
        assert_eq!(out.len(), f.len() * STRIDE);
        assert_eq!(out[o + 2], f.scale(3));
        assert_eq!(out[o + 3], f.opacity(3));
        assert_eq!(out[o + 4], 1.0);
    }

    #[test]
    fn display_count_is_capped_by_catalog() {
        let cfg = ParticleConfig { display_count: 500, ..ParticleConfig::default() };
        let f = ParticleField::new(cfg, Viewport::new(10.0, 10.0), &mut FixedRng::constant(0.5)).unwrap();
        assert_eq!(f.len(), CODE_TOKENS.len());
    }
}

// lines.rs - Short connecting segments
//
// Two vertices per segment; the second endpoint sits a small jitter away
// from the first. Both endpoints share one color.

use super::lerp_color;
use crate::config::FieldConfig;
use crate::rng::Rng;

pub struct LineSegments {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
}

impl LineSegments {
    pub fn generate(cfg: &FieldConfig, rng: &mut impl Rng) -> Self {
        let n = cfg.line_count;
        let mut positions = Vec::with_capacity(n * 6);
        let mut colors = Vec::with_capacity(n * 6);

        for _ in 0..n {
            let a = [
                (rng.next_f32() - 0.5) * cfg.line_box[0],
                (rng.next_f32() - 0.5) * cfg.line_box[1],
                (rng.next_f32() - 0.5) * cfg.line_box[2],
            ];
            let b = [
                a[0] + (rng.next_f32() - 0.5) * cfg.line_jitter,
                a[1] + (rng.next_f32() - 0.5) * cfg.line_jitter,
                a[2] + (rng.next_f32() - 0.5) * cfg.line_jitter,
            ];
            positions.extend_from_slice(&a);
            positions.extend_from_slice(&b);

            let c = lerp_color(cfg.color_from, cfg.color_to, rng.next_f32());
            colors.extend_from_slice(&c);
            colors.extend_from_slice(&c);
        }

        Self { positions, colors }
    }

    /// Segment count
    pub fn len(&self) -> usize { self.positions.len() / 6 }
    pub fn is_empty(&self) -> bool { self.positions.is_empty() }

    pub fn segment(&self, i: usize) -> ([f32; 3], [f32; 3]) {
        let p = &self.positions[i * 6..i * 6 + 6];
        ([p[0], p[1], p[2]], [p[3], p[4], p[5]])
    }
}

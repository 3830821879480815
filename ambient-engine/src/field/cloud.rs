// cloud.rs - Clustered point cloud
//
// Each point picks one of the cluster centers along x and jitters around it.
// Buffers are flat xyz / rgb triples, generated once.

use super::lerp_color;
use crate::config::FieldConfig;
use crate::rng::Rng;

pub struct PointCloud {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
}

impl PointCloud {
    pub fn generate(cfg: &FieldConfig, rng: &mut impl Rng) -> Self {
        let n = cfg.point_count;
        let mut positions = Vec::with_capacity(n * 3);
        let mut colors = Vec::with_capacity(n * 3);

        for _ in 0..n {
            let cluster = rng.below(cfg.clusters.max(1));
            let cx = cluster as f32 * cfg.cluster_spacing + cfg.cluster_origin;

            positions.push((rng.next_f32() - 0.5) * cfg.spread[0] + cx);
            positions.push((rng.next_f32() - 0.5) * cfg.spread[1]);
            positions.push((rng.next_f32() - 0.5) * cfg.spread[2] + cfg.z_bias);

            let t = rng.next_f32();
            colors.extend_from_slice(&lerp_color(cfg.color_from, cfg.color_to, t));
        }

        Self { positions, colors }
    }

    pub fn len(&self) -> usize { self.positions.len() / 3 }
    pub fn is_empty(&self) -> bool { self.positions.is_empty() }

    #[inline]
    pub fn point(&self, i: usize) -> [f32; 3] {
        [self.positions[i * 3], self.positions[i * 3 + 1], self.positions[i * 3 + 2]]
    }
}

// config.rs - Tunable parameters for every effect
//
// Defaults reproduce the site as shipped. Hosts override individual
// fields; `validate` rejects values the engines cannot run with.

use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("chunk size must be at least 1")]
    ZeroChunkSize,

    #[error("speed range is inverted: min {min}ms > max {max}ms")]
    InvertedSpeed { min: f32, max: f32 },

    #[error("{field} range is inverted: min {min} > max {max}")]
    InvertedRange { field: &'static str, min: f32, max: f32 },

    #[error("opacity must lie in [0, 1], got {0}")]
    Opacity(f32),

    #[error("{field} must be finite and non-negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("threshold must lie in [0, 1], got {0}")]
    Threshold(f32),

    #[error("damping must lie in (0, 1], got {0}")]
    Damping(f32),

    #[error("unknown reveal direction {0:?}")]
    Direction(String),
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

/// Both bounds finite and non-negative, min <= max
fn ordered(field: &'static str, (min, max): (f32, f32)) -> Result<(), ConfigError> {
    non_negative(field, min)?;
    non_negative(field, max)?;
    if min > max {
        return Err(ConfigError::InvertedRange { field, min, max });
    }
    Ok(())
}

fn unit_threshold(value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Threshold(value))
    }
}

// ============================================================================
// Reveal
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Hidden-state offset (x, y) in px for a travel distance
    pub fn hidden_offset(self, distance: f32) -> (f32, f32) {
        match self {
            Direction::Up => (0.0, distance),
            Direction::Down => (0.0, -distance),
            Direction::Left => (-distance, 0.0),
            Direction::Right => (distance, 0.0),
        }
    }
}

impl FromStr for Direction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            other => Err(ConfigError::Direction(other.to_string())),
        }
    }
}

/// cubic-bezier(0.25, 0.4, 0.25, 1)
pub const REVEAL_EASING: [f32; 4] = [0.25, 0.4, 0.25, 1.0];

#[derive(Clone, Debug, PartialEq)]
pub struct RevealConfig {
    pub direction: Direction,
    /// Seconds before the transition starts
    pub delay: f32,
    /// Seconds
    pub duration: f32,
    /// px travelled from the hidden offset
    pub distance: f32,
    pub threshold: f32,
    /// Bottom root margin in px; negative shrinks the viewport
    pub bottom_margin: f32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            direction: Direction::Up,
            delay: 0.0,
            duration: 0.6,
            distance: 60.0,
            threshold: 0.1,
            bottom_margin: -100.0,
        }
    }
}

impl RevealConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("delay", self.delay)?;
        non_negative("duration", self.duration)?;
        unit_threshold(self.threshold)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StaggerConfig {
    /// Seconds between consecutive children
    pub stagger: f32,
    pub duration: f32,
    pub distance: f32,
    pub threshold: f32,
}

impl Default for StaggerConfig {
    fn default() -> Self {
        Self { stagger: 0.1, duration: 0.5, distance: 30.0, threshold: 0.1 }
    }
}

impl StaggerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("stagger", self.stagger)?;
        non_negative("duration", self.duration)?;
        unit_threshold(self.threshold)
    }
}

// ============================================================================
// Streaming text
// ============================================================================

/// Per-chunk delay bounds in ms
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeedRange {
    pub min: f32,
    pub max: f32,
}

impl SpeedRange {
    pub const fn new(min: f32, max: f32) -> Self { Self { min, max } }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StreamConfig {
    /// chars per chunk
    pub chunk_size: usize,
    pub speed: SpeedRange,
    /// ms before the first chunk
    pub delay: f32,
    pub threshold: f32,
}

impl Default for StreamConfig {
    fn default() -> Self { Self::text() }
}

impl StreamConfig {
    /// Token-streaming body text
    pub fn text() -> Self {
        Self {
            chunk_size: 3,
            speed: SpeedRange::new(10.0, 30.0),
            delay: 0.0,
            threshold: 0.1,
        }
    }

    /// Char-by-char section header
    pub fn header() -> Self {
        Self {
            chunk_size: 1,
            speed: SpeedRange::new(30.0, 80.0),
            delay: 300.0,
            threshold: 0.3,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        non_negative("speed.min", self.speed.min)?;
        non_negative("speed.max", self.speed.max)?;
        if self.speed.min > self.speed.max {
            return Err(ConfigError::InvertedSpeed { min: self.speed.min, max: self.speed.max });
        }
        non_negative("delay", self.delay)?;
        unit_threshold(self.threshold)
    }
}

// ============================================================================
// Particle field
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct ParticleConfig {
    /// Tokens taken from the front of the catalog
    pub display_count: usize,
    /// Repulsion radius in px
    pub radius: f32,
    /// Max displacement in px at distance 0
    pub push: f32,
    pub opacity: (f32, f32),
    /// Font size range in px
    pub font_size: (f32, f32),
    /// Seconds between token animation starts
    pub stagger: f32,
    /// Scale applied while repelled
    pub highlight_scale: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            display_count: 25,
            radius: 150.0,
            push: 30.0,
            opacity: (0.1, 0.4),
            font_size: (12.0, 20.0),
            stagger: 0.2,
            highlight_scale: 1.2,
        }
    }
}

impl ParticleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("radius", self.radius)?;
        non_negative("push", self.push)?;
        non_negative("stagger", self.stagger)?;
        ordered("opacity", self.opacity)?;
        if self.opacity.1 > 1.0 {
            return Err(ConfigError::Opacity(self.opacity.1));
        }
        ordered("font_size", self.font_size)
    }
}

// ============================================================================
// Ambient field
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
    pub point_count: usize,
    pub line_count: usize,

    // Cluster layout: center x = index * spacing + origin
    pub clusters: usize,
    pub cluster_spacing: f32,
    pub cluster_origin: f32,
    /// Jitter extent per axis around a cluster center
    pub spread: [f32; 3],
    pub z_bias: f32,

    /// Bounding box of line start points, centered on the origin
    pub line_box: [f32; 3],
    /// Extent of the second endpoint's offset per axis
    pub line_jitter: f32,

    pub color_from: [f32; 3],
    pub color_to: [f32; 3],

    /// Cloud spin in rad/s around x and y
    pub cloud_spin: [f32; 2],
    /// Line spin in rad/s around z
    pub line_spin: f32,
    /// Line sway around y: (frequency, amplitude)
    pub line_sway: (f32, f32),

    /// Target rotation per unit of normalized pointer
    pub pointer_gain: f32,
    pub damping: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            point_count: 1500,
            line_count: 150,
            clusters: 5,
            cluster_spacing: 3.0,
            cluster_origin: -6.0,
            spread: [15.0, 15.0, 10.0],
            z_bias: -5.0,
            line_box: [20.0, 20.0, 10.0],
            line_jitter: 3.0,
            color_from: [0.39, 0.30, 0.85],
            color_to: [0.54, 0.50, 1.00],
            cloud_spin: [0.03, 0.02],
            line_spin: 0.01,
            line_sway: (0.1, 0.1),
            pointer_gain: 0.5,
            damping: 0.01,
        }
    }
}

impl FieldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(ConfigError::Damping(self.damping));
        }
        non_negative("line_jitter", self.line_jitter)?;
        for v in self.spread.iter().chain(self.line_box.iter()) {
            non_negative("extent", *v)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        RevealConfig::default().validate().unwrap();
        StaggerConfig::default().validate().unwrap();
        StreamConfig::text().validate().unwrap();
        StreamConfig::header().validate().unwrap();
        ParticleConfig::default().validate().unwrap();
        FieldConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_zero_chunk() {
        let cfg = StreamConfig { chunk_size: 0, ..StreamConfig::text() };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroChunkSize));
    }

    #[test]
    fn rejects_inverted_speed() {
        let cfg = StreamConfig { speed: SpeedRange::new(50.0, 10.0), ..StreamConfig::text() };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvertedSpeed { min: 50.0, max: 10.0 })
        );
    }

    #[test]
    fn rejects_negative_delay() {
        let cfg = StreamConfig { delay: -1.0, ..StreamConfig::text() };
        assert!(matches!(cfg.validate(), Err(ConfigError::Negative { field: "delay", .. })));
    }

    #[test]
    fn rejects_bad_damping() {
        for d in [0.0, -0.5, 1.5, f32::NAN] {
            let cfg = FieldConfig { damping: d, ..FieldConfig::default() };
            assert!(matches!(cfg.validate(), Err(ConfigError::Damping(_))));
        }
        let cfg = FieldConfig { damping: 1.0, ..FieldConfig::default() };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn parses_directions() {
        assert_eq!("left".parse::<Direction>(), Ok(Direction::Left));
        assert_eq!(
            "sideways".parse::<Direction>(),
            Err(ConfigError::Direction("sideways".into()))
        );
    }

    #[test]
    fn hidden_offsets_match_axis_and_sign() {
        assert_eq!(Direction::Up.hidden_offset(60.0), (0.0, 60.0));
        assert_eq!(Direction::Down.hidden_offset(60.0), (0.0, -60.0));
        assert_eq!(Direction::Left.hidden_offset(60.0), (-60.0, 0.0));
        assert_eq!(Direction::Right.hidden_offset(60.0), (60.0, 0.0));
    }

    #[test]
    fn rejects_inverted_particle_ranges() {
        let cfg = ParticleConfig { opacity: (0.4, 0.1), ..ParticleConfig::default() };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvertedRange { field: "opacity", min: 0.4, max: 0.1 })
        );
        let cfg = ParticleConfig { font_size: (20.0, 12.0), ..ParticleConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvertedRange { field: "font_size", .. })));

        let cfg = ParticleConfig { opacity: (0.3, 0.3), ..ParticleConfig::default() };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_opacity_above_one() {
        let cfg = ParticleConfig { opacity: (0.5, 1.5), ..ParticleConfig::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::Opacity(1.5)));
        let cfg = ParticleConfig { opacity: (0.0, 1.0), ..ParticleConfig::default() };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_non_finite_particle_ranges() {
        for bad in [(12.0, f32::INFINITY), (f32::NAN, 20.0), (-1.0, 20.0)] {
            let cfg = ParticleConfig { font_size: bad, ..ParticleConfig::default() };
            assert!(matches!(cfg.validate(), Err(ConfigError::Negative { field: "font_size", .. })));
        }
        let cfg = ParticleConfig { opacity: (0.1, f32::NAN), ..ParticleConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::Negative { field: "opacity", .. })));
    }
}

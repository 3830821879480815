// reveal.rs - Scroll-triggered reveal
//
// A one-shot latch over visibility observations. The host either feeds raw
// observer entries or element rects; once the latch fires, observation
// stops and the element stays revealed.

use crate::config::{ConfigError, RevealConfig, StaggerConfig, REVEAL_EASING};

/// Two-state one-way switch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Latch {
    #[default]
    Pending,
    Triggered,
}

impl Latch {
    /// Returns true only on the pending -> triggered transition
    pub fn fire(&mut self) -> bool {
        match self {
            Latch::Pending => {
                *self = Latch::Triggered;
                true
            }
            Latch::Triggered => false,
        }
    }

    pub fn is_triggered(self) -> bool { self == Latch::Triggered }
}

// ============================================================================
// Geometry
// ============================================================================

/// Element box in viewport px
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self { Self { width, height } }
}

/// One visibility observation
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Intersection {
    pub is_intersecting: bool,
    /// Visible fraction of the element, 0..=1
    pub ratio: f32,
}

impl Intersection {
    pub fn new(is_intersecting: bool, ratio: f32) -> Self {
        Self { is_intersecting, ratio }
    }

    /// Measure `rect` against the viewport grown (or shrunk, when negative)
    /// by `bottom_margin` at its bottom edge. Edge contact counts as
    /// intersecting with ratio 0.
    pub fn measure(rect: Rect, viewport: Viewport, bottom_margin: f32) -> Self {
        let root_bottom = viewport.height + bottom_margin;

        let ix = (rect.left + rect.width).min(viewport.width) - rect.left.max(0.0);
        let iy = (rect.top + rect.height).min(root_bottom) - rect.top.max(0.0);
        if ix < 0.0 || iy < 0.0 {
            return Self::default();
        }

        let area = rect.width * rect.height;
        let ratio = if area > 0.0 { (ix * iy / area).clamp(0.0, 1.0) } else { 1.0 };
        Self { is_intersecting: true, ratio }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observer {
    pub threshold: f32,
    pub bottom_margin: f32,
}

impl Observer {
    pub fn new(threshold: f32, bottom_margin: f32) -> Self {
        Self { threshold, bottom_margin }
    }

    #[inline]
    pub fn passes(&self, entry: Intersection) -> bool {
        entry.is_intersecting && entry.ratio >= self.threshold
    }

    pub fn measure(&self, rect: Rect, viewport: Viewport) -> Intersection {
        Intersection::measure(rect, viewport, self.bottom_margin)
    }
}

/// Latch behind an observer that disconnects on the first passing entry
#[derive(Clone, Copy, Debug)]
struct Gate {
    latch: Latch,
    observer: Observer,
    observing: bool,
}

impl Gate {
    fn new(observer: Observer) -> Self {
        Self { latch: Latch::Pending, observer, observing: true }
    }

    /// True only for the entry that fires the latch
    fn observe(&mut self, entry: Intersection) -> bool {
        if !self.observing || !self.observer.passes(entry) {
            return false;
        }
        self.observing = false;
        self.latch.fire()
    }

    fn measure(&self, rect: Rect, viewport: Viewport) -> Intersection {
        self.observer.measure(rect, viewport)
    }

    fn disconnect(&mut self) { self.observing = false; }
}

// ============================================================================
// Styles
// ============================================================================

/// Animation target handed to the host's animation library
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Style {
    pub opacity: f32,
    pub x: f32,
    pub y: f32,
    /// Seconds
    pub duration: f32,
    /// Seconds
    pub delay: f32,
    pub easing: Option<[f32; 4]>,
}

// ============================================================================
// Single reveal
// ============================================================================

#[derive(Clone, Debug)]
pub struct RevealTrigger {
    gate: Gate,
    config: RevealConfig,
}

impl RevealTrigger {
    pub fn new(config: RevealConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            gate: Gate::new(Observer::new(config.threshold, config.bottom_margin)),
            config,
        })
    }

    /// Feed an observer entry. Returns true when this entry revealed the element.
    pub fn observe(&mut self, entry: Intersection) -> bool {
        let fired = self.gate.observe(entry);
        if fired {
            log::debug!("reveal: triggered at ratio {:.2}", entry.ratio);
        }
        fired
    }

    pub fn observe_rect(&mut self, rect: Rect, viewport: Viewport) -> bool {
        let entry = self.gate.measure(rect, viewport);
        self.observe(entry)
    }

    /// Stop observing without revealing
    pub fn unmount(&mut self) { self.gate.disconnect(); }

    pub fn is_visible(&self) -> bool { self.gate.latch.is_triggered() }
    pub fn is_observing(&self) -> bool { self.gate.observing }
    pub fn config(&self) -> &RevealConfig { &self.config }

    pub fn style(&self) -> Style {
        let (x, y, opacity) = if self.is_visible() {
            (0.0, 0.0, 1.0)
        } else {
            let (x, y) = self.config.direction.hidden_offset(self.config.distance);
            (x, y, 0.0)
        };
        Style {
            opacity,
            x,
            y,
            duration: self.config.duration,
            delay: self.config.delay,
            easing: Some(REVEAL_EASING),
        }
    }
}

// ============================================================================
// Staggered reveal
// ============================================================================

/// One latch, many children, cascading delays
#[derive(Clone, Debug)]
pub struct StaggerReveal {
    gate: Gate,
    children: usize,
    config: StaggerConfig,
}

impl StaggerReveal {
    pub fn new(children: usize, config: StaggerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            gate: Gate::new(Observer::new(config.threshold, 0.0)),
            children,
            config,
        })
    }

    pub fn observe(&mut self, entry: Intersection) -> bool {
        let fired = self.gate.observe(entry);
        if fired {
            log::debug!("stagger: triggered for {} children", self.children);
        }
        fired
    }

    pub fn observe_rect(&mut self, rect: Rect, viewport: Viewport) -> bool {
        let entry = self.gate.measure(rect, viewport);
        self.observe(entry)
    }

    pub fn unmount(&mut self) { self.gate.disconnect(); }

    pub fn is_visible(&self) -> bool { self.gate.latch.is_triggered() }
    pub fn is_observing(&self) -> bool { self.gate.observing }
    pub fn len(&self) -> usize { self.children }
    pub fn is_empty(&self) -> bool { self.children == 0 }

    pub fn child_style(&self, index: usize) -> Style {
        let (y, opacity) = if self.is_visible() { (0.0, 1.0) } else { (self.config.distance, 0.0) };
        Style {
            opacity,
            x: 0.0,
            y,
            duration: self.config.duration,
            delay: index as f32 * self.config.stagger,
            easing: None,
        }
    }

    pub fn styles(&self) -> impl Iterator<Item = Style> + '_ {
        (0..self.children).map(|i| self.child_style(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Direction;

    fn viewport() -> Viewport { Viewport::new(1000.0, 800.0) }

    #[test]
    fn latch_fires_once() {
        let mut latch = Latch::default();
        assert!(latch.fire());
        assert!(!latch.fire());
        assert!(latch.is_triggered());
    }

    #[test]
    fn hidden_until_threshold() {
        let mut r = RevealTrigger::new(RevealConfig::default()).unwrap();
        assert!(!r.observe(Intersection::new(true, 0.05)));
        assert!(!r.observe(Intersection::new(false, 0.0)));
        assert!(!r.is_visible());
        assert!(r.is_observing());

        assert!(r.observe(Intersection::new(true, 0.1)));
        assert!(r.is_visible());
        assert!(!r.is_observing());
    }

    #[test]
    fn stays_visible_after_scrolling_away() {
        let mut r = RevealTrigger::new(RevealConfig::default()).unwrap();
        r.observe(Intersection::new(true, 1.0));
        for _ in 0..5 {
            assert!(!r.observe(Intersection::new(false, 0.0)));
            assert!(!r.observe(Intersection::new(true, 1.0)));
        }
        assert!(r.is_visible());
    }

    #[test]
    fn unmount_stops_observation() {
        let mut r = RevealTrigger::new(RevealConfig::default()).unwrap();
        r.unmount();
        assert!(!r.observe(Intersection::new(true, 1.0)));
        assert!(!r.is_visible());
    }

    #[test]
    fn bottom_margin_delays_trigger() {
        let mut r = RevealTrigger::new(RevealConfig::default()).unwrap();
        // Top edge 50px into the viewport: inside the raw viewport but
        // still within the 100px dead band.
        let rect = Rect::new(0.0, 750.0, 400.0, 200.0);
        assert!(!r.observe_rect(rect, viewport()));

        // 50px past the band on a 200px element is 25% visible.
        let rect = Rect::new(0.0, 650.0, 400.0, 200.0);
        assert!(r.observe_rect(rect, viewport()));
    }

    #[test]
    fn measure_handles_offscreen_and_partial() {
        let off = Intersection::measure(Rect::new(0.0, 900.0, 100.0, 100.0), viewport(), 0.0);
        assert!(!off.is_intersecting);

        let half = Intersection::measure(Rect::new(0.0, 750.0, 100.0, 100.0), viewport(), 0.0);
        assert!(half.is_intersecting);
        assert!((half.ratio - 0.5).abs() < 1e-6);

        let full = Intersection::measure(Rect::new(10.0, 10.0, 100.0, 100.0), viewport(), 0.0);
        assert_eq!(full.ratio, 1.0);
    }

    #[test]
    fn directional_hidden_states_converge() {
        for (dir, hidden) in [
            (Direction::Up, (0.0, 60.0)),
            (Direction::Down, (0.0, -60.0)),
            (Direction::Left, (-60.0, 0.0)),
            (Direction::Right, (60.0, 0.0)),
        ] {
            let cfg = RevealConfig { direction: dir, delay: 0.2, ..RevealConfig::default() };
            let mut r = RevealTrigger::new(cfg).unwrap();
            let s = r.style();
            assert_eq!((s.x, s.y, s.opacity), (hidden.0, hidden.1, 0.0));
            assert_eq!(s.delay, 0.2);

            r.observe(Intersection::new(true, 1.0));
            let s = r.style();
            assert_eq!((s.x, s.y, s.opacity), (0.0, 0.0, 1.0));
        }
    }

    #[test]
    fn stagger_cascades_by_index() {
        let mut s = StaggerReveal::new(4, StaggerConfig::default()).unwrap();
        assert!(s.styles().all(|st| st.opacity == 0.0 && st.y == 30.0));

        assert!(s.observe(Intersection::new(true, 0.1)));
        let delays: Vec<f32> = s.styles().map(|st| st.delay).collect();
        assert_eq!(delays.len(), 4);
        for (i, d) in delays.iter().enumerate() {
            assert!((d - i as f32 * 0.1).abs() < 1e-6);
        }
        assert!(s.styles().all(|st| st.opacity == 1.0 && st.y == 0.0));
    }

    #[test]
    fn stagger_has_no_margin() {
        let mut s = StaggerReveal::new(2, StaggerConfig::default()).unwrap();
        // 20% visible at the raw bottom edge.
        assert!(s.observe_rect(Rect::new(0.0, 760.0, 100.0, 200.0), viewport()));
    }

    #[test]
    fn stagger_disconnects_after_trigger() {
        let mut s = StaggerReveal::new(3, StaggerConfig::default()).unwrap();
        assert!(!s.observe(Intersection::new(true, 0.05)));
        assert!(s.is_observing());

        assert!(s.observe(Intersection::new(true, 0.5)));
        assert!(!s.is_observing());
        assert!(!s.observe(Intersection::new(false, 0.0)));
        assert!(!s.observe(Intersection::new(true, 1.0)));
        assert!(s.is_visible());
    }

    #[test]
    fn stagger_unmount_keeps_children_hidden() {
        let mut s = StaggerReveal::new(3, StaggerConfig::default()).unwrap();
        s.unmount();
        assert!(!s.is_observing());
        assert!(!s.observe(Intersection::new(true, 1.0)));
        assert!(s.styles().all(|st| st.opacity == 0.0));
    }
}

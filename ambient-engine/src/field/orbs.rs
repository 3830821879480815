// orbs.rs - Floating orbs on closed-form paths
//
// Position is a pure function of elapsed time: one sinusoid per axis.

use glam::Vec3;

#[derive(Clone, Copy, Debug)]
pub enum Wave {
    Sin,
    Cos,
}

/// amp * wave(freq * t + phase) + bias
#[derive(Clone, Copy, Debug)]
pub struct Axis {
    pub wave: Wave,
    pub freq: f32,
    pub phase: f32,
    pub amp: f32,
    pub bias: f32,
}

impl Axis {
    const fn new(wave: Wave, freq: f32, phase: f32, amp: f32, bias: f32) -> Self {
        Self { wave, freq, phase, amp, bias }
    }

    #[inline]
    pub fn eval(&self, t: f32) -> f32 {
        let a = self.freq * t + self.phase;
        let v = match self.wave {
            Wave::Sin => a.sin(),
            Wave::Cos => a.cos(),
        };
        v * self.amp + self.bias
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Orb {
    pub path: [Axis; 3],
    pub radius: f32,
    pub color: [f32; 3],
    pub opacity: f32,
}

impl Orb {
    pub fn position(&self, t: f32) -> Vec3 {
        Vec3::new(self.path[0].eval(t), self.path[1].eval(t), self.path[2].eval(t))
    }
}

const fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

pub const ORBS: [Orb; 3] = [
    Orb {
        path: [
            Axis::new(Wave::Sin, 0.3, 0.0, 5.0, 0.0),
            Axis::new(Wave::Cos, 0.2, 0.0, 3.0, 0.0),
            Axis::new(Wave::Sin, 0.4, 0.0, 2.0, -3.0),
        ],
        radius: 0.3,
        color: rgb(0x6366f1),
        opacity: 0.3,
    },
    Orb {
        path: [
            Axis::new(Wave::Cos, 0.25, 0.0, 4.0, 0.0),
            Axis::new(Wave::Sin, 0.35, 0.0, 4.0, 0.0),
            Axis::new(Wave::Cos, 0.3, 0.0, 2.0, -4.0),
        ],
        radius: 0.2,
        color: rgb(0x8b5cf6),
        opacity: 0.4,
    },
    Orb {
        path: [
            Axis::new(Wave::Sin, 0.2, 2.0, 6.0, 0.0),
            Axis::new(Wave::Cos, 0.3, 1.0, 2.0, 0.0),
            Axis::new(Wave::Sin, 0.25, 2.0, 3.0, -2.0),
        ],
        radius: 0.25,
        color: rgb(0xa855f7),
        opacity: 0.25,
    },
];

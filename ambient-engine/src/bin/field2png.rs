// field2png - Render one frame of the ambient field to a PNG
//
// Used for social-card images and for eyeballing config changes without a
// browser. Points and lines are additively blended over the page background;
// orbs are drawn as translucent discs.
//
// Usage: cargo run --bin field2png -- <out.png> [--width N] [--height N] [--time S] [--seed N]

use std::env;

use ambient_engine::config::FieldConfig;
use ambient_engine::field::{
    AmbientField, BACKGROUND, Camera, LINE_OPACITY, ORBS, POINT_OPACITY, POINT_SIZE, Pointer,
};
use ambient_engine::rng::XorShift;
use glam::{Mat4, Vec3};
use image::{Rgb, RgbImage};

struct Canvas {
    w: u32,
    h: u32,
    px: Vec<[f32; 3]>,
}

impl Canvas {
    fn new(w: u32, h: u32) -> Self {
        Self { w, h, px: vec![BACKGROUND; w as usize * h as usize] }
    }

    /// Buffer slot for (x, y), None off canvas
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.w || y as u32 >= self.h {
            return None;
        }
        Some(y as usize * self.w as usize + x as usize)
    }

    /// NDC to pixel coordinates
    fn to_screen(&self, ndc: Vec3) -> (f32, f32) {
        ((ndc.x * 0.5 + 0.5) * self.w as f32, (0.5 - ndc.y * 0.5) * self.h as f32)
    }

    fn add(&mut self, x: i32, y: i32, c: [f32; 3], a: f32) {
        let Some(i) = self.index(x, y) else { return };
        let p = &mut self.px[i];
        for k in 0..3 {
            p[k] += c[k] * a;
        }
    }

    fn blend(&mut self, x: i32, y: i32, c: [f32; 3], a: f32) {
        let Some(i) = self.index(x, y) else { return };
        let p = &mut self.px[i];
        for k in 0..3 {
            p[k] = p[k] * (1.0 - a) + c[k] * a;
        }
    }

    fn disc(&mut self, cx: f32, cy: f32, r: f32, c: [f32; 3], a: f32, additive: bool) {
        let r = r.max(0.5);
        let (x0, x1) = ((cx - r).floor() as i32, (cx + r).ceil() as i32);
        let (y0, y1) = ((cy - r).floor() as i32, (cy + r).ceil() as i32);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let (dx, dy) = (x as f32 + 0.5 - cx, y as f32 + 0.5 - cy);
                if dx * dx + dy * dy > r * r { continue; }
                if additive { self.add(x, y, c, a) } else { self.blend(x, y, c, a) }
            }
        }
    }

    fn line(&mut self, a: (f32, f32), b: (f32, f32), c: [f32; 3], alpha: f32) {
        let steps = (b.0 - a.0).abs().max((b.1 - a.1).abs()).ceil().max(1.0) as i32;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = a.0 + (b.0 - a.0) * t;
            let y = a.1 + (b.1 - a.1) * t;
            self.add(x as i32, y as i32, c, alpha);
        }
    }

    fn into_image(self) -> RgbImage {
        let mut img = RgbImage::new(self.w, self.h);
        for (i, p) in self.px.iter().enumerate() {
            let x = (i % self.w as usize) as u32;
            let y = (i / self.w as usize) as u32;
            let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0) as u8;
            img.put_pixel(x, y, Rgb([q(p[0]), q(p[1]), q(p[2])]));
        }
        img
    }
}

/// World-space size at `depth` from the camera to pixels
fn world_to_px(cam: &Camera, h: u32, size: f32, depth: f32) -> f32 {
    let half = (cam.fov.to_radians() * 0.5).tan();
    size / (half * depth) * h as f32 * 0.5
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <out.png> [--width N] [--height N] [--time S] [--seed N]", args[0]);
        std::process::exit(1);
    }

    // Parse arguments
    let out_path = &args[1];
    let mut width = 1200u32;
    let mut height = 630u32;
    let mut time = 0.0f32;
    let mut seed = 1u32;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--width" => { width = args.get(i+1).and_then(|s| s.parse().ok()).unwrap_or(1200); i += 2; }
            "--height" => { height = args.get(i+1).and_then(|s| s.parse().ok()).unwrap_or(630); i += 2; }
            "--time" => { time = args.get(i+1).and_then(|s| s.parse().ok()).unwrap_or(0.0); i += 2; }
            "--seed" => { seed = args.get(i+1).and_then(|s| s.parse().ok()).unwrap_or(1); i += 2; }
            _ => i += 1,
        }
    }
    let (width, height) = (width.max(1), height.max(1));

    println!("Rendering {} ({}x{}, t={}s, seed {})...", out_path, width, height, time, seed);

    let mut field = match AmbientField::new(FieldConfig::default(), &mut XorShift::new(seed)) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Invalid field configuration: {e}");
            std::process::exit(1);
        }
    };
    field.update(time, Pointer::default());

    let cam = Camera { aspect: width as f32 / height as f32, ..Camera::default() };
    let vp = cam.view_projection();
    let mut canvas = Canvas::new(width, height);

    // Lines
    println!("  {} segments...", field.lines().len());
    let mvp = vp * field.line_matrix();
    let lines = field.lines();
    for s in 0..lines.len() {
        let (a, b) = lines.segment(s);
        let c = [lines.colors[s * 6], lines.colors[s * 6 + 1], lines.colors[s * 6 + 2]];
        let (Some(pa), Some(pb)) = (project(&cam, &mvp, a), project(&cam, &mvp, b)) else { continue };
        canvas.line(canvas.to_screen(pa), canvas.to_screen(pb), c, LINE_OPACITY);
    }

    // Points
    println!("  {} points...", field.cloud().len());
    let model = field.cloud_matrix();
    let mvp = vp * model;
    let cloud = field.cloud();
    for p in 0..cloud.len() {
        let world = Vec3::from(cloud.point(p));
        let Some(ndc) = project(&cam, &mvp, cloud.point(p)) else { continue };
        let depth = (cam.position - model.transform_point3(world)).length().max(0.1);
        let r = world_to_px(&cam, height, POINT_SIZE * 0.5, depth);
        let (x, y) = canvas.to_screen(ndc);
        let c = [cloud.colors[p * 3], cloud.colors[p * 3 + 1], cloud.colors[p * 3 + 2]];
        canvas.disc(x, y, r, c, POINT_OPACITY, true);
    }

    // Orbs
    println!("  {} orbs...", ORBS.len());
    for (orb, pos) in ORBS.iter().zip(field.orb_positions()) {
        let Some(ndc) = cam.project(&vp, *pos) else { continue };
        let depth = (cam.position - *pos).length().max(0.1);
        let r = world_to_px(&cam, height, orb.radius, depth);
        let (x, y) = canvas.to_screen(ndc);
        canvas.disc(x, y, r, orb.color, orb.opacity, false);
    }

    let img = canvas.into_image();
    if let Err(e) = img.save(out_path) {
        eprintln!("Failed to write {}: {}", out_path, e);
        std::process::exit(1);
    }
    println!("Done.");
}

fn project(cam: &Camera, mvp: &Mat4, p: [f32; 3]) -> Option<Vec3> {
    cam.project(mvp, Vec3::from(p))
}

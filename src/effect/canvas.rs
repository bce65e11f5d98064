// Raster (canvas) effects
//
// These render into the shared offscreen image each tick; the compositor
// then samples the raster at every LED's mapped coordinate. Scroll offsets
// and rotation are driven by elapsed wall-clock time so animation speed is
// independent of tick jitter.

use std::f32::consts::TAU;

use image::RgbImage;
use rand::Rng;

use crate::color::Rgb;
use crate::font;
use crate::particles::{ColorRange, ParticlePool, SpawnRanges, Vec2};

/// Horizontal/vertical scroll rate in canvas pixels per millisecond.
const SCROLL_RATE: f64 = 0.08;

/// Falling balls: emitted from the top center, fanning wide and pulled
/// down by randomized gravity.
pub const FALLING_SPAWN: SpawnRanges = SpawnRanges {
    velocity_x: (-16.0, 16.0),
    velocity_y: (-6.0, 8.0),
    accel_x: (0.0, 0.0),
    accel_y: (0.01, 0.12),
    size: 8.0,
    color: ColorRange::Hsl {
        hue: (0.0, 360.0),
        saturation: (0.0, 1.0),
        lightness: (0.6, 1.0),
    },
};

/// Snow: white flakes drifting in from the left edge, pushed by a shared
/// wind that is re-randomized every tick.
pub const SNOW_SPAWN: SpawnRanges = SpawnRanges {
    velocity_x: (-5.0, 5.0),
    velocity_y: (-5.0, 5.0),
    accel_x: (0.0, 0.0),
    accel_y: (0.0, 0.08),
    size: 6.0,
    color: ColorRange::Fixed(Rgb::WHITE),
};

/// Expanding balls: seeded anywhere on the canvas, growing every tick
/// until pool turnover replaces them.
pub const EXPANDING_SPAWN: SpawnRanges = SpawnRanges {
    velocity_x: (-0.1, 0.2),
    velocity_y: (-0.2, 0.2),
    accel_x: (-0.1, 0.21),
    accel_y: (-0.2, 0.2),
    size: 4.0,
    color: ColorRange::Hsl {
        hue: (0.0, 360.0),
        saturation: (0.0, 1.0),
        lightness: (0.6, 1.0),
    },
};

pub fn clear(img: &mut RgbImage) {
    for p in img.pixels_mut() {
        *p = image::Rgb([0, 0, 0]);
    }
}

/// Scroll `message` across the canvas right-to-left, wrapping once fully
/// off screen. The glyph color is re-randomized every frame.
pub fn scroll_text(img: &mut RgbImage, message: &str, elapsed_ms: u64, rng: &mut impl Rng) {
    clear(img);
    let (w, h) = img.dimensions();
    let scale = (h / (font::CELL_H + 3)).max(1);
    let text_w = font::measure(message, scale) as i64;
    let span = text_w + w as i64;
    let x = w as i64 - (elapsed_ms as f64 * SCROLL_RATE) as i64 % span;
    let y = ((h - font::CELL_H * scale) / 2) as i32;

    let color = happy_color(rng);
    font::draw_text(img, message, x as i32, y, scale, color);
    font::draw_text(img, message, (x + span) as i32, y, scale, color);
}

/// Scroll `asset` vertically, drawn twice so the seam wraps seamlessly.
pub fn scroll_image(img: &mut RgbImage, asset: &RgbImage, elapsed_ms: u64) {
    clear(img);
    let h = asset.height().max(1) as i64;
    let y = -((elapsed_ms as f64 * SCROLL_RATE) as i64 % h);
    blit(img, asset, 0, y as i32);
    blit(img, asset, 0, (y + h) as i32);
}

pub fn falling_balls(img: &mut RgbImage, pool: &mut ParticlePool, rng: &mut impl Rng) {
    clear(img);
    pool.origin = Vec2::new(img.width() as f32 / 2.0, 10.0);
    pool.spawn(rng, &FALLING_SPAWN);
    pool.step();
    draw_pool(img, pool);
}

pub fn snow(img: &mut RgbImage, pool: &mut ParticlePool, rng: &mut impl Rng) {
    clear(img);
    pool.origin = Vec2::new(2.0, img.height() as f32 / 2.0);
    pool.spawn(rng, &SNOW_SPAWN);
    let wind = Vec2::new(rng.random_range(0.04..0.15), rng.random_range(-1.0..1.0));
    pool.blow(wind);
    draw_pool(img, pool);
}

pub fn expanding_balls(img: &mut RgbImage, pool: &mut ParticlePool, rng: &mut impl Rng) {
    clear(img);
    pool.origin = Vec2::new(
        rng.random_range(0..img.width()) as f32,
        rng.random_range(0..img.height()) as f32,
    );
    pool.spawn(rng, &EXPANDING_SPAWN);
    for p in pool.iter_mut() {
        p.size += 1.0;
    }
    pool.step();
    draw_pool(img, pool);
}

/// Rotating pinwheel of hue wedges with a slowly breathing ring scale.
pub fn pinwheel(img: &mut RgbImage, elapsed_ms: u64) {
    const WEDGES: i64 = 8;
    let (w, h) = img.dimensions();
    let (cx, cy) = (w as f32 / 2.0, h as f32 / 2.0);
    let rotation = elapsed_ms as f32 * 0.0012;
    let ring_width = 24.0 + 10.0 * (elapsed_ms as f32 * 0.0007).sin();

    for y in 0..h {
        for x in 0..w {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let wedge = ((dy.atan2(dx) + rotation) / TAU * WEDGES as f32).floor() as i64;
            let ring = ((dx * dx + dy * dy).sqrt() / ring_width) as i64;
            let hue = wedge.rem_euclid(WEDGES) as f32 * (360.0 / WEDGES as f32);
            let value = if (wedge + ring).rem_euclid(2) == 0 { 1.0 } else { 0.35 };
            img.put_pixel(x, y, image::Rgb(Rgb::from_hsv(hue, 1.0, value).to_bytes()));
        }
    }
}

fn draw_pool(img: &mut RgbImage, pool: &ParticlePool) {
    for p in pool.iter() {
        fill_circle(img, p.position, p.size, p.color);
    }
}

fn fill_circle(img: &mut RgbImage, center: Vec2, radius: f32, color: Rgb) {
    if radius <= 0.0 {
        return;
    }
    let px = image::Rgb(color.to_bytes());
    let (w, h) = img.dimensions();
    let r2 = radius * radius;
    let x0 = (center.x - radius).floor() as i32;
    let x1 = (center.x + radius).ceil() as i32;
    let y0 = (center.y - radius).floor() as i32;
    let y1 = (center.y + radius).ceil() as i32;
    for y in y0..=y1 {
        if y < 0 || y as u32 >= h {
            continue;
        }
        for x in x0..=x1 {
            if x < 0 || x as u32 >= w {
                continue;
            }
            let dx = x as f32 - center.x;
            let dy = y as f32 - center.y;
            if dx * dx + dy * dy <= r2 {
                img.put_pixel(x as u32, y as u32, px);
            }
        }
    }
}

fn happy_color(rng: &mut impl Rng) -> Rgb {
    Rgb::from_hsv(
        rng.random_range(0.0..360.0),
        rng.random_range(0.7..1.0),
        rng.random_range(0.8..1.0),
    )
}

fn blit(dst: &mut RgbImage, src: &RgbImage, x0: i32, y0: i32) {
    let (dw, dh) = dst.dimensions();
    for (x, y, p) in src.enumerate_pixels() {
        let dx = x0 + x as i32;
        let dy = y0 + y as i32;
        if dx >= 0 && (dx as u32) < dw && dy >= 0 && (dy as u32) < dh {
            dst.put_pixel(dx as u32, dy as u32, *p);
        }
    }
}

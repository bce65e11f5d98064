// Frame composition and wire packing
//
// Resolves an effect's output into exactly one color per LED, then packs
// the array into the per-tick wire payload.

use image::RgbImage;

use crate::color::Rgb;
use crate::effect::EffectOutput;
use crate::geometry::LedPoint;

/// Color used when a mapped coordinate falls outside the raster.
pub const BACKGROUND: Rgb = Rgb::BLACK;

/// Resolve the active effect's output. Direct effects already wrote the
/// LED array; raster output is sampled at each LED's mapped coordinate.
pub fn resolve(output: EffectOutput<'_>, leds: &mut [LedPoint]) {
    match output {
        EffectOutput::Direct => {}
        EffectOutput::Raster(img) => {
            for led in leds {
                led.color = sample(img, led.x, led.y);
            }
        }
    }
}

/// Sample the raster at a physical coordinate. Out-of-range coordinates
/// resolve to the background color, never a fault.
pub fn sample(img: &RgbImage, x: i32, y: i32) -> Rgb {
    if x >= 0 && (x as u32) < img.width() && y >= 0 && (y as u32) < img.height() {
        let p = img.get_pixel(x as u32, y as u32);
        Rgb::from_u8(p[0], p[1], p[2])
    } else {
        BACKGROUND
    }
}

/// Serialize LED colors into wire order: one RGB byte-triple per LED
/// index. Always exactly `leds.len() * 3` bytes.
pub fn pack(leds: &[LedPoint]) -> Vec<u8> {
    let mut data = Vec::with_capacity(leds.len() * 3);
    for led in leds {
        data.extend_from_slice(&led.color.to_bytes());
    }
    data
}

// Per-pixel (direct) effects
//
// These write straight into the LED array and bypass the compositor's
// raster sampling. All blending goes through `Rgb::mix_toward`, which
// clamps, so channel values stay in range over any number of ticks.

use rand::Rng;

use crate::color::Rgb;
use crate::geometry::{GridLayout, LedPoint};

// ── Sparkle ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct SparkleParams {
    /// Per-LED chance of flashing to the spark color this tick.
    pub chance: f64,
    pub spark: Rgb,
    pub background: Rgb,
    /// Blend ratio toward the background for non-sparking LEDs.
    pub mix: f32,
}

pub const SPARKLE: SparkleParams = SparkleParams {
    chance: 0.02,
    spark: Rgb::new(1.0, 0.95, 0.8),
    background: Rgb::new(0.0, 0.02, 0.10),
    mix: 0.10,
};

/// Each LED independently flashes with a small probability; everything
/// else decays exponentially toward the background.
pub fn sparkle(leds: &mut [LedPoint], rng: &mut impl Rng, params: &SparkleParams) {
    for led in leds {
        if rng.random_bool(params.chance) {
            led.color = params.spark;
        } else {
            led.color = led.color.mix_toward(params.background, params.mix);
        }
    }
}

// ── Hue sweep ────────────────────────────────────────────────────────

/// Degrees the cursor advances per step.
const HUE_STEP: f32 = 2.0;
/// Wall-clock interval between cursor steps, independent of tick rate.
const HUE_STEP_INTERVAL_MS: u64 = 50;
/// Hue offset between neighboring LED indices.
const HUE_SPREAD: f32 = 1.4;
/// Accent flash probability per tick, out of 255.
const ACCENT_CHANCE: u32 = 80;
const ACCENT: Rgb = Rgb::WHITE;

#[derive(Debug, Clone, Copy, Default)]
pub struct HueSweepState {
    pub cursor: f32,
    pub last_step_ms: u64,
}

/// Traveling rainbow: a global hue cursor stepped on a wall-clock
/// interval, offset per LED index. Occasionally one random LED is
/// flashed to the accent color.
pub fn hue_sweep(
    leds: &mut [LedPoint],
    state: &mut HueSweepState,
    now_ms: u64,
    rng: &mut impl Rng,
) {
    if now_ms.saturating_sub(state.last_step_ms) >= HUE_STEP_INTERVAL_MS {
        state.cursor = (state.cursor + HUE_STEP) % 360.0;
        state.last_step_ms = now_ms;
    }
    for (i, led) in leds.iter_mut().enumerate() {
        led.color = Rgb::from_hsv(state.cursor + i as f32 * HUE_SPREAD, 1.0, 1.0);
    }
    if !leds.is_empty() && rng.random_range(0..255u32) < ACCENT_CHANCE {
        let i = rng.random_range(0..leds.len());
        leds[i].color = ACCENT;
    }
}

// ── Chase / fade family ──────────────────────────────────────────────

/// One algorithm, several dressings: palette colors are assigned to
/// blocks of `stride` LEDs starting at a moving offset, and a shared fade
/// level breathes the whole pattern. When the fade hits zero the offset
/// advances one LED (mod stride) and the fade resets, so the pattern
/// crawls along the strip.
#[derive(Debug, Clone, Copy)]
pub struct ChaseParams {
    pub palette: &'static [Rgb],
    pub stride: usize,
    /// Fade decrement per tick, in [0, 1].
    pub decay: f32,
}

pub const CANDY_PALETTE: [Rgb; 2] = [Rgb::new(1.0, 0.0, 0.0), Rgb::new(1.0, 1.0, 1.0)];
pub const EMBER_PALETTE: [Rgb; 3] = [
    Rgb::new(1.0, 0.35, 0.0),
    Rgb::new(1.0, 0.8, 0.1),
    Rgb::new(0.6, 0.05, 0.0),
];

pub const CANDY_CHASE: ChaseParams = ChaseParams {
    palette: &CANDY_PALETTE,
    stride: 5,
    decay: 0.05,
};

pub const EMBER_CHASE: ChaseParams = ChaseParams {
    palette: &EMBER_PALETTE,
    stride: 3,
    decay: 0.02,
};

#[derive(Debug, Clone, Copy)]
pub struct ChaseState {
    pub offset: usize,
    pub fade: f32,
}

impl Default for ChaseState {
    fn default() -> Self {
        Self { offset: 0, fade: 1.0 }
    }
}

pub fn chase(leds: &mut [LedPoint], state: &mut ChaseState, params: &ChaseParams) {
    state.fade -= params.decay;
    if state.fade <= 0.0 {
        state.fade = 1.0;
        state.offset = (state.offset + 1) % params.stride.max(1);
    }
    for (i, led) in leds.iter_mut().enumerate() {
        let block = (i + state.offset) / params.stride.max(1);
        led.color = params.palette[block % params.palette.len()].scale(state.fade);
    }
}

// ── Row highlight ────────────────────────────────────────────────────

/// How long each row stays current.
const ROW_HOLD_MS: u64 = 250;
/// Per-tick decay toward black for every LED.
const ROW_DECAY: f32 = 0.18;

#[derive(Debug, Clone, Copy)]
pub struct RowHighlightState {
    pub color: Rgb,
    pub last_row: usize,
}

impl Default for RowHighlightState {
    fn default() -> Self {
        Self {
            color: Rgb::WHITE,
            last_row: 0,
        }
    }
}

/// A band of four rows sweeps the grid, derived from wall-clock time
/// modulo the row count. Everything decays toward black; the band color
/// is re-randomized each time the row counter wraps to zero.
pub fn row_highlight(
    leds: &mut [LedPoint],
    state: &mut RowHighlightState,
    layout: &GridLayout,
    now_ms: u64,
    rng: &mut impl Rng,
) {
    let rows = layout.rows().max(1);
    let row = (now_ms / ROW_HOLD_MS) as usize % rows;
    if row < state.last_row {
        state.color = Rgb::from_hsv(rng.random_range(0.0..360.0), 1.0, 1.0);
    }
    state.last_row = row;

    let band = row.saturating_sub(1)..=(row + 2).min(rows - 1);
    for (i, led) in leds.iter_mut().enumerate() {
        let physical = layout.physical_row(i);
        if band.contains(&physical) {
            led.color = state.color;
        } else {
            led.color = led.color.mix_toward(Rgb::BLACK, ROW_DECAY);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn led_array(n: usize) -> Vec<LedPoint> {
        vec![LedPoint::default(); n]
    }

    fn in_range(c: Rgb) -> bool {
        [c.r, c.g, c.b].iter().all(|v| (0.0..=1.0).contains(v))
    }

    #[test]
    fn test_sparkle_colors_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut leds = led_array(200);
        for _ in 0..2_000 {
            sparkle(&mut leds, &mut rng, &SPARKLE);
            assert!(leds.iter().all(|l| in_range(l.color)));
        }
        // With a 2% chance over 200 LEDs x 2000 ticks some sparks landed,
        // and decayed LEDs sit near the background
        assert!(leds.iter().any(|l| l.color.b > l.color.r));
    }

    #[test]
    fn test_hue_sweep_steps_on_wall_clock() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut leds = led_array(10);
        let mut state = HueSweepState::default();
        hue_sweep(&mut leds, &mut state, 0, &mut rng);
        let first = state.cursor;
        // 20ms later: same step window, cursor unchanged
        hue_sweep(&mut leds, &mut state, 20, &mut rng);
        assert_eq!(state.cursor, first);
        // Past the interval the cursor advances exactly one step
        hue_sweep(&mut leds, &mut state, 60, &mut rng);
        assert_eq!(state.cursor, first + HUE_STEP);
    }

    #[test]
    fn test_chase_fade_cycle_advances_offset() {
        let mut leds = led_array(30);
        let mut state = ChaseState::default();
        // 0.05 decay: fade hits zero after ~20 ticks and the offset advances
        let mut ticks = 0;
        while state.offset == 0 {
            chase(&mut leds, &mut state, &CANDY_CHASE);
            ticks += 1;
            assert!(ticks < 30);
        }
        assert!((19..=21).contains(&ticks));
        assert_eq!(state.offset, 1);
        assert_eq!(state.fade, 1.0);
        // Offset wraps mod stride
        for _ in 0..(20 * CANDY_CHASE.stride) {
            chase(&mut leds, &mut state, &CANDY_CHASE);
        }
        assert!(state.offset < CANDY_CHASE.stride);
    }

    #[test]
    fn test_chase_assigns_palette_in_blocks() {
        let mut leds = led_array(10);
        let mut state = ChaseState { offset: 0, fade: 1.0 };
        chase(&mut leds, &mut state, &CANDY_CHASE);
        // After one tick fade is 0.95; blocks of 5 alternate palette colors
        let red = CANDY_PALETTE[0].scale(state.fade);
        let white = CANDY_PALETTE[1].scale(state.fade);
        assert_eq!(leds[0].color, red);
        assert_eq!(leds[4].color, red);
        assert_eq!(leds[5].color, white);
        assert_eq!(leds[9].color, white);
    }

    #[test]
    fn test_row_highlight_band_and_decay() {
        let layout = GridLayout::default();
        let n = layout.strips * layout.strip_len;
        let mut leds = led_array(n);
        let mut state = RowHighlightState::default();
        let mut rng = StdRng::seed_from_u64(2);

        // Row 2 current: band rows 1..=4 lit in every strip
        row_highlight(&mut leds, &mut state, &layout, 2 * 250, &mut rng);
        for (i, led) in leds.iter().enumerate() {
            let r = layout.physical_row(i);
            if (1..=4).contains(&r) {
                assert_eq!(led.color, state.color);
            } else {
                assert_eq!(led.color, Rgb::BLACK);
            }
        }
    }

    #[test]
    fn test_row_highlight_rerandomizes_on_wrap() {
        let layout = GridLayout::default();
        let mut leds = led_array(layout.strips * layout.strip_len);
        let mut state = RowHighlightState::default();
        let mut rng = StdRng::seed_from_u64(8);

        let rows = layout.rows() as u64;
        row_highlight(&mut leds, &mut state, &layout, (rows - 1) * 250, &mut rng);
        let before = state.color;
        // Wrap back to row 0: new random color
        row_highlight(&mut leds, &mut state, &layout, rows * 250, &mut rng);
        assert_ne!(state.color, before);
    }
}

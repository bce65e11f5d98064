//! Procedural effect catalog and engine.
//!
//! Effects are a closed set of variants behind one render call. Each tick
//! the active effect either draws into the shared offscreen raster (canvas
//! effects, sampled per-LED by the compositor) or writes LED colors
//! directly (per-pixel effects). All per-effect mutable state lives in the
//! engine; nothing survives outside its ownership.

pub mod canvas;
pub mod pixel;

use image::RgbImage;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::command::Command;
use crate::geometry::{GridLayout, LedPoint};
use crate::particles::{ParticlePool, Vec2};

// ── Catalog ──────────────────────────────────────────────────────────

/// The closed set of effect variants, cycled in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    ScrollImage,
    ScrollText,
    FallingBalls,
    Snow,
    ExpandingBalls,
    Pinwheel,
    Sparkle,
    HueSweep,
    CandyChase,
    EmberChase,
    RowHighlight,
}

impl Effect {
    pub const ALL: [Effect; 11] = [
        Effect::ScrollImage,
        Effect::ScrollText,
        Effect::FallingBalls,
        Effect::Snow,
        Effect::ExpandingBalls,
        Effect::Pinwheel,
        Effect::Sparkle,
        Effect::HueSweep,
        Effect::CandyChase,
        Effect::EmberChase,
        Effect::RowHighlight,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn from_index(index: usize) -> Option<Effect> {
        Self::ALL.get(index).copied()
    }

    pub fn next(self) -> Effect {
        Self::ALL[(self as usize + 1) % Self::COUNT]
    }

    pub fn name(self) -> &'static str {
        match self {
            Effect::ScrollImage => "scroll-image",
            Effect::ScrollText => "scroll-text",
            Effect::FallingBalls => "falling-balls",
            Effect::Snow => "snow",
            Effect::ExpandingBalls => "expanding-balls",
            Effect::Pinwheel => "pinwheel",
            Effect::Sparkle => "sparkle",
            Effect::HueSweep => "hue-sweep",
            Effect::CandyChase => "candy-chase",
            Effect::EmberChase => "ember-chase",
            Effect::RowHighlight => "row-highlight",
        }
    }
}

/// What the active effect produced this tick.
pub enum EffectOutput<'a> {
    /// An offscreen raster for the compositor to sample per LED.
    Raster(&'a RgbImage),
    /// Colors were written into the LED array directly.
    Direct,
}

// ── Engine ───────────────────────────────────────────────────────────

/// Engine construction parameters, derived from configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub cycle_ms: u64,
    pub text_revert_ms: u64,
    pub message: String,
    pub layout: GridLayout,
}

/// Mutable per-effect state, reset only on process start.
struct EffectState {
    falling: ParticlePool,
    snow: ParticlePool,
    expanding: ParticlePool,
    hue: pixel::HueSweepState,
    candy: pixel::ChaseState,
    ember: pixel::ChaseState,
    row: pixel::RowHighlightState,
}

pub struct EffectEngine {
    current: Effect,
    canvas: RgbImage,
    images: Vec<RgbImage>,
    state: EffectState,
    message: String,
    default_message: String,
    cycle_ms: u64,
    text_revert_ms: u64,
    cycle_deadline: u64,
    text_deadline: Option<u64>,
    layout: GridLayout,
    rng: StdRng,
}

impl EffectEngine {
    pub fn new(config: EngineConfig, images: Vec<RgbImage>) -> Self {
        Self::with_rng(config, images, StdRng::from_os_rng())
    }

    /// Deterministic variant for tests and reproducible demos.
    pub fn seeded(config: EngineConfig, images: Vec<RgbImage>, seed: u64) -> Self {
        Self::with_rng(config, images, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: EngineConfig, images: Vec<RgbImage>, rng: StdRng) -> Self {
        let state = EffectState {
            falling: ParticlePool::new(50, Vec2::ZERO),
            snow: ParticlePool::new(100, Vec2::ZERO),
            expanding: ParticlePool::new(20, Vec2::ZERO),
            hue: pixel::HueSweepState::default(),
            candy: pixel::ChaseState::default(),
            ember: pixel::ChaseState::default(),
            row: pixel::RowHighlightState::default(),
        };
        Self {
            current: Effect::ALL[0],
            canvas: RgbImage::new(config.canvas_width.max(1), config.canvas_height.max(1)),
            images,
            state,
            message: config.message.clone(),
            default_message: config.message,
            cycle_ms: config.cycle_ms,
            text_revert_ms: config.text_revert_ms,
            cycle_deadline: config.cycle_ms,
            text_deadline: None,
            layout: config.layout,
            rng,
        }
    }

    pub fn current(&self) -> Effect {
        self.current
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Evaluate transitions for this tick. A pending command takes
    /// precedence over the cycle timer and resets it; the text-revert
    /// timer runs independently.
    pub fn advance(&mut self, now_ms: u64, command: Option<Command>) {
        if let Some(cmd) = command {
            if let Some(text) = cmd.text {
                debug!(%text, "text override");
                self.message = text;
                self.current = Effect::ScrollText;
                self.text_deadline = Some(now_ms + self.text_revert_ms);
            }
            if let Some(index) = cmd.effect {
                match Effect::from_index(index) {
                    Some(effect) => {
                        debug!(effect = effect.name(), "effect override");
                        self.current = effect;
                    }
                    None => debug!(index, "ignoring out-of-range effect override"),
                }
            }
            self.cycle_deadline = now_ms + self.cycle_ms;
        } else if now_ms >= self.cycle_deadline {
            self.current = self.current.next();
            self.cycle_deadline = now_ms + self.cycle_ms;
            debug!(effect = self.current.name(), "cycle transition");
        }

        if self.text_deadline.is_some_and(|deadline| now_ms >= deadline) {
            self.message = self.default_message.clone();
            self.text_deadline = None;
        }
    }

    /// Render the active effect for this tick.
    pub fn render(&mut self, leds: &mut [LedPoint], now_ms: u64) -> EffectOutput<'_> {
        match self.current {
            Effect::ScrollImage => {
                match self.images.first() {
                    Some(asset) => canvas::scroll_image(&mut self.canvas, asset, now_ms),
                    // No usable assets: fall back to the text scroller
                    None => {
                        canvas::scroll_text(&mut self.canvas, &self.message, now_ms, &mut self.rng)
                    }
                }
                EffectOutput::Raster(&self.canvas)
            }
            Effect::ScrollText => {
                canvas::scroll_text(&mut self.canvas, &self.message, now_ms, &mut self.rng);
                EffectOutput::Raster(&self.canvas)
            }
            Effect::FallingBalls => {
                canvas::falling_balls(&mut self.canvas, &mut self.state.falling, &mut self.rng);
                EffectOutput::Raster(&self.canvas)
            }
            Effect::Snow => {
                canvas::snow(&mut self.canvas, &mut self.state.snow, &mut self.rng);
                EffectOutput::Raster(&self.canvas)
            }
            Effect::ExpandingBalls => {
                canvas::expanding_balls(&mut self.canvas, &mut self.state.expanding, &mut self.rng);
                EffectOutput::Raster(&self.canvas)
            }
            Effect::Pinwheel => {
                canvas::pinwheel(&mut self.canvas, now_ms);
                EffectOutput::Raster(&self.canvas)
            }
            Effect::Sparkle => {
                pixel::sparkle(leds, &mut self.rng, &pixel::SPARKLE);
                EffectOutput::Direct
            }
            Effect::HueSweep => {
                pixel::hue_sweep(leds, &mut self.state.hue, now_ms, &mut self.rng);
                EffectOutput::Direct
            }
            Effect::CandyChase => {
                pixel::chase(leds, &mut self.state.candy, &pixel::CANDY_CHASE);
                EffectOutput::Direct
            }
            Effect::EmberChase => {
                pixel::chase(leds, &mut self.state.ember, &pixel::EMBER_CHASE);
                EffectOutput::Direct
            }
            Effect::RowHighlight => {
                pixel::row_highlight(
                    leds,
                    &mut self.state.row,
                    &self.layout,
                    now_ms,
                    &mut self.rng,
                );
                EffectOutput::Direct
            }
        }
    }
}

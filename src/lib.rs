// Lightwall - LED wall effect daemon
// Geometry mapping, effect engine, and OPC frame streaming

pub mod assets;
pub mod cli;
pub mod color;
pub mod command;
pub mod config;
pub mod driver;
pub mod effect;
pub mod font;
pub mod frame;
pub mod geometry;
pub mod opc;
pub mod particles;
pub mod server;

pub use color::Rgb;
pub use command::Command;
pub use config::Config;
pub use driver::StreamDriver;
pub use effect::{Effect, EffectEngine, EffectOutput, EngineConfig};
pub use geometry::{GridLayout, LedPoint};
pub use opc::{OpcClient, OpcMessage};
pub use particles::{Particle, ParticlePool, Vec2};

// Startup configuration
//
// A TOML file plus CLI overrides. Everything here is fixed at process
// start; nothing is reloaded at runtime.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::effect::EngineConfig;
use crate::geometry::GridLayout;

/// Config file looked for when no `--config` is given.
pub const DEFAULT_PATH: &str = "lightwall.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Lighting controller (OPC server) address, host:port.
    pub server: String,
    /// Port the control UI listens on.
    pub listen_port: u16,
    /// Number of addressable LEDs.
    pub leds: usize,
    /// Stream driver tick interval in milliseconds.
    pub tick_ms: u64,
    /// Seconds between automatic effect transitions.
    pub cycle_secs: u64,
    /// Seconds before injected text reverts to the default message.
    pub text_revert_secs: u64,
    /// Default scrolling message.
    pub message: String,
    /// Image assets for the scrolling-image effect.
    pub images: Vec<PathBuf>,
    /// Directory the operator UI is served from.
    pub static_dir: PathBuf,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub layout: GridLayout,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: "localhost:7890".to_string(),
            listen_port: 8080,
            leds: 750,
            tick_ms: 20,
            cycle_secs: 20,
            text_revert_secs: 20,
            message: "Ho, Ho, Ho - Merry Christmas!".to_string(),
            images: vec![PathBuf::from("static/glitter.png")],
            static_dir: PathBuf::from("static"),
            canvas_width: 400,
            canvas_height: 120,
            layout: GridLayout::default(),
        }
    }
}

impl Config {
    /// Load from `path`, or from `lightwall.toml` if present, or fall
    /// back to built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => {
                let default = Path::new(DEFAULT_PATH);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
            cycle_ms: self.cycle_secs * 1000,
            text_revert_ms: self.text_revert_secs * 1000,
            message: self.message.clone(),
            layout: self.layout.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_the_installation() {
        let config = Config::default();
        assert_eq!(config.server, "localhost:7890");
        assert_eq!(config.leds, 750);
        assert_eq!(config.tick_ms, 20);
        assert_eq!(config.layout.strips * config.layout.strip_len, 750);
        assert_eq!(config.tick(), Duration::from_millis(20));
    }

    #[test]
    fn test_partial_toml_overrides_defaults() {
        let config: Config = toml::from_str(
            r#"
            server = "10.0.0.5:7890"
            leds = 780

            [layout]
            strips = 52
            "#,
        )
        .unwrap();
        assert_eq!(config.server, "10.0.0.5:7890");
        assert_eq!(config.leds, 780);
        assert_eq!(config.layout.strips, 52);
        // Untouched fields keep their defaults
        assert_eq!(config.listen_port, 8080);
        assert_eq!(config.layout.strip_len, 15);
    }

    #[test]
    fn test_bad_toml_is_a_parse_error() {
        let path = std::env::temp_dir().join("lightwall_bad_config.toml");
        std::fs::write(&path, "server = [this is not toml").unwrap();
        let err = Config::load(Some(&path)).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_explicit_file_is_an_io_error() {
        let err = Config::load(Some(Path::new("/nonexistent/lightwall.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_engine_config_conversion() {
        let engine = Config::default().engine_config();
        assert_eq!(engine.cycle_ms, 20_000);
        assert_eq!(engine.text_revert_ms, 20_000);
        assert_eq!((engine.canvas_width, engine.canvas_height), (400, 120));
    }
}

// CLI definitions using clap

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "lightwall")]
#[command(author, version, about = "LED wall effect renderer and OPC streamer")]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Lighting controller (OPC server) and port to connect to
    #[arg(long, value_name = "HOST:PORT")]
    pub fcserver: Option<String>,

    /// Port to serve the control UI from
    #[arg(long)]
    pub port: Option<u16>,

    /// Number of LEDs in the string
    #[arg(long)]
    pub leds: Option<usize>,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref server) = self.fcserver {
            config.server = server.clone();
        }
        if let Some(port) = self.port {
            config.listen_port = port;
        }
        if let Some(leds) = self.leds {
            config.leds = leds;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_on_top_of_config() {
        let cli = Cli::parse_from([
            "lightwall",
            "--fcserver",
            "wall.local:7890",
            "--leds",
            "780",
        ]);
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.server, "wall.local:7890");
        assert_eq!(config.leds, 780);
        // Port was not given: config value survives
        assert_eq!(config.listen_port, 8080);
    }

    #[test]
    fn test_no_args_changes_nothing() {
        let cli = Cli::parse_from(["lightwall"]);
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.server, Config::default().server);
    }
}

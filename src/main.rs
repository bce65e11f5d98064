//! Lightwall daemon
//!
//! Connects to the lighting controller, starts the fixed-rate render
//! loop, and serves the operator control UI.

use anyhow::Context;
use clap::Parser;
use tracing::info;

use lightwall::assets;
use lightwall::cli::Cli;
use lightwall::command;
use lightwall::config::Config;
use lightwall::driver::StreamDriver;
use lightwall::effect::EffectEngine;
use lightwall::opc::OpcClient;
use lightwall::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lightwall=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    let leds = config.layout.build(config.leds);
    let images = assets::load_images(&config.images, config.canvas_width);
    let engine = EffectEngine::new(config.engine_config(), images);

    // No controller, no show: a startup connection failure is fatal.
    let client = OpcClient::connect(config.server.as_str())
        .await
        .with_context(|| format!("connect to lighting controller at {}", config.server))?;
    info!(server = %config.server, leds = config.leds, "controller connected");

    let (commands, mailbox) = command::mailbox();
    let driver = StreamDriver::new(leds, engine, client, mailbox, config.tick());
    tokio::spawn(driver.run());

    let addr = format!("0.0.0.0:{}", config.listen_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind control listener on {addr}"))?;
    info!("control UI on http://{addr}");
    axum::serve(listener, server::router(commands, config.static_dir.clone()))
        .await
        .context("control server")?;

    Ok(())
}

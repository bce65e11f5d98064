// Fixed-rate stream driver
//
// Owns all mutable animation state and runs as a single sequential unit
// of work per tick: poll the command mailbox, advance the effect engine,
// composite, transmit. A failed transmit drops that frame and never
// stalls the loop; the next tick renders fresh state.

use std::time::{Duration, Instant};

use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::command::{self, CommandReceiver};
use crate::effect::EffectEngine;
use crate::frame;
use crate::geometry::LedPoint;
use crate::opc::{OpcClient, OpcMessage, CHANNEL};

pub struct StreamDriver {
    leds: Vec<LedPoint>,
    engine: EffectEngine,
    client: OpcClient,
    commands: CommandReceiver,
    tick: Duration,
}

impl StreamDriver {
    pub fn new(
        leds: Vec<LedPoint>,
        engine: EffectEngine,
        client: OpcClient,
        commands: CommandReceiver,
        tick: Duration,
    ) -> Self {
        Self {
            leds,
            engine,
            client,
            commands,
            tick,
        }
    }

    /// Run the render loop until the process exits.
    pub async fn run(mut self) {
        info!(leds = self.leds.len(), tick_ms = self.tick.as_millis() as u64, "stream driver running");
        let start = Instant::now();
        let mut interval = tokio::time::interval(self.tick);
        // A late tick renders current state; bursting stale frames helps nobody
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            self.tick_once(start.elapsed().as_millis() as u64).await;
        }
    }

    /// One tick of the loop, in order: command poll, engine advance,
    /// composite, transmit.
    pub async fn tick_once(&mut self, now_ms: u64) {
        let cmd = command::poll(&mut self.commands);
        self.engine.advance(now_ms, cmd);

        let output = self.engine.render(&mut self.leds, now_ms);
        frame::resolve(output, &mut self.leds);

        let msg = OpcMessage::set_pixel_colors(CHANNEL, frame::pack(&self.leds));
        if let Err(e) = self.client.send(&msg).await {
            warn!("dropping frame: {e}");
        }
    }
}

// Operator command intake
//
// A single-slot mailbox between the control transport and the stream
// driver. The producer always overwrites (last one wins) and never blocks;
// the driver's poll is non-blocking and consumes a pending command at most
// once. The mailbox is the only state shared across the two tasks.

use serde::Deserialize;
use tokio::sync::watch;

/// Operator-issued override. Missing or unrecognized fields decode to
/// `None` and act as no-ops rather than errors.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Command {
    /// Jump directly to this effect index.
    pub effect: Option<usize>,
    /// Display this text via the text-scroll effect.
    pub text: Option<String>,
}

pub type CommandSender = watch::Sender<Option<Command>>;
pub type CommandReceiver = watch::Receiver<Option<Command>>;

/// Create the command mailbox.
pub fn mailbox() -> (CommandSender, CommandReceiver) {
    watch::channel(None)
}

/// Non-blocking poll. Returns a pending command at most once; a command
/// overwritten before it was polled is lost by design.
pub fn poll(rx: &mut CommandReceiver) -> Option<Command> {
    if rx.has_changed().unwrap_or(false) {
        rx.borrow_and_update().clone()
    } else {
        None
    }
}

/// Core game interface driven by the engine loop
use crossterm::event::Event;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Instant;

use crate::core::offer_wall::OfferWallStyle;
use crate::core::verify::VerificationResult;

/// Requests a game makes of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ShowOfferWall,
    Exit,
}

/// Handle games use to talk back to the engine
#[derive(Debug, Clone)]
pub struct Context {
    tx: UnboundedSender<Command>,
}

impl Context {
    pub fn new(tx: UnboundedSender<Command>) -> Self {
        Self { tx }
    }

    pub fn send_command(&self, command: Command) {
        // the engine owns the receiver for as long as it runs
        let _ = self.tx.send(command);
    }
}

/// Main game trait that the engine drives
pub trait Game {
    /// When `on_tick` should next be called, if at all
    fn next_deadline(&self) -> Option<Instant>;

    fn on_tick(&mut self, now: Instant, ctx: &Context);

    /// Keyboard, mouse and resize events
    fn handle_event(&mut self, event: Event, now: Instant, ctx: &Context);

    fn on_verification(&mut self, result: VerificationResult);

    /// Outcome of a `Command::ShowOfferWall`: the style it was shown with,
    /// or `None` when it could not be shown
    fn on_offer_wall(&mut self, _style: Option<OfferWallStyle>) {}

    fn render(&self, frame: &mut ratatui::Frame);
}

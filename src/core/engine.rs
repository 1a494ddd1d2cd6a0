use crate::core::game::{Command, Context, Game};
use crate::core::offer_wall::OfferWall;
use crate::core::verify::VerificationResult;
use anyhow::Result;
use crossterm::event::Event;
use futures_util::{Stream, StreamExt};
use ratatui::backend::Backend;
use ratatui::Terminal;
use std::future::pending;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep_until, Instant};
use tracing::{info, warn};

pub struct Engine<G: Game, W: OfferWall> {
    game: G,
    offer_wall: W,
    verification: Option<oneshot::Receiver<VerificationResult>>,
}

impl<G: Game, W: OfferWall> Engine<G, W> {
    pub fn new(game: G, offer_wall: W) -> Self {
        Self { game, offer_wall, verification: None }
    }

    /// Deliver the result of an in-flight verification once it completes.
    pub fn with_verification(mut self, rx: oneshot::Receiver<VerificationResult>) -> Self {
        self.verification = Some(rx);
        self
    }

    /// Drive the game until it asks to exit or `events` ends, then hand it back.
    pub async fn run<B, E>(self, terminal: &mut Terminal<B>, mut events: E) -> Result<G>
    where
        B: Backend,
        B::Error: Send + Sync + 'static,
        E: Stream<Item = std::io::Result<Event>> + Unpin,
    {
        let Engine { mut game, mut offer_wall, mut verification } = self;

        // set up the outbox games use to ask for offer walls or exit
        let (outbox_tx, mut outbox_rx) = mpsc::unbounded_channel::<Command>();
        let ctx = Context::new(outbox_tx);

        loop {
            while let Ok(command) = outbox_rx.try_recv() {
                match command {
                    Command::ShowOfferWall => match offer_wall.show() {
                        Ok(style) => game.on_offer_wall(Some(style)),
                        Err(e) => {
                            warn!(error = %e, "offer wall unavailable");
                            game.on_offer_wall(None);
                        }
                    },
                    Command::Exit => {
                        info!("exit requested");
                        return Ok(game);
                    }
                }
            }

            terminal.draw(|f| game.render(f))?;

            let deadline = game.next_deadline();

            // Input is polled first: a press that is already waiting when the
            // relocation deadline passes lands on the object it was aimed at.
            tokio::select! {
                biased;

                input = events.next() => match input {
                    Some(Ok(ev)) => game.handle_event(ev, Instant::now(), &ctx),
                    Some(Err(e)) => return Err(e.into()),
                    None => {
                        info!("input closed");
                        return Ok(game);
                    }
                },

                outcome = next_verification(&mut verification) => match outcome {
                    Some(result) => game.on_verification(result),
                    None => {
                        warn!("verification task ended without a result");
                        game.on_verification(VerificationResult::UNVERIFIED);
                    }
                },

                _ = sleep_until_deadline(deadline) => {
                    game.on_tick(Instant::now(), &ctx);
                }
            }
        }
    }
}

async fn next_verification(slot: &mut Option<oneshot::Receiver<VerificationResult>>) -> Option<VerificationResult> {
    let Some(rx) = slot.as_mut() else {
        return pending().await;
    };
    let result = rx.await.ok();
    *slot = None;
    result
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => pending().await,
    }
}

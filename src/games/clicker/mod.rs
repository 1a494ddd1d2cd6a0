pub mod game;
pub mod renderer;

pub use game::{AboutInfo, ClickerGame, MenuAction};
pub use renderer::ClickerRenderer;

use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture, EventStream};
use ratatui::DefaultTerminal;
use tokio::sync::oneshot;
use tracing::info;

use crate::core::engine::Engine;
use crate::core::launch::LaunchContext;
use crate::core::offer_wall::OfferWall;
use crate::core::session::Viewport;
use crate::core::verify::{verify_click, ClickApi};
use crate::games::GameConfig;

/// Game runner for the clicker
///
/// Verification is started on its own task so the first frame is drawn
/// straight away; its result reaches the game through the engine.
pub async fn run_game<W: OfferWall>(
    config: GameConfig,
    launch: &LaunchContext,
    offer_wall: W,
    api: Arc<dyn ClickApi>,
    mut terminal: DefaultTerminal,
) -> Result<()> {
    let size = terminal.size()?;
    let mut game = ClickerGame::from_launch(config, launch, Viewport::new(size.width, size.height));

    let verification = match launch.verification_request() {
        Some(request) => {
            let (tx, rx) = oneshot::channel();
            tokio::spawn(async move {
                let result = verify_click(api.as_ref(), &request).await;
                let _ = tx.send(result);
            });
            Some(rx)
        }
        None => {
            info!("no role specified, skipping click verification");
            game.session_mut().skip_verification();
            None
        }
    };

    let engine = Engine::new(game, offer_wall);
    let engine = match verification {
        Some(rx) => engine.with_verification(rx),
        None => engine,
    };

    crossterm::execute!(std::io::stdout(), EnableMouseCapture)?;
    let result = engine.run(&mut terminal, EventStream::new()).await;
    crossterm::execute!(std::io::stdout(), DisableMouseCapture)?;
    let game = result?;
    info!(score = game.session().score(), "session ended");
    Ok(())
}

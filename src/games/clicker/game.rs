use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tokio::time::Instant;
use tracing::debug;

use crate::core::game::{Command, Context, Game};
use crate::core::launch::{Environment, LaunchContext, Role};
use crate::core::offer_wall::OfferWallStyle;
use crate::core::session::{GameSession, SessionState, TransitionError, Viewport};
use crate::core::verify::VerificationResult;
use crate::games::clicker::renderer::{menu_buttons, ClickerRenderer};
use crate::games::GameConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Start,
    Pause,
    Resume,
    TopScores,
    About,
    Quit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 6] = [
        MenuAction::Start,
        MenuAction::Pause,
        MenuAction::Resume,
        MenuAction::TopScores,
        MenuAction::About,
        MenuAction::Quit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::Start => "Start New Game",
            MenuAction::Pause => "Pause",
            MenuAction::Resume => "Resume",
            MenuAction::TopScores => "Top Scores",
            MenuAction::About => "About",
            MenuAction::Quit => "Quit",
        }
    }

    pub fn hotkey(self) -> char {
        match self {
            MenuAction::Start => 's',
            MenuAction::Pause => 'p',
            MenuAction::Resume => 'r',
            MenuAction::TopScores => 't',
            MenuAction::About => 'a',
            MenuAction::Quit => 'q',
        }
    }

    pub fn from_hotkey(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.hotkey() == c.to_ascii_lowercase())
    }

    /// Start, Pause and Resume only show in their own state.
    pub fn visible_in(self, state: SessionState) -> bool {
        match self {
            MenuAction::Start => state == SessionState::Menu,
            MenuAction::Pause => state == SessionState::Playing,
            MenuAction::Resume => state == SessionState::Paused,
            MenuAction::TopScores | MenuAction::About | MenuAction::Quit => true,
        }
    }
}

/// Launch facts shown in the About dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AboutInfo {
    pub role: Option<Role>,
    pub user_id: u64,
    pub env: Environment,
    pub mini_app: bool,
}

impl From<&LaunchContext> for AboutInfo {
    fn from(launch: &LaunchContext) -> Self {
        Self {
            role: launch.params().role,
            user_id: launch.user_id(),
            env: launch.params().env,
            mini_app: launch.is_mini_app(),
        }
    }
}

pub struct ClickerGame {
    session: GameSession,
    about: AboutInfo,
    offer_wall: Option<OfferWallStyle>,
}

impl ClickerGame {
    pub fn new(session: GameSession, about: AboutInfo) -> Self {
        Self { session, about, offer_wall: None }
    }

    pub fn from_launch(config: GameConfig, launch: &LaunchContext, viewport: Viewport) -> Self {
        Self::new(GameSession::new(config, viewport), AboutInfo::from(launch))
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn about(&self) -> &AboutInfo {
        &self.about
    }

    /// Style of the offer wall currently on screen.
    pub fn offer_wall(&self) -> Option<OfferWallStyle> {
        self.offer_wall
    }

    pub fn perform(&mut self, action: MenuAction, now: Instant, ctx: &Context) {
        let outcome: Result<(), TransitionError> = match action {
            MenuAction::Start => self.session.start(now),
            MenuAction::Pause => self.session.pause().map(|()| ctx.send_command(Command::ShowOfferWall)),
            MenuAction::Resume => self.session.resume(now).map(|()| self.offer_wall = None),
            MenuAction::Quit => self.session.quit().map(|()| self.offer_wall = None),
            MenuAction::TopScores => {
                self.session.show_top_scores();
                Ok(())
            }
            MenuAction::About => {
                self.session.show_about();
                Ok(())
            }
        };
        if let Err(e) = outcome {
            debug!(error = %e, "menu action ignored");
        }
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant, ctx: &Context) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => ctx.send_command(Command::Exit),
            KeyCode::Esc if self.session.overlay().is_some() => self.session.close_overlay(),
            KeyCode::Esc if self.session.state() == SessionState::Menu => ctx.send_command(Command::Exit),
            KeyCode::Char(c) => {
                if let Some(action) = MenuAction::from_hotkey(c) {
                    self.perform(action, now, ctx);
                }
            }
            _ => {}
        }
    }

    fn handle_press(&mut self, column: u16, row: u16, now: Instant, ctx: &Context) {
        // an open overlay swallows the click that dismisses it
        if self.session.overlay().is_some() {
            self.session.close_overlay();
            return;
        }
        let viewport = self.session.viewport();
        let pressed = menu_buttons(viewport.width, self.session.state())
            .into_iter()
            .find(|(_, rect)| row == rect.y && column >= rect.x && column < rect.x + rect.width);
        if let Some((action, _)) = pressed {
            self.perform(action, now, ctx);
            return;
        }
        self.session.click_at(column, row, now);
    }
}

impl Game for ClickerGame {
    fn next_deadline(&self) -> Option<Instant> {
        self.session.next_deadline()
    }

    fn on_tick(&mut self, now: Instant, _ctx: &Context) {
        self.session.tick(now);
    }

    fn handle_event(&mut self, event: Event, now: Instant, ctx: &Context) {
        match event {
            Event::Key(key) => self.handle_key(key, now, ctx),
            Event::Mouse(MouseEvent { kind: MouseEventKind::Down(MouseButton::Left), column, row, .. }) => {
                self.handle_press(column, row, now, ctx)
            }
            Event::Resize(width, height) => self.session.resize(Viewport::new(width, height)),
            _ => {}
        }
    }

    fn on_verification(&mut self, result: VerificationResult) {
        self.session.apply_verification(result);
    }

    fn on_offer_wall(&mut self, style: Option<OfferWallStyle>) {
        // the pause may already have been undone
        if self.session.state() == SessionState::Paused {
            self.offer_wall = style;
        }
    }

    fn render(&self, frame: &mut ratatui::Frame) {
        ClickerRenderer::render(frame, self);
    }
}

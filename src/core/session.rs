//! The clicker session: score, object position and the menu/playing/paused
//! lifecycle, plus the relocation timer that runs while playing.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::layout::Rect;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::core::timer::RelocationTimer;
use crate::core::verify::VerificationResult;
use crate::games::GameConfig;

/// Rows at the top kept free for the score, menu and title.
pub const TOP_OFFSET: u16 = 4;
pub const OBJECT_WIDTH: u16 = 6;
pub const OBJECT_HEIGHT: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Menu,
    Playing,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    About,
    TopScores,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerificationStatus {
    #[default]
    Pending,
    Skipped,
    Verified,
    Unverified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot {action} while {from:?}")]
pub struct TransitionError {
    pub action: &'static str,
    pub from: SessionState,
}

pub struct GameSession {
    config: GameConfig,
    score: u32,
    position: Position,
    state: SessionState,
    click_verified: bool,
    verification: VerificationStatus,
    overlay: Option<Overlay>,
    viewport: Viewport,
    timer: RelocationTimer,
    rng: StdRng,
}

impl GameSession {
    pub fn new(config: GameConfig, viewport: Viewport) -> Self {
        Self::with_rng(config, viewport, StdRng::from_os_rng())
    }

    pub fn with_rng(config: GameConfig, viewport: Viewport, rng: StdRng) -> Self {
        let timer = RelocationTimer::new(config.move_interval);
        Self {
            config,
            score: 0,
            position: Position::default(),
            state: SessionState::Menu,
            click_verified: false,
            verification: VerificationStatus::Pending,
            overlay: None,
            viewport,
            timer,
            rng,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_click_verified(&self) -> bool {
        self.click_verified
    }

    pub fn verification(&self) -> VerificationStatus {
        self.verification
    }

    pub fn overlay(&self) -> Option<Overlay> {
        self.overlay
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Pending relocation deadline; only ever set while playing.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    pub fn is_object_visible(&self) -> bool {
        self.state == SessionState::Playing
    }

    /// Cells covered by the object, or `None` when it is hidden.
    pub fn object_rect(&self) -> Option<Rect> {
        if !self.is_object_visible() {
            return None;
        }
        Some(Rect {
            x: self.position.x,
            y: self.position.y,
            width: OBJECT_WIDTH.min(self.viewport.width),
            height: OBJECT_HEIGHT.min(self.viewport.height),
        })
    }

    pub fn start(&mut self, now: Instant) -> Result<(), TransitionError> {
        self.ensure_state("start", &[SessionState::Menu])?;
        if !self.click_verified {
            self.score = 0;
        }
        self.state = SessionState::Playing;
        self.relocate();
        self.timer.arm(now);
        info!(game = self.config.id, score = self.score, "game started");
        Ok(())
    }

    /// Score a hit. The pending timer is re-armed so the click and a tick
    /// cannot both move the object.
    pub fn click(&mut self, now: Instant) -> Result<u32, TransitionError> {
        self.ensure_state("click", &[SessionState::Playing])?;
        self.score = self.score.saturating_add(1);
        self.relocate();
        self.timer.arm(now);
        debug!(score = self.score, x = self.position.x, y = self.position.y, "object clicked");
        Ok(self.score)
    }

    /// Click at a cell; returns true when it hit the visible object.
    pub fn click_at(&mut self, column: u16, row: u16, now: Instant) -> bool {
        let hit = self.object_rect().is_some_and(|rect| {
            column >= rect.x && column < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
        });
        hit && self.click(now).is_ok()
    }

    pub fn pause(&mut self) -> Result<(), TransitionError> {
        self.ensure_state("pause", &[SessionState::Playing])?;
        self.state = SessionState::Paused;
        self.timer.disarm();
        info!(score = self.score, "game paused");
        Ok(())
    }

    pub fn resume(&mut self, now: Instant) -> Result<(), TransitionError> {
        self.ensure_state("resume", &[SessionState::Paused])?;
        self.state = SessionState::Playing;
        self.timer.arm(now);
        info!("game resumed");
        Ok(())
    }

    pub fn quit(&mut self) -> Result<(), TransitionError> {
        self.ensure_state("quit", &[SessionState::Playing, SessionState::Paused])?;
        self.state = SessionState::Menu;
        self.timer.disarm();
        if !self.click_verified {
            self.score = 0;
        }
        info!(score = self.score, "back to menu");
        Ok(())
    }

    /// Periodic relocation. Returns true when the object moved.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.state != SessionState::Playing || !self.timer.fire_if_due(now) {
            return false;
        }
        self.relocate();
        true
    }

    pub fn show_about(&mut self) {
        self.overlay = Some(Overlay::About);
    }

    pub fn close_about(&mut self) {
        if self.overlay == Some(Overlay::About) {
            self.overlay = None;
        }
    }

    pub fn show_top_scores(&mut self) {
        self.overlay = Some(Overlay::TopScores);
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    pub fn skip_verification(&mut self) {
        self.verification = VerificationStatus::Skipped;
    }

    /// Apply the one verification outcome. A verified session takes the
    /// externally assigned score and keeps it across start and quit.
    pub fn apply_verification(&mut self, result: VerificationResult) {
        if result.verified {
            self.click_verified = true;
            self.score = result.initial_score;
            self.verification = VerificationStatus::Verified;
        } else {
            self.verification = VerificationStatus::Unverified;
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let (max_x, min_y, max_y) = self.bounds();
        self.position.x = self.position.x.min(max_x);
        self.position.y = self.position.y.clamp(min_y, max_y);
    }

    fn ensure_state(&self, action: &'static str, allowed: &[SessionState]) -> Result<(), TransitionError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(TransitionError { action, from: self.state })
        }
    }

    /// Inclusive placement bounds: `(max_x, min_y, max_y)`.
    fn bounds(&self) -> (u16, u16, u16) {
        let max_x = self.viewport.width.saturating_sub(OBJECT_WIDTH);
        let max_y = self.viewport.height.saturating_sub(OBJECT_HEIGHT);
        (max_x, TOP_OFFSET.min(max_y), max_y)
    }

    /// Uniform pick over the playable cells, excluding the current one.
    fn relocate(&mut self) {
        let (max_x, min_y, max_y) = self.bounds();
        let columns = u64::from(max_x) + 1;
        let rows = u64::from(max_y - min_y) + 1;
        let cells = columns * rows;

        let current = self.position;
        let in_bounds = current.x <= max_x && (min_y..=max_y).contains(&current.y);
        let index = if in_bounds && cells > 1 {
            let skip = u64::from(current.y - min_y) * columns + u64::from(current.x);
            let pick = self.rng.random_range(0..cells - 1);
            if pick >= skip { pick + 1 } else { pick }
        } else {
            self.rng.random_range(0..cells)
        };

        // both quotient and remainder are bounded by u16 limits above
        self.position = Position {
            x: (index % columns) as u16,
            y: min_y + (index / columns) as u16,
        };
    }
}

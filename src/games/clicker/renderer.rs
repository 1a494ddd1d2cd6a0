use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::core::offer_wall::OfferWallStyle;
use crate::core::session::{Overlay, SessionState, VerificationStatus};
use crate::games::clicker::game::{ClickerGame, MenuAction};

const MENU_ROW: u16 = 0;
const TITLE_ROW: u16 = 2;

fn button_text(action: MenuAction) -> String {
    format!("[{}] {}", action.hotkey().to_ascii_uppercase(), action.label())
}

/// Menu buttons visible in `state`, right-aligned on the menu row.
/// Buttons that do not fit are left out.
pub fn menu_buttons(width: u16, state: SessionState) -> Vec<(MenuAction, Rect)> {
    let mut right = width;
    let mut buttons: Vec<(MenuAction, Rect)> = Vec::new();
    for action in MenuAction::ALL.into_iter().rev().filter(|a| a.visible_in(state)) {
        let text_width = button_text(action).len() as u16;
        let Some(x) = right.checked_sub(text_width + 1) else {
            break;
        };
        buttons.push((action, Rect::new(x, MENU_ROW, text_width, 1)));
        right = x;
    }
    buttons.reverse();
    buttons
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

pub struct ClickerRenderer;

impl ClickerRenderer {
    pub fn render(frame: &mut Frame, game: &ClickerGame) {
        let area = frame.area();
        let session = game.session();
        let config = session.config();

        // Score panel
        let badge = match session.verification() {
            VerificationStatus::Pending => Span::styled("  verifying click...", Style::default().fg(Color::DarkGray)),
            VerificationStatus::Verified => Span::styled("  click verified", Style::default().fg(Color::Green)),
            VerificationStatus::Skipped | VerificationStatus::Unverified => Span::raw(""),
        };
        let score = Line::from(vec![
            Span::styled(format!(" Score: {}", session.score()), Style::default().add_modifier(Modifier::BOLD)),
            badge,
        ]);
        frame.render_widget(Paragraph::new(score), Rect::new(area.x, MENU_ROW, area.width, 1).intersection(area));

        for (action, rect) in menu_buttons(area.width, session.state()) {
            let button = Paragraph::new(button_text(action)).style(Style::default().bg(Color::Blue).fg(Color::White));
            frame.render_widget(button, rect.intersection(area));
        }

        let title = Paragraph::new(format!(" {}", config.name))
            .style(Style::default().fg(config.accent).add_modifier(Modifier::BOLD));
        frame.render_widget(title, Rect::new(area.x, TITLE_ROW, area.width, 1).intersection(area));

        match session.state() {
            SessionState::Menu => {
                let hint = Paragraph::new("Press [S] or click Start New Game. Esc exits.")
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Gray));
                frame.render_widget(hint, centered(area, area.width, 1));
            }
            SessionState::Playing => {
                if let Some(rect) = session.object_rect() {
                    let sprite: Vec<Line> = config.sprite.iter().map(|row| Line::from(*row)).collect();
                    let object = Paragraph::new(sprite).style(Style::default().fg(config.accent).add_modifier(Modifier::BOLD));
                    frame.render_widget(object, rect.intersection(area));
                }
            }
            SessionState::Paused => match game.offer_wall() {
                Some(style) => Self::render_offer_wall(frame, area, style),
                None => {
                    let paused = Paragraph::new("Paused - press [R] to resume")
                        .alignment(Alignment::Center)
                        .style(Style::default().add_modifier(Modifier::BOLD));
                    frame.render_widget(paused, centered(area, area.width, 1));
                }
            },
        }

        match session.overlay() {
            Some(Overlay::About) => Self::render_about(frame, area, game),
            Some(Overlay::TopScores) => {
                let popup = centered(area, 32, 3);
                frame.render_widget(Clear, popup);
                frame.render_widget(
                    Paragraph::new("Top Scores: Coming soon!")
                        .alignment(Alignment::Center)
                        .block(Block::default().borders(Borders::ALL)),
                    popup,
                );
            }
            None => {}
        }
    }

    fn render_offer_wall(frame: &mut Frame, area: Rect, style: OfferWallStyle) {
        let popup = centered(area, 44, 7);
        frame.render_widget(Clear, popup);
        let lines = vec![
            Line::from(Span::styled(" Offer Wall ", Style::default().bg(style.top_bar_bg).fg(style.top_bar_fg))),
            Line::from(""),
            Line::from(Span::styled("Partner apps", Style::default().fg(style.app_name_fg).add_modifier(Modifier::BOLD))),
            Line::from(Span::styled("Complete an offer, then come back", Style::default().fg(style.app_description_fg))),
            Line::from(Span::styled(" [R] Resume ", Style::default().bg(style.button_bg).fg(style.button_fg))),
        ];
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .style(Style::default().bg(style.content_bg))
                .block(Block::default().borders(Borders::ALL)),
            popup,
        );
    }

    fn render_about(frame: &mut Frame, area: Rect, game: &ClickerGame) {
        let session = game.session();
        let config = session.config();
        let about = game.about();
        let heading = Style::default().add_modifier(Modifier::BOLD);
        let role = about.role.map(|r| r.to_string()).unwrap_or_else(|| "Not specified".to_string());
        let verification = match session.verification() {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Skipped => "skipped",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Unverified => "not verified",
        };

        let lines = vec![
            Line::from(Span::styled("Background Image", heading)),
            Line::from(format!("{} - {}", config.background, config.background_credit)),
            Line::from(Span::styled("Object Image", heading)),
            Line::from(format!("{} - {}", config.object, config.object_credit)),
            Line::from(Span::styled("Apps Network Role", heading)),
            Line::from(format!("Current role: {role} ({verification})")),
            Line::from(Span::styled("Telegram User Info (Debug)", heading)),
            Line::from(format!("User ID: {}", about.user_id)),
            Line::from(Span::styled("Environment", heading)),
            Line::from(format!("Current environment: {}", about.env)),
            Line::from(Span::styled("TMA mode", heading)),
            Line::from(format!("Is in TMA: {}", about.mini_app)),
            Line::from(""),
            Line::from(Span::styled("[Esc] Close", Style::default().fg(Color::Gray))),
        ];

        let popup = centered(area, area.width.saturating_mul(4) / 5, 18);
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title(format!(" About {} ", config.name))),
            popup,
        );
    }
}

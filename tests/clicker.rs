use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use moleterm::core::game::{Command, Context, Game};
use moleterm::core::launch::{Environment, LaunchContext, LaunchParams, Role};
use moleterm::core::offer_wall::OfferWallStyle;
use moleterm::core::session::{GameSession, Overlay, SessionState, Viewport};
use moleterm::core::verify::VerificationResult;
use moleterm::games::clicker::renderer::menu_buttons;
use moleterm::games::clicker::{AboutInfo, ClickerGame, MenuAction};
use moleterm::games::select_game;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tokio::time::Instant;

const WIDTH: u16 = 100;
const HEIGHT: u16 = 30;

fn game(id: &str) -> ClickerGame {
    let session = GameSession::with_rng(select_game(Some(id)), Viewport::new(WIDTH, HEIGHT), StdRng::seed_from_u64(3));
    let about = AboutInfo { role: Some(Role::Publisher), user_id: 1_000_000_000, env: Environment::Prod, mini_app: false };
    ClickerGame::new(session, about)
}

fn context() -> (Context, UnboundedReceiver<Command>) {
    let (tx, rx) = unbounded_channel();
    (Context::new(tx), rx)
}

fn key(c: char) -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn press(column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

fn screen(game: &ClickerGame) -> String {
    let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT)).unwrap();
    terminal.draw(|f| game.render(f)).unwrap();
    let buffer = terminal.backend().buffer();
    buffer
        .content
        .chunks(buffer.area.width as usize)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn hotkeys_drive_the_lifecycle() {
    let now = Instant::now();
    let (ctx, mut rx) = context();
    let mut g = game("cosmicClicker");

    g.handle_event(key('s'), now, &ctx);
    assert_eq!(g.session().state(), SessionState::Playing);

    g.handle_event(key('p'), now, &ctx);
    assert_eq!(g.session().state(), SessionState::Paused);
    assert_eq!(rx.try_recv().ok(), Some(Command::ShowOfferWall));

    g.handle_event(key('r'), now, &ctx);
    assert_eq!(g.session().state(), SessionState::Playing);

    g.handle_event(key('q'), now, &ctx);
    assert_eq!(g.session().state(), SessionState::Menu);
    assert!(rx.try_recv().is_err());
}

#[test]
fn pause_outside_playing_asks_for_no_offer_wall() {
    let (ctx, mut rx) = context();
    let mut g = game("forestFriend");

    g.handle_event(key('p'), Instant::now(), &ctx);
    assert_eq!(g.session().state(), SessionState::Menu);
    assert!(rx.try_recv().is_err());
}

#[test]
fn escape_closes_overlay_then_exits_from_menu() {
    let now = Instant::now();
    let (ctx, mut rx) = context();
    let mut g = game("balloonBopper");
    let esc = Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));

    g.handle_event(key('a'), now, &ctx);
    assert_eq!(g.session().overlay(), Some(Overlay::About));
    g.handle_event(esc.clone(), now, &ctx);
    assert_eq!(g.session().overlay(), None);
    assert!(rx.try_recv().is_err());

    g.handle_event(esc, now, &ctx);
    assert_eq!(rx.try_recv().ok(), Some(Command::Exit));
}

#[test]
fn ctrl_c_exits_while_playing() {
    let (ctx, mut rx) = context();
    let mut g = game("cosmicClicker");
    g.handle_event(key('s'), Instant::now(), &ctx);
    g.handle_event(
        Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        Instant::now(),
        &ctx,
    );
    assert_eq!(rx.try_recv().ok(), Some(Command::Exit));
}

#[test]
fn mouse_hits_score_and_misses_do_not() {
    let now = Instant::now();
    let (ctx, _rx) = context();
    let mut g = game("deepSeaClicker");
    g.handle_event(key('s'), now, &ctx);

    let rect = g.session().object_rect().unwrap();
    g.handle_event(press(rect.x + 1, rect.y + 1), now, &ctx);
    assert_eq!(g.session().score(), 1);
    assert_ne!(g.session().object_rect().unwrap(), rect);

    // the spot the object just left
    let moved = g.session().object_rect().unwrap();
    if !(rect.x + 1 >= moved.x && rect.x + 1 < moved.x + moved.width && rect.y + 1 >= moved.y && rect.y + 1 < moved.y + moved.height) {
        g.handle_event(press(rect.x + 1, rect.y + 1), now, &ctx);
        assert_eq!(g.session().score(), 1);
    }
}

#[test]
fn menu_buttons_follow_state_and_are_clickable() {
    let now = Instant::now();
    let (ctx, mut rx) = context();
    let mut g = game("cosmicClicker");

    let labels = |state| menu_buttons(WIDTH, state).into_iter().map(|(a, _)| a).collect::<Vec<_>>();
    assert_eq!(labels(SessionState::Menu), vec![MenuAction::Start, MenuAction::TopScores, MenuAction::About, MenuAction::Quit]);
    assert_eq!(labels(SessionState::Playing), vec![MenuAction::Pause, MenuAction::TopScores, MenuAction::About, MenuAction::Quit]);
    assert_eq!(labels(SessionState::Paused), vec![MenuAction::Resume, MenuAction::TopScores, MenuAction::About, MenuAction::Quit]);

    let (_, start) = menu_buttons(WIDTH, SessionState::Menu)[0];
    g.handle_event(press(start.x, start.y), now, &ctx);
    assert_eq!(g.session().state(), SessionState::Playing);

    let (_, pause) = menu_buttons(WIDTH, SessionState::Playing)[0];
    g.handle_event(press(pause.x + 2, pause.y), now, &ctx);
    assert_eq!(g.session().state(), SessionState::Paused);
    assert_eq!(rx.try_recv().ok(), Some(Command::ShowOfferWall));
}

#[test]
fn offer_wall_shows_only_while_paused() {
    let now = Instant::now();
    let (ctx, _rx) = context();
    let mut g = game("cosmicClicker");
    g.handle_event(key('s'), now, &ctx);
    g.handle_event(key('p'), now, &ctx);

    g.on_offer_wall(Some(OfferWallStyle::default()));
    assert_eq!(g.offer_wall(), Some(OfferWallStyle::default()));
    assert!(screen(&g).contains("Offer Wall"));

    g.handle_event(key('r'), now, &ctx);
    assert_eq!(g.offer_wall(), None);

    // a late answer after resuming is dropped
    g.on_offer_wall(Some(OfferWallStyle::default()));
    assert_eq!(g.offer_wall(), None);
}

#[test]
fn verification_result_updates_score_panel() {
    let mut g = game("cosmicClicker");
    assert!(screen(&g).contains("verifying click"));

    g.on_verification(VerificationResult::verified(100));
    let text = screen(&g);
    assert!(text.contains("Score: 100"));
    assert!(text.contains("click verified"));
}

#[test]
fn renders_title_sprite_and_about() {
    let now = Instant::now();
    let (ctx, _rx) = context();
    let mut g = game("cosmicClicker");

    let menu = screen(&g);
    assert!(menu.contains("Cosmic Clicker"));
    assert!(menu.contains("[S] Start New Game"));
    assert!(!menu.contains("|oo|"));

    g.handle_event(key('s'), now, &ctx);
    let playing = screen(&g);
    assert!(playing.contains("|oo|"));
    assert!(playing.contains("[P] Pause"));

    g.handle_event(key('a'), now, &ctx);
    let about = screen(&g);
    assert!(about.contains("About Cosmic Clicker"));
    assert!(about.contains("Current role: publisher"));
    assert!(about.contains("User ID: 1000000000"));
}

#[test]
fn about_info_comes_from_launch() {
    let launch = LaunchContext::new(LaunchParams::from_query("env=dev&tgWebAppVersion=7.2"), None);
    let about = AboutInfo::from(&launch);

    assert_eq!(about, AboutInfo { role: None, user_id: 1_000_000_000, env: Environment::Dev, mini_app: true });
}

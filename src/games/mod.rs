pub mod clicker;
pub mod macros;

use std::time::Duration;

use ratatui::style::Color;
use tracing::warn;

use crate::register_games;

pub const DEFAULT_GAME: &str = "cosmicClicker";

/// Static description of one clicker variant.
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub id: &'static str,
    pub name: &'static str,
    pub background: &'static str,
    pub background_credit: &'static str,
    pub object: &'static str,
    pub object_credit: &'static str,
    pub move_interval: Duration,
    /// Terminal stand-in for the object image, one entry per row.
    pub sprite: [&'static str; 3],
    pub accent: Color,
}

// Register all games here - add a new entry to ship another variant
register_games! {
    "cosmicClicker" => {
        name: "Cosmic Clicker",
        background: "game_assets/space-background.jpg",
        background_credit: "Photo by Andy Holmes on Unsplash (https://unsplash.com/photos/milky-way-during-night-time-LUpDjlJv4_c)",
        object: "game_assets/spaceship-cute.png",
        object_credit: "Image by DALLE 3 (https://designer.microsoft.com/consumerTermsOfUse/en-GB/consumerTermsOfUse.pdf)",
        move_interval_ms: 3000,
        sprite: ["  /\\  ", " |oo| ", " /  \\ "],
        accent: Color::Cyan
    },
    "forestFriend" => {
        name: "Forest Friend",
        background: "game_assets/forest-background.jpg",
        background_credit: "Photo by Howard Bouchevereau on Unsplash (https://unsplash.com/photos/a-forest-of-tall-trees-nifQzholGAc)",
        object: "game_assets/forest_friend-cute.png",
        object_credit: "Image by DALLE 3 (https://designer.microsoft.com/consumerTermsOfUse/en-GB/consumerTermsOfUse.pdf)",
        move_interval_ms: 2500,
        sprite: [" (\\_/)", " (o.o)", " (> <)"],
        accent: Color::Green
    },
    "balloonBopper" => {
        name: "Balloon Bopper",
        background: "game_assets/sky-background.jpg",
        background_credit: "Photo by Thomas Dupon on Unsplash (https://unsplash.com/photos/white-clouds-and-blue-sky-during-daytime-KuuHp9HgCI0)",
        object: "game_assets/balloon-cute.png",
        object_credit: "Image by DALLE 3 (https://designer.microsoft.com/consumerTermsOfUse/en-GB/consumerTermsOfUse.pdf)",
        move_interval_ms: 3500,
        sprite: ["  __  ", " (  ) ", "  \\/  "],
        accent: Color::LightRed
    },
    "deepSeaClicker" => {
        name: "Deep Sea Clicker",
        background: "game_assets/ocean-background.jpg",
        background_credit: "Photo by Silas Baisch on Unsplash (https://unsplash.com/photos/blue-and-clear-body-of-water-K785Da4A_JA)",
        object: "game_assets/jellyfish-cute.png",
        object_credit: "Image by DALLE 3 (https://designer.microsoft.com/consumerTermsOfUse/en-GB/consumerTermsOfUse.pdf)",
        move_interval_ms: 3000,
        sprite: [" .--. ", "( oo )", " )()( "],
        accent: Color::Magenta
    },
}

/// Pick the configured game, falling back to the default for unknown ids.
pub fn select_game(id: Option<&str>) -> GameConfig {
    let requested = id.unwrap_or(DEFAULT_GAME);
    get_game(requested)
        .or_else(|| {
            warn!(game = requested, fallback = DEFAULT_GAME, "unknown game, using default");
            get_game(DEFAULT_GAME)
        })
        .unwrap_or_else(|| get_all_games().remove(0))
}

/// Macro to declare the game catalog with automatic lookup generation
///
/// Usage in games/mod.rs:
/// ```ignore
/// register_games! {
///     "cosmicClicker" => {
///         name: "Cosmic Clicker",
///         background: "game_assets/space-background.jpg",
///         background_credit: "Photo by Andy Holmes on Unsplash",
///         object: "game_assets/spaceship-cute.png",
///         object_credit: "Image by DALLE 3",
///         move_interval_ms: 3000,
///         sprite: ["  /\\  ", " |oo| ", " /  \\ "],
///         accent: Color::Cyan
///     }
/// }
/// ```
#[macro_export]
macro_rules! register_games {
    (
        $(
            $id:literal => {
                name: $name:expr,
                background: $background:expr,
                background_credit: $background_credit:expr,
                object: $object:expr,
                object_credit: $object_credit:expr,
                move_interval_ms: $interval:expr,
                sprite: $sprite:expr,
                accent: $accent:expr
            }
        ),* $(,)?
    ) => {
        /// Every game in the catalog, in declaration order
        pub fn get_all_games() -> Vec<$crate::games::GameConfig> {
            vec![
                $(
                    $crate::games::GameConfig {
                        id: $id,
                        name: $name,
                        background: $background,
                        background_credit: $background_credit,
                        object: $object,
                        object_credit: $object_credit,
                        move_interval: std::time::Duration::from_millis($interval),
                        sprite: $sprite,
                        accent: $accent,
                    }
                ),*
            ]
        }

        /// Get a game by ID
        pub fn get_game(id: &str) -> Option<$crate::games::GameConfig> {
            get_all_games().into_iter().find(|g| g.id == id)
        }
    };
}

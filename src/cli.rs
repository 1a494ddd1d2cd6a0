use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::core::launch::{LaunchContext, LaunchParams};
use crate::core::offer_wall::SdkOfferWall;
use crate::core::verify::HttpClickApi;
use crate::games::{self, clicker, DEFAULT_GAME};
use crate::logging;

#[derive(Parser)]
#[command(name = "moleterm")]
#[command(about = "🎯 Click the sprite before it bounces away")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch settings used when no subcommand is given
    #[command(flatten)]
    pub launch: LaunchArgs,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Play a game (the default when no subcommand is given)
    Play(LaunchArgs),
    /// List available games
    List,
}

/// Launch settings. Individual flags override keys from `--query`.
#[derive(Args, Debug, Clone, Default)]
pub struct LaunchArgs {
    /// Launch query string, e.g. "game=forestFriend&env=dev&role=advertiser&click_id=abc"
    #[arg(long)]
    pub query: Option<String>,

    /// Game id from the catalog
    #[arg(short, long)]
    pub game: Option<String>,

    /// Backend environment: dev or prod
    #[arg(long)]
    pub env: Option<String>,

    /// Apps-network role: publisher or advertiser
    #[arg(long)]
    pub role: Option<String>,

    #[arg(long)]
    pub click_id: Option<String>,

    #[arg(long)]
    pub start_param: Option<String>,

    /// Telegram Mini-App init data handed over by the host
    #[arg(long, env = "MOLETERM_INIT_DATA")]
    pub init_data: Option<String>,

    /// Directory for moleterm.log
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

impl LaunchArgs {
    pub fn to_params(&self) -> LaunchParams {
        let mut params = self.query.as_deref().map(LaunchParams::from_query).unwrap_or_default();
        let overrides = [
            ("game", &self.game),
            ("env", &self.env),
            ("role", &self.role),
            ("click_id", &self.click_id),
            ("start_param", &self.start_param),
        ];
        for (key, value) in overrides {
            if let Some(value) = value {
                params.apply_pair(key, value);
            }
        }
        params
    }

    pub fn to_launch(&self) -> LaunchContext {
        LaunchContext::new(self.to_params(), self.init_data.as_deref())
    }
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => play(cli.launch).await,
        Some(Commands::Play(args)) => play(args).await,
        Some(Commands::List) => {
            println!("🎮 Available games:");
            println!();
            for game in games::get_all_games() {
                let default = if game.id == DEFAULT_GAME { " (default)" } else { "" };
                println!("📦 {}{} - {}", game.id, default, game.name);
                println!("   Moves every {} ms", game.move_interval.as_millis());
                println!();
            }
            Ok(())
        }
    }
}

async fn play(args: LaunchArgs) -> Result<()> {
    let _guard = logging::init(args.log_dir.as_deref())?;

    let launch = args.to_launch();
    let config = games::select_game(launch.params().game.as_deref());
    info!(game = config.id, env = %launch.params().env, mini_app = launch.is_mini_app(), "launching");

    let mut offer_wall = SdkOfferWall::new(launch.params().env);
    offer_wall.load();

    let terminal = ratatui::init();
    let result = clicker::run_game(config, &launch, offer_wall, Arc::new(HttpClickApi::new()), terminal).await;
    ratatui::restore();
    result
}

use ratatui::style::Color;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::launch::Environment;
use crate::core::verify::WALLET_ADDRESS;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OfferWallError {
    #[error("offer wall sdk is not loaded")]
    NotLoaded,
}

/// Colours the offer wall is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfferWallStyle {
    pub top_bar_bg: Color,
    pub top_bar_fg: Color,
    pub content_bg: Color,
    pub app_name_fg: Color,
    pub app_description_fg: Color,
    pub button_bg: Color,
    pub button_fg: Color,
}

impl Default for OfferWallStyle {
    fn default() -> Self {
        Self {
            top_bar_bg: Color::Rgb(0x2c, 0x3e, 0x50),
            top_bar_fg: Color::Rgb(0xec, 0xf0, 0xf1),
            content_bg: Color::Rgb(0x34, 0x49, 0x5e),
            app_name_fg: Color::Rgb(0xec, 0xf0, 0xf1),
            app_description_fg: Color::Rgb(0xbd, 0xc3, 0xc7),
            button_bg: Color::Rgb(0x34, 0x98, 0xdb),
            button_fg: Color::Rgb(0xff, 0xff, 0xff),
        }
    }
}

/// Third-party monetisation surface shown when the session pauses.
pub trait OfferWall: Send {
    /// Called once the SDK is available.
    fn on_load(&mut self);

    fn show(&mut self) -> Result<OfferWallStyle, OfferWallError>;
}

/// The bec offer-wall SDK for the selected environment.
#[derive(Debug, Clone)]
pub struct SdkOfferWall {
    script_url: String,
    style: Option<OfferWallStyle>,
    loaded: bool,
}

impl SdkOfferWall {
    pub fn new(env: Environment) -> Self {
        let script_url = match url::Url::parse_with_params(env.offer_wall_sdk_url(), [("walletAddress", WALLET_ADDRESS)]) {
            Ok(url) => url.to_string(),
            Err(e) => {
                warn!(error = %e, "could not build offer wall sdk url");
                env.offer_wall_sdk_url().to_string()
            }
        };
        Self { script_url, style: None, loaded: false }
    }

    pub fn script_url(&self) -> &str {
        &self.script_url
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn load(&mut self) {
        info!(url = %self.script_url, "offer wall sdk loaded");
        self.loaded = true;
        self.on_load();
    }
}

impl OfferWall for SdkOfferWall {
    fn on_load(&mut self) {
        let style = OfferWallStyle::default();
        debug!(?style, "configured offer wall style");
        self.style = Some(style);
    }

    fn show(&mut self) -> Result<OfferWallStyle, OfferWallError> {
        match (self.loaded, self.style) {
            (true, Some(style)) => {
                info!("surfacing offer wall");
                Ok(style)
            }
            _ => Err(OfferWallError::NotLoaded),
        }
    }
}

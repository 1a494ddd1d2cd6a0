//! One-shot click verification against the banners API.
//!
//! Publishers are credited for offer-wall click events recorded for the
//! user; advertisers ask whether the click that brought the user in is
//! valid. Every failure leaves the session unverified and is only logged.

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::core::launch::{Environment, Role};

/// Publisher wallet the events endpoint is queried for.
pub const WALLET_ADDRESS: &str = "QnLOYksIDhA3MfBLoRL+yIa8jRggeovB3NtN3d7LD7g=";
pub const SCORE_PER_EVENT: u32 = 10;
pub const ADVERTISER_SCORE: u32 = 100;

const CLICK_ACTION: &str = "CLICK";

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("user id is required for {0} verification")]
    MissingUserId(Role),

    #[error("click id is required for {0} verification outside a Mini-App")]
    MissingClickId(Role),

    #[error("invalid verification url: {0}")]
    Url(#[from] url::ParseError),

    #[error("verification request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("verification endpoint answered with status {0}")]
    Status(u16),

    #[error("malformed verification response: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VerificationResult {
    pub verified: bool,
    pub initial_score: u32,
}

impl VerificationResult {
    pub const UNVERIFIED: Self = Self { verified: false, initial_score: 0 };

    pub fn verified(initial_score: u32) -> Self {
        Self { verified: true, initial_score }
    }
}

/// Everything needed to build the single verification call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    pub role: Role,
    pub click_id: Option<String>,
    pub user_id: Option<u64>,
    pub env: Environment,
    pub mini_app: bool,
}

impl VerificationRequest {
    pub fn url(&self) -> Result<Url, VerifyError> {
        let mut url = Url::parse(self.env.click_base_url())?;
        match self.role {
            // The events endpoint is keyed by wallet and user in both modes;
            // outside a Mini-App a click id must still be present.
            Role::Publisher => {
                let user_id = self.user_id.ok_or(VerifyError::MissingUserId(self.role))?;
                if !self.mini_app && self.click_id.is_none() {
                    return Err(VerifyError::MissingClickId(self.role));
                }
                url.set_path("/banners/events");
                url.query_pairs_mut()
                    .append_pair("wa", WALLET_ADDRESS)
                    .append_pair("tui", &user_id.to_string());
            }
            Role::Advertiser if self.mini_app => {
                let user_id = self.user_id.ok_or(VerifyError::MissingUserId(self.role))?;
                url.set_path("/banners/verify");
                let mut query = url.query_pairs_mut();
                query.append_pair("tui", &user_id.to_string());
                if let Some(click_id) = &self.click_id {
                    query.append_pair("click_id", click_id);
                }
            }
            Role::Advertiser => {
                let click_id = self.click_id.as_deref().ok_or(VerifyError::MissingClickId(self.role))?;
                url.set_path("/banners/verify");
                url.query_pairs_mut().append_pair("click_id", click_id);
            }
        }
        Ok(url)
    }
}

/// Transport for verification calls. Returns the body of a 2xx response.
#[async_trait]
pub trait ClickApi: Send + Sync {
    async fn get(&self, url: Url) -> Result<String, VerifyError>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpClickApi {
    client: reqwest::Client,
}

impl HttpClickApi {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClickApi for HttpClickApi {
    async fn get(&self, url: Url) -> Result<String, VerifyError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(VerifyError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default)]
    items: Vec<BannerEvent>,
}

#[derive(Debug, Deserialize)]
struct BannerEvent {
    #[serde(default)]
    action: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    #[serde(default)]
    valid: bool,
}

/// Publisher events: any click event verifies, and every recorded event is
/// worth `SCORE_PER_EVENT`.
pub fn publisher_result(body: &str) -> Result<VerificationResult, VerifyError> {
    let events: EventsResponse = serde_json::from_str(body)?;
    let clicks = events
        .items
        .iter()
        .filter(|item| item.action.as_deref() == Some(CLICK_ACTION))
        .count();
    if clicks == 0 {
        return Ok(VerificationResult::UNVERIFIED);
    }
    let total = u32::try_from(events.items.len()).unwrap_or(u32::MAX);
    info!(clicks, events = total, "offer wall click events found");
    Ok(VerificationResult::verified(total.saturating_mul(SCORE_PER_EVENT)))
}

pub fn advertiser_result(body: &str) -> Result<VerificationResult, VerifyError> {
    let response: VerifyResponse = serde_json::from_str(body)?;
    if response.valid {
        Ok(VerificationResult::verified(ADVERTISER_SCORE))
    } else {
        Ok(VerificationResult::UNVERIFIED)
    }
}

async fn try_verify(api: &dyn ClickApi, request: &VerificationRequest) -> Result<VerificationResult, VerifyError> {
    let url = request.url()?;
    debug!(%url, role = %request.role, "verifying click");
    let body = api.get(url).await?;
    match request.role {
        Role::Publisher => publisher_result(&body),
        Role::Advertiser => advertiser_result(&body),
    }
}

/// Run the verification once. Never retried; failures are logged and
/// reported as unverified.
pub async fn verify_click(api: &dyn ClickApi, request: &VerificationRequest) -> VerificationResult {
    match try_verify(api, request).await {
        Ok(result) => {
            info!(role = %request.role, verified = result.verified, score = result.initial_score, "click verification finished");
            result
        }
        Err(e) => {
            error!(role = %request.role, error = %e, "click verification failed");
            VerificationResult::UNVERIFIED
        }
    }
}

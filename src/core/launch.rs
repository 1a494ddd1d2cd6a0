//! Launch parameters and the Telegram Mini-App host context.
use std::fmt;

use serde::Deserialize;
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::core::verify::VerificationRequest;

/// User id reported when no Mini-App host supplies one.
pub const FALLBACK_USER_ID: u64 = 1_000_000_000;

const CLICK_ID_PREFIX: &str = "clickid_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Prod,
    Dev,
}

impl Environment {
    /// Anything other than `dev` selects production.
    pub fn from_param(value: &str) -> Self {
        if value == "dev" {
            Environment::Dev
        } else {
            Environment::Prod
        }
    }

    pub fn click_base_url(self) -> &'static str {
        match self {
            Environment::Dev => "https://click-dev.dmtp.tech",
            Environment::Prod => "https://click.dmtp.tech",
        }
    }

    pub fn offer_wall_sdk_url(self) -> &'static str {
        match self {
            Environment::Dev => "https://tma-demo.dmtp.tech/sdk/0.0.8/bec.js",
            Environment::Prod => "https://bec.dmtp.tech/0.0.8/bec.js",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Prod => f.write_str("prod"),
            Environment::Dev => f.write_str("dev"),
        }
    }
}

/// Apps-network role of the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Publisher,
    Advertiser,
}

impl Role {
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "publisher" => Some(Role::Publisher),
            "advertiser" => Some(Role::Advertiser),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Publisher => f.write_str("publisher"),
            Role::Advertiser => f.write_str("advertiser"),
        }
    }
}

/// Parameters the session is launched with, as found in a launch query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchParams {
    pub game: Option<String>,
    pub env: Environment,
    pub role: Option<Role>,
    pub click_id: Option<String>,
    pub start_param: Option<String>,
    pub tg_web_app_data: Option<String>,
    pub tg_web_app_version: Option<String>,
}

impl LaunchParams {
    /// Parse `game=...&env=...&role=...`. A leading `?` is accepted and
    /// unknown keys are ignored.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            params.apply_pair(&key, &value);
        }
        params
    }

    /// Apply a single key/value pair. Empty values count as absent.
    pub fn apply_pair(&mut self, key: &str, value: &str) {
        let present = (!value.is_empty()).then(|| value.to_string());
        match key {
            "game" => self.game = present,
            "env" => self.env = Environment::from_param(value),
            "role" => {
                self.role = Role::from_param(value);
                if self.role.is_none() && !value.is_empty() {
                    warn!(role = value, "ignoring unknown role");
                }
            }
            "click_id" => self.click_id = present,
            "start_param" => self.start_param = present,
            "tgWebAppData" => self.tg_web_app_data = present,
            "tgWebAppVersion" => self.tg_web_app_version = present,
            other => debug!(key = other, "ignoring launch parameter"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TelegramUser {
    id: u64,
}

/// What the Mini-App host tells us about the current user.
///
/// Built from Telegram init data (`user=<json>&start_param=...&auth_date=...`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostContext {
    pub user_id: Option<u64>,
    pub start_param: Option<String>,
    fields: usize,
}

impl HostContext {
    pub fn from_init_data(init_data: &str) -> Self {
        let mut host = Self::default();
        for (key, value) in form_urlencoded::parse(init_data.as_bytes()) {
            host.fields += 1;
            match key.as_ref() {
                "user" => match serde_json::from_str::<TelegramUser>(&value) {
                    Ok(user) => host.user_id = Some(user.id),
                    Err(e) => warn!(error = %e, "unreadable user in init data"),
                },
                "start_param" if !value.is_empty() => host.start_param = Some(value.into_owned()),
                _ => {}
            }
        }
        host
    }

    /// True when the host actually handed over init data.
    pub fn is_present(&self) -> bool {
        self.fields > 0
    }
}

/// Launch parameters together with the resolved host context.
#[derive(Debug, Clone, Default)]
pub struct LaunchContext {
    params: LaunchParams,
    host: HostContext,
}

impl LaunchContext {
    /// `init_data` comes from the host; without it the `tgWebAppData`
    /// launch parameter is used.
    pub fn new(params: LaunchParams, init_data: Option<&str>) -> Self {
        let host = init_data
            .filter(|data| !data.is_empty())
            .or(params.tg_web_app_data.as_deref())
            .map(HostContext::from_init_data)
            .unwrap_or_default();
        Self { params, host }
    }

    pub fn params(&self) -> &LaunchParams {
        &self.params
    }

    pub fn host(&self) -> &HostContext {
        &self.host
    }

    pub fn is_mini_app(&self) -> bool {
        self.host.is_present()
            || self.params.tg_web_app_data.is_some()
            || self.params.tg_web_app_version.is_some()
    }

    pub fn user_id(&self) -> u64 {
        self.host.user_id.unwrap_or(FALLBACK_USER_ID)
    }

    /// Inside a Mini-App the click id travels in `start_param` as
    /// `clickid_<id>`; otherwise it is the `click_id` parameter.
    pub fn click_id(&self) -> Option<String> {
        if !self.is_mini_app() {
            return self.params.click_id.clone();
        }
        self.host
            .start_param
            .as_deref()
            .and_then(|param| param.strip_prefix(CLICK_ID_PREFIX))
            .and_then(|rest| rest.split('_').next())
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .or_else(|| self.params.start_param.clone())
    }

    /// `None` when no role was given and verification is skipped.
    pub fn verification_request(&self) -> Option<VerificationRequest> {
        let role = self.params.role?;
        Some(VerificationRequest {
            role,
            click_id: self.click_id(),
            user_id: Some(self.user_id()),
            env: self.params.env,
            mini_app: self.is_mini_app(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_keys_and_ignores_the_rest() {
        let params = LaunchParams::from_query("?game=forestFriend&env=dev&role=advertiser&click_id=abc&utm=x");

        assert_eq!(params.game.as_deref(), Some("forestFriend"));
        assert_eq!(params.env, Environment::Dev);
        assert_eq!(params.role, Some(Role::Advertiser));
        assert_eq!(params.click_id.as_deref(), Some("abc"));
    }

    #[test]
    fn defaults_to_prod_without_role() {
        let params = LaunchParams::from_query("env=staging&role=");

        assert_eq!(params.env, Environment::Prod);
        assert_eq!(params.role, None);
        assert!(LaunchContext::new(params, None).verification_request().is_none());
    }

    #[test]
    fn unknown_role_is_absent() {
        assert_eq!(LaunchParams::from_query("role=admin").role, None);
    }

    #[test]
    fn host_context_reads_user_and_start_param() {
        let host = HostContext::from_init_data(
            "query_id=AAH&user=%7B%22id%22%3A4242%2C%22first_name%22%3A%22Ann%22%7D&start_param=clickid_77&auth_date=1",
        );

        assert!(host.is_present());
        assert_eq!(host.user_id, Some(4242));
        assert_eq!(host.start_param.as_deref(), Some("clickid_77"));
    }

    #[test]
    fn mini_app_click_id_comes_from_start_param() {
        let params = LaunchParams::from_query("role=publisher&click_id=ignored");
        let launch = LaunchContext::new(params, Some("user=%7B%22id%22%3A5%7D&start_param=clickid_abc"));

        assert!(launch.is_mini_app());
        assert_eq!(launch.user_id(), 5);
        assert_eq!(launch.click_id().as_deref(), Some("abc"));
    }

    #[test]
    fn mini_app_falls_back_to_launch_start_param() {
        let launch = LaunchContext::new(LaunchParams::from_query("tgWebAppVersion=7.0&start_param=xyz"), None);

        assert!(launch.is_mini_app());
        assert_eq!(launch.click_id().as_deref(), Some("xyz"));
    }

    #[test]
    fn empty_host_init_data_falls_back_to_launch_data() {
        let params = LaunchParams::from_query("tgWebAppData=user%3D%257B%2522id%2522%253A5%257D");
        let launch = LaunchContext::new(params, Some(""));

        assert!(launch.host().is_present());
        assert_eq!(launch.user_id(), 5);
    }

    #[test]
    fn plain_launch_uses_fallback_user_and_click_id() {
        let launch = LaunchContext::new(LaunchParams::from_query("click_id=c-1&start_param=nope"), None);

        assert!(!launch.is_mini_app());
        assert_eq!(launch.user_id(), FALLBACK_USER_ID);
        assert_eq!(launch.click_id().as_deref(), Some("c-1"));
    }
}

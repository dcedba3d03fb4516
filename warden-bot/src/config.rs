use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context as _, anyhow};

use warden_modmail::ModmailSettings;
use warden_modmail::relay::{DEFAULT_DELIVERY_TIMEOUT, DEFAULT_TEAM_NAME};

const DEFAULT_APPEAL_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Clone, Debug)]
pub struct BotConfig {
    pub token: String,
    pub guild_id: u64,
    pub modlog_channel_id: Option<u64>,
    pub modmail: ModmailSettings,
    pub appeals: AppealsConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppealsConfig {
    Disabled,
    Enabled(AppealServerConfig),
    /// Enabled but unusable; the reason is logged and the server stays off.
    Misconfigured(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppealServerConfig {
    pub bind_addr: SocketAddr,
    pub api_token: String,
    pub channel_id: u64,
}

impl BotConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let token = non_empty(&lookup, "DISCORD_TOKEN").context("DISCORD_TOKEN is not set")?;
        let guild_id = non_empty(&lookup, "DISCORD_GUILD_ID")
            .context("DISCORD_GUILD_ID is not set")
            .and_then(|raw| parse_snowflake(&raw).context("DISCORD_GUILD_ID is not a valid id"))?;

        let modlog_channel_id = match non_empty(&lookup, "MODLOG_CHANNEL_ID") {
            Some(raw) => {
                Some(parse_snowflake(&raw).context("MODLOG_CHANNEL_ID is not a valid id")?)
            }
            None => None,
        };

        let delivery_timeout_secs = env_u64(
            &lookup,
            "MODMAIL_DELIVERY_TIMEOUT_SECONDS",
            DEFAULT_DELIVERY_TIMEOUT.as_secs(),
        )
        .max(1);
        let team_name = non_empty(&lookup, "MODMAIL_TEAM_NAME")
            .unwrap_or_else(|| DEFAULT_TEAM_NAME.to_owned());

        Ok(Self {
            token,
            guild_id,
            modlog_channel_id,
            modmail: ModmailSettings {
                delivery_timeout: Duration::from_secs(delivery_timeout_secs),
                team_name,
            },
            appeals: appeals_config(&lookup),
        })
    }
}

fn appeals_config(lookup: &impl Fn(&str) -> Option<String>) -> AppealsConfig {
    if !env_bool(lookup, "APPEALS_ENABLED", false) {
        return AppealsConfig::Disabled;
    }

    let raw_addr = non_empty(lookup, "APPEAL_BIND_ADDR")
        .unwrap_or_else(|| DEFAULT_APPEAL_BIND_ADDR.to_owned());
    let Ok(bind_addr) = raw_addr.parse::<SocketAddr>() else {
        return AppealsConfig::Misconfigured(format!(
            "APPEAL_BIND_ADDR `{raw_addr}` is not a socket address"
        ));
    };

    let Some(api_token) = non_empty(lookup, "APPEAL_API_TOKEN") else {
        return AppealsConfig::Misconfigured("APPEAL_API_TOKEN is missing".to_owned());
    };

    let Some(channel_id) = non_empty(lookup, "APPEAL_CHANNEL_ID") else {
        return AppealsConfig::Misconfigured("APPEAL_CHANNEL_ID is missing".to_owned());
    };
    let Ok(channel_id) = parse_snowflake(&channel_id) else {
        return AppealsConfig::Misconfigured("APPEAL_CHANNEL_ID is not a valid id".to_owned());
    };

    AppealsConfig::Enabled(AppealServerConfig {
        bind_addr,
        api_token,
        channel_id,
    })
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_snowflake(raw: &str) -> anyhow::Result<u64> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|value| *value != 0)
        .ok_or_else(|| anyhow!("`{raw}` is not a non-zero integer id"))
}

fn env_bool(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    match lookup(key) {
        Some(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        None => default,
    }
}

fn env_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> u64 {
    match lookup(key) {
        Some(value) => value.trim().parse::<u64>().unwrap_or(default),
        None => default,
    }
}

use std::time::Duration;

use crate::server::error::{config::ConfigError, AppError};

const DEFAULT_API_PORT: u16 = 10000;
const DEFAULT_ROBLOX_API_URL: &str = "https://users.roblox.com";
const DEFAULT_CLAIM_COOLDOWN_SECS: u64 = 600;
const DEFAULT_VERIFY_EXPIRY_SECS: u64 = 600;
const DEFAULT_CLOSE_FLOW_EXPIRY_SECS: u64 = 900;

pub struct Config {
    pub database_url: String,

    pub discord_bot_token: String,
    pub guild_id: u64,
    pub ticket_category_id: Option<u64>,
    pub ticket_log_channel_id: Option<u64>,
    pub shop_voice_channel_id: Option<u64>,
    pub staff_role_ids: Vec<u64>,

    pub api_port: u16,
    pub roblox_api_url: String,

    pub claim_cooldown: Duration,
    pub verify_expiry: Duration,
    pub close_flow_expiry: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            discord_bot_token: required("DISCORD_BOT_TOKEN")?,
            guild_id: parse_required("DISCORD_GUILD_ID")?,
            ticket_category_id: parse_optional("TICKET_CATEGORY_ID")?,
            ticket_log_channel_id: parse_optional("TICKET_LOG_CHANNEL_ID")?,
            shop_voice_channel_id: parse_optional("SHOP_VOICE_CHANNEL_ID")?,
            staff_role_ids: parse_id_list("STAFF_ROLE_IDS")?,
            api_port: parse_optional("API_PORT")?.unwrap_or(DEFAULT_API_PORT),
            roblox_api_url: std::env::var("ROBLOX_API_URL")
                .unwrap_or_else(|_| DEFAULT_ROBLOX_API_URL.to_string()),
            claim_cooldown: duration_from_env("CLAIM_COOLDOWN_SECS", DEFAULT_CLAIM_COOLDOWN_SECS)?,
            verify_expiry: duration_from_env("VERIFY_EXPIRY_SECS", DEFAULT_VERIFY_EXPIRY_SECS)?,
            close_flow_expiry: duration_from_env(
                "CLOSE_FLOW_EXPIRY_SECS",
                DEFAULT_CLOSE_FLOW_EXPIRY_SECS,
            )?,
        })
    }

    /// Checks whether an actor holding the given roles is staff.
    ///
    /// This is the single privilege check consumed by the claim coordinator and
    /// close workflow; there is deliberately no other role inspection anywhere.
    pub fn is_staff(&self, role_ids: &[u64]) -> bool {
        is_staff(&self.staff_role_ids, role_ids)
    }
}

/// Returns true when any of `role_ids` is one of the configured staff roles.
pub fn is_staff(staff_role_ids: &[u64], role_ids: &[u64]) -> bool {
    role_ids.iter().any(|role| staff_role_ids.contains(role))
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn parse_required<T: std::str::FromStr>(name: &str) -> Result<T, ConfigError> {
    let value = required(name)?;
    value.parse().map_err(|_| ConfigError::InvalidEnvVar {
        name: name.to_string(),
        value,
    })
}

fn parse_optional<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnvVar {
                name: name.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}

/// Parses a comma-separated list of numeric IDs, e.g. `STAFF_ROLE_IDS=1,2,3`.
fn parse_id_list(name: &str) -> Result<Vec<u64>, ConfigError> {
    let raw = required(name)?;
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse().map_err(|_| ConfigError::InvalidEnvVar {
                name: name.to_string(),
                value: raw.clone(),
            })
        })
        .collect()
}

fn duration_from_env(name: &str, default_secs: u64) -> Result<Duration, ConfigError> {
    Ok(Duration::from_secs(
        parse_optional(name)?.unwrap_or(default_secs),
    ))
}

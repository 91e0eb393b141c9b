use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, anyhow, bail};
use dotenvy::dotenv;

use crate::model::policy::{ConflictKey, DurationPolicy, LeavePolicy};

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub data_file: PathBuf,
    pub api_prefix: String,

    // Rate limiting
    pub rate_per_min: u32,

    // Logging
    pub log_dir: String,
    pub log_level: tracing::Level,

    pub policy: LeavePolicy,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = LeavePolicy::default();
        let duration = DurationPolicy {
            standard_min_days: parse_or(
                &lookup,
                "STANDARD_MIN_DAYS",
                defaults.duration.standard_min_days,
            )?,
            standard_max_days: parse_or(
                &lookup,
                "STANDARD_MAX_DAYS",
                defaults.duration.standard_max_days,
            )?,
            long_form_min_days: parse_or(
                &lookup,
                "LONG_FORM_MIN_DAYS",
                defaults.duration.long_form_min_days,
            )?,
            long_form_max_days: parse_or(
                &lookup,
                "LONG_FORM_MAX_DAYS",
                defaults.duration.long_form_max_days,
            )?,
        };
        if duration.standard_min_days > duration.standard_max_days
            || duration.long_form_min_days > duration.long_form_max_days
        {
            bail!("minimum leave duration exceeds maximum: {duration:?}");
        }

        let api_prefix = lookup("API_PREFIX").unwrap_or_else(|| "/api".to_string());
        if !api_prefix.starts_with('/') || api_prefix.len() < 2 {
            bail!("API_PREFIX must be a non-root path like /api, got {api_prefix:?}");
        }

        Ok(Self {
            server_addr: lookup("SERVER_ADDR").unwrap_or_else(|| "127.0.0.1:3000".to_string()),
            data_file: lookup("DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("urlaube.json")),
            api_prefix,
            rate_per_min: parse_or(&lookup, "RATE_PER_MIN", 600)?,
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            log_level: parse_or(&lookup, "LOG_LEVEL", tracing::Level::DEBUG)?,
            policy: LeavePolicy {
                duration,
                require_reason: parse_or(&lookup, "REQUIRE_REASON", defaults.require_reason)?,
                conflict_key: parse_or(&lookup, "CONFLICT_KEY", ConflictKey::default())?,
            },
        })
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| format!("invalid value {raw:?} for {key}")),
        None => Ok(default),
    }
}

//! Shell configuration from environment variables

use crate::runtime::DEFAULT_LATENCY;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_GENERATOR_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the chat shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Simulated thinking time before each reply (`AGNES_LATENCY_MS`)
    pub latency: Duration,
    /// Upper bound on a generator call (`AGNES_GENERATOR_TIMEOUT_SECS`)
    pub generator_timeout: Duration,
    /// Seed the transcript with the welcome messages (`AGNES_GREETING`)
    pub greeting: bool,
    /// JSON file of recent-chat summaries (`AGNES_RECENT_CHATS`)
    pub recent_chats_path: Option<PathBuf>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            latency: DEFAULT_LATENCY,
            generator_timeout: DEFAULT_GENERATOR_TIMEOUT,
            greeting: true,
            recent_chats_path: None,
        }
    }
}

impl ChatConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unparseable values fall back to
    /// the default with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let latency = parse_or("AGNES_LATENCY_MS", &lookup)
            .map_or(defaults.latency, Duration::from_millis);
        let generator_timeout = parse_or("AGNES_GENERATOR_TIMEOUT_SECS", &lookup)
            .map_or(defaults.generator_timeout, Duration::from_secs);
        let greeting = lookup("AGNES_GREETING").map_or(defaults.greeting, |raw| {
            parse_flag(&raw).unwrap_or_else(|| {
                tracing::warn!(key = "AGNES_GREETING", value = %raw, "Invalid flag, using default");
                defaults.greeting
            })
        });
        let recent_chats_path = lookup("AGNES_RECENT_CHATS")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Self {
            latency,
            generator_timeout,
            greeting,
            recent_chats_path,
        }
    }
}

fn parse_or<T: FromStr>(key: &str, lookup: &impl Fn(&str) -> Option<String>) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Invalid value, using default");
            None
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

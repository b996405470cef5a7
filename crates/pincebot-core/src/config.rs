use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::{PincebotError, Result};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_QUIET_PERIOD_SECS: u64 = 60;
pub const DEFAULT_ASSISTANT_TIMEOUT_SECS: u64 = 40;
pub const DEFAULT_RETRIEVAL_PAGE_SIZE: u32 = 5;
pub const DOCS_BASE_URL: &str = "https://docs.firebolt.io";

// Flat variable names used by the original deployment, mapped onto config paths.
const LEGACY_ENV: &[(&str, &str)] = &[
    ("SLACK_BOT_TOKEN", "slack.bot_token"),
    ("SLACK_SIGNING_SECRET", "slack.signing_secret"),
    ("MY_BOT_ID", "slack.own_bot_id"),
    ("SUPPORT_TEAM_ID", "slack.support_team_id"),
    ("IGNORE_BOT_IDS", "bot_filter.ignore_bot_ids"),
    ("MINTLIFY_DOMAIN", "assistant.domain"),
    ("MINTLIFY_ASSISTANT_KEY", "assistant.api_key"),
];

/// Top-level config (pincebot.toml + legacy env names + PINCEBOT_* overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PincebotConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub slack: SlackConfig,
    #[serde(default)]
    pub bot_filter: BotFilterConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub aggregator: AggregatorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    /// `xoxb-` bot token used for Web API calls. Required.
    pub bot_token: Option<String>,
    /// Signing secret used to verify Events API and interactivity requests. Required.
    pub signing_secret: Option<String>,
    #[serde(default = "default_slack_api_base_url")]
    pub api_base_url: String,
    /// Bot id (`B...`) of this app, so its own posts are never re-ingested.
    pub own_bot_id: Option<String>,
    /// User group tagged when someone presses "Tag Support".
    pub support_team_id: Option<String>,
    /// Reaction name shown on the triggering message while an answer is pending.
    #[serde(default = "default_processing_reaction")]
    pub processing_reaction: String,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            signing_secret: None,
            api_base_url: default_slack_api_base_url(),
            own_bot_id: None,
            support_team_id: None,
            processing_reaction: default_processing_reaction(),
        }
    }
}

/// Which bot-originated events are dropped before aggregation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BotFilterMode {
    /// Drop only events posted by this app's own bot id.
    Own,
    /// Drop the own bot id plus every id in `ignore_bot_ids`.
    #[default]
    Listed,
    /// Drop every event that carries a bot id.
    All,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotFilterConfig {
    #[serde(default)]
    pub mode: BotFilterMode,
    /// Accepts a TOML array or a comma separated string (`IGNORE_BOT_IDS=B1,B2`).
    #[serde(default, deserialize_with = "string_or_list")]
    pub ignore_bot_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Bearer key for the assistant API. Required.
    pub api_key: Option<String>,
    #[serde(default = "default_assistant_domain")]
    pub domain: String,
    #[serde(default = "default_assistant_base_url")]
    pub base_url: String,
    #[serde(default = "default_fingerprint")]
    pub fingerprint: String,
    #[serde(default = "default_retrieval_page_size")]
    pub retrieval_page_size: u32,
    #[serde(default = "default_assistant_timeout_secs")]
    pub timeout_secs: u64,
    /// Treat short "I don't know" style answers as no answer.
    #[serde(default = "bool_true")]
    pub refusal_filter: bool,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            domain: default_assistant_domain(),
            base_url: default_assistant_base_url(),
            fingerprint: default_fingerprint(),
            retrieval_page_size: DEFAULT_RETRIEVAL_PAGE_SIZE,
            timeout_secs: DEFAULT_ASSISTANT_TIMEOUT_SECS,
            refusal_filter: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Seconds of thread inactivity before the collected question is answered.
    #[serde(default = "default_quiet_period_secs")]
    pub quiet_period_secs: u64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            quiet_period_secs: DEFAULT_QUIET_PERIOD_SECS,
        }
    }
}

fn bool_true() -> bool {
    true
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_slack_api_base_url() -> String {
    "https://slack.com/api".to_string()
}
fn default_processing_reaction() -> String {
    "eyes".to_string()
}
fn default_assistant_domain() -> String {
    "firebolt".to_string()
}
fn default_assistant_base_url() -> String {
    "https://api.mintlify.com".to_string()
}
fn default_fingerprint() -> String {
    "slack-pincebot".to_string()
}
fn default_retrieval_page_size() -> u32 {
    DEFAULT_RETRIEVAL_PAGE_SIZE
}
fn default_assistant_timeout_secs() -> u64 {
    DEFAULT_ASSISTANT_TIMEOUT_SECS
}
fn default_quiet_period_secs() -> u64 {
    DEFAULT_QUIET_PERIOD_SECS
}

fn string_or_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        One(String),
        Many(Vec<String>),
    }

    let items = match Raw::deserialize(deserializer)? {
        Raw::One(s) => s.split(',').map(str::to_string).collect(),
        Raw::Many(v) => v,
    };
    Ok(items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

impl PincebotConfig {
    /// Load config from a TOML file with env var overrides.
    ///
    /// Sources, lowest priority first:
    ///   1. Built-in defaults
    ///   2. TOML file (explicit path, else ~/.pincebot/pincebot.toml)
    ///   3. Legacy flat env names (SLACK_BOT_TOKEN, MINTLIFY_ASSISTANT_KEY, ...)
    ///   4. PINCEBOT_* env, `__` separating sections (PINCEBOT_AGGREGATOR__QUIET_PERIOD_SECS)
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);
        debug!(path = %path, "loading config");

        let config: PincebotConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(legacy_env())
            .merge(Env::prefixed("PINCEBOT_").split("__"))
            .extract()
            .map_err(|e| PincebotError::Config(e.to_string()))?;

        Ok(config)
    }

    /// Reject configs that would only fail later, mid-request.
    pub fn validate(&self) -> Result<()> {
        require(&self.slack.bot_token, "slack.bot_token")?;
        require(&self.slack.signing_secret, "slack.signing_secret")?;
        require(&self.assistant.api_key, "assistant.api_key")?;

        if self.aggregator.quiet_period_secs == 0 {
            return Err(PincebotError::Config(
                "aggregator.quiet_period_secs must be greater than zero".to_string(),
            ));
        }
        if self.assistant.timeout_secs == 0 {
            return Err(PincebotError::Config(
                "assistant.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.assistant.domain.trim().is_empty() {
            return Err(PincebotError::Config(
                "assistant.domain must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Human-readable summary with every secret masked.
    pub fn redacted_summary(&self) -> String {
        format!(
            "gateway={}:{} slack.bot_token={} slack.signing_secret={} assistant.api_key={} \
             assistant.domain={} bot_filter={:?} ignore_bot_ids={} quiet_period={}s timeout={}s",
            self.gateway.bind,
            self.gateway.port,
            mask(&self.slack.bot_token),
            mask(&self.slack.signing_secret),
            mask(&self.assistant.api_key),
            self.assistant.domain,
            self.bot_filter.mode,
            self.bot_filter.ignore_bot_ids.len(),
            self.aggregator.quiet_period_secs,
            self.assistant.timeout_secs,
        )
    }
}

fn legacy_env() -> Env {
    Env::raw().filter_map(|key| {
        LEGACY_ENV
            .iter()
            .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
            .map(|(_, path)| (*path).into())
    })
}

fn require(value: &Option<String>, key: &'static str) -> Result<()> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(PincebotError::MissingSetting { key }),
    }
}

fn mask(value: &Option<String>) -> &'static str {
    match value {
        Some(v) if !v.is_empty() => "set",
        _ => "missing",
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.pincebot/pincebot.toml", home)
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn complete_config() -> PincebotConfig {
        let mut config = PincebotConfig::default();
        config.slack.bot_token = Some("xoxb-test".into());
        config.slack.signing_secret = Some("secret".into());
        config.assistant.api_key = Some("mint-key".into());
        config
    }

    #[test]
    fn defaults_match_original_deployment() {
        let config = PincebotConfig::default();
        assert_eq!(config.aggregator.quiet_period_secs, 60);
        assert_eq!(config.assistant.timeout_secs, 40);
        assert_eq!(config.assistant.retrieval_page_size, 5);
        assert_eq!(config.assistant.domain, "firebolt");
        assert_eq!(config.slack.processing_reaction, "eyes");
        assert_eq!(config.bot_filter.mode, BotFilterMode::Listed);
    }

    #[test]
    fn validate_requires_credentials() {
        let err = PincebotConfig::default().validate().unwrap_err();
        assert!(matches!(
            err,
            PincebotError::MissingSetting {
                key: "slack.bot_token"
            }
        ));

        let mut config = complete_config();
        config.assistant.api_key = Some("  ".into());
        let err = config.validate().unwrap_err();
        assert_eq!(err.code(), "MISSING_SETTING");
        assert!(err.to_string().contains("assistant.api_key"));
    }

    #[test]
    fn validate_rejects_zero_quiet_period() {
        let mut config = complete_config();
        config.aggregator.quiet_period_secs = 0;
        assert!(config.validate().is_err());
        config.aggregator.quiet_period_secs = 5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn summary_never_contains_secrets() {
        let summary = complete_config().redacted_summary();
        assert!(!summary.contains("xoxb-test"));
        assert!(!summary.contains("mint-key"));
        assert!(summary.contains("slack.bot_token=set"));
    }

    #[test]
    fn load_merges_file_and_legacy_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "pincebot.toml",
                r#"
                [aggregator]
                quiet_period_secs = 15

                [bot_filter]
                mode = "all"
                "#,
            )?;
            jail.set_env("SLACK_BOT_TOKEN", "xoxb-from-env");
            jail.set_env("MINTLIFY_ASSISTANT_KEY", "key-from-env");
            jail.set_env("IGNORE_BOT_IDS", "BAAA, BBBB,");

            let config = PincebotConfig::load(Some("pincebot.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.aggregator.quiet_period_secs, 15);
            assert_eq!(config.bot_filter.mode, BotFilterMode::All);
            assert_eq!(config.slack.bot_token.as_deref(), Some("xoxb-from-env"));
            assert_eq!(config.assistant.api_key.as_deref(), Some("key-from-env"));
            assert_eq!(config.bot_filter.ignore_bot_ids, vec!["BAAA", "BBBB"]);
            Ok(())
        });
    }

    #[test]
    fn prefixed_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "pincebot.toml",
                r#"
                [gateway]
                port = 8080
                "#,
            )?;
            jail.set_env("PINCEBOT_GATEWAY__PORT", "9090");

            let config = PincebotConfig::load(Some("pincebot.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.gateway.port, 9090);
            assert_eq!(config.gateway.bind, DEFAULT_BIND);
            Ok(())
        });
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        Jail::expect_with(|_jail| {
            let config =
                PincebotConfig::load(Some("does-not-exist.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.gateway.port, DEFAULT_PORT);
            Ok(())
        });
    }
}

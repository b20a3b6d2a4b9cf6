//! Configuration management

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::application::errors::ConfigError;
use crate::application::messaging::Aqua;
use crate::application::services::{AccessList, AccessPolicy};
use crate::domain::traits::{MessageDelivery, NotificationBus};

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub dispatch: DispatchConfig,
    pub access: AccessConfig,
    pub adapters: AdaptersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "aqua".to_string(),
            prefix: "--".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DispatchConfig {
    pub debounce_ms: u64,
    pub send_delay_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 1000,
            send_delay_ms: 1000,
        }
    }
}

impl DispatchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn send_delay(&self) -> Duration {
        Duration::from_millis(self.send_delay_ms)
    }
}

/// A single id in a seed list; numeric ids may be written unquoted
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SeedKey {
    Number(u64),
    Text(String),
}

impl fmt::Display for SeedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedKey::Number(n) => write!(f, "{}", n),
            SeedKey::Text(s) => f.write_str(s),
        }
    }
}

/// Seed data for one access list: either a list of ids or a map of id to flag.
///
/// Map values follow loose truthiness: `false`, `0`, `""` and null disable an
/// entry, anything else enables it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SeedList {
    Keys(Vec<SeedKey>),
    Flags(BTreeMap<SeedKey, serde_yaml::Value>),
}

impl Default for SeedList {
    fn default() -> Self {
        SeedList::Keys(Vec::new())
    }
}

impl SeedList {
    /// Ids to insert; falsy map entries are skipped
    pub fn keys(&self) -> Vec<String> {
        match self {
            SeedList::Keys(keys) => keys.iter().map(SeedKey::to_string).collect(),
            SeedList::Flags(flags) => flags
                .iter()
                .filter(|(_, flag)| is_truthy(flag))
                .map(|(key, _)| key.to_string())
                .collect(),
        }
    }
}

fn is_truthy(value: &serde_yaml::Value) -> bool {
    use serde_yaml::Value;

    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(_) | Value::Mapping(_) => true,
        Value::Tagged(tagged) => is_truthy(&tagged.value),
    }
}

/// Seed data for the access policy
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AccessConfig {
    pub allow: SeedList,
    pub block: SeedList,
    pub safe: SeedList,
    pub guild_blacklist: SeedList,
}

impl AccessConfig {
    pub fn seed(&self, list: AccessList) -> &SeedList {
        match list {
            AccessList::Allow => &self.allow,
            AccessList::Block => &self.block,
            AccessList::Safe => &self.safe,
            AccessList::GuildBlacklist => &self.guild_blacklist,
        }
    }

    /// Every enabled `(list, id)` pair across the four lists
    pub fn seeds(&self) -> Vec<(AccessList, String)> {
        AccessList::ALL
            .into_iter()
            .flat_map(|list| self.seed(list).keys().into_iter().map(move |key| (list, key)))
            .collect()
    }

    pub fn policy(&self) -> AccessPolicy {
        AccessPolicy::from_seeds(self.seeds())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AdaptersConfig {
    pub discord: Option<DiscordConfig>,
    pub console: Option<ConsoleConfig>,
}

impl Default for AdaptersConfig {
    fn default() -> Self {
        Self {
            discord: Some(DiscordConfig {
                enabled: false,
                token: None,
            }),
            console: Some(ConsoleConfig { enabled: true }),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DiscordConfig {
    pub enabled: bool,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    pub enabled: bool,
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config =
            serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.prefix.is_empty() {
            return Err(ConfigError::InvalidValue("bot.prefix must not be empty".to_string()));
        }
        if let Some(discord) = &self.adapters.discord {
            if discord.enabled && discord.token.as_deref().map_or(true, str::is_empty) {
                return Err(ConfigError::InvalidValue(
                    "adapters.discord.token is required when discord is enabled".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Build a dispatcher with a seeded access policy and configured timings
    pub fn dispatcher(
        &self,
        bus: Arc<dyn NotificationBus>,
        delivery: Arc<dyn MessageDelivery>,
    ) -> Aqua {
        Aqua::new(bus, delivery, self.access.policy())
            .with_debounce(self.dispatch.debounce())
            .with_send_delay(self.dispatch.send_delay())
    }

    /// Discord token when the Discord adapter is enabled
    pub fn discord_token(&self) -> Option<&str> {
        self.adapters
            .discord
            .as_ref()
            .filter(|d| d.enabled)
            .and_then(|d| d.token.as_deref())
    }

    pub fn load_env() -> Self {
        // Load from environment variables
        let mut config = Config::default();

        if let Ok(token) = std::env::var("AQUA_TOKEN") {
            config.adapters.discord = Some(DiscordConfig {
                enabled: true,
                token: Some(token),
            });
        }

        if let Ok(prefix) = std::env::var("AQUA_PREFIX") {
            if !prefix.is_empty() {
                config.bot.prefix = prefix;
            }
        }

        config
    }
}

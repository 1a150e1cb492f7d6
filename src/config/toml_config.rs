use crate::adapters::identity::{DEFAULT_IDENTITY_BASE_URL, DEFAULT_IDENTITY_TIMEOUT};
use crate::core::issuance::{IssuancePolicy, DEFAULT_MAX_CARDS_PER_CUSTOMER};
use crate::core::suffix::{SuffixPolicy, DEFAULT_REQUIRED_SUFFIX};
use crate::utils::error::{CardError, Result};
use crate::utils::validation::{validate_path, validate_range, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern compiles"));

/// Service configuration. Every section is optional; missing values fall
/// back to the deployed defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub identity: IdentityConfig,
    pub policy: PolicyConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_IDENTITY_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_IDENTITY_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub required_suffix: String,
    pub max_cards_per_customer: usize,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            required_suffix: DEFAULT_REQUIRED_SUFFIX.to_string(),
            max_cards_per_customer: DEFAULT_MAX_CARDS_PER_CUSTOMER,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    File,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            path: "./data/cards.json".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CardError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CardError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown names are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn identity_timeout(&self) -> Duration {
        Duration::from_secs(self.identity.timeout_seconds)
    }

    pub fn issuance_policy(&self) -> IssuancePolicy {
        IssuancePolicy {
            suffix: SuffixPolicy::new(self.policy.required_suffix.clone()),
            max_cards_per_customer: self.policy.max_cards_per_customer,
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("identity.base_url", &self.identity.base_url)?;
        validate_range("identity.timeout_seconds", self.identity.timeout_seconds, 1, 120)?;

        let suffix = &self.policy.required_suffix;
        if suffix.is_empty() || suffix.len() > 16 || !suffix.chars().all(|c| c.is_ascii_digit()) {
            return Err(CardError::InvalidConfigValueError {
                field: "policy.required_suffix".to_string(),
                value: suffix.clone(),
                reason: "Suffix must be 1 to 16 digits".to_string(),
            });
        }

        if self.policy.max_cards_per_customer == 0 {
            return Err(CardError::InvalidConfigValueError {
                field: "policy.max_cards_per_customer".to_string(),
                value: "0".to_string(),
                reason: "At least one card per customer must be allowed".to_string(),
            });
        }

        if self.storage.backend == StorageBackend::File {
            validate_path("storage.path", &self.storage.path)?;
        }

        Ok(())
    }
}

use serde::Deserialize;
use std::env;

pub const DEFAULT_MODEL: &str = "claude-3-5-haiku-20241022";
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bind_addr: String,
    pub anthropic: AnthropicConfig,
    pub generation: GenerationConfig,
}

#[derive(Clone, Deserialize)]
pub struct AnthropicConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
}

// Keeps the credential out of debug logs.
impl std::fmt::Debug for AnthropicConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// When false, upstream service errors become 500 responses instead of
    /// canned content. Parse errors always fall back.
    pub fallback_on_upstream_error: bool,
    pub default_grade: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8081".to_string(),
            anthropic: AnthropicConfig {
                api_key: None,
                base_url: DEFAULT_BASE_URL.to_string(),
                model: DEFAULT_MODEL.to_string(),
                max_tokens: 1000,
                temperature: 0.7,
                timeout_secs: 30,
            },
            generation: GenerationConfig {
                fallback_on_upstream_error: true,
                default_grade: 2,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            // Override with environment variables (prefix: APP_)
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Self::from_settings(&settings)
    }

    fn from_settings(settings: &config::Config) -> Result<Self, config::ConfigError> {
        let defaults = Config::default();

        let bind_addr = lookup(settings, "server.bind_addr", "BIND_ADDR")
            .unwrap_or(defaults.bind_addr);

        let api_key = lookup(settings, "anthropic.api_key", "ANTHROPIC_API_KEY")
            .filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!("ANTHROPIC_API_KEY is not set; every request will use fallback content");
        }

        let base_url = lookup(settings, "anthropic.base_url", "ANTHROPIC_BASE_URL")
            .unwrap_or(defaults.anthropic.base_url)
            .trim_end_matches('/')
            .to_string();

        let model = lookup(settings, "anthropic.model", "ANTHROPIC_MODEL")
            .unwrap_or(defaults.anthropic.model);

        let max_tokens = parse_or(
            settings,
            "anthropic.max_tokens",
            "ANTHROPIC_MAX_TOKENS",
            defaults.anthropic.max_tokens,
        )?;

        let temperature = parse_or(
            settings,
            "anthropic.temperature",
            "ANTHROPIC_TEMPERATURE",
            defaults.anthropic.temperature,
        )?;

        let timeout_secs = parse_or(
            settings,
            "anthropic.timeout_secs",
            "ANTHROPIC_TIMEOUT_SECS",
            defaults.anthropic.timeout_secs,
        )?;

        let fallback_on_upstream_error = parse_or(
            settings,
            "generation.fallback_on_upstream_error",
            "FALLBACK_ON_UPSTREAM_ERROR",
            defaults.generation.fallback_on_upstream_error,
        )?;

        let default_grade = parse_or(
            settings,
            "generation.default_grade",
            "DEFAULT_GRADE",
            defaults.generation.default_grade,
        )?;

        Ok(Config {
            bind_addr,
            anthropic: AnthropicConfig {
                api_key,
                base_url,
                model,
                max_tokens,
                temperature,
                timeout_secs,
            },
            generation: GenerationConfig {
                fallback_on_upstream_error,
                default_grade,
            },
        })
    }
}

/// Layered lookup: settings key first, then the plain environment variable.
fn lookup(settings: &config::Config, key: &str, env_var: &str) -> Option<String> {
    settings
        .get_string(key)
        .or_else(|_| env::var(env_var))
        .ok()
}

fn parse_or<T>(
    settings: &config::Config,
    key: &str,
    env_var: &str,
    default: T,
) -> Result<T, config::ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(settings, key, env_var) {
        Some(raw) => raw.trim().parse::<T>().map_err(|e| {
            config::ConfigError::Message(format!("Invalid value for {}: {} ({})", key, raw, e))
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 6] = [
        "ANTHROPIC_API_KEY",
        "ANTHROPIC_MODEL",
        "ANTHROPIC_MAX_TOKENS",
        "ANTHROPIC_BASE_URL",
        "FALLBACK_ON_UPSTREAM_ERROR",
        "DEFAULT_GRADE",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn empty_settings() -> config::Config {
        config::Config::builder().build().unwrap()
    }

    #[test]
    #[serial]
    fn defaults_apply_when_nothing_is_set() {
        clear_env();
        let config = Config::from_settings(&empty_settings()).unwrap();

        assert!(config.anthropic.api_key.is_none());
        assert_eq!(config.anthropic.model, DEFAULT_MODEL);
        assert_eq!(config.anthropic.max_tokens, 1000);
        assert!(config.generation.fallback_on_upstream_error);
        assert_eq!(config.generation.default_grade, 2);
    }

    #[test]
    #[serial]
    fn environment_variables_override_defaults() {
        clear_env();
        env::set_var("ANTHROPIC_API_KEY", "sk-test");
        env::set_var("ANTHROPIC_MAX_TOKENS", "256");
        env::set_var("ANTHROPIC_BASE_URL", "http://localhost:9999/");
        env::set_var("FALLBACK_ON_UPSTREAM_ERROR", "false");

        let config = Config::from_settings(&empty_settings()).unwrap();
        clear_env();

        assert_eq!(config.anthropic.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.anthropic.max_tokens, 256);
        assert_eq!(config.anthropic.base_url, "http://localhost:9999");
        assert!(!config.generation.fallback_on_upstream_error);
    }

    #[test]
    #[serial]
    fn blank_api_key_is_treated_as_missing() {
        clear_env();
        env::set_var("ANTHROPIC_API_KEY", "   ");
        let config = Config::from_settings(&empty_settings()).unwrap();
        clear_env();

        assert!(config.anthropic.api_key.is_none());
    }

    #[test]
    #[serial]
    fn malformed_number_is_a_config_error() {
        clear_env();
        env::set_var("DEFAULT_GRADE", "second");
        let result = Config::from_settings(&empty_settings());
        clear_env();

        assert!(result.is_err());
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let mut config = Config::default();
        config.anthropic.api_key = Some("sk-secret".to_string());
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}

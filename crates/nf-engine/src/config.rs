//! Configuration for a game session and its narrative oracle.

/// Default chat-completions endpoint (a local OpenAI-compatible server).
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default model requested from the chat endpoint.
pub const DEFAULT_MODEL: &str = "llama3.1";

/// Configuration for a game session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// RNG seed for the scripted oracle.
    pub seed: u64,
    /// Maximum number of earlier snapshots kept for undo.
    pub history_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            history_limit: 50,
        }
    }
}

impl SessionConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set how many snapshots are kept for undo.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }
}

/// Connection settings for the chat-completions oracle.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// Base URL, without the `/v1/chat/completions` suffix.
    pub base_url: String,
    /// Model name.
    pub model: String,
    /// Bearer token, if the endpoint requires one.
    pub api_key: Option<String>,
    /// Sampling temperature for action outcomes.
    pub temperature: f32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            temperature: 0.85,
            timeout_secs: 120,
        }
    }
}

impl OracleConfig {
    /// Read `NIGHTFALL_BASE_URL`, `NIGHTFALL_MODEL` and `NIGHTFALL_API_KEY`,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self {
            api_key: lookup("NIGHTFALL_API_KEY"),
            ..Self::default()
        };
        if let Some(url) = lookup("NIGHTFALL_BASE_URL") {
            config = config.with_base_url(url);
        }
        if let Some(model) = lookup("NIGHTFALL_MODEL") {
            config = config.with_model(model);
        }
        config
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature (clamped to 0.0-2.0).
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_values_are_normalized() {
        let cfg = OracleConfig::from_lookup(|key| match key {
            "NIGHTFALL_BASE_URL" => Some("http://localhost:8080/".to_string()),
            "NIGHTFALL_MODEL" => Some("mistral".to_string()),
            _ => None,
        });
        assert_eq!(cfg.base_url, "http://localhost:8080");
        assert_eq!(cfg.model, "mistral");
        assert!(cfg.api_key.is_none());

        let unset = OracleConfig::from_lookup(|_| None);
        assert_eq!(unset.base_url, DEFAULT_BASE_URL);
        assert_eq!(unset.model, DEFAULT_MODEL);
    }

    #[test]
    fn default_config() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.history_limit, 50);
    }

    #[test]
    fn builder_methods() {
        let cfg = SessionConfig::default().with_seed(7).with_history_limit(3);
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.history_limit, 3);
    }

    #[test]
    fn oracle_builder_trims_and_clamps() {
        let cfg = OracleConfig::default()
            .with_base_url("http://example.test/")
            .with_model("m")
            .with_temperature(9.0);
        assert_eq!(cfg.base_url, "http://example.test");
        assert_eq!(cfg.model, "m");
        assert!((cfg.temperature - 2.0).abs() < f32::EPSILON);
    }
}

use std::env;
use tracing::{info, warn};

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_AI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_AI_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Supabase,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Memory => "memory",
            StoreBackend::Supabase => "supabase",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiClientConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

/// Optional AI completion service, decided once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiCapability {
    Enabled(AiClientConfig),
    Disabled,
}

impl AiCapability {
    pub fn from_api_key(api_key: Option<String>, model: Option<String>) -> Self {
        match api_key.map(|key| key.trim().to_string()) {
            Some(key) if !key.is_empty() => AiCapability::Enabled(AiClientConfig {
                api_key: key,
                model: model.unwrap_or_else(|| DEFAULT_AI_MODEL.to_string()),
                base_url: DEFAULT_AI_BASE_URL.to_string(),
            }),
            _ => AiCapability::Disabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, AiCapability::Enabled(_))
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub frontend_url: Option<String>,
    pub store_backend: StoreBackend,
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub ai: AiCapability,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let supabase_url = env::var("SUPABASE_URL").unwrap_or_else(|_| {
            warn!("SUPABASE_URL not set, using empty value");
            String::new()
        });

        let supabase_service_key = env::var("SUPABASE_SERVICE_KEY").unwrap_or_else(|_| {
            warn!("SUPABASE_SERVICE_KEY not set, using empty value");
            String::new()
        });

        let store_backend = match env::var("STORE_BACKEND").ok().as_deref() {
            Some("memory") => StoreBackend::Memory,
            Some("supabase") => StoreBackend::Supabase,
            Some(other) => {
                warn!("Unknown STORE_BACKEND '{}', falling back to default", other);
                Self::default_backend(&supabase_url)
            }
            None => Self::default_backend(&supabase_url),
        };

        let port = env::var("PORT")
            .ok()
            .and_then(|value| match value.parse::<u16>() {
                Ok(port) => Some(port),
                Err(_) => {
                    warn!("Invalid PORT '{}', using {}", value, DEFAULT_PORT);
                    None
                }
            })
            .unwrap_or(DEFAULT_PORT);

        let ai = AiCapability::from_api_key(
            env::var("OPENAI_API_KEY").ok(),
            env::var("OPENAI_MODEL").ok(),
        );
        if !ai.is_enabled() {
            warn!("OPENAI_API_KEY is missing. AI features will be disabled.");
        }

        let config = Self {
            port,
            frontend_url: env::var("FRONTEND_URL").ok().filter(|url| !url.is_empty()),
            store_backend,
            supabase_url,
            supabase_service_key,
            ai,
        };

        if config.store_backend == StoreBackend::Supabase && !config.is_supabase_configured() {
            warn!("Supabase store selected but not fully configured - missing environment variables");
        }

        config
    }

    fn default_backend(supabase_url: &str) -> StoreBackend {
        if supabase_url.is_empty() {
            info!("No SUPABASE_URL configured, using in-memory store");
            StoreBackend::Memory
        } else {
            StoreBackend::Supabase
        }
    }

    pub fn is_supabase_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_service_key.is_empty()
    }

    /// Configuration for tests and local runs backed by the in-memory store.
    pub fn in_memory() -> Self {
        Self {
            port: DEFAULT_PORT,
            frontend_url: None,
            store_backend: StoreBackend::Memory,
            supabase_url: String::new(),
            supabase_service_key: String::new(),
            ai: AiCapability::Disabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_api_key_disables_ai() {
        assert_eq!(AiCapability::from_api_key(Some("  ".into()), None), AiCapability::Disabled);
        assert_eq!(AiCapability::from_api_key(None, None), AiCapability::Disabled);
    }

    #[test]
    fn api_key_enables_ai_with_default_model() {
        let capability = AiCapability::from_api_key(Some("sk-test".into()), None);
        match capability {
            AiCapability::Enabled(client) => {
                assert_eq!(client.api_key, "sk-test");
                assert_eq!(client.model, DEFAULT_AI_MODEL);
            }
            AiCapability::Disabled => panic!("expected AI to be enabled"),
        }
    }

    #[test]
    fn in_memory_config_needs_no_supabase() {
        let config = AppConfig::in_memory();
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert!(!config.is_supabase_configured());
        assert!(!config.ai.is_enabled());
    }
}

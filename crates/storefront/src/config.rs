use tracing::info;

const DEFAULT_API_HOST: &str = "api-tair";
const API_PORT: u16 = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// e.g. `http://api-tair:5000`
    pub api_base_url: String,
}

impl StorefrontConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("API_HOST").unwrap_or_else(|| {
            info!("API_HOST not set, using default: {DEFAULT_API_HOST}");
            DEFAULT_API_HOST.to_string()
        });

        Self {
            api_base_url: format!("http://{host}:{API_PORT}"),
        }
    }
}

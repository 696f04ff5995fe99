use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL connection URL for the collection. Without it the collection
    /// lives in memory.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Redis connection URL for the recommendation cache. Without it the cache
    /// lives in memory.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Jikan API base URL
    #[serde(default = "default_jikan_api_url")]
    pub jikan_api_url: String,

    /// TMDB API key; TMDB candidates are skipped when unset
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Language for TMDB titles and overviews
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Maximum number of recommendations per cycle
    #[serde(default = "default_recommendation_limit")]
    pub recommendation_limit: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_jikan_api_url() -> String {
    "https://api.jikan.moe/v4".to_string()
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_language() -> String {
    "en-US".to_string()
}

fn default_recommendation_limit() -> usize {
    crate::services::recommendations::DEFAULT_LIMIT
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_environment() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();

        assert_eq!(config.database_url, None);
        assert_eq!(config.redis_url, None);
        assert_eq!(config.tmdb_api_key, None);
        assert_eq!(config.jikan_api_url, "https://api.jikan.moe/v4");
        assert_eq!(config.recommendation_limit, 6);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_overrides() {
        let vars = vec![
            ("TMDB_API_KEY".to_string(), "secret".to_string()),
            ("RECOMMENDATION_LIMIT".to_string(), "10".to_string()),
            ("PORT".to_string(), "8080".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.tmdb_api_key.as_deref(), Some("secret"));
        assert_eq!(config.recommendation_limit, 10);
        assert_eq!(config.port, 8080);
    }
}

use std::env;

pub const DEFAULT_API_URL: &str = "http://localhost:5001/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    /// Owner sent with list/tag requests; `None` addresses shared records only.
    pub user_id: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            user_id: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = ClientConfig::default();

        if let Ok(url) = env::var("TASKMANAGER_API_URL") {
            let url = url.trim().trim_end_matches('/');
            if !url.is_empty() {
                config.api_url = url.to_string();
            }
        }

        config.user_id = env::var("TASKMANAGER_USER_ID")
            .ok()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_local_api() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url, "http://localhost:5001/api");
        assert!(config.user_id.is_none());
    }
}

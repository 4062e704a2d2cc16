use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_LISTS: [&str; 5] = ["Personal", "Work", "Shopping", "Health", "Travel"];
pub const DEFAULT_TAGS: [&str; 5] = [
    "Important",
    "Low Priority",
    "In Progress",
    "Blocked",
    "Planning",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub cors_allow_origin: String,

    // Startup seeding
    pub seed_default_data: bool,
    pub default_lists: Vec<String>,
    pub default_tags: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            database_url: "sqlite://taskmanager.db?mode=rwc".to_string(),
            cors_allow_origin: "*".to_string(),

            seed_default_data: true,
            default_lists: DEFAULT_LISTS.iter().map(|s| s.to_string()).collect(),
            default_tags: DEFAULT_TAGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let mut config = Config::default();

        if let Ok(host) = env::var("HOST") {
            config.host = host;
        }

        if let Ok(port) = env::var("PORT") {
            config.port = port.parse().map_err(|e| format!("Invalid PORT: {}", e))?;
        }

        if let Ok(database_url) = env::var("DATABASE_URL") {
            config.database_url = database_url;
        }

        if let Ok(origin) = env::var("CORS_ALLOW_ORIGIN") {
            config.cors_allow_origin = origin;
        }

        if let Ok(seed) = env::var("SEED_DEFAULT_DATA") {
            config.seed_default_data = seed
                .parse()
                .map_err(|e| format!("Invalid SEED_DEFAULT_DATA: {}", e))?;
        }

        if let Ok(lists) = env::var("DEFAULT_LISTS") {
            config.default_lists = split_names(&lists);
        }

        if let Ok(tags) = env::var("DEFAULT_TAGS") {
            config.default_tags = split_names(&tags);
        }

        Ok(config)
    }
}

/// Comma-separated names, trimmed, blanks dropped.
fn split_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_seeded_names() {
        let config = Config::default();
        assert_eq!(config.port, 5001);
        assert_eq!(config.default_lists.len(), 5);
        assert_eq!(config.default_tags[1], "Low Priority");
        assert!(config.seed_default_data);
    }

    #[test]
    fn test_split_names_drops_blanks() {
        assert_eq!(
            split_names(" Home , ,Errands,"),
            vec!["Home".to_string(), "Errands".to_string()]
        );
        assert!(split_names("").is_empty());
    }
}

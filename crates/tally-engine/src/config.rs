//! # Engine Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TALLY_DB_PATH=/srv/tally/tally.db                                  │
//! │     TALLY_DB_MAX_CONNECTIONS=5                                         │
//! │     TALLY_TIME_ZONE=Europe/Dublin                                      │
//! │     TALLY_SYSTEM_ACTOR_ID=1                                            │
//! │     TALLY_SYSTEM_ACTOR_NAME=system                                     │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/tally/tally.toml (Linux)                                 │
//! │     ~/Library/Application Support/com.tally.tally/tally.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "/srv/tally/tally.db"
//! max_connections = 5
//!
//! [locale]
//! time_zone = "Europe/Dublin"
//!
//! [actor]
//! system_id = 1
//! system_name = "system"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use tally_core::actor::{SYSTEM_ACTOR_ID, SYSTEM_ACTOR_NAME};
use tally_core::clock::{parse_time_zone, Tz};
use tally_core::Actor;
use tally_db::DbConfig;

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file. Created on first start.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> PathBuf {
    directories::ProjectDirs::from("com", "tally", "tally")
        .map(|dirs| dirs.data_dir().join("tally.db"))
        .unwrap_or_else(|| PathBuf::from("tally.db"))
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocaleSettings {
    /// IANA zone the tills run in. Business dates, hourly buckets and
    /// time-of-day filters use it.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

impl Default for LocaleSettings {
    fn default() -> Self {
        LocaleSettings {
            time_zone: default_time_zone(),
        }
    }
}

/// Identity recorded when a write arrives with no user attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorSettings {
    #[serde(default = "default_system_id")]
    pub system_id: i64,

    #[serde(default = "default_system_name")]
    pub system_name: String,
}

fn default_system_id() -> i64 {
    SYSTEM_ACTOR_ID
}

fn default_system_name() -> String {
    SYSTEM_ACTOR_NAME.to_string()
}

impl Default for ActorSettings {
    fn default() -> Self {
        ActorSettings {
            system_id: default_system_id(),
            system_name: default_system_name(),
        }
    }
}

// =============================================================================
// Engine Config
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub locale: LocaleSettings,

    #[serde(default)]
    pub actor: ActorSettings,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (tally.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> EngineResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading engine config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load engine config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> EngineResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| EngineError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Engine config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> EngineResult<()> {
        if self.database.path.as_os_str().is_empty() {
            return Err(EngineError::InvalidConfig("database.path must not be empty".into()));
        }

        if self.database.max_connections == 0 {
            return Err(EngineError::InvalidConfig(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        self.time_zone()?;

        if self.actor.system_name.trim().is_empty() {
            return Err(EngineError::InvalidConfig(
                "actor.system_name must not be empty".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("TALLY_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Ok(max) = std::env::var("TALLY_DB_MAX_CONNECTIONS") {
            match max.parse::<u32>() {
                Ok(n) => self.database.max_connections = n,
                Err(_) => warn!(value = %max, "Ignoring non-numeric TALLY_DB_MAX_CONNECTIONS"),
            }
        }

        if let Ok(zone) = std::env::var("TALLY_TIME_ZONE") {
            debug!(zone = %zone, "Overriding time zone from environment");
            self.locale.time_zone = zone;
        }

        if let Ok(id) = std::env::var("TALLY_SYSTEM_ACTOR_ID") {
            match id.parse::<i64>() {
                Ok(id) => self.actor.system_id = id,
                Err(_) => warn!(value = %id, "Ignoring non-numeric TALLY_SYSTEM_ACTOR_ID"),
            }
        }

        if let Ok(name) = std::env::var("TALLY_SYSTEM_ACTOR_NAME") {
            self.actor.system_name = name;
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tally", "tally")
            .map(|dirs| dirs.config_dir().join("tally.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// The configured till time zone.
    pub fn time_zone(&self) -> EngineResult<Tz> {
        Ok(parse_time_zone(&self.locale.time_zone)?)
    }

    /// The fallback actor for writes with no user attached.
    pub fn system_actor(&self) -> Actor {
        Actor::new(self.actor.system_id, self.actor.system_name.clone())
    }

    /// Database settings as a pool configuration.
    ///
    /// Every connection to `:memory:` opens its own empty database, so an
    /// in-memory path is held to one connection.
    pub fn db_config(&self) -> DbConfig {
        let db = DbConfig::new(self.database.path.clone());
        if db.is_in_memory() {
            db.max_connections(1)
        } else {
            db.max_connections(self.database.max_connections)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.time_zone().unwrap(), Tz::UTC);
        assert_eq!(config.system_actor(), Actor::system());
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig::default();

        config.locale.time_zone = "Europe/Dublin".into();
        assert!(config.validate().is_ok());
        assert_eq!(config.time_zone().unwrap(), Tz::Europe__Dublin);

        for bad in ["+01:00", "Mars/Olympus", ""] {
            config.locale.time_zone = bad.into();
            assert!(config.validate().unwrap_err().is_config_error(), "{bad}");
        }

        config.locale.time_zone = "UTC".into();

        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            [locale]
            time_zone = "Europe/Dublin"
            "#,
        )
        .unwrap();
        assert_eq!(config.locale.time_zone, "Europe/Dublin");
        assert_eq!(config.actor.system_id, 1);
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_toml_serialization() {
        let config = EngineConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[database]"));
        assert!(toml_str.contains("[locale]"));
        assert!(toml_str.contains("[actor]"));
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("tally-{}.toml", uuid::Uuid::new_v4()));
        let mut config = EngineConfig::default();
        config.locale.time_zone = "Europe/Berlin".into();
        config.actor.system_name = "back-office".into();
        config.save(Some(path.clone())).unwrap();

        let loaded = EngineConfig::load(Some(path.clone())).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.time_zone().unwrap(), Tz::Europe__Berlin);
        assert_eq!(loaded.system_actor().name, "back-office");
    }

    #[test]
    fn test_db_config() {
        let mut config = EngineConfig::default();
        config.database.path = PathBuf::from("/tmp/tally.db");
        config.database.max_connections = 3;
        let db = config.db_config();
        assert_eq!(db.database_path, PathBuf::from("/tmp/tally.db"));
        assert_eq!(db.max_connections, 3);
        assert!(!db.is_in_memory());

        config.database.path = PathBuf::from(":memory:");
        let db = config.db_config();
        assert!(db.is_in_memory());
        assert_eq!(db.max_connections, 1);
    }
}

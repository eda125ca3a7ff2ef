//! Handles settings for the application. Configuration is read from an
//! optional `settings.toml` in the working directory, then overridden by
//! `SWAPPLY__SECTION__KEY` environment variables.
//!
//! ```toml
//! [app]
//! level = "debug"
//!
//! [server]
//! port = 3000
//! database = { sqlite = "./swapply.db" }
//! allowed_origins = ["http://localhost:5173"]
//!
//! [auth]
//! secret = "..."
//! ```
use config::{Config, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    pub database: Database,
    pub allowed_origins: Vec<String>,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
            database: Database::Memory,
            allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    pub secret: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Boost {
    pub duration_hours: i64,
    pub sweep_interval_secs: u64,
}

impl Default for Boost {
    fn default() -> Self {
        Self {
            duration_hours: 24,
            sweep_interval_secs: 600,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub server: Server,
    pub auth: Auth,
    #[serde(default)]
    pub boost: Boost,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(Config::builder().add_source(File::with_name("settings").required(false)))
    }

    fn load(builder: config::ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .add_source(
                Environment::with_prefix("SWAPPLY")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn parse(toml: &str) -> Result<Settings, ConfigError> {
        Settings::load(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn defaults_fill_missing_sections() {
        let settings = parse("[auth]\nsecret = \"s3cret\"\n").unwrap();
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.server.database, Database::Memory);
        assert_eq!(settings.boost.duration_hours, 24);
        assert!(settings.auth.issuer.is_none());
        assert!(settings.auth.audience.is_none());
    }

    #[test]
    fn sqlite_database_and_origins() {
        let settings = parse(
            r#"
            [server]
            port = 8080
            database = { sqlite = "./data.db" }
            allowed_origins = ["http://localhost:5173"]

            [auth]
            secret = "s3cret"
            issuer = "swapply"
            audience = "swapply-web"
            "#,
        )
        .unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(
            settings.server.database,
            Database::Sqlite("./data.db".to_string())
        );
        assert_eq!(settings.server.allowed_origins, ["http://localhost:5173"]);
        assert_eq!(settings.auth.issuer.as_deref(), Some("swapply"));
        assert_eq!(settings.auth.audience.as_deref(), Some("swapply-web"));
    }

    #[test]
    fn secret_is_required() {
        assert!(parse("[server]\nport = 3000\n").is_err());
    }
}

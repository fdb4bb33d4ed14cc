use anyhow::Result;
use chrono::NaiveDate;
use config::{Config, Environment, File, FileFormat};
use sea_orm::Database;
use serde::Deserialize;
use tracing::{debug, info};

use crate::access::AccessPolicy;
use crate::schemas::AppState;

pub const DEFAULT_CONFIG_PATH: &str = "loanledger.toml";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://loanledger.db?mode=rwc";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

/// Application settings: defaults, then the optional TOML file, then `LEDGER_*`
/// environment variables.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_address: String,
    #[serde(default)]
    pub read_only_emails: Vec<String>,
    #[serde(default)]
    pub read_write_emails: Vec<String>,
    #[serde(default)]
    pub bypass_email_verification: bool,
    /// Fixed evaluation date; the local date is used when unset
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

impl AppConfig {
    pub fn load(path: &str) -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::load_from(path, Environment::with_prefix("LEDGER"))
    }

    fn load_from(path: &str, env: Environment) -> Result<Self> {
        debug!("Loading configuration from {}", path);
        let settings = Config::builder()
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .add_source(File::new(path, FileFormat::Toml).required(false))
            .add_source(
                env.try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("read_only_emails")
                    .with_list_parse_key("read_write_emails"),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Applies command line overrides.
    pub fn with_overrides(mut self, database_url: Option<String>, bind_address: Option<String>) -> Self {
        if let Some(url) = database_url {
            self.database_url = url;
        }
        if let Some(address) = bind_address {
            self.bind_address = address;
        }
        self
    }
}

/// Connects to the database and builds the shared handler state.
pub async fn initialize_app_state(config: &AppConfig) -> Result<AppState> {
    info!("Connecting to database: {}", config.database_url);
    let db = Database::connect(&config.database_url).await?;

    if config.bypass_email_verification {
        info!("E-mail verification is disabled, every caller gets write access");
    }
    if let Some(today) = config.today {
        info!("Evaluation date pinned to {}", today);
    }

    Ok(AppState {
        db,
        access: AccessPolicy::from_config(config),
        today: config.today,
    })
}

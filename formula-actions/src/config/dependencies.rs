//! Dependency initialization and wiring for the formula actions.
use std::env;
use std::str::FromStr;

use dotenv::dotenv;
use formula_repository::postgres::check_tables_created;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use crate::actions::{FormulaActions, Repositories};
use crate::config::service::{DEFAULT_MAX_NAME_LENGTH, DEFAULT_MAX_TEXT_LENGTH};
use crate::config::FormulaActionsConfig;
use crate::errors::DependencyError;

/// Default size of the PostgreSQL connection pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub max_connections: u32,
    pub limits: FormulaActionsConfig,
}

impl Settings {
    /// Reads settings from the environment, loading a `.env` file first if present.
    ///
    /// # Environment Variables
    ///
    /// - `DATABASE_URL`: PostgreSQL connection string (required)
    /// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
    /// - `MAX_NAME_LENGTH`: limit for name-like fields (default: 255)
    /// - `MAX_TEXT_LENGTH`: limit for free-text fields (default: 20000)
    pub fn from_env() -> Result<Self, DependencyError> {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| DependencyError::MissingEnv("DATABASE_URL"))?;
        let max_connections = parse_or_default("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS);
        let limits = FormulaActionsConfig::with_limits(
            parse_or_default("MAX_NAME_LENGTH", DEFAULT_MAX_NAME_LENGTH),
            parse_or_default("MAX_TEXT_LENGTH", DEFAULT_MAX_TEXT_LENGTH),
        );

        Ok(Self {
            database_url,
            max_connections,
            limits,
        })
    }
}

fn parse_or_default<T: FromStr + Copy>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(variable = name, value = %raw, "Invalid value, using default");
            default
        }),
        Err(_) => default,
    }
}

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured actions ready to serve requests.
    pub actions: FormulaActions,
    /// Pool shared by the PostgreSQL repositories.
    pub pool: sqlx::PgPool,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(DependencyError)` - Missing configuration, connection failure or missing schema
    pub async fn new() -> Result<Self, DependencyError> {
        let settings = Settings::from_env()?;
        Self::from_settings(settings).await
    }

    /// Connects to PostgreSQL, verifies the schema and builds the actions.
    pub async fn from_settings(settings: Settings) -> Result<Self, DependencyError> {
        info!(
            max_connections = settings.max_connections,
            max_name_length = settings.limits.max_name_length,
            max_text_length = settings.limits.max_text_length,
            "Initializing dependencies"
        );

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect(&settings.database_url)
            .await?;

        if !check_tables_created(&pool).await? {
            return Err(DependencyError::SchemaMissing);
        }

        let actions =
            FormulaActions::with_config(Repositories::postgres(pool.clone()), settings.limits);
        info!("Dependencies initialized successfully");

        Ok(Self { actions, pool })
    }
}

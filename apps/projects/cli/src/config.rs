use core_config::FromEnv;
use database::postgres::PostgresConfig;

pub use core_config::Environment;

/// Application configuration, composed from the shared config components
#[derive(Clone, Debug)]
pub struct Config {
    pub database: PostgresConfig,
    pub environment: Environment,
}

/// Command-line overrides for the connection target
#[derive(Debug, Default, Clone, clap::Args)]
pub struct ConnectionArgs {
    /// Database host (overrides DB_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Database port (overrides DB_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Database name (overrides DB_NAME)
    #[arg(long)]
    pub schema: Option<String>,

    /// Database user (overrides DB_USER)
    #[arg(long)]
    pub user: Option<String>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            database: PostgresConfig::from_env()?,
            environment: Environment::from_env(),
        })
    }

    /// Apply command-line overrides on top of the environment
    pub fn with_overrides(mut self, args: ConnectionArgs) -> Self {
        if let Some(host) = args.host {
            self.database.host = host;
        }
        if let Some(port) = args.port {
            self.database.port = port;
        }
        if let Some(schema) = args.schema {
            self.database.schema = schema;
        }
        if let Some(user) = args.user {
            self.database.user = user;
        }
        self
    }
}

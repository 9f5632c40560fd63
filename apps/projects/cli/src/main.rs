//! Projects CLI
//!
//! Interactive console for creating, listing, selecting, updating and
//! deleting DIY project records stored in PostgreSQL.

use clap::Parser;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::PgConnectionProvider;
use domain_projects::{PgProjectRepository, ProjectService};
use eyre::Result;
use tracing::info;

mod config;
mod input;
mod menu;

use config::{Config, ConnectionArgs};
use menu::ProjectsMenu;

#[derive(Parser)]
#[command(name = "projects")]
#[command(about = "Manage DIY project records from an interactive menu")]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let cli = Cli::parse();
    let config = Config::from_env()?.with_overrides(cli.connection);
    init_tracing(&config.environment, "warn");

    info!(endpoint = %config.database.endpoint(), "Starting projects menu");

    // Connections are opened per operation, so an unreachable database only
    // surfaces once a selection needs it
    let provider = PgConnectionProvider::new(config.database);
    let service = ProjectService::new(PgProjectRepository::new(provider));

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    ProjectsMenu::new(service, stdin.lock(), stdout.lock())
        .run()
        .await?;

    Ok(())
}

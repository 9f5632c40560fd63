//! Projects Domain
//!
//! Persistence and service layer for hobby/DIY project records.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  ← NotFound classification, re-fetch after update
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← One transaction per operation (trait + implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Connection  │  ← database::postgres::ConnectionProvider, one connection per call
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use database::postgres::{PgConnectionProvider, PostgresConfig};
//! use domain_projects::{PgProjectRepository, Project, ProjectService};
//!
//! # async fn example() -> Result<(), domain_projects::ProjectError> {
//! let provider = PgConnectionProvider::new(PostgresConfig::default());
//! let service = ProjectService::new(PgProjectRepository::new(provider));
//!
//! let project = service.create_project(Project::new("Build deck")).await?;
//! let fetched = service.get_project(project.project_id.unwrap_or_default()).await?;
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{ProjectError, ProjectResult};
pub use models::{Project, UpdateProject};
pub use postgres::PgProjectRepository;
pub use repository::{InMemoryProjectRepository, ProjectRepository};
pub use service::ProjectService;

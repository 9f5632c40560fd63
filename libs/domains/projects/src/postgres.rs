use async_trait::async_trait;
use database::postgres::{classify_db_err, ConnectionProvider, PgConnectionProvider};
use database::StatementKind;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, QueryFilter,
    QueryOrder, TransactionError, TransactionTrait,
};
use std::future::Future;
use std::pin::Pin;

use crate::{
    entity,
    error::ProjectResult,
    models::Project,
    repository::{require_id, require_unsaved, ProjectRepository},
};

type TxnFuture<'c, T> = Pin<Box<dyn Future<Output = Result<T, DbErr>> + Send + 'c>>;

/// PostgreSQL-backed project repository
///
/// Opens a fresh connection for every operation, runs the statement inside one
/// transaction and closes the connection before returning.
pub struct PgProjectRepository<P = PgConnectionProvider> {
    provider: P,
}

impl<P: ConnectionProvider> PgProjectRepository<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// acquire → begin → work → commit (rollback on error) → release
    async fn run<T, F>(&self, operation: &'static str, kind: StatementKind, work: F) -> ProjectResult<T>
    where
        T: Send,
        F: for<'c> FnOnce(&'c DatabaseTransaction) -> TxnFuture<'c, T> + Send,
    {
        let db = self.provider.acquire().await?;
        let result = db.transaction::<_, T, DbErr>(work).await;
        self.provider.release(db).await;

        result.map_err(|e| {
            let err = match e {
                TransactionError::Connection(err) | TransactionError::Transaction(err) => err,
            };
            tracing::error!(operation, error = %err, "Statement failed, transaction rolled back");
            classify_db_err(err, kind, &self.provider.endpoint()).into()
        })
    }
}

#[async_trait]
impl<P: ConnectionProvider> ProjectRepository for PgProjectRepository<P> {
    async fn insert(&self, project: Project) -> ProjectResult<Project> {
        require_unsaved(&project)?;

        let active_model: entity::ActiveModel = project.into();
        let model = self
            .run("insert", StatementKind::Write, move |txn| {
                Box::pin(async move { active_model.insert(txn).await })
            })
            .await?;

        // The RETURNING row, so values come back as the columns stored them
        tracing::info!(project_id = model.project_id, "Created project");
        Ok(model.into())
    }

    async fn fetch_all(&self) -> ProjectResult<Vec<Project>> {
        let models = self
            .run("fetch_all", StatementKind::Read, |txn| {
                Box::pin(async move {
                    entity::Entity::find()
                        .order_by_asc(entity::Column::ProjectId)
                        .all(txn)
                        .await
                })
            })
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn fetch_by_id(&self, id: i32) -> ProjectResult<Option<Project>> {
        let model = self
            .run("fetch_by_id", StatementKind::Read, move |txn| {
                Box::pin(async move { entity::Entity::find_by_id(id).one(txn).await })
            })
            .await?;

        Ok(model.map(|m| m.into()))
    }

    async fn update(&self, project: Project) -> ProjectResult<u64> {
        let id = require_id(&project)?;

        let active_model: entity::ActiveModel = project.into();
        let rows_affected = self
            .run("update", StatementKind::Write, move |txn| {
                Box::pin(async move {
                    entity::Entity::update_many()
                        .set(active_model)
                        .filter(entity::Column::ProjectId.eq(id))
                        .exec(txn)
                        .await
                        .map(|res| res.rows_affected)
                })
            })
            .await?;

        if rows_affected > 0 {
            tracing::info!(project_id = id, "Updated project");
        }
        Ok(rows_affected)
    }

    async fn delete(&self, id: i32) -> ProjectResult<u64> {
        let rows_affected = self
            .run("delete", StatementKind::Write, move |txn| {
                Box::pin(async move {
                    entity::Entity::delete_by_id(id)
                        .exec(txn)
                        .await
                        .map(|res| res.rows_affected)
                })
            })
            .await?;

        if rows_affected > 0 {
            tracing::info!(project_id = id, "Deleted project");
        }
        Ok(rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProjectError;
    use database::postgres::PostgresConfig;
    use database::{StorageError, StorageResult};
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, RuntimeErr};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Hands out one scripted mock connection per acquire and counts releases
    struct ScriptedProvider {
        script: Box<dyn Fn() -> MockDatabase + Send + Sync>,
        acquired: Arc<AtomicUsize>,
        released: Arc<AtomicUsize>,
    }

    impl ScriptedProvider {
        fn new(script: impl Fn() -> MockDatabase + Send + Sync + 'static) -> Self {
            Self {
                script: Box::new(script),
                acquired: Arc::new(AtomicUsize::new(0)),
                released: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl ConnectionProvider for ScriptedProvider {
        async fn acquire(&self) -> StorageResult<DatabaseConnection> {
            self.acquired.fetch_add(1, Ordering::SeqCst);
            Ok((self.script)().into_connection())
        }

        async fn release(&self, _db: DatabaseConnection) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }

        fn endpoint(&self) -> String {
            "mock:0/projects".to_string()
        }
    }

    fn row(id: i32, name: &str) -> entity::Model {
        entity::Model {
            project_id: id,
            project_name: name.to_string(),
            estimated_hours: Some(Decimal::new(1200, 2)),
            actual_hours: None,
            difficulty: Some(3),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_fetch_all_maps_rows() {
        let provider = ScriptedProvider::new(|| {
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![row(1, "Build deck"), row(2, "Paint fence")]])
        });
        let repo = PgProjectRepository::new(provider);

        let projects = repo.fetch_all().await.unwrap();

        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].project_id, Some(1));
        assert_eq!(projects[1].project_name, "Paint fence");
        assert_eq!(repo.provider.released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_insert_returns_row_as_stored() {
        // NUMERIC(7,2) rounds 1.005 to 1.01; the result must match the row
        let mut stored = row(1, "Build deck");
        stored.estimated_hours = Some(Decimal::new(101, 2));
        let returned = stored.clone();
        let provider = ScriptedProvider::new(move || {
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([vec![returned.clone()]])
        });
        let repo = PgProjectRepository::new(provider);

        let input = Project::new("Build deck")
            .with_estimated_hours(Decimal::new(1005, 3))
            .with_difficulty(3);
        let created = repo.insert(input).await.unwrap();

        assert_eq!(created, Project::from(stored));
        assert_eq!(created.estimated_hours, Some(Decimal::new(101, 2)));
    }

    #[tokio::test]
    async fn test_fetch_by_id_absent_is_none() {
        let provider = ScriptedProvider::new(|| {
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<entity::Model>::new()])
        });
        let repo = PgProjectRepository::new(provider);

        assert_eq!(repo.fetch_by_id(5).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_reports_zero_rows_for_missing_id() {
        let provider = ScriptedProvider::new(|| {
            MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
        });
        let repo = PgProjectRepository::new(provider);

        let mut ghost = Project::new("Ghost");
        ghost.project_id = Some(99);

        assert_eq!(repo.update(ghost).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_write_error_is_write_failed_and_connection_released() {
        let provider = ScriptedProvider::new(|| {
            MockDatabase::new(DatabaseBackend::Postgres).append_exec_errors([DbErr::Exec(
                RuntimeErr::Internal("disk full".to_string()),
            )])
        });
        let repo = PgProjectRepository::new(provider);

        let err = repo.delete(1).await.unwrap_err();

        assert!(matches!(
            err,
            ProjectError::Storage(StorageError::WriteFailed(ref msg)) if msg.contains("disk full")
        ));
        assert_eq!(repo.provider.acquired.load(Ordering::SeqCst), 1);
        assert_eq!(repo.provider.released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_read_error_is_query_failed() {
        let provider = ScriptedProvider::new(|| {
            MockDatabase::new(DatabaseBackend::Postgres).append_query_errors([DbErr::Query(
                RuntimeErr::Internal("relation \"project\" does not exist".to_string()),
            )])
        });
        let repo = PgProjectRepository::new(provider);

        let err = repo.fetch_all().await.unwrap_err();
        assert!(matches!(err, ProjectError::Storage(StorageError::QueryFailed(_))));
    }

    #[tokio::test]
    async fn test_precondition_failures_never_open_a_connection() {
        let provider = ScriptedProvider::new(|| MockDatabase::new(DatabaseBackend::Postgres));
        let repo = PgProjectRepository::new(provider);

        let mut saved = Project::new("Saved");
        saved.project_id = Some(3);
        assert!(matches!(repo.insert(saved).await, Err(ProjectError::Validation(_))));
        assert!(matches!(
            repo.update(Project::new("Unsaved")).await,
            Err(ProjectError::Validation(_))
        ));
        assert_eq!(repo.provider.acquired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unreachable_host_fails_every_operation_with_connection_failed() {
        let config = PostgresConfig::new("127.0.0.1", 1, "projects", "projects", "projects")
            .with_connect_timeout(2);
        let repo = PgProjectRepository::new(PgConnectionProvider::new(config));

        let mut existing = Project::new("Build deck");
        existing.project_id = Some(1);

        assert!(repo.insert(Project::new("Build deck")).await.unwrap_err().is_connection_failed());
        assert!(repo.fetch_all().await.unwrap_err().is_connection_failed());
        assert!(repo.fetch_by_id(1).await.unwrap_err().is_connection_failed());
        assert!(repo.update(existing).await.unwrap_err().is_connection_failed());
        assert!(repo.delete(1).await.unwrap_err().is_connection_failed());
    }
}

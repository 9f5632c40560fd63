use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ProjectError, ProjectResult};
use crate::models::Project;

/// Repository trait for Project persistence
///
/// Each operation is one unit of work. A missing row is never an error here:
/// `fetch_by_id` returns `None` and `update`/`delete` return an affected-row
/// count of 0. Storage failures come back as `ProjectError::Storage`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Insert an unsaved project; returns it with the store-assigned id
    async fn insert(&self, project: Project) -> ProjectResult<Project>;

    /// All projects in primary-key order; empty when the table is empty
    async fn fetch_all(&self) -> ProjectResult<Vec<Project>>;

    /// The project with the given id, if any
    async fn fetch_by_id(&self, id: i32) -> ProjectResult<Option<Project>>;

    /// Overwrite every column of the row with `project.project_id`.
    ///
    /// This is a full replacement, not a patch: unset optional fields are
    /// written as NULL. Returns the number of rows affected (0 or 1).
    async fn update(&self, project: Project) -> ProjectResult<u64>;

    /// Delete the row with the given id; returns the number of rows affected
    async fn delete(&self, id: i32) -> ProjectResult<u64>;
}

pub(crate) fn require_unsaved(project: &Project) -> ProjectResult<()> {
    match project.project_id {
        Some(id) => Err(ProjectError::Validation(format!(
            "cannot insert project that already has ID={}",
            id
        ))),
        None => Ok(()),
    }
}

pub(crate) fn require_id(project: &Project) -> ProjectResult<i32> {
    project
        .project_id
        .ok_or_else(|| ProjectError::Validation("cannot update project without an ID".to_string()))
}

#[derive(Debug, Default)]
struct InMemoryState {
    next_id: i32,
    projects: BTreeMap<i32, Project>,
}

/// In-memory implementation of ProjectRepository (for development/testing)
///
/// Ids are assigned sequentially from 1, like a serial column.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProjectRepository {
    state: Arc<RwLock<InMemoryState>>,
}

impl InMemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn insert(&self, project: Project) -> ProjectResult<Project> {
        require_unsaved(&project)?;

        let mut state = self.state.write().await;
        state.next_id += 1;
        let id = state.next_id;

        let project = Project {
            project_id: Some(id),
            ..project
        };
        state.projects.insert(id, project.clone());

        tracing::info!(project_id = id, "Created project");
        Ok(project)
    }

    async fn fetch_all(&self) -> ProjectResult<Vec<Project>> {
        let state = self.state.read().await;
        Ok(state.projects.values().cloned().collect())
    }

    async fn fetch_by_id(&self, id: i32) -> ProjectResult<Option<Project>> {
        let state = self.state.read().await;
        Ok(state.projects.get(&id).cloned())
    }

    async fn update(&self, project: Project) -> ProjectResult<u64> {
        let id = require_id(&project)?;

        let mut state = self.state.write().await;
        match state.projects.get_mut(&id) {
            Some(stored) => {
                *stored = project;
                tracing::info!(project_id = id, "Updated project");
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: i32) -> ProjectResult<u64> {
        let mut state = self.state.write().await;

        if state.projects.remove(&id).is_some() {
            tracing::info!(project_id = id, "Deleted project");
            Ok(1)
        } else {
            Ok(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let repo = InMemoryProjectRepository::new();

        let first = repo.insert(Project::new("Build deck")).await.unwrap();
        let second = repo.insert(Project::new("Paint fence")).await.unwrap();

        assert_eq!(first.project_id, Some(1));
        assert_eq!(second.project_id, Some(2));

        let fetched = repo.fetch_by_id(1).await.unwrap();
        assert_eq!(fetched, Some(first));
    }

    #[tokio::test]
    async fn test_insert_rejects_existing_id() {
        let repo = InMemoryProjectRepository::new();
        let mut project = Project::new("Build deck");
        project.project_id = Some(9);

        let result = repo.insert(project).await;
        assert!(matches!(result, Err(ProjectError::Validation(_))));
        assert!(repo.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete_report_affected_rows() {
        let repo = InMemoryProjectRepository::new();
        let created = repo.insert(Project::new("Build deck")).await.unwrap();

        let changed = created.clone().with_actual_hours(Decimal::new(1050, 2));
        assert_eq!(repo.update(changed).await.unwrap(), 1);

        let mut missing = Project::new("Ghost");
        missing.project_id = Some(99);
        assert_eq!(repo.update(missing).await.unwrap(), 0);

        assert_eq!(repo.delete(1).await.unwrap(), 1);
        assert_eq!(repo.delete(1).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_requires_id() {
        let repo = InMemoryProjectRepository::new();
        let result = repo.update(Project::new("Unsaved")).await;
        assert!(matches!(result, Err(ProjectError::Validation(_))));
    }
}

use std::sync::Arc;

use crate::error::{ProjectError, ProjectResult};
use crate::models::Project;
use crate::repository::ProjectRepository;

/// Service layer for Project operations
///
/// Stateless between calls. Adds the `NotFound` outcome on top of the
/// repository's "absent" / zero-affected-rows results and never retries.
#[derive(Clone)]
pub struct ProjectService<R: ProjectRepository> {
    repository: Arc<R>,
}

impl<R: ProjectRepository> ProjectService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Insert a project row; returns it with the generated id
    pub async fn create_project(&self, project: Project) -> ProjectResult<Project> {
        self.repository.insert(project).await
    }

    pub async fn list_projects(&self) -> ProjectResult<Vec<Project>> {
        self.repository.fetch_all().await
    }

    /// Get a project by ID
    pub async fn get_project(&self, id: i32) -> ProjectResult<Project> {
        self.repository
            .fetch_by_id(id)
            .await?
            .ok_or(ProjectError::NotFound(id))
    }

    /// Overwrite a project and return what the store now holds
    ///
    /// Full replacement: merge unchanged fields with `Project::merged_with`
    /// first. The result is re-read so external modifications are visible.
    pub async fn update_project(&self, project: Project) -> ProjectResult<Project> {
        let id = project
            .project_id
            .ok_or_else(|| ProjectError::Validation("cannot update project without an ID".to_string()))?;

        if self.repository.update(project).await? == 0 {
            return Err(ProjectError::NotFound(id));
        }

        self.get_project(id).await
    }

    /// Delete a project
    pub async fn delete_project(&self, id: i32) -> ProjectResult<()> {
        let deleted = self.repository.delete(id).await?;

        if deleted == 0 {
            return Err(ProjectError::NotFound(id));
        }

        Ok(())
    }
}

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{NotSet, Set};

/// Sea-ORM Entity for the `project` table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "project")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub project_id: i32,
    pub project_name: String,
    #[sea_orm(column_type = "Decimal(Some((7, 2)))", nullable)]
    pub estimated_hours: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((7, 2)))", nullable)]
    pub actual_hours: Option<Decimal>,
    #[sea_orm(nullable)]
    pub difficulty: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// Conversion from Sea-ORM Model to domain Project
impl From<Model> for crate::models::Project {
    fn from(model: Model) -> Self {
        Self {
            project_id: Some(model.project_id),
            project_name: model.project_name,
            estimated_hours: model.estimated_hours,
            actual_hours: model.actual_hours,
            difficulty: model.difficulty,
            notes: model.notes,
        }
    }
}

// Every column except the key; used for both insert and full-overwrite update
impl From<crate::models::Project> for ActiveModel {
    fn from(project: crate::models::Project) -> Self {
        ActiveModel {
            project_id: NotSet,
            project_name: Set(project.project_name),
            estimated_hours: Set(project.estimated_hours),
            actual_hours: Set(project.actual_hours),
            difficulty: Set(project.difficulty),
            notes: Set(project.notes),
        }
    }
}

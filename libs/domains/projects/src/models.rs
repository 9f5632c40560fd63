use rust_decimal::Decimal;
use std::fmt;

/// Project entity - one row of the `project` table
///
/// `project_id` is `None` until the store assigns it on insert and never
/// changes afterwards. Every other field is freely mutable through a
/// full-overwrite update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Store-assigned surrogate key
    pub project_id: Option<i32>,
    pub project_name: String,
    /// Fixed-point, two-digit scale
    pub estimated_hours: Option<Decimal>,
    /// Fixed-point, two-digit scale
    pub actual_hours: Option<Decimal>,
    /// Conventionally 1-5; range checks belong to the input layer
    pub difficulty: Option<i32>,
    pub notes: Option<String>,
}

/// Field values supplied by a caller for an update
///
/// `None` means "not supplied, keep the current value". Merge onto the stored
/// project with [`Project::merged_with`] before calling the update, which
/// always overwrites every column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProject {
    pub project_name: Option<String>,
    pub estimated_hours: Option<Decimal>,
    pub actual_hours: Option<Decimal>,
    pub difficulty: Option<i32>,
    pub notes: Option<String>,
}

impl Project {
    /// Create an unsaved project with only a name
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_id: None,
            project_name: project_name.into(),
            estimated_hours: None,
            actual_hours: None,
            difficulty: None,
            notes: None,
        }
    }

    pub fn with_estimated_hours(mut self, hours: Decimal) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    pub fn with_actual_hours(mut self, hours: Decimal) -> Self {
        self.actual_hours = Some(hours);
        self
    }

    pub fn with_difficulty(mut self, difficulty: i32) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Full replacement value: supplied fields win, the rest keep their current value
    pub fn merged_with(&self, update: UpdateProject) -> Project {
        Project {
            project_id: self.project_id,
            project_name: update
                .project_name
                .unwrap_or_else(|| self.project_name.clone()),
            estimated_hours: update.estimated_hours.or(self.estimated_hours),
            actual_hours: update.actual_hours.or(self.actual_hours),
            difficulty: update.difficulty.or(self.difficulty),
            notes: update.notes.or_else(|| self.notes.clone()),
        }
    }

    /// Equality of every field except the id
    pub fn same_content(&self, other: &Project) -> bool {
        self.project_name == other.project_name
            && self.estimated_hours == other.estimated_hours
            && self.actual_hours == other.actual_hours
            && self.difficulty == other.difficulty
            && self.notes == other.notes
    }
}

fn display_opt<T: fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "null".to_string(),
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Project(projectId={}, projectName={}, estimatedHours={}, actualHours={}, difficulty={}, notes={})",
            display_opt(&self.project_id),
            self.project_name,
            display_opt(&self.estimated_hours),
            display_opt(&self.actual_hours),
            display_opt(&self.difficulty),
            display_opt(&self.notes),
        )
    }
}

//! Read-prompt-dispatch console menu over the project service.
//!
//! The only state kept between selections is the currently selected project.

use domain_projects::{Project, ProjectError, ProjectRepository, ProjectService, UpdateProject};
use std::io::{self, BufRead, Write};
use thiserror::Error;

use crate::input::{self, InputError};

const OPERATIONS: [&str; 5] = [
    "1) Add a project",
    "2) List projects",
    "3) Select project",
    "4) Update project details",
    "5) Delete a project",
];

#[derive(Debug, Error)]
enum MenuError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error("Project {0} has dependent records and cannot be deleted.")]
    HasDependents(i32),

    #[error(transparent)]
    Io(#[from] io::Error),
}

type MenuResult<T> = Result<T, MenuError>;

pub struct ProjectsMenu<R: ProjectRepository, I, O> {
    service: ProjectService<R>,
    input: I,
    output: O,
    current: Option<Project>,
}

impl<R, I, O> ProjectsMenu<R, I, O>
where
    R: ProjectRepository,
    I: BufRead,
    O: Write,
{
    pub fn new(service: ProjectService<R>, input: I, output: O) -> Self {
        Self {
            service,
            input,
            output,
            current: None,
        }
    }

    /// Run until the user submits a blank selection (or input ends).
    ///
    /// Bad input and failed operations are reported and the loop continues;
    /// only console I/O failures end it early.
    pub async fn run(&mut self) -> io::Result<()> {
        loop {
            match self.step().await {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(MenuError::Io(e)) => return Err(e),
                Err(e) => {
                    tracing::debug!(error = %e, "Menu operation failed");
                    writeln!(self.output, "\nError: {} Try again.", e)?;
                }
            }
        }
    }

    /// One selection; `Ok(true)` means exit
    async fn step(&mut self) -> MenuResult<bool> {
        self.print_operations()?;

        match self.prompt_int("Enter a menu selection")? {
            None => {
                writeln!(self.output, "Exiting the menu.")?;
                return Ok(true);
            }
            Some(1) => self.create_project().await?,
            Some(2) => self.list_projects().await?,
            Some(3) => self.select_project().await?,
            Some(4) => self.update_project_details().await?,
            Some(5) => self.delete_project().await?,
            Some(other) => {
                writeln!(self.output, "\n{} is not a valid selection. Try again.", other)?
            }
        }

        Ok(false)
    }

    async fn create_project(&mut self) -> MenuResult<()> {
        let project_name = self
            .prompt_text("Enter the project name")?
            .ok_or(InputError::Missing("project name"))?;
        let estimated_hours = self.prompt_hours("Enter the estimated hours")?;
        let actual_hours = self.prompt_hours("Enter the actual hours")?;
        let difficulty = self.prompt_difficulty("Enter the project difficulty (1-5)")?;
        let notes = self.prompt_text("Enter the project notes")?;

        let project = Project {
            project_id: None,
            project_name,
            estimated_hours,
            actual_hours,
            difficulty,
            notes,
        };

        let created = self.service.create_project(project).await?;
        writeln!(self.output, "You have successfully created project: {}", created)?;
        Ok(())
    }

    async fn list_projects(&mut self) -> MenuResult<()> {
        let projects = self.service.list_projects().await?;

        writeln!(self.output, "\nProjects:")?;
        for project in projects {
            let id = project.project_id.unwrap_or_default();
            writeln!(self.output, "   {}: {}", id, project.project_name)?;
        }
        Ok(())
    }

    async fn select_project(&mut self) -> MenuResult<()> {
        self.list_projects().await?;
        let id = self
            .prompt_int("Enter a project ID to select a project")?
            .ok_or(InputError::Missing("project ID"))?;

        // Unselect first so a failed lookup leaves nothing selected
        self.current = None;
        self.current = Some(self.service.get_project(id).await?);
        Ok(())
    }

    async fn update_project_details(&mut self) -> MenuResult<()> {
        let Some(current) = self.current.clone() else {
            writeln!(self.output, "\nPlease select a project.")?;
            return Ok(());
        };

        let update = UpdateProject {
            project_name: self
                .prompt_text(&format!("Enter the project name [{}]", current.project_name))?,
            estimated_hours: self.prompt_hours(&format!(
                "Enter the estimated hours [{}]",
                show(&current.estimated_hours)
            ))?,
            actual_hours: self.prompt_hours(&format!(
                "Enter the actual hours [{}]",
                show(&current.actual_hours)
            ))?,
            difficulty: self.prompt_difficulty(&format!(
                "Enter the project difficulty (1-5) [{}]",
                show(&current.difficulty)
            ))?,
            notes: self.prompt_text(&format!("Enter the project notes [{}]", show(&current.notes)))?,
        };

        let updated = self.service.update_project(current.merged_with(update)).await?;
        self.current = Some(updated);
        Ok(())
    }

    async fn delete_project(&mut self) -> MenuResult<()> {
        self.list_projects().await?;
        let id = self
            .prompt_int("Enter the ID of the project to delete")?
            .ok_or(InputError::Missing("project ID"))?;

        match self.service.delete_project(id).await {
            Ok(()) => {}
            Err(e) if e.is_constraint_violation() => return Err(MenuError::HasDependents(id)),
            Err(e) => return Err(e.into()),
        }
        writeln!(self.output, "Project {} was deleted successfully.", id)?;

        if self
            .current
            .as_ref()
            .is_some_and(|p| p.project_id == Some(id))
        {
            self.current = None;
        }
        Ok(())
    }

    fn print_operations(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(
            self.output,
            "These are the available selections. Press the Enter key to quit:"
        )?;
        for line in OPERATIONS {
            writeln!(self.output, "   {}", line)?;
        }

        match &self.current {
            None => writeln!(self.output, "\nYou are not working with a project."),
            Some(project) => writeln!(self.output, "\nYou are working with project {}", project),
        }
    }

    /// Print the prompt and read one line; end of input reads as blank
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{}: ", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line)
    }

    fn prompt_text(&mut self, prompt: &str) -> MenuResult<Option<String>> {
        Ok(input::parse_text(&self.read_line(prompt)?))
    }

    fn prompt_int(&mut self, prompt: &str) -> MenuResult<Option<i32>> {
        Ok(input::parse_int(&self.read_line(prompt)?)?)
    }

    fn prompt_difficulty(&mut self, prompt: &str) -> MenuResult<Option<i32>> {
        Ok(input::parse_int_in_range(&self.read_line(prompt)?, 1, 5)?)
    }

    fn prompt_hours(&mut self, prompt: &str) -> MenuResult<Option<rust_decimal::Decimal>> {
        Ok(input::parse_hours(&self.read_line(prompt)?)?)
    }
}

fn show<T: std::fmt::Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "null".to_string())
}

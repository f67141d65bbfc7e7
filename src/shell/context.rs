use crate::models::Project;

use super::command::Commander;

/// Which handler set is live: the top level or the inside of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Main,
    Project,
}

/// Context change requested by a handler, applied by the shell loop after
/// dispatch. The last non-`Stay` transition of a dispatch wins.
#[derive(Debug)]
pub enum Transition {
    Stay,
    Enter(Project),
    Leave,
}

/// The navigation state: the entered project (if any) paired with the
/// commander for that scope.
///
/// The pair only changes through [`NavContext::apply`], so the handler set
/// and the entered entity cannot drift apart. One context is owned by the
/// shell loop; nothing is process-global.
pub struct NavContext {
    project: Option<Project>,
    commander: Commander,
}

impl NavContext {
    pub fn main() -> Self {
        Self {
            project: None,
            commander: Commander::for_scope(Scope::Main),
        }
    }

    pub fn scope(&self) -> Scope {
        if self.project.is_some() {
            Scope::Project
        } else {
            Scope::Main
        }
    }

    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    pub fn commander(&self) -> &Commander {
        &self.commander
    }

    /// Label shown in the prompt: the entered project's name, or "main".
    pub fn prompt_label(&self) -> &str {
        self.project
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or("main")
    }

    pub fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::Stay => {}
            Transition::Enter(project) => {
                tracing::debug!(project = %project.name, "entering project context");
                self.project = Some(project);
                self.commander = Commander::for_scope(Scope::Project);
            }
            Transition::Leave => {
                tracing::debug!("returning to top-level context");
                self.project = None;
                self.commander = Commander::for_scope(Scope::Main);
            }
        }
    }
}

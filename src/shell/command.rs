use std::io::Write;

use chrono::Utc;
use thiserror::Error;

use crate::db::Database;
use crate::render::{relative_age, Style, Table};

use super::context::{NavContext, Scope, Transition};
use super::prompt::Prompt;

/// Everything a handler touches besides the navigation context: the
/// database, the output stream, the interactive prompt source, and the
/// color configuration. Tests substitute the writer and the prompt.
pub struct Env<'a> {
    pub db: &'a Database,
    pub out: &'a mut dyn Write,
    pub prompt: &'a mut dyn Prompt,
    pub style: Style,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    Usage(&'static str),
    #[error("no such project: {0}")]
    UnknownProject(String),
    #[error("no such task: {0}")]
    UnknownTask(String),
    #[error("not inside a project")]
    OutsideProject,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Db(#[from] anyhow::Error),
}

/// The full command set, closed over the six verbs the shell knows.
///
/// Match predicates are deliberately loose: argument-taking commands match
/// on substring containment, `ls` on exact equality. The dispatcher runs
/// every match, so two handlers with overlapping predicates both execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    CreateProject,
    ListProjects,
    ListTasks,
    AddTask,
    CompleteTask,
    Cd,
}

impl Command {
    /// Keyword contributed to first-token tab completion.
    pub fn keyword(&self) -> &'static str {
        match self {
            Command::CreateProject => "create-project",
            Command::ListProjects | Command::ListTasks => "ls",
            Command::AddTask => "mktask",
            Command::CompleteTask => "done",
            Command::Cd => "cd",
        }
    }

    pub fn matches(&self, line: &str) -> bool {
        match self {
            Command::CreateProject => line.contains("create-project"),
            Command::ListProjects | Command::ListTasks => line == "ls",
            Command::AddTask => line.contains("mktask"),
            Command::CompleteTask => line.contains("done"),
            Command::Cd => line.contains("cd"),
        }
    }

    pub fn run(
        &self,
        line: &str,
        ctx: &NavContext,
        env: &mut Env,
    ) -> Result<Transition, CommandError> {
        match self {
            Command::CreateProject => create_project(line, env),
            Command::ListProjects => list_projects(env),
            Command::ListTasks => list_tasks(ctx, env),
            Command::AddTask => add_task(ctx, env),
            Command::CompleteTask => mark_done(line, ctx, env),
            Command::Cd => cd(line, env),
        }
    }
}

/// The active handler list for one scope, in fixed registration order.
pub struct Commander {
    commands: Vec<Command>,
}

impl Commander {
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    pub fn for_scope(scope: Scope) -> Self {
        match scope {
            Scope::Main => Self::new(vec![
                Command::CreateProject,
                Command::ListProjects,
                Command::Cd,
            ]),
            Scope::Project => Self::new(vec![
                Command::AddTask,
                Command::ListTasks,
                Command::CompleteTask,
                Command::Cd,
            ]),
        }
    }

    /// Run every handler whose predicate fires, in registration order.
    /// Handler errors are rendered and dispatch continues; the loop never
    /// aborts on a bad line.
    pub fn dispatch(&self, line: &str, ctx: &NavContext, env: &mut Env) -> Transition {
        let mut transition = Transition::Stay;
        for command in &self.commands {
            if !command.matches(line) {
                continue;
            }
            match command.run(line, ctx, env) {
                Ok(Transition::Stay) => {}
                Ok(t) => transition = t,
                Err(err) => {
                    let message = env.style.red(&err.to_string());
                    let _ = writeln!(env.out, "{}", message);
                }
            }
        }
        transition
    }

    /// Deduplicated keywords contributed by this scope's handlers, for
    /// first-token completion.
    pub fn completion_commands(&self) -> Vec<String> {
        let mut keywords: Vec<String> = Vec::new();
        for command in &self.commands {
            let keyword = command.keyword().to_string();
            if !keywords.contains(&keyword) {
                keywords.push(keyword);
            }
        }
        keywords
    }
}

// Tokenization is single-space splitting throughout; multi-space and quoted
// arguments are unsupported.
fn split_args(line: &str) -> Vec<&str> {
    line.split(' ').collect()
}

fn create_project(line: &str, env: &mut Env) -> Result<Transition, CommandError> {
    let args = split_args(line);
    if args.len() != 2 || args[1].is_empty() {
        return Err(CommandError::Usage(
            "missing project name, create-project <name>",
        ));
    }

    env.db.create_project(args[1])?;
    writeln!(env.out, "project created")?;
    Ok(Transition::Stay)
}

fn list_projects(env: &mut Env) -> Result<Transition, CommandError> {
    let projects = env.db.all_projects()?;
    writeln!(
        env.out,
        "{} : {}",
        env.style.green("Projects"),
        projects.len()
    )?;

    let now = Utc::now();
    let mut table = Table::new();
    for project in &projects {
        let tasks = env.db.task_count(project.id)?;
        table.row(vec![
            format!("  {} {}", env.style.green("-"), project.name),
            env.style.blue(&format!("[{}]", tasks)),
            env.style.cyan(&relative_age(now - project.created_at)),
        ]);
    }
    table.flush(env.out)?;
    Ok(Transition::Stay)
}

fn list_tasks(ctx: &NavContext, env: &mut Env) -> Result<Transition, CommandError> {
    let Some(project) = ctx.project() else {
        return Err(CommandError::OutsideProject);
    };

    let tasks = env.db.tasks_for_project(project.id)?;
    writeln!(env.out, "{} : {}", env.style.green("Tasks"), tasks.len())?;

    let mut table = Table::new();
    for task in &tasks {
        let marker = if task.completed { "\u{2713}" } else { "-" };
        table.row(vec![
            format!("  {} {}", env.style.green(marker), task.name),
            env.style.cyan(&task.description),
        ]);
    }
    table.flush(env.out)?;
    Ok(Transition::Stay)
}

fn add_task(ctx: &NavContext, env: &mut Env) -> Result<Transition, CommandError> {
    let Some(project) = ctx.project() else {
        return Err(CommandError::OutsideProject);
    };

    writeln!(env.out, "adding tasks to: {}", project.name)?;
    let name = env.prompt.read_line("Task name: ")?;
    let description = env.prompt.read_line("Description: ")?;
    env.db
        .create_task(project.id, name.trim(), description.trim())?;
    Ok(Transition::Stay)
}

fn mark_done(line: &str, ctx: &NavContext, env: &mut Env) -> Result<Transition, CommandError> {
    let Some(project) = ctx.project() else {
        return Err(CommandError::OutsideProject);
    };

    let args = split_args(line);
    if args.len() != 2 || args[1].is_empty() {
        return Err(CommandError::Usage("missing task name, done <name>"));
    }

    if env.db.complete_task(project.id, args[1])? {
        writeln!(env.out, "task completed")?;
        Ok(Transition::Stay)
    } else {
        Err(CommandError::UnknownTask(args[1].to_string()))
    }
}

fn cd(line: &str, env: &mut Env) -> Result<Transition, CommandError> {
    let args = split_args(line);
    if args.len() != 2 || args[1].is_empty() {
        return Err(CommandError::Usage("missing project name, cd <name>"));
    }

    if args[1] == ".." || args[1] == "../" {
        return Ok(Transition::Leave);
    }

    match env.db.find_project_by_name(args[1])? {
        Some(project) => Ok(Transition::Enter(project)),
        None => Err(CommandError::UnknownProject(args[1].to_string())),
    }
}

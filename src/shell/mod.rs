//! The interactive shell: a rustyline read loop over a context-sensitive
//! command set. Entering a project swaps the handler set and the completion
//! entries together; leaving restores the top-level set.

mod command;
mod completer;
mod context;
mod prompt;

pub use command::{Command, CommandError, Commander, Env};
pub use completer::{CompletionData, LineHelper};
pub use context::{NavContext, Scope, Transition};
pub use prompt::{Prompt, StdinPrompt};

use std::io;
use std::sync::{Arc, RwLock};

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use crate::db::Database;
use crate::render::Style;

pub struct Shell {
    db: Database,
}

impl Shell {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Run until end-of-input or interrupt. Lines are forwarded verbatim to
    /// the active commander; unmatched input produces no output.
    pub fn run(&mut self) -> Result<()> {
        let style = Style::auto();
        let completions = Arc::new(RwLock::new(CompletionData::default()));

        let mut rl: Editor<LineHelper, DefaultHistory> = Editor::new()?;
        rl.set_helper(Some(LineHelper::new(completions.clone())));

        let mut ctx = NavContext::main();

        loop {
            self.refresh_completions(&completions, &ctx);

            let banner = format!("{} ~> ", style.green(ctx.prompt_label()));
            let line = match rl.readline(&banner) {
                Ok(line) => line,
                Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => break,
                Err(e) => return Err(e.into()),
            };

            if !line.trim().is_empty() {
                let _ = rl.add_history_entry(line.as_str());
            }

            let mut out = io::stdout();
            let mut prompt = StdinPrompt;
            let transition = {
                let mut env = Env {
                    db: &self.db,
                    out: &mut out,
                    prompt: &mut prompt,
                    style,
                };
                ctx.commander().dispatch(&line, &ctx, &mut env)
            };
            ctx.apply(transition);
        }

        Ok(())
    }

    fn refresh_completions(&self, data: &Arc<RwLock<CompletionData>>, ctx: &NavContext) {
        let projects = self.db.project_names().unwrap_or_default();
        let tasks = match ctx.project() {
            Some(project) => self.db.task_names(project.id).unwrap_or_default(),
            None => Vec::new(),
        };

        let mut data = data.write().expect("completion lock poisoned");
        data.commands = ctx.commander().completion_commands();
        data.projects = projects;
        data.tasks = tasks;
    }
}

use std::collections::VecDeque;
use std::io;

use minder::db::Database;
use minder::render::Style;
use minder::shell::{Command, Commander, Env, NavContext, Prompt, Scope, Transition};
use speculate2::speculate;

/// Scripted stand-in for the interactive stdin reads `mktask` performs.
struct ScriptedPrompt {
    lines: VecDeque<String>,
}

impl ScriptedPrompt {
    fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn read_line(&mut self, _prompt: &str) -> io::Result<String> {
        Ok(self.lines.pop_front().unwrap_or_default())
    }
}

/// Dispatch one line against the context's own commander, capturing output,
/// and apply the resulting transition — one iteration of the shell loop.
fn run_line(db: &Database, ctx: &mut NavContext, input: &[&str], line: &str) -> String {
    let mut out = Vec::new();
    let mut prompt = ScriptedPrompt::new(input);
    let transition = {
        let mut env = Env {
            db,
            out: &mut out,
            prompt: &mut prompt,
            style: Style::plain(),
        };
        ctx.commander().dispatch(line, ctx, &mut env)
    };
    ctx.apply(transition);
    String::from_utf8(out).expect("non-utf8 shell output")
}

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.migrate().expect("Failed to run migrations");
        let mut ctx = NavContext::main();
    }

    describe "top level" {
        it "lists a created project exactly once with zero tasks" {
            let out = run_line(&db, &mut ctx, &[], "create-project api");
            assert_eq!(out, "project created\n");

            let out = run_line(&db, &mut ctx, &[], "ls");
            assert!(out.contains("Projects : 1"));
            assert_eq!(out.matches("api").count(), 1);
            assert!(out.contains("[0]"));
            assert!(out.contains("less than a minute ago"));
        }

        it "prints a zero count and no rows when empty" {
            let out = run_line(&db, &mut ctx, &[], "ls");
            assert_eq!(out, "Projects : 0\n");
        }

        it "prints usage for create-project without a name" {
            let out = run_line(&db, &mut ctx, &[], "create-project");
            assert_eq!(out, "missing project name, create-project <name>\n");
            assert!(db.all_projects().expect("Query failed").is_empty());
        }

        it "prints usage for create-project with extra tokens" {
            let out = run_line(&db, &mut ctx, &[], "create-project a b");
            assert!(out.contains("create-project <name>"));
            assert!(db.all_projects().expect("Query failed").is_empty());
        }

        it "silently ignores unrecognized input" {
            let out = run_line(&db, &mut ctx, &[], "frobnicate");
            assert_eq!(out, "");

            let out = run_line(&db, &mut ctx, &[], "");
            assert_eq!(out, "");
        }
    }

    describe "cd" {
        it "enters and leaves a project context" {
            run_line(&db, &mut ctx, &[], "create-project api");

            run_line(&db, &mut ctx, &[], "cd api");
            assert_eq!(ctx.scope(), Scope::Project);
            assert_eq!(ctx.prompt_label(), "api");

            run_line(&db, &mut ctx, &[], "cd ..");
            assert_eq!(ctx.scope(), Scope::Main);
            assert_eq!(ctx.prompt_label(), "main");
        }

        it "treats ../ the same as .." {
            run_line(&db, &mut ctx, &[], "create-project api");

            run_line(&db, &mut ctx, &[], "cd api");
            run_line(&db, &mut ctx, &[], "cd ../");
            assert_eq!(ctx.scope(), Scope::Main);
        }

        it "returns to the top level even when already there" {
            run_line(&db, &mut ctx, &[], "cd ..");
            assert_eq!(ctx.scope(), Scope::Main);
        }

        it "reports an unknown project and keeps the context" {
            let out = run_line(&db, &mut ctx, &[], "cd missing");
            assert_eq!(out, "no such project: missing\n");
            assert_eq!(ctx.scope(), Scope::Main);
        }

        it "keeps the current project on a failed cd" {
            run_line(&db, &mut ctx, &[], "create-project api");
            run_line(&db, &mut ctx, &[], "cd api");

            run_line(&db, &mut ctx, &[], "cd missing");
            assert_eq!(ctx.prompt_label(), "api");
        }

        it "prints usage when the name is missing" {
            let out = run_line(&db, &mut ctx, &[], "cd");
            assert_eq!(out, "missing project name, cd <name>\n");
        }
    }

    describe "tasks" {
        before {
            run_line(&db, &mut ctx, &[], "create-project api");
            run_line(&db, &mut ctx, &[], "cd api");
        }

        it "adds a task through interactive prompts and lists it" {
            let out = run_line(
                &db,
                &mut ctx,
                &["write docs", "flesh out the README"],
                "mktask",
            );
            assert_eq!(out, "adding tasks to: api\n");

            let out = run_line(&db, &mut ctx, &[], "ls");
            assert!(out.contains("Tasks : 1"));
            assert!(out.contains("write docs"));
            assert!(out.contains("flesh out the README"));

            run_line(&db, &mut ctx, &[], "cd ..");
            let out = run_line(&db, &mut ctx, &[], "ls");
            assert!(out.contains("[1]"));
        }

        it "accepts empty task fields verbatim" {
            run_line(&db, &mut ctx, &[], "mktask");

            let out = run_line(&db, &mut ctx, &[], "ls");
            assert!(out.contains("Tasks : 1"));
        }

        it "trims whitespace from prompted fields" {
            run_line(&db, &mut ctx, &["  ship  ", " now "], "mktask");

            let tasks = db.tasks_for_project(
                ctx.project().expect("missing project").id,
            ).expect("Query failed");
            assert_eq!(tasks[0].name, "ship");
            assert_eq!(tasks[0].description, "now");
        }

        it "marks a task done and shows the marker" {
            run_line(&db, &mut ctx, &["ship", ""], "mktask");

            let out = run_line(&db, &mut ctx, &[], "done ship");
            assert_eq!(out, "task completed\n");

            let out = run_line(&db, &mut ctx, &[], "ls");
            assert!(out.contains("\u{2713} ship"));
        }

        it "reports an unknown task for done" {
            let out = run_line(&db, &mut ctx, &[], "done missing");
            assert_eq!(out, "no such task: missing\n");
        }

        it "lists tasks in an empty project with a zero count" {
            let out = run_line(&db, &mut ctx, &[], "ls");
            assert_eq!(out, "Tasks : 0\n");
        }
    }

    describe "dispatch" {
        it "runs every handler whose predicate fires, in registration order" {
            let project = db.create_project("api").expect("Failed to create");
            ctx.apply(Transition::Enter(project));

            // Both listing handlers registered at once: "ls" fires both.
            let commander = Commander::new(vec![Command::ListProjects, Command::ListTasks]);
            let mut out = Vec::new();
            let mut prompt = ScriptedPrompt::new(&[]);
            let mut env = Env {
                db: &db,
                out: &mut out,
                prompt: &mut prompt,
                style: Style::plain(),
            };
            commander.dispatch("ls", &ctx, &mut env);

            let out = String::from_utf8(out).expect("non-utf8 shell output");
            let projects_at = out.find("Projects :").expect("projects listing missing");
            let tasks_at = out.find("Tasks :").expect("tasks listing missing");
            assert!(projects_at < tasks_at);
        }

        it "continues past a failing handler to the remaining matches" {
            run_line(&db, &mut ctx, &[], "create-project api");
            run_line(&db, &mut ctx, &[], "cd api");

            // The line contains both "done" and "cd", so both handlers run:
            // done first (registration order), then cd. Each fails, each is
            // reported, and the context survives untouched.
            let out = run_line(&db, &mut ctx, &[], "cd done");
            assert_eq!(out, "no such task: done\nno such project: done\n");
            assert_eq!(ctx.prompt_label(), "api");
        }
    }
}

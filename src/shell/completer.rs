//! Tab completion over shared, per-context data.
//!
//! The shell refreshes [`CompletionData`] from the database before every
//! read, so the entries always match the active commander and newly created
//! projects complete immediately.

use std::sync::{Arc, RwLock};

use rustyline::completion::Pair;

#[derive(Default, Debug, Clone)]
pub struct CompletionData {
    pub commands: Vec<String>,
    pub projects: Vec<String>,
    pub tasks: Vec<String>,
}

pub struct LineHelper {
    data: Arc<RwLock<CompletionData>>,
}

impl LineHelper {
    pub fn new(data: Arc<RwLock<CompletionData>>) -> Self {
        Self { data }
    }

    fn pairs_from_prefix(items: &[String], prefix: &str) -> Vec<Pair> {
        let mut pairs = Vec::new();
        for item in items {
            if item.starts_with(prefix) {
                pairs.push(Pair {
                    display: item.clone(),
                    replacement: item.clone(),
                });
            }
        }
        pairs
    }
}

impl rustyline::Helper for LineHelper {}

impl rustyline::highlight::Highlighter for LineHelper {}

impl rustyline::hint::Hinter for LineHelper {
    type Hint = String;
    fn hint(&self, _line: &str, _pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        None
    }
}

impl rustyline::validate::Validator for LineHelper {}

impl rustyline::completion::Completer for LineHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        let start = line[..pos]
            .rfind(|c: char| c.is_whitespace())
            .map(|i| i + 1)
            .unwrap_or(0);
        let word = &line[start..pos];
        let tokens: Vec<&str> = line[..start].split_whitespace().collect();

        let data = self.data.read().expect("completion lock poisoned");

        // Completing the first token => command completion.
        if tokens.is_empty() {
            return Ok((start, Self::pairs_from_prefix(&data.commands, word)));
        }

        match tokens[0] {
            "cd" => {
                let mut targets = data.projects.clone();
                targets.push("..".to_string());
                Ok((start, Self::pairs_from_prefix(&targets, word)))
            }
            "done" => Ok((start, Self::pairs_from_prefix(&data.tasks, word))),
            _ => Ok((start, Vec::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustyline::completion::Completer;
    use rustyline::history::DefaultHistory;

    fn helper(data: CompletionData) -> LineHelper {
        LineHelper::new(Arc::new(RwLock::new(data)))
    }

    fn complete(helper: &LineHelper, line: &str) -> (usize, Vec<String>) {
        let history = DefaultHistory::new();
        let ctx = rustyline::Context::new(&history);
        let (start, pairs) = helper.complete(line, line.len(), &ctx).unwrap();
        (start, pairs.into_iter().map(|p| p.replacement).collect())
    }

    #[test]
    fn test_completes_commands_on_first_token() {
        let helper = helper(CompletionData {
            commands: vec!["create-project".into(), "ls".into(), "cd".into()],
            ..Default::default()
        });

        let (start, found) = complete(&helper, "c");
        assert_eq!(start, 0);
        assert_eq!(found, vec!["create-project", "cd"]);
    }

    #[test]
    fn test_completes_project_names_after_cd() {
        let helper = helper(CompletionData {
            projects: vec!["api".into(), "app".into(), "web".into()],
            ..Default::default()
        });

        let (start, found) = complete(&helper, "cd a");
        assert_eq!(start, 3);
        assert_eq!(found, vec!["api", "app"]);
    }

    #[test]
    fn test_offers_parent_dir_after_cd() {
        let helper = helper(CompletionData::default());

        let (_, found) = complete(&helper, "cd .");
        assert_eq!(found, vec![".."]);
    }

    #[test]
    fn test_completes_task_names_after_done() {
        let helper = helper(CompletionData {
            tasks: vec!["ship".into(), "write docs".into()],
            ..Default::default()
        });

        let (_, found) = complete(&helper, "done s");
        assert_eq!(found, vec!["ship"]);
    }

    #[test]
    fn test_no_entries_for_other_arguments() {
        let helper = helper(CompletionData {
            projects: vec!["api".into()],
            ..Default::default()
        });

        let (_, found) = complete(&helper, "mktask a");
        assert!(found.is_empty());
    }
}

use std::io::{self, Write};

/// Source of the interactive reads `mktask` performs outside the line
/// editor. Tests script this; the shell reads stdin directly.
pub trait Prompt {
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;
}

pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

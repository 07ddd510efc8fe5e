//! Terminal session state: working directory, prompt and command history.

use desktop_runtime::ShellConfig;
use desktop_vfs::{VfsPath, VfsStore};
use nu_ansi_term::Color;
use tracing::debug;

use crate::tokenize::tokenize;

/// Maximum number of remembered command lines.
pub const MAX_HISTORY: usize = 100;

pub const BANNER: [&str; 2] = [
    "StarOS Terminal [Version 1.3.0]",
    "(c) StarOS Corporation. All rights reserved.",
];

/// Result of one command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminalOutput {
    pub lines: Vec<String>,
    /// The screen should be wiped before printing the next prompt.
    pub clear: bool,
}

impl TerminalOutput {
    pub fn line(text: impl Into<String>) -> Self {
        Self {
            lines: vec![text.into()],
            clear: false,
        }
    }

    pub fn lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            clear: false,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalSession {
    pub(crate) cwd: VfsPath,
    pub(crate) config: ShellConfig,
    pub(crate) color: bool,
    history: Vec<String>,
}

impl TerminalSession {
    /// Starts a session in the configured home folder, without ANSI colours.
    pub fn new(config: &ShellConfig) -> Self {
        Self {
            cwd: config.home.clone(),
            config: config.clone(),
            color: false,
            history: Vec::new(),
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn cwd(&self) -> &VfsPath {
        &self.cwd
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// `~` for the home folder, the absolute path otherwise.
    pub fn display_path(&self) -> String {
        if self.cwd == self.config.home {
            "~".to_string()
        } else {
            self.cwd.to_string()
        }
    }

    pub fn prompt(&self) -> String {
        let user_host = format!("{}@{}", self.config.user_name, self.config.host_name);
        let path = self.display_path();
        if self.color {
            format!(
                "{}:{}$ ",
                Color::Green.bold().paint(user_host),
                Color::Blue.bold().paint(path)
            )
        } else {
            format!("{user_host}:{path}$ ")
        }
    }

    /// Runs one command line against the shared filesystem.
    pub fn execute(&mut self, store: &mut VfsStore, line: &str) -> TerminalOutput {
        self.push_history(line);

        let mut argv = match tokenize(line) {
            Ok(argv) => argv,
            Err(err) => return TerminalOutput::line(format!("terminal: {err}")),
        };
        let sudo = argv
            .first()
            .is_some_and(|first| first.eq_ignore_ascii_case("sudo"));
        if sudo {
            argv.remove(0);
        }
        let Some((command, args)) = argv.split_first() else {
            return if sudo {
                TerminalOutput::line("usage: sudo <command>")
            } else {
                TerminalOutput::empty()
            };
        };

        debug!(command = %command, cwd = %self.cwd, sudo, "terminal command");
        self.run(store, command, args, sudo)
    }

    fn push_history(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        self.history.push(line.to_string());
        if self.history.len() > MAX_HISTORY {
            let overflow = self.history.len() - MAX_HISTORY;
            self.history.drain(0..overflow);
        }
    }

    /// Resolves an argument against the cwd. `~` and `~/...` start at home.
    pub(crate) fn resolve(&self, target: &str) -> VfsPath {
        match target.strip_prefix('~') {
            Some("") => self.config.home.clone(),
            Some(rest) if rest.starts_with('/') => {
                self.config.home.resolve(rest.trim_start_matches('/'))
            }
            _ => self.cwd.resolve(target),
        }
    }
}

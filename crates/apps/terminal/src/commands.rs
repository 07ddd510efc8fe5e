//! Built-in terminal commands.

use desktop_vfs::{DeleteOptions, NewNode, NodeKind, VfsError, VfsStore};
use nu_ansi_term::Color;

use crate::session::{TerminalOutput, TerminalSession};

const HELP: [&str; 15] = [
    "Available commands:",
    "  help              - Show this help message",
    "  date              - Display the current date and time",
    "  clear             - Clear the terminal screen",
    "  echo [text]       - Display a line of text",
    "  whoami            - Print the user name",
    "  pwd               - Print the current directory",
    "  ls [path]         - List directory contents",
    "  cd [dir]          - Change the current directory",
    "  cat [file]        - Concatenate and display files",
    "  mkdir [dir]       - Make directories",
    "  touch [file]      - Create an empty file",
    "  rm [file/dir]     - Remove files or directories (-r for recursive)",
    "  sudo [command]    - Execute a command with superuser privileges",
    "  history           - Show previously entered commands",
];

impl TerminalSession {
    pub(crate) fn run(
        &mut self,
        store: &mut VfsStore,
        command: &str,
        args: &[String],
        sudo: bool,
    ) -> TerminalOutput {
        match command.to_ascii_lowercase().as_str() {
            "help" => TerminalOutput::lines(HELP),
            "date" => TerminalOutput::line(
                chrono::Local::now()
                    .format("%a %b %d %Y %H:%M:%S GMT%z")
                    .to_string(),
            ),
            "clear" => TerminalOutput {
                lines: Vec::new(),
                clear: true,
            },
            "whoami" => TerminalOutput::line(self.config.user_name.clone()),
            "echo" => TerminalOutput::line(args.join(" ")),
            "pwd" => TerminalOutput::line(self.cwd.to_string()),
            "history" => TerminalOutput::lines(
                self.history()
                    .iter()
                    .enumerate()
                    .map(|(idx, line)| format!("{:>4}  {line}", idx + 1)),
            ),
            "ls" => self.ls(store, args),
            "cd" => self.cd(store, args),
            "cat" => self.cat(store, args),
            "mkdir" => self.make(store, "mkdir", NodeKind::Folder, args, sudo),
            "touch" => self.make(store, "touch", NodeKind::File, args, sudo),
            "rm" => self.rm(store, args, sudo),
            _ => TerminalOutput::line(format!("command not found: {command}")),
        }
    }

    fn ls(&self, store: &VfsStore, args: &[String]) -> TerminalOutput {
        let target = args
            .first()
            .map(|arg| self.resolve(arg))
            .unwrap_or_else(|| self.cwd.clone());
        let fs = store.current();
        match fs.stat(&target) {
            Ok(NodeKind::Folder) => {
                let names: Vec<String> = fs
                    .list(&target)
                    .map(|entries| {
                        entries
                            .into_iter()
                            .map(|entry| match entry.kind {
                                NodeKind::Folder if self.color => {
                                    Color::Blue.bold().paint(entry.name).to_string()
                                }
                                _ => entry.name,
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                if names.is_empty() {
                    TerminalOutput::empty()
                } else {
                    TerminalOutput::line(names.join("  "))
                }
            }
            Ok(NodeKind::File) => {
                TerminalOutput::line(target.file_name().unwrap_or_default().to_string())
            }
            Err(_) => {
                let shown = args
                    .first()
                    .cloned()
                    .unwrap_or_else(|| self.display_path());
                TerminalOutput::line(format!(
                    "ls: cannot access '{shown}': No such file or directory"
                ))
            }
        }
    }

    fn cd(&mut self, store: &VfsStore, args: &[String]) -> TerminalOutput {
        let Some(target) = args.first() else {
            self.cwd = self.config.home.clone();
            return TerminalOutput::empty();
        };
        let path = self.resolve(target);
        match store.current().stat(&path) {
            Ok(NodeKind::Folder) => {
                self.cwd = path;
                TerminalOutput::empty()
            }
            _ => TerminalOutput::line(format!("cd: {target}: No such file or directory")),
        }
    }

    fn cat(&self, store: &VfsStore, args: &[String]) -> TerminalOutput {
        let Some(target) = args.first() else {
            return TerminalOutput::line("cat: missing file operand");
        };
        match store.current().read(&self.resolve(target)) {
            Ok(content) => TerminalOutput::lines(content.lines()),
            Err(VfsError::NotAFile { .. }) => {
                TerminalOutput::line(format!("cat: {target}: Is a directory"))
            }
            Err(_) => TerminalOutput::line(format!("cat: {target}: No such file or directory")),
        }
    }

    /// Shared body of `mkdir` and `touch`.
    fn make(
        &self,
        store: &mut VfsStore,
        command: &str,
        kind: NodeKind,
        args: &[String],
        sudo: bool,
    ) -> TerminalOutput {
        let Some(target) = args.first() else {
            return TerminalOutput::line(format!("{command}: missing operand"));
        };
        let noun = match kind {
            NodeKind::Folder => "directory",
            NodeKind::File => "file",
        };
        let fail =
            |reason: &str| TerminalOutput::line(format!("{command}: cannot create {noun} ‘{target}’: {reason}"));

        let path = self.resolve(target);
        let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
            return fail("File exists");
        };
        if self.config.is_protected(&parent) && !sudo {
            return fail("Permission denied");
        }
        let node = match kind {
            NodeKind::Folder => NewNode::Folder,
            NodeKind::File => NewNode::file(""),
        };
        match store.create(&parent, name, node) {
            Ok(_) => TerminalOutput::empty(),
            Err(err) => fail(err.reason()),
        }
    }

    fn rm(&self, store: &mut VfsStore, args: &[String], sudo: bool) -> TerminalOutput {
        let recursive = args.iter().take(2).any(|arg| arg == "-r");
        let target = if args.first().is_some_and(|arg| arg == "-r") {
            args.get(1)
        } else {
            args.first()
        };
        let Some(target) = target else {
            return TerminalOutput::line("rm: missing operand");
        };

        let path = self.resolve(target);
        if path.parent().is_some_and(|parent| self.config.is_protected(&parent)) && !sudo {
            return TerminalOutput::line(format!("rm: cannot remove ‘{target}’: Permission denied"));
        }
        let options = if recursive {
            DeleteOptions::recursive()
        } else {
            DeleteOptions::default()
        };
        match store.delete(&path, options) {
            Ok(_) => TerminalOutput::empty(),
            Err(VfsError::NotEmpty { .. }) => {
                TerminalOutput::line(format!("rm: cannot remove '{target}': Is a directory"))
            }
            Err(err) => TerminalOutput::line(format!(
                "rm: cannot remove '{target}': {}",
                err.reason()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use desktop_runtime::ShellConfig;
    use desktop_vfs::VfsPath;
    use pretty_assertions::assert_eq;

    use super::*;

    fn setup() -> (TerminalSession, VfsStore) {
        (
            TerminalSession::new(&ShellConfig::default()),
            VfsStore::default(),
        )
    }

    fn run(session: &mut TerminalSession, store: &mut VfsStore, line: &str) -> String {
        session.execute(store, line).text()
    }

    #[test]
    fn ls_lists_home_in_tree_order() {
        let (mut session, mut store) = setup();
        assert_eq!(
            run(&mut session, &mut store, "ls"),
            "Desktop  Documents  Downloads  welcome.txt"
        );
        assert_eq!(run(&mut session, &mut store, "ls welcome.txt"), "welcome.txt");
        assert_eq!(
            run(&mut session, &mut store, "ls nope"),
            "ls: cannot access 'nope': No such file or directory"
        );
        assert_eq!(run(&mut session, &mut store, "ls Desktop"), "");
    }

    #[test]
    fn coloured_ls_highlights_folders_only() {
        let (session, mut store) = setup();
        let mut session = session.with_color(true);
        let out = run(&mut session, &mut store, "ls");
        assert!(out.contains(&Color::Blue.bold().paint("Documents").to_string()));
        assert!(out.ends_with("  welcome.txt"));
    }

    #[test]
    fn cd_moves_between_folders() {
        let (mut session, mut store) = setup();
        assert_eq!(run(&mut session, &mut store, "cd Documents"), "");
        assert_eq!(session.cwd(), &VfsPath::parse("/home/guest/Documents"));
        assert_eq!(run(&mut session, &mut store, "pwd"), "/home/guest/Documents");

        assert_eq!(
            run(&mut session, &mut store, "cd project-notes.txt"),
            "cd: project-notes.txt: No such file or directory"
        );
        run(&mut session, &mut store, "cd /");
        assert_eq!(session.cwd(), &VfsPath::root());
        run(&mut session, &mut store, "cd");
        assert_eq!(session.display_path(), "~");
    }

    #[test]
    fn cat_reports_each_failure_mode() {
        let (mut session, mut store) = setup();
        assert_eq!(run(&mut session, &mut store, "cat welcome.txt"), "Welcome to StarOS!");
        assert_eq!(run(&mut session, &mut store, "cat"), "cat: missing file operand");
        assert_eq!(
            run(&mut session, &mut store, "cat Documents"),
            "cat: Documents: Is a directory"
        );
        assert_eq!(
            run(&mut session, &mut store, "cat ghost"),
            "cat: ghost: No such file or directory"
        );
    }

    #[test]
    fn mkdir_and_touch_report_collisions_and_missing_parents() {
        let (mut session, mut store) = setup();
        assert_eq!(run(&mut session, &mut store, "touch notes.txt"), "");
        assert_eq!(
            run(&mut session, &mut store, "touch notes.txt"),
            "touch: cannot create file ‘notes.txt’: File exists"
        );
        assert_eq!(
            run(&mut session, &mut store, "mkdir ghost/child"),
            "mkdir: cannot create directory ‘ghost/child’: No such file or directory"
        );
        assert_eq!(run(&mut session, &mut store, "mkdir"), "mkdir: missing operand");
        assert_eq!(
            store
                .current()
                .read(&VfsPath::parse("/home/guest/notes.txt")),
            Ok("")
        );
    }

    #[test]
    fn protected_roots_need_sudo() {
        let (mut session, mut store) = setup();
        assert_eq!(
            run(&mut session, &mut store, "mkdir /sys/extra"),
            "mkdir: cannot create directory ‘/sys/extra’: Permission denied"
        );
        assert_eq!(
            run(&mut session, &mut store, "rm /bin/ls"),
            "rm: cannot remove ‘/bin/ls’: Permission denied"
        );
        assert_eq!(run(&mut session, &mut store, "sudo mkdir /sys/extra"), "");
        assert_eq!(run(&mut session, &mut store, "SUDO rm /bin/ls"), "");
        assert!(store.current().exists(&VfsPath::parse("/sys/extra")));
        assert!(!store.current().exists(&VfsPath::parse("/bin/ls")));
    }

    #[test]
    fn rm_needs_flag_for_non_empty_folders() {
        let (mut session, mut store) = setup();
        assert_eq!(
            run(&mut session, &mut store, "rm Documents"),
            "rm: cannot remove 'Documents': Is a directory"
        );
        assert_eq!(run(&mut session, &mut store, "rm Desktop"), "");
        assert_eq!(run(&mut session, &mut store, "rm Documents -r"), "");
        assert_eq!(run(&mut session, &mut store, "rm -r"), "rm: missing operand");
        assert_eq!(run(&mut session, &mut store, "rm"), "rm: missing operand");
        assert_eq!(
            run(&mut session, &mut store, "rm -r Documents"),
            "rm: cannot remove 'Documents': No such file or directory"
        );
        assert_eq!(
            run(&mut session, &mut store, "ls"),
            "Downloads  welcome.txt"
        );
    }

    #[test]
    fn misc_commands() {
        let (mut session, mut store) = setup();
        assert_eq!(run(&mut session, &mut store, "whoami"), "guest");
        assert_eq!(run(&mut session, &mut store, "echo hello   \"big world\""), "hello big world");
        assert_eq!(run(&mut session, &mut store, "frobnicate"), "command not found: frobnicate");
        assert_eq!(run(&mut session, &mut store, "sudo"), "usage: sudo <command>");
        assert!(session.execute(&mut store, "clear").clear);
        assert_eq!(session.execute(&mut store, "help").lines.len(), HELP.len());
        assert!(!run(&mut session, &mut store, "date").is_empty());
    }
}

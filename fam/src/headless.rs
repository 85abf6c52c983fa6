//! Headless mode for the aspect manager.
//!
//! A line-oriented interface on stdin/stdout without a TUI, for scripting
//! and automated testing. Objects are addressed by their 1-based position in
//! the `#list` output.

use fam_core::{Category, EntityId, Session, SessionError};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const HELP: &[&str] = &[
    "  #list                   - List objects, most used first per category",
    "  #add <category> [name]  - Add an object (pc, npc, location, situation, object)",
    "  #rename <n> <name>      - Rename object n",
    "  #aspect <n> <label>     - Add an aspect to object n (resets an existing one)",
    "  #up <n> <label>         - Use an aspect of object n (+1)",
    "  #remove <n>             - Remove object n",
    "  #save [path]            - Save, optionally to a new file",
    "  #load <path>            - Replace everything with a file's contents",
    "  #merge <path>           - Append a file's contents",
    "  #clear                  - Remove every object",
    "  #status                 - Show file and change state",
    "  #help                   - Show this help",
    "  #quit                   - Exit",
];

/// A parsed headless command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Add { category: Category, name: String },
    Rename { index: usize, name: String },
    Aspect { index: usize, label: String },
    Up { index: usize, label: String },
    Remove { index: usize },
    Save { path: Option<PathBuf> },
    Load { path: PathBuf },
    Merge { path: PathBuf },
    Clear,
    Status,
    Help,
    Quit,
}

/// Parse one input line. The leading `#` is optional.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim_start().trim_end_matches(['\r', '\n']);
    let line = line.strip_prefix('#').unwrap_or(line);
    let (word, raw) = split_word(line);
    let rest = raw.trim();

    match word {
        "list" | "ls" => Ok(Command::List),
        "add" => {
            // Names are kept exactly as typed after the category.
            let (category, name) = split_word(raw.trim_start());
            let category = category
                .parse::<Category>()
                .map_err(|e| format!("{e}; usage: #add <category> [name]"))?;
            Ok(Command::Add {
                category,
                name: name.to_string(),
            })
        }
        "rename" => {
            let (index, name) = split_word(raw.trim_start());
            let index = parse_index(index, "#rename <n> <name>")?;
            Ok(Command::Rename {
                index,
                name: name.to_string(),
            })
        }
        "aspect" => {
            let (index, label) = parse_index_and_text(rest, "#aspect <n> <label>")?;
            Ok(Command::Aspect { index, label })
        }
        "up" => {
            let (index, label) = parse_index_and_text(rest, "#up <n> <label>")?;
            Ok(Command::Up { index, label })
        }
        "remove" | "rm" => {
            let index = parse_index(rest, "#remove <n>")?;
            Ok(Command::Remove { index })
        }
        "save" => Ok(Command::Save {
            path: (!rest.is_empty()).then(|| PathBuf::from(rest)),
        }),
        "load" => required_path(rest, "#load <path>").map(|path| Command::Load { path }),
        "merge" => required_path(rest, "#merge <path>").map(|path| Command::Merge { path }),
        "clear" => Ok(Command::Clear),
        "status" => Ok(Command::Status),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "" => Err("empty command".to_string()),
        other => Err(format!("unknown command `{other}`; try #help")),
    }
}

fn split_word(text: &str) -> (&str, &str) {
    text.split_once(char::is_whitespace).unwrap_or((text, ""))
}

fn split_first(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((first, rest)) => (first, rest.trim()),
        None => (text, ""),
    }
}

fn parse_index(text: &str, usage: &str) -> Result<usize, String> {
    match text.parse::<usize>() {
        Ok(index) if index > 0 => Ok(index),
        _ => Err(format!("expected a positive object number; usage: {usage}")),
    }
}

fn parse_index_and_text(text: &str, usage: &str) -> Result<(usize, String), String> {
    let (index, rest) = split_first(text);
    let index = parse_index(index, usage)?;
    if rest.is_empty() {
        return Err(format!("missing text; usage: {usage}"));
    }
    Ok((index, rest.to_string()))
}

fn required_path(text: &str, usage: &str) -> Result<PathBuf, String> {
    if text.is_empty() {
        Err(format!("missing path; usage: {usage}"))
    } else {
        Ok(PathBuf::from(text))
    }
}

/// Output of one command.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Reply {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Reply {
    fn line(text: impl Into<String>) -> Self {
        Self {
            lines: vec![text.into()],
            quit: false,
        }
    }

    fn error(text: impl std::fmt::Display) -> Self {
        Self::line(format!("[ERROR] {text}"))
    }
}

/// Headless command interpreter around a session.
pub struct HeadlessShell {
    session: Session,
}

impl HeadlessShell {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Parse and run one input line.
    pub fn handle_line(&mut self, line: &str) -> Reply {
        match parse_command(line) {
            Ok(command) => self.execute(command),
            Err(e) => Reply::error(e),
        }
    }

    /// Run one command.
    pub fn execute(&mut self, command: Command) -> Reply {
        match self.try_execute(command) {
            Ok(reply) => reply,
            Err(e) => Reply::error(e),
        }
    }

    fn try_execute(&mut self, command: Command) -> Result<Reply, ShellError> {
        let reply = match command {
            Command::List => self.list(),
            Command::Add { category, name } => {
                let id = self.session.add_entity(category);
                self.session.rename(id, name)?;
                let index = self.index_of(id).unwrap_or(0);
                Reply::line(format!("[OK] added {} #{index}", category.name()))
            }
            Command::Rename { index, name } => {
                let id = self.resolve(index)?;
                self.session.rename(id, name.as_str())?;
                Reply::line(format!("[OK] renamed #{index} to {name}"))
            }
            Command::Aspect { index, label } => {
                let id = self.resolve(index)?;
                self.session.add_aspect(id, label.as_str())?;
                Reply::line(format!("[OK] {label}: 0"))
            }
            Command::Up { index, label } => {
                let id = self.resolve(index)?;
                let count = self.session.increment_aspect(id, &label)?;
                Reply::line(format!("[OK] {label}: {count}"))
            }
            Command::Remove { index } => {
                let id = self.resolve(index)?;
                let entity = self.session.remove(id)?;
                Reply::line(format!("[OK] removed {}", display_name(entity.name())))
            }
            Command::Save { path } => {
                match path {
                    Some(path) => self.session.save_as(path)?,
                    None => self.session.save()?,
                }
                Reply::line(format!("[SAVED] {}", self.session.path().display()))
            }
            Command::Load { path } => {
                self.session.load(&path)?;
                Reply::line(format!(
                    "[LOADED] {} objects from {}",
                    self.session.collection().len(),
                    path.display()
                ))
            }
            Command::Merge { path } => {
                let added = self.session.merge(&path)?;
                Reply::line(format!("[MERGED] {added} objects from {}", path.display()))
            }
            Command::Clear => {
                self.session.clear();
                Reply::line("[OK] cleared")
            }
            Command::Status => {
                let mut lines = vec![
                    "[STATUS]".to_string(),
                    format!("  File: {}", self.session.path().display()),
                    format!("  Objects: {}", self.session.collection().len()),
                    format!(
                        "  Unsaved changes: {}",
                        if self.session.is_dirty() { "yes" } else { "no" }
                    ),
                    format!("  Counts on load: {:?}", self.session.count_policy()),
                ];
                if let Some((level, dir)) = crate::logging::logging_status() {
                    lines.push(format!("  Log: {level} in {}", dir.display()));
                }
                Reply { lines, quit: false }
            }
            Command::Help => Reply {
                lines: std::iter::once("[HELP]".to_string())
                    .chain(HELP.iter().map(|l| l.to_string()))
                    .collect(),
                quit: false,
            },
            Command::Quit => {
                let mut lines = Vec::new();
                if self.session.is_dirty() {
                    lines.push("[WARN] unsaved changes discarded".to_string());
                }
                lines.push("Goodbye!".to_string());
                Reply { lines, quit: true }
            }
        };
        Ok(reply)
    }

    fn list(&self) -> Reply {
        let mut lines = vec![format!("[LIST] {} objects", self.session.collection().len())];
        for (i, entity) in self.session.collection().ranked().iter().enumerate() {
            let aspects: Vec<String> = entity
                .ranked_aspects()
                .into_iter()
                .map(|(label, count)| format!("{label}={count}"))
                .collect();
            lines.push(format!(
                "  {}. [{}] {} (total {}){}",
                i + 1,
                entity.category().short(),
                display_name(entity.name()),
                entity.total(),
                if aspects.is_empty() {
                    String::new()
                } else {
                    format!(": {}", aspects.join(", "))
                }
            ));
        }
        Reply { lines, quit: false }
    }

    fn resolve(&self, index: usize) -> Result<EntityId, ShellError> {
        self.session
            .collection()
            .ranked_ids()
            .get(index.wrapping_sub(1))
            .copied()
            .ok_or(ShellError::NoSuchObject(index))
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.session
            .collection()
            .ranked_ids()
            .iter()
            .position(|&i| i == id)
            .map(|p| p + 1)
    }
}

#[derive(Debug, thiserror::Error)]
enum ShellError {
    #[error("no object #{0}; see #list")]
    NoSuchObject(usize),

    #[error(transparent)]
    Session(#[from] SessionError),
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        "(unnamed)"
    } else {
        name
    }
}

/// Run the headless interface on stdin/stdout until `#quit` or end of input.
pub fn run_headless(session: Session) -> io::Result<()> {
    let mut shell = HeadlessShell::new(session);

    println!("=== Fate Aspect Manager (headless) ===");
    println!(
        "File: {} ({} objects)",
        shell.session().path().display(),
        shell.session().collection().len()
    );
    println!("Commands:");
    for line in HELP {
        println!("{line}");
    }
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let reply = shell.handle_line(&line);
        for out in &reply.lines {
            writeln!(stdout, "{out}")?;
        }
        stdout.flush()?;

        if reply.quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fam_core::CountPolicy;
    use tempfile::TempDir;

    fn shell_in(dir: &TempDir) -> HeadlessShell {
        HeadlessShell::new(Session::new(dir.path().join("headless.fam")))
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("#list"), Ok(Command::List));
        assert_eq!(parse_command("list"), Ok(Command::List));
        assert_eq!(
            parse_command("#add npc Gate Guard"),
            Ok(Command::Add {
                category: Category::Npc,
                name: "Gate Guard".to_string()
            })
        );
        assert_eq!(
            parse_command("#add S"),
            Ok(Command::Add {
                category: Category::Situation,
                name: String::new()
            })
        );
        assert_eq!(
            parse_command("#up 2 Very Brave"),
            Ok(Command::Up {
                index: 2,
                label: "Very Brave".to_string()
            })
        );
        assert_eq!(
            parse_command("#rename 1"),
            Ok(Command::Rename {
                index: 1,
                name: String::new()
            })
        );
        assert_eq!(parse_command("#save"), Ok(Command::Save { path: None }));
    }

    #[test]
    fn test_names_kept_as_typed() {
        assert_eq!(
            parse_command("#rename 1  Sir Avery \n"),
            Ok(Command::Rename {
                index: 1,
                name: " Sir Avery ".to_string()
            })
        );
        assert_eq!(
            parse_command("#add pc Avery  "),
            Ok(Command::Add {
                category: Category::Pc,
                name: "Avery  ".to_string()
            })
        );

        let dir = TempDir::new().unwrap();
        let mut shell = shell_in(&dir);
        shell.handle_line("#add npc");
        shell.handle_line("#rename 1  Gate Guard ");
        let id = shell.session().collection().ranked_ids()[0];
        assert_eq!(shell.session().entity(id).unwrap().name(), " Gate Guard ");
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("#add dragon").is_err());
        assert!(parse_command("#up 0 Brave").is_err());
        assert!(parse_command("#up x Brave").is_err());
        assert!(parse_command("#aspect 1").is_err());
        assert!(parse_command("#load").is_err());
        assert!(parse_command("#").is_err());
        assert!(parse_command("#dance").is_err());
    }

    #[test]
    fn test_sneaky_scenario() {
        let dir = TempDir::new().unwrap();
        let mut shell = shell_in(&dir);

        assert_eq!(shell.handle_line("#add npc").lines, vec!["[OK] added NPC #1"]);
        shell.handle_line("#aspect 1 Sneaky");
        shell.handle_line("#up 1 Sneaky");
        assert_eq!(shell.handle_line("#up 1 Sneaky").lines, vec!["[OK] Sneaky: 2"]);

        let list = shell.handle_line("#list").lines;
        assert_eq!(list[1], "  1. [N] (unnamed) (total 2): Sneaky=2");
    }

    #[test]
    fn test_errors_are_reported() {
        let dir = TempDir::new().unwrap();
        let mut shell = shell_in(&dir);
        shell.handle_line("#add pc Avery");

        let reply = shell.handle_line("#up 1 Brave");
        assert!(reply.lines[0].starts_with("[ERROR]"));
        assert!(reply.lines[0].contains("Brave"));

        let reply = shell.handle_line("#remove 5");
        assert_eq!(reply.lines, vec!["[ERROR] no object #5; see #list"]);

        let reply = shell.handle_line("#load /definitely/not/here.fam");
        assert!(reply.lines[0].starts_with("[ERROR]"));
        assert_eq!(shell.session().collection().len(), 1);
    }

    #[test]
    fn test_save_load_resets_counts() {
        let dir = TempDir::new().unwrap();
        let mut shell = shell_in(&dir);
        shell.handle_line("#add pc Avery");
        shell.handle_line("#aspect 1 Brave");
        shell.handle_line("#up 1 Brave");
        shell.handle_line("#up 1 Brave");
        shell.handle_line("#up 1 Brave");

        let reply = shell.handle_line("#save");
        assert!(reply.lines[0].starts_with("[SAVED]"));

        let path = dir.path().join("headless.fam");
        let reply = shell.handle_line(&format!("#load {}", path.display()));
        assert!(reply.lines[0].starts_with("[LOADED] 1 objects"));

        let list = shell.handle_line("#list").lines;
        assert_eq!(list[1], "  1. [P] Avery (total 0): Brave=0");
    }

    #[test]
    fn test_merge_and_preserve_policy() {
        let dir = TempDir::new().unwrap();
        let extra = dir.path().join("extra.fam");
        std::fs::write(
            &extra,
            r#"[{"category":"object","name":"Key","aspects":{"Rusty":4}}]"#,
        )
        .unwrap();

        let session = Session::new(dir.path().join("main.fam"))
            .with_count_policy(CountPolicy::Preserve);
        let mut shell = HeadlessShell::new(session);
        shell.handle_line("#add pc Avery");

        let reply = shell.handle_line(&format!("#merge {}", extra.display()));
        assert!(reply.lines[0].starts_with("[MERGED] 1 objects"));

        let list = shell.handle_line("#list").lines;
        assert_eq!(list[2], "  2. [O] Key (total 4): Rusty=4");
    }

    #[test]
    fn test_ranking_changes_numbering() {
        let dir = TempDir::new().unwrap();
        let mut shell = shell_in(&dir);
        shell.handle_line("#add pc Low");
        shell.handle_line("#add pc High");
        shell.handle_line("#aspect 2 Bold");
        shell.handle_line("#up 2 Bold");

        let list = shell.handle_line("#list").lines;
        assert_eq!(list[1], "  1. [P] High (total 1): Bold=1");
        assert_eq!(list[2], "  2. [P] Low (total 0)");
    }

    #[test]
    fn test_quit_and_status() {
        let dir = TempDir::new().unwrap();
        let mut shell = shell_in(&dir);

        let status = shell.handle_line("#status").lines;
        assert_eq!(status[0], "[STATUS]");
        assert!(status.contains(&"  Unsaved changes: no".to_string()));

        shell.handle_line("#add location Docks");
        let reply = shell.handle_line("#quit");
        assert!(reply.quit);
        assert_eq!(reply.lines[0], "[WARN] unsaved changes discarded");
    }
}

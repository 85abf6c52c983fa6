//! Main application state and logic

use std::path::PathBuf;

use fam_core::{Category, EntityId, Session};
use log::{info, warn};

use crate::ui::theme::FamTheme;
use crate::ui::Overlay;

/// Vim-style input modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Navigation and hotkeys (default)
    #[default]
    Normal,
    /// Editing the selected entity's name
    Rename,
    /// Typing a new aspect label for the selected entity
    AddAspect,
    /// Entering : commands
    Command,
}

impl InputMode {
    /// Whether keystrokes go to the input buffer.
    pub fn is_editing(self) -> bool {
        !matches!(self, InputMode::Normal)
    }
}

/// Main application state
pub struct App {
    pub session: Session,

    // UI state
    pub theme: FamTheme,
    overlay: Option<Overlay>,
    selected: Option<EntityId>,
    selected_aspect: Option<String>,

    // Input state
    pub input_mode: InputMode,
    input_buffer: String,
    cursor_position: usize,

    // Status
    status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    /// Create the application around an opened session
    pub fn new(session: Session) -> Self {
        let mut app = Self {
            session,
            theme: FamTheme::default(),
            overlay: None,
            selected: None,
            selected_aspect: None,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            cursor_position: 0,
            status_message: None,
            should_quit: false,
        };
        app.select_first();
        app.set_status(format!(
            "{}: {} entities. Press ? for help",
            app.session.path().display(),
            app.session.collection().len()
        ));
        app
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Entity ids in display order
    pub fn ranked_ids(&self) -> Vec<EntityId> {
        self.session.collection().ranked_ids()
    }

    pub fn selected(&self) -> Option<EntityId> {
        self.selected
    }

    pub fn selected_aspect(&self) -> Option<&str> {
        self.selected_aspect.as_deref()
    }

    /// Select an entity and its most used aspect
    pub fn select(&mut self, id: Option<EntityId>) {
        self.selected = id;
        self.selected_aspect = id
            .and_then(|id| self.session.entity(id))
            .and_then(|e| e.ranked_aspects().first().map(|(label, _)| label.to_string()));
    }

    fn select_first(&mut self) {
        let first = self.ranked_ids().first().copied();
        self.select(first);
    }

    /// Move entity selection down the list
    pub fn select_next(&mut self) {
        self.step_selection(1);
    }

    /// Move entity selection up the list
    pub fn select_prev(&mut self) {
        self.step_selection(-1);
    }

    fn step_selection(&mut self, delta: isize) {
        let ids = self.ranked_ids();
        if ids.is_empty() {
            self.select(None);
            return;
        }
        let next = match self.selected.and_then(|id| ids.iter().position(|&i| i == id)) {
            Some(pos) => (pos as isize + delta).clamp(0, ids.len() as isize - 1) as usize,
            None => 0,
        };
        self.select(Some(ids[next]));
    }

    /// Move aspect selection within the selected entity
    pub fn select_next_aspect(&mut self) {
        self.step_aspect(1);
    }

    pub fn select_prev_aspect(&mut self) {
        self.step_aspect(-1);
    }

    fn step_aspect(&mut self, delta: isize) {
        let Some(entity) = self.selected.and_then(|id| self.session.entity(id)) else {
            return;
        };
        let labels: Vec<String> = entity
            .ranked_aspects()
            .into_iter()
            .map(|(label, _)| label.to_string())
            .collect();
        if labels.is_empty() {
            self.selected_aspect = None;
            return;
        }
        let next = match self
            .selected_aspect
            .as_ref()
            .and_then(|current| labels.iter().position(|l| l == current))
        {
            Some(pos) => (pos as isize + delta).clamp(0, labels.len() as isize - 1) as usize,
            None => 0,
        };
        self.selected_aspect = Some(labels[next].clone());
    }

    // =========================================================================
    // Model actions
    // =========================================================================

    /// Add an empty entity and start naming it
    pub fn add_entity(&mut self, category: Category) {
        let id = self.session.add_entity(category);
        self.select(Some(id));
        self.begin_rename();
        self.set_status(format!("New {}: type a name, Enter to confirm", category.name()));
    }

    /// Record one use of the selected aspect
    pub fn increment_selected(&mut self) {
        let (Some(id), Some(label)) = (self.selected, self.selected_aspect.clone()) else {
            self.set_status("No aspect selected");
            return;
        };
        match self.session.increment_aspect(id, &label) {
            Ok(count) => self.set_status(format!("{label}: {count}")),
            Err(e) => {
                warn!("increment failed: {e}");
                self.set_status(format!("Error: {e}"));
            }
        }
    }

    /// Remove the selected entity, moving selection to a neighbour
    pub fn remove_selected(&mut self) {
        let Some(id) = self.selected else {
            self.set_status("Nothing selected");
            return;
        };
        let ids = self.ranked_ids();
        let neighbour = ids
            .iter()
            .position(|&i| i == id)
            .and_then(|pos| ids.get(pos + 1).or_else(|| pos.checked_sub(1).and_then(|p| ids.get(p))))
            .copied();

        match self.session.remove(id) {
            Ok(entity) => {
                self.select(neighbour);
                let name = if entity.name().is_empty() {
                    "(unnamed)"
                } else {
                    entity.name()
                };
                self.set_status(format!("Removed {name}"));
            }
            Err(e) => {
                warn!("remove failed: {e}");
                self.set_status(format!("Error: {e}"));
            }
        }
    }

    /// Start editing the selected entity's name
    pub fn begin_rename(&mut self) {
        let Some(name) = self
            .selected
            .and_then(|id| self.session.entity(id))
            .map(|e| e.name().to_string())
        else {
            self.set_status("Nothing selected");
            return;
        };
        self.set_input(name);
        self.input_mode = InputMode::Rename;
    }

    /// Start typing a new aspect for the selected entity
    pub fn begin_add_aspect(&mut self) {
        if self.selected.is_none() {
            self.set_status("Nothing selected");
            return;
        }
        self.clear_input();
        self.input_mode = InputMode::AddAspect;
    }

    /// Apply the input buffer according to the current mode
    pub fn submit_input(&mut self) {
        let input = std::mem::take(&mut self.input_buffer);
        self.cursor_position = 0;
        let mode = self.input_mode;
        self.input_mode = InputMode::Normal;

        match mode {
            InputMode::Normal => {}
            InputMode::Rename => {
                if let Some(id) = self.selected {
                    if let Err(e) = self.session.rename(id, input) {
                        warn!("rename failed: {e}");
                        self.set_status(format!("Error: {e}"));
                    }
                }
            }
            InputMode::AddAspect => {
                let label = input.trim();
                if label.is_empty() {
                    self.set_status("Aspect label cannot be empty");
                    return;
                }
                if let Some(id) = self.selected {
                    match self.session.add_aspect(id, label) {
                        Ok(()) => {
                            self.selected_aspect = Some(label.to_string());
                            self.set_status(format!("Added aspect {label}"));
                        }
                        Err(e) => {
                            warn!("add aspect failed: {e}");
                            self.set_status(format!("Error: {e}"));
                        }
                    }
                }
            }
            InputMode::Command => {
                let command = input.strip_prefix(':').unwrap_or(input.as_str()).trim().to_string();
                if !command.is_empty() {
                    self.process_command(&command);
                }
            }
        }
    }

    /// Leave editing without applying anything
    pub fn cancel_input(&mut self) {
        self.clear_input();
        self.input_mode = InputMode::Normal;
    }

    // =========================================================================
    // Commands and file operations
    // =========================================================================

    /// Run a command (without the leading ':')
    pub fn process_command(&mut self, command: &str) {
        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
            None => (command, None),
        };

        match (name, arg) {
            ("w", None) => {
                self.save();
            }
            ("w", Some(path)) => {
                self.save_as(PathBuf::from(path));
            }
            ("wq", _) | ("x", _) => {
                let saved = match arg {
                    Some(path) => self.save_as(PathBuf::from(path)),
                    None => self.save(),
                };
                if saved {
                    self.should_quit = true;
                }
            }
            ("q", _) => self.request_quit(false),
            ("q!", _) => self.request_quit(true),
            ("e", Some(path)) => self.open(PathBuf::from(path), false),
            ("e!", Some(path)) => self.open(PathBuf::from(path), true),
            ("m", Some(path)) | ("merge", Some(path)) => self.merge(PathBuf::from(path)),
            ("new", _) => {
                self.session.clear();
                self.select(None);
                self.set_status("Cleared all entities");
            }
            ("e", None) | ("e!", None) | ("m", None) | ("merge", None) => {
                self.set_status(format!("Usage: :{name} <path>"));
            }
            _ => self.set_status(format!("Unknown command: {name}")),
        }
    }

    /// Save to the bound file; returns whether it succeeded
    pub fn save(&mut self) -> bool {
        match self.session.save() {
            Ok(()) => {
                self.set_status(format!("Saved to {}", self.session.path().display()));
                true
            }
            Err(e) => {
                self.set_status(format!("Save failed: {e}"));
                false
            }
        }
    }

    /// Save to a new file and bind to it
    pub fn save_as(&mut self, path: PathBuf) -> bool {
        match self.session.save_as(path) {
            Ok(()) => {
                self.set_status(format!("Saved to {}", self.session.path().display()));
                true
            }
            Err(e) => {
                self.set_status(format!("Save failed: {e}"));
                false
            }
        }
    }

    /// Replace everything with the contents of a file
    pub fn open(&mut self, path: PathBuf, force: bool) {
        if self.session.is_dirty() && !force {
            self.set_status("Unsaved changes (use :e! to discard)");
            return;
        }
        match self.session.load(&path) {
            Ok(()) => {
                info!("opened {}", path.display());
                self.select_first();
                self.set_status(format!("Loaded from {}", path.display()));
            }
            Err(e) => self.set_status(format!("Load failed: {e}")),
        }
    }

    /// Append the contents of a file
    pub fn merge(&mut self, path: PathBuf) {
        match self.session.merge(&path) {
            Ok(added) => {
                if self.selected.is_none() {
                    self.select_first();
                }
                self.set_status(format!("Merged {added} entities from {}", path.display()));
            }
            Err(e) => self.set_status(format!("Merge failed: {e}")),
        }
    }

    /// Quit, unless there are unsaved changes and `force` is false
    pub fn request_quit(&mut self, force: bool) {
        if self.session.is_dirty() && !force {
            self.set_status("Unsaved changes (use :wq to save, :q! to discard)");
        } else {
            self.should_quit = true;
        }
    }

    // =========================================================================
    // Status and overlays
    // =========================================================================

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        if matches!(self.overlay, Some(Overlay::Help)) {
            self.overlay = None;
        } else {
            self.overlay = Some(Overlay::Help);
        }
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    // =========================================================================
    // Input buffer
    // =========================================================================

    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input_buffer = text.into();
        self.cursor_position = self.input_buffer.chars().count();
    }

    pub fn clear_input(&mut self) {
        self.input_buffer.clear();
        self.cursor_position = 0;
    }

    /// Enter command mode (starts with :)
    pub fn enter_command_mode(&mut self) {
        self.input_mode = InputMode::Command;
        self.set_input(":");
    }

    /// Handle a typed character (unicode-safe)
    pub fn type_char(&mut self, c: char) {
        let byte_pos = self
            .input_buffer
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.input_buffer.len());
        self.input_buffer.insert(byte_pos, c);
        self.cursor_position += 1;
    }

    /// Handle backspace (unicode-safe)
    pub fn backspace(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            if let Some((byte_pos, ch)) = self.input_buffer.char_indices().nth(self.cursor_position)
            {
                self.input_buffer
                    .replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
            }
        }
    }

    /// Handle delete (unicode-safe)
    pub fn delete(&mut self) {
        if let Some((byte_pos, ch)) = self.input_buffer.char_indices().nth(self.cursor_position) {
            self.input_buffer
                .replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.input_buffer.chars().count();
        self.cursor_position = (self.cursor_position + 1).min(char_count);
    }

    /// Move to the start of the input, staying after the ':' prompt
    pub fn cursor_home(&mut self) {
        self.cursor_position = usize::from(self.input_mode == InputMode::Command);
    }

    pub fn cursor_end(&mut self) {
        self.cursor_position = self.input_buffer.chars().count();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fam_core::CountPolicy;
    use tempfile::TempDir;

    fn app_in(dir: &TempDir) -> App {
        App::new(Session::new(dir.path().join("test.fam")))
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            app.type_char(c);
        }
    }

    #[test]
    fn test_add_entity_then_name_and_aspect() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);

        app.add_entity(Category::Npc);
        assert_eq!(app.input_mode, InputMode::Rename);
        type_str(&mut app, "Gate Guard");
        app.submit_input();
        assert_eq!(app.input_mode, InputMode::Normal);

        app.begin_add_aspect();
        type_str(&mut app, " Sleepy ");
        app.submit_input();

        let id = app.selected().unwrap();
        let entity = app.session.entity(id).unwrap();
        assert_eq!(entity.name(), "Gate Guard");
        assert_eq!(entity.aspect_count("Sleepy"), Ok(0));
        assert_eq!(app.selected_aspect(), Some("Sleepy"));

        app.increment_selected();
        app.increment_selected();
        assert_eq!(app.session.entity(id).unwrap().total(), 2);
    }

    #[test]
    fn test_rename_keeps_text_as_typed() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.add_entity(Category::Pc);
        type_str(&mut app, "  Avery ");
        app.submit_input();

        let id = app.selected().unwrap();
        assert_eq!(app.session.entity(id).unwrap().name(), "  Avery ");
    }

    #[test]
    fn test_empty_aspect_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.add_entity(Category::Pc);
        app.submit_input();

        app.begin_add_aspect();
        type_str(&mut app, "   ");
        app.submit_input();
        assert!(app.session.entity(app.selected().unwrap()).unwrap().is_empty());
        assert_eq!(app.status_message(), Some("Aspect label cannot be empty"));
    }

    #[test]
    fn test_selection_follows_ranking() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.add_entity(Category::Object);
        app.cancel_input();
        app.add_entity(Category::Pc);
        app.cancel_input();

        let ids = app.ranked_ids();
        assert_eq!(app.session.entity(ids[0]).unwrap().category(), Category::Pc);

        app.select(Some(ids[0]));
        app.select_next();
        assert_eq!(app.selected(), Some(ids[1]));
        app.select_next();
        assert_eq!(app.selected(), Some(ids[1]), "selection clamps at the end");
        app.select_prev();
        app.select_prev();
        assert_eq!(app.selected(), Some(ids[0]));
    }

    #[test]
    fn test_remove_selects_neighbour() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        for category in [Category::Pc, Category::Npc, Category::Location] {
            app.add_entity(category);
            app.cancel_input();
        }
        let ids = app.ranked_ids();
        app.select(Some(ids[1]));
        app.remove_selected();
        assert_eq!(app.selected(), Some(ids[2]));
        app.remove_selected();
        assert_eq!(app.selected(), Some(ids[0]));
        app.remove_selected();
        assert_eq!(app.selected(), None);
        assert!(app.session.collection().is_empty());
    }

    #[test]
    fn test_quit_guards_unsaved_changes() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.add_entity(Category::Pc);
        app.cancel_input();

        app.process_command("q");
        assert!(!app.should_quit);

        app.process_command("wq");
        assert!(app.should_quit);
        assert!(dir.path().join("test.fam").exists());
    }

    #[test]
    fn test_force_quit() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.add_entity(Category::Pc);
        app.process_command("q!");
        assert!(app.should_quit);
    }

    #[test]
    fn test_command_mode_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.add_entity(Category::Situation);
        type_str(&mut app, "Ambush");
        app.submit_input();

        let other = dir.path().join("other.fam");
        app.enter_command_mode();
        type_str(&mut app, &format!("w {}", other.display()));
        app.submit_input();
        assert_eq!(app.session.path(), other.as_path());
        assert!(!app.session.is_dirty());

        app.process_command("new");
        assert!(app.session.collection().is_empty());

        app.process_command(&format!("e {}", other.display()));
        assert!(app.status_message().unwrap().starts_with("Unsaved changes"));

        app.process_command(&format!("e! {}", other.display()));
        let names: Vec<&str> = app.session.collection().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["Ambush"]);
        assert!(app.selected().is_some());

        app.process_command(&format!("m {}", other.display()));
        assert_eq!(app.session.collection().len(), 2);
    }

    #[test]
    fn test_failed_load_keeps_state() {
        let dir = TempDir::new().unwrap();
        let mut app = App::new(
            Session::new(dir.path().join("a.fam")).with_count_policy(CountPolicy::Reset),
        );
        app.add_entity(Category::Pc);
        app.cancel_input();
        app.process_command(&format!("e! {}", dir.path().join("missing.fam").display()));
        assert!(app.status_message().unwrap().starts_with("Load failed"));
        assert_eq!(app.session.collection().len(), 1);
    }

    #[test]
    fn test_unicode_editing() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.set_input("Größe");
        app.cursor_left();
        app.backspace();
        assert_eq!(app.input_buffer(), "Gröe");
        app.type_char('s');
        app.type_char('s');
        assert_eq!(app.input_buffer(), "Grösse");
        app.cursor_home();
        app.delete();
        assert_eq!(app.input_buffer(), "rösse");
    }
}

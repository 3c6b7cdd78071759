use crate::Config;
use crate::config::KeyMap;
use crate::models::{Category, PRIORITIES};
use crate::session::{Session, SessionError};
use crate::store::{FilteredView, StoreError};
use crate::tui::widgets::editor::Editor;
use ratatui::widgets::ListState;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    View,
    Create,
    Search,
    Help,
    Upgrade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    Text,
    Category,
    Priority,
}

impl TaskField {
    pub fn next(self, forward: bool) -> Self {
        match (self, forward) {
            (TaskField::Text, true) => TaskField::Category,
            (TaskField::Category, true) => TaskField::Priority,
            (TaskField::Priority, true) => TaskField::Text, // Wrap around
            (TaskField::Text, false) => TaskField::Priority, // Wrap around
            (TaskField::Category, false) => TaskField::Text,
            (TaskField::Priority, false) => TaskField::Category,
        }
    }
}

/// The always-visible new-task form
#[derive(Debug, Clone)]
pub struct TaskForm {
    pub current_field: TaskField,
    pub text: Editor,
    pub category: Category,
    pub priority: i64,
}

impl TaskForm {
    pub fn new(category: Category, priority: i64) -> Self {
        let priority = if PRIORITIES.contains(&priority) {
            priority
        } else {
            crate::models::DEFAULT_PRIORITY
        };
        Self {
            current_field: TaskField::Text,
            text: Editor::new(),
            category,
            priority,
        }
    }

    pub fn cycle_category(&mut self, forward: bool) {
        self.category = if forward {
            self.category.next()
        } else {
            self.category.prev()
        };
    }

    pub fn cycle_priority(&mut self, forward: bool) {
        let idx = PRIORITIES.iter().position(|p| *p == self.priority).unwrap_or(1);
        let len = PRIORITIES.len();
        let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
        self.priority = PRIORITIES[next];
    }
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub mode: Mode,
    /// Row in the filtered view, not a task position
    pub selected_index: usize,
    pub list_state: ListState,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            mode: Mode::View,
            selected_index: 0,
            list_state: ListState::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModalState {
    /// Full-list index of the task awaiting delete confirmation
    pub delete_confirmation: Option<usize>,
    /// 0 = Delete, 1 = Cancel
    pub delete_modal_selection: usize,
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub query: Editor,
}

pub struct App {
    pub config: Config,
    pub keys: KeyMap,
    pub session: Session,
    pub view: FilteredView,

    pub ui: UiState,
    pub form: TaskForm,
    pub search: SearchState,
    pub modals: ModalState,
    pub status: StatusState,
}

impl App {
    pub fn new(config: Config, session: Session) -> Self {
        let form = TaskForm::new(config.default_category, config.default_priority);
        let (keys, invalid_keys) = config.key_bindings.resolve();
        let mut app = Self {
            config,
            keys,
            session,
            view: FilteredView::default(),
            ui: UiState::default(),
            form,
            search: SearchState::default(),
            modals: ModalState::default(),
            status: StatusState::default(),
        };
        app.refresh_view();
        if !invalid_keys.is_empty() {
            app.set_status_message(format!(
                "Invalid key bindings, using defaults for: {}",
                invalid_keys.join(", ")
            ));
        }
        app
    }

    /// Rebuild the filtered view from the current query and keep the selection in range
    pub fn refresh_view(&mut self) {
        self.view = FilteredView::build(self.session.store(), self.search.query.as_str());
        self.adjust_selected_index();
    }

    pub fn adjust_selected_index(&mut self) {
        if self.view.is_empty() {
            self.ui.selected_index = 0;
            self.ui.list_state.select(None);
        } else {
            self.ui.selected_index = self.ui.selected_index.min(self.view.len() - 1);
            self.sync_list_state();
        }
    }

    pub fn sync_list_state(&mut self) {
        self.ui.list_state.select(Some(self.ui.selected_index));
    }

    /// Full-list index of the highlighted row, if any row is highlighted
    pub fn selected_task_index(&self) -> Option<usize> {
        self.view.full_index(self.ui.selected_index)
    }

    pub fn move_selection_up(&mut self) {
        if self.ui.selected_index > 0 {
            self.ui.selected_index -= 1;
            self.sync_list_state();
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.ui.selected_index < self.view.len().saturating_sub(1) {
            self.ui.selected_index += 1;
            self.sync_list_state();
        }
    }

    /// Select the row showing a given task, if it is visible
    fn select_task(&mut self, task_index: usize) {
        if let Some(row) = self.view.indices().iter().position(|&i| i == task_index) {
            self.ui.selected_index = row;
            self.sync_list_state();
        }
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status.message = Some(message);
        self.status.message_time = Some(Instant::now());
    }

    pub fn clear_status_message(&mut self) {
        self.status.message = None;
        self.status.message_time = None;
    }

    /// Check if status message should be auto-cleared (after 3 seconds)
    pub fn check_status_message_timeout(&mut self) {
        const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 3;
        if let Some(time) = self.status.message_time {
            if time.elapsed().as_secs() >= STATUS_MESSAGE_TIMEOUT_SECS {
                self.clear_status_message();
            }
        }
    }

    pub fn enter_create_mode(&mut self) {
        self.ui.mode = Mode::Create;
        self.form.current_field = TaskField::Text;
    }

    pub fn exit_create_mode(&mut self) {
        self.ui.mode = Mode::View;
    }

    pub fn navigate_form_field(&mut self, forward: bool) {
        self.form.current_field = self.form.current_field.next(forward);
    }

    /// Submit the form to the task list; the text is cleared only when the task was added
    pub fn submit_form(&mut self) {
        let text = self.form.text.as_str().to_string();
        match self.session.add(&text, self.form.category, self.form.priority) {
            Ok(index) => {
                self.form.text.clear();
                self.refresh_view();
                self.select_task(index);
                self.set_status_message("Task added".to_string());
            }
            Err(SessionError::AutoSave(e)) => {
                self.form.text.clear();
                self.refresh_view();
                self.set_status_message(format!("Task added, but could not save tasks: {}", e));
            }
            Err(SessionError::Store(StoreError::EmptyText)) => {
                self.set_status_message("Write a task first".to_string());
            }
            Err(SessionError::Store(e)) => {
                self.set_status_message(e.to_string());
            }
        }
    }

    pub fn toggle_selected(&mut self) {
        let selected = self.selected_task_index();
        match self.session.toggle_done(selected) {
            Ok(done) => {
                self.refresh_view();
                let message = if done { "Marked done" } else { "Marked not done" };
                self.set_status_message(message.to_string());
            }
            Err(SessionError::AutoSave(e)) => {
                self.refresh_view();
                self.set_status_message(format!("Could not save tasks: {}", e));
            }
            Err(SessionError::Store(e)) if e.is_not_found() => {
                self.set_status_message("Select a task to toggle done.".to_string());
            }
            Err(SessionError::Store(e)) => {
                self.set_status_message(e.to_string());
            }
        }
    }

    /// Ask for confirmation before deleting the highlighted task
    pub fn request_delete(&mut self) {
        match self.selected_task_index() {
            Some(index) => {
                self.modals.delete_confirmation = Some(index);
                self.modals.delete_modal_selection = 0;
            }
            None => self.set_status_message("Select a task to delete.".to_string()),
        }
    }

    pub fn cancel_delete(&mut self) {
        self.modals.delete_confirmation = None;
        self.modals.delete_modal_selection = 0;
    }

    pub fn confirm_delete(&mut self) {
        let pending = self.modals.delete_confirmation.take();
        self.modals.delete_modal_selection = 0;
        match self.session.delete(pending) {
            Ok(removed) => {
                self.refresh_view();
                self.set_status_message(format!("Deleted: {}", removed.text));
            }
            Err(SessionError::AutoSave(e)) => {
                self.refresh_view();
                self.set_status_message(format!("Task deleted, but could not save tasks: {}", e));
            }
            Err(SessionError::Store(e)) if e.is_not_found() => {
                self.set_status_message("Select a task to delete.".to_string());
            }
            Err(SessionError::Store(e)) => {
                self.set_status_message(e.to_string());
            }
        }
    }

    /// Manual save, always reported
    pub fn save(&mut self) {
        match self.session.save() {
            Ok(()) => self.set_status_message("Tasks saved".to_string()),
            Err(e) => self.set_status_message(format!("Could not save tasks: {}", e)),
        }
    }

    pub fn enter_search_mode(&mut self) {
        self.ui.mode = Mode::Search;
        self.search.query.move_cursor_end();
    }

    /// Leave the search box, keeping the filter applied
    pub fn exit_search_mode(&mut self) {
        self.ui.mode = Mode::View;
    }

    /// Drop the filter and show every task again, keeping the highlighted task selected
    pub fn clear_search(&mut self) {
        let selected = self.selected_task_index();
        self.search.query.clear();
        self.refresh_view();
        if let Some(index) = selected {
            self.select_task(index);
        }
    }

    pub fn add_to_search(&mut self, ch: char) {
        self.search.query.insert_char(ch);
        self.on_search_change();
    }

    pub fn remove_from_search(&mut self) {
        self.search.query.delete_char();
        self.on_search_change();
    }

    pub fn on_search_change(&mut self) {
        self.ui.selected_index = 0;
        self.refresh_view();
    }

    pub fn enter_help_mode(&mut self) {
        self.ui.mode = Mode::Help;
    }

    pub fn exit_help_mode(&mut self) {
        self.ui.mode = Mode::View;
    }

    pub fn enter_upgrade_mode(&mut self) {
        self.ui.mode = Mode::Upgrade;
    }

    pub fn exit_upgrade_mode(&mut self) {
        self.ui.mode = Mode::View;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn app_in(dir: &TempDir) -> App {
        let storage = Storage::new(dir.path().join("tasks.json"));
        let session = Session::open(storage).unwrap();
        App::new(Config::default(), session)
    }

    fn add(app: &mut App, text: &str, category: Category, priority: i64) {
        app.form.text = Editor::from_string(text.to_string());
        app.form.category = category;
        app.form.priority = priority;
        app.submit_form();
    }

    #[test]
    fn submitting_form_adds_and_clears() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        add(&mut app, "Write report", Category::Work, 1);

        assert!(app.form.text.is_empty());
        assert_eq!(app.session.stats().total, 1);
        assert_eq!(app.selected_task_index(), Some(0));
        assert_eq!(app.status.message.as_deref(), Some("Task added"));
    }

    #[test]
    fn blank_form_reports_and_keeps_text() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        add(&mut app, "   ", Category::Work, 1);

        assert_eq!(app.form.text.as_str(), "   ");
        assert_eq!(app.session.stats().total, 0);
        assert_eq!(app.status.message.as_deref(), Some("Write a task first"));
        assert!(!dir.path().join("tasks.json").exists());
    }

    #[test]
    fn toggle_goes_through_filtered_view() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        add(&mut app, "Write report", Category::Work, 1);
        add(&mut app, "Read book", Category::Personal, 3);
        add(&mut app, "Call plumber", Category::Other, 2);

        for ch in "plumb".chars() {
            app.add_to_search(ch);
        }
        assert_eq!(app.view.indices(), &[2]);
        app.toggle_selected();

        let tasks = app.session.store().tasks();
        assert!(tasks[2].done);
        assert!(!tasks[0].done && !tasks[1].done);
    }

    #[test]
    fn nothing_selected_reports_instead_of_failing() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.toggle_selected();
        assert_eq!(app.status.message.as_deref(), Some("Select a task to toggle done."));
        app.request_delete();
        assert_eq!(app.modals.delete_confirmation, None);
        assert_eq!(app.status.message.as_deref(), Some("Select a task to delete."));
    }

    #[test]
    fn delete_waits_for_confirmation() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        add(&mut app, "Write report", Category::Work, 1);
        add(&mut app, "Read book", Category::Personal, 3);

        app.ui.selected_index = 1;
        app.request_delete();
        assert_eq!(app.modals.delete_confirmation, Some(1));
        app.cancel_delete();
        assert_eq!(app.session.stats().total, 2);

        app.request_delete();
        app.confirm_delete();
        assert_eq!(app.session.stats().total, 1);
        assert_eq!(app.session.store().tasks()[0].text, "Write report");
        assert_eq!(app.ui.selected_index, 0);
    }

    #[test]
    fn clearing_search_keeps_selected_task() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        add(&mut app, "Write report", Category::Work, 1);
        add(&mut app, "Read book", Category::Personal, 3);

        app.add_to_search('b');
        assert_eq!(app.selected_task_index(), Some(1));
        app.clear_search();
        assert_eq!(app.view.len(), 2);
        assert_eq!(app.selected_task_index(), Some(1));
    }

    #[test]
    fn form_selectors_wrap() {
        let mut form = TaskForm::new(Category::Other, 3);
        form.cycle_category(true);
        form.cycle_priority(true);
        assert_eq!(form.category, Category::Work);
        assert_eq!(form.priority, 1);
        form.cycle_priority(false);
        assert_eq!(form.priority, 3);
        assert_eq!(TaskForm::new(Category::Work, 9).priority, 2);
    }

    #[test]
    fn invalid_binding_is_reported_on_start() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.key_bindings.upgrade = "Ctrl+".to_string();
        let session = Session::open(Storage::new(dir.path().join("tasks.json"))).unwrap();
        let app = App::new(config, session);

        assert_eq!(
            app.status.message.as_deref(),
            Some("Invalid key bindings, using defaults for: upgrade")
        );
        assert_eq!(app.keys.upgrade.key_code, crossterm::event::KeyCode::Char('p'));
    }

    #[test]
    fn failed_autosave_keeps_change_and_reports() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("blocked").join("tasks.json"));
        let session = Session::open(storage).unwrap();
        let mut app = App::new(Config::default(), session);
        // A regular file where the parent directory should be
        std::fs::write(dir.path().join("blocked"), "").unwrap();

        add(&mut app, "Write report", Category::Work, 1);
        assert_eq!(app.session.stats().total, 1);
        assert!(app.form.text.is_empty());
        let message = app.status.message.clone().unwrap();
        assert!(message.starts_with("Task added, but could not save tasks:"), "{message}");

        app.toggle_selected();
        assert!(app.session.store().tasks()[0].done);
        let message = app.status.message.clone().unwrap();
        assert!(message.starts_with("Could not save tasks:"), "{message}");

        app.save();
        let message = app.status.message.clone().unwrap();
        assert!(message.starts_with("Could not save tasks:"), "{message}");

        app.request_delete();
        app.confirm_delete();
        assert_eq!(app.session.stats().total, 0);
        let message = app.status.message.clone().unwrap();
        assert!(message.starts_with("Task deleted, but could not save tasks:"), "{message}");
    }
}

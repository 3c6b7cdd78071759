use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode, size as terminal_size,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use std::io;
use std::time::Duration;

use crate::tui::app::{Mode, TaskField};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::tui::widgets::confirm_delete::DELETE_OPTIONS;
use crate::tui::{App, render};

const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Restores the terminal when dropped, so a panic never leaves the shell in raw mode
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
        })
    }

    /// Restore on normal exit; the guard does nothing on drop afterwards
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    // Size check happens before the alternate screen so the message stays visible
    let (width, height) = terminal_size()?;
    let min_width = Layout::MIN_WIDTH + 2;
    let min_height = Layout::MIN_HEIGHT + 2;
    if width < min_width || height < min_height {
        return Err(TuiError::TerminalTooSmall {
            width,
            height,
            min_width,
            min_height,
        });
    }

    let mut guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    log::info!("TUI started with {} tasks", app.session.store().len());

    loop {
        app.check_status_message_timeout();

        let size = terminal.size()?;
        let terminal_rect = Rect::new(0, 0, size.width, size.height);
        terminal.draw(|f| {
            let layout = Layout::calculate(terminal_rect);
            render(f, &mut app, &layout);
        })?;

        if event::poll(POLL_INTERVAL)? {
            // Only Press events; Windows also reports Release
            if let Event::Key(key_event) = event::read()?
                && key_event.kind == KeyEventKind::Press
                && handle_key_event(&mut app, key_event)
            {
                break;
            }
        }
    }

    guard.restore()?;
    log::info!("TUI closed");
    Ok(())
}

/// Route a key press to the handler for the current mode. Returns true when the app should quit.
pub(crate) fn handle_key_event(app: &mut App, key_event: KeyEvent) -> bool {
    if app.modals.delete_confirmation.is_some() {
        handle_delete_confirmation_modal(app, key_event);
        return false;
    }

    match app.ui.mode {
        Mode::Help => handle_help_mode(app, key_event),
        Mode::Upgrade => handle_upgrade_mode(app, key_event),
        Mode::Create => handle_create_mode(app, key_event),
        Mode::Search => handle_search_mode(app, key_event),
        Mode::View => return handle_view_mode(app, key_event),
    }
    false
}

fn handle_delete_confirmation_modal(app: &mut App, key_event: KeyEvent) {
    let last = DELETE_OPTIONS.len() - 1;
    match key_event.code {
        KeyCode::Up | KeyCode::Left => {
            app.modals.delete_modal_selection = if app.modals.delete_modal_selection == 0 {
                last
            } else {
                app.modals.delete_modal_selection - 1
            };
        }
        KeyCode::Down | KeyCode::Right | KeyCode::Tab => {
            app.modals.delete_modal_selection = if app.modals.delete_modal_selection >= last {
                0
            } else {
                app.modals.delete_modal_selection + 1
            };
        }
        KeyCode::Enter => {
            if app.modals.delete_modal_selection == 0 {
                app.confirm_delete();
            } else {
                app.cancel_delete();
            }
        }
        KeyCode::Char('y') => app.confirm_delete(),
        KeyCode::Esc | KeyCode::Char('n') => app.cancel_delete(),
        _ => {}
    }
}

fn handle_help_mode(app: &mut App, key_event: KeyEvent) {
    if key_event.code == KeyCode::Esc || app.keys.help.matches(&key_event) {
        app.exit_help_mode();
    }
}

fn handle_upgrade_mode(app: &mut App, key_event: KeyEvent) {
    if matches!(key_event.code, KeyCode::Esc | KeyCode::Enter) {
        app.exit_upgrade_mode();
    }
}

fn handle_create_mode(app: &mut App, key_event: KeyEvent) {
    // Only a chord can save from here; a plain key is text
    if app.keys.save.requires_ctrl && app.keys.save.matches(&key_event) {
        app.save();
        return;
    }

    match key_event.code {
        KeyCode::Esc => app.exit_create_mode(),
        KeyCode::Enter => app.submit_form(),
        KeyCode::Tab => {
            let forward = !key_event.modifiers.contains(KeyModifiers::SHIFT);
            app.navigate_form_field(forward);
        }
        KeyCode::BackTab => app.navigate_form_field(false),
        code => match app.form.current_field {
            TaskField::Text => edit_text(app, key_event),
            TaskField::Category => match code {
                KeyCode::Left | KeyCode::Up => app.form.cycle_category(false),
                KeyCode::Right | KeyCode::Down | KeyCode::Char(' ') => app.form.cycle_category(true),
                _ => {}
            },
            TaskField::Priority => match code {
                KeyCode::Left | KeyCode::Up => app.form.cycle_priority(false),
                KeyCode::Right | KeyCode::Down | KeyCode::Char(' ') => app.form.cycle_priority(true),
                KeyCode::Char(c @ '1'..='3') => app.form.priority = i64::from(c as u8 - b'0'),
                _ => {}
            },
        },
    }
}

/// Chords (Ctrl or Alt held) are commands, never text
fn is_chord(modifiers: KeyModifiers) -> bool {
    modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

fn edit_text(app: &mut App, key_event: KeyEvent) {
    let editor = &mut app.form.text;
    match key_event.code {
        KeyCode::Char(c) if !is_chord(key_event.modifiers) => editor.insert_char(c),
        KeyCode::Backspace => editor.delete_char(),
        KeyCode::Delete => editor.delete_forward(),
        KeyCode::Left => editor.move_cursor_left(),
        KeyCode::Right => editor.move_cursor_right(),
        KeyCode::Home => editor.move_cursor_home(),
        KeyCode::End => editor.move_cursor_end(),
        _ => {}
    }
}

fn handle_search_mode(app: &mut App, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Esc => {
            app.clear_search();
            app.exit_search_mode();
        }
        KeyCode::Enter => app.exit_search_mode(),
        KeyCode::Char(c) if !is_chord(key_event.modifiers) => app.add_to_search(c),
        KeyCode::Backspace => app.remove_from_search(),
        KeyCode::Up => app.move_selection_up(),
        KeyCode::Down => app.move_selection_down(),
        _ => {}
    }
}

fn handle_view_mode(app: &mut App, key_event: KeyEvent) -> bool {
    let keys = app.keys.clone();
    if keys.quit.matches(&key_event) {
        return true;
    }

    if keys.save.matches(&key_event) {
        app.save();
    } else if keys.new.matches(&key_event) {
        app.enter_create_mode();
    } else if keys.delete.matches(&key_event) || key_event.code == KeyCode::Delete {
        app.request_delete();
    } else if keys.toggle_done.matches(&key_event) || key_event.code == KeyCode::Enter {
        app.toggle_selected();
    } else if keys.search.matches(&key_event) {
        app.enter_search_mode();
    } else if keys.help.matches(&key_event) {
        app.enter_help_mode();
    } else if keys.upgrade.matches(&key_event) {
        app.enter_upgrade_mode();
    } else if keys.list_up.matches(&key_event) || key_event.code == KeyCode::Up {
        app.move_selection_up();
    } else if keys.list_down.matches(&key_event) || key_event.code == KeyCode::Down {
        app.move_selection_down();
    } else if key_event.code == KeyCode::Esc && !app.search.query.is_empty() {
        app.clear_search();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::storage::Storage;
    use crate::{Config, Session};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn press_ctrl(app: &mut App, ch: char) -> bool {
        handle_key_event(app, KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL))
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn empty_app(dir: &TempDir) -> App {
        let session = Session::open(Storage::new(dir.path().join("tasks.json"))).unwrap();
        App::new(Config::default(), session)
    }

    #[test]
    fn quit_key_ends_the_loop() {
        let dir = TempDir::new().unwrap();
        let mut app = empty_app(&dir);
        assert!(!press(&mut app, KeyCode::Char('j')));
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn typing_q_in_the_form_does_not_quit() {
        let dir = TempDir::new().unwrap();
        let mut app = empty_app(&dir);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.ui.mode, Mode::Create);
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.form.text.as_str(), "q");
    }

    #[test]
    fn form_adds_task_with_chosen_category_and_priority() {
        let dir = TempDir::new().unwrap();
        let mut app = empty_app(&dir);
        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "Write report");
        press(&mut app, KeyCode::Tab);
        // Personal -> Other -> Work
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Enter);

        let task = app.session.store().get(0).unwrap();
        assert_eq!(task.text, "Write report");
        assert_eq!(task.category, Category::Work);
        assert_eq!(task.priority, 1);
        assert!(app.form.text.is_empty());
    }

    #[test]
    fn delete_needs_confirmation() {
        let dir = TempDir::new().unwrap();
        let mut app = empty_app(&dir);
        app.session.add("Read book", Category::Personal, 3).unwrap();
        app.refresh_view();

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.modals.delete_confirmation, Some(0));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.session.store().len(), 1);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Enter);
        assert!(app.session.store().is_empty());
    }

    #[test]
    fn space_toggles_selected_task() {
        let dir = TempDir::new().unwrap();
        let mut app = empty_app(&dir);
        app.session.add("Read book", Category::Personal, 3).unwrap();
        app.refresh_view();

        press(&mut app, KeyCode::Char(' '));
        assert!(app.session.store().get(0).unwrap().done);
    }

    #[test]
    fn escape_in_search_drops_the_filter() {
        let dir = TempDir::new().unwrap();
        let mut app = empty_app(&dir);
        app.session.add("Write report", Category::Work, 1).unwrap();
        app.session.add("Read book", Category::Personal, 3).unwrap();
        app.refresh_view();

        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "book");
        assert_eq!(app.view.len(), 1);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.ui.mode, Mode::View);
        assert_eq!(app.view.len(), 2);
    }

    #[test]
    fn bad_binding_does_not_end_the_session() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.key_bindings.upgrade = "Ctrl+".to_string();
        let session = Session::open(Storage::new(dir.path().join("tasks.json"))).unwrap();
        let mut app = App::new(config, session);
        app.session.add("Write report", Category::Work, 1).unwrap();
        app.session.add("Read book", Category::Personal, 3).unwrap();
        app.refresh_view();

        assert!(!press(&mut app, KeyCode::Char('j')));
        assert_eq!(app.selected_task_index(), Some(1));
        // The default upgrade key still works
        assert!(!press(&mut app, KeyCode::Char('p')));
        assert_eq!(app.ui.mode, Mode::Upgrade);
    }

    #[test]
    fn ctrl_s_in_the_form_saves_instead_of_typing() {
        let dir = TempDir::new().unwrap();
        let mut app = empty_app(&dir);
        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "Draft");

        assert!(!press_ctrl(&mut app, 's'));
        assert_eq!(app.form.text.as_str(), "Draft");
        assert_eq!(app.status.message.as_deref(), Some("Tasks saved"));
        assert!(dir.path().join("tasks.json").exists());

        handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT));
        assert_eq!(app.form.text.as_str(), "Draft");
    }
}

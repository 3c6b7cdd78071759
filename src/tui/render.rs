use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::Mode;
use crate::tui::widgets::{
    color::Palette,
    confirm_delete::render_confirm_delete,
    form::render_task_form,
    help::render_help,
    search_box::render_search_box,
    status_bar::render_status_bar,
    task_list::render_task_list,
    upgrade::render_upgrade,
};
use crate::tui::{App, Layout};
use crate::utils::format_key_binding_for_display as key;

pub fn render(f: &mut Frame, app: &mut App, layout: &Layout) {
    let palette = Palette::from_theme(&app.config.theme);

    // Outer border with the app name on the left and the upgrade hint on the right
    let upgrade_hint = Line::from(Span::styled(
        format!(" {}: Upgrade to Pro ", key(&app.config.key_bindings.upgrade)),
        Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Right);
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title(Line::from(" FocusList ").alignment(Alignment::Left))
        .title(upgrade_hint)
        .style(Style::default().fg(palette.fg).bg(palette.bg));
    f.render_widget(outer_block, f.area());

    render_task_form(
        f,
        layout.form_area,
        &app.form,
        app.ui.mode == Mode::Create,
        &key(&app.config.key_bindings.new),
        &palette,
    );

    render_search_box(
        f,
        layout.search_area,
        &app.search.query,
        app.ui.mode == Mode::Search,
        &key(&app.config.key_bindings.search),
        &palette,
    );

    render_task_list(
        f,
        layout.list_area,
        app.session.store(),
        &app.view,
        &mut app.ui.list_state,
        &palette,
    );

    let stats = Paragraph::new(app.session.stats().to_string())
        .style(Style::default().fg(palette.fg).bg(palette.bg))
        .alignment(Alignment::Center);
    f.render_widget(stats, layout.stats_area);

    let key_hints = get_key_hints(app);
    render_status_bar(f, layout.status_area, app.status.message.as_ref(), &key_hints, &palette);

    // Overlays go last so they sit on top of everything
    match app.ui.mode {
        Mode::Help => render_help(f, f.area(), &app.config, &palette),
        Mode::Upgrade => render_upgrade(f, f.area(), &palette),
        _ => {}
    }

    if let Some(task) = app
        .modals
        .delete_confirmation
        .and_then(|index| app.session.store().get(index))
    {
        render_confirm_delete(f, f.area(), task, app.modals.delete_modal_selection, &palette);
    }
}

fn get_key_hints(app: &App) -> Vec<String> {
    let kb = &app.config.key_bindings;
    match app.ui.mode {
        Mode::Help => vec![format!("Esc or {}: Exit help", key(&kb.help))],
        Mode::Upgrade => vec!["Esc: Close".to_string()],
        Mode::Search => vec![
            "Enter: Keep filter".to_string(),
            "Esc: Clear search".to_string(),
            "↑/↓: Move".to_string(),
        ],
        Mode::Create => vec![
            "Enter: Add".to_string(),
            "Tab/Shift+Tab: Next field".to_string(),
            "←/→: Change".to_string(),
            "Esc: Back".to_string(),
        ],
        Mode::View => vec![
            format!("{}: Quit", key(&kb.quit)),
            format!("{}: New", key(&kb.new)),
            format!("{}: Done", key(&kb.toggle_done)),
            format!("{}: Delete", key(&kb.delete)),
            format!("{}: Search", key(&kb.search)),
            format!("{}: Save", key(&kb.save)),
            format!("{}: Help", key(&kb.help)),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::storage::Storage;
    use crate::{Config, Session};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;
    use tempfile::TempDir;

    const TERM_W: u16 = 80;
    const TERM_H: u16 = 24;

    /// Render the whole app into an in-memory buffer and return plain text
    fn render_to_string(app: &mut App) -> String {
        let backend = TestBackend::new(TERM_W, TERM_H);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let layout = Layout::calculate(Rect::new(0, 0, TERM_W, TERM_H));
                render(f, app, &layout);
            })
            .unwrap();

        let buf = terminal.backend().buffer().clone();
        buf.content
            .chunks(buf.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app_with_tasks(dir: &TempDir) -> App {
        let storage = Storage::new(dir.path().join("tasks.json"));
        let mut session = Session::open(storage).unwrap();
        session.add("Write report", Category::Work, 1).unwrap();
        session.add("Read book", Category::Personal, 3).unwrap();
        App::new(Config::default(), session)
    }

    #[test]
    fn shows_rows_and_stats() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with_tasks(&dir);
        let screen = render_to_string(&mut app);

        assert!(screen.contains("FocusList"));
        assert!(screen.contains("[WOR][P1] Write report"));
        assert!(screen.contains("[PER][P3] Read book"));
        assert!(screen.contains("2 tasks • 0 done"));
        assert!(screen.contains("Tasks (2)"));
    }

    #[test]
    fn search_narrows_rendered_rows() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with_tasks(&dir);
        app.enter_search_mode();
        for ch in "book".chars() {
            app.add_to_search(ch);
        }
        let screen = render_to_string(&mut app);

        assert!(screen.contains("Tasks (1 of 2)"));
        assert!(screen.contains("Read book"));
        assert!(!screen.contains("Write report"));
        assert!(screen.contains("2 tasks • 0 done"));
    }

    #[test]
    fn delete_confirmation_names_the_task() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with_tasks(&dir);
        app.request_delete();
        let screen = render_to_string(&mut app);

        assert!(screen.contains("Confirm Delete"));
        assert!(screen.contains("> Delete"));
    }
}

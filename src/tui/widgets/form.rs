use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::{TaskField, TaskForm};
use crate::tui::widgets::color::Palette;

const CATEGORY_WIDTH: u16 = 14;
const PRIORITY_WIDTH: u16 = 8;

/// New-task form: text input followed by the category and priority selectors.
/// `focused` is false while the list has the keyboard.
pub fn render_task_form(f: &mut Frame, area: Rect, form: &TaskForm, focused: bool, new_key: &str, palette: &Palette) {
    let border = if focused { palette.accent } else { palette.fg };
    let title = if focused {
        "New task (Enter: add, Tab: next field, Esc: back)".to_string()
    } else {
        format!("{}: New task", new_key)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(border))
        .style(Style::default().fg(palette.fg).bg(palette.bg));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(CATEGORY_WIDTH),
            Constraint::Length(PRIORITY_WIDTH),
        ])
        .split(inner);

    let field_style = |field: TaskField| {
        if focused && form.current_field == field {
            Style::default().fg(palette.highlight_fg).bg(palette.highlight_bg)
        } else {
            Style::default().fg(palette.fg)
        }
    };

    let text_width = columns[0].width.saturating_sub(1) as usize;
    let (shown, cursor_col) = form.text.visible(text_width);
    let text_line = if form.text.is_empty() && !(focused && form.current_field == TaskField::Text) {
        Line::from(Span::styled(
            "Write a task...",
            Style::default().fg(palette.fg).add_modifier(Modifier::DIM),
        ))
    } else {
        Line::from(Span::styled(shown, Style::default().fg(palette.fg)))
    };
    f.render_widget(Paragraph::new(text_line), columns[0]);

    let category = Paragraph::new(Line::from(Span::styled(
        format!("◀ {} ▶", form.category),
        field_style(TaskField::Category),
    )));
    f.render_widget(category, columns[1]);

    let priority = Paragraph::new(Line::from(Span::styled(
        format!("◀ P{} ▶", form.priority),
        field_style(TaskField::Priority),
    )));
    f.render_widget(priority, columns[2]);

    if focused && form.current_field == TaskField::Text && columns[0].width > 0 {
        f.set_cursor_position(Position::new(columns[0].x + cursor_col as u16, columns[0].y));
    }
}

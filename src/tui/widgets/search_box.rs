use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::widgets::color::Palette;
use crate::tui::widgets::editor::Editor;

/// Search box above the list; places the cursor when `focused`
pub fn render_search_box(f: &mut Frame, area: Rect, query: &Editor, focused: bool, search_key: &str, palette: &Palette) {
    let border = if focused { palette.accent } else { palette.fg };
    let title = if focused {
        "Search (Enter: keep, Esc: clear)".to_string()
    } else {
        format!("{}: Search", search_key)
    };

    let inner_width = area.width.saturating_sub(2) as usize;
    let (shown, cursor_col) = query.visible(inner_width);

    let paragraph = Paragraph::new(shown)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(border))
                .style(Style::default().fg(palette.fg).bg(palette.bg)),
        )
        .style(Style::default().fg(palette.fg));

    f.render_widget(paragraph, area);

    if focused && area.height > 2 {
        f.set_cursor_position(Position::new(area.x + 1 + cursor_col as u16, area.y + 1));
    }
}

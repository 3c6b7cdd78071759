use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::cli::UPGRADE_MESSAGE;
use crate::tui::widgets::color::Palette;
use crate::tui::widgets::popup_area;

/// Informational "Upgrade to Pro" popup
pub fn render_upgrade(f: &mut Frame, area: Rect, palette: &Palette) {
    let popup_area = popup_area(area, 60, 50);
    f.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new(format!("{}\n\nPress Esc to close.", UPGRADE_MESSAGE))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("FocusList Pro")
                .title_alignment(Alignment::Center)
                .border_style(Style::default().fg(palette.accent).add_modifier(Modifier::BOLD))
                .style(Style::default().fg(palette.fg).bg(palette.bg)),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, popup_area);
}

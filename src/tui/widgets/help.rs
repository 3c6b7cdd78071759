use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::Config;
use crate::tui::widgets::color::Palette;
use crate::tui::widgets::popup_area;
use crate::utils::format_key_binding_for_display as key;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config, palette: &Palette) {
    let popup_area = popup_area(area, 60, 70);

    // Clear the background first - this prevents content from showing through
    f.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new(build_help_text(config))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help - Key Bindings")
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(palette.fg).bg(palette.bg)),
        )
        .style(Style::default().fg(palette.fg).bg(palette.bg))
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
}

pub fn build_help_text(config: &Config) -> String {
    let kb = &config.key_bindings;
    let mut text = String::new();

    text.push_str("Tasks:\n");
    text.push_str(&format!("  {}: New task\n", key(&kb.new)));
    text.push_str(&format!("  {} / Enter: Toggle done\n", key(&kb.toggle_done)));
    text.push_str(&format!("  {}: Delete task\n", key(&kb.delete)));
    text.push_str(&format!("  {} / {}: Move up/down\n", key(&kb.list_up), key(&kb.list_down)));
    text.push_str(&format!("  {}: Search\n", key(&kb.search)));
    text.push_str("  Esc: Clear search\n");
    text.push_str(&format!("  {}: Save now\n", key(&kb.save)));
    text.push('\n');

    text.push_str("New task form:\n");
    text.push_str("  Tab / Shift+Tab: Next/previous field\n");
    text.push_str("  ←/→: Change category or priority\n");
    text.push_str("  Enter: Add task\n");
    text.push_str("  Esc: Back to list\n");
    text.push('\n');

    text.push_str("General:\n");
    text.push_str(&format!("  {}: Quit\n", key(&kb.quit)));
    text.push_str(&format!("  {}: Show/hide help\n", key(&kb.help)));
    text.push_str(&format!("  {}: Upgrade to Pro\n", key(&kb.upgrade)));
    text.push_str("\nChanges are saved automatically.\n");

    text
}

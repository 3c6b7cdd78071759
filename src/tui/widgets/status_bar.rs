use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;

use crate::tui::widgets::color::{Palette, get_contrast_text_color};

const SEPARATOR: &str = " • ";
const ELLIPSIS: &str = "...";

pub fn render_status_bar(f: &mut Frame, area: Rect, message: Option<&String>, key_hints: &[String], palette: &Palette) {
    let max_width = area.width as usize;

    let (content, style) = match message {
        // Status messages get a highlighted background for visibility
        Some(msg) => (
            truncate(msg, max_width),
            Style::default()
                .fg(get_contrast_text_color(palette.highlight_bg))
                .bg(palette.highlight_bg)
                .add_modifier(Modifier::BOLD),
        ),
        None => (
            fit_hints(key_hints, max_width),
            Style::default().fg(palette.fg).bg(palette.bg),
        ),
    };

    f.render_widget(Paragraph::new(content).style(style), area);
}

fn truncate(text: &str, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        return text.to_string();
    }
    let keep = max_width.saturating_sub(ELLIPSIS.len());
    text.chars().take(keep).collect::<String>() + ELLIPSIS
}

/// Join as many hints as fit, ending with an ellipsis when some had to be dropped
pub fn fit_hints(key_hints: &[String], max_width: usize) -> String {
    let mut line = String::new();
    for (i, hint) in key_hints.iter().enumerate() {
        let sep = if i == 0 { "" } else { SEPARATOR };
        let would_be = line.chars().count() + sep.chars().count() + hint.chars().count();
        if would_be > max_width {
            if line.is_empty() {
                return truncate(hint, max_width);
            }
            if line.chars().count() + ELLIPSIS.len() > max_width {
                line = line.chars().take(max_width.saturating_sub(ELLIPSIS.len())).collect();
            }
            line.push_str(ELLIPSIS);
            return line;
        }
        line.push_str(sep);
        line.push_str(hint);
    }
    line
}

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{
    Block, Borders, List, ListItem, ListState, Scrollbar, ScrollbarOrientation, ScrollbarState,
    StatefulWidget,
};

use crate::store::{FilteredView, TaskStore};
use crate::tui::widgets::color::Palette;

pub fn render_task_list(
    f: &mut Frame,
    area: Rect,
    store: &TaskStore,
    view: &FilteredView,
    list_state: &mut ListState,
    palette: &Palette,
) {
    // Account for borders, padding and the scrollbar column
    let max_width = area.width.saturating_sub(5) as usize;

    let items: Vec<ListItem> = view
        .rows(store)
        .map(|(_, task)| {
            let mut line = task.display_line();
            if line.chars().count() > max_width {
                line = line.chars().take(max_width.saturating_sub(3)).collect::<String>() + "...";
            }
            let style = if task.done {
                Style::default().fg(palette.fg).add_modifier(Modifier::DIM)
            } else {
                Style::default().fg(palette.fg)
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let list_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1), // Scrollbar
        ])
        .split(area);
    let list_area = list_areas[0];
    let scrollbar_area = list_areas[1];

    let title = if view.query().trim().is_empty() {
        format!("Tasks ({})", store.len())
    } else {
        format!("Tasks ({} of {})", view.len(), store.len())
    };

    let total_items = items.len();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default().fg(palette.fg).bg(palette.bg))
        .highlight_style(Style::default().fg(palette.highlight_fg).bg(palette.highlight_bg));

    StatefulWidget::render(list, list_area, f.buffer_mut(), list_state);

    let visible_items = list_area.height.saturating_sub(2) as usize;
    if total_items > visible_items && scrollbar_area.width > 0 && list_area.height > 2 {
        let scrollbar_inner_area = Rect::new(
            scrollbar_area.x,
            list_area.y + 1, // Start after top border
            scrollbar_area.width,
            list_area.height.saturating_sub(2),
        );
        let mut scrollbar_state = ScrollbarState::new(total_items)
            .position(list_state.selected().unwrap_or(0));
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(None)
            .end_symbol(None);
        StatefulWidget::render(scrollbar, scrollbar_inner_area, f.buffer_mut(), &mut scrollbar_state);
    }
}

use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};

pub struct Layout {
    pub inner_area: Rect, // Area inside the outer border
    pub form_area: Rect,
    pub search_area: Rect,
    pub list_area: Rect,
    pub stats_area: Rect,
    pub status_area: Rect,
}

impl Layout {
    /// Minimum terminal dimensions required for the application
    /// Height: form (3) + search (3) + list (3) + stats (1) + status (1)
    pub const MIN_WIDTH: u16 = 40;
    pub const MIN_HEIGHT: u16 = 11;

    pub fn calculate(size: Rect) -> Self {
        let min_width_with_border = Self::MIN_WIDTH + 2;
        let min_height_with_border = Self::MIN_HEIGHT + 2;
        let width = size.width.max(min_width_with_border);
        let height = size.height.max(min_height_with_border);
        let size = Rect::new(size.x, size.y, width, height);

        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            size.width.saturating_sub(2),
            size.height.saturating_sub(2),
        );

        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // New task form
                Constraint::Length(3), // Search box
                Constraint::Min(3),    // Task list
                Constraint::Length(1), // Stats
                Constraint::Length(1), // Status / key hints
            ])
            .split(inner_area);

        Self {
            inner_area,
            form_area: vertical[0],
            search_area: vertical[1],
            list_area: vertical[2],
            stats_area: vertical[3],
            status_area: vertical[4],
        }
    }
}

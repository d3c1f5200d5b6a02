use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Wide,   // ≥100 cols: typing area + sidebar, keyboard, progress bar
    Medium, // 70-99 cols: full-width typing, stats in the header, keyboard
    Narrow, // <70 cols: full-width typing, stats in the header
}

impl LayoutTier {
    pub fn from_area(area: Rect) -> Self {
        if area.width >= 100 {
            LayoutTier::Wide
        } else if area.width >= 70 {
            LayoutTier::Medium
        } else {
            LayoutTier::Narrow
        }
    }

    /// The Arabic keyboard needs roughly 70 columns and six rows.
    pub fn show_keyboard(&self, height: u16) -> bool {
        height >= 22 && *self != LayoutTier::Narrow
    }

    pub fn show_progress_bar(&self, height: u16) -> bool {
        height >= 16
    }

    pub fn show_sidebar(&self) -> bool {
        *self == LayoutTier::Wide
    }
}

pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub sidebar: Option<Rect>,
    pub notice: Rect,
    pub footer: Rect,
    pub tier: LayoutTier,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let tier = LayoutTier::from_area(area);

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        let (main, sidebar) = if tier.show_sidebar() {
            let horizontal = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
                .split(vertical[1]);
            (horizontal[0], Some(horizontal[1]))
        } else {
            (vertical[1], None)
        };

        Self {
            header: vertical[0],
            main,
            sidebar,
            notice: vertical[2],
            footer: vertical[3],
            tier,
        }
    }
}

/// Smallest popup that still fits the settings list.
const POPUP_MIN: (u16, u16) = (48, 14);

/// A popup covering the given share of `area`, centered. Never larger than
/// `area` itself.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let scale = |total: u16, percent: u16, min: u16| {
        let share = (u32::from(total) * u32::from(percent.min(100)) / 100) as u16;
        share.max(min).min(total)
    };
    let width = scale(area.width, percent_x, POPUP_MIN.0);
    let height = scale(area.height, percent_y, POPUP_MIN.1);

    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers() {
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 120, 40)), LayoutTier::Wide);
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 80, 40)), LayoutTier::Medium);
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 50, 40)), LayoutTier::Narrow);
    }

    #[test]
    fn test_sidebar_only_when_wide() {
        assert!(AppLayout::new(Rect::new(0, 0, 120, 40)).sidebar.is_some());
        assert!(AppLayout::new(Rect::new(0, 0, 80, 40)).sidebar.is_none());
    }

    #[test]
    fn test_centered_rect_stays_inside() {
        let area = Rect::new(0, 0, 40, 10);
        let rect = centered_rect(50, 50, area);
        assert!(rect.width <= area.width);
        assert!(rect.height <= area.height);
    }
}

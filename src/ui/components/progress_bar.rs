use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

/// Share of the practice text typed so far.
pub struct ProgressBar<'a> {
    pub label: String,
    pub ratio: f64,
    pub theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(label: String, ratio: f64, theme: &'a Theme) -> Self {
        Self {
            label,
            ratio: ratio.clamp(0.0, 1.0),
            theme,
        }
    }
}

fn filled_width(ratio: f64, width: u16) -> u16 {
    ((ratio * width as f64) as u16).min(width)
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.label))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled = filled_width(self.ratio, inner.width);
        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled {
                Style::default().fg(colors.bg()).bg(colors.progress_done())
            } else {
                Style::default().fg(colors.fg()).bg(colors.progress_left())
            };
            buf[(x, inner.y)].set_style(style);
        }

        let percent = format!("{:.0}%", self.ratio * 100.0);
        let label_x = inner.x + (inner.width.saturating_sub(percent.len() as u16)) / 2;
        buf.set_string(label_x, inner.y, &percent, Style::default().fg(colors.fg()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_width_bounds() {
        assert_eq!(filled_width(0.0, 40), 0);
        assert_eq!(filled_width(0.5, 40), 20);
        assert_eq!(filled_width(1.0, 40), 40);
    }
}

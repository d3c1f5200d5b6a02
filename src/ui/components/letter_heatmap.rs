use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Widget};

use crate::engine::letter_stats::{LetterStat, LetterStatistics};
use crate::keyboard::layout::KeyboardLayout;
use crate::ui::components::keyboard_diagram::{KEY_STEP, ROW_OFFSETS};
use crate::ui::theme::{Theme, hue_color};

/// Per-letter accuracy laid over the active keyboard, plus the letters that
/// need the most work.
pub struct LetterHeatmap<'a> {
    layout: &'a KeyboardLayout,
    letters: &'a LetterStatistics,
    theme: &'a Theme,
}

impl<'a> LetterHeatmap<'a> {
    pub fn new(layout: &'a KeyboardLayout, letters: &'a LetterStatistics, theme: &'a Theme) -> Self {
        Self {
            layout,
            letters,
            theme,
        }
    }

    fn letter_style(&self, stat: Option<&LetterStat>) -> Style {
        match stat.and_then(LetterStat::hue) {
            Some(hue) => Style::default().fg(hue_color(hue)),
            None => Style::default().fg(self.theme.colors.pending()),
        }
    }

    fn render_keyboard(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(Line::from(Span::styled(
                " Letter Accuracy ",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )))
            .border_style(Style::default().fg(colors.accent()));
        let inner = block.inner(area);
        block.render(area, buf);

        // Shifted characters sit dimmed above their base row when there is room.
        let show_shifted = inner.height as usize >= self.layout.rows.len() * 2;

        for (row_idx, row) in self.layout.rows.iter().enumerate() {
            let base_y = if show_shifted {
                inner.y + row_idx as u16 * 2 + 1
            } else {
                inner.y + row_idx as u16
            };
            if base_y >= inner.y + inner.height {
                break;
            }
            let offset = ROW_OFFSETS.get(row_idx).copied().unwrap_or(0);

            for (col_idx, key) in row.iter().enumerate() {
                let x = inner.x + offset + col_idx as u16 * KEY_STEP;
                if x + KEY_STEP > inner.x + inner.width {
                    break;
                }

                let base = self.letters.get(key.base);
                buf.set_string(x, base_y, cell(key.base, base), self.letter_style(base));

                if let (true, Some(shifted)) = (show_shifted, key.shifted) {
                    let stat = self.letters.get(shifted);
                    buf.set_string(
                        x,
                        base_y - 1,
                        cell(shifted, stat),
                        self.letter_style(stat).add_modifier(Modifier::DIM),
                    );
                }
            }
        }
    }

    fn render_weakest(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(Line::from(Span::styled(
                " Weakest Letters ",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )))
            .border_style(Style::default().fg(colors.accent()));
        let inner = block.inner(area);
        block.render(area, buf);

        let weakest = self.letters.weakest(inner.height as usize);
        if weakest.is_empty() {
            buf.set_string(
                inner.x,
                inner.y,
                " Not enough data",
                Style::default().fg(colors.pending()),
            );
            return;
        }

        for (i, (ch, stat)) in weakest.iter().enumerate() {
            let y = inner.y + i as u16;
            buf.set_string(inner.x, y, weakest_row(*ch, stat), self.letter_style(Some(stat)));
        }
    }
}

fn weakest_row(ch: char, stat: &LetterStat) -> String {
    format!(
        " {ch}  {:>5.1}%  {} missed",
        stat.accuracy().unwrap_or(0.0) * 100.0,
        stat.mistakes()
    )
}

/// Glyph plus accuracy percent, padded to one key step.
fn cell(ch: char, stat: Option<&LetterStat>) -> String {
    let glyph = if crate::engine::matcher::is_harakah(ch) {
        format!("\u{25CC}{ch}")
    } else {
        ch.to_string()
    };
    match stat.and_then(LetterStat::accuracy) {
        Some(acc) => format!("{glyph}{:<3}", (acc * 100.0).round() as u32),
        None => format!("{glyph}   "),
    }
}

impl Widget for LetterHeatmap<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(70), Constraint::Length(28)])
            .split(area);

        self.render_keyboard(columns[0], buf);
        self.render_weakest(columns[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_without_data() {
        assert_eq!(cell('ب', None), "ب   ");
    }

    #[test]
    fn test_cell_with_accuracy() {
        let stat = LetterStat {
            attempts: 4,
            successes: 3,
        };
        assert_eq!(cell('ب', Some(&stat)), "ب75 ");
    }

    #[test]
    fn test_weakest_row_counts_misses() {
        let stat = LetterStat {
            attempts: 4,
            successes: 3,
        };
        assert_eq!(weakest_row('ب', &stat), " ب   75.0%  1 missed");
    }
}

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Widget};

use crate::keyboard::layout::{KeyDefinition, KeyHint, KeyboardLayout};
use crate::ui::theme::Theme;

pub struct KeyboardDiagram<'a> {
    pub layout: &'a KeyboardLayout,
    pub title: &'a str,
    pub next_key: Option<KeyHint>,
    pub theme: &'a Theme,
}

impl<'a> KeyboardDiagram<'a> {
    pub fn new(
        layout: &'a KeyboardLayout,
        title: &'a str,
        next_key: Option<KeyHint>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            layout,
            title,
            next_key,
            theme,
        }
    }
}

pub const KEY_STEP: u16 = 5;
pub const ROW_OFFSETS: &[u16] = &[0, 2, 3, 5];

/// Cell text for a key: the Latin label next to the Arabic it produces.
pub fn key_cell(key: &KeyDefinition, shifted: bool) -> String {
    let ch = if shifted {
        key.shifted.unwrap_or(' ')
    } else {
        key.base
    };
    // Harakat need a carrier to be visible.
    let glyph = if crate::engine::matcher::is_harakah(ch) {
        format!("\u{25CC}{ch}")
    } else {
        ch.to_string()
    };
    format!("{}{glyph}", key.label)
}

/// Shifted hints carry the shifted label, so match on either.
fn is_hinted(key: &KeyDefinition, hint: KeyHint) -> bool {
    if hint.needs_shift {
        key.shifted_label == Some(hint.label)
    } else {
        key.label == hint.label
    }
}

impl Widget for KeyboardDiagram<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let shift_needed = self.next_key.is_some_and(|k| k.needs_shift);

        let title = if shift_needed {
            format!(" {} \u{21E7} ", self.title)
        } else {
            format!(" {} ", self.title)
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 4 || inner.width < 40 {
            return;
        }

        for (row_idx, row) in self.layout.rows.iter().enumerate() {
            let y = inner.y + row_idx as u16;
            if y >= inner.y + inner.height {
                break;
            }
            let offset = ROW_OFFSETS.get(row_idx).copied().unwrap_or(0);

            for (col_idx, key) in row.iter().enumerate() {
                let x = inner.x + offset + col_idx as u16 * KEY_STEP;
                if x + KEY_STEP > inner.x + inner.width {
                    break;
                }

                let is_next = self.next_key.is_some_and(|hint| is_hinted(key, hint));
                let style = if is_next {
                    Style::default()
                        .fg(colors.bg())
                        .bg(colors.key_hint())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.fg())
                };

                let display = key_cell(key, is_next && shift_needed);
                buf.set_string(x, y, &display, style);
            }
        }
    }
}

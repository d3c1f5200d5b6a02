use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::matcher::MatchKind;
use crate::session::view::{CharView, PracticeView};
use crate::ui::theme::Theme;

const SPACE_MARKER: &str = "\u{00b7}";

pub struct TypingArea<'a> {
    view: &'a PracticeView,
    rejected: bool,
    theme: &'a Theme,
}

impl<'a> TypingArea<'a> {
    pub fn new(view: &'a PracticeView, rejected: bool, theme: &'a Theme) -> Self {
        Self {
            view,
            rejected,
            theme,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tone {
    Correct,
    Close,
    Wrong,
}

/// Display text and tone for one already-typed position. A mistyped space
/// gets a visible marker since a plain blank would hide the error.
fn classified_token(ch: &CharView) -> (String, Tone) {
    let tone = match ch.classification.kind() {
        MatchKind::Exact => Tone::Correct,
        MatchKind::Close => Tone::Close,
        MatchKind::Wrong => Tone::Wrong,
    };
    let display = if ch.classification.space && tone == Tone::Wrong {
        SPACE_MARKER.to_string()
    } else {
        ch.target.to_string()
    };
    (display, tone)
}

impl TypingArea<'_> {
    fn tone_style(&self, tone: Tone) -> Style {
        let colors = &self.theme.colors;
        match tone {
            Tone::Correct => Style::default().fg(colors.exact()),
            Tone::Close => Style::default().fg(colors.close()),
            Tone::Wrong => Style::default()
                .fg(colors.wrong())
                .bg(colors.wrong_bg())
                .add_modifier(Modifier::UNDERLINED),
        }
    }

    fn classified_spans(&self, chars: &[CharView]) -> Vec<Span<'static>> {
        chars
            .iter()
            .map(|ch| {
                let (display, tone) = classified_token(ch);
                Span::styled(display, self.tone_style(tone))
            })
            .collect()
    }

    fn active_line(&self) -> Line<'static> {
        let colors = &self.theme.colors;
        let mut spans = self.classified_spans(&self.view.typed);

        if let Some(next) = self.view.next_char {
            let cursor = if self.rejected {
                Style::default().fg(colors.bg()).bg(colors.mistake())
            } else {
                Style::default()
                    .fg(colors.cursor_fg())
                    .bg(colors.cursor_bg())
            };
            let display = if next == ' ' {
                SPACE_MARKER.to_string()
            } else {
                next.to_string()
            };
            spans.push(Span::styled(display, cursor));
        }
        spans.push(Span::styled(
            self.view.remaining.clone(),
            Style::default().fg(colors.fg()),
        ));
        Line::from(spans)
    }
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(if self.rejected {
                colors.mistake()
            } else {
                colors.border()
            }))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);

        let mut lines: Vec<Line> = Vec::with_capacity(self.view.lines.len());
        for (index, raw) in self.view.lines.iter().enumerate() {
            let line = if let Some(prior) = self.view.prior_lines.get(index) {
                Line::from(self.classified_spans(prior))
            } else if index == self.view.active_index {
                self.active_line()
            } else {
                Line::from(Span::styled(
                    raw.clone(),
                    Style::default().fg(colors.pending()),
                ))
            };
            lines.push(line);
        }

        // Keep the active line roughly centered once the text overflows.
        let visible = inner.height as usize;
        let scroll = self
            .view
            .active_index
            .saturating_sub(visible / 2)
            .min(lines.len().saturating_sub(visible));

        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Right)
            .scroll((scroll as u16, 0))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::matcher::Classification;

    fn view(target: char, exact: bool, close: bool) -> CharView {
        CharView {
            target,
            typed: Some('x'),
            classification: Classification {
                exact,
                close,
                space: target == ' ',
            },
        }
    }

    #[test]
    fn test_tokens_follow_classification() {
        assert_eq!(classified_token(&view('ا', true, false)), ("ا".to_string(), Tone::Correct));
        assert_eq!(classified_token(&view('أ', false, true)), ("أ".to_string(), Tone::Close));
        assert_eq!(classified_token(&view('ب', false, false)), ("ب".to_string(), Tone::Wrong));
    }

    #[test]
    fn test_mistyped_space_gets_marker() {
        assert_eq!(
            classified_token(&view(' ', false, false)),
            (SPACE_MARKER.to_string(), Tone::Wrong)
        );
        assert_eq!(classified_token(&view(' ', true, false)).0, " ");
    }
}

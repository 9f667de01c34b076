use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use typetutor::session::buffer::AnswerBuffer;

use crate::ui::theme::Theme;

/// Words past this point are never on screen at once.
const MAX_VISIBLE_WORDS: usize = 80;

pub struct TypingArea<'a> {
    buffer: &'a AnswerBuffer,
    typed: &'a str,
    theme: &'a Theme,
}

impl<'a> TypingArea<'a> {
    pub fn new(buffer: &'a AnswerBuffer, typed: &'a str, theme: &'a Theme) -> Self {
        Self {
            buffer,
            typed,
            theme,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CharState {
    Correct,
    Incorrect,
    /// Typed past the end of the target word.
    Extra,
    Cursor,
    Pending,
}

/// Compare the typed prefix against the target word, one cell per character.
fn classify(target: &str, typed: &str) -> Vec<(char, CharState)> {
    let target: Vec<char> = target.chars().collect();
    let typed: Vec<char> = typed.chars().collect();
    let mut cells = Vec::with_capacity(target.len().max(typed.len()));

    for (i, &ch) in target.iter().enumerate() {
        let state = match typed.get(i) {
            Some(&t) if t == ch => CharState::Correct,
            Some(_) => CharState::Incorrect,
            None if i == typed.len() => CharState::Cursor,
            None => CharState::Pending,
        };
        let shown = match (state, typed.get(i)) {
            (CharState::Incorrect, Some(&t)) => t,
            _ => ch,
        };
        cells.push((shown, state));
    }
    for &t in typed.iter().skip(target.len()) {
        cells.push((t, CharState::Extra));
    }
    cells
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let mut spans: Vec<Span> = Vec::new();

        let mut cursor_on_space = false;

        for (i, word) in self.buffer.words().take(MAX_VISIBLE_WORDS).enumerate() {
            if i > 0 {
                // A fully typed head word leaves the cursor on the separator
                let sep_style = if i == 1 && cursor_on_space {
                    Style::default().bg(colors.text_cursor_bg())
                } else {
                    Style::default()
                };
                spans.push(Span::styled(" ", sep_style));
                spans.push(Span::styled(
                    word.to_string(),
                    Style::default().fg(colors.text_pending()),
                ));
                continue;
            }

            cursor_on_space = self.typed.chars().count() >= word.chars().count();
            for (ch, state) in classify(word, self.typed) {
                let style = match state {
                    CharState::Correct => Style::default().fg(colors.text_correct()),
                    CharState::Incorrect | CharState::Extra => Style::default()
                        .fg(colors.text_incorrect())
                        .bg(colors.text_incorrect_bg())
                        .add_modifier(Modifier::UNDERLINED),
                    CharState::Cursor => Style::default()
                        .fg(colors.text_cursor_fg())
                        .bg(colors.text_cursor_bg()),
                    CharState::Pending => Style::default().fg(colors.fg()),
                };
                spans.push(Span::styled(ch.to_string(), style));
            }
        }

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        let paragraph = Paragraph::new(Line::from(spans))
            .block(block)
            .wrap(Wrap { trim: true });

        paragraph.render(area, buf);
    }
}

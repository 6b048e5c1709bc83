use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::Theme;
use crate::ui::{Component, EventResult, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInputEvent {
    Submitted,
    Cancelled,
}

/// Single-line text field rendered inside a bordered box.
///
/// The cursor is tracked in characters, so accented input such as `ñ`
/// edits cleanly.
pub struct TextInput {
    label: String,
    value: String,
    cursor: usize,
    placeholder: Option<String>,
    /// Maximum length in characters; further input is dropped.
    max_len: Option<usize>,
    masked: bool,
    focused: bool,
}

impl TextInput {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: String::new(),
            cursor: 0,
            placeholder: None,
            max_len: None,
            masked: false,
            focused: false,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub const fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    pub const fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub const fn is_masked(&self) -> bool {
        self.masked
    }

    pub const fn set_masked(&mut self, masked: bool) {
        self.masked = masked;
    }

    pub const fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn insert_char(&mut self, c: char) {
        if self.max_len.is_some_and(|max| self.char_len() >= max) {
            return;
        }
        let at = self.byte_offset(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    fn delete_char_before_cursor(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_offset(self.cursor);
            self.value.remove(at);
        }
    }

    fn delete_char_at_cursor(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_offset(self.cursor);
            self.value.remove(at);
        }
    }

    fn delete_word_before_cursor(&mut self) {
        let chars: Vec<char> = self.value.chars().collect();
        let mut pos = self.cursor;
        while pos > 0 && chars[pos - 1] == ' ' {
            pos -= 1;
        }
        while pos > 0 && chars[pos - 1] != ' ' {
            pos -= 1;
        }
        let (start, end) = (self.byte_offset(pos), self.byte_offset(self.cursor));
        self.value.drain(start..end);
        self.cursor = pos;
    }

    fn clear_line(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    fn display_value(&self) -> String {
        if self.masked {
            "•".repeat(self.char_len())
        } else {
            self.value.clone()
        }
    }
}

impl Component for TextInput {
    type Output = TextInputEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        Ok(match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => TextInputEvent::Submitted.into(),
            (KeyCode::Esc, _) => TextInputEvent::Cancelled.into(),

            (KeyCode::Backspace, KeyModifiers::ALT) | (KeyCode::Char('w'), KeyModifiers::CONTROL) => {
                self.delete_word_before_cursor();
                EventResult::Consumed
            }
            (KeyCode::Backspace, _) => {
                self.delete_char_before_cursor();
                EventResult::Consumed
            }
            (KeyCode::Delete, _) => {
                self.delete_char_at_cursor();
                EventResult::Consumed
            }

            (KeyCode::Left, _) => {
                self.cursor = self.cursor.saturating_sub(1);
                EventResult::Consumed
            }
            (KeyCode::Right, _) => {
                self.cursor = (self.cursor + 1).min(self.char_len());
                EventResult::Consumed
            }
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.cursor = 0;
                EventResult::Consumed
            }
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.cursor = self.char_len();
                EventResult::Consumed
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                self.clear_line();
                EventResult::Consumed
            }

            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.insert_char(c);
                EventResult::Consumed
            }

            // Unhandled chords go back to the owner (e.g. form shortcuts).
            _ => EventResult::Ignored,
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let input_style = Style::default().fg(theme.text());
        let cursor_style = Style::default()
            .fg(theme.base())
            .bg(theme.text())
            .add_modifier(Modifier::BOLD);
        let placeholder_style = Style::default().fg(theme.overlay0());

        let line = match (&self.placeholder, self.value.is_empty()) {
            (Some(placeholder), true) => {
                let mut spans = Vec::new();
                if self.focused {
                    spans.push(Span::styled(" ", cursor_style));
                }
                spans.push(Span::styled(placeholder.clone(), placeholder_style));
                Line::from(spans)
            }
            _ => {
                let shown = self.display_value();
                let before: String = shown.chars().take(self.cursor).collect();
                let at = shown.chars().nth(self.cursor).unwrap_or(' ');
                let after: String = shown.chars().skip(self.cursor + 1).collect();
                if self.focused {
                    Line::from(vec![
                        Span::styled(before, input_style),
                        Span::styled(at.to_string(), cursor_style),
                        Span::styled(after, input_style),
                    ])
                } else {
                    Line::from(Span::styled(shown, input_style))
                }
            }
        };

        let border_color = if self.focused {
            theme.lavender()
        } else {
            theme.border()
        };
        let block = Block::default()
            .title(format!(" {} ", self.label))
            .title_style(Style::default().fg(if self.focused {
                theme.mauve()
            } else {
                theme.subtext0()
            }))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));

        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(input: &mut TextInput, text: &str) {
        for c in text.chars() {
            input.handle_key(key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn test_editing_multibyte_text() {
        let mut input = TextInput::new("Email");
        type_text(&mut input, "muñoz");
        input.handle_key(key(KeyCode::Left)).unwrap();
        input.handle_key(key(KeyCode::Left)).unwrap();
        input.handle_key(key(KeyCode::Backspace)).unwrap();
        assert_eq!(input.value(), "muoz");
        input.handle_key(key(KeyCode::End)).unwrap();
        type_text(&mut input, "@x.com");
        assert_eq!(input.value(), "muoz@x.com");
    }

    #[test]
    fn test_word_delete_and_clear() {
        let mut input = TextInput::new("Email");
        type_text(&mut input, "ana maria");
        input
            .handle_key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::ALT))
            .unwrap();
        assert_eq!(input.value(), "ana ");
        input
            .handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL))
            .unwrap();
        assert_eq!(input.value(), "");
    }

    #[test]
    fn test_submit_and_unhandled_chords() {
        let mut input = TextInput::new("Contraseña").masked();
        type_text(&mut input, "secreto");
        assert_eq!(input.display_value(), "•••••••");
        assert_eq!(
            input.handle_key(key(KeyCode::Enter)).unwrap(),
            EventResult::Event(TextInputEvent::Submitted)
        );
        assert!(matches!(
            input
                .handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL))
                .unwrap(),
            EventResult::Ignored
        ));
    }

    #[test]
    fn test_max_len_drops_extra_input() {
        let mut input = TextInput::new("CVV").with_max_len(4);
        type_text(&mut input, "123456");
        assert_eq!(input.value(), "1234");
        input.handle_key(key(KeyCode::Backspace)).unwrap();
        type_text(&mut input, "9");
        assert_eq!(input.value(), "1239");
    }
}

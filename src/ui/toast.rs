use std::collections::VecDeque;
use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use tokio::time::Instant;

use super::Component;
use crate::Theme;

const TOAST_DURATION: Duration = Duration::from_secs(3);
const MAX_VISIBLE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastType {
    Success,
    Info,
    Warning,
}

#[derive(Debug)]
pub struct Toast {
    message: String,
    toast_type: ToastType,
    created_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>, toast_type: ToastType) -> Self {
        Self {
            message: message.into(),
            toast_type,
            created_at: Instant::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ToastType::Success)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, ToastType::Info)
    }

    fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= TOAST_DURATION
    }
}

/// Short-lived notifications stacked in the bottom-right corner.
#[derive(Debug, Default)]
pub struct ToastManager {
    toasts: VecDeque<Toast>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, toast: Toast) {
        tracing::debug!(message = %toast.message, kind = ?toast.toast_type, "Showing toast");
        self.toasts.push_back(toast);
        while self.toasts.len() > MAX_VISIBLE {
            self.toasts.pop_front();
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

impl Component for ToastManager {
    type Output = ();

    fn handle_tick(&mut self) {
        self.toasts.retain(|t| !t.is_expired());
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let toast_height = 3u16;
        let toast_width = 50u16.min(area.width.saturating_sub(4));
        let spacing = 1u16;

        // Newest toast at the bottom, older ones stacked upward.
        for (i, toast) in self.toasts.iter().rev().enumerate() {
            let offset = u16::try_from(i).unwrap_or(u16::MAX) * (toast_height + spacing);
            let Some(y) = (area.y + area.height).checked_sub(toast_height + offset + 1) else {
                break;
            };
            if y < area.y {
                break;
            }
            let x = area.x + area.width.saturating_sub(toast_width + 2);
            let toast_area = Rect::new(x, y, toast_width, toast_height);

            let (border_color, icon) = match toast.toast_type {
                ToastType::Success => (theme.green(), "✓"),
                ToastType::Info => (theme.blue(), "ℹ"),
                ToastType::Warning => (theme.yellow(), "!"),
            };

            frame.render_widget(Clear, toast_area);
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .style(Style::default().bg(theme.surface0()));

            let paragraph = Paragraph::new(format!("{icon} {}", toast.message))
                .style(
                    Style::default()
                        .fg(theme.text())
                        .add_modifier(Modifier::BOLD),
                )
                .alignment(Alignment::Center)
                .block(block);

            frame.render_widget(paragraph, toast_area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_toasts_expire_and_are_capped() {
        let mut toasts = ToastManager::new();
        for i in 0..5 {
            toasts.show(Toast::info(format!("aviso {i}")));
        }
        assert_eq!(toasts.len(), MAX_VISIBLE);

        tokio::time::advance(Duration::from_millis(2999)).await;
        toasts.handle_tick();
        assert_eq!(toasts.len(), MAX_VISIBLE);

        tokio::time::advance(Duration::from_millis(1)).await;
        toasts.handle_tick();
        assert!(toasts.is_empty());
    }
}

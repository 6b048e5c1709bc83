use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use super::{NavIntent, field_line, panel};
use crate::Theme;
use crate::config::{BookingAction, GlobalAction, KeyResolver};
use crate::model::BookingTarget;
use crate::model::booking::format_euros;
use crate::ui::{EventResult, Keybinding, Result, Screen};

/// Summary of the chosen service before payment.
pub struct ConfirmServiceScreen {
    target: BookingTarget,
    resolver: Arc<KeyResolver>,
}

impl ConfirmServiceScreen {
    pub const fn new(target: BookingTarget, resolver: Arc<KeyResolver>) -> Self {
        Self { target, resolver }
    }
}

impl Screen for ConfirmServiceScreen {
    type Output = NavIntent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.resolver.matches_booking(&key, BookingAction::Confirm) {
            return Ok(NavIntent::ConfirmDetails.into());
        }
        if self.resolver.matches_global(&key, GlobalAction::Back) {
            return Ok(NavIntent::ReturnToCatalog.into());
        }
        Ok(EventResult::Ignored)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let card = area.centered(Constraint::Max(72), Constraint::Length(18));
        let block = panel(" Confirma tu reserva ", theme);
        let inner = block.inner(card);
        frame.render_widget(block, card);

        let [details, description, action] = Layout::vertical([
            Constraint::Length(8),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(inner);

        let t = &self.target;
        let lines = vec![
            Line::from(Span::styled(
                t.name.clone(),
                Style::default()
                    .fg(theme.lavender())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            field_line("Proveedor", t.provider.clone(), theme),
            field_line("Fecha", t.date.format("%d/%m/%Y").to_string(), theme),
            field_line("Hora", t.time.format("%H:%M").to_string(), theme),
            field_line("Ubicación", t.location.clone(), theme),
            field_line("Precio", format_euros(u64::from(t.price) * 100), theme),
        ];
        frame.render_widget(Paragraph::new(lines), details);

        frame.render_widget(
            Paragraph::new(Span::styled(
                t.description.clone(),
                Style::default().fg(theme.subtext0()),
            ))
            .wrap(Wrap { trim: true }),
            description,
        );

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(
                    format!(" {} ", self.resolver.display_booking(BookingAction::Confirm)),
                    Style::default()
                        .fg(theme.base())
                        .bg(theme.green())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" Continuar al pago", Style::default().fg(theme.text())),
            ])),
            action,
        );
    }

    fn breadcrumbs(&self) -> Vec<String> {
        vec!["Catálogo".to_string(), self.target.name.clone()]
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        vec![Keybinding::hint(
            self.resolver.display_booking(BookingAction::Confirm),
            "Continuar al pago",
        )]
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::model::booking::sample_target;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_confirm_and_back() {
        let mut screen =
            ConfirmServiceScreen::new(sample_target("1"), Arc::new(KeyResolver::default()));
        assert_eq!(
            screen.handle_key(key(KeyCode::Enter)).unwrap(),
            EventResult::Event(NavIntent::ConfirmDetails)
        );
        assert_eq!(
            screen.handle_key(key(KeyCode::Esc)).unwrap(),
            EventResult::Event(NavIntent::ReturnToCatalog)
        );
        assert_eq!(
            screen.handle_key(key(KeyCode::Char('q'))).unwrap(),
            EventResult::Ignored
        );
    }
}

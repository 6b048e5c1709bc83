use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use super::{NavIntent, field_line, panel};
use crate::Theme;
use crate::config::{BookingAction, GlobalAction, KeyResolver};
use crate::model::Booking;
use crate::model::booking::format_euros;
use crate::ui::{EventResult, Keybinding, Result, Screen};

const NEXT_STEPS: &[&str] = &[
    "El proveedor revisará tu solicitud y te contactará para confirmar",
    "Recibirás un email con toda la información de tu reserva",
    "Te enviaremos un recordatorio 24 horas antes de tu cita",
];

pub struct BookingSuccessScreen {
    booking: Booking,
    resolver: Arc<KeyResolver>,
}

impl BookingSuccessScreen {
    pub const fn new(booking: Booking, resolver: Arc<KeyResolver>) -> Self {
        Self { booking, resolver }
    }
}

impl Screen for BookingSuccessScreen {
    type Output = NavIntent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.resolver.matches_booking(&key, BookingAction::ViewBookings) {
            return Ok(NavIntent::ViewBookings.into());
        }
        if self.resolver.matches_global(&key, GlobalAction::Back) {
            return Ok(NavIntent::ReturnToCatalog.into());
        }
        Ok(EventResult::Ignored)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let content = area.centered(Constraint::Max(76), Constraint::Length(20));
        let [headline, reference, details, steps] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(5),
            Constraint::Min(5),
        ])
        .areas(content);

        frame.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(
                    "✓ ¡Tu reserva ha sido realizada con éxito!",
                    Style::default()
                        .fg(theme.green())
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "Hemos confirmado tu reserva exitosamente",
                    Style::default().fg(theme.subtext1()),
                )),
            ])
            .alignment(Alignment::Center),
            headline,
        );

        frame.render_widget(
            Paragraph::new(Span::styled(
                self.booking.reference.clone(),
                Style::default()
                    .fg(theme.lavender())
                    .add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center)
            .block(panel(" Número de reserva ", theme)),
            reference,
        );

        let b = &self.booking;
        frame.render_widget(
            Paragraph::new(vec![
                field_line("Servicio", b.target.name.clone(), theme),
                field_line("Cuándo", b.target.schedule(), theme),
                field_line("Pago", b.method.label(), theme),
                field_line("Total", format_euros(b.total), theme),
            ]),
            details,
        );

        let mut lines = vec![Line::from(Span::styled(
            "¿Qué sigue?",
            Style::default()
                .fg(theme.text())
                .add_modifier(Modifier::BOLD),
        ))];
        lines.extend(NEXT_STEPS.iter().map(|step| {
            Line::from(vec![
                Span::styled("  • ", Style::default().fg(theme.peach())),
                Span::styled(*step, Style::default().fg(theme.subtext0())),
            ])
        }));
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), steps);
    }

    fn breadcrumbs(&self) -> Vec<String> {
        vec!["Reserva confirmada".to_string()]
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        vec![
            Keybinding::hint(
                self.resolver.display_booking(BookingAction::ViewBookings),
                "Ver mis reservas",
            ),
            Keybinding::hint(
                self.resolver.display_global(GlobalAction::Back),
                "Volver al catálogo",
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::model::PaymentMethod;
    use crate::model::booking::sample_target;

    #[test]
    fn test_view_bookings_shortcut() {
        let booking = Booking::with_reference("ABC123XYZ", sample_target("1"), PaymentMethod::Card);
        let mut screen = BookingSuccessScreen::new(booking, Arc::new(KeyResolver::default()));
        assert_eq!(
            screen
                .handle_key(KeyEvent::new(KeyCode::Char('v'), KeyModifiers::NONE))
                .unwrap(),
            EventResult::Event(NavIntent::ViewBookings)
        );
        assert_eq!(
            screen
                .handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))
                .unwrap(),
            EventResult::Event(NavIntent::ReturnToCatalog)
        );
    }
}

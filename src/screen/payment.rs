use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{ListItem, Paragraph, Wrap};

use super::{NavIntent, field_line, panel};
use crate::Theme;
use crate::config::{FormAction, GlobalAction, KeyResolver, NavAction};
use crate::model::booking::{SERVICE_FEE_PERCENT, format_euros};
use crate::model::{BookingTarget, PaymentMethod};
use crate::ui::{
    Component, EventResult, Keybinding, List, ListEvent, ListRow, Result, Screen, Spinner,
    TextInput, TextInputEvent,
};

const BANK_NAME: &str = "Banco Ejemplo S.A.";
const BANK_IBAN: &str = "ES12 3456 7890 1234 5678";

impl ListRow for PaymentMethod {
    fn render_row(&self, theme: &Theme) -> ListItem<'static> {
        ListItem::new(vec![
            Line::from(Span::styled(
                self.label(),
                Style::default().fg(theme.text()),
            )),
            Line::from(Span::styled(
                format!("  {}", self.details()),
                Style::default().fg(theme.overlay1()),
            )),
        ])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Methods,
    Number,
    Expiry,
    Cvv,
    Name,
}

impl Focus {
    const fn next(self) -> Self {
        match self {
            Self::Methods => Self::Number,
            Self::Number => Self::Expiry,
            Self::Expiry => Self::Cvv,
            Self::Cvv => Self::Name,
            Self::Name => Self::Methods,
        }
    }
}

/// Card details. Nothing is validated; the form only has to be walked through.
struct CardForm {
    number: TextInput,
    expiry: TextInput,
    cvv: TextInput,
    name: TextInput,
}

impl CardForm {
    fn new() -> Self {
        Self {
            number: TextInput::new("Número de tarjeta")
                .with_placeholder("1234 5678 9012 3456")
                .with_max_len(19),
            expiry: TextInput::new("Caducidad")
                .with_placeholder("MM/AA")
                .with_max_len(5),
            cvv: TextInput::new("CVV")
                .with_placeholder("123")
                .with_max_len(4)
                .masked(),
            name: TextInput::new("Titular").with_placeholder("NOMBRE APELLIDO"),
        }
    }

    fn input(&mut self, focus: Focus) -> Option<&mut TextInput> {
        match focus {
            Focus::Methods => None,
            Focus::Number => Some(&mut self.number),
            Focus::Expiry => Some(&mut self.expiry),
            Focus::Cvv => Some(&mut self.cvv),
            Focus::Name => Some(&mut self.name),
        }
    }

    fn set_focus(&mut self, focus: Focus) {
        self.number.set_focused(focus == Focus::Number);
        self.expiry.set_focused(focus == Focus::Expiry);
        self.cvv.set_focused(focus == Focus::Cvv);
        self.name.set_focused(focus == Focus::Name);
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let [number, row, name, note] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .areas(area);
        let [expiry, cvv] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(row);

        self.number.render(frame, number, theme);
        self.expiry.render(frame, expiry, theme);
        self.cvv.render(frame, cvv, theme);
        self.name.render(frame, name, theme);
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Pago seguro mediante SSL",
                Style::default().fg(theme.green()),
            )),
            note,
        );
    }
}

/// Payment method choice, method details and price summary.
///
/// Submitting starts processing; until the App rebuilds the screen every
/// further submission is swallowed. Going back stays available and cancels
/// the payment in progress.
pub struct PaymentScreen {
    target: BookingTarget,
    methods: List<PaymentMethod>,
    card: CardForm,
    focus: Focus,
    processing: Option<Spinner>,
    resolver: Arc<KeyResolver>,
}

impl PaymentScreen {
    pub fn new(target: BookingTarget, resolver: Arc<KeyResolver>) -> Self {
        Self {
            target,
            methods: List::new(PaymentMethod::ALL.to_vec(), resolver.clone()),
            card: CardForm::new(),
            focus: Focus::Methods,
            processing: None,
            resolver,
        }
    }

    fn selected_method(&self) -> PaymentMethod {
        self.methods.selected().copied().unwrap_or(PaymentMethod::Card)
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.card.set_focus(focus);
    }

    fn submit(&mut self, method: PaymentMethod) -> EventResult<NavIntent> {
        self.set_focus(Focus::Methods);
        self.processing = Some(Spinner::new().with_label("Procesando pago..."));
        NavIntent::SubmitPayment(method).into()
    }

    fn handle_methods_key(&mut self, key: KeyEvent) -> Result<EventResult<NavIntent>> {
        if self.resolver.matches_global(&key, GlobalAction::Back) {
            return Ok(NavIntent::BackToDetails.into());
        }
        if self.resolver.matches_form(&key, FormAction::NextField) {
            if self.selected_method() == PaymentMethod::Card {
                self.set_focus(Focus::Number);
                return Ok(EventResult::Consumed);
            }
            return Ok(EventResult::Ignored);
        }
        Ok(match self.methods.handle_key(key)? {
            EventResult::Event(ListEvent::Activated(PaymentMethod::Card)) => {
                self.set_focus(Focus::Number);
                EventResult::Consumed
            }
            EventResult::Event(ListEvent::Activated(method)) => self.submit(method),
            EventResult::Event(ListEvent::Changed(_)) | EventResult::Consumed => {
                EventResult::Consumed
            }
            EventResult::Ignored => EventResult::Ignored,
        })
    }

    fn handle_card_key(&mut self, key: KeyEvent) -> Result<EventResult<NavIntent>> {
        if self.resolver.matches_global(&key, GlobalAction::Back) {
            self.set_focus(Focus::Methods);
            return Ok(EventResult::Consumed);
        }
        if self.resolver.matches_form(&key, FormAction::NextField) {
            self.set_focus(self.focus.next());
            return Ok(EventResult::Consumed);
        }

        let focus = self.focus;
        let Some(input) = self.card.input(focus) else {
            return Ok(EventResult::Ignored);
        };
        Ok(match input.handle_key(key)? {
            EventResult::Event(TextInputEvent::Submitted) if focus == Focus::Name => {
                self.submit(PaymentMethod::Card)
            }
            EventResult::Event(TextInputEvent::Submitted) => {
                self.set_focus(focus.next());
                EventResult::Consumed
            }
            EventResult::Event(TextInputEvent::Cancelled) => {
                self.set_focus(Focus::Methods);
                EventResult::Consumed
            }
            EventResult::Consumed => EventResult::Consumed,
            EventResult::Ignored => EventResult::Ignored,
        })
    }

    fn summary_line<'a>(label: &'a str, amount: u64, style: Style, theme: &Theme) -> Line<'a> {
        Line::from(vec![
            Span::styled(format!("{label:<22}"), Style::default().fg(theme.subtext0())),
            Span::styled(format_euros(amount), style),
        ])
    }

    fn render_summary(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let t = &self.target;
        let price = u64::from(t.price) * 100;
        let amount_style = Style::default().fg(theme.text());
        let fee_label = format!("Gastos de gestión ({SERVICE_FEE_PERCENT}%)");

        let lines = vec![
            Line::from(Span::styled(
                t.name.clone(),
                Style::default()
                    .fg(theme.lavender())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("{} · {}", t.provider, t.schedule()),
                Style::default().fg(theme.subtext1()),
            )),
            Line::from(""),
            Self::summary_line("Precio del servicio", price, amount_style, theme),
            Self::summary_line(&fee_label, t.fee_cents(), amount_style, theme),
            Line::from(Span::styled(
                "─".repeat(30),
                Style::default().fg(theme.surface2()),
            )),
            Self::summary_line(
                "Total",
                t.total_cents(),
                Style::default()
                    .fg(theme.green())
                    .add_modifier(Modifier::BOLD),
                theme,
            ),
        ];

        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .block(panel(" Resumen ", theme)),
            area,
        );
    }

    fn render_details(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let method = self.selected_method();
        let block = panel(format!(" {} ", method.label()), theme);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let text = match method {
            PaymentMethod::Card => {
                self.card.render(frame, inner, theme);
                return;
            }
            PaymentMethod::Transfer => vec![
                field_line("Banco", BANK_NAME, theme),
                field_line("IBAN", BANK_IBAN, theme),
                field_line("Concepto", &self.target.name, theme),
                Line::from(""),
                Line::from(Span::styled(
                    "Una vez realizada la transferencia, tu reserva será confirmada en 24-48 horas.",
                    Style::default().fg(theme.subtext0()),
                )),
            ],
            PaymentMethod::OnSite => vec![
                Line::from(Span::styled(
                    method.details(),
                    Style::default().fg(theme.text()),
                )),
                Line::from(""),
                field_line("Dirección", &self.target.location, theme),
            ],
        };
        frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), inner);
    }
}

impl Screen for PaymentScreen {
    type Output = NavIntent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.processing.is_some() {
            if self.resolver.matches_global(&key, GlobalAction::Back) {
                return Ok(NavIntent::BackToDetails.into());
            }
            return Ok(EventResult::Consumed);
        }
        match self.focus {
            Focus::Methods => self.handle_methods_key(key),
            _ => self.handle_card_key(key),
        }
    }

    fn handle_tick(&mut self) {
        if let Some(spinner) = &mut self.processing {
            spinner.handle_tick();
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let content = area.centered(Constraint::Max(110), Constraint::Length(23));
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .areas(content);
        let [methods, details] =
            Layout::vertical([Constraint::Length(8), Constraint::Min(12)]).areas(left);
        let [summary, status] =
            Layout::vertical([Constraint::Length(11), Constraint::Min(1)]).areas(right);

        let block = panel(" Método de pago ", theme);
        let inner = block.inner(methods);
        frame.render_widget(block, methods);
        self.methods.render(frame, inner, theme);

        self.render_details(frame, details, theme);
        self.render_summary(frame, summary, theme);

        if let Some(spinner) = &mut self.processing {
            spinner.render(frame, status, theme);
        }
    }

    fn breadcrumbs(&self) -> Vec<String> {
        vec![
            "Catálogo".to_string(),
            self.target.name.clone(),
            "Pago".to_string(),
        ]
    }

    fn is_editing(&self) -> bool {
        self.focus != Focus::Methods
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        let back = self.resolver.display_global(GlobalAction::Back);
        if self.processing.is_some() {
            return vec![Keybinding::hint(back, "Cancelar pago")];
        }

        let total = format_euros(self.target.total_cents());
        let next = self.resolver.display_form(FormAction::NextField);
        if self.focus == Focus::Methods {
            let method = self.selected_method();
            let select = self.resolver.display_nav(NavAction::Select);
            let mut bindings = vec![if method == PaymentMethod::Card {
                Keybinding::hint(select, "Introducir datos de la tarjeta")
            } else {
                Keybinding::hint(select, format!("Pagar {total} ({})", method.label()))
            }];
            if method == PaymentMethod::Card {
                bindings.push(Keybinding::new(next, "Ir al formulario"));
            }
            bindings.push(Keybinding::new(back, "Volver a los detalles"));
            return bindings;
        }

        vec![
            Keybinding::hint(next, "Siguiente campo"),
            Keybinding::hint(
                self.resolver.display_form(FormAction::Submit),
                if self.focus == Focus::Name {
                    format!("Pagar {total}")
                } else {
                    "Siguiente campo".to_string()
                },
            ),
            Keybinding::hint(back, "Volver a los métodos"),
        ]
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

    fn screen() -> PaymentScreen {
        PaymentScreen::new(sample_target("1"), Arc::new(KeyResolver::default()))
    }

    fn type_text(screen: &mut PaymentScreen, text: &str) {
        for c in text.chars() {
            screen.handle_key(key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn test_card_opens_the_card_form() {
        let mut screen = screen();
        assert_eq!(
            screen.handle_key(key(KeyCode::Enter)).unwrap(),
            EventResult::Consumed
        );
        assert_eq!(screen.focus, Focus::Number);
        assert!(screen.is_editing());
    }

    #[test]
    fn test_card_details_are_filled_in_order() {
        let mut screen = screen();
        screen.handle_key(key(KeyCode::Enter)).unwrap();

        type_text(&mut screen, "4111 1111 1111 1111 99");
        screen.handle_key(key(KeyCode::Enter)).unwrap();
        type_text(&mut screen, "12/27");
        screen.handle_key(key(KeyCode::Tab)).unwrap();
        type_text(&mut screen, "123");
        screen.handle_key(key(KeyCode::Enter)).unwrap();
        type_text(&mut screen, "ANA LOPEZ");

        assert_eq!(screen.card.number.value(), "4111 1111 1111 1111");
        assert_eq!(screen.card.expiry.value(), "12/27");
        assert_eq!(screen.card.cvv.value(), "123");
        assert_eq!(screen.card.name.value(), "ANA LOPEZ");

        assert_eq!(
            screen.handle_key(key(KeyCode::Enter)).unwrap(),
            EventResult::Event(NavIntent::SubmitPayment(PaymentMethod::Card))
        );
        assert!(!screen.is_editing());
    }

    #[test]
    fn test_typing_q_in_card_form_stays_in_field() {
        let mut screen = screen();
        screen.handle_key(key(KeyCode::Tab)).unwrap();
        screen.handle_key(key(KeyCode::Char('q'))).unwrap();
        assert_eq!(screen.card.number.value(), "q");
        assert!(screen.is_editing());
    }

    #[test]
    fn test_esc_in_card_form_returns_to_methods() {
        let mut screen = screen();
        screen.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(
            screen.handle_key(key(KeyCode::Esc)).unwrap(),
            EventResult::Consumed
        );
        assert_eq!(screen.focus, Focus::Methods);
        assert_eq!(
            screen.handle_key(key(KeyCode::Esc)).unwrap(),
            EventResult::Event(NavIntent::BackToDetails)
        );
    }

    #[test]
    fn test_tab_skips_form_for_other_methods() {
        let mut screen = screen();
        screen.handle_key(key(KeyCode::Down)).unwrap();
        assert_eq!(
            screen.handle_key(key(KeyCode::Tab)).unwrap(),
            EventResult::Ignored
        );
        assert_eq!(screen.focus, Focus::Methods);
    }

    #[test]
    fn test_choose_on_site_payment() {
        let mut screen = screen();
        screen.handle_key(key(KeyCode::Char('G'))).unwrap();
        assert_eq!(
            screen.handle_key(key(KeyCode::Enter)).unwrap(),
            EventResult::Event(NavIntent::SubmitPayment(PaymentMethod::OnSite))
        );
    }

    #[test]
    fn test_processing_swallows_second_submission() {
        let mut screen = screen();
        screen.handle_key(key(KeyCode::Down)).unwrap();
        assert_eq!(
            screen.handle_key(key(KeyCode::Enter)).unwrap(),
            EventResult::Event(NavIntent::SubmitPayment(PaymentMethod::Transfer))
        );

        assert_eq!(
            screen.handle_key(key(KeyCode::Enter)).unwrap(),
            EventResult::Consumed
        );
        assert_eq!(
            screen.handle_key(key(KeyCode::Up)).unwrap(),
            EventResult::Consumed
        );
        assert_eq!(screen.selected_method(), PaymentMethod::Transfer);
        assert_eq!(
            screen.handle_key(key(KeyCode::Esc)).unwrap(),
            EventResult::Event(NavIntent::BackToDetails)
        );
    }

    #[test]
    fn test_back_goes_to_details() {
        let mut screen = screen();
        assert_eq!(
            screen.handle_key(key(KeyCode::Esc)).unwrap(),
            EventResult::Event(NavIntent::BackToDetails)
        );
    }
}

use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use super::{NavIntent, panel};
use crate::Theme;
use crate::config::{FormAction, GlobalAction, KeyResolver};
use crate::ui::{Component, EventResult, Keybinding, Result, Screen, TextInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Email,
    Password,
}

/// Email and password form.
///
/// Credentials are not checked here: any non-empty email is submitted and
/// the role is derived from it.
pub struct LoginScreen {
    email: TextInput,
    password: TextInput,
    focus: Field,
    /// Name of the service waiting behind this login, if any.
    pending_service: Option<String>,
    submitted: bool,
    resolver: Arc<KeyResolver>,
}

impl LoginScreen {
    pub fn new(pending_service: Option<String>, resolver: Arc<KeyResolver>) -> Self {
        let mut email = TextInput::new("Email").with_placeholder("tu@email.com");
        email.set_focused(true);
        Self {
            email,
            password: TextInput::new("Contraseña")
                .with_placeholder("••••••••")
                .masked(),
            focus: Field::Email,
            pending_service,
            submitted: false,
            resolver,
        }
    }

    fn focused_input(&mut self) -> &mut TextInput {
        match self.focus {
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
        }
    }

    fn switch_field(&mut self) {
        self.focus = match self.focus {
            Field::Email => Field::Password,
            Field::Password => Field::Email,
        };
        self.email.set_focused(self.focus == Field::Email);
        self.password.set_focused(self.focus == Field::Password);
    }

    fn submit(&mut self) -> EventResult<NavIntent> {
        // The email is submitted as typed; blank input is not submitted at all.
        let email = self.email.value();
        // A second Enter before the screen changes must not submit twice.
        if self.submitted || email.trim().is_empty() {
            return EventResult::Consumed;
        }
        self.submitted = true;
        NavIntent::SubmitLogin {
            email: email.to_string(),
            password: self.password.value().to_string(),
        }
        .into()
    }
}

impl Screen for LoginScreen {
    type Output = NavIntent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.resolver.matches_global(&key, GlobalAction::Back) {
            return Ok(NavIntent::ReturnToCatalog.into());
        }
        if self.resolver.matches_form(&key, FormAction::NextField) {
            self.switch_field();
            return Ok(EventResult::Consumed);
        }
        if self.resolver.matches_form(&key, FormAction::TogglePassword) {
            let masked = self.password.is_masked();
            self.password.set_masked(!masked);
            return Ok(EventResult::Consumed);
        }
        if self.resolver.matches_form(&key, FormAction::Submit) {
            return Ok(self.submit());
        }

        Ok(match self.focused_input().handle_key(key)? {
            EventResult::Ignored => EventResult::Ignored,
            EventResult::Consumed | EventResult::Event(_) => EventResult::Consumed,
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let form_area = area.centered(Constraint::Max(60), Constraint::Length(16));
        let block = panel(" Iniciar sesión ", theme);
        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let [intro, email, password, help] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(2),
        ])
        .areas(inner);

        let intro_lines = match &self.pending_service {
            Some(service) => vec![
                Line::from(Span::styled(
                    "Inicia sesión para continuar con tu reserva",
                    Style::default()
                        .fg(theme.text())
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    service.clone(),
                    Style::default().fg(theme.lavender()),
                )),
            ],
            None => vec![Line::from(Span::styled(
                "Bienvenido de nuevo",
                Style::default()
                    .fg(theme.text())
                    .add_modifier(Modifier::BOLD),
            ))],
        };
        frame.render_widget(Paragraph::new(intro_lines), intro);

        self.email.render(frame, email, theme);
        self.password.render(frame, password, theme);

        let visibility = if self.password.is_masked() {
            "mostrar"
        } else {
            "ocultar"
        };
        let help_lines = vec![
            Line::from(Span::styled(
                format!(
                    "{} cambia de campo · {} {visibility} contraseña · {} entrar",
                    self.resolver.display_form(FormAction::NextField),
                    self.resolver.display_form(FormAction::TogglePassword),
                    self.resolver.display_form(FormAction::Submit),
                ),
                Style::default().fg(theme.overlay1()),
            )),
            Line::from(Span::styled(
                "Usa un email con \"admin\" o \"proveedor\" para entrar a esos paneles",
                Style::default().fg(theme.overlay0()),
            )),
        ];
        frame.render_widget(Paragraph::new(help_lines).wrap(Wrap { trim: true }), help);
    }

    fn breadcrumbs(&self) -> Vec<String> {
        vec!["Catálogo".to_string(), "Iniciar sesión".to_string()]
    }

    fn is_editing(&self) -> bool {
        true
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        vec![
            Keybinding::hint(self.resolver.display_form(FormAction::Submit), "Entrar"),
            Keybinding::hint(
                self.resolver.display_form(FormAction::NextField),
                "Cambiar campo",
            ),
            Keybinding::hint(
                self.resolver.display_form(FormAction::TogglePassword),
                "Ver contraseña",
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen() -> LoginScreen {
        LoginScreen::new(None, Arc::new(KeyResolver::default()))
    }

    fn type_text(screen: &mut LoginScreen, text: &str) {
        for c in text.chars() {
            screen.handle_key(key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn test_submit_collects_both_fields() {
        let mut screen = screen();
        type_text(&mut screen, "admin@x.com");
        screen.handle_key(key(KeyCode::Tab)).unwrap();
        type_text(&mut screen, "qwerty");

        let result = screen.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(
            result,
            EventResult::Event(NavIntent::SubmitLogin {
                email: "admin@x.com".to_string(),
                password: "qwerty".to_string(),
            })
        );
    }

    #[test]
    fn test_empty_email_is_not_submitted() {
        let mut screen = screen();
        type_text(&mut screen, "   ");
        assert_eq!(
            screen.handle_key(key(KeyCode::Enter)).unwrap(),
            EventResult::Consumed
        );
    }

    #[test]
    fn test_email_is_submitted_as_typed() {
        let mut screen = screen();
        type_text(&mut screen, " ana@x.com ");
        assert_eq!(
            screen.handle_key(key(KeyCode::Enter)).unwrap(),
            EventResult::Event(NavIntent::SubmitLogin {
                email: " ana@x.com ".to_string(),
                password: String::new(),
            })
        );
    }

    #[test]
    fn test_repeated_enter_submits_once() {
        let mut screen = screen();
        type_text(&mut screen, "ana@x.com");
        assert!(matches!(
            screen.handle_key(key(KeyCode::Enter)).unwrap(),
            EventResult::Event(NavIntent::SubmitLogin { .. })
        ));
        assert_eq!(
            screen.handle_key(key(KeyCode::Enter)).unwrap(),
            EventResult::Consumed
        );
    }

    #[test]
    fn test_shortcut_letters_are_typed() {
        let mut screen = screen();
        type_text(&mut screen, "qot?");
        assert_eq!(screen.email.value(), "qot?");
    }

    #[test]
    fn test_password_visibility_toggle() {
        let mut screen = screen();
        assert!(screen.password.is_masked());
        screen
            .handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL))
            .unwrap();
        assert!(!screen.password.is_masked());
    }

    #[test]
    fn test_escape_returns_to_catalog() {
        let mut screen = screen();
        assert_eq!(
            screen.handle_key(key(KeyCode::Esc)).unwrap(),
            EventResult::Event(NavIntent::ReturnToCatalog)
        );
    }
}

use std::time::Duration;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Gauge, Paragraph};
use tokio::time::Instant;

use super::NavIntent;
use crate::Theme;
use crate::model::{Role, Session};
use crate::ui::{Component, EventResult, Result, Screen, Spinner};

/// Message shown while the login continuation is pending.
pub const fn redirect_message(role: Role) -> &'static str {
    match role {
        Role::Admin => "Redirigiendo a tu panel de administración...",
        Role::Provider => "Redirigiendo a tu panel de proveedor...",
        Role::Client => "Continuando con tu reserva...",
    }
}

/// Welcome screen with a spinner and progress bar.
///
/// Keys are not handled here; the App still accepts quit and logout.
pub struct RedirectingScreen {
    name: String,
    role: Role,
    spinner: Spinner,
    started: Instant,
    delay: Duration,
}

impl RedirectingScreen {
    pub fn new(session: Option<&Session>, delay: Duration) -> Self {
        let (name, role) = session.map_or_else(
            || (String::new(), Role::Client),
            |s| (s.display_name.clone(), s.role),
        );
        Self {
            name,
            role,
            spinner: Spinner::new().with_label(redirect_message(role)),
            started: Instant::now(),
            delay,
        }
    }

    fn progress(&self) -> f64 {
        if self.delay.is_zero() {
            return 1.0;
        }
        (self.started.elapsed().as_secs_f64() / self.delay.as_secs_f64()).clamp(0.0, 1.0)
    }
}

impl Screen for RedirectingScreen {
    type Output = NavIntent;

    fn handle_key(&mut self, _key: KeyEvent) -> Result<EventResult<Self::Output>> {
        Ok(EventResult::Ignored)
    }

    fn handle_tick(&mut self) {
        self.spinner.handle_tick();
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let content = area.centered(Constraint::Max(60), Constraint::Length(7));
        let [title, spinner, _, gauge, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(2),
        ])
        .areas(content);

        let accent = match self.role {
            Role::Admin => theme.mauve(),
            Role::Provider => theme.blue(),
            Role::Client => theme.green(),
        };

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!("¡Bienvenido, {}!", self.name),
                Style::default()
                    .fg(theme.text())
                    .add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center),
            title,
        );
        self.spinner.render(frame, spinner, theme);
        frame.render_widget(
            Gauge::default()
                .gauge_style(Style::default().fg(accent).bg(theme.surface0()))
                .ratio(self.progress())
                .label(""),
            gauge,
        );
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Estamos preparando tu espacio de trabajo...",
                Style::default().fg(theme.overlay1()),
            ))
            .alignment(Alignment::Center),
            footer,
        );
    }

    fn breadcrumbs(&self) -> Vec<String> {
        vec![self.role.display_name().to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_per_role() {
        assert!(redirect_message(Role::Admin).contains("administración"));
        assert!(redirect_message(Role::Provider).contains("proveedor"));
        assert_eq!(redirect_message(Role::Client), "Continuando con tu reserva...");
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_follows_delay() {
        let session = Session::new("carlos@proveedor.com", Role::Provider);
        let screen = RedirectingScreen::new(Some(&session), Duration::from_millis(2000));
        assert!(screen.progress() < 0.01);

        tokio::time::advance(Duration::from_millis(1000)).await;
        assert!((screen.progress() - 0.5).abs() < 0.01);

        tokio::time::advance(Duration::from_millis(5000)).await;
        assert!((screen.progress() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_delay_is_complete() {
        let screen = RedirectingScreen::new(None, Duration::ZERO);
        assert!((screen.progress() - 1.0).abs() < f64::EPSILON);
    }
}

use std::sync::Arc;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::Theme;
use crate::config::{GlobalAction, KeyResolver, NavAction};
use crate::model::Session;
use crate::ui::Keybinding;

const LOGO: &[&str] = &[
    r"  ___                            ",
    r" | _ \___ ___ ___ _ ___ ____ _   ",
    r" |   / -_|_-</ -_) '_\ V / _` |  ",
    r" |_|_\___/__/\___|_|  \_/\__,_|  ",
    r"             Y A                 ",
];

/// Bottom panel with the signed-in user, key hints and the logo.
pub struct StatusBar {
    session: Option<Session>,
    bookings: usize,
    resolver: Arc<KeyResolver>,
}

impl StatusBar {
    pub const fn new(resolver: Arc<KeyResolver>) -> Self {
        Self {
            session: None,
            bookings: 0,
            resolver,
        }
    }

    pub fn set_session(&mut self, session: Option<Session>, bookings: usize) {
        self.session = session;
        self.bookings = bookings;
    }

    pub fn render_with_keybindings(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        local_keybindings: &[Keybinding],
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.surface1()));

        let inner_area = block.inner(area);
        frame.render_widget(block, area);

        let [status, hints, logo] = Layout::horizontal([
            Constraint::Length(42),
            Constraint::Min(20),
            Constraint::Length(34),
        ])
        .areas(inner_area);

        self.render_session_info(frame, status, theme);
        self.render_keybindings(frame, hints, theme, local_keybindings);
        Self::render_logo(frame, logo, theme);
    }

    fn render_session_info(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let w = area.width as usize;
        let label_style = Style::default().fg(theme.overlay1());
        let value_style = Style::default().fg(theme.text());

        let lines = match &self.session {
            Some(session) => vec![
                Line::from(Span::styled(
                    truncate_str(&session.display_name, w),
                    Style::default()
                        .fg(theme.lavender())
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                status_line("email", &session.email, w, label_style, value_style),
                status_line(
                    "rol",
                    session.role.display_name(),
                    w,
                    label_style,
                    Style::default().fg(theme.blue()),
                ),
                status_line(
                    "reservas",
                    &self.bookings.to_string(),
                    w,
                    label_style,
                    value_style,
                ),
            ],
            None => vec![Line::from(Span::styled(
                "Invitado",
                Style::default()
                    .fg(theme.overlay0())
                    .add_modifier(Modifier::BOLD),
            ))],
        };

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_keybindings(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        local_keybindings: &[Keybinding],
    ) {
        let global_keybindings = self.global_keybindings();
        let hints: Vec<&Keybinding> = local_keybindings
            .iter()
            .filter(|kb| kb.hint)
            .chain(global_keybindings.iter().filter(|kb| kb.hint))
            .collect();

        if hints.is_empty() || area.height == 0 {
            return;
        }

        // Align the separators in each column to the widest key.
        let max_key_w = hints.iter().map(|kb| kb.key.chars().count()).max().unwrap_or(1);
        let max_desc_w = hints
            .iter()
            .map(|kb| kb.description.chars().count())
            .max()
            .unwrap_or(1);
        let col_width = u16::try_from(max_key_w + 3 + max_desc_w + 2).unwrap_or(u16::MAX);
        let num_cols = (area.width / col_width).max(1) as usize;
        let num_rows = area.height as usize;

        let mut columns: Vec<Vec<Line>> = vec![Vec::new(); num_cols];
        for (i, kb) in hints.iter().enumerate() {
            let col_idx = i / num_rows;
            if col_idx >= num_cols {
                break;
            }
            columns[col_idx].push(Line::from(vec![
                Span::styled(
                    format!("{:>max_key_w$}", kb.key),
                    Style::default().fg(theme.peach()),
                ),
                Span::styled(" │ ", Style::default().fg(theme.surface2())),
                Span::styled(kb.description.clone(), Style::default().fg(theme.subtext0())),
            ]));
        }

        let col_areas = Layout::horizontal(vec![Constraint::Length(col_width); num_cols]).split(area);
        for (col_area, col_lines) in col_areas.iter().zip(columns) {
            frame.render_widget(Paragraph::new(col_lines), *col_area);
        }
    }

    fn render_logo(frame: &mut Frame, area: Rect, theme: &Theme) {
        let logo_lines: Vec<Line> = LOGO
            .iter()
            .map(|line| {
                Line::from(Span::styled(
                    *line,
                    Style::default()
                        .fg(theme.mauve())
                        .add_modifier(Modifier::BOLD),
                ))
            })
            .collect();
        frame.render_widget(Paragraph::new(logo_lines), area);
    }

    /// Global keybindings, also listed in the help overlay.
    pub fn global_keybindings(&self) -> Vec<Keybinding> {
        let mut bindings = vec![
            Keybinding::hint(self.resolver.display_global(GlobalAction::Help), "Ayuda"),
            Keybinding::hint(self.resolver.display_global(GlobalAction::Back), "Volver"),
            Keybinding::new(self.resolver.display_global(GlobalAction::Theme), "Tema"),
            Keybinding::new(self.resolver.display_global(GlobalAction::Quit), "Salir"),
            Keybinding::new(self.resolver.display_nav(NavAction::Select), "Seleccionar"),
            Keybinding::new(
                format!(
                    "{}/{}",
                    self.resolver.display_nav(NavAction::Up),
                    self.resolver.display_nav(NavAction::Down)
                ),
                "Moverse",
            ),
        ];
        if self.session.is_some() {
            bindings.push(Keybinding::hint(
                self.resolver.display_global(GlobalAction::Logout),
                "Cerrar sesión",
            ));
        }
        bindings
    }
}

/// Render a labelled status line: right-aligned label, then value.
fn status_line<'a>(
    label: &'a str,
    value: &str,
    max_width: usize,
    label_style: Style,
    value_style: Style,
) -> Line<'a> {
    const LABEL_W: usize = 10;
    let available = max_width.saturating_sub(LABEL_W + 1);
    Line::from(vec![
        Span::styled(format!("{label:>LABEL_W$}"), label_style),
        Span::raw(" "),
        Span::styled(truncate_str(value, available), value_style),
    ])
}

/// Truncate to `max_width` characters, ending in "..." when cut.
fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width > 3 {
        let kept: String = s.chars().take(max_width - 3).collect();
        format!("{kept}...")
    } else {
        s.chars().take(max_width).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate_str("Clínica", 10), "Clínica");
        assert_eq!(truncate_str("Clínica Dental", 10), "Clínica...");
        assert_eq!(truncate_str("abc", 2), "ab");
    }

    #[test]
    fn test_logout_hint_only_when_signed_in() {
        let mut bar = StatusBar::new(Arc::new(KeyResolver::default()));
        let has_logout = |bar: &StatusBar| {
            bar.global_keybindings()
                .iter()
                .any(|kb| kb.description == "Cerrar sesión")
        };
        assert!(!has_logout(&bar));

        bar.set_session(
            Some(Session::new("ana@x.com", crate::model::Role::Client)),
            0,
        );
        assert!(has_logout(&bar));
    }
}

use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Wrap};

use super::{NavIntent, field_line, panel};
use crate::Theme;
use crate::config::{BookingAction, KeyResolver, NavAction, SearchAction};
use crate::model::BookingTarget;
use crate::model::booking::format_euros;
use crate::search::Matcher;
use crate::ui::{
    ColumnDef, Component, EventResult, Keybinding, Result, Screen, Table, TableEvent, TableRow,
};

impl TableRow for BookingTarget {
    fn columns() -> &'static [ColumnDef] {
        static COLUMNS: &[ColumnDef] = &[
            ColumnDef::new("Servicio", Constraint::Min(24)),
            ColumnDef::new("Proveedor", Constraint::Min(20)),
            ColumnDef::new("Fecha", Constraint::Length(10)),
            ColumnDef::new("Hora", Constraint::Length(5)),
            ColumnDef::new("Precio", Constraint::Length(8)),
        ];
        COLUMNS
    }

    fn render_cells(&self, theme: &Theme) -> Vec<Cell<'static>> {
        vec![
            Cell::from(self.name.clone()),
            Cell::from(self.provider.clone()).style(Style::default().fg(theme.subtext1())),
            Cell::from(self.date.format("%d/%m/%Y").to_string()),
            Cell::from(self.time.format("%H:%M").to_string()),
            Cell::from(format_euros(u64::from(self.price) * 100))
                .style(Style::default().fg(theme.green())),
        ]
    }

    fn matches(&self, query: &str) -> bool {
        Matcher::new().matches_any(
            [
                self.name.as_str(),
                self.provider.as_str(),
                self.location.as_str(),
                self.description.as_str(),
            ],
            query,
        )
    }
}

/// Service catalog with an inline search and a detail panel.
pub struct CatalogScreen {
    table: Table<BookingTarget>,
    greeting: Option<String>,
    resolver: Arc<KeyResolver>,
}

impl CatalogScreen {
    pub fn new(
        services: Vec<BookingTarget>,
        display_name: Option<String>,
        resolver: Arc<KeyResolver>,
    ) -> Self {
        Self {
            table: Table::new(services, resolver.clone()).with_title(" Servicios disponibles "),
            greeting: display_name,
            resolver,
        }
    }

    fn render_details(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = panel(" Detalles ", theme);
        let Some(service) = self.table.selected_item() else {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "Ningún servicio coincide con la búsqueda",
                    Style::default().fg(theme.overlay0()),
                ))
                .block(block),
                area,
            );
            return;
        };

        let lines = vec![
            Line::from(Span::styled(
                service.name.clone(),
                Style::default()
                    .fg(theme.lavender())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            field_line("Proveedor", service.provider.clone(), theme),
            field_line("Cuándo", service.schedule(), theme),
            field_line("Dónde", service.location.clone(), theme),
            field_line("Precio", format_euros(u64::from(service.price) * 100), theme),
            Line::from(""),
            Line::from(Span::styled(
                service.description.clone(),
                Style::default().fg(theme.subtext0()),
            )),
        ];
        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
            area,
        );
    }
}

impl Screen for CatalogScreen {
    type Output = NavIntent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        let result = self.table.handle_key(key)?;
        if let EventResult::Event(TableEvent::Activated(service)) = result {
            return Ok(NavIntent::SelectService(service).into());
        }
        if result.is_consumed() {
            return Ok(EventResult::Consumed);
        }

        if self.resolver.matches_booking(&key, BookingAction::Login) {
            return Ok(NavIntent::OpenLogin.into());
        }
        Ok(EventResult::Ignored)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let [header, body] = Layout::vertical([Constraint::Length(1), Constraint::Min(3)]).areas(area);
        let [list, details] =
            Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)]).areas(body);

        let greeting = self.greeting.as_ref().map_or_else(
            || "Reserva servicios profesionales en segundos".to_string(),
            |name| format!("Hola, {name}"),
        );
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(
                    " Reserva Ya ",
                    Style::default()
                        .fg(theme.base())
                        .bg(theme.mauve())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(greeting, Style::default().fg(theme.subtext1())),
            ])),
            header,
        );

        self.table.render(frame, list, theme);
        self.render_details(frame, details, theme);
    }

    fn breadcrumbs(&self) -> Vec<String> {
        vec!["Catálogo".to_string()]
    }

    fn is_editing(&self) -> bool {
        self.table.is_searching()
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        let login_label = if self.greeting.is_some() {
            "Mi panel"
        } else {
            "Iniciar sesión"
        };
        vec![
            Keybinding::hint(self.resolver.display_nav(NavAction::Select), "Reservar"),
            Keybinding::hint(self.resolver.display_search(SearchAction::Toggle), "Buscar"),
            Keybinding::hint(
                self.resolver.display_booking(BookingAction::Login),
                login_label,
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::model::catalog;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen() -> CatalogScreen {
        CatalogScreen::new(
            catalog::builtin().unwrap(),
            None,
            Arc::new(KeyResolver::default()),
        )
    }

    #[test]
    fn test_enter_selects_highlighted_service() {
        let mut screen = screen();
        screen.handle_key(key(KeyCode::Down)).unwrap();
        let result = screen.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(matches!(
            result,
            EventResult::Event(NavIntent::SelectService(ref t)) if t.id == "2"
        ));
    }

    #[test]
    fn test_search_then_select() {
        let mut screen = screen();
        screen.handle_key(key(KeyCode::Char('/'))).unwrap();
        assert!(screen.is_editing());
        for c in "sonrisa".chars() {
            screen.handle_key(key(KeyCode::Char(c))).unwrap();
        }
        screen.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(!screen.is_editing());

        let result = screen.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(matches!(
            result,
            EventResult::Event(NavIntent::SelectService(ref t)) if t.name == "Consulta Dental"
        ));
    }

    #[test]
    fn test_login_shortcut() {
        let mut screen = screen();
        assert!(matches!(
            screen.handle_key(key(KeyCode::Char('l'))).unwrap(),
            EventResult::Event(NavIntent::OpenLogin)
        ));
        // 'l' while searching is part of the query.
        screen.handle_key(key(KeyCode::Char('/'))).unwrap();
        assert!(matches!(
            screen.handle_key(key(KeyCode::Char('l'))).unwrap(),
            EventResult::Consumed
        ));
    }

    #[test]
    fn test_quit_key_is_left_to_the_app() {
        let mut screen = screen();
        assert!(matches!(
            screen.handle_key(key(KeyCode::Char('q'))).unwrap(),
            EventResult::Ignored
        ));
    }
}

//! Role dashboards. The figures are sample data; only the client's
//! appointment list reflects bookings made in this session.
//!
//! Each dashboard has a section list on the left and the active section on
//! the right. Moving through the list switches sections; Enter or Tab moves
//! focus into the section and Esc (or Tab) moves it back out.

use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Clear, Gauge, ListItem, Paragraph, Wrap};

use super::{NavIntent, field_line, panel, render_stats};
use crate::Theme;
use crate::config::{FormAction, GlobalAction, KeyResolver, NavAction, SearchAction};
use crate::model::Booking;
use crate::model::booking::format_euros;
use crate::model::dashboard::{
    self, AgendaEntry, Appointment, BookingStatus, Category, ClientSummary, ListingStatus,
    Notice, PlatformUser, ProviderListing, ServiceListing, Stat, Trend,
};
use crate::search::Matcher;
use crate::ui::{
    ColumnDef, Component, EventResult, Keybinding, List, ListEvent, ListRow, Result, Screen,
    Table, TableEvent, TableRow,
};

const SIDEBAR_WIDTH: u16 = 22;

fn status_cell(status: BookingStatus, theme: &Theme) -> Cell<'static> {
    let color = match status {
        BookingStatus::Confirmed => theme.green(),
        BookingStatus::Pending => theme.yellow(),
        BookingStatus::Completed => theme.overlay1(),
    };
    Cell::from(status.label()).style(Style::default().fg(color))
}

fn listing_cell(status: ListingStatus, theme: &Theme) -> Cell<'static> {
    let color = match status {
        ListingStatus::Active => theme.green(),
        ListingStatus::Pending => theme.yellow(),
        ListingStatus::Draft | ListingStatus::Paused => theme.overlay1(),
    };
    Cell::from(status.label()).style(Style::default().fg(color))
}

impl TableRow for PlatformUser {
    fn columns() -> &'static [ColumnDef] {
        static COLUMNS: &[ColumnDef] = &[
            ColumnDef::new("Nombre", Constraint::Min(16)),
            ColumnDef::new("Email", Constraint::Min(22)),
            ColumnDef::new("Rol", Constraint::Length(10)),
            ColumnDef::new("Estado", Constraint::Length(10)),
            ColumnDef::new("Alta", Constraint::Length(12)),
        ];
        COLUMNS
    }

    fn render_cells(&self, theme: &Theme) -> Vec<Cell<'static>> {
        let status_color = match self.status {
            "Activo" => theme.green(),
            "Pendiente" => theme.yellow(),
            _ => theme.overlay1(),
        };
        vec![
            Cell::from(self.name),
            Cell::from(self.email).style(Style::default().fg(theme.subtext1())),
            Cell::from(self.role),
            Cell::from(self.status).style(Style::default().fg(status_color)),
            Cell::from(self.joined),
        ]
    }

    fn matches(&self, query: &str) -> bool {
        Matcher::new().matches_any([self.name, self.email, self.role, self.status], query)
    }
}

impl TableRow for AgendaEntry {
    fn columns() -> &'static [ColumnDef] {
        static COLUMNS: &[ColumnDef] = &[
            ColumnDef::new("Hora", Constraint::Length(6)),
            ColumnDef::new("Servicio", Constraint::Min(18)),
            ColumnDef::new("Cliente", Constraint::Min(16)),
            ColumnDef::new("Estado", Constraint::Length(11)),
        ];
        COLUMNS
    }

    fn render_cells(&self, theme: &Theme) -> Vec<Cell<'static>> {
        vec![
            Cell::from(self.time).style(Style::default().fg(theme.peach())),
            Cell::from(self.service),
            Cell::from(self.client),
            status_cell(self.status, theme),
        ]
    }

    fn matches(&self, query: &str) -> bool {
        Matcher::new().matches_any([self.service, self.client], query)
    }
}

impl TableRow for ServiceListing {
    fn columns() -> &'static [ColumnDef] {
        static COLUMNS: &[ColumnDef] = &[
            ColumnDef::new("Servicio", Constraint::Min(20)),
            ColumnDef::new("Proveedor", Constraint::Min(16)),
            ColumnDef::new("Categoría", Constraint::Length(10)),
            ColumnDef::new("Precio", Constraint::Length(9)),
            ColumnDef::new("Reservas", Constraint::Length(8)),
            ColumnDef::new("Estado", Constraint::Length(10)),
        ];
        COLUMNS
    }

    fn render_cells(&self, theme: &Theme) -> Vec<Cell<'static>> {
        vec![
            Cell::from(self.name),
            Cell::from(self.provider).style(Style::default().fg(theme.subtext1())),
            Cell::from(self.category),
            Cell::from(format_euros(self.price_cents)).style(Style::default().fg(theme.peach())),
            Cell::from(self.bookings.to_string()),
            listing_cell(self.status, theme),
        ]
    }

    fn matches(&self, query: &str) -> bool {
        Matcher::new().matches_any([self.name, self.provider, self.category], query)
    }
}

impl TableRow for ProviderListing {
    fn columns() -> &'static [ColumnDef] {
        static COLUMNS: &[ColumnDef] = &[
            ColumnDef::new("Proveedor", Constraint::Min(20)),
            ColumnDef::new("Categoría", Constraint::Length(10)),
            ColumnDef::new("Valoración", Constraint::Length(10)),
            ColumnDef::new("Servicios", Constraint::Length(9)),
            ColumnDef::new("Estado", Constraint::Length(10)),
        ];
        COLUMNS
    }

    fn render_cells(&self, theme: &Theme) -> Vec<Cell<'static>> {
        vec![
            Cell::from(self.name),
            Cell::from(self.category),
            Cell::from(format!("★ {}", self.rating)).style(Style::default().fg(theme.yellow())),
            Cell::from(self.services.to_string()),
            listing_cell(self.status, theme),
        ]
    }

    fn matches(&self, query: &str) -> bool {
        Matcher::new().matches_any([self.name, self.category], query)
    }
}

impl TableRow for ClientSummary {
    fn columns() -> &'static [ColumnDef] {
        static COLUMNS: &[ColumnDef] = &[
            ColumnDef::new("Cliente", Constraint::Min(16)),
            ColumnDef::new("Email", Constraint::Min(20)),
            ColumnDef::new("Reservas", Constraint::Length(8)),
            ColumnDef::new("Última visita", Constraint::Length(13)),
            ColumnDef::new("Gastado", Constraint::Length(10)),
        ];
        COLUMNS
    }

    fn render_cells(&self, theme: &Theme) -> Vec<Cell<'static>> {
        vec![
            Cell::from(self.name),
            Cell::from(self.email).style(Style::default().fg(theme.subtext1())),
            Cell::from(self.bookings.to_string()),
            Cell::from(self.last_visit),
            Cell::from(format_euros(self.spent_cents)).style(Style::default().fg(theme.green())),
        ]
    }

    fn matches(&self, query: &str) -> bool {
        Matcher::new().matches_any([self.name, self.email], query)
    }
}

impl TableRow for Appointment {
    fn columns() -> &'static [ColumnDef] {
        static COLUMNS: &[ColumnDef] = &[
            ColumnDef::new("Servicio", Constraint::Min(22)),
            ColumnDef::new("Proveedor", Constraint::Min(18)),
            ColumnDef::new("Cuándo", Constraint::Length(19)),
            ColumnDef::new("Referencia", Constraint::Length(11)),
            ColumnDef::new("Estado", Constraint::Length(11)),
        ];
        COLUMNS
    }

    fn render_cells(&self, theme: &Theme) -> Vec<Cell<'static>> {
        vec![
            Cell::from(self.service.clone()),
            Cell::from(self.provider.clone()).style(Style::default().fg(theme.subtext1())),
            Cell::from(self.schedule.clone()),
            Cell::from(self.reference.clone().unwrap_or_else(|| "-".to_string()))
                .style(Style::default().fg(theme.lavender())),
            status_cell(self.status, theme),
        ]
    }

    fn matches(&self, query: &str) -> bool {
        let matcher = Matcher::new();
        matcher.matches_any([self.service.as_str(), self.provider.as_str()], query)
            || self
                .reference
                .as_deref()
                .is_some_and(|r| matcher.matches(r, query))
    }
}

fn render_notices(frame: &mut Frame, area: Rect, title: &str, notices: &[Notice], theme: &Theme) {
    let mut lines = Vec::new();
    for notice in notices {
        lines.push(Line::from(vec![
            Span::styled(
                notice.title,
                Style::default()
                    .fg(theme.text())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", notice.when), Style::default().fg(theme.overlay0())),
        ]));
        lines.push(Line::from(Span::styled(
            notice.message,
            Style::default().fg(theme.subtext0()),
        )));
        lines.push(Line::from(""));
    }
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(panel(format!(" {title} "), theme)),
        area,
    );
}

/// One bar per category, scaled to the largest count.
fn render_categories(frame: &mut Frame, area: Rect, categories: &[Category], theme: &Theme) {
    const BAR_WIDTH: u32 = 30;
    let max = categories.iter().map(|c| c.count).max().unwrap_or(1).max(1);
    let lines: Vec<Line> = categories
        .iter()
        .map(|category| {
            let filled = usize::try_from(category.count * BAR_WIDTH / max).unwrap_or(0);
            Line::from(vec![
                Span::styled(
                    format!("{:<12}", category.name),
                    Style::default().fg(theme.text()),
                ),
                Span::styled("█".repeat(filled), Style::default().fg(theme.lavender())),
                Span::styled(
                    format!(" {}", category.count),
                    Style::default().fg(theme.subtext0()),
                ),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(lines).block(panel(" Categorías ", theme)),
        area,
    );
}

fn render_trends(frame: &mut Frame, area: Rect, trends: &[Trend], theme: &Theme) {
    let block = panel(" Tendencias ", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical(trends.iter().map(|_| Constraint::Length(2))).split(inner);
    for (trend, row) in trends.iter().zip(rows.iter()) {
        let [label, gauge] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(*row);
        frame.render_widget(
            Paragraph::new(Span::styled(trend.label, Style::default().fg(theme.subtext1()))),
            label,
        );
        frame.render_widget(
            Gauge::default()
                .gauge_style(Style::default().fg(theme.green()).bg(theme.surface0()))
                .percent(trend.percent.min(100)),
            gauge,
        );
    }
}

/// Stats on top, the given pane below.
fn with_stats(frame: &mut Frame, area: Rect, stats: &[Stat], theme: &Theme) -> Rect {
    let [stats_area, body] =
        Layout::vertical([Constraint::Length(4), Constraint::Min(5)]).areas(area);
    render_stats(frame, stats_area, stats, theme);
    body
}

fn split_side(area: Rect) -> [Rect; 2] {
    Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)]).areas(area)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pane {
    Sections,
    Content,
}

/// A dashboard section as shown in the side list. The default section is
/// the one shown first.
trait Section: Copy + PartialEq + Default + 'static {
    const ALL: &'static [Self];

    fn title(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SectionItem<S>(S);

impl<S: Section> ListRow for SectionItem<S> {
    fn render_row(&self, theme: &Theme) -> ListItem<'static> {
        ListItem::new(Line::from(Span::styled(
            format!(" {}", self.0.title()),
            Style::default().fg(theme.text()),
        )))
    }
}

/// Side list of sections plus which pane has focus.
struct SectionNav<S: Section> {
    list: List<SectionItem<S>>,
    active: S,
    focus: Pane,
}

impl<S: Section> SectionNav<S> {
    fn new(resolver: Arc<KeyResolver>) -> Self {
        let items: Vec<_> = S::ALL.iter().copied().map(SectionItem).collect();
        Self {
            active: S::default(),
            list: List::new(items, resolver),
            focus: Pane::Sections,
        }
    }

    const fn active(&self) -> S {
        self.active
    }

    fn content_focused(&self) -> bool {
        self.focus == Pane::Content
    }

    /// Keys while the section list has focus.
    fn handle_key(&mut self, key: KeyEvent, resolver: &KeyResolver) -> Result<EventResult<NavIntent>> {
        if resolver.matches_global(&key, GlobalAction::Back) {
            return Ok(NavIntent::ReturnToCatalog.into());
        }
        if resolver.matches_form(&key, FormAction::NextField) {
            self.focus = Pane::Content;
            return Ok(EventResult::Consumed);
        }
        Ok(match self.list.handle_key(key)? {
            EventResult::Event(ListEvent::Changed(SectionItem(section))) => {
                self.active = section;
                EventResult::Consumed
            }
            EventResult::Event(ListEvent::Activated(SectionItem(section))) => {
                self.active = section;
                self.focus = Pane::Content;
                EventResult::Consumed
            }
            EventResult::Consumed => EventResult::Consumed,
            EventResult::Ignored => EventResult::Ignored,
        })
    }

    /// Keys the focused section left unhandled: Back and Tab return to the list.
    fn leave_content(&mut self, key: &KeyEvent, resolver: &KeyResolver) -> EventResult<NavIntent> {
        if resolver.matches_global(key, GlobalAction::Back)
            || resolver.matches_form(key, FormAction::NextField)
        {
            self.focus = Pane::Sections;
            return EventResult::Consumed;
        }
        EventResult::Ignored
    }

    /// Draw the list and return the content area.
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) -> Rect {
        let [side, content] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
                .areas(area);
        let mut block = panel(" Secciones ", theme);
        if self.focus == Pane::Sections {
            block = block.border_style(Style::default().fg(theme.lavender()));
        }
        let inner = block.inner(side);
        frame.render_widget(block, side);
        self.list.render(frame, inner, theme);
        content
    }

    fn keybindings(&self, resolver: &KeyResolver, searchable: bool) -> Vec<Keybinding> {
        let back = resolver.display_global(GlobalAction::Back);
        if self.focus == Pane::Sections {
            return vec![
                Keybinding::hint(resolver.display_nav(NavAction::Select), "Abrir sección"),
                Keybinding::hint(back, "Catálogo"),
            ];
        }
        let mut bindings = Vec::new();
        if searchable {
            bindings.push(Keybinding::hint(
                resolver.display_search(SearchAction::Toggle),
                "Buscar",
            ));
        }
        bindings.push(Keybinding::hint(back, "Secciones"));
        bindings
    }
}

/// Forward a key to a section table; activation is consumed.
fn table_key<T: TableRow + Clone>(table: &mut Table<T>, key: KeyEvent) -> Result<bool> {
    Ok(table.handle_key(key)?.is_consumed())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum AdminSection {
    #[default]
    Overview,
    Users,
    Providers,
    Services,
    Categories,
    Notifications,
}

impl Section for AdminSection {
    const ALL: &'static [Self] = &[
        Self::Overview,
        Self::Users,
        Self::Providers,
        Self::Services,
        Self::Categories,
        Self::Notifications,
    ];

    fn title(&self) -> &'static str {
        match self {
            Self::Overview => "Resumen",
            Self::Users => "Usuarios",
            Self::Providers => "Proveedores",
            Self::Services => "Servicios",
            Self::Categories => "Categorías",
            Self::Notifications => "Notificaciones",
        }
    }
}

pub struct AdminDashboardScreen {
    sections: SectionNav<AdminSection>,
    stats: Vec<Stat>,
    activity: Vec<Notice>,
    trends: Vec<Trend>,
    users: Table<PlatformUser>,
    providers: Table<ProviderListing>,
    services: Table<ServiceListing>,
    categories: Vec<Category>,
    notices: Vec<Notice>,
    resolver: Arc<KeyResolver>,
}

impl AdminDashboardScreen {
    pub fn new(resolver: Arc<KeyResolver>) -> Self {
        Self {
            sections: SectionNav::new(resolver.clone()),
            stats: dashboard::admin_stats(),
            activity: dashboard::admin_activity(),
            trends: dashboard::admin_trends(),
            users: Table::new(dashboard::platform_users(), resolver.clone())
                .with_title(" Usuarios "),
            providers: Table::new(dashboard::admin_providers(), resolver.clone())
                .with_title(" Proveedores "),
            services: Table::new(dashboard::admin_services(), resolver.clone())
                .with_title(" Servicios "),
            categories: dashboard::admin_categories(),
            notices: dashboard::admin_notices(),
            resolver,
        }
    }

    fn is_searching(&self) -> bool {
        match self.sections.active() {
            AdminSection::Users => self.users.is_searching(),
            AdminSection::Providers => self.providers.is_searching(),
            AdminSection::Services => self.services.is_searching(),
            _ => false,
        }
    }
}

impl Screen for AdminDashboardScreen {
    type Output = NavIntent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if !self.sections.content_focused() {
            return self.sections.handle_key(key, &self.resolver);
        }
        let consumed = match self.sections.active() {
            AdminSection::Users => table_key(&mut self.users, key)?,
            AdminSection::Providers => table_key(&mut self.providers, key)?,
            AdminSection::Services => table_key(&mut self.services, key)?,
            _ => false,
        };
        if consumed {
            return Ok(EventResult::Consumed);
        }
        Ok(self.sections.leave_content(&key, &self.resolver))
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let content = self.sections.render(frame, area, theme);
        match self.sections.active() {
            AdminSection::Overview => {
                let body = with_stats(frame, content, &self.stats, theme);
                let [activity, trends] = split_side(body);
                render_notices(frame, activity, "Actividad reciente", &self.activity, theme);
                render_trends(frame, trends, &self.trends, theme);
            }
            AdminSection::Users => self.users.render(frame, content, theme),
            AdminSection::Providers => self.providers.render(frame, content, theme),
            AdminSection::Services => self.services.render(frame, content, theme),
            AdminSection::Categories => {
                render_categories(frame, content, &self.categories, theme);
            }
            AdminSection::Notifications => {
                render_notices(frame, content, "Notificaciones", &self.notices, theme);
            }
        }
    }

    fn breadcrumbs(&self) -> Vec<String> {
        vec![
            "Panel de administración".to_string(),
            self.sections.active().title().to_string(),
        ]
    }

    fn is_editing(&self) -> bool {
        self.sections.content_focused() && self.is_searching()
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        let searchable = matches!(
            self.sections.active(),
            AdminSection::Users | AdminSection::Providers | AdminSection::Services
        );
        self.sections.keybindings(&self.resolver, searchable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ProviderSection {
    #[default]
    Overview,
    Services,
    Clients,
    Categories,
    Notifications,
}

impl Section for ProviderSection {
    const ALL: &'static [Self] = &[
        Self::Overview,
        Self::Services,
        Self::Clients,
        Self::Categories,
        Self::Notifications,
    ];

    fn title(&self) -> &'static str {
        match self {
            Self::Overview => "Resumen",
            Self::Services => "Mis servicios",
            Self::Clients => "Mis clientes",
            Self::Categories => "Categorías",
            Self::Notifications => "Notificaciones",
        }
    }
}

pub struct ProviderDashboardScreen {
    sections: SectionNav<ProviderSection>,
    stats: Vec<Stat>,
    agenda: Table<AgendaEntry>,
    services: Table<ServiceListing>,
    clients: Table<ClientSummary>,
    categories: Vec<Category>,
    notices: Vec<Notice>,
    resolver: Arc<KeyResolver>,
}

impl ProviderDashboardScreen {
    pub fn new(resolver: Arc<KeyResolver>) -> Self {
        Self {
            sections: SectionNav::new(resolver.clone()),
            stats: dashboard::provider_stats(),
            agenda: Table::new(dashboard::provider_agenda(), resolver.clone())
                .with_title(" Agenda de hoy "),
            services: Table::new(dashboard::provider_services(), resolver.clone())
                .with_title(" Mis servicios "),
            clients: Table::new(dashboard::provider_clients(), resolver.clone())
                .with_title(" Mis clientes "),
            categories: dashboard::marketplace_categories(),
            notices: dashboard::provider_notices(),
            resolver,
        }
    }

    fn is_searching(&self) -> bool {
        match self.sections.active() {
            ProviderSection::Overview => self.agenda.is_searching(),
            ProviderSection::Services => self.services.is_searching(),
            ProviderSection::Clients => self.clients.is_searching(),
            _ => false,
        }
    }
}

impl Screen for ProviderDashboardScreen {
    type Output = NavIntent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if !self.sections.content_focused() {
            return self.sections.handle_key(key, &self.resolver);
        }
        let consumed = match self.sections.active() {
            ProviderSection::Overview => table_key(&mut self.agenda, key)?,
            ProviderSection::Services => table_key(&mut self.services, key)?,
            ProviderSection::Clients => table_key(&mut self.clients, key)?,
            _ => false,
        };
        if consumed {
            return Ok(EventResult::Consumed);
        }
        Ok(self.sections.leave_content(&key, &self.resolver))
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let content = self.sections.render(frame, area, theme);
        match self.sections.active() {
            ProviderSection::Overview => {
                let body = with_stats(frame, content, &self.stats, theme);
                let [agenda, notices] = split_side(body);
                self.agenda.render(frame, agenda, theme);
                render_notices(frame, notices, "Actividad reciente", &self.notices, theme);
            }
            ProviderSection::Services => self.services.render(frame, content, theme),
            ProviderSection::Clients => self.clients.render(frame, content, theme),
            ProviderSection::Categories => {
                render_categories(frame, content, &self.categories, theme);
            }
            ProviderSection::Notifications => {
                render_notices(frame, content, "Notificaciones", &self.notices, theme);
            }
        }
    }

    fn breadcrumbs(&self) -> Vec<String> {
        vec![
            "Panel de proveedor".to_string(),
            self.sections.active().title().to_string(),
        ]
    }

    fn is_editing(&self) -> bool {
        self.sections.content_focused() && self.is_searching()
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        let searchable = matches!(
            self.sections.active(),
            ProviderSection::Overview | ProviderSection::Services | ProviderSection::Clients
        );
        self.sections.keybindings(&self.resolver, searchable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ClientSection {
    #[default]
    Bookings,
    History,
    Categories,
    Notifications,
}

impl Section for ClientSection {
    const ALL: &'static [Self] = &[
        Self::Bookings,
        Self::History,
        Self::Categories,
        Self::Notifications,
    ];

    fn title(&self) -> &'static str {
        match self {
            Self::Bookings => "Mis reservas",
            Self::History => "Historial",
            Self::Categories => "Categorías",
            Self::Notifications => "Notificaciones",
        }
    }
}

pub struct ClientDashboardScreen {
    sections: SectionNav<ClientSection>,
    appointments: Table<Appointment>,
    history: Table<Appointment>,
    categories: Vec<Category>,
    notices: Vec<Notice>,
    session_bookings: usize,
    /// Appointment opened with Enter, shown above the dashboard.
    detail: Option<Appointment>,
    resolver: Arc<KeyResolver>,
}

impl ClientDashboardScreen {
    /// Opens straight into the appointment list.
    pub fn new(bookings: &[Booking], resolver: Arc<KeyResolver>) -> Self {
        let mut sections = SectionNav::new(resolver.clone());
        sections.focus = Pane::Content;
        Self {
            sections,
            appointments: Table::new(dashboard::client_appointments(bookings), resolver.clone())
                .with_title(" Próximas citas "),
            history: Table::new(dashboard::client_history(), resolver.clone())
                .with_title(" Historial "),
            categories: dashboard::marketplace_categories(),
            notices: dashboard::client_notices(),
            session_bookings: bookings.len(),
            detail: None,
            resolver,
        }
    }

    fn active_table(&mut self) -> Option<&mut Table<Appointment>> {
        match self.sections.active() {
            ClientSection::Bookings => Some(&mut self.appointments),
            ClientSection::History => Some(&mut self.history),
            _ => None,
        }
    }

    fn handle_detail_key(&mut self, key: &KeyEvent) -> EventResult<NavIntent> {
        if self.resolver.matches_global(key, GlobalAction::Back)
            || self.resolver.matches_nav(key, NavAction::Select)
        {
            self.detail = None;
        }
        EventResult::Consumed
    }

    fn render_summary(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let mut lines = vec![
            Line::from(Span::styled(
                format!("Reservas en esta sesión: {}", self.session_bookings),
                Style::default().fg(theme.subtext1()),
            )),
            Line::from(""),
        ];
        if let Some(appointment) = self.appointments.selected_item() {
            lines.push(Line::from(Span::styled(
                appointment.service.clone(),
                Style::default()
                    .fg(theme.lavender())
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(appointment.provider.clone()));
            lines.push(Line::from(appointment.schedule.clone()));
            lines.push(Line::from(Span::styled(
                appointment.status.label(),
                Style::default().fg(theme.peach()),
            )));
        }
        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .block(panel(" Seleccionada ", theme)),
            area,
        );
    }

    fn render_detail(appointment: &Appointment, frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup = area.centered(Constraint::Max(64), Constraint::Length(12));
        frame.render_widget(Clear, popup);

        let mut lines = vec![
            Line::from(Span::styled(
                appointment.service.clone(),
                Style::default()
                    .fg(theme.lavender())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            field_line("Proveedor", appointment.provider.clone(), theme),
            field_line("Cuándo", appointment.schedule.clone(), theme),
            field_line("Dónde", appointment.location.clone(), theme),
            field_line("Total", format_euros(appointment.total_cents), theme),
        ];
        if let Some(method) = appointment.method {
            lines.push(field_line("Pago", method.label(), theme));
        }
        if let Some(reference) = &appointment.reference {
            lines.push(field_line("Referencia", reference.clone(), theme));
        }
        lines.push(field_line("Estado", appointment.status.label(), theme));

        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .block(panel(" Detalle de la reserva ", theme))
                .style(Style::default().bg(theme.base())),
            popup,
        );
    }
}

impl Screen for ClientDashboardScreen {
    type Output = NavIntent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.detail.is_some() {
            return Ok(self.handle_detail_key(&key));
        }
        if !self.sections.content_focused() {
            return self.sections.handle_key(key, &self.resolver);
        }

        let result = match self.active_table() {
            Some(table) => table.handle_key(key)?,
            None => EventResult::Ignored,
        };
        if let EventResult::Event(TableEvent::Activated(appointment)) = result {
            self.detail = Some(appointment);
            return Ok(EventResult::Consumed);
        }
        if result.is_consumed() {
            return Ok(EventResult::Consumed);
        }
        Ok(self.sections.leave_content(&key, &self.resolver))
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let content = self.sections.render(frame, area, theme);
        match self.sections.active() {
            ClientSection::Bookings => {
                let [table, side] = split_side(content);
                self.appointments.render(frame, table, theme);
                self.render_summary(frame, side, theme);
            }
            ClientSection::History => self.history.render(frame, content, theme),
            ClientSection::Categories => {
                render_categories(frame, content, &self.categories, theme);
            }
            ClientSection::Notifications => {
                render_notices(frame, content, "Notificaciones", &self.notices, theme);
            }
        }
        if let Some(appointment) = &self.detail {
            Self::render_detail(appointment, frame, area, theme);
        }
    }

    fn breadcrumbs(&self) -> Vec<String> {
        vec![
            "Mi cuenta".to_string(),
            self.sections.active().title().to_string(),
        ]
    }

    fn is_editing(&self) -> bool {
        let searching = match self.sections.active() {
            ClientSection::Bookings => self.appointments.is_searching(),
            ClientSection::History => self.history.is_searching(),
            _ => false,
        };
        self.sections.content_focused() && searching
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        if self.detail.is_some() {
            return vec![Keybinding::hint(
                self.resolver.display_global(GlobalAction::Back),
                "Cerrar",
            )];
        }
        let searchable = matches!(
            self.sections.active(),
            ClientSection::Bookings | ClientSection::History
        );
        let mut bindings = self.sections.keybindings(&self.resolver, searchable);
        if self.sections.content_focused() && searchable {
            bindings.insert(
                0,
                Keybinding::hint(self.resolver.display_nav(NavAction::Select), "Ver detalle"),
            );
        }
        bindings
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::model::PaymentMethod;
    use crate::model::booking::sample_target;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn resolver() -> Arc<KeyResolver> {
        Arc::new(KeyResolver::default())
    }

    fn type_text(screen: &mut impl Screen<Output = NavIntent>, text: &str) {
        for c in text.chars() {
            screen.handle_key(key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn test_client_dashboard_lists_session_booking_first() {
        let booking = Booking::with_reference("REF000001", sample_target("3"), PaymentMethod::Card);
        let screen = ClientDashboardScreen::new(&[booking], resolver());
        let first = screen.appointments.selected_item().unwrap();
        assert_eq!(first.reference.as_deref(), Some("REF000001"));
    }

    #[test]
    fn test_moving_through_sections_switches_content() {
        let mut screen = AdminDashboardScreen::new(resolver());
        assert_eq!(screen.sections.active(), AdminSection::Overview);

        screen.handle_key(key(KeyCode::Down)).unwrap();
        assert_eq!(screen.sections.active(), AdminSection::Users);
        screen.handle_key(key(KeyCode::Down)).unwrap();
        assert_eq!(screen.sections.active(), AdminSection::Providers);
        assert_eq!(
            screen.breadcrumbs(),
            vec!["Panel de administración".to_string(), "Proveedores".to_string()]
        );

        screen.handle_key(key(KeyCode::Char('G'))).unwrap();
        assert_eq!(screen.sections.active(), AdminSection::Notifications);
        assert!(!screen.sections.content_focused());
    }

    #[test]
    fn test_back_leaves_dashboard_unless_searching() {
        let mut screen = AdminDashboardScreen::new(resolver());
        screen.handle_key(key(KeyCode::Down)).unwrap();
        screen.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(screen.sections.content_focused());

        screen.handle_key(key(KeyCode::Char('/'))).unwrap();
        assert!(screen.is_editing());
        assert_eq!(
            screen.handle_key(key(KeyCode::Esc)).unwrap(),
            EventResult::Consumed
        );
        assert_eq!(
            screen.handle_key(key(KeyCode::Esc)).unwrap(),
            EventResult::Consumed
        );
        assert!(!screen.sections.content_focused());
        assert_eq!(
            screen.handle_key(key(KeyCode::Esc)).unwrap(),
            EventResult::Event(NavIntent::ReturnToCatalog)
        );
    }

    #[test]
    fn test_tab_toggles_focus() {
        let mut screen = ProviderDashboardScreen::new(resolver());
        screen.handle_key(key(KeyCode::Tab)).unwrap();
        assert!(screen.sections.content_focused());
        screen.handle_key(key(KeyCode::Tab)).unwrap();
        assert!(!screen.sections.content_focused());
    }

    #[test]
    fn test_agenda_search() {
        let mut screen = ProviderDashboardScreen::new(resolver());
        screen.handle_key(key(KeyCode::Enter)).unwrap();
        screen.handle_key(key(KeyCode::Char('/'))).unwrap();
        type_text(&mut screen, "facial");
        let visible: Vec<_> = screen.agenda.visible_items().map(|e| e.client).collect();
        assert_eq!(visible, vec!["Carlos Ruiz"]);
    }

    #[test]
    fn test_provider_services_section() {
        let mut screen = ProviderDashboardScreen::new(resolver());
        screen.handle_key(key(KeyCode::Down)).unwrap();
        assert_eq!(screen.sections.active(), ProviderSection::Services);
        screen.handle_key(key(KeyCode::Enter)).unwrap();

        screen.handle_key(key(KeyCode::Char('/'))).unwrap();
        type_text(&mut screen, "deportivo");
        let visible: Vec<_> = screen.services.visible_items().map(|s| s.name).collect();
        assert_eq!(visible, vec!["Masaje Deportivo"]);
        // The agenda is untouched by a search in another section.
        assert_eq!(screen.agenda.visible_items().count(), 3);
    }

    #[test]
    fn test_enter_opens_appointment_detail() {
        let booking = Booking::with_reference("REF000002", sample_target("1"), PaymentMethod::Transfer);
        let mut screen = ClientDashboardScreen::new(&[booking], resolver());

        assert_eq!(
            screen.handle_key(key(KeyCode::Enter)).unwrap(),
            EventResult::Consumed
        );
        let detail = screen.detail.as_ref().unwrap();
        assert_eq!(detail.reference.as_deref(), Some("REF000002"));
        assert_eq!(detail.method, Some(PaymentMethod::Transfer));

        // Keys stay with the popup until it closes.
        assert_eq!(
            screen.handle_key(key(KeyCode::Char('q'))).unwrap(),
            EventResult::Consumed
        );
        screen.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(screen.detail.is_none());
        assert!(screen.sections.content_focused());
    }

    #[test]
    fn test_client_history_section() {
        let mut screen = ClientDashboardScreen::new(&[], resolver());
        screen.handle_key(key(KeyCode::Esc)).unwrap();
        screen.handle_key(key(KeyCode::Down)).unwrap();
        assert_eq!(screen.sections.active(), ClientSection::History);

        screen.handle_key(key(KeyCode::Enter)).unwrap();
        screen.handle_key(key(KeyCode::Enter)).unwrap();
        let detail = screen.detail.as_ref().unwrap();
        assert_eq!(detail.status, BookingStatus::Completed);
        assert!(detail.method.is_none());
    }
}

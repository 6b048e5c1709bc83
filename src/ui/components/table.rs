use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::prelude::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Paragraph, Row, Table as RatatuiTable, TableState,
};

use crate::Theme;
use crate::config::{KeyResolver, NavAction, SearchAction};
use crate::ui::{Component, EventResult, Result};

const PAGE_STEP: usize = 10;

/// Event emitted by [`Table`].
pub enum TableEvent<T> {
    /// Selection changed to a new item.
    Changed(T),
    /// Item was activated (Enter pressed).
    Activated(T),
}

/// Column definition for a table.
pub struct ColumnDef {
    pub header: &'static str,
    pub constraint: Constraint,
}

impl ColumnDef {
    pub const fn new(header: &'static str, constraint: Constraint) -> Self {
        Self { header, constraint }
    }
}

/// Trait for items that can be displayed in a table.
pub trait TableRow {
    fn columns() -> &'static [ColumnDef];

    fn render_cells(&self, theme: &Theme) -> Vec<Cell<'static>>;

    /// Whether the row should stay visible for the given search query.
    fn matches(&self, query: &str) -> bool;
}

/// A selectable table with keyboard navigation and an inline search filter.
///
/// The search line opens with the search toggle key. While it is open,
/// printable characters edit the query. Enter closes the line and keeps
/// the filter, the search exit key closes it and clears the filter.
pub struct Table<T: TableRow + Clone> {
    items: Vec<T>,
    /// Indices into `items` that pass the current filter.
    visible: Vec<usize>,
    state: TableState,
    title: Option<String>,
    query: String,
    searching: bool,
    resolver: Arc<KeyResolver>,
}

impl<T: TableRow + Clone> Table<T> {
    pub fn new(items: Vec<T>, resolver: Arc<KeyResolver>) -> Self {
        let mut table = Self {
            visible: Vec::new(),
            items,
            state: TableState::default(),
            title: None,
            query: String::new(),
            searching: false,
            resolver,
        };
        table.apply_filter();
        table
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.state
            .selected()
            .and_then(|i| self.visible.get(i))
            .and_then(|&i| self.items.get(i))
    }

    pub const fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn visible_items(&self) -> impl Iterator<Item = &T> {
        self.visible.iter().filter_map(|&i| self.items.get(i))
    }

    fn apply_filter(&mut self) {
        self.visible = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| self.query.is_empty() || item.matches(&self.query))
            .map(|(i, _)| i)
            .collect();

        if self.visible.is_empty() {
            self.state.select(None);
        } else {
            let current = self.state.selected().unwrap_or(0);
            self.state.select(Some(current.min(self.visible.len() - 1)));
        }
    }

    fn change_event(&self, before: Option<usize>) -> EventResult<TableEvent<T>> {
        if self.state.selected() != before
            && let Some(item) = self.selected_item()
        {
            return TableEvent::Changed(item.clone()).into();
        }
        EventResult::Consumed
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> EventResult<TableEvent<T>> {
        if self.resolver.matches_search(&key, SearchAction::Exit) {
            self.searching = false;
            self.query.clear();
            self.apply_filter();
            return EventResult::Consumed;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => self.searching = false,
            (KeyCode::Backspace, _) => {
                self.query.pop();
                self.apply_filter();
            }
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.query.push(c);
                self.apply_filter();
            }
            // Navigation keys still move the selection while typing.
            (KeyCode::Up | KeyCode::Down, _) => return self.handle_nav_key(key),
            _ => {}
        }
        EventResult::Consumed
    }

    fn handle_nav_key(&mut self, key: KeyEvent) -> EventResult<TableEvent<T>> {
        if self.visible.is_empty() {
            return EventResult::Ignored;
        }
        let before = self.state.selected();
        let current = before.unwrap_or(0);
        let last = self.visible.len() - 1;

        let target = if self.resolver.matches_nav(&key, NavAction::Down) {
            (current + 1).min(last)
        } else if self.resolver.matches_nav(&key, NavAction::Up) {
            current.saturating_sub(1)
        } else if self.resolver.matches_nav(&key, NavAction::Home) {
            0
        } else if self.resolver.matches_nav(&key, NavAction::End) {
            last
        } else if self.resolver.matches_nav(&key, NavAction::PageDown) {
            (current + PAGE_STEP).min(last)
        } else if self.resolver.matches_nav(&key, NavAction::PageUp) {
            current.saturating_sub(PAGE_STEP)
        } else if self.resolver.matches_nav(&key, NavAction::Select) {
            return self
                .selected_item()
                .cloned()
                .map_or(EventResult::Ignored, |item| TableEvent::Activated(item).into());
        } else {
            return EventResult::Ignored;
        };

        self.state.select(Some(target));
        self.change_event(before)
    }

    fn render_search_line(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let mut spans = vec![
            Span::styled("/", Style::default().fg(theme.peach())),
            Span::styled(self.query.clone(), Style::default().fg(theme.text())),
        ];
        if self.searching {
            spans.push(Span::styled(
                " ",
                Style::default().bg(theme.text()).fg(theme.base()),
            ));
        }
        spans.push(Span::styled(
            format!("  {}/{}", self.visible.len(), self.items.len()),
            Style::default().fg(theme.overlay1()),
        ));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl<T: TableRow + Clone> Component for Table<T> {
    type Output = TableEvent<T>;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.searching {
            return Ok(self.handle_search_key(key));
        }
        if self.resolver.matches_search(&key, SearchAction::Toggle) {
            self.searching = true;
            return Ok(EventResult::Consumed);
        }
        Ok(self.handle_nav_key(key))
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let show_search = self.searching || !self.query.is_empty();
        let [table_area, search_area] = if show_search {
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area)
        } else {
            [area, Rect::default()]
        };

        let columns = T::columns();

        let header_cells: Vec<Cell> = columns
            .iter()
            .map(|c| {
                Cell::from(c.header).style(
                    Style::default()
                        .fg(theme.header())
                        .add_modifier(Modifier::BOLD),
                )
            })
            .collect();
        let header = Row::new(header_cells)
            .height(1)
            .style(Style::default().bg(theme.surface0()));

        let rows: Vec<Row> = self
            .visible_items()
            .map(|item| Row::new(item.render_cells(theme)).style(Style::default().fg(theme.text())))
            .collect();

        let widths: Vec<Constraint> = columns.iter().map(|c| c.constraint).collect();

        let mut table = RatatuiTable::new(rows, widths)
            .header(header)
            .row_highlight_style(
                Style::default()
                    .bg(theme.selection_bg())
                    .fg(theme.lavender())
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        if let Some(title) = &self.title {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.border()))
                .title(title.as_str())
                .title_style(
                    Style::default()
                        .fg(theme.mauve())
                        .add_modifier(Modifier::BOLD),
                );
            table = table.block(block);
        }

        frame.render_stateful_widget(table, table_area, &mut self.state);

        if show_search {
            self.render_search_line(frame, search_area, theme);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Item(&'static str);

    impl TableRow for Item {
        fn columns() -> &'static [ColumnDef] {
            static COLUMNS: &[ColumnDef] = &[ColumnDef::new("Nombre", Constraint::Min(10))];
            COLUMNS
        }

        fn render_cells(&self, _theme: &Theme) -> Vec<Cell<'static>> {
            vec![Cell::from(self.0)]
        }

        fn matches(&self, query: &str) -> bool {
            self.0.to_lowercase().contains(&query.to_lowercase())
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn table() -> Table<Item> {
        Table::new(
            vec![Item("Masaje"), Item("Corte"), Item("Cena")],
            Arc::new(KeyResolver::default()),
        )
    }

    fn type_query(table: &mut Table<Item>, query: &str) {
        table.handle_key(key(KeyCode::Char('/'))).unwrap();
        for c in query.chars() {
            table.handle_key(key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn test_activate_selected_row() {
        let mut table = table();
        table.handle_key(key(KeyCode::Down)).unwrap();
        assert!(matches!(
            table.handle_key(key(KeyCode::Enter)).unwrap(),
            EventResult::Event(TableEvent::Activated(Item("Corte")))
        ));
    }

    #[test]
    fn test_search_filters_rows() {
        let mut table = table();
        type_query(&mut table, "ce");
        assert!(table.is_searching());
        let names: Vec<_> = table.visible_items().map(|i| i.0).collect();
        assert_eq!(names, vec!["Cena"]);

        // Enter leaves search mode but keeps the filter.
        table.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(!table.is_searching());
        assert_eq!(table.selected_item(), Some(&Item("Cena")));
        assert!(matches!(
            table.handle_key(key(KeyCode::Enter)).unwrap(),
            EventResult::Event(TableEvent::Activated(Item("Cena")))
        ));
    }

    #[test]
    fn test_search_exit_clears_filter() {
        let mut table = table();
        type_query(&mut table, "zzz");
        assert_eq!(table.visible_items().count(), 0);
        assert!(table.selected_item().is_none());

        table.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(!table.is_searching());
        assert_eq!(table.visible_items().count(), 3);
        assert_eq!(table.selected_item(), Some(&Item("Masaje")));
    }

    #[test]
    fn test_search_swallows_shortcut_characters() {
        let mut table = table();
        type_query(&mut table, "q");
        assert!(table.is_searching());
        assert_eq!(table.visible_items().count(), 0);
    }
}

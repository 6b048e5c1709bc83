use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::prelude::{Modifier, Style};
use ratatui::widgets::{List as RatatuiList, ListItem, ListState};

use crate::Theme;
use crate::config::{KeyResolver, NavAction};
use crate::ui::{Component, EventResult, Result};

const PAGE_STEP: usize = 5;

pub enum ListEvent<T> {
    Changed(T),
    Activated(T),
}

pub trait ListRow {
    fn render_row(&self, theme: &Theme) -> ListItem<'static>;
}

/// Selectable list driven by the navigation keybindings.
pub struct List<T: ListRow + Clone> {
    items: Vec<T>,
    state: ListState,
    resolver: Arc<KeyResolver>,
}

impl<T: ListRow + Clone> List<T> {
    pub fn new(items: Vec<T>, resolver: Arc<KeyResolver>) -> Self {
        let mut state = ListState::default();
        if !items.is_empty() {
            state.select(Some(0));
        }
        Self {
            items,
            state,
            resolver,
        }
    }

    pub fn selected(&self) -> Option<&T> {
        self.state.selected().and_then(|i| self.items.get(i))
    }

    fn change_event(&self, before: Option<usize>) -> EventResult<ListEvent<T>> {
        if let Some(selected) = self.state.selected()
            && Some(selected) != before
            && let Some(item) = self.items.get(selected)
        {
            return ListEvent::Changed(item.clone()).into();
        }
        EventResult::Consumed
    }

    fn last_index(&self) -> usize {
        self.items.len().saturating_sub(1)
    }
}

impl<T: ListRow + Clone> Component for List<T> {
    type Output = ListEvent<T>;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.items.is_empty() {
            return Ok(EventResult::Ignored);
        }
        let before = self.state.selected();
        let current = before.unwrap_or(0);

        let target = if self.resolver.matches_nav(&key, NavAction::Down) {
            (current + 1).min(self.last_index())
        } else if self.resolver.matches_nav(&key, NavAction::Up) {
            current.saturating_sub(1)
        } else if self.resolver.matches_nav(&key, NavAction::Home) {
            0
        } else if self.resolver.matches_nav(&key, NavAction::End) {
            self.last_index()
        } else if self.resolver.matches_nav(&key, NavAction::PageDown) {
            (current + PAGE_STEP).min(self.last_index())
        } else if self.resolver.matches_nav(&key, NavAction::PageUp) {
            current.saturating_sub(PAGE_STEP)
        } else if self.resolver.matches_nav(&key, NavAction::Select) {
            return Ok(self
                .selected()
                .cloned()
                .map_or(EventResult::Ignored, |item| ListEvent::Activated(item).into()));
        } else {
            return Ok(EventResult::Ignored);
        };

        self.state.select(Some(target));
        Ok(self.change_event(before))
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let items: Vec<ListItem> = self.items.iter().map(|i| i.render_row(theme)).collect();

        let list = RatatuiList::new(items)
            .highlight_style(
                Style::default()
                    .bg(theme.selection_bg())
                    .fg(theme.lavender())
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(list, area, &mut self.state);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Row(&'static str);

    impl ListRow for Row {
        fn render_row(&self, _theme: &Theme) -> ListItem<'static> {
            ListItem::new(self.0)
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn list() -> List<Row> {
        List::new(
            vec![Row("Tarjeta"), Row("Transferencia"), Row("En el local")],
            Arc::new(KeyResolver::default()),
        )
    }

    #[test]
    fn test_navigation_clamps_at_edges() {
        let mut list = list();
        assert!(matches!(
            list.handle_key(key(KeyCode::Up)).unwrap(),
            EventResult::Consumed
        ));
        assert!(matches!(
            list.handle_key(key(KeyCode::Char('j'))).unwrap(),
            EventResult::Event(ListEvent::Changed(Row("Transferencia")))
        ));
        list.handle_key(key(KeyCode::Char('G'))).unwrap();
        assert_eq!(list.selected(), Some(&Row("En el local")));
        assert!(matches!(
            list.handle_key(key(KeyCode::Down)).unwrap(),
            EventResult::Consumed
        ));
    }

    #[test]
    fn test_enter_activates_selection() {
        let mut list = list();
        list.handle_key(key(KeyCode::Down)).unwrap();
        assert!(matches!(
            list.handle_key(key(KeyCode::Enter)).unwrap(),
            EventResult::Event(ListEvent::Activated(Row("Transferencia")))
        ));
    }

    #[test]
    fn test_unknown_key_is_ignored() {
        let mut list = list();
        assert!(!list.handle_key(key(KeyCode::Char('x'))).unwrap().is_consumed());
    }
}

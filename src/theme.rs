use catppuccin::PALETTE;
use ratatui::style::Color;

/// Convert a catppuccin color to a ratatui color.
const fn catppuccin_to_color(c: &catppuccin::Color) -> Color {
    Color::Rgb(c.rgb.r, c.rgb.g, c.rgb.b)
}

/// Application theme.
///
/// Holds the palette colors the screens draw with. Semantic accessors
/// (`border`, `selection_bg`, ...) map UI roles onto palette entries.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    base: Color,
    surface0: Color,
    surface1: Color,
    surface2: Color,
    overlay0: Color,
    overlay1: Color,
    text: Color,
    subtext0: Color,
    subtext1: Color,
    red: Color,
    peach: Color,
    yellow: Color,
    green: Color,
    teal: Color,
    blue: Color,
    mauve: Color,
    lavender: Color,
}

macro_rules! palette_accessors {
    ($($name:ident),* $(,)?) => {
        $(
            #[must_use]
            pub const fn $name(&self) -> Color {
                self.$name
            }
        )*
    };
}

impl Theme {
    const fn from_catppuccin(flavor: &catppuccin::Flavor) -> Self {
        let c = &flavor.colors;
        Self {
            base: catppuccin_to_color(&c.base),
            surface0: catppuccin_to_color(&c.surface0),
            surface1: catppuccin_to_color(&c.surface1),
            surface2: catppuccin_to_color(&c.surface2),
            overlay0: catppuccin_to_color(&c.overlay0),
            overlay1: catppuccin_to_color(&c.overlay1),
            text: catppuccin_to_color(&c.text),
            subtext0: catppuccin_to_color(&c.subtext0),
            subtext1: catppuccin_to_color(&c.subtext1),
            red: catppuccin_to_color(&c.red),
            peach: catppuccin_to_color(&c.peach),
            yellow: catppuccin_to_color(&c.yellow),
            green: catppuccin_to_color(&c.green),
            teal: catppuccin_to_color(&c.teal),
            blue: catppuccin_to_color(&c.blue),
            mauve: catppuccin_to_color(&c.mauve),
            lavender: catppuccin_to_color(&c.lavender),
        }
    }

    palette_accessors!(
        base, surface0, surface1, surface2, overlay0, overlay1, text, subtext0, subtext1, red,
        peach, yellow, green, teal, blue, mauve, lavender,
    );

    #[must_use]
    pub const fn border(&self) -> Color {
        self.surface1
    }

    #[must_use]
    pub const fn selection_bg(&self) -> Color {
        self.surface1
    }

    #[must_use]
    pub const fn header(&self) -> Color {
        self.yellow
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_catppuccin(&PALETTE.mocha)
    }
}

/// A named built-in theme.
#[derive(Debug, Clone)]
pub struct ThemeInfo {
    pub name: &'static str,
    pub theme: Theme,
}

impl std::fmt::Display for ThemeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Returns a list of all available built-in themes.
pub fn available_themes() -> Vec<ThemeInfo> {
    [
        ("Catppuccin Mocha", &PALETTE.mocha),
        ("Catppuccin Macchiato", &PALETTE.macchiato),
        ("Catppuccin Frappé", &PALETTE.frappe),
        ("Catppuccin Latte", &PALETTE.latte),
    ]
    .into_iter()
    .map(|(name, flavor)| ThemeInfo {
        name,
        theme: Theme::from_catppuccin(flavor),
    })
    .collect()
}

/// Look up a theme by name. Returns the default theme if not found.
pub fn theme_from_name(name: &str) -> Theme {
    available_themes()
        .into_iter()
        .find(|t| t.name == name)
        .map(|t| t.theme)
        .unwrap_or_else(|| {
            tracing::warn!(name, "Unknown theme, falling back to default");
            Theme::default()
        })
}

// === Theme Selector View ===

use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Clear, ListItem};

use crate::config::{GlobalAction, KeyResolver};
use crate::ui::{Component, EventResult, List, ListEvent, ListRow, Result};

impl ListRow for ThemeInfo {
    fn render_row(&self, theme: &Theme) -> ListItem<'static> {
        ListItem::new(self.name.to_string()).style(Style::default().fg(theme.text()))
    }
}

pub enum ThemeEvent {
    Cancelled,
    Selected(ThemeInfo),
}

pub struct ThemeSelectorView {
    list: List<ThemeInfo>,
    resolver: Arc<KeyResolver>,
}

impl ThemeSelectorView {
    pub fn new(resolver: Arc<KeyResolver>) -> Self {
        Self {
            list: List::new(available_themes(), resolver.clone()),
            resolver,
        }
    }
}

impl Component for ThemeSelectorView {
    type Output = ThemeEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.resolver.matches_global(&key, GlobalAction::Back)
            || self.resolver.matches_global(&key, GlobalAction::Theme)
        {
            return Ok(ThemeEvent::Cancelled.into());
        }

        let result = self.list.handle_key(key)?;
        Ok(match result {
            EventResult::Event(ListEvent::Activated(info)) => ThemeEvent::Selected(info).into(),
            // Modal: swallow everything else.
            _ => EventResult::Consumed,
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup_area = area.centered(Constraint::Percentage(40), Constraint::Percentage(50));
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Tema (Enter para aplicar, Esc para cancelar) ")
            .title_style(
                Style::default()
                    .fg(theme.mauve())
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.lavender()))
            .style(Style::default().bg(theme.base()));

        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);
        self.list.render(frame, inner, theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_lookup() {
        let names: Vec<_> = available_themes().iter().map(|t| t.name).collect();
        assert_eq!(names.len(), 4);
        assert!(names.contains(&"Catppuccin Latte"));

        let latte = theme_from_name("Catppuccin Latte");
        assert_ne!(latte.base(), Theme::default().base());
        assert_eq!(theme_from_name("nope").base(), Theme::default().base());
    }
}

pub mod components;
pub mod widgets;

mod error_dialog;
mod help;
mod status_bar;
mod toast;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

pub use color_eyre::Result;

use crate::Theme;

pub use components::{
    ColumnDef, List, ListEvent, ListRow, Table, TableEvent, TableRow, TextInput, TextInputEvent,
};
pub use widgets::Spinner;

pub use error_dialog::{ErrorDialog, ErrorDialogEvent};
pub use help::{HelpEvent, HelpOverlay, Keybinding, KeybindingSection};
pub use status_bar::StatusBar;
pub use toast::{Toast, ToastManager, ToastType};

/// Result of handling an input event.
///
/// - `Ignored` - The handler didn't recognize this input, the parent should process it
/// - `Consumed` - The input was handled but produced no output
/// - `Event(E)` - The input was handled and produced an output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResult<E> {
    Ignored,
    Consumed,
    Event(E),
}

impl<E> EventResult<E> {
    /// Returns true if the input was consumed (either with or without an event).
    pub const fn is_consumed(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

impl<E> From<E> for EventResult<E> {
    fn from(event: E) -> Self {
        Self::Event(event)
    }
}

/// Interactive UI building block.
///
/// Components are reusable widgets that handle input events and emit
/// generic outputs. They know nothing about bookings or sessions.
pub trait Component {
    type Output;

    /// Handle a key event.
    ///
    /// Returns `Err(...)` if an error occurred during handling.
    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        _ = key;
        Ok(EventResult::Ignored)
    }

    /// Called on each tick for animations and time-based updates.
    fn handle_tick(&mut self) {}

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);
}

/// Full-page view that orchestrates components.
///
/// Screens translate component events into navigation requests. They know
/// about the domain but never mutate navigation state themselves.
pub trait Screen {
    type Output;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>>;

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);

    /// Called on each tick for animations and time-based updates.
    fn handle_tick(&mut self) {}

    /// Breadcrumb segments shown above the screen, e.g. `["Catálogo", "Pago"]`.
    fn breadcrumbs(&self) -> Vec<String> {
        vec![]
    }

    /// Whether the screen is capturing text input.
    ///
    /// Global single-character shortcuts are suppressed while this is true.
    fn is_editing(&self) -> bool {
        false
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        vec![]
    }
}

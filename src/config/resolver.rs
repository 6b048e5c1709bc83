use std::sync::Arc;

use crossterm::event::KeyEvent;

use crate::config::actions::{
    BookingAction, DialogAction, FormAction, GlobalAction, NavAction, SearchAction,
};
use crate::config::key::KeyBinding;
use crate::config::keybindings::KeybindingsConfig;

/// Maps key events to configured actions.
pub struct KeyResolver {
    pub keybindings: Arc<KeybindingsConfig>,
}

impl KeyResolver {
    pub const fn new(keybindings: Arc<KeybindingsConfig>) -> Self {
        Self { keybindings }
    }

    fn global(&self, action: GlobalAction) -> &KeyBinding {
        let kb = &self.keybindings.global;
        match action {
            GlobalAction::Quit => &kb.quit,
            GlobalAction::Help => &kb.help,
            GlobalAction::Theme => &kb.theme,
            GlobalAction::Back => &kb.back,
            GlobalAction::Logout => &kb.logout,
        }
    }

    fn nav(&self, action: NavAction) -> &KeyBinding {
        let kb = &self.keybindings.navigation;
        match action {
            NavAction::Up => &kb.up,
            NavAction::Down => &kb.down,
            NavAction::PageUp => &kb.page_up,
            NavAction::PageDown => &kb.page_down,
            NavAction::Home => &kb.home,
            NavAction::End => &kb.end,
            NavAction::Select => &kb.select,
        }
    }

    fn search(&self, action: SearchAction) -> &KeyBinding {
        let kb = &self.keybindings.search;
        match action {
            SearchAction::Toggle => &kb.toggle,
            SearchAction::Exit => &kb.exit,
        }
    }

    fn form(&self, action: FormAction) -> &KeyBinding {
        let kb = &self.keybindings.form;
        match action {
            FormAction::NextField => &kb.next_field,
            FormAction::Submit => &kb.submit,
            FormAction::TogglePassword => &kb.toggle_password,
        }
    }

    fn booking(&self, action: BookingAction) -> &KeyBinding {
        let kb = &self.keybindings.booking;
        match action {
            BookingAction::Confirm => &kb.confirm,
            BookingAction::Login => &kb.login,
            BookingAction::ViewBookings => &kb.view_bookings,
        }
    }

    fn dialog(&self, action: DialogAction) -> &KeyBinding {
        let kb = &self.keybindings.dialog;
        match action {
            DialogAction::Dismiss => &kb.dismiss,
        }
    }

    pub fn matches_global(&self, event: &KeyEvent, action: GlobalAction) -> bool {
        self.global(action).matches(event)
    }

    pub fn display_global(&self, action: GlobalAction) -> String {
        self.global(action).display()
    }

    pub fn matches_nav(&self, event: &KeyEvent, action: NavAction) -> bool {
        self.nav(action).matches(event)
    }

    pub fn display_nav(&self, action: NavAction) -> String {
        self.nav(action).display()
    }

    pub fn matches_search(&self, event: &KeyEvent, action: SearchAction) -> bool {
        self.search(action).matches(event)
    }

    pub fn display_search(&self, action: SearchAction) -> String {
        self.search(action).display()
    }

    pub fn matches_form(&self, event: &KeyEvent, action: FormAction) -> bool {
        self.form(action).matches(event)
    }

    pub fn display_form(&self, action: FormAction) -> String {
        self.form(action).display()
    }

    pub fn matches_booking(&self, event: &KeyEvent, action: BookingAction) -> bool {
        self.booking(action).matches(event)
    }

    pub fn display_booking(&self, action: BookingAction) -> String {
        self.booking(action).display()
    }

    pub fn matches_dialog(&self, event: &KeyEvent, action: DialogAction) -> bool {
        self.dialog(action).matches(event)
    }
}

impl Default for KeyResolver {
    fn default() -> Self {
        Self::new(Arc::new(KeybindingsConfig::default()))
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;

    #[test]
    fn test_default_bindings() {
        let resolver = KeyResolver::default();
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        let tab = KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE);
        let ctrl_r = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);

        assert!(resolver.matches_nav(&enter, NavAction::Select));
        assert!(resolver.matches_booking(&enter, BookingAction::Confirm));
        assert!(resolver.matches_form(&tab, FormAction::NextField));
        assert!(resolver.matches_form(&ctrl_r, FormAction::TogglePassword));
        assert!(!resolver.matches_global(&enter, GlobalAction::Quit));
    }

    #[test]
    fn test_display() {
        let resolver = KeyResolver::default();
        assert_eq!(resolver.display_nav(NavAction::Down), "j/Down");
        assert_eq!(resolver.display_form(FormAction::TogglePassword), "ctrl+r");
        assert_eq!(resolver.display_global(GlobalAction::Logout), "o");
    }
}

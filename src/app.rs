use std::sync::Arc;

use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info};

use crate::Theme;
use crate::commands::Command;
use crate::config::{self, GlobalAction, KeyResolver};
use crate::model::BookingTarget;
use crate::navigation::{self, LoginAttempt, NavigationController, PaymentAttempt};
use crate::screen::{self, BoxedScreen, NavIntent};
use crate::theme::{ThemeEvent, ThemeSelectorView};
use crate::tui::{Event, Tui};
use crate::ui::{
    Component, ErrorDialog, ErrorDialogEvent, EventResult, HelpEvent, HelpOverlay,
    KeybindingSection, StatusBar, Toast, ToastManager, ToastType,
};

const FRAME_RATE: f64 = 30.0;
const TICK_RATE: f64 = 10.0;
const STATUS_BAR_HEIGHT: u16 = 7;

/// Messages sent to the App from spawned commands.
#[derive(Debug)]
pub enum AppMessage {
    /// A login redirect finished waiting.
    LoginCompleted(LoginAttempt),
    /// A payment finished processing.
    PaymentCompleted(PaymentAttempt),
    CommandFailed {
        name: String,
        error: String,
    },
}

/// Popups drawn above the active screen. Only one is open at a time and it
/// receives every key until it closes.
enum Overlay {
    Help(HelpOverlay),
    Theme(ThemeSelectorView),
    Error(ErrorDialog),
}

pub struct App {
    nav: NavigationController,
    catalog: Vec<BookingTarget>,
    resolver: Arc<KeyResolver>,
    theme: Theme,
    view: BoxedScreen,
    view_revision: u64,
    overlay: Option<Overlay>,
    toasts: ToastManager,
    status_bar: StatusBar,
    message_tx: UnboundedSender<AppMessage>,
    message_rx: UnboundedReceiver<AppMessage>,
    should_quit: bool,
    should_suspend: bool,
}

impl App {
    pub fn new(
        nav: NavigationController,
        catalog: Vec<BookingTarget>,
        resolver: Arc<KeyResolver>,
        theme: Theme,
    ) -> Self {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        let view = screen::for_state(&nav, &catalog, &resolver);
        let mut status_bar = StatusBar::new(resolver.clone());
        status_bar.set_session(nav.session().cloned(), nav.bookings().len());
        Self {
            view_revision: nav.revision(),
            nav,
            catalog,
            resolver,
            theme,
            view,
            overlay: None,
            toasts: ToastManager::new(),
            status_bar,
            message_tx,
            message_rx,
            should_quit: false,
            should_suspend: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new(FRAME_RATE, TICK_RATE)?;
        tui.enter()?;

        loop {
            self.handle_events(&mut tui).await?;
            self.handle_messages();
            if self.should_suspend {
                tui.suspend()?;
                tui.resume()?;
                self.should_suspend = false;
            } else if self.should_quit {
                break;
            }
        }

        info!("Shutting down");
        tui.exit()?;
        Ok(())
    }

    async fn handle_events(&mut self, tui: &mut Tui) -> Result<()> {
        let Some(event) = tui.next_event().await else {
            self.should_quit = true;
            return Ok(());
        };

        match event {
            Event::Init => debug!("Terminal ready"),
            Event::Quit => self.should_quit = true,
            Event::Suspend => self.should_suspend = true,
            Event::Tick => self.handle_tick(),
            Event::Render => self.render(tui)?,
            Event::Resize(width, height) => {
                tui.resize(Rect::new(0, 0, width, height))?;
                self.render(tui)?;
            }
            Event::Key(key) => self.handle_key(key)?,
            Event::Error(err) => error!(error = %err, "Terminal event error"),
        }
        Ok(())
    }

    fn handle_tick(&mut self) {
        self.view.handle_tick();
        self.toasts.handle_tick();
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.overlay.is_some() {
            return self.handle_overlay_key(key);
        }

        let result = self.view.handle_key(key)?;
        match result {
            EventResult::Event(intent) => self.apply_intent(intent),
            EventResult::Consumed => {}
            EventResult::Ignored if self.view.is_editing() => {}
            EventResult::Ignored => self.handle_global_key(&key),
        }
        Ok(())
    }

    fn handle_overlay_key(&mut self, key: KeyEvent) -> Result<()> {
        let mut selected_theme = None;
        let close = match &mut self.overlay {
            Some(Overlay::Help(help)) => {
                matches!(help.handle_key(key)?, EventResult::Event(HelpEvent::Close))
            }
            Some(Overlay::Error(dialog)) => matches!(
                dialog.handle_key(key)?,
                EventResult::Event(ErrorDialogEvent::Dismissed)
            ),
            Some(Overlay::Theme(selector)) => match selector.handle_key(key)? {
                EventResult::Event(ThemeEvent::Selected(info)) => {
                    selected_theme = Some(info);
                    true
                }
                EventResult::Event(ThemeEvent::Cancelled) => true,
                _ => false,
            },
            None => false,
        };
        if close {
            self.overlay = None;
        }

        if let Some(info) = selected_theme {
            info!(theme = info.name, "Theme selected");
            self.theme = info.theme;
            if let Err(err) = config::save_theme(info.name) {
                self.show_error("No se pudo guardar el tema", &err);
            }
        }
        Ok(())
    }

    fn handle_global_key(&mut self, key: &KeyEvent) {
        if self.resolver.matches_global(key, GlobalAction::Quit) {
            self.should_quit = true;
        } else if self.resolver.matches_global(key, GlobalAction::Help) {
            self.open_help();
        } else if self.resolver.matches_global(key, GlobalAction::Theme) {
            self.overlay = Some(Overlay::Theme(ThemeSelectorView::new(
                self.resolver.clone(),
            )));
        } else if self.resolver.matches_global(key, GlobalAction::Logout) {
            if self.nav.session().is_none() {
                self.toasts
                    .show(Toast::new("No hay ninguna sesión iniciada", ToastType::Warning));
                return;
            }
            self.nav.logout();
            self.toasts.show(Toast::info("Sesión cerrada"));
            self.sync_view();
        }
    }

    fn open_help(&mut self) {
        let sections = vec![
            KeybindingSection::new(
                self.view
                    .breadcrumbs()
                    .last()
                    .cloned()
                    .unwrap_or_else(|| "Pantalla".to_string()),
                self.view.keybindings(),
            ),
            KeybindingSection::new("General", self.status_bar.global_keybindings()),
        ];
        self.overlay = Some(Overlay::Help(HelpOverlay::new(
            sections,
            self.resolver.clone(),
        )));
    }

    fn apply_intent(&mut self, intent: NavIntent) {
        debug!(?intent, "Navigation intent");
        match intent {
            NavIntent::SelectService(target) => self.nav.select_booking_target(target),
            NavIntent::OpenLogin => self.nav.open_login(),
            NavIntent::SubmitLogin { .. } if self.nav.is_transitioning() => {
                debug!("Login already in progress, ignoring submission");
            }
            NavIntent::SubmitLogin { email, password } => {
                let redirect = self.nav.submit_login(&email, &password);
                self.spawn_command(redirect);
            }
            NavIntent::ConfirmDetails => self.nav.confirm_booking_details(),
            NavIntent::BackToDetails => self.nav.back_to_booking_details(),
            NavIntent::SubmitPayment(method) => {
                if let Some(payment) = self.nav.submit_payment(method) {
                    self.spawn_command(payment);
                }
            }
            NavIntent::ViewBookings => self.nav.view_bookings(),
            NavIntent::ReturnToCatalog => self.nav.return_to_catalog(),
        }
        self.sync_view();
    }

    fn spawn_command(&self, command: impl Command) {
        let name = command.name();
        let tx = self.message_tx.clone();
        debug!(command = %name, "Spawning command");
        tokio::spawn(async move {
            if let Err(err) = Box::new(command).execute(tx.clone()).await {
                let _ = tx.send(AppMessage::CommandFailed {
                    name,
                    error: format!("{err:#}"),
                });
            }
        });
    }

    fn handle_messages(&mut self) {
        while let Ok(message) = self.message_rx.try_recv() {
            match message {
                AppMessage::LoginCompleted(attempt) => {
                    if self.nav.complete_login(attempt) {
                        if let Some(session) = self.nav.session() {
                            let message = format!(
                                "Sesión iniciada como {}",
                                session.role.display_name()
                            );
                            self.toasts.show(Toast::success(message));
                        }
                        self.sync_view();
                    }
                }
                AppMessage::PaymentCompleted(attempt) => {
                    if self.nav.complete_payment(attempt) {
                        if let navigation::Screen::BookingSuccess(booking) = self.nav.screen() {
                            self.toasts.show(Toast::success(format!(
                                "Reserva {} confirmada",
                                booking.reference
                            )));
                        }
                        self.sync_view();
                    }
                }
                AppMessage::CommandFailed { name, error } => {
                    error!(command = %name, error = %error, "Command failed");
                    self.overlay = Some(Overlay::Error(ErrorDialog::new(
                        name,
                        error,
                        self.resolver.clone(),
                    )));
                }
            }
        }
    }

    fn show_error(&mut self, title: &str, err: &color_eyre::Report) {
        error!(error = %err, "{title}");
        self.overlay = Some(Overlay::Error(ErrorDialog::new(
            title,
            format!("{err:#}"),
            self.resolver.clone(),
        )));
    }

    /// Rebuild the active screen after the controller transitioned.
    fn sync_view(&mut self) {
        if self.nav.revision() == self.view_revision {
            return;
        }
        self.view_revision = self.nav.revision();
        self.view = screen::for_state(&self.nav, &self.catalog, &self.resolver);
        self.status_bar
            .set_session(self.nav.session().cloned(), self.nav.bookings().len());
    }

    fn render(&mut self, tui: &mut Tui) -> Result<()> {
        tui.draw(|frame| self.draw(frame))?;
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(
            ratatui::widgets::Block::default().style(Style::default().bg(self.theme.base())),
            area,
        );

        let [breadcrumbs, body, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .areas(area);

        self.draw_breadcrumbs(frame, breadcrumbs);
        self.view.render(frame, body, &self.theme);
        self.status_bar
            .render_with_keybindings(frame, status, &self.theme, &self.view.keybindings());

        match &mut self.overlay {
            Some(Overlay::Help(help)) => help.render(frame, area, &self.theme),
            Some(Overlay::Theme(selector)) => selector.render(frame, area, &self.theme),
            Some(Overlay::Error(dialog)) => dialog.render(frame, area, &self.theme),
            None => {}
        }
        if !self.toasts.is_empty() {
            self.toasts.render(frame, body, &self.theme);
        }
    }

    fn draw_breadcrumbs(&self, frame: &mut Frame, area: Rect) {
        let theme = &self.theme;
        let crumbs = self.view.breadcrumbs();
        let mut spans = vec![Span::styled(
            " Reserva Ya ",
            Style::default()
                .fg(theme.mauve())
                .add_modifier(Modifier::BOLD),
        )];
        for (i, crumb) in crumbs.iter().enumerate() {
            spans.push(Span::styled(" › ", Style::default().fg(theme.overlay0())));
            let style = if i + 1 == crumbs.len() {
                Style::default().fg(theme.text()).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.subtext0())
            };
            spans.push(Span::styled(crumb.clone(), style));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::auth::EmailRoleAuthenticator;
    use crate::model::{PaymentMethod, catalog};

    const DELAY: Duration = Duration::from_millis(2000);
    const PAYMENT_DELAY: Duration = Duration::from_millis(1500);

    fn app() -> App {
        let nav = NavigationController::new(Arc::new(EmailRoleAuthenticator), DELAY)
            .with_payment_delay(PAYMENT_DELAY);
        App::new(
            nav,
            catalog::builtin().unwrap(),
            Arc::new(KeyResolver::default()),
            Theme::default(),
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    /// Let a command timer fire and drain its message.
    async fn wait_for(app: &mut App, delay: Duration) {
        tokio::time::sleep(delay).await;
        // Give the spawned command a chance to send.
        tokio::task::yield_now().await;
        app.handle_messages();
    }

    async fn finish_redirect(app: &mut App) {
        wait_for(app, DELAY + Duration::from_millis(1)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_guest_books_a_service_end_to_end() {
        let mut app = app();

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.nav.screen(), &navigation::Screen::Login);

        type_text(&mut app, "maria@ejemplo.com");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.nav.screen(), &navigation::Screen::Redirecting);

        finish_redirect(&mut app).await;
        let navigation::Screen::ConfirmService(target) = app.nav.screen() else {
            panic!("expected confirm service, got {}", app.nav.screen());
        };
        assert_eq!(target.id, "1");

        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.nav.screen(), navigation::Screen::Payment(_)));

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert!(app.nav.is_processing_payment());
        assert!(matches!(app.nav.screen(), navigation::Screen::Payment(_)));

        wait_for(&mut app, PAYMENT_DELAY + Duration::from_millis(1)).await;
        let navigation::Screen::BookingSuccess(booking) = app.nav.screen() else {
            panic!("expected booking success, got {}", app.nav.screen());
        };
        assert_eq!(booking.method, PaymentMethod::Transfer);
        assert_eq!(booking.total, 7875);

        press(&mut app, KeyCode::Char('v'));
        assert_eq!(app.nav.screen(), &navigation::Screen::ClientDashboard);
    }

    #[tokio::test(start_paused = true)]
    async fn test_admin_login_from_catalog_header() {
        let mut app = app();
        press(&mut app, KeyCode::Char('l'));
        type_text(&mut app, "admin@reservaya.com");
        press(&mut app, KeyCode::Enter);

        finish_redirect(&mut app).await;
        assert_eq!(app.nav.screen(), &navigation::Screen::AdminDashboard);
        assert!(!app.toasts.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_payment_submission_books_once() {
        let mut app = app();
        press(&mut app, KeyCode::Char('l'));
        type_text(&mut app, "ana@ejemplo.com");
        press(&mut app, KeyCode::Enter);
        finish_redirect(&mut app).await;
        assert_eq!(app.nav.screen(), &navigation::Screen::ClientDashboard);

        app.apply_intent(NavIntent::ReturnToCatalog);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.nav.screen(), navigation::Screen::Payment(_)));

        // Pay on site: no card form to fill in.
        press(&mut app, KeyCode::Char('G'));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        app.apply_intent(NavIntent::SubmitPayment(PaymentMethod::OnSite));

        wait_for(&mut app, Duration::from_millis(1000)).await;
        assert!(matches!(app.nav.screen(), navigation::Screen::Payment(_)));

        wait_for(&mut app, Duration::from_millis(501)).await;
        assert!(matches!(app.nav.screen(), navigation::Screen::BookingSuccess(_)));
        assert_eq!(app.nav.bookings().len(), 1);

        wait_for(&mut app, PAYMENT_DELAY).await;
        assert_eq!(app.nav.bookings().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_submission_ignored_while_redirecting() {
        let mut app = app();
        press(&mut app, KeyCode::Char('l'));
        type_text(&mut app, "admin@reservaya.com");
        press(&mut app, KeyCode::Enter);
        assert!(app.nav.is_transitioning());

        app.apply_intent(NavIntent::SubmitLogin {
            email: "ana@ejemplo.com".to_string(),
            password: String::new(),
        });

        finish_redirect(&mut app).await;
        assert_eq!(app.nav.screen(), &navigation::Screen::AdminDashboard);
        assert_eq!(
            app.nav.session().map(|s| s.email.as_str()),
            Some("admin@reservaya.com")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_during_redirect_wins() {
        let mut app = app();
        press(&mut app, KeyCode::Char('l'));
        type_text(&mut app, "carlos@proveedor.com");
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Char('o'));
        assert_eq!(app.nav.screen(), &navigation::Screen::Catalog);

        finish_redirect(&mut app).await;
        assert_eq!(app.nav.screen(), &navigation::Screen::Catalog);
        assert!(app.nav.session().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_as_guest_only_warns() {
        let mut app = app();
        let revision = app.nav.revision();
        press(&mut app, KeyCode::Char('o'));
        assert_eq!(app.nav.revision(), revision);
        assert_eq!(app.toasts.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_is_typed_inside_login_form() {
        let mut app = app();
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.nav.screen(), &navigation::Screen::Catalog);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlays_capture_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert!(matches!(app.overlay, Some(Overlay::Help(_))));

        // Enter does not reach the catalog while help is open.
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.nav.screen(), &navigation::Screen::Catalog);

        press(&mut app, KeyCode::Esc);
        assert!(app.overlay.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_command_opens_error_dialog() {
        let mut app = app();
        app.message_tx
            .send(AppMessage::CommandFailed {
                name: "Redirecting login #1".to_string(),
                error: "channel closed".to_string(),
            })
            .unwrap();
        app.handle_messages();
        assert!(matches!(app.overlay, Some(Overlay::Error(_))));

        press(&mut app, KeyCode::Enter);
        assert!(app.overlay.is_none());
    }
}

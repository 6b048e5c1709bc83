//! Full-page screens, one per navigation state.
//!
//! Screens are rebuilt from the [`NavigationController`] whenever it
//! transitions. They read navigation state but never change it: every
//! user decision comes back to the App as a [`NavIntent`].

mod booking_success;
mod catalog;
mod confirm_service;
mod dashboard;
mod login;
mod payment;
mod redirecting;

use std::sync::Arc;

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

pub use booking_success::BookingSuccessScreen;
pub use catalog::CatalogScreen;
pub use confirm_service::ConfirmServiceScreen;
pub use dashboard::{AdminDashboardScreen, ClientDashboardScreen, ProviderDashboardScreen};
pub use login::LoginScreen;
pub use payment::PaymentScreen;
pub use redirecting::RedirectingScreen;

use crate::Theme;
use crate::config::KeyResolver;
use crate::model::dashboard::Stat;
use crate::model::{BookingTarget, PaymentMethod};
use crate::navigation::{self, NavigationController};
use crate::ui::Screen;

/// A user decision reported by a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavIntent {
    SelectService(BookingTarget),
    OpenLogin,
    SubmitLogin { email: String, password: String },
    ConfirmDetails,
    BackToDetails,
    SubmitPayment(PaymentMethod),
    ViewBookings,
    ReturnToCatalog,
}

pub type BoxedScreen = Box<dyn Screen<Output = NavIntent>>;

/// Build the screen for the controller's current state.
pub fn for_state(
    nav: &NavigationController,
    catalog: &[BookingTarget],
    resolver: &Arc<KeyResolver>,
) -> BoxedScreen {
    let resolver = resolver.clone();
    let session = nav.session();
    match nav.screen() {
        navigation::Screen::Catalog => Box::new(CatalogScreen::new(
            catalog.to_vec(),
            session.map(|s| s.display_name.clone()),
            resolver,
        )),
        navigation::Screen::Login => Box::new(LoginScreen::new(
            nav.selected_target().map(|t| t.name.clone()),
            resolver,
        )),
        navigation::Screen::Redirecting => {
            Box::new(RedirectingScreen::new(session, nav.login_delay()))
        }
        navigation::Screen::ConfirmService(target) => {
            Box::new(ConfirmServiceScreen::new(target.clone(), resolver))
        }
        navigation::Screen::Payment(target) => {
            Box::new(PaymentScreen::new(target.clone(), resolver))
        }
        navigation::Screen::BookingSuccess(booking) => {
            Box::new(BookingSuccessScreen::new(booking.clone(), resolver))
        }
        navigation::Screen::AdminDashboard => Box::new(AdminDashboardScreen::new(resolver)),
        navigation::Screen::ProviderDashboard => Box::new(ProviderDashboardScreen::new(resolver)),
        navigation::Screen::ClientDashboard => {
            Box::new(ClientDashboardScreen::new(nav.bookings(), resolver))
        }
    }
}

fn panel<'a>(title: impl Into<Line<'a>>, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(title)
        .title_style(
            Style::default()
                .fg(theme.mauve())
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border()))
}

/// `label  value` line used by the detail panels.
fn field_line<'a>(label: &'a str, value: impl Into<String>, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label:>12}  "), Style::default().fg(theme.overlay1())),
        Span::styled(value.into(), Style::default().fg(theme.text())),
    ])
}

fn render_stats(frame: &mut Frame, area: Rect, stats: &[Stat], theme: &Theme) {
    if stats.is_empty() {
        return;
    }
    let count = u32::try_from(stats.len()).unwrap_or(u32::MAX);
    let areas = ratatui::layout::Layout::horizontal(
        stats
            .iter()
            .map(|_| ratatui::layout::Constraint::Ratio(1, count)),
    )
    .split(area);

    for (stat, area) in stats.iter().zip(areas.iter()) {
        let lines = vec![
            Line::from(Span::styled(
                stat.value,
                Style::default()
                    .fg(theme.lavender())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(stat.label, Style::default().fg(theme.subtext0()))),
        ];
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(panel("", theme)),
            *area,
        );
    }
}

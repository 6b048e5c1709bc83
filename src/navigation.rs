//! Navigation controller.
//!
//! [`NavigationController`] owns everything that decides which screen is
//! visible: the active [`Screen`], the signed-in [`Session`], the service the
//! visitor is booking and the pending login attempt. Screens never mutate
//! this state; they report intents and the App calls the matching operation.
//!
//! ```text
//! Catalog --select, signed out--> Login --submit--> Redirecting --delay--> role home
//! Catalog --select, signed in--> ConfirmService --confirm--> Payment --pay, delay--> BookingSuccess
//! ```
//!
//! Screens that need a booking target carry it in their variant. Screens that
//! need a session are checked on every transition and fall back to
//! [`Screen::Catalog`] when the session is missing.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::auth::Authenticator;
use crate::commands::{PaymentCmd, RedirectCmd};
use crate::model::{Booking, BookingTarget, PaymentMethod, Role, Session};

/// The full-page view currently shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Catalog,
    Login,
    Redirecting,
    ConfirmService(BookingTarget),
    Payment(BookingTarget),
    BookingSuccess(Booking),
    AdminDashboard,
    ProviderDashboard,
    ClientDashboard,
}

impl Screen {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Login => "login",
            Self::Redirecting => "redirecting",
            Self::ConfirmService(_) => "confirm-service",
            Self::Payment(_) => "payment",
            Self::BookingSuccess(_) => "booking-success",
            Self::AdminDashboard => "admin-dashboard",
            Self::ProviderDashboard => "provider-dashboard",
            Self::ClientDashboard => "client-dashboard",
        }
    }

    const fn requires_session(&self) -> bool {
        matches!(
            self,
            Self::Redirecting
                | Self::AdminDashboard
                | Self::ProviderDashboard
                | Self::ClientDashboard
        )
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Identifies one login submission.
///
/// Only the most recent attempt may complete; older ones are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoginAttempt(u64);

impl LoginAttempt {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for LoginAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct PendingLogin {
    attempt: LoginAttempt,
    cancel: CancellationToken,
}

/// Identifies one payment submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaymentAttempt(u64);

impl PaymentAttempt {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for PaymentAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct PendingPayment {
    attempt: PaymentAttempt,
    method: PaymentMethod,
    cancel: CancellationToken,
}

const DEFAULT_PAYMENT_DELAY: Duration = Duration::from_millis(1500);

pub struct NavigationController {
    screen: Screen,
    session: Option<Session>,
    selected_target: Option<BookingTarget>,
    pending_login: Option<PendingLogin>,
    pending_payment: Option<PendingPayment>,
    bookings: Vec<Booking>,
    authenticator: Arc<dyn Authenticator>,
    login_delay: Duration,
    payment_delay: Duration,
    next_attempt: u64,
    revision: u64,
}

impl NavigationController {
    pub fn new(authenticator: Arc<dyn Authenticator>, login_delay: Duration) -> Self {
        Self {
            screen: Screen::Catalog,
            session: None,
            selected_target: None,
            pending_login: None,
            pending_payment: None,
            bookings: Vec::new(),
            authenticator,
            login_delay,
            payment_delay: DEFAULT_PAYMENT_DELAY,
            next_attempt: 0,
            revision: 0,
        }
    }

    #[must_use]
    pub fn with_payment_delay(mut self, payment_delay: Duration) -> Self {
        self.payment_delay = payment_delay;
        self
    }

    pub const fn screen(&self) -> &Screen {
        &self.screen
    }

    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub const fn selected_target(&self) -> Option<&BookingTarget> {
        self.selected_target.as_ref()
    }

    /// True only while a login continuation is pending.
    pub const fn is_transitioning(&self) -> bool {
        self.pending_login.is_some()
    }

    pub const fn is_processing_payment(&self) -> bool {
        self.pending_payment.is_some()
    }

    /// Bookings confirmed during this session, oldest first.
    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub const fn login_delay(&self) -> Duration {
        self.login_delay
    }

    /// Incremented on every transition, including re-entering the same screen.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Record the chosen service and continue to confirmation, or to login first.
    pub fn select_booking_target(&mut self, target: BookingTarget) {
        debug!(service = %target.id, "Service selected");
        self.selected_target = Some(target.clone());
        if self.session.is_some() {
            self.navigate(Screen::ConfirmService(target));
        } else {
            self.navigate(Screen::Login);
        }
    }

    /// Open the login screen directly from the catalog header.
    ///
    /// A signed-in visitor is sent to their dashboard instead.
    pub fn open_login(&mut self) {
        match self.session.as_ref().map(|s| s.role) {
            Some(role) => self.navigate(Self::dashboard_for(role)),
            None => self.navigate(Screen::Login),
        }
    }

    /// Sign in and show the redirect screen.
    ///
    /// Returns the deferred continuation; the App spawns it and calls
    /// [`complete_login`](Self::complete_login) when it reports back.
    /// A login that is still pending is cancelled.
    pub fn submit_login(&mut self, email: &str, password: &str) -> RedirectCmd {
        if let Some(previous) = self.pending_login.take() {
            debug!(attempt = %previous.attempt, "Cancelling pending login");
            previous.cancel.cancel();
        }

        let session = self.authenticator.authenticate(email, password);
        info!(email = %session.email, role = %session.role, "Signed in");
        self.session = Some(session);

        self.next_attempt += 1;
        let attempt = LoginAttempt::new(self.next_attempt);
        let cancel = CancellationToken::new();
        self.pending_login = Some(PendingLogin {
            attempt,
            cancel: cancel.clone(),
        });

        self.navigate(Screen::Redirecting);
        RedirectCmd::new(attempt, self.login_delay, cancel)
    }

    /// Apply the continuation of `attempt`.
    ///
    /// Returns `false` when the attempt is stale or was cancelled.
    pub fn complete_login(&mut self, attempt: LoginAttempt) -> bool {
        if self
            .pending_login
            .as_ref()
            .is_none_or(|pending| pending.attempt != attempt)
        {
            debug!(attempt = %attempt, "Ignoring stale login continuation");
            return false;
        }
        self.pending_login = None;

        let Some(role) = self.session.as_ref().map(|s| s.role) else {
            self.navigate(Screen::Catalog);
            return true;
        };

        let next = match (role, &self.selected_target) {
            (Role::Client, Some(target)) => Screen::ConfirmService(target.clone()),
            (role, _) => Self::dashboard_for(role),
        };
        self.navigate(next);
        true
    }

    pub fn confirm_booking_details(&mut self) {
        let target = match &self.screen {
            Screen::ConfirmService(target) => Some(target.clone()),
            _ => self.selected_target.clone(),
        };
        match target {
            Some(target) => self.navigate(Screen::Payment(target)),
            None => self.fail_closed("confirm booking details"),
        }
    }

    /// Go back from payment to the booking details.
    pub fn back_to_booking_details(&mut self) {
        let target = match &self.screen {
            Screen::Payment(target) => Some(target.clone()),
            _ => self.selected_target.clone(),
        };
        match target {
            Some(target) => self.navigate(Screen::ConfirmService(target)),
            None => self.fail_closed("return to booking details"),
        }
    }

    /// Record the booking and show the success screen.
    ///
    /// The selected target moves into the booking, so a follow-up booking
    /// always starts from a fresh selection.
    pub fn confirm_payment(&mut self, method: PaymentMethod) {
        let target = match &self.screen {
            Screen::Payment(target) => Some(target.clone()),
            _ => self.selected_target.clone(),
        };
        let Some(target) = target else {
            self.fail_closed("confirm payment");
            return;
        };

        let booking = Booking::new(target, method);
        info!(
            reference = %booking.reference,
            service = %booking.target.id,
            method = ?booking.method,
            "Booking confirmed"
        );
        self.selected_target = None;
        self.bookings.push(booking.clone());
        self.navigate(Screen::BookingSuccess(booking));
    }

    /// Start processing the payment for the booking on screen.
    ///
    /// Returns the processing command, which the App spawns; the booking is
    /// recorded in [`complete_payment`](Self::complete_payment). Returns
    /// `None` while another payment is processing, and fails closed to the
    /// catalog when there is nothing to pay for.
    pub fn submit_payment(&mut self, method: PaymentMethod) -> Option<PaymentCmd> {
        if let Some(pending) = &self.pending_payment {
            debug!(attempt = %pending.attempt, "Payment already processing");
            return None;
        }
        if !matches!(self.screen, Screen::Payment(_)) && self.selected_target.is_none() {
            self.fail_closed("submit payment");
            return None;
        }

        self.next_attempt += 1;
        let attempt = PaymentAttempt::new(self.next_attempt);
        let cancel = CancellationToken::new();
        info!(attempt = %attempt, method = ?method, "Processing payment");
        self.pending_payment = Some(PendingPayment {
            attempt,
            method,
            cancel: cancel.clone(),
        });
        Some(PaymentCmd::new(attempt, self.payment_delay, cancel))
    }

    /// Settle a processed payment. Returns `false` for stale or cancelled attempts.
    pub fn complete_payment(&mut self, attempt: PaymentAttempt) -> bool {
        let Some(pending) = self
            .pending_payment
            .take_if(|pending| pending.attempt == attempt)
        else {
            debug!(attempt = %attempt, "Ignoring stale payment");
            return false;
        };
        self.confirm_payment(pending.method);
        true
    }

    pub fn view_bookings(&mut self) {
        self.navigate(Screen::ClientDashboard);
    }

    /// Sign out and return to the catalog, dropping any booking in progress.
    pub fn logout(&mut self) {
        if let Some(pending) = self.pending_login.take() {
            pending.cancel.cancel();
        }
        if let Some(session) = self.session.take() {
            info!(email = %session.email, "Signed out");
        }
        self.selected_target = None;
        self.bookings.clear();
        self.navigate(Screen::Catalog);
    }

    /// Show the catalog. Session and selection are left as they are.
    pub fn return_to_catalog(&mut self) {
        self.navigate(Screen::Catalog);
    }

    const fn dashboard_for(role: Role) -> Screen {
        match role {
            Role::Admin => Screen::AdminDashboard,
            Role::Provider => Screen::ProviderDashboard,
            Role::Client => Screen::ClientDashboard,
        }
    }

    fn fail_closed(&mut self, operation: &str) {
        warn!(operation, "No service selected, returning to catalog");
        self.navigate(Screen::Catalog);
    }

    fn navigate(&mut self, screen: Screen) {
        let screen = if screen.requires_session() && self.session.is_none() {
            warn!(screen = screen.name(), "Screen requires a session, returning to catalog");
            Screen::Catalog
        } else {
            screen
        };

        if !matches!(screen, Screen::Payment(_))
            && let Some(pending) = self.pending_payment.take()
        {
            debug!(attempt = %pending.attempt, "Leaving payment, cancelling processing");
            pending.cancel.cancel();
        }

        debug!(from = self.screen.name(), to = screen.name(), "Screen transition");
        self.screen = screen;
        self.revision += 1;
    }
}

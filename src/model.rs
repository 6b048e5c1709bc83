//! Domain models for Reserva Ya.
//!
//! This module contains core domain types that are not UI-specific:
//! - [`Role`] and [`Session`] - the signed-in identity for the current visit
//! - [`BookingTarget`] - a bookable service carried through the booking funnel
//! - [`Booking`] and [`PaymentMethod`] - the result of a confirmed payment
//! - [`catalog`] and [`dashboard`] - the mock data shown by the screens

pub mod booking;
pub mod catalog;
pub mod dashboard;
pub mod session;

pub use booking::{Booking, BookingTarget, PaymentMethod};
pub use session::{Role, Session};

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Service fee applied on top of the listed price, in percent.
pub const SERVICE_FEE_PERCENT: u64 = 5;

const REFERENCE_LEN: usize = 9;

/// A bookable service as listed in the catalog.
///
/// The navigation controller never interprets these fields; they are
/// carried through the booking funnel unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingTarget {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    /// Listed price in whole euros.
    pub price: u32,
    pub location: String,
    pub description: String,
    pub image: String,
}

impl BookingTarget {
    /// Date and time formatted the way the screens show it, e.g. `15/11/2025 • 15:00`.
    pub fn schedule(&self) -> String {
        format!(
            "{} • {}",
            self.date.format("%d/%m/%Y"),
            self.time.format("%H:%M")
        )
    }

    /// Service fee in cents.
    pub fn fee_cents(&self) -> u64 {
        u64::from(self.price) * SERVICE_FEE_PERCENT
    }

    /// Price including the service fee, in cents.
    pub fn total_cents(&self) -> u64 {
        u64::from(self.price) * 100 + self.fee_cents()
    }
}

impl fmt::Display for BookingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// How the visitor chose to pay for a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaymentMethod {
    #[default]
    Card,
    Transfer,
    OnSite,
}

impl PaymentMethod {
    pub const ALL: [Self; 3] = [Self::Card, Self::Transfer, Self::OnSite];

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Card => "Tarjeta de crédito/débito",
            Self::Transfer => "Transferencia bancaria",
            Self::OnSite => "Pago en el establecimiento",
        }
    }

    pub const fn details(&self) -> &'static str {
        match self {
            Self::Card => "Pago seguro e inmediato con Visa, Mastercard o American Express.",
            Self::Transfer => {
                "Tu reserva será confirmada en 24-48 horas tras recibir la transferencia."
            }
            Self::OnSite => {
                "Pagarás directamente en el establecimiento cuando recibas el servicio."
            }
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A confirmed booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub reference: String,
    pub target: BookingTarget,
    pub method: PaymentMethod,
    /// Amount charged including the service fee, in cents.
    pub total: u64,
}

impl Booking {
    /// Create a booking with a fresh reference code.
    pub fn new(target: BookingTarget, method: PaymentMethod) -> Self {
        Self::with_reference(new_reference(), target, method)
    }

    pub fn with_reference(
        reference: impl Into<String>,
        target: BookingTarget,
        method: PaymentMethod,
    ) -> Self {
        let total = target.total_cents();
        Self {
            reference: reference.into(),
            target,
            method,
            total,
        }
    }
}

/// Generate a short upper-case booking reference, e.g. `3F9A0C1B2`.
fn new_reference() -> String {
    let mut reference = Uuid::new_v4().simple().to_string();
    reference.truncate(REFERENCE_LEN);
    reference.to_ascii_uppercase()
}

/// Format an amount in cents as euros, e.g. `€78.75`.
pub fn format_euros(cents: u64) -> String {
    format!("€{}.{:02}", cents / 100, cents % 100)
}

#[cfg(test)]
pub(crate) fn sample_target(id: &str) -> BookingTarget {
    BookingTarget {
        id: id.to_string(),
        name: "Masaje Relajante 60min".to_string(),
        provider: "Spa Wellness Center".to_string(),
        date: NaiveDate::from_ymd_opt(2025, 11, 15).unwrap(),
        time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
        price: 75,
        location: "Calle Principal 123, Madrid".to_string(),
        description: "Masaje corporal completo con aceites esenciales".to_string(),
        image: "https://images.unsplash.com/photo-1731514771613-991a02407132".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_includes_service_fee() {
        let target = sample_target("1");
        assert_eq!(target.fee_cents(), 375);
        assert_eq!(target.total_cents(), 7875);
        assert_eq!(format_euros(target.total_cents()), "€78.75");
    }

    #[test]
    fn test_schedule_format() {
        assert_eq!(sample_target("1").schedule(), "15/11/2025 • 15:00");
    }

    #[test]
    fn test_reference_shape() {
        let booking = Booking::new(sample_target("1"), PaymentMethod::Card);
        assert_eq!(booking.reference.len(), 9);
        assert!(
            booking
                .reference
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
        assert_eq!(booking.total, 7875);
    }

    #[test]
    fn test_target_deserializes_from_catalog_json() {
        let json = r#"{
            "id": "9",
            "name": "Yoga Grupal",
            "provider": "Zen Studio",
            "date": "2025-11-20",
            "time": "18:00:00",
            "price": 20,
            "location": "Calle Calma 1, Madrid",
            "description": "Clase grupal de yoga",
            "image": ""
        }"#;
        let target: BookingTarget = serde_json::from_str(json).unwrap();
        assert_eq!(target.schedule(), "20/11/2025 • 18:00");
        assert_eq!(target.price, 20);
    }
}

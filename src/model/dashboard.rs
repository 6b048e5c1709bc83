//! Mock data for the role dashboards.

use crate::model::{Booking, PaymentMethod};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Confirmed,
    Pending,
    Completed,
}

impl BookingStatus {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Confirmed => "Confirmada",
            Self::Pending => "Pendiente",
            Self::Completed => "Completada",
        }
    }
}

/// Publication state of a provider or service listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingStatus {
    Active,
    Draft,
    Paused,
    Pending,
}

impl ListingStatus {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Active => "Activo",
            Self::Draft => "Borrador",
            Self::Paused => "Pausado",
            Self::Pending => "Pendiente",
        }
    }
}

/// A platform account as listed on the admin dashboard.
#[derive(Debug, Clone)]
pub struct PlatformUser {
    pub name: &'static str,
    pub email: &'static str,
    pub role: &'static str,
    pub status: &'static str,
    pub joined: &'static str,
}

/// An appointment on the provider's agenda for today.
#[derive(Debug, Clone)]
pub struct AgendaEntry {
    pub time: &'static str,
    pub service: &'static str,
    pub client: &'static str,
    pub status: BookingStatus,
}

/// A service offered on the platform.
#[derive(Debug, Clone)]
pub struct ServiceListing {
    pub name: &'static str,
    pub provider: &'static str,
    pub category: &'static str,
    pub price_cents: u64,
    pub bookings: u32,
    pub status: ListingStatus,
}

/// A registered provider business.
#[derive(Debug, Clone)]
pub struct ProviderListing {
    pub name: &'static str,
    pub category: &'static str,
    pub rating: &'static str,
    pub services: u32,
    pub status: ListingStatus,
}

/// A client of the signed-in provider.
#[derive(Debug, Clone)]
pub struct ClientSummary {
    pub name: &'static str,
    pub email: &'static str,
    pub bookings: u32,
    pub last_visit: &'static str,
    pub spent_cents: u64,
}

#[derive(Debug, Clone)]
pub struct Category {
    pub name: &'static str,
    pub count: u32,
}

/// A percentage indicator on the admin overview.
#[derive(Debug, Clone)]
pub struct Trend {
    pub label: &'static str,
    pub percent: u16,
}

/// An appointment on the client dashboard, upcoming or past.
#[derive(Debug, Clone)]
pub struct Appointment {
    pub reference: Option<String>,
    pub service: String,
    pub provider: String,
    pub schedule: String,
    pub location: String,
    /// Amount paid or due, in cents.
    pub total_cents: u64,
    /// Known only for bookings made in this session.
    pub method: Option<PaymentMethod>,
    pub status: BookingStatus,
}

impl From<&Booking> for Appointment {
    fn from(booking: &Booking) -> Self {
        Self {
            reference: Some(booking.reference.clone()),
            service: booking.target.name.clone(),
            provider: booking.target.provider.clone(),
            schedule: booking.target.schedule(),
            location: booking.target.location.clone(),
            total_cents: booking.total,
            method: Some(booking.method),
            status: BookingStatus::Confirmed,
        }
    }
}

impl Appointment {
    fn sample(
        service: &str,
        provider: &str,
        schedule: &str,
        location: &str,
        total_cents: u64,
        status: BookingStatus,
    ) -> Self {
        Self {
            reference: None,
            service: service.to_string(),
            provider: provider.to_string(),
            schedule: schedule.to_string(),
            location: location.to_string(),
            total_cents,
            method: None,
            status,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub title: &'static str,
    pub message: &'static str,
    pub when: &'static str,
}

/// Headline figure shown at the top of a dashboard.
#[derive(Debug, Clone)]
pub struct Stat {
    pub label: &'static str,
    pub value: &'static str,
}

pub fn admin_stats() -> Vec<Stat> {
    vec![
        Stat { label: "Usuarios", value: "2,847" },
        Stat { label: "Proveedores", value: "156" },
        Stat { label: "Reservas (mes)", value: "3,024" },
        Stat { label: "Ingresos (mes)", value: "€48,392" },
    ]
}

pub fn platform_users() -> Vec<PlatformUser> {
    vec![
        PlatformUser {
            name: "María García",
            email: "maria@ejemplo.com",
            role: "Cliente",
            status: "Activo",
            joined: "15 Nov 2025",
        },
        PlatformUser {
            name: "Carlos Ruiz",
            email: "carlos@proveedor.com",
            role: "Proveedor",
            status: "Activo",
            joined: "12 Nov 2025",
        },
        PlatformUser {
            name: "Ana López",
            email: "ana@ejemplo.com",
            role: "Cliente",
            status: "Inactivo",
            joined: "08 Nov 2025",
        },
        PlatformUser {
            name: "Juan Pérez",
            email: "juan@proveedor.com",
            role: "Proveedor",
            status: "Pendiente",
            joined: "05 Nov 2025",
        },
    ]
}

pub fn admin_notices() -> Vec<Notice> {
    vec![
        Notice {
            title: "Nuevo proveedor registrado",
            message: "Spa Wellness Center solicita aprobación",
            when: "Hace 5 min",
        },
        Notice {
            title: "Meta alcanzada",
            message: "Se superaron las 3,000 reservas este mes",
            when: "Hace 1 hora",
        },
        Notice {
            title: "Reporte pendiente",
            message: "Revisar comentario negativo de usuario",
            when: "Hace 3 horas",
        },
        Notice {
            title: "Actualización disponible",
            message: "Nueva versión del sistema lista para instalar",
            when: "Hace 1 día",
        },
    ]
}

/// Latest platform events for the admin overview.
pub fn admin_activity() -> Vec<Notice> {
    vec![
        Notice {
            title: "Nuevo usuario registrado",
            message: "María García",
            when: "Hace 5 min",
        },
        Notice {
            title: "Reserva confirmada",
            message: "Carlos Ruiz",
            when: "Hace 12 min",
        },
        Notice {
            title: "Proveedor aprobado",
            message: "Spa Wellness",
            when: "Hace 1 hora",
        },
        Notice {
            title: "Pago recibido",
            message: "Ana López",
            when: "Hace 2 horas",
        },
    ]
}

pub fn admin_trends() -> Vec<Trend> {
    vec![
        Trend { label: "Tasa de conversión", percent: 68 },
        Trend { label: "Satisfacción clientes", percent: 92 },
        Trend { label: "Proveedores activos", percent: 85 },
    ]
}

pub fn admin_providers() -> Vec<ProviderListing> {
    vec![
        ProviderListing {
            name: "Spa Wellness Center",
            category: "Bienestar",
            rating: "4.8",
            services: 12,
            status: ListingStatus::Active,
        },
        ProviderListing {
            name: "Barbería Premium",
            category: "Belleza",
            rating: "4.6",
            services: 8,
            status: ListingStatus::Active,
        },
        ProviderListing {
            name: "FitLife Gym",
            category: "Fitness",
            rating: "4.9",
            services: 15,
            status: ListingStatus::Active,
        },
        ProviderListing {
            name: "Estudio Yoga Zen",
            category: "Bienestar",
            rating: "4.7",
            services: 6,
            status: ListingStatus::Pending,
        },
    ]
}

pub fn admin_services() -> Vec<ServiceListing> {
    vec![
        ServiceListing {
            name: "Masaje Relajante",
            provider: "Spa Wellness",
            category: "Bienestar",
            price_cents: 7875,
            bookings: 156,
            status: ListingStatus::Active,
        },
        ServiceListing {
            name: "Corte de Cabello",
            provider: "Barbería Premium",
            category: "Belleza",
            price_cents: 2500,
            bookings: 234,
            status: ListingStatus::Active,
        },
        ServiceListing {
            name: "Entrenamiento Personal",
            provider: "FitLife Gym",
            category: "Fitness",
            price_cents: 5250,
            bookings: 89,
            status: ListingStatus::Active,
        },
        ServiceListing {
            name: "Yoga Grupal",
            provider: "Estudio Zen",
            category: "Bienestar",
            price_cents: 1500,
            bookings: 45,
            status: ListingStatus::Paused,
        },
    ]
}

/// Services per category across the platform.
pub fn admin_categories() -> Vec<Category> {
    vec![
        Category { name: "Bienestar", count: 45 },
        Category { name: "Belleza", count: 67 },
        Category { name: "Fitness", count: 34 },
        Category { name: "Salud", count: 28 },
        Category { name: "Hogar", count: 52 },
        Category { name: "Educación", count: 41 },
    ]
}

/// Categories as browsed by clients and providers, with listed service counts.
pub fn marketplace_categories() -> Vec<Category> {
    vec![
        Category { name: "Bienestar", count: 245 },
        Category { name: "Belleza", count: 189 },
        Category { name: "Fitness", count: 156 },
        Category { name: "Salud", count: 134 },
        Category { name: "Hogar", count: 98 },
        Category { name: "Educación", count: 76 },
    ]
}

pub fn provider_stats() -> Vec<Stat> {
    vec![
        Stat { label: "Citas hoy", value: "3" },
        Stat { label: "Reservas (mes)", value: "312" },
        Stat { label: "Valoración", value: "4.8" },
        Stat { label: "Ingresos (mes)", value: "€12,450" },
    ]
}

pub fn provider_agenda() -> Vec<AgendaEntry> {
    vec![
        AgendaEntry {
            time: "10:00",
            service: "Masaje Relajante",
            client: "María González",
            status: BookingStatus::Confirmed,
        },
        AgendaEntry {
            time: "12:30",
            service: "Tratamiento Facial",
            client: "Carlos Ruiz",
            status: BookingStatus::Pending,
        },
        AgendaEntry {
            time: "15:00",
            service: "Corte de Cabello",
            client: "Ana López",
            status: BookingStatus::Confirmed,
        },
    ]
}

pub fn provider_notices() -> Vec<Notice> {
    vec![
        Notice {
            title: "Nueva reserva",
            message: "María González reservó Masaje Relajante para mañana 10:00",
            when: "Hace 5 min",
        },
        Notice {
            title: "Nueva reseña",
            message: "Carlos dejó una reseña de 5 estrellas",
            when: "Hace 1 hora",
        },
        Notice {
            title: "Cancelación",
            message: "Ana López canceló su reserva del 15 Nov",
            when: "Hace 2 horas",
        },
        Notice {
            title: "Recordatorio",
            message: "Tienes 3 citas mañana",
            when: "Hace 5 horas",
        },
    ]
}

/// The signed-in provider's own services.
pub fn provider_services() -> Vec<ServiceListing> {
    const PROVIDER: &str = "Spa Wellness Center";
    vec![
        ServiceListing {
            name: "Masaje Relajante 60min",
            provider: PROVIDER,
            category: "Bienestar",
            price_cents: 7875,
            bookings: 156,
            status: ListingStatus::Active,
        },
        ServiceListing {
            name: "Tratamiento Facial",
            provider: PROVIDER,
            category: "Belleza",
            price_cents: 6500,
            bookings: 89,
            status: ListingStatus::Active,
        },
        ServiceListing {
            name: "Masaje Deportivo",
            provider: PROVIDER,
            category: "Bienestar",
            price_cents: 8500,
            bookings: 67,
            status: ListingStatus::Active,
        },
        ServiceListing {
            name: "Reflexología",
            provider: PROVIDER,
            category: "Bienestar",
            price_cents: 5500,
            bookings: 45,
            status: ListingStatus::Draft,
        },
    ]
}

pub fn provider_clients() -> Vec<ClientSummary> {
    vec![
        ClientSummary {
            name: "María González",
            email: "maria@ejemplo.com",
            bookings: 12,
            last_visit: "10 Nov 2025",
            spent_cents: 94_500,
        },
        ClientSummary {
            name: "Carlos Ruiz",
            email: "carlos@ejemplo.com",
            bookings: 8,
            last_visit: "08 Nov 2025",
            spent_cents: 63_000,
        },
        ClientSummary {
            name: "Ana López",
            email: "ana@ejemplo.com",
            bookings: 15,
            last_visit: "05 Nov 2025",
            spent_cents: 118_000,
        },
        ClientSummary {
            name: "Laura Martínez",
            email: "laura@ejemplo.com",
            bookings: 5,
            last_visit: "02 Nov 2025",
            spent_cents: 39_000,
        },
    ]
}

/// Upcoming appointments: bookings made this session first, then the mock history.
pub fn client_appointments(session_bookings: &[Booking]) -> Vec<Appointment> {
    let mut appointments: Vec<Appointment> = session_bookings
        .iter()
        .rev()
        .map(Appointment::from)
        .collect();

    appointments.extend([
        Appointment::sample(
            "Masaje Relajante 60min",
            "Spa Wellness Center",
            "15/11/2025 • 15:00",
            "Calle Principal 123, Madrid",
            7875,
            BookingStatus::Confirmed,
        ),
        Appointment::sample(
            "Corte de Cabello + Barba",
            "Barbería Premium",
            "16/11/2025 • 11:30",
            "Avenida Central 456, Madrid",
            3675,
            BookingStatus::Pending,
        ),
    ]);
    appointments
}

pub fn client_history() -> Vec<Appointment> {
    vec![
        Appointment::sample(
            "Entrenamiento Personal",
            "FitLife Gym",
            "01/11/2025 • 08:00",
            "Plaza Mayor 7, Madrid",
            5250,
            BookingStatus::Completed,
        ),
        Appointment::sample(
            "Masaje Relajante",
            "Spa Wellness Center",
            "28/10/2025 • 15:00",
            "Calle Principal 123, Madrid",
            7875,
            BookingStatus::Completed,
        ),
    ]
}

pub fn client_notices() -> Vec<Notice> {
    vec![
        Notice {
            title: "Reserva confirmada",
            message: "Tu reserva en Spa Wellness Center ha sido confirmada para el 15 Nov",
            when: "Hace 10 min",
        },
        Notice {
            title: "Recordatorio",
            message: "Tienes una cita mañana a las 15:00",
            when: "Hace 1 hora",
        },
        Notice {
            title: "Nueva oferta",
            message: "20% de descuento en masajes esta semana",
            when: "Hace 3 horas",
        },
        Notice {
            title: "Puntos acumulados",
            message: "Has ganado 50 puntos con tu última reserva",
            when: "Hace 1 día",
        },
    ]
}

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::auth::EmailRoleAuthenticator;
use crate::config::KeyResolver;
use crate::model::catalog;
use crate::navigation::NavigationController;

mod app;
mod auth;
mod cli;
pub mod commands;
mod config;
mod model;
mod navigation;
mod screen;
mod search;
mod theme;
pub mod tui;
mod ui;

pub use theme::Theme;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = initialize_logging()?;
    info!("Starting reservaya");

    let args = cli::Args::parse();
    let config = config::load()?;

    let resolver = Arc::new(KeyResolver::new(Arc::new(config.keybindings.clone())));
    let theme = theme::theme_from_name(args.theme.as_deref().unwrap_or(&config.theme.name));
    let login_delay = args
        .login_delay_ms
        .map_or_else(|| config.login.redirect_delay(), Duration::from_millis);

    let catalog_path = args.catalog.as_deref().or(config.catalog_file.as_deref());
    let services = catalog::load(catalog_path)?;
    info!(services = services.len(), delay_ms = login_delay.as_millis(), "Catalog ready");

    let nav = NavigationController::new(Arc::new(EmailRoleAuthenticator), login_delay)
        .with_payment_delay(config.payment.processing_delay());
    let mut app = App::new(nav, services, resolver, theme);
    app.run().await?;

    Ok(())
}

fn initialize_logging() -> Result<WorkerGuard> {
    let directory = dirs::data_local_dir().map_or_else(
        || std::path::PathBuf::from("logs"),
        |path| path.join("reservaya").join("logs"),
    );
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::daily(&directory, "reservaya.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}

pub mod actions;
pub mod key;
pub mod keybindings;
pub mod loader;
pub mod resolver;

use std::path::PathBuf;
use std::time::Duration;

pub use actions::*;
use keybindings::KeybindingsConfig;
pub use loader::{load, save_theme};
pub use resolver::KeyResolver;
use serde::{Deserialize, Serialize};

const DEFAULT_REDIRECT_DELAY_MS: u64 = 2000;
const DEFAULT_PROCESSING_DELAY_MS: u64 = 1500;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "Catppuccin Mocha".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginConfig {
    /// How long the redirect screen stays up after signing in.
    pub redirect_delay_ms: u64,
}

impl LoginConfig {
    pub const fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            redirect_delay_ms: DEFAULT_REDIRECT_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// How long a payment shows as processing before the booking is confirmed.
    pub processing_delay_ms: u64,
}

impl PaymentConfig {
    pub const fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            processing_delay_ms: DEFAULT_PROCESSING_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub login: LoginConfig,
    #[serde(default)]
    pub payment: PaymentConfig,
    /// JSON file replacing the built-in service catalog.
    #[serde(default)]
    pub catalog_file: Option<PathBuf>,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.theme.name, "Catppuccin Mocha");
        assert_eq!(config.login.redirect_delay(), Duration::from_millis(2000));
        assert_eq!(config.payment.processing_delay(), Duration::from_millis(1500));
        assert!(config.catalog_file.is_none());
    }

    #[test]
    fn test_partial_file() {
        let config: AppConfig = toml::from_str(
            r#"
            catalog_file = "/tmp/servicios.json"

            [login]
            redirect_delay_ms = 250

            [payment]
            processing_delay_ms = 0

            [keybindings.global]
            quit = "ctrl+q"
            "#,
        )
        .unwrap();

        assert_eq!(config.login.redirect_delay_ms, 250);
        assert_eq!(config.payment.processing_delay(), Duration::ZERO);
        assert_eq!(
            config.catalog_file.as_deref(),
            Some(std::path::Path::new("/tmp/servicios.json"))
        );
        assert_eq!(config.keybindings.global.quit.display(), "ctrl+q");
        assert_eq!(config.keybindings.global.help.display(), "?");
        assert_eq!(config.keybindings.navigation.select.display(), "Enter");
    }
}

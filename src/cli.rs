use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "reservaya", version, about = "Book local services from the terminal")]
pub struct Args {
    /// Delay in milliseconds between signing in and landing on the next screen
    #[arg(long, value_name = "MS")]
    pub login_delay_ms: Option<u64>,

    /// Theme name (e.g., "Catppuccin Latte")
    #[arg(short, long)]
    pub theme: Option<String>,

    /// JSON file with the services to offer instead of the built-in catalog
    #[arg(short, long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overrides() {
        let args = Args::try_parse_from([
            "reservaya",
            "--login-delay-ms",
            "0",
            "--theme",
            "Catppuccin Latte",
            "-c",
            "services.json",
        ])
        .unwrap();
        assert_eq!(args.login_delay_ms, Some(0));
        assert_eq!(args.theme.as_deref(), Some("Catppuccin Latte"));
        assert_eq!(args.catalog, Some(PathBuf::from("services.json")));
    }

    #[test]
    fn test_rejects_negative_delay() {
        assert!(Args::try_parse_from(["reservaya", "--login-delay-ms", "-5"]).is_err());
    }
}

//! Service catalog.
//!
//! The catalog ships with a built-in list of services. A JSON file with the
//! same shape can replace it (see `catalog_file` in the config).

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};

use crate::model::BookingTarget;

const BUILTIN_CATALOG: &str = include_str!("../../assets/catalog.json");

/// Load the catalog from `path`, or the built-in catalog when no path is given.
pub fn load(path: Option<&Path>) -> Result<Vec<BookingTarget>> {
    let Some(path) = path else {
        return builtin();
    };

    let data = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read catalog file {}", path.display()))?;
    let services = parse(&data)
        .wrap_err_with(|| format!("Invalid catalog file {}", path.display()))?;
    tracing::debug!(count = services.len(), path = %path.display(), "Loaded catalog");
    Ok(services)
}

/// The built-in mock catalog.
pub fn builtin() -> Result<Vec<BookingTarget>> {
    parse(BUILTIN_CATALOG).wrap_err("Invalid built-in catalog")
}

fn parse(data: &str) -> Result<Vec<BookingTarget>> {
    Ok(serde_json::from_str(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let services = builtin().unwrap();
        assert_eq!(services.len(), 6);
        assert_eq!(services[0].name, "Masaje Relajante 60min");
        assert!(services.iter().all(|s| s.price > 0));
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join(format!("reservaya-catalog-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("catalog.json");
        std::fs::write(
            &path,
            r#"[{"id":"a","name":"Clase de Guitarra","provider":"Escuela Sol",
                 "date":"2025-12-01","time":"17:30:00","price":30,
                 "location":"Calle Música 4, Madrid","description":"Clase individual",
                 "image":""}]"#,
        )
        .unwrap();

        let services = load(Some(&path)).unwrap();
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].provider, "Escuela Sol");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let dir = std::env::temp_dir().join(format!("reservaya-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("catalog.json");
        std::fs::write(&path, "{ not json").unwrap();

        let error = load(Some(&path)).unwrap_err();
        assert!(error.to_string().contains("Invalid catalog file"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}

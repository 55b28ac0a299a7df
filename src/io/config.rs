//! Engine configuration JSON.
//!
//! Every section is optional and falls back to its default; the sections that
//! carry invariants (boundaries, correction calibration, density ceiling,
//! constants) are validated while deserializing, so a file that loads is a
//! configuration the evaluator accepts.
//!
//! ```json
//! {
//!   "boundaries": { "blend_low": 1.8, "blend_high": 2.2, "mid_field": 3.0, "far_field": 10.0 },
//!   "correction": { "log_mass_min": 10.0, "log_mass_max": 42.0 }
//! }
//! ```

use std::fs::File;
use std::path::Path;

use crate::domain::EngineConfig;
use crate::error::AppError;

/// Read and validate an engine configuration file.
pub fn read_config_json(path: &Path) -> Result<EngineConfig, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open config JSON '{}': {e}", path.display())))?;
    let config: EngineConfig = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid config JSON '{}': {e}", path.display())))?;
    tracing::debug!(path = %path.display(), ?config, "configuration loaded");
    Ok(config)
}

/// Parse a configuration from a JSON string.
pub fn parse_config_json(text: &str) -> Result<EngineConfig, AppError> {
    serde_json::from_str(text).map_err(|e| AppError::new(2, format!("Invalid config JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_the_default_configuration() {
        assert_eq!(parse_config_json("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn partial_sections_override_only_what_they_name() {
        let cfg = parse_config_json(r#"{ "correction": { "log_mass_min": 12.0, "log_mass_max": 40.0 } }"#).unwrap();
        let defaults = EngineConfig::default();
        assert_eq!(cfg.correction().log_mass_min(), 12.0);
        assert_eq!(cfg.correction().log_mass_max(), 40.0);
        assert_eq!(cfg.correction().amplitude(), defaults.correction().amplitude());
        assert_eq!(cfg.boundaries(), defaults.boundaries());
    }

    #[test]
    fn module_doc_example_loads() {
        let text = include_str!("config.rs")
            .lines()
            .skip_while(|l| l.trim() != "//! ```json")
            .skip(1)
            .take_while(|l| l.trim() != "//! ```")
            .map(|l| l.trim_start_matches("//!"))
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.contains("boundaries"));
        assert_eq!(parse_config_json(&text).unwrap(), EngineConfig::default());
    }

    #[test]
    fn single_field_override_keeps_section_defaults() {
        let cfg = parse_config_json(r#"{ "boundaries": { "far_field": 20.0 } }"#).unwrap();
        assert_eq!(cfg.boundaries().far_field(), 20.0);
        assert_eq!(cfg.boundaries().blend_low(), 1.8);
        assert_eq!(cfg.boundaries().mid_field(), 3.0);
    }

    #[test]
    fn invalid_boundaries_are_rejected_at_load() {
        let err = parse_config_json(
            r#"{ "boundaries": { "blend_low": 2.2, "blend_high": 1.8, "mid_field": 3.0, "far_field": 10.0 } }"#,
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let err = read_config_json(Path::new("/definitely/not/here.json")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}

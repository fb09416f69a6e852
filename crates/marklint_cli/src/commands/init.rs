//! Init command implementation

use std::io::Write;
use std::path::PathBuf;

use marklint_core::CONFIG_FILE_NAMES;
use miette::{IntoDiagnostic, Result};
use tracing::info;

const DEFAULT_CONFIG: &str = r#"{
  "$schema": "https://marklint.dev/schemas/v1/config.json",
  // Rules are keyed by id or name: true | false | "error" | "warning" | "info" | "off" | { ...options }
  "rules": {
    "MD009": { "br_spaces": 2 },
    "MD041": "warning"
  },
  "exclude": ["**/node_modules/**"],
  "backup": true,
  "max_passes": 10
}
"#;

pub fn run_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAMES[0]);

    loop {
        let mut options = std::fs::OpenOptions::new();
        options.write(true).create_new(true);

        match options.open(&config_path) {
            Ok(mut file) => {
                file.write_all(DEFAULT_CONFIG.as_bytes()).into_diagnostic()?;
                info!("Created {}", config_path.display());
                println!("Created {}", config_path.display());
                return Ok(());
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                if !force {
                    return Err(miette::miette!(
                        "Config file already exists. Use --force to overwrite."
                    ));
                }

                match std::fs::remove_file(&config_path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e).into_diagnostic(),
                }
            }
            Err(e) => return Err(e).into_diagnostic(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marklint_core::LinterConfig;

    #[test]
    fn default_config_is_valid() {
        let config = LinterConfig::from_json(DEFAULT_CONFIG).unwrap();
        assert!(config.backup);
        assert_eq!(config.max_passes, 10);
        assert!(config.rules["MD009"].is_enabled());
    }

    #[test]
    fn default_config_resolves_against_builtin_rules() {
        let config = LinterConfig::from_json(DEFAULT_CONFIG).unwrap();
        let rules = marklint_rules::builtin_registry().resolve(&config).unwrap();
        assert_eq!(rules.len(), 10);
    }
}

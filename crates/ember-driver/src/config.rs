//! TOML configuration, mirroring the CLI's knobs plus the keys the CLI has
//! no flag for (`entrypoint.*`, `std.filepath`, `logging.*`).

use ember_core::{FatalError, FatalResult};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RuntimeLimits {
    pub worker_thread_count: u32,
    pub max_string_length: u32,
    pub max_concurrent_reads: u32,
    pub file_capacity: u32,
    pub identifier_capacity: u32,
}

impl Default for RuntimeLimits {
    fn default() -> Self {
        RuntimeLimits {
            worker_thread_count: std::thread::available_parallelism()
                .map(|n| n.get() as u32)
                .unwrap_or(1),
            max_string_length: 4096,
            max_concurrent_reads: 8,
            file_capacity: 64,
            identifier_capacity: 1024,
        }
    }
}

impl RuntimeLimits {
    /// Validates the ranges spec §6 assigns each knob.
    pub fn validate(&self) -> FatalResult<()> {
        if !(1..=1024).contains(&self.worker_thread_count) {
            return Err(FatalError::Config(format!(
                "worker-thread-count must be in 1..=1024, got {}",
                self.worker_thread_count
            )));
        }
        if !(4096..=65536).contains(&self.max_string_length) {
            return Err(FatalError::Config(format!(
                "max-string-length must be in 4096..=65536, got {}",
                self.max_string_length
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Entrypoint {
    pub filepath: Option<String>,
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StdConfig {
    pub filepath: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogToggle {
    pub enable: bool,
    pub log_filepath: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub asts: LogToggle,
    pub imports: LogToggle,
    pub types: LogToggle,
    pub opcodes: LogToggle,
    pub config: LogToggle,
    pub diagnostics: LogToggle,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub limits: RuntimeLimits,
    pub entrypoint: Entrypoint,
    pub std: StdConfig,
    pub logging: LoggingConfig,
}

impl Config {
    pub fn load(path: &Path) -> FatalResult<Config> {
        let text = std::fs::read_to_string(path).map_err(|source| FatalError::Io {
            path: path.to_owned(),
            source,
        })?;
        toml::from_str(&text).map_err(|e| FatalError::Config(format!("{}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate_cleanly() {
        assert!(RuntimeLimits::default().validate().is_ok());
    }

    #[test]
    fn out_of_range_string_length_is_rejected() {
        let limits = RuntimeLimits { max_string_length: 100, ..RuntimeLimits::default() };
        assert!(limits.validate().is_err());
    }

    #[test]
    fn parses_nested_logging_tree() {
        let text = r#"
            [logging.opcodes]
            enable = true
            log_filepath = "opcodes.log"
        "#;
        let config: Config = toml::from_str(text).unwrap();
        assert!(config.logging.opcodes.enable);
        assert_eq!(config.logging.opcodes.log_filepath.as_deref(), Some("opcodes.log"));
        assert!(!config.logging.types.enable);
    }

    #[test]
    fn loads_from_a_real_file_on_disk() {
        let dir = tempfile::tempdir().expect("failed to create temporary directory");
        let path = dir.path().join("ember.toml");
        std::fs::write(&path, "[entrypoint]\nfilepath = \"main.ember\"\nsymbol = \"main\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.entrypoint.filepath.as_deref(), Some("main.ember"));
        assert_eq!(config.entrypoint.symbol.as_deref(), Some("main"));
    }

    #[test]
    fn missing_file_reports_an_io_fatal_error() {
        let dir = tempfile::tempdir().expect("failed to create temporary directory");
        let result = Config::load(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(FatalError::Io { .. })));
    }
}

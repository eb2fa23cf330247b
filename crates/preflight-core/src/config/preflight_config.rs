//! Top-level preflight configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{BalanceConfig, HeuristicsConfig, PatternsConfig, ScanConfig, SymbolsConfig};
use crate::errors::ConfigError;

/// Project config file name looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = "preflight.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`PREFLIGHT_*`)
/// 3. Project config (`preflight.toml` in the project root, or an explicit path)
/// 4. User config (`~/.preflight/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PreflightConfig {
    pub scan: ScanConfig,
    pub balance: BalanceConfig,
    pub symbols: SymbolsConfig,
    pub patterns: PatternsConfig,
    pub heuristics: HeuristicsConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Explicit config file replacing the project `preflight.toml`.
    pub config_path: Option<PathBuf>,
    pub extensions: Vec<String>,
    pub balance_mode: Option<String>,
    pub validation_window: Option<usize>,
    pub error_handling_window: Option<usize>,
    pub reserved_entry_points: Vec<String>,
}

impl PreflightConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(ConfigError::ParseError { .. }) => {
                        return Err(ConfigError::ParseError {
                            path: user_config_path.display().to_string(),
                            message: "invalid TOML in user config".to_string(),
                        });
                    }
                    Err(e) => {
                        ::tracing::debug!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Layer 3: project config, or the explicit file given on the command line
        let explicit = cli_overrides.and_then(|cli| cli.config_path.clone());
        match explicit {
            Some(path) => Self::merge_toml_file(&mut config, &path)?,
            None => {
                let project_config_path = root.join(PROJECT_CONFIG_FILE);
                if project_config_path.exists() {
                    Self::merge_toml_file(&mut config, &project_config_path)?;
                }
            }
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &PreflightConfig) -> Result<(), ConfigError> {
        if config.scan.max_file_size == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "scan.max_file_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.scan.extensions.iter().any(|e| e.trim().is_empty()) {
            return Err(ConfigError::ValidationFailed {
                field: "scan.extensions".to_string(),
                message: "extensions must not be empty strings".to_string(),
            });
        }
        for category in &config.scan.categories {
            if !KNOWN_CATEGORIES.contains(&category.name.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "scan.categories.name".to_string(),
                    message: format!(
                        "unknown category '{}', expected one of {}",
                        category.name,
                        KNOWN_CATEGORIES.join(", ")
                    ),
                });
            }
        }
        for pair in &config.balance.pairs {
            if !matches!(pair.as_str(), "paren" | "brace" | "bracket") {
                return Err(ConfigError::InvalidValue {
                    field: "balance.pairs".to_string(),
                    message: format!("unknown delimiter pair '{pair}'"),
                });
            }
        }
        if !matches!(config.balance.effective_mode(), "raw" | "lexical") {
            return Err(ConfigError::InvalidValue {
                field: "balance.mode".to_string(),
                message: "must be \"raw\" or \"lexical\"".to_string(),
            });
        }
        if config.heuristics.validation_window == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "heuristics.validation_window".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.heuristics.error_handling_window == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "heuristics.error_handling_window".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if !matches!(
            config.heuristics.effective_validation_mode(),
            "any-negation" | "parameter-aware"
        ) {
            return Err(ConfigError::InvalidValue {
                field: "heuristics.validation_mode".to_string(),
                message: "must be \"any-negation\" or \"parameter-aware\"".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the user config path: `~/.preflight/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".preflight").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut PreflightConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: PreflightConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        ::tracing::debug!(path = %path.display(), "merged config file");
        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins only where it sets a value.
    fn merge(base: &mut PreflightConfig, other: &PreflightConfig) {
        // Scan
        if !other.scan.extensions.is_empty() {
            base.scan.extensions = other.scan.extensions.clone();
        }
        if !other.scan.categories.is_empty() {
            base.scan.categories = other.scan.categories.clone();
        }
        if !other.scan.extra_ignore.is_empty() {
            base.scan.extra_ignore = other.scan.extra_ignore.clone();
        }
        if other.scan.max_file_size.is_some() {
            base.scan.max_file_size = other.scan.max_file_size;
        }

        // Balance
        if !other.balance.pairs.is_empty() {
            base.balance.pairs = other.balance.pairs.clone();
        }
        if other.balance.mode.is_some() {
            base.balance.mode = other.balance.mode.clone();
        }
        if other.balance.line_threshold.is_some() {
            base.balance.line_threshold = other.balance.line_threshold;
        }

        // Symbols
        if !other.symbols.binding_files.is_empty() {
            base.symbols.binding_files = other.symbols.binding_files.clone();
        }
        if !other.symbols.declaration_categories.is_empty() {
            base.symbols.declaration_categories = other.symbols.declaration_categories.clone();
        }
        if other.symbols.binding_pattern.is_some() {
            base.symbols.binding_pattern = other.symbols.binding_pattern.clone();
        }
        if !other.symbols.reserved_entry_points.is_empty() {
            base.symbols.reserved_entry_points = other.symbols.reserved_entry_points.clone();
        }
        if other.symbols.allow_indented.is_some() {
            base.symbols.allow_indented = other.symbols.allow_indented;
        }

        // Patterns
        if other.patterns.conflict_markers.is_some() {
            base.patterns.conflict_markers = other.patterns.conflict_markers;
        }
        if other.patterns.suspicious_returns.is_some() {
            base.patterns.suspicious_returns = other.patterns.suspicious_returns;
        }
        if !other.patterns.forbidden.is_empty() {
            base.patterns.forbidden = other.patterns.forbidden.clone();
        }

        // Heuristics
        if other.heuristics.validation_window.is_some() {
            base.heuristics.validation_window = other.heuristics.validation_window;
        }
        if other.heuristics.error_handling_window.is_some() {
            base.heuristics.error_handling_window = other.heuristics.error_handling_window;
        }
        if other.heuristics.validation_mode.is_some() {
            base.heuristics.validation_mode = other.heuristics.validation_mode.clone();
        }
        if !other.heuristics.risky_functions.is_empty() {
            base.heuristics.risky_functions = other.heuristics.risky_functions.clone();
        }
        if !other.heuristics.categories.is_empty() {
            base.heuristics.categories = other.heuristics.categories.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `PREFLIGHT_SCAN_EXTENSIONS`, `PREFLIGHT_BALANCE_MODE`, etc.
    fn apply_env_overrides(config: &mut PreflightConfig) {
        if let Ok(val) = std::env::var("PREFLIGHT_SCAN_EXTENSIONS") {
            let exts = split_list(&val);
            if !exts.is_empty() {
                config.scan.extensions = exts;
            }
        }
        if let Ok(val) = std::env::var("PREFLIGHT_SCAN_MAX_FILE_SIZE") {
            if let Ok(v) = val.parse::<u64>() {
                config.scan.max_file_size = Some(v);
            }
        }
        if let Ok(val) = std::env::var("PREFLIGHT_BALANCE_MODE") {
            config.balance.mode = Some(val);
        }
        if let Ok(val) = std::env::var("PREFLIGHT_VALIDATION_WINDOW") {
            if let Ok(v) = val.parse::<usize>() {
                config.heuristics.validation_window = Some(v);
            }
        }
        if let Ok(val) = std::env::var("PREFLIGHT_ERROR_HANDLING_WINDOW") {
            if let Ok(v) = val.parse::<usize>() {
                config.heuristics.error_handling_window = Some(v);
            }
        }
        if let Ok(val) = std::env::var("PREFLIGHT_RESERVED_ENTRY_POINTS") {
            let names = split_list(&val);
            if !names.is_empty() {
                config.symbols.reserved_entry_points = names;
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut PreflightConfig, cli: &CliOverrides) {
        if !cli.extensions.is_empty() {
            config.scan.extensions = cli.extensions.clone();
        }
        if let Some(ref v) = cli.balance_mode {
            config.balance.mode = Some(v.clone());
        }
        if let Some(v) = cli.validation_window {
            config.heuristics.validation_window = Some(v);
        }
        if let Some(v) = cli.error_handling_window {
            config.heuristics.error_handling_window = Some(v);
        }
        if !cli.reserved_entry_points.is_empty() {
            config.symbols.reserved_entry_points = cli.reserved_entry_points.clone();
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Category names accepted in `scan.categories`.
pub const KNOWN_CATEGORIES: &[&str] = &["client", "server", "shared", "tests", "web", "other"];

fn split_list(val: &str) -> Vec<String> {
    val.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_drops_blanks() {
        assert_eq!(split_list("gs, js ,,"), vec!["gs", "js"]);
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn merge_only_overrides_set_fields() {
        let mut base = PreflightConfig::default();
        base.heuristics.validation_window = Some(4);
        let mut other = PreflightConfig::default();
        other.balance.mode = Some("lexical".to_string());
        PreflightConfig::merge(&mut base, &other);
        assert_eq!(base.heuristics.validation_window, Some(4));
        assert_eq!(base.balance.effective_mode(), "lexical");
    }
}

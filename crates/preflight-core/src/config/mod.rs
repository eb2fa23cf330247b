//! Configuration system for preflight.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod balance_config;
pub mod heuristics_config;
pub mod patterns_config;
pub mod preflight_config;
pub mod scan_config;
pub mod symbols_config;

pub use balance_config::BalanceConfig;
pub use heuristics_config::HeuristicsConfig;
pub use patterns_config::{ForbiddenRuleConfig, PatternsConfig};
pub use preflight_config::{CliOverrides, PreflightConfig};
pub use scan_config::{CategoryConfig, ScanConfig};
pub use symbols_config::{SymbolsConfig, DEFAULT_BINDING_PATTERN, DEFAULT_RESERVED_ENTRY_POINTS};

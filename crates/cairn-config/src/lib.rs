//! `cairn.toml` configuration and tracing setup shared by the cairn binaries.

mod diagnostics;
mod schema;
mod validation;

use std::path::{Path, PathBuf};
use std::sync::Once;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use diagnostics::{ConfigDiagnostics, ConfigWarning};
pub use schema::json_schema;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
#[schemars(deny_unknown_fields)]
pub struct CairnConfig {
    pub logging: LoggingConfig,
    pub check: CheckConfig,
    pub generate: GenerateConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level for all cairn crates.
    ///
    /// Either a simple level (`info`, `warning`, ...) or a full `EnvFilter`
    /// directive string such as `cairn.inherit=trace,info`.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,

    /// Write logs to stderr. When disabled, logging is silenced.
    #[serde(default = "LoggingConfig::default_stderr")]
    pub stderr: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "warn".to_owned()
    }

    fn default_stderr() -> bool {
        true
    }

    pub(crate) fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            "off" | "none" => "off".to_owned(),
            _ => trimmed.to_owned(),
        }
    }

    fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        let directives = Self::normalize_level_directives(&self.level);
        tracing_subscriber::EnvFilter::try_new(directives).unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::default()
                .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        })
    }

    /// The effective filter: the configured level merged with `RUST_LOG`, which wins
    /// on conflicting directives.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let env_directives = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let config_directives = Self::normalize_level_directives(&self.level);

        match env_directives {
            Some(env_directives) => {
                let combined = format!("{config_directives},{env_directives}");
                tracing_subscriber::EnvFilter::try_new(combined)
                    .or_else(|_| tracing_subscriber::EnvFilter::try_new(env_directives))
                    .unwrap_or_else(|_| self.config_env_filter())
            }
            None => self.config_env_filter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            stderr: Self::default_stderr(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SeverityLevel {
    Error,
    #[default]
    Warning,
    Info,
}

impl From<SeverityLevel> for cairn_check::Severity {
    fn from(level: SeverityLevel) -> Self {
        match level {
            SeverityLevel::Error => cairn_check::Severity::Error,
            SeverityLevel::Warning => cairn_check::Severity::Warning,
            SeverityLevel::Info => cairn_check::Severity::Info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
#[schemars(deny_unknown_fields)]
pub struct CheckConfig {
    /// Report capabilities already provided by the supertype or another capability.
    pub report_redundant_capabilities: bool,
    pub redundant_capability_severity: SeverityLevel,
    /// Report subtypes that need an explicit constructor.
    pub report_missing_constructor: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        let options = cairn_check::CheckOptions::default();
        Self {
            report_redundant_capabilities: options.report_redundant_capabilities,
            redundant_capability_severity: SeverityLevel::Warning,
            report_missing_constructor: options.report_missing_constructor,
        }
    }
}

impl CheckConfig {
    pub fn options(&self) -> cairn_check::CheckOptions {
        cairn_check::CheckOptions {
            report_redundant_capabilities: self.report_redundant_capabilities,
            redundant_capability_severity: self.redundant_capability_severity.into(),
            report_missing_constructor: self.report_missing_constructor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
#[schemars(deny_unknown_fields)]
pub struct GenerateConfig {
    /// One indentation level in generated stubs.
    pub indent: String,
    /// Comment placed in generated action bodies; empty to omit it.
    pub action_comment: String,
    pub create_constructors: bool,
    pub create_actions: bool,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        let options = cairn_codegen::StubOptions::default();
        Self {
            indent: options.indent,
            action_comment: options.action_comment.unwrap_or_default(),
            create_constructors: options.create_constructors,
            create_actions: options.create_actions,
        }
    }
}

impl GenerateConfig {
    pub fn options(&self) -> cairn_codegen::StubOptions {
        let comment = self.action_comment.trim();
        cairn_codegen::StubOptions {
            indent: if self.indent.is_empty() {
                cairn_codegen::StubOptions::default().indent
            } else {
                self.indent.clone()
            },
            action_comment: (!comment.is_empty()).then(|| comment.to_owned()),
            create_constructors: self.create_constructors,
            create_actions: self.create_actions,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The default `Display` embeds a source snippet; keep only the message.
        ConfigError::Toml(err.message().to_owned())
    }
}

impl CairnConfig {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let (config, _) = Self::load_from_path_with_diagnostics(path)?;
        Ok(config)
    }

    /// Load a TOML config file and report unknown keys and semantic problems.
    pub fn load_from_path_with_diagnostics(
        path: impl AsRef<Path>,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str_with_diagnostics(&text)
    }

    pub fn load_from_str_with_diagnostics(
        text: &str,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let (config, unknown_keys) =
            diagnostics::deserialize_toml_with_unknown_keys::<CairnConfig>(text)?;

        let diagnostics = ConfigDiagnostics {
            unknown_keys,
            warnings: config.validate(),
        };
        Ok((config, diagnostics))
    }
}

pub const CAIRN_CONFIG_ENV_VAR: &str = "CAIRN_CONFIG_PATH";

/// Locate the config file for `dir`.
///
/// Search order:
/// 1) `CAIRN_CONFIG_PATH` (absolute or relative to `dir`)
/// 2) `cairn.toml` in `dir`
/// 3) `.cairn.toml` in `dir`
pub fn discover_config_path(dir: &Path) -> Option<PathBuf> {
    if let Some(value) = std::env::var_os(CAIRN_CONFIG_ENV_VAR) {
        let candidate = PathBuf::from(value);
        return Some(if candidate.is_absolute() {
            candidate
        } else {
            dir.join(candidate)
        });
    }

    ["cairn.toml", ".cairn.toml"]
        .into_iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

static TRACING_INIT: Once = Once::new();

/// Install the global `tracing` subscriber.
///
/// Safe to call more than once; only the first call has an effect, and an already
/// installed subscriber is left in place.
pub fn init_tracing(config: &LoggingConfig) {
    use tracing_subscriber::fmt::writer::BoxMakeWriter;

    TRACING_INIT.call_once(|| {
        let writer = if !config.stderr {
            BoxMakeWriter::new(std::io::sink)
        } else if cfg!(debug_assertions) {
            // Keeps `cargo test` output capture working.
            BoxMakeWriter::new(tracing_subscriber::fmt::writer::TestWriter::with_stderr)
        } else {
            BoxMakeWriter::new(std::io::stderr)
        };

        let builder = tracing_subscriber::fmt()
            .with_env_filter(config.env_filter())
            .with_writer(writer);
        let installed = if config.json {
            builder.json().with_ansi(false).try_init()
        } else {
            builder.try_init()
        };
        if installed.is_ok() {
            tracing::debug!(
                target: "cairn.config",
                level = %config.level,
                json = config.json,
                "tracing initialized"
            );
        }
    });
}

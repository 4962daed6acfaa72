use crate::diagnostics::ConfigWarning;
use crate::{CairnConfig, LoggingConfig};

impl CairnConfig {
    /// Semantic checks that deserialization cannot express.
    #[must_use]
    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut out = Vec::new();
        validate_logging(&self.logging, &mut out);
        validate_generate(self, &mut out);
        out
    }
}

fn validate_logging(logging: &LoggingConfig, out: &mut Vec<ConfigWarning>) {
    let normalized = LoggingConfig::normalize_level_directives(&logging.level);
    if !logging.level.trim().is_empty()
        && tracing_subscriber::EnvFilter::try_new(normalized.clone()).is_err()
    {
        out.push(ConfigWarning::LoggingLevelInvalid {
            value: logging.level.clone(),
            normalized,
        });
    }
}

fn validate_generate(config: &CairnConfig, out: &mut Vec<ConfigWarning>) {
    let indent = &config.generate.indent;
    if indent.is_empty() {
        out.push(ConfigWarning::InvalidValue {
            toml_path: "generate.indent".to_owned(),
            message: "must not be empty; using a tab".to_owned(),
        });
    } else if !indent.chars().all(|c| c == ' ' || c == '\t') {
        out.push(ConfigWarning::InvalidValue {
            toml_path: "generate.indent".to_owned(),
            message: "should contain only spaces or tabs".to_owned(),
        });
    }
    if config.generate.action_comment.contains('\n') {
        out.push(ConfigWarning::InvalidValue {
            toml_path: "generate.action_comment".to_owned(),
            message: "must be a single line".to_owned(),
        });
    }
}

//! Log output settings consumed by the tracing initialiser

use serde::{Deserialize, Serialize};

use super::environment::Environment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `rh_core=debug,sqlx=warn`
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: LogFormat,

    /// ANSI colours; ignored for json
    #[serde(default)]
    pub colored: bool,

    /// Emit file and line for each event
    #[serde(default)]
    pub source_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::for_environment(Environment::Development)
    }
}

impl LoggingConfig {
    /// Developers get readable debug output; deployed environments emit
    /// json for the log pipeline
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Development => Self {
                level: "debug,sqlx=warn".to_string(),
                format: LogFormat::Pretty,
                colored: true,
                source_location: true,
            },
            Environment::Staging => Self {
                level: "info".to_string(),
                format: LogFormat::Json,
                colored: false,
                source_location: false,
            },
            Environment::Production => Self {
                level: "info,sqlx=warn".to_string(),
                format: LogFormat::Json,
                colored: false,
                source_location: false,
            },
        }
    }
}

fn default_log_format() -> LogFormat {
    LogFormat::Json
}

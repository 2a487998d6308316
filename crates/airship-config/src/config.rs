//! Application settings for the Airship tooling

use airship_foundation::{AirshipError, AirshipResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings file looked up in the workspace directory
pub const SETTINGS_FILE_NAME: &str = "airship.toml";

/// Prefix of environment variable overrides, e.g. `AIRSHIP__LOGGING__LEVEL=debug`
pub const ENV_PREFIX: &str = "AIRSHIP__";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Compiler command configuration
    #[serde(default)]
    pub command: CommandConfig,
    /// Output-opening behaviour
    #[serde(default)]
    pub output: OutputConfig,
}

/// Log output format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format for development
    #[default]
    Pretty,
    /// Structured JSON format for tooling
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// How the TypeScript compiler is started
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommandConfig {
    /// Arguments passed to the compiler
    pub parameters: Vec<String>,
    /// Use the development build of the compiler (`utsc-dev`)
    pub development: bool,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            parameters: vec![
                "build".to_string(),
                "--watch".to_string(),
                "--writeOnlyChanged".to_string(),
            ],
            development: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    /// Open output files beside the source instead of replacing it
    #[serde(alias = "opentoside")]
    pub open_to_side: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { open_to_side: true }
    }
}

impl AppConfig {
    /// Load configuration for a workspace directory
    ///
    /// Configuration is loaded in the following priority order (highest to lowest):
    /// 1. Environment variables (`AIRSHIP__*`)
    /// 2. `airship.toml` in the workspace directory
    /// 3. Default values
    pub fn load(workspace: &Path) -> AirshipResult<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Toml},
            Figment,
        };

        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        let settings_path = workspace.join(SETTINGS_FILE_NAME);
        if settings_path.is_file() {
            tracing::debug!(path = %settings_path.display(), "Loading settings file");
            figment = figment.merge(Toml::file(&settings_path));
        }

        let figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let app_config: AppConfig = figment
            .extract()
            .map_err(|e| AirshipError::config(format!("Failed to load configuration: {}", e)))?;

        app_config.validate()?;

        tracing::debug!(
            level = %app_config.logging.level,
            development = app_config.command.development,
            "Configuration loaded"
        );

        Ok(app_config)
    }

    /// Validate the configuration
    fn validate(&self) -> AirshipResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(AirshipError::config(format!(
                "Invalid log level '{}', must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            )));
        }

        if self.command.parameters.iter().any(|p| p.trim().is_empty()) {
            return Err(AirshipError::config(
                "Compiler parameters cannot contain empty arguments",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_without_settings_file() {
        Jail::expect_with(|jail| {
            let config = AppConfig::load(jail.directory()).expect("defaults load");
            assert_eq!(config, AppConfig::default());
            assert_eq!(
                config.command.parameters,
                vec!["build", "--watch", "--writeOnlyChanged"]
            );
            assert!(config.output.open_to_side);
            Ok(())
        });
    }

    #[test]
    fn test_settings_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                SETTINGS_FILE_NAME,
                r#"
                [command]
                development = true
                parameters = ["build"]

                [output]
                openToSide = false
                "#,
            )?;

            let config = AppConfig::load(jail.directory()).expect("settings load");
            assert!(config.command.development);
            assert_eq!(config.command.parameters, vec!["build"]);
            assert!(!config.output.open_to_side);
            assert_eq!(config.logging.level, "info");
            Ok(())
        });
    }

    #[test]
    fn test_environment_overrides_settings_file() {
        Jail::expect_with(|jail| {
            jail.create_file(SETTINGS_FILE_NAME, "[logging]\nlevel = \"warn\"\n")?;
            jail.set_env("AIRSHIP__LOGGING__LEVEL", "debug");

            let config = AppConfig::load(jail.directory()).expect("env load");
            assert_eq!(config.logging.level, "debug");
            Ok(())
        });
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(SETTINGS_FILE_NAME, "[logging]\nlevel = \"loud\"\n")?;

            let err = AppConfig::load(jail.directory()).unwrap_err();
            assert!(err.to_string().contains("Invalid log level 'loud'"));
            Ok(())
        });
    }
}

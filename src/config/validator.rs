//! Configuration validation for the commit gate.
//!
//! This module checks configuration values and the invocation arguments
//! before anything touches the repository.

use crate::error::{ConfigError, GateError, Result};
use tracing::debug;

use super::spec::{GateConfig, PlannerConfig};

/// Validator for gate configurations.
#[derive(Debug, Default)]
pub struct ConfigValidator;

/// Validation result containing all errors found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of warnings (non-fatal issues).
    pub warnings: Vec<String>,
}

/// A single validation error.
#[derive(Debug)]
pub struct ValidationError {
    /// The field path that failed validation.
    pub field: String,
    /// The error message.
    pub message: String,
}

impl ConfigValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a gate configuration.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first problem if validation fails.
    pub fn validate(&self, config: &GateConfig) -> Result<ValidationResult> {
        let mut result = ValidationResult::default();

        Self::validate_overrides(config, &mut result);
        Self::validate_planner(&config.planner, &mut result);

        Self::finish(result)
    }

    /// Validates the positional task and workspace arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if either argument is empty or malformed.
    pub fn validate_invocation(&self, task: &str, workspace: &str) -> Result<ValidationResult> {
        let mut result = ValidationResult::default();

        for (field, value) in [("task", task), ("workspace", workspace)] {
            if value.trim().is_empty() {
                result.errors.push(ValidationError {
                    field: String::from(field),
                    message: format!("The {field} argument cannot be empty"),
                });
            } else if value.contains(char::is_whitespace) {
                result.errors.push(ValidationError {
                    field: String::from(field),
                    message: format!("The {field} '{value}' cannot contain whitespace"),
                });
            }
        }

        Self::finish(result)
    }

    fn finish(result: ValidationResult) -> Result<ValidationResult> {
        match result.errors.first() {
            None => {
                debug!("Configuration validation passed");
                Ok(result)
            }
            Some(first_error) => Err(GateError::Config(ConfigError::validation(
                first_error.message.clone(),
                first_error.field.clone(),
            ))),
        }
    }

    fn validate_overrides(config: &GateConfig, result: &mut ValidationResult) {
        if config.force_env.trim().is_empty() {
            result.errors.push(ValidationError {
                field: String::from("force_env"),
                message: String::from("Force environment variable name cannot be empty"),
            });
        } else if config.force_env.contains('=') {
            result.errors.push(ValidationError {
                field: String::from("force_env"),
                message: format!(
                    "Force environment variable '{}' cannot contain '='",
                    config.force_env
                ),
            });
        }

        if config.marker_prefix.trim().is_empty() {
            result.errors.push(ValidationError {
                field: String::from("marker_prefix"),
                message: String::from("Commit marker prefix cannot be empty"),
            });
        } else if config.marker_prefix.contains(['[', ']']) {
            result.errors.push(ValidationError {
                field: String::from("marker_prefix"),
                message: String::from("Commit marker prefix cannot contain brackets"),
            });
        }
    }

    fn validate_planner(planner: &PlannerConfig, result: &mut ValidationResult) {
        if let Some(command) = &planner.command {
            if command.first().is_none_or(|program| program.trim().is_empty()) {
                result.errors.push(ValidationError {
                    field: String::from("planner.command"),
                    message: String::from("Planner command must start with a program name"),
                });
            }
            if planner.version.is_some() {
                result.warnings.push(String::from(
                    "planner.version is ignored when planner.command is set",
                ));
            }
            return;
        }

        if planner.runner.trim().is_empty() {
            result.errors.push(ValidationError {
                field: String::from("planner.runner"),
                message: String::from("Planner runner cannot be empty"),
            });
        }

        if planner.tool.trim().is_empty() {
            result.errors.push(ValidationError {
                field: String::from("planner.tool"),
                message: String::from("Planner tool cannot be empty"),
            });
        }

        if planner.version.as_deref().is_some_and(|v| v.trim().is_empty()) {
            result.errors.push(ValidationError {
                field: String::from("planner.version"),
                message: String::from("Pinned planner version cannot be empty"),
            });
        }
    }
}

impl ValidationResult {
    /// Returns true if validation passed (no errors).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(err: &GateError) -> Option<&str> {
        match err {
            GateError::Config(ConfigError::ValidationError { field, .. }) => field.as_deref(),
            _ => None,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let result = ConfigValidator::new()
            .validate(&GateConfig::default())
            .expect("defaults should validate");
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_empty_force_env_rejected() {
        let config = GateConfig {
            force_env: String::new(),
            ..GateConfig::default()
        };
        let err = ConfigValidator::new().validate(&config).unwrap_err();
        assert_eq!(field_of(&err), Some("force_env"));
    }

    #[test]
    fn test_bracketed_marker_prefix_rejected() {
        let config = GateConfig {
            marker_prefix: String::from("[deploy"),
            ..GateConfig::default()
        };
        let err = ConfigValidator::new().validate(&config).unwrap_err();
        assert_eq!(field_of(&err), Some("marker_prefix"));
    }

    #[test]
    fn test_empty_custom_command_rejected() {
        let mut config = GateConfig::default();
        config.planner.command = Some(vec![]);
        let err = ConfigValidator::new().validate(&config).unwrap_err();
        assert_eq!(field_of(&err), Some("planner.command"));
    }

    #[test]
    fn test_custom_command_with_version_warns() {
        let mut config = GateConfig::default();
        config.planner.command = Some(vec![String::from("turbo")]);
        config.planner.version = Some(String::from("2.0.0"));
        let result = ConfigValidator::new()
            .validate(&config)
            .expect("config should validate");
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_invocation_arguments() {
        let validator = ConfigValidator::new();
        assert!(validator.validate_invocation("build", "web").is_ok());

        let err = validator.validate_invocation("", "web").unwrap_err();
        assert_eq!(field_of(&err), Some("task"));

        let err = validator.validate_invocation("build", "my web").unwrap_err();
        assert_eq!(field_of(&err), Some("workspace"));
    }
}

//! Configuration validation.

use crate::schema::Config;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Pools larger than this are accepted with a warning.
const MAX_RECOMMENDED_WORKERS: usize = 64;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();
        Self::validate_service(config, &mut result);
        Self::validate_jobs(config, &mut result);
        Self::validate_logging(config, &mut result);
        result
    }

    fn validate_service(config: &Config, result: &mut ValidationResult) {
        if config.service.title.trim().is_empty() {
            result.add_error(ValidationError::new(
                "service.title",
                "Title cannot be empty",
            ));
        }
    }

    fn validate_jobs(config: &Config, result: &mut ValidationResult) {
        let workers = config.jobs.max_workers;
        if workers == 0 {
            result.add_error(ValidationError::new(
                "jobs.max_workers",
                "max_workers must be greater than 0",
            ));
        }

        if workers > MAX_RECOMMENDED_WORKERS {
            result.add_warning(ValidationWarning::new(
                "jobs.max_workers",
                format!(
                    "max_workers is very high (>{}), each running job occupies a thread",
                    MAX_RECOMMENDED_WORKERS
                ),
            ));
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        let level = config.logging.level.to_ascii_lowercase();
        // Full filter directives such as "s2gos_jobs=debug" are left to the
        // subscriber.
        if !level.contains('=') && !LOG_LEVELS.contains(&level.as_str()) {
            result.add_error(ValidationError::new(
                "logging.level",
                format!(
                    "Unknown log level '{}', expected one of: {}",
                    config.logging.level,
                    LOG_LEVELS.join(", ")
                ),
            ));
        }

        if let Some(dir) = &config.logging.log_dir {
            if dir.as_os_str().is_empty() {
                result.add_error(ValidationError::new(
                    "logging.log_dir",
                    "log_dir cannot be empty",
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

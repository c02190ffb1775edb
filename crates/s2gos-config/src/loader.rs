//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::schema::Config;

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        let mut config = Self::load_str(&content)?;
        config.logging.log_dir = config
            .logging
            .log_dir
            .map(|dir| PathBuf::from(Self::expand_path(&dir.to_string_lossy())));
        Ok(config)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: Config = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Load `path` if given, else the default file if it exists, else the
    /// built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load(&path),
                _ => Ok(Config::default()),
            },
        }
    }

    /// `s2gos/config.toml` under the platform's config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("s2gos").join("config.toml"))
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        let mut result = content.to_string();
        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/logs`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_full_config() {
        let content = r#"
            [service]
            title = "Processing node"
            description = "Runs demo processes"

            [jobs]
            max_workers = 8

            [logging]
            level = "debug"
            log_dir = "/var/log/s2gos"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.service.title, "Processing node");
        assert_eq!(config.service.description.as_deref(), Some("Runs demo processes"));
        assert_eq!(config.jobs.max_workers, 8);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.log_dir, Some(PathBuf::from("/var/log/s2gos")));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[jobs]").unwrap();
        writeln!(file, "max_workers = 5").unwrap();
        writeln!(file, "[logging]").unwrap();
        writeln!(file, "log_dir = \"~/s2gos-logs\"").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.jobs.max_workers, 5);
        let log_dir = config.logging.log_dir.unwrap();
        assert!(!log_dir.to_string_lossy().starts_with('~'));
        assert!(log_dir.ends_with("s2gos-logs"));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/s2gos.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_or_default_with_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[jobs]\nmax_workers = 2").unwrap();
        let config = ConfigLoader::load_or_default(Some(file.path())).unwrap();
        assert_eq!(config.jobs.max_workers, 2);

        let missing = ConfigLoader::load_or_default(Some(Path::new("/nonexistent/s2gos.toml")));
        assert!(missing.is_err());
    }

    #[test]
    fn test_default_path_location() {
        if let Some(path) = ConfigLoader::default_path() {
            assert!(path.ends_with("s2gos/config.toml"));
        }
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("max_workers = [unclosed");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_wrong_value_type() {
        let result = ConfigLoader::load_str("[jobs]\nmax_workers = \"many\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::set_var("S2GOS_TEST_SERVICE_TITLE", "From env");
        }
        let config = ConfigLoader::load_str("[service]\ntitle = \"${S2GOS_TEST_SERVICE_TITLE}\"")
            .unwrap();
        assert_eq!(config.service.title, "From env");
        unsafe {
            std::env::remove_var("S2GOS_TEST_SERVICE_TITLE");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${S2GOS_NONEXISTENT_TEST_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(ref v)) if v == "S2GOS_NONEXISTENT_TEST_VAR_12345"));
    }

    #[test]
    fn test_expand_env_vars_no_vars() {
        let content = "value = \"no variables here\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert_eq!(expanded, content);
    }

    #[test]
    fn test_expand_path() {
        assert_eq!(ConfigLoader::expand_path("/usr/local/bin"), "/usr/local/bin");
        let expanded = ConfigLoader::expand_path("~/test");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("/test"));
    }
}

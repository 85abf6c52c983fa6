//! Startup configuration from the environment and command line.

use fam_core::DEFAULT_FILE_NAME;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming the file to open.
pub const ENV_FILE: &str = "FAM_FILE";
/// Environment variable holding the log level.
pub const ENV_LOG_LEVEL: &str = "FAM_LOG_LEVEL";
/// Environment variable holding the log directory.
pub const ENV_LOG_DIR: &str = "FAM_LOG_DIR";

const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown option `{0}` (try --help)")]
    UnknownOption(String),

    #[error("more than one file given: `{0}` and `{1}`")]
    ExtraFile(String, String),
}

/// Everything `main` needs to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// File the session is bound to.
    pub file: PathBuf,
    /// Force debug logging.
    pub debug: bool,
    /// Run the line-oriented interface instead of the TUI.
    pub headless: bool,
    /// Restore aspect counts when loading.
    pub keep_counts: bool,
    /// Print usage and exit.
    pub show_help: bool,
    /// Log level passed to the logger.
    pub log_level: String,
    /// Directory for rotating log files.
    pub log_dir: PathBuf,
}

impl Config {
    /// Build from process arguments (including the program name) and a
    /// variable lookup.
    ///
    /// Command line beats environment beats built-in defaults.
    pub fn parse<F>(args: &[String], env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self {
            file: env(ENV_FILE)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME)),
            debug: false,
            headless: false,
            keep_counts: false,
            show_help: false,
            log_level: env(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: env(ENV_LOG_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR)),
        };

        let mut positional: Option<String> = None;
        for arg in args.iter().skip(1) {
            match arg.as_str() {
                "-h" | "--help" => config.show_help = true,
                "-d" | "--debug" => config.debug = true,
                "--headless" => config.headless = true,
                "--keep-counts" => config.keep_counts = true,
                option if option.starts_with('-') && option.len() > 1 => {
                    return Err(ConfigError::UnknownOption(option.to_string()));
                }
                file => {
                    if let Some(first) = &positional {
                        return Err(ConfigError::ExtraFile(first.clone(), file.to_string()));
                    }
                    positional = Some(file.to_string());
                }
            }
        }

        if let Some(file) = positional {
            config.file = PathBuf::from(file);
        }
        if config.debug {
            config.log_level = "debug".to_string();
        }

        Ok(config)
    }

    /// Build from the real process arguments and environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let args: Vec<String> = std::env::args().collect();
        Self::parse(&args, |key| std::env::var(key).ok())
    }
}

/// Default log level for the current build mode.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("fam")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = Config::parse(&args(&[]), no_env).unwrap();
        assert_eq!(config.file, PathBuf::from("default.fam"));
        assert!(!config.debug && !config.headless && !config.keep_counts && !config.show_help);
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.log_dir, PathBuf::from("logs"));
    }

    #[test]
    fn test_flags_and_file() {
        let config = Config::parse(
            &args(&["--headless", "campaign.fam", "-d", "--keep-counts"]),
            no_env,
        )
        .unwrap();
        assert_eq!(config.file, PathBuf::from("campaign.fam"));
        assert!(config.headless);
        assert!(config.debug);
        assert!(config.keep_counts);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_environment_then_args() {
        let vars: HashMap<&str, &str> = [
            (ENV_FILE, "from_env.fam"),
            (ENV_LOG_LEVEL, "warn"),
            (ENV_LOG_DIR, "/tmp/fam-logs"),
        ]
        .into_iter()
        .collect();
        let env = |key: &str| vars.get(key).map(|v| v.to_string());

        let config = Config::parse(&args(&[]), env).unwrap();
        assert_eq!(config.file, PathBuf::from("from_env.fam"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, PathBuf::from("/tmp/fam-logs"));

        let config = Config::parse(&args(&["cli.fam", "--debug"]), env).unwrap();
        assert_eq!(config.file, PathBuf::from("cli.fam"));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_rejects_unknown_and_extra() {
        assert_eq!(
            Config::parse(&args(&["--verbose"]), no_env),
            Err(ConfigError::UnknownOption("--verbose".to_string()))
        );
        assert_eq!(
            Config::parse(&args(&["a.fam", "b.fam"]), no_env),
            Err(ConfigError::ExtraFile("a.fam".to_string(), "b.fam".to_string()))
        );
    }

    #[test]
    fn test_dash_is_a_file() {
        let config = Config::parse(&args(&["-"]), no_env).unwrap();
        assert_eq!(config.file, PathBuf::from("-"));
    }
}

//! Optional on-disk configuration for the interactive shell.
//!
//! `bshell` probes a single `bshell.toml` in the working directory. A
//! missing file yields the defaults; a present file may set any subset
//! of the fields, and unknown keys are rejected so typos surface
//! instead of silently falling back.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use serde::Deserialize;
use thiserror::Error;

/// Location probed by [`ShellConfig::load`], relative to the working
/// directory.
pub static CONFIG_PATH: Lazy<PathBuf> = Lazy::new(|| PathBuf::from("bshell.toml"));

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Settings for the interactive shell and script runner.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    /// Name of the module the session builds.
    pub module_name: String,
    /// File the serialized module is written to on exit.
    pub session_file: PathBuf,
    /// Readline history location.
    pub history_file: PathBuf,
    /// Print the serialized module to stdout when the session ends.
    pub echo_module_on_exit: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        ShellConfig {
            module_name: "interpreter_session".to_string(),
            session_file: PathBuf::from("session.bsir"),
            history_file: PathBuf::from(".bshell_history"),
            echo_module_on_exit: true,
        }
    }
}

impl ShellConfig {
    /// Loads `bshell.toml` from the working directory, falling back to
    /// the defaults when the file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&CONFIG_PATH)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };
        toml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ShellConfig::load_from(&dir.path().join("bshell.toml")).unwrap();
        assert_eq!(config, ShellConfig::default());
        assert_eq!(config.module_name, "interpreter_session");
        assert!(config.echo_module_on_exit);
    }

    #[test]
    fn full_file_overrides_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bshell.toml");
        fs::write(
            &path,
            r#"
module_name = "scratch"
session_file = "out/scratch.bsir"
history_file = "/tmp/hist"
echo_module_on_exit = false
"#,
        )
        .unwrap();

        let config = ShellConfig::load_from(&path).unwrap();
        assert_eq!(config.module_name, "scratch");
        assert_eq!(config.session_file, PathBuf::from("out/scratch.bsir"));
        assert_eq!(config.history_file, PathBuf::from("/tmp/hist"));
        assert!(!config.echo_module_on_exit);
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bshell.toml");
        fs::write(&path, "module_name = \"demo\"\n").unwrap();

        let config = ShellConfig::load_from(&path).unwrap();
        assert_eq!(config.module_name, "demo");
        assert_eq!(config.session_file, PathBuf::from("session.bsir"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bshell.toml");
        fs::write(&path, "module_nam = \"typo\"\n").unwrap();

        let err = ShellConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bshell.toml"));
    }
}

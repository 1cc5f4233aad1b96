use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
};

use directories::BaseDirs;

/// Environment variable that overrides the storage root.
pub const STORAGE_ROOT_VAR: &str = "RADCALC_HOME";

/// Name of the directory created under the platform config directory.
pub const APP_DIR: &str = "radcalc";

/// Process-wide settings, resolved once at startup and passed down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory that saved profiles live in.
    pub storage_root: PathBuf,
}

impl Config {
    /// Resolves the configuration from the process environment.
    ///
    /// The storage root is `$RADCALC_HOME` when set and non-empty, otherwise
    /// `radcalc` under the platform config directory (`$XDG_CONFIG_HOME` or
    /// `~/.config` on Linux, `%APPDATA%` on Windows). Without a home
    /// directory it falls back to the working directory.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var_os(key))
    }

    /// Resolves the configuration with `var` standing in for the
    /// environment.
    #[must_use]
    pub fn from_vars(var: impl Fn(&str) -> Option<OsString>) -> Self {
        let storage_root = var(STORAGE_ROOT_VAR).filter(|root| !root.is_empty())
                                                .map_or_else(default_storage_root, PathBuf::from);
        Self { storage_root }
    }

    /// Replaces the storage root, e.g. from a command line flag.
    #[must_use]
    pub fn with_storage_root(mut self, root: impl AsRef<Path>) -> Self {
        self.storage_root = root.as_ref().to_path_buf();
        self
    }
}

fn default_storage_root() -> PathBuf {
    BaseDirs::new().map_or_else(|| PathBuf::from("."), |dirs| dirs.config_dir().join(APP_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_variable_wins() {
        let config = Config::from_vars(|key| (key == STORAGE_ROOT_VAR).then(|| "/srv/calc".into()));
        assert_eq!(config.storage_root, PathBuf::from("/srv/calc"));
    }

    #[test]
    fn empty_override_is_ignored() {
        let config = Config::from_vars(|_| Some(OsString::new()));
        assert_eq!(config.storage_root, default_storage_root());
    }

    #[test]
    fn default_root_ends_in_the_app_directory() {
        let config = Config::from_vars(|_| None);
        if let Some(dirs) = BaseDirs::new() {
            assert_eq!(config.storage_root, dirs.config_dir().join(APP_DIR));
        }
    }

    #[test]
    fn explicit_root() {
        let config = Config::from_vars(|_| None).with_storage_root("profiles");
        assert_eq!(config.storage_root, PathBuf::from("profiles"));
    }
}

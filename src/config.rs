use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use cross_xdg::BaseDirs;
use serde::Deserialize;
use tracing::debug;

/// Default number of tape cells.
pub const TAPE_SIZE: usize = 32768;

/// Default maximum loop nesting depth.
pub const MAX_LOOP_DEPTH: usize = 512;

pub const TAPE_SIZE_ENV: &str = "BF_TAPE_SIZE";
pub const MAX_LOOP_DEPTH_ENV: &str = "BF_MAX_LOOP_DEPTH";
pub const CONFIG_PATH_ENV: &str = "BF_CONFIG";

const CONFIG_FILE_NAME: &str = "bf.toml";

/// Hard bounds for a run: tape length and loop nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub tape_size: usize,
    pub max_loop_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            tape_size: TAPE_SIZE,
            max_loop_depth: MAX_LOOP_DEPTH,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}' is not a non-negative integer")]
    InvalidEnv { var: &'static str, value: String },

    #[error("cannot read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("tape size must be at least 1 cell")]
    EmptyTape,
}

/// On-disk configuration, e.g.
///
/// ```toml
/// [limits]
/// tape_size = 65536
/// max_loop_depth = 1024
/// ```
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub limits: FileLimits,
}

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileLimits {
    pub tape_size: Option<usize>,
    pub max_loop_depth: Option<usize>,
}

impl ConfigFile {
    pub fn parse(path: &Path, text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `$BF_CONFIG` if set, otherwise from `bf.toml` in the XDG
    /// config home. Only a missing default file is silently skipped.
    pub fn load() -> Result<Self, ConfigError> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Self::load_from(Path::new(&path));
        }

        let Some(path) = default_config_path() else {
            return Ok(Self::default());
        };
        if !path.is_file() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(path, &text)?;
        debug!(path = %path.display(), ?config, "loaded config file");
        Ok(config)
    }
}

fn default_config_path() -> Option<PathBuf> {
    // ~/.config on Linux and macOS, %USERPROFILE%\.config on Windows
    let base_dirs = BaseDirs::new().ok()?;
    Some(base_dirs.config_home().join(CONFIG_FILE_NAME))
}

impl Limits {
    /// Resolve limits: flags -> env -> config file -> defaults.
    pub fn resolve(tape_size: Option<usize>, max_loop_depth: Option<usize>) -> Result<Self, ConfigError> {
        let file = ConfigFile::load()?;
        Self::layered(tape_size, max_loop_depth, |var| env::var(var).ok(), &file)
    }

    /// Same resolution as [`Limits::resolve`] with the environment and file
    /// supplied by the caller.
    pub fn layered<E>(
        tape_size: Option<usize>,
        max_loop_depth: Option<usize>,
        env_lookup: E,
        file: &ConfigFile,
    ) -> Result<Self, ConfigError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let tape_size = match tape_size {
            Some(n) => n,
            None => env_usize(&env_lookup, TAPE_SIZE_ENV)?
                .or(file.limits.tape_size)
                .unwrap_or(defaults.tape_size),
        };
        let max_loop_depth = match max_loop_depth {
            Some(n) => n,
            None => env_usize(&env_lookup, MAX_LOOP_DEPTH_ENV)?
                .or(file.limits.max_loop_depth)
                .unwrap_or(defaults.max_loop_depth),
        };

        if tape_size == 0 {
            return Err(ConfigError::EmptyTape);
        }

        Ok(Self { tape_size, max_loop_depth })
    }
}

fn env_usize<E>(env_lookup: &E, var: &'static str) -> Result<Option<usize>, ConfigError>
where
    E: Fn(&str) -> Option<String>,
{
    let Some(value) = env_lookup(var) else {
        return Ok(None);
    };
    value
        .trim()
        .parse::<usize>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidEnv { var, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn file_with(tape_size: Option<usize>, max_loop_depth: Option<usize>) -> ConfigFile {
        ConfigFile {
            limits: FileLimits { tape_size, max_loop_depth },
        }
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let limits = Limits::layered(None, None, env_from(&[]), &ConfigFile::default()).unwrap();
        assert_eq!(limits, Limits { tape_size: 32768, max_loop_depth: 512 });
    }

    #[test]
    fn flags_override_env_and_file() {
        let env = env_from(&[(TAPE_SIZE_ENV, "10"), (MAX_LOOP_DEPTH_ENV, "20")]);
        let file = file_with(Some(30), Some(40));
        let limits = Limits::layered(Some(1), Some(2), env, &file).unwrap();
        assert_eq!(limits, Limits { tape_size: 1, max_loop_depth: 2 });
    }

    #[test]
    fn env_overrides_file() {
        let env = env_from(&[(TAPE_SIZE_ENV, " 10 ")]);
        let file = file_with(Some(30), Some(40));
        let limits = Limits::layered(None, None, env, &file).unwrap();
        assert_eq!(limits, Limits { tape_size: 10, max_loop_depth: 40 });
    }

    #[test]
    fn bad_env_value_is_rejected() {
        let env = env_from(&[(MAX_LOOP_DEPTH_ENV, "deep")]);
        let err = Limits::layered(None, None, env, &ConfigFile::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: MAX_LOOP_DEPTH_ENV, .. }));
        assert!(err.to_string().contains("deep"));
    }

    #[test]
    fn zero_tape_is_rejected() {
        let err = Limits::layered(Some(0), None, env_from(&[]), &ConfigFile::default()).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyTape));
    }

    #[test]
    fn zero_depth_is_allowed() {
        let limits = Limits::layered(None, Some(0), env_from(&[]), &ConfigFile::default()).unwrap();
        assert_eq!(limits.max_loop_depth, 0);
    }

    #[test]
    fn parses_limits_section() {
        let text = "[limits]\ntape_size = 100\n";
        let file = ConfigFile::parse(Path::new("bf.toml"), text).unwrap();
        assert_eq!(file, file_with(Some(100), None));
    }

    #[test]
    fn empty_file_is_default() {
        let file = ConfigFile::parse(Path::new("bf.toml"), "").unwrap();
        assert_eq!(file, ConfigFile::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let text = "[limits]\ntape_len = 100\n";
        let err = ConfigFile::parse(Path::new("bf.toml"), text).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bf.toml"));
    }

    #[test]
    fn negative_values_are_rejected() {
        let text = "[limits]\nmax_loop_depth = -1\n";
        assert!(ConfigFile::parse(Path::new("bf.toml"), text).is_err());
    }

    #[test]
    fn load_from_reads_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bf.toml");
        fs::write(&path, "[limits]\nmax_loop_depth = 8\n").unwrap();
        let file = ConfigFile::load_from(&path).unwrap();
        assert_eq!(file.limits.max_loop_depth, Some(8));

        let missing = dir.path().join("missing.toml");
        assert!(matches!(ConfigFile::load_from(&missing), Err(ConfigError::Read { .. })));
    }
}

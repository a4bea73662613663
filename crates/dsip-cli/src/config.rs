//! Runtime configuration for the CLI.

use std::path::PathBuf;

/// Environment variable naming the default LUT directory.
pub const LUT_DIR_ENV: &str = "DSIP_LUT_DIR";
/// Environment variable naming the default grain plate directory.
pub const GRAIN_DIR_ENV: &str = "DSIP_GRAIN_DIR";
/// Environment variable overriding the worker thread count.
pub const THREADS_ENV: &str = "DSIP_THREADS";

/// Defaults the command line falls back to when a flag is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Directory of LUT images, indexed by the profile's `lut_file_index`.
    pub lut_dir: Option<PathBuf>,
    /// Directory of grain plates to pick from.
    pub grain_dir: Option<PathBuf>,
    /// Worker threads for the pixel loop (0 = rayon's default).
    pub threads: usize,
}

impl CliConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup. Empty values
    /// count as unset; an unparsable thread count falls back to 0.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v: &String| !v.trim().is_empty());
        Self {
            lut_dir: non_empty(LUT_DIR_ENV).map(PathBuf::from),
            grain_dir: non_empty(GRAIN_DIR_ENV).map(PathBuf::from),
            threads: non_empty(THREADS_ENV)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_empty_environment_is_default() {
        assert_eq!(CliConfig::from_lookup(|_| None), CliConfig::default());
    }

    #[test]
    fn test_reads_every_variable() {
        let config = CliConfig::from_lookup(lookup(&[
            (LUT_DIR_ENV, "/looks"),
            (GRAIN_DIR_ENV, "/grain"),
            (THREADS_ENV, " 6 "),
        ]));
        assert_eq!(config.lut_dir, Some(PathBuf::from("/looks")));
        assert_eq!(config.grain_dir, Some(PathBuf::from("/grain")));
        assert_eq!(config.threads, 6);
    }

    #[test]
    fn test_blank_and_invalid_values_are_ignored() {
        let config = CliConfig::from_lookup(lookup(&[
            (LUT_DIR_ENV, "  "),
            (THREADS_ENV, "many"),
        ]));
        assert_eq!(config.lut_dir, None);
        assert_eq!(config.threads, 0);
    }
}

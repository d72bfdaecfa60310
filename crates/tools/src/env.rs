//! Environment sources for the configuration loader
//!
//! The loader never calls `std::env` itself. Callers hand it an
//! [`EnvSource`], usually an [`EnvSnapshot`] captured once at startup, so tests
//! can supply synthetic environments without mutating process state.

use crate::config::ConfigError;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::debug;

/// Read-only, string-keyed view of an environment
pub trait EnvSource {
    /// Look up a variable, `None` if unset
    fn var(&self, key: &str) -> Option<String>;
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Owned copy of an environment taken at a single point in time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the current process environment
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn from_process() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        EnvSnapshot { vars }
    }

    /// Overlay a dotenv file onto this snapshot
    ///
    /// Keys already present in the snapshot keep their value, matching how
    /// dotenv never overrides variables set by the parent process. A missing
    /// file leaves the snapshot unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Dotenv`] if the file exists but cannot be read
    /// or contains a malformed line.
    pub fn with_dotenv_file(mut self, path: &Path) -> Result<Self, ConfigError> {
        let iter = match dotenvy::from_path_iter(path) {
            Ok(iter) => iter,
            Err(err) if err.not_found() => {
                debug!("No dotenv file at {:?}", path);
                return Ok(self);
            }
            Err(err) => return Err(ConfigError::Dotenv(err)),
        };

        let mut added = 0usize;
        for item in iter {
            let (key, value) = item?;
            if !self.vars.contains_key(&key) {
                self.vars.insert(key, value);
                added += 1;
            }
        }
        debug!("Loaded {} variable(s) from {:?}", added, path);

        Ok(self)
    }

    /// Number of captured variables
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether no variables were captured
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl EnvSource for EnvSnapshot {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

impl<K, V> FromIterator<(K, V)> for EnvSnapshot
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        EnvSnapshot {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_snapshot_from_iter() {
        let env: EnvSnapshot = [("A", "1"), ("B", "2")].into_iter().collect();
        assert_eq!(env.var("A").as_deref(), Some("1"));
        assert_eq!(env.var("C"), None);
        assert_eq!(env.len(), 2);
    }

    #[test]
    fn test_hash_map_source() {
        let mut map = HashMap::new();
        map.insert("KEY".to_string(), "value".to_string());
        assert_eq!(map.var("KEY").as_deref(), Some("value"));
        assert_eq!(map.var("OTHER"), None);
    }

    #[test]
    fn test_dotenv_fills_missing_keys_only() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "SEPOLIA_API_URL=https://from-file.example").unwrap();
        writeln!(file, "AMOY_API_URL=https://amoy-from-file.example").unwrap();

        let env: EnvSnapshot = [("SEPOLIA_API_URL", "https://from-process.example")]
            .into_iter()
            .collect();
        let env = env.with_dotenv_file(file.path()).unwrap();

        assert_eq!(
            env.var("SEPOLIA_API_URL").as_deref(),
            Some("https://from-process.example")
        );
        assert_eq!(
            env.var("AMOY_API_URL").as_deref(),
            Some("https://amoy-from-file.example")
        );
    }

    #[test]
    fn test_missing_dotenv_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let env = EnvSnapshot::default()
            .with_dotenv_file(&dir.path().join(".env"))
            .unwrap();
        assert!(env.is_empty());
    }

    #[test]
    fn test_malformed_dotenv_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "NOT A VALID LINE").unwrap();

        let result = EnvSnapshot::default().with_dotenv_file(file.path());
        assert!(matches!(result, Err(ConfigError::Dotenv(_))));
    }
}

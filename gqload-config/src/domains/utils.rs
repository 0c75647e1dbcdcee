//! Utility functions and helpers for configuration

use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, ConfigResult};

/// Serde helper module for Duration serialization as seconds
pub mod serde_duration {
    use super::*;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(seconds))
    }
}

/// Default functions for serde
pub fn default_true() -> bool {
    true
}

pub fn default_false() -> bool {
    false
}

/// Resolve `path` against the directory of the config file it was declared in.
pub fn resolve_relative(path: &Path, base_dir: Option<&Path>) -> PathBuf {
    match base_dir {
        Some(base) if path.is_relative() => base.join(path),
        _ => path.to_path_buf(),
    }
}

/// Read a JSON array of scalars or objects and pull out one string per entry.
///
/// Accepts `["a", 1]` as well as `[{"<key>": "a"}, {"<key>": 1}]`; numeric
/// values are stringified.
pub fn read_string_entries(path: &Path, key: &str) -> ConfigResult<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    let value: JsonValue = serde_json::from_str(&content)?;

    let data_error = |message: String| ConfigError::DataFileError {
        path: path.to_path_buf(),
        message,
    };

    let JsonValue::Array(items) = value else {
        return Err(data_error("expected a JSON array".to_string()));
    };

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let scalar = match item {
                JsonValue::Object(map) => map
                    .get(key)
                    .ok_or_else(|| data_error(format!("entry {} has no '{}' field", idx, key)))?,
                other => other,
            };
            match scalar {
                JsonValue::String(s) => Ok(s.clone()),
                JsonValue::Number(n) => Ok(n.to_string()),
                other => Err(data_error(format!("entry {} has unsupported value {}", idx, other))),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_string_entries_objects_and_scalars() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": 12}}, {{"id": "34"}}, 56, "78"]"#).unwrap();

        let ids = read_string_entries(file.path(), "id").unwrap();
        assert_eq!(ids, vec!["12", "34", "56", "78"]);
    }

    #[test]
    fn test_read_string_entries_rejects_missing_key() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"token": "abc"}}]"#).unwrap();

        let err = read_string_entries(file.path(), "id").unwrap_err();
        assert!(matches!(err, ConfigError::DataFileError { .. }));
    }

    #[test]
    fn test_read_string_entries_rejects_non_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"id": 1}}"#).unwrap();

        assert!(read_string_entries(file.path(), "id").is_err());
    }

    #[test]
    fn test_resolve_relative() {
        let base = Path::new("/etc/gqload");
        assert_eq!(
            resolve_relative(Path::new("tokens.json"), Some(base)),
            PathBuf::from("/etc/gqload/tokens.json")
        );
        assert_eq!(
            resolve_relative(Path::new("/data/tokens.json"), Some(base)),
            PathBuf::from("/data/tokens.json")
        );
        assert_eq!(
            resolve_relative(Path::new("tokens.json"), None),
            PathBuf::from("tokens.json")
        );
    }
}

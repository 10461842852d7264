//! Developer profile stored in `~/.devutils`.
//!
//! The file is pretty-printed JSON with a trailing newline:
//!
//! ```json
//! {
//!   "user": { "name": "Ada", "email": "ada@example.com" },
//!   "created": "2024-01-15T10:00:00.000Z",
//!   "updated": "2024-01-15T10:00:00.000Z"
//! }
//! ```
//!
//! `created` is written once; `updated` changes on every save.  Keys this
//! version does not know about are kept as-is.
pub mod git_config;
pub mod validation;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the profile in the home directory.
pub const FILE_NAME: &str = ".devutils";

/// User identity fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Personal or company URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Contents of `~/.devutils`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevConfig {
    /// Who this machine belongs to.
    pub user: UserProfile,
    /// First save, ISO-8601 UTC.
    pub created: String,
    /// Last save, ISO-8601 UTC.
    pub updated: String,
    /// Unrecognised keys, preserved across saves.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DevConfig {
    /// Build the config to save from the previous one (if any) and new user
    /// fields.
    ///
    /// `created` is carried over from `existing`; `updated` is `now`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a user field fails validation.
    pub fn apply_user(
        existing: Option<&Self>,
        user: UserProfile,
        now: DateTime<Utc>,
    ) -> Result<Self, ConfigError> {
        let user = validation::normalize_user(user)?;
        let stamp = timestamp(now);
        Ok(Self {
            user,
            created: existing.map_or_else(|| stamp.clone(), |c| c.created.clone()),
            updated: stamp,
            extra: existing.map(|c| c.extra.clone()).unwrap_or_default(),
        })
    }
}

/// `$HOME/.devutils`.
#[must_use]
pub fn config_path(home: &Path) -> PathBuf {
    home.join(FILE_NAME)
}

/// ISO-8601 UTC with millisecond precision (`2024-01-15T10:00:00.000Z`).
#[must_use]
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Load the profile; `Ok(None)` when the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::Parse`] if it is not a valid profile.
pub fn load(path: &Path) -> Result<Option<DevConfig>, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Write the profile as pretty-printed JSON with a trailing newline.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be written.
pub fn save(path: &Path, config: &DevConfig) -> Result<(), ConfigError> {
    let mut text = serde_json::to_string_pretty(config).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    text.push('\n');
    fs::write(path, text).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().unwrap()
    }

    fn ada() -> UserProfile {
        UserProfile {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            url: None,
        }
    }

    #[test]
    fn timestamp_has_milliseconds() {
        assert_eq!(timestamp(at(1_705_312_800)), "2024-01-15T10:00:00.000Z");
    }

    #[test]
    fn load_missing_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(load(&config_path(tmp.path())).unwrap(), None);
    }

    #[test]
    fn save_then_load_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let path = config_path(tmp.path());
        let cfg = DevConfig::apply_user(None, ada(), at(1_705_312_800)).unwrap();
        save(&path, &cfg).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("}\n"));
        assert!(text.contains("\n  \"user\": {"), "two-space indent: {text}");
        assert!(!text.contains("url"), "absent url is omitted");
        assert_eq!(load(&path).unwrap(), Some(cfg));
    }

    #[test]
    fn created_is_preserved_and_updated_refreshed() {
        let first = DevConfig::apply_user(None, ada(), at(1_705_312_800)).unwrap();
        assert_eq!(first.created, first.updated);

        let mut changed = ada();
        changed.url = Some("https://ada.dev".to_string());
        let second = DevConfig::apply_user(Some(&first), changed, at(1_705_399_200)).unwrap();
        assert_eq!(second.created, "2024-01-15T10:00:00.000Z");
        assert_eq!(second.updated, "2024-01-16T10:00:00.000Z");
        assert_eq!(second.user.url.as_deref(), Some("https://ada.dev"));
    }

    #[test]
    fn unknown_keys_survive_a_save() {
        let tmp = tempfile::tempdir().unwrap();
        let path = config_path(tmp.path());
        fs::write(
            &path,
            r#"{"user":{"name":"Ada","email":"a@b.c"},"created":"2023-01-01T00:00:00.000Z","updated":"2023-01-01T00:00:00.000Z","theme":"dark"}"#,
        )
        .unwrap();
        let existing = load(&path).unwrap().unwrap();
        let next = DevConfig::apply_user(Some(&existing), ada(), at(1_705_312_800)).unwrap();
        save(&path, &next).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("\"theme\": \"dark\""));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = config_path(tmp.path());
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load(&path).unwrap_err(), ConfigError::Parse { .. }));
    }
}

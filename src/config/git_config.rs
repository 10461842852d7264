//! Identity defaults from the user's git configuration.
use git2::Config;

/// `user.name` / `user.email` from git, used as prompt defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitIdentity {
    /// `user.name`, if set.
    pub name: Option<String>,
    /// `user.email`, if set.
    pub email: Option<String>,
}

/// Read the identity from the global/system git configuration.
///
/// Missing configuration is not an error; the fields are simply `None`.
#[must_use]
pub fn identity() -> GitIdentity {
    Config::open_default()
        .map(|cfg| identity_from(&cfg))
        .unwrap_or_default()
}

/// Read the identity from an opened git configuration.
#[must_use]
pub fn identity_from(config: &Config) -> GitIdentity {
    let get = |key: &str| {
        config
            .get_string(key)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
    GitIdentity {
        name: get("user.name"),
        email: get("user.email"),
    }
}

//! Credential loading from the environment.
//!
//! Credentials and identifiers come from four `TITANTV_*` environment
//! variables, optionally seeded from a `.env` file. Missing variables are
//! reported together in a single error rather than one at a time.

use thiserror::Error;

/// Environment variable holding the account login name.
pub const ENV_USERNAME: &str = "TITANTV_USERNAME";
/// Environment variable holding the account password.
pub const ENV_PASSWORD: &str = "TITANTV_PASSWORD";
/// Environment variable holding the provider user id (a UUID).
pub const ENV_USER_ID: &str = "TITANTV_USER_ID";
/// Environment variable holding the lineup id (a UUID).
pub const ENV_LINEUP_ID: &str = "TITANTV_LINEUP_ID";

/// Errors raised while loading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// One or more required environment variables are unset or empty.
    #[error(
        "missing required environment variables: {names}\n  Suggestion: set them in the environment or in a .env file"
    )]
    MissingVars {
        /// Comma-separated list of the missing variable names.
        names: String,
    },
}

/// Account credentials and provider identifiers for the listings API.
///
/// Values are plain strings threaded explicitly into the client; nothing
/// here is global state.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Login name for the `POST /api/login` request.
    pub username: String,
    /// Password for the `POST /api/login` request.
    pub password: String,
    /// Provider-side user id, used in every endpoint path.
    pub user_id: String,
    /// Lineup id, used in the channel and schedule endpoint paths.
    pub lineup_id: String,
}

impl Credentials {
    /// Loads credentials from the process environment.
    ///
    /// A `.env` file in the working directory is loaded first when present;
    /// real environment variables take precedence over file entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVars`] naming every variable that is
    /// unset or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads credentials through an arbitrary lookup function.
    ///
    /// Empty values count as missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVars`] naming every variable for which
    /// the lookup returned nothing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut get = |name: &'static str| match lookup(name) {
            Some(value) if !value.trim().is_empty() => value,
            _ => {
                missing.push(name);
                String::new()
            }
        };

        let credentials = Self {
            username: get(ENV_USERNAME),
            password: get(ENV_PASSWORD),
            user_id: get(ENV_USER_ID),
            lineup_id: get(ENV_LINEUP_ID),
        };

        if missing.is_empty() {
            Ok(credentials)
        } else {
            Err(ConfigError::MissingVars {
                names: missing.join(", "),
            })
        }
    }
}

//! Session cookie settings read from the environment.
//!
//! Release builds insist on every toggle being present and valid. Debug
//! builds fall back to safe defaults with a warning so a fresh checkout runs
//! without any secrets in place.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

pub mod fingerprint;

pub const KEY_FILE_ENV: &str = "TRACKER_SESSION_KEY_FILE";
pub const COOKIE_SECURE_ENV: &str = "TRACKER_SESSION_COOKIE_SECURE";
pub const SAMESITE_ENV: &str = "TRACKER_SESSION_SAMESITE";
pub const ALLOW_EPHEMERAL_ENV: &str = "TRACKER_SESSION_ALLOW_EPHEMERAL";

const KEY_FILE_DEFAULT: &str = "/var/run/secrets/tracker_session_key";
/// Minimum key file length accepted by release builds.
pub const SESSION_KEY_MIN_LEN: usize = 64;
// `Key::derive_from` panics below 256 bits of input.
const DERIVE_MIN_LEN: usize = 32;
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Whether configuration gaps are tolerated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    /// Mode matching `cfg!(debug_assertions)`.
    ///
    /// # Examples
    /// ```
    /// use tracker::inbound::http::session_config::BuildMode;
    ///
    /// let expected = if cfg!(debug_assertions) { BuildMode::Debug } else { BuildMode::Release };
    /// assert_eq!(BuildMode::from_debug_assertions(), expected);
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Resolved cookie-session settings.
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

impl SessionSettings {
    /// Short fingerprint of the signing key, safe to log.
    pub fn fingerprint(&self) -> String {
        fingerprint::key_fingerprint(&self.key)
    }
}

/// Configuration problems that stop the server from starting.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("{name} must be set")]
    MissingEnv { name: &'static str },
    #[error("{name}='{value}' is not valid; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("cannot read session key {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key {path} holds {length} bytes; at least {min_len} are required")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("TRACKER_SESSION_SAMESITE=None needs TRACKER_SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    #[error("TRACKER_SESSION_ALLOW_EPHEMERAL must be disabled in release builds")]
    EphemeralNotAllowed,
}

/// Resolve session settings for `mode`.
///
/// # Examples
/// ```
/// use mockable::MockEnv;
/// use tracker::inbound::http::session_config::{BuildMode, session_settings_from_env};
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|_| None);
///
/// let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");
/// assert!(settings.cookie_secure);
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = toggle(
        env,
        mode,
        Toggle::new(COOKIE_SECURE_ENV, BOOL_EXPECTED, true),
        parse_bool,
    )?;
    let same_site = toggle(
        env,
        mode,
        Toggle::new(SAMESITE_ENV, SAMESITE_EXPECTED, SameSite::Lax),
        parse_same_site,
    )?;
    if same_site == SameSite::None && !cookie_secure {
        if !mode.is_debug() {
            return Err(SessionConfigError::InsecureSameSiteNone);
        }
        warn!("SameSite=None on an insecure cookie; browsers will drop it");
    }
    let allow_ephemeral = toggle(
        env,
        mode,
        Toggle::new(ALLOW_EPHEMERAL_ENV, BOOL_EXPECTED, false),
        parse_bool,
    )?;
    if allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let key = load_key(env, mode, allow_ephemeral)?;
    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

struct Toggle<T> {
    name: &'static str,
    expected: &'static str,
    debug_default: T,
}

impl<T> Toggle<T> {
    const fn new(name: &'static str, expected: &'static str, debug_default: T) -> Self {
        Self {
            name,
            expected,
            debug_default,
        }
    }
}

/// Read one variable: release builds reject absent or unparsable values,
/// debug builds substitute the default.
fn toggle<E, T>(
    env: &E,
    mode: BuildMode,
    setting: Toggle<T>,
    parse: fn(&str) -> Option<T>,
) -> Result<T, SessionConfigError>
where
    E: Env,
{
    let Some(value) = env.string(setting.name) else {
        if mode.is_debug() {
            warn!(name = setting.name, "session toggle not set; using debug default");
            return Ok(setting.debug_default);
        }
        return Err(SessionConfigError::MissingEnv { name: setting.name });
    };
    match parse(value.trim()) {
        Some(parsed) => Ok(parsed),
        None if mode.is_debug() => {
            warn!(name = setting.name, %value, "invalid session toggle; using debug default");
            Ok(setting.debug_default)
        }
        None => Err(SessionConfigError::InvalidEnv {
            name: setting.name,
            value,
            expected: setting.expected,
        }),
    }
}

fn load_key<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| KEY_FILE_DEFAULT.to_owned()),
    );
    let mut bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(source) if mode.is_debug() || allow_ephemeral => {
            warn!(path = %path.display(), error = %source, "generating throwaway session key");
            return Ok(Key::generate());
        }
        Err(source) => return Err(SessionConfigError::KeyRead { path, source }),
    };
    let length = bytes.len();
    let min_len = if mode.is_debug() {
        DERIVE_MIN_LEN
    } else {
        SESSION_KEY_MIN_LEN
    };
    let result = if length < min_len {
        Err(SessionConfigError::KeyTooShort {
            path,
            length,
            min_len,
        })
    } else {
        Ok(Key::derive_from(&bytes))
    };
    bytes.zeroize();
    result
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

fn parse_same_site(value: &str) -> Option<SameSite> {
    match value.to_ascii_lowercase().as_str() {
        "strict" => Some(SameSite::Strict),
        "lax" => Some(SameSite::Lax),
        "none" => Some(SameSite::None),
        _ => None,
    }
}

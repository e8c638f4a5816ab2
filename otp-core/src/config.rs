use crate::error::OtpError;
use crate::frame::DEFAULT_MAX_FRAME_LEN;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

/// Environment variable naming a daemon configuration file.
pub const CONFIG_ENV_VAR: &str = "OTP_DAEMON_CONFIG";

/// Sessions a daemon serves at once unless configured otherwise.
pub const DEFAULT_MAX_SESSIONS: usize = 5;

/// Listen backlog unless configured otherwise.
pub const DEFAULT_BACKLOG: u32 = 5;

/// Tunables for a listening daemon, loaded from a JSON file.
///
/// Every field is optional in the file; missing fields take their defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DaemonConfig {
    /// Address the listening socket binds to.
    pub bind_address: IpAddr,
    /// Maximum number of sessions being served concurrently.
    pub max_sessions: usize,
    /// Kernel backlog for connections waiting to be accepted.
    pub backlog: u32,
    /// Largest request frame a session accepts, in bytes.
    pub max_frame_len: usize,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            max_sessions: DEFAULT_MAX_SESSIONS,
            backlog: DEFAULT_BACKLOG,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
        }
    }
}

impl DaemonConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`OtpError::FileIo`] if the file cannot be read and
    /// [`OtpError::Config`] if it does not parse or holds unusable values.
    pub fn load(path: &Path) -> Result<Self, OtpError> {
        let text = fs::read_to_string(path).map_err(|source| OtpError::FileIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|e| OtpError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate(path)?;
        Ok(config)
    }

    /// Loads the file at `path` if given, else the file named by
    /// [`CONFIG_ENV_VAR`], else the defaults.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`DaemonConfig::load`].
    pub fn resolve(path: Option<&Path>) -> Result<Self, OtpError> {
        match path {
            Some(path) => Self::load(path),
            None => match env::var_os(CONFIG_ENV_VAR) {
                Some(value) if !value.is_empty() => Self::load(&PathBuf::from(value)),
                _ => Ok(Self::default()),
            },
        }
    }

    fn validate(&self, path: &Path) -> Result<(), OtpError> {
        if self.max_sessions == 0 {
            return Err(OtpError::Config {
                path: path.to_path_buf(),
                message: "max_sessions must be at least 1".into(),
            });
        }
        Ok(())
    }
}

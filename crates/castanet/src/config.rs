use std::net::Ipv4Addr;

#[cfg(feature = "tracing")]
use tracing::debug;

use crate::{DEFAULT_COOKIE_LIFETIME, Error, Result};

/// Default cookie name.
pub const DEFAULT_COOKIE_NAME: &str = "uid";

/// Default cookie path.
pub const DEFAULT_COOKIE_PATH: &str = "/";

/// Every key [`UidConfig::set`] understands. `start_value` is also accepted
/// as `startValue`.
pub const RECOGNIZED_KEYS: [&str; 8] = [
    "name",
    "domain",
    "p3p",
    "path",
    "expires",
    "service",
    "timestamp",
    "start_value",
];

/// How [`UidConfig::set`] treats keys outside [`RECOGNIZED_KEYS`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ConfigPolicy {
    /// Silently ignore unknown keys. This is the historical behavior and the
    /// default, kept so existing configuration files continue to load.
    #[default]
    Permissive,
    /// Reject unknown keys with [`Error::UnknownConfigKey`].
    Strict,
}

/// Cookie and identifier settings.
///
/// The `service`, `timestamp` and `start_value` fields override the values
/// normally derived from the request context. They are meant for tests and
/// for pinning a server identity.
///
/// # Example
///
/// ```
/// use castanet::UidConfig;
///
/// let mut config = UidConfig::default();
/// config
///     .set("name", "castanet")?
///     .set("service", "10.0.0.7")?
///     .set("favourite_colour", "teal")?; // ignored
///
/// assert_eq!(config.name, "castanet");
/// assert_eq!(config.service, Some(0x0A00_0007));
/// # Ok::<(), castanet::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct UidConfig {
    /// Cookie name.
    pub name: String,
    /// Cookie domain. `None` leaves the attribute out.
    pub domain: Option<String>,
    /// Whether a P3P compact-policy header accompanies the cookie.
    pub p3p: bool,
    /// Cookie path.
    pub path: String,
    /// Absolute expiry in seconds since the UNIX epoch. `None` means one year
    /// after issuance.
    pub expires: Option<u64>,
    /// Fixed service id for fresh identifiers.
    pub service: Option<u32>,
    /// Fixed timestamp for fresh identifiers.
    pub timestamp: Option<u32>,
    /// Fixed start value for fresh identifiers.
    #[cfg_attr(feature = "serde", serde(alias = "start_value"))]
    pub start_value: Option<u32>,
    /// Unknown-key policy. Not itself a configuration key.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub policy: ConfigPolicy,
}

impl Default for UidConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_COOKIE_NAME.to_owned(),
            domain: None,
            p3p: false,
            path: DEFAULT_COOKIE_PATH.to_owned(),
            expires: None,
            service: None,
            timestamp: None,
            start_value: None,
            policy: ConfigPolicy::Permissive,
        }
    }
}

impl UidConfig {
    /// Default settings that reject unknown keys.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            policy: ConfigPolicy::Strict,
            ..Self::default()
        }
    }

    /// Replaces the unknown-key policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ConfigPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets a single option from its textual form.
    ///
    /// `service` accepts a dotted IPv4 address or a decimal integer. `domain`
    /// is cleared by an empty value. `p3p` accepts `true`/`false`, `on`/`off`
    /// and `1`/`0`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfigValue`] if a recognized key gets a value it
    ///   cannot hold. The config is left unchanged.
    /// - [`Error::UnknownConfigKey`] for an unknown key under
    ///   [`ConfigPolicy::Strict`]. Under [`ConfigPolicy::Permissive`] unknown
    ///   keys are ignored.
    pub fn set(&mut self, key: &str, value: &str) -> Result<&mut Self> {
        match key {
            "name" => self.name = value.to_owned(),
            "domain" => {
                self.domain = (!value.is_empty()).then(|| value.to_owned());
            }
            "p3p" => self.p3p = parse_flag("p3p", value)?,
            "path" => self.path = value.to_owned(),
            "expires" => self.expires = Some(parse_number("expires", value)?),
            "service" => self.service = Some(parse_service_id(value)?),
            "timestamp" => self.timestamp = Some(parse_number("timestamp", value)?),
            "start_value" | "startValue" => {
                self.start_value = Some(parse_number("start_value", value)?);
            }
            _ => match self.policy {
                ConfigPolicy::Permissive => {
                    #[cfg(feature = "tracing")]
                    debug!(key, "ignoring unknown configuration key");
                }
                ConfigPolicy::Strict => {
                    return Err(Error::UnknownConfigKey {
                        key: key.to_owned(),
                    });
                }
            },
        }
        Ok(self)
    }

    /// Applies several options in order, stopping at the first error.
    ///
    /// # Errors
    ///
    /// See [`UidConfig::set`].
    pub fn set_all<I, K, V>(&mut self, options: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in options {
            self.set(key.as_ref(), value.as_ref())?;
        }
        Ok(self)
    }

    /// Returns the textual value of a recognized option.
    ///
    /// Unknown keys and unset optional values return `None`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "name" => Some(self.name.clone()),
            "domain" => self.domain.clone(),
            "p3p" => Some(self.p3p.to_string()),
            "path" => Some(self.path.clone()),
            "expires" => self.expires.map(|v| v.to_string()),
            "service" => self.service.map(|v| v.to_string()),
            "timestamp" => self.timestamp.map(|v| v.to_string()),
            "start_value" | "startValue" => self.start_value.map(|v| v.to_string()),
            _ => None,
        }
    }

    /// Resolves the cookie expiry for a cookie issued at `now` (seconds since
    /// the UNIX epoch).
    #[must_use]
    pub fn expires_at(&self, now: u64) -> u64 {
        self.expires
            .unwrap_or_else(|| now.saturating_add(DEFAULT_COOKIE_LIFETIME.as_secs()))
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" | "" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

fn parse_number<T: core::str::FromStr>(key: &'static str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| invalid(key, value))
}

/// Parses a service id from a dotted IPv4 address or a decimal integer.
///
/// # Errors
///
/// Returns [`Error::InvalidConfigValue`] for the `service` key if `value` is
/// neither.
///
/// # Example
///
/// ```
/// use castanet::parse_service_id;
///
/// assert_eq!(parse_service_id("127.0.0.1")?, 0x7F00_0001);
/// assert_eq!(parse_service_id("42")?, 42);
/// assert!(parse_service_id("localhost").is_err());
/// # Ok::<(), castanet::Error>(())
/// ```
pub fn parse_service_id(value: &str) -> Result<u32> {
    let value = value.trim();
    value
        .parse::<Ipv4Addr>()
        .map(u32::from)
        .or_else(|_| value.parse::<u32>())
        .map_err(|_| invalid("service", value))
}

fn invalid(key: &'static str, value: &str) -> Error {
    Error::InvalidConfigValue {
        key,
        value: value.to_owned(),
    }
}

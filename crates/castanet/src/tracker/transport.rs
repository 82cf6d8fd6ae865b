use chrono::{DateTime, Utc};
use core::fmt;
use std::collections::HashMap;

/// Compact P3P policy sent alongside the cookie when `p3p` is enabled.
pub const DEFAULT_P3P_POLICY: &str = r#"CP="CUR ADM OUR NOR STA NID""#;

/// Reads incoming cookies and emits outgoing ones for the current request.
pub trait CookieTransport {
    /// Returns the raw value of the cookie called `name`, if the client sent
    /// one.
    fn read_incoming(&self, name: &str) -> Option<String>;

    /// Queues a cookie to be sent with the response.
    fn write_outgoing(&mut self, cookie: SetCookie);
}

/// A cookie to be set on the client.
///
/// `Display` renders the value of a `Set-Cookie` header. The cookie value is
/// written raw (base64 is already cookie-safe), matching the web-server
/// modules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    /// Expiry in seconds since the UNIX epoch.
    pub expires_at: u64,
    pub path: String,
    pub domain: Option<String>,
    /// Whether a `P3P` header with [`DEFAULT_P3P_POLICY`] should accompany
    /// the cookie.
    pub p3p: bool,
}

impl SetCookie {
    /// The `P3P` header value to send, if enabled.
    #[must_use]
    pub fn p3p_header(&self) -> Option<&'static str> {
        self.p3p.then_some(DEFAULT_P3P_POLICY)
    }
}

impl fmt::Display for SetCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}; expires=", self.name, self.value)?;
        write_http_date(f, self.expires_at)?;
        write!(f, "; path={}", self.path)?;
        if let Some(domain) = &self.domain {
            write!(f, "; domain={domain}")?;
        }
        Ok(())
    }
}

/// Writes `secs` as an RFC 7231 IMF-fixdate, e.g.
/// `Thu, 01 Jan 1970 00:00:00 GMT`.
///
/// Instants past chrono's range are written as its maximum date.
fn write_http_date(f: &mut fmt::Formatter<'_>, secs: u64) -> fmt::Result {
    let date = i64::try_from(secs)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    write!(f, "{}", date.format("%a, %d %b %Y %H:%M:%S GMT"))
}

/// An in-memory transport, used by the CLI and in tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryTransport {
    incoming: HashMap<String, String>,
    outgoing: Vec<SetCookie>,
}

impl MemoryTransport {
    /// A transport with no incoming cookies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the value of a `Cookie` request header (`a=1; b=2`).
    ///
    /// Pairs without `=` are skipped. The first occurrence of a name wins.
    #[must_use]
    pub fn from_cookie_header(header: &str) -> Self {
        let mut transport = Self::new();
        for pair in header.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                transport
                    .incoming
                    .entry(name.trim().to_owned())
                    .or_insert_with(|| value.trim().to_owned());
            }
        }
        transport
    }

    /// Adds an incoming cookie.
    #[must_use]
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.incoming.insert(name.into(), value.into());
        self
    }

    /// Cookies written so far, in order.
    #[must_use]
    pub fn outgoing(&self) -> &[SetCookie] {
        &self.outgoing
    }
}

impl CookieTransport for MemoryTransport {
    fn read_incoming(&self, name: &str) -> Option<String> {
        self.incoming.get(name).cloned()
    }

    fn write_outgoing(&mut self, cookie: SetCookie) {
        self.outgoing.push(cookie);
    }
}

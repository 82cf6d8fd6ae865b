use anyhow::{Context, bail};
use castanet::{ConfigPolicy, DecodeFailurePolicy, LogFormatter, UidConfig};
use clap::{Parser, Subcommand};
use std::net::Ipv4Addr;

/// Command-line arguments for the `castanet` binary.
///
/// Cookie settings mirror the directives of the web-server modules. Each can
/// also be supplied through the environment (or a `.env` file).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "castanet",
    version,
    about = "Issue, decode and log mod_uid compatible tracking cookies"
)]
pub struct CliArgs {
    /// Name of the tracking cookie.
    ///
    /// Environment variable: `CASTANET_NAME`
    #[arg(long, env = "CASTANET_NAME", default_value_t = String::from(castanet::DEFAULT_COOKIE_NAME))]
    pub name: String,

    /// Domain attribute for issued cookies. Omitted when empty.
    ///
    /// Environment variable: `CASTANET_DOMAIN`
    #[arg(long, env = "CASTANET_DOMAIN", default_value_t = String::new())]
    pub domain: String,

    /// Path attribute for issued cookies.
    ///
    /// Environment variable: `CASTANET_PATH`
    #[arg(long, env = "CASTANET_PATH", default_value_t = String::from(castanet::DEFAULT_COOKIE_PATH))]
    pub path: String,

    /// Absolute cookie expiry in seconds since the UNIX epoch. Defaults to one
    /// year after issuance.
    ///
    /// Environment variable: `CASTANET_EXPIRES`
    #[arg(long, env = "CASTANET_EXPIRES")]
    pub expires: Option<String>,

    /// Send a compact P3P policy header alongside issued cookies.
    ///
    /// Environment variable: `CASTANET_P3P`
    #[arg(long, env = "CASTANET_P3P", default_value_t = false)]
    pub p3p: bool,

    /// Fixed service id for issued identifiers: a dotted IPv4 address or an
    /// integer.
    ///
    /// Environment variable: `CASTANET_SERVICE`
    #[arg(long, env = "CASTANET_SERVICE")]
    pub service: Option<String>,

    /// Fixed timestamp for issued identifiers.
    ///
    /// Environment variable: `CASTANET_TIMESTAMP`
    #[arg(long, env = "CASTANET_TIMESTAMP")]
    pub timestamp: Option<String>,

    /// Fixed start value for issued identifiers.
    ///
    /// Environment variable: `CASTANET_START_VALUE`
    #[arg(long, env = "CASTANET_START_VALUE")]
    pub start_value: Option<String>,

    /// Local address used as the service id when none is configured.
    ///
    /// Environment variable: `CASTANET_LOCAL_ADDRESS`
    #[arg(long, env = "CASTANET_LOCAL_ADDRESS")]
    pub local_address: Option<Ipv4Addr>,

    /// Extra `key=value` options, applied after the flags above. Repeatable.
    #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
    pub options: Vec<String>,

    /// Reject unknown `--option` keys instead of ignoring them.
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    /// Log values without per-field byte reversal.
    #[arg(long, default_value_t = false)]
    pub raw_log: bool,

    /// Fail on a malformed incoming cookie instead of replacing it.
    #[arg(long, default_value_t = false)]
    pub reject_malformed: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Issue fresh identifiers and print their cookie and log values.
    Issue {
        /// Number of identifiers to issue.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,

        /// Service id for this batch only: a dotted IPv4 address or an
        /// integer.
        #[arg(long, value_parser = castanet::parse_service_id)]
        service_hint: Option<u32>,

        /// Timestamp for this batch only.
        #[arg(long)]
        time_hint: Option<u32>,
    },
    /// Decode a cookie value and print its fields.
    Decode {
        /// The cookie value, e.g. `fwAAAWUAAAAAAAAAAwMDAg==`.
        cookie: String,
    },
    /// Print the log value of a cookie.
    Log {
        cookie: String,
    },
    /// Parse a 32-digit log value back into fields.
    ///
    /// Legacy values with a field in `00000001..=000000FF` are ambiguous and
    /// rejected. Use `--raw-log` for raw values.
    ParseLog {
        value: String,
    },
    /// Run one tracked request against a `Cookie` header.
    Track {
        /// Value of the incoming `Cookie` header. Omit for a first visit.
        #[arg(long, default_value_t = String::new())]
        cookie_header: String,
    },
}

/// Validated settings for one invocation.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub uid: UidConfig,
    pub local_address: Option<Ipv4Addr>,
    pub formatter: LogFormatter,
    pub on_decode_failure: DecodeFailurePolicy,
    pub command: Command,
}

impl TryFrom<CliArgs> for CliConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if let Command::Issue { count: 0, .. } = args.command {
            bail!("--count must be greater than 0");
        }

        let policy = if args.strict {
            ConfigPolicy::Strict
        } else {
            ConfigPolicy::Permissive
        };
        let mut uid = UidConfig::default().with_policy(policy);

        let p3p = args.p3p.to_string();
        let mut settings = vec![
            ("name", args.name.as_str()),
            ("domain", args.domain.as_str()),
            ("path", args.path.as_str()),
            ("p3p", p3p.as_str()),
        ];
        for (key, value) in [
            ("expires", &args.expires),
            ("service", &args.service),
            ("timestamp", &args.timestamp),
            ("start_value", &args.start_value),
        ] {
            if let Some(value) = value {
                settings.push((key, value.as_str()));
            }
        }
        uid.set_all(settings)?;

        for option in &args.options {
            let Some((key, value)) = option.split_once('=') else {
                bail!("option `{option}` is not of the form KEY=VALUE");
            };
            uid.set(key.trim(), value.trim())
                .with_context(|| format!("invalid option `{option}`"))?;
        }

        if uid.name.is_empty() {
            bail!("CASTANET_NAME must not be empty");
        }

        Ok(Self {
            uid,
            local_address: args.local_address,
            formatter: if args.raw_log {
                LogFormatter::raw()
            } else {
                LogFormatter::legacy()
            },
            on_decode_failure: if args.reject_malformed {
                DecodeFailurePolicy::Reject
            } else {
                DecodeFailurePolicy::Reissue
            },
            command: args.command,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<CliConfig> {
        let argv = std::iter::once("castanet").chain(args.iter().copied());
        CliConfig::try_from(CliArgs::try_parse_from(argv)?)
    }

    #[test]
    fn defaults_match_library_defaults() {
        let config = parse(&["issue"]).unwrap();
        assert_eq!(config.uid.name, castanet::DEFAULT_COOKIE_NAME);
        assert_eq!(config.uid.path, castanet::DEFAULT_COOKIE_PATH);
        assert_eq!(config.uid.domain, None);
        assert!(!config.uid.p3p);
        assert_eq!(config.formatter, LogFormatter::legacy());
        assert_eq!(config.on_decode_failure, DecodeFailurePolicy::Reissue);
        assert_eq!(
            config.command,
            Command::Issue {
                count: 1,
                service_hint: None,
                time_hint: None,
            }
        );
    }

    #[test]
    fn flags_become_config_values() {
        let config = parse(&[
            "--service",
            "10.0.0.7",
            "--domain",
            ".example.com",
            "--p3p",
            "--raw-log",
            "--reject-malformed",
            "decode",
            "AAAA",
        ])
        .unwrap();
        assert_eq!(config.uid.service, Some(0x0A00_0007));
        assert_eq!(config.uid.domain.as_deref(), Some(".example.com"));
        assert!(config.uid.p3p);
        assert_eq!(config.formatter, LogFormatter::raw());
        assert_eq!(config.on_decode_failure, DecodeFailurePolicy::Reject);
    }

    #[test]
    fn options_are_applied_after_flags() {
        let config =
            parse(&["--name", "a", "-o", "name=b", "-o", "startValue=5", "issue"]).unwrap();
        assert_eq!(config.uid.name, "b");
        assert_eq!(config.uid.start_value, Some(5));
    }

    #[test]
    fn unknown_option_depends_on_strictness() {
        assert!(parse(&["-o", "colour=teal", "issue"]).is_ok());
        assert!(parse(&["--strict", "-o", "colour=teal", "issue"]).is_err());
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(parse(&["--timestamp", "soon", "issue"]).is_err());
        assert!(parse(&["-o", "novalue", "issue"]).is_err());
        assert!(parse(&["issue", "--count", "0"]).is_err());
        assert!(parse(&["issue", "--service-hint", "localhost"]).is_err());
    }

    #[test]
    fn service_hint_accepts_address_or_integer() {
        for (hint, expected) in [("127.0.0.1", 0x7F00_0001), ("42", 42)] {
            let config = parse(&["issue", "--service-hint", hint]).unwrap();
            assert_eq!(
                config.command,
                Command::Issue {
                    count: 1,
                    service_hint: Some(expected),
                    time_hint: None,
                }
            );
        }
    }
}

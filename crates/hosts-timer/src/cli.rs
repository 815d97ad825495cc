//! Command line interface
//!
//! Flags are written Go-style with a single dash (`-disable`, `-time 1h`).
//! The double-dash forms work too.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use clap::{CommandFactory, Parser};

use crate::domain::{AliasSet, Domain};
use crate::duration::parse_duration;
use crate::error::UsageError;

const LONG_FLAGS: &[&str] = &[
    "disable",
    "install",
    "enable",
    "uninstall",
    "time",
    "hosts",
    "help",
    "version",
];

/// hosts-timer - block domains via the hosts file, or unblock them for a while
#[derive(Parser, Debug)]
#[command(name = "hosts-timer")]
#[command(about = "Block domains via the hosts file, or unblock them for a limited time")]
#[command(version)]
#[command(override_usage = "hosts-timer [OPTIONS] DOMAIN [DOMAIN] ...")]
#[command(args_override_self = true)]
#[command(after_help = r#"DOMAINS:
    Each domain is blocked together with its www. variant:
    'example.com' and 'www.example.com' are the same domain here.

EXAMPLES:
    hosts-timer -disable example.com          # block example.com
    hosts-timer -enable example.com           # unblock it indefinitely
    hosts-timer -time 15m example.com news.site
                                              # unblock for 15 minutes

TIMED SESSIONS:
    Access is re-blocked when the time is up, or as soon as the process
    receives SIGINT or SIGTERM (e.g. Ctrl-C).

EXIT STATUS:
    0  success
    1  usage error
    2  the hosts file could not be read or written
"#)]
pub struct Cli {
    /// Disable access to the domain(s). Cannot be used with -enable or -time
    #[arg(long)]
    pub disable: bool,

    /// Alias for -disable
    #[arg(long)]
    pub install: bool,

    /// (Re-)enable access to the domain(s) indefinitely. Cannot be used with -disable or -time
    #[arg(long)]
    pub enable: bool,

    /// Alias for -enable
    #[arg(long)]
    pub uninstall: bool,

    /// Enable access for the given amount of time (like 1h5m30s), then disable it again
    #[arg(long, value_name = "DURATION")]
    pub time: Option<String>,

    /// Hosts file to edit instead of the system one
    #[arg(long, value_name = "PATH")]
    pub hosts: Option<PathBuf>,

    /// Domains to act on
    #[arg(value_name = "DOMAIN")]
    pub domains: Vec<String>,
}

/// What to do with the domains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Disable,
    Enable,
    Timed(Duration),
}

/// A validated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub mode: Mode,
    pub aliases: AliasSet,
    pub hosts_path: Option<PathBuf>,
}

impl Cli {
    /// Validate flags and domains
    pub fn into_invocation(self) -> Result<Invocation, UsageError> {
        let aliases = parse_domains(&self.domains)?;

        let disable = self.disable || self.install;
        let enable = self.enable || self.uninstall;
        let time = self.time.filter(|t| !t.is_empty());

        let mode = match (disable, enable, time) {
            (true, false, None) => Mode::Disable,
            (false, true, None) => Mode::Enable,
            (false, false, Some(time)) => Mode::Timed(parse_duration(&time)?),
            (false, false, None) => return Err(UsageError::NoMode),
            _ => return Err(UsageError::ConflictingModes),
        };

        Ok(Invocation {
            mode,
            aliases,
            hosts_path: self.hosts,
        })
    }
}

fn parse_domains(raw: &[String]) -> Result<AliasSet, UsageError> {
    if raw.is_empty() {
        return Err(UsageError::NoDomains);
    }

    let mut aliases = AliasSet::new();
    for input in raw {
        let domain =
            Domain::normalize(input).ok_or_else(|| UsageError::InvalidDomain(input.clone()))?;
        aliases.insert(&domain);
    }
    Ok(aliases)
}

/// Parse arguments, accepting single-dash long flags
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    Cli::try_parse_from(go_style_flags(args))
}

/// Rewrite `-flag` and `-flag=value` to `--flag` for known long flags
fn go_style_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut passthrough = false;

    for (i, arg) in args.into_iter().enumerate() {
        let arg: OsString = arg.into();
        if i == 0 || passthrough {
            out.push(arg);
            continue;
        }
        if arg.to_str() == Some("--") {
            passthrough = true;
            out.push(arg);
            continue;
        }

        let rewritten = arg.to_str().and_then(|s| {
            let name = s.strip_prefix('-').filter(|rest| !rest.starts_with('-'))?;
            let flag = name.split_once('=').map_or(name, |(flag, _)| flag);
            LONG_FLAGS
                .contains(&flag)
                .then(|| OsString::from(format!("-{}", s)))
        });
        out.push(rewritten.unwrap_or(arg));
    }
    out
}

/// Full usage text
pub fn usage() -> String {
    Cli::command().render_help().to_string()
}

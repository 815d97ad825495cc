//! hosts-timer - block domains via the hosts file, or unblock them for a while
//!
//! Usage:
//!   hosts-timer -disable DOMAIN...      Block the domains (alias: -install)
//!   hosts-timer -enable DOMAIN...       Unblock them indefinitely (alias: -uninstall)
//!   hosts-timer -time 15m DOMAIN...     Unblock for 15 minutes, then block again

use std::process::ExitCode;
use std::time::Duration;

use chrono::Local;
use clap::error::ErrorKind;
use hosts_timer_core::Paths;
use tracing_subscriber::EnvFilter;

use hosts_timer::app::{self, Outcome};
use hosts_timer::cli::{self, Cli, Invocation, Mode};
use hosts_timer::duration::format_duration;
use hosts_timer::error::{AppError, UsageError};
use hosts_timer::signals;

// ANSI color codes
const RED: &str = "\x1b[0;31m";
const GREEN: &str = "\x1b[0;32m";
const CYAN: &str = "\x1b[0;36m";
const NC: &str = "\x1b[0m";

/// Check if stdout is a TTY and colors should be used
fn use_colors() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stdout())
}

/// Conditionally apply color
fn color(code: &str, text: &str) -> String {
    if use_colors() {
        format!("{}{}{}", code, text, NC)
    } else {
        text.to_string()
    }
}

fn main() -> ExitCode {
    // Logs go to stderr so they never mix with the tool's own output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = match cli::parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => return fail(&UsageError::Arguments(clap_message(&err)).into()),
    };

    match run(cli) {
        Ok(outcome) => {
            report(&outcome);
            ExitCode::SUCCESS
        }
        Err(err) => fail(&err),
    }
}

fn run(cli: Cli) -> Result<Outcome, AppError> {
    let invocation = cli.into_invocation()?;
    let store = app::open_store(&Paths::new(), invocation.hosts_path.as_deref())?;

    if let Mode::Timed(duration) = invocation.mode {
        announce(&invocation, duration);
    }
    app::run(invocation, store, signals::arm_interrupt)
}

/// First line of a clap error, without its "error: " prefix
fn clap_message(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).to_string()
}

fn announce(invocation: &Invocation, duration: Duration) {
    let until = chrono::Duration::from_std(duration)
        .ok()
        .and_then(|d| Local::now().checked_add_signed(d));

    println!(
        "{} Unblocking {} for {}",
        color(CYAN, "[info]"),
        invocation.aliases,
        format_duration(duration)
    );
    if let Some(until) = until {
        println!("Blocked again at {}, or on Ctrl-C", until.format("%H:%M:%S"));
    }
}

fn report(outcome: &Outcome) {
    match outcome {
        Outcome::Disabled(aliases) => println!("{} Blocked {}", color(GREEN, "[ok]"), aliases),
        Outcome::Enabled(aliases) => println!("{} Unblocked {}", color(GREEN, "[ok]"), aliases),
        Outcome::Timed(aliases, report) => println!(
            "{} Blocked {} again after {} ({})",
            color(GREEN, "[ok]"),
            aliases,
            format_duration(report.unblocked_for),
            report.trigger.as_str()
        ),
    }
}

fn fail(err: &AppError) -> ExitCode {
    eprintln!("{} {}", color(RED, "[error]"), err);
    if err.wants_usage() {
        println!();
        print!("{}", cli::usage());
    }
    ExitCode::from(err.exit_code())
}

//! Hosts file document model
//!
//! Parses a hosts file into lines that can be edited in place and rendered
//! back out. Lines that were not edited render exactly as they were read,
//! so comments, blank lines and anything we do not understand survive a
//! round trip untouched.

use std::fmt;
use std::net::IpAddr;

/// A single `address hostname...` record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub address: IpAddr,
    pub hostnames: Vec<String>,
    /// Trailing comment text, without the leading `#`
    pub comment: Option<String>,
    /// Original text, dropped as soon as the entry is edited
    raw: Option<String>,
}

impl Entry {
    pub fn new(address: IpAddr, hostnames: Vec<String>) -> Self {
        Self {
            address,
            hostnames,
            comment: None,
            raw: None,
        }
    }

    /// Whether this entry lists `hostname` (ASCII case-insensitive)
    pub fn contains(&self, hostname: &str) -> bool {
        self.hostnames.iter().any(|h| h.eq_ignore_ascii_case(hostname))
    }

    fn parse(text: &str) -> Option<Self> {
        let (data, comment) = match text.split_once('#') {
            Some((data, comment)) => (data, Some(comment.to_string())),
            None => (text, None),
        };

        let mut tokens = data.split_whitespace();
        let address: IpAddr = tokens.next()?.parse().ok()?;
        let hostnames: Vec<String> = tokens.map(str::to_string).collect();
        if hostnames.is_empty() {
            return None;
        }

        Some(Self {
            address,
            hostnames,
            comment,
            raw: Some(text.to_string()),
        })
    }

    /// Drop every hostname in `hostnames`; returns true if anything changed
    fn strip(&mut self, hostnames: &[String]) -> bool {
        let before = self.hostnames.len();
        self.hostnames
            .retain(|h| !hostnames.iter().any(|gone| gone.eq_ignore_ascii_case(h)));

        let changed = self.hostnames.len() != before;
        if changed {
            self.raw = None;
        }
        changed
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(raw) = &self.raw {
            return f.write_str(raw);
        }
        write!(f, "{} {}", self.address, self.hostnames.join(" "))?;
        if let Some(comment) = &self.comment {
            write!(f, " #{}", comment)?;
        }
        Ok(())
    }
}

/// One line of a hosts file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Entry(Entry),
    /// Blank lines, comments and anything that is not an address record
    Other(String),
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Entry(entry) => fmt::Display::fmt(entry, f),
            Line::Other(text) => f.write_str(text),
        }
    }
}

/// A line plus whether it ended in `\r\n` rather than `\n`
#[derive(Debug, Clone, PartialEq, Eq)]
struct Row {
    line: Line,
    crlf: bool,
}

/// Editable, round-trippable hosts file.
///
/// Line endings are tracked per line, so files mixing `\n` and `\r\n`
/// render back byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostsFile {
    rows: Vec<Row>,
    trailing_newline: bool,
}

impl Default for HostsFile {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            trailing_newline: true,
        }
    }
}

impl HostsFile {
    /// Parse hosts file content. Parsing never fails: unknown lines are kept as text.
    pub fn parse(content: &str) -> Self {
        if content.is_empty() {
            return Self::default();
        }

        let trailing_newline = content.ends_with('\n');
        let body = content.strip_suffix('\n').unwrap_or(content);

        let rows = body
            .split('\n')
            .map(|text| {
                let (text, crlf) = match text.strip_suffix('\r') {
                    Some(text) => (text, true),
                    None => (text, false),
                };
                let line = match Entry::parse(text) {
                    Some(entry) => Line::Entry(entry),
                    None => Line::Other(text.to_string()),
                };
                Row { line, crlf }
            })
            .collect();

        Self {
            rows,
            trailing_newline,
        }
    }

    /// Render back to file content
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&row.line.to_string());
            if row.crlf {
                out.push('\r');
            }
        }
        if self.trailing_newline && !self.rows.is_empty() {
            out.push('\n');
        }
        out
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.rows.iter().map(|row| &row.line)
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.lines().filter_map(|line| match line {
            Line::Entry(entry) => Some(entry),
            Line::Other(_) => None,
        })
    }

    /// Whether `hostname` is listed under `address`
    pub fn contains(&self, address: IpAddr, hostname: &str) -> bool {
        self.entries()
            .any(|e| e.address == address && e.contains(hostname))
    }

    /// Addresses `hostname` is currently mapped to, in file order
    pub fn addresses_of(&self, hostname: &str) -> Vec<IpAddr> {
        self.entries()
            .filter(|e| e.contains(hostname))
            .map(|e| e.address)
            .collect()
    }

    /// Map every hostname to `address`.
    ///
    /// Hostnames already under `address` are left alone. The rest are taken
    /// off any other address and appended together as one new entry.
    pub fn add(&mut self, address: IpAddr, hostnames: &[String]) {
        let mut missing: Vec<String> = Vec::new();
        for hostname in hostnames {
            if self.contains(address, hostname)
                || missing.iter().any(|m| m.eq_ignore_ascii_case(hostname))
            {
                continue;
            }
            missing.push(hostname.clone());
        }

        if missing.is_empty() {
            return;
        }

        self.strip_where(&missing, |entry| entry.address != address);
        // New lines follow the ending of the line they are appended after
        let crlf = self.rows.last().is_some_and(|row| row.crlf);
        if self.rows.is_empty() {
            self.trailing_newline = true;
        }
        self.rows.push(Row {
            line: Line::Entry(Entry::new(address, missing)),
            crlf,
        });
    }

    /// Remove every hostname from every address
    pub fn remove(&mut self, hostnames: &[String]) {
        self.strip_where(hostnames, |_| true);
    }

    fn strip_where(&mut self, hostnames: &[String], applies: impl Fn(&Entry) -> bool) {
        for row in &mut self.rows {
            if let Line::Entry(entry) = &mut row.line {
                if applies(entry) {
                    entry.strip(hostnames);
                }
            }
        }

        self.rows.retain(|row| match &row.line {
            Line::Entry(entry) => !entry.hostnames.is_empty(),
            Line::Other(_) => true,
        });
    }
}

impl fmt::Display for HostsFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

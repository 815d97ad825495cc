//! Domain normalization
//!
//! Every domain is handled as a pair of aliases: the bare domain and its
//! `www.` variant. Blocking one without the other is never useful, so the
//! pair is the smallest unit the rest of the tool works with.

use std::fmt;

/// A normalized domain: lowercase, without any leading `www.`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Domain(String);

impl Domain {
    /// Normalize user input into a domain.
    ///
    /// Returns `None` when nothing is left after normalization, or when the
    /// input contains characters that would break a hosts file line.
    pub fn normalize(raw: &str) -> Option<Self> {
        let lower = raw.trim().to_lowercase();

        let mut root = lower.as_str();
        while let Some(rest) = root.strip_prefix("www.") {
            root = rest;
        }

        if root.is_empty() || root.contains(|c: char| c.is_whitespace() || c == '#') {
            return None;
        }
        Some(Self(root.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The two hostnames this domain stands for
    pub fn aliases(&self) -> [String; 2] {
        [self.0.clone(), format!("www.{}", self.0)]
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Union of the aliases of one or more domains, in input order, without duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasSet {
    aliases: Vec<String>,
}

impl AliasSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add both aliases of `domain`
    pub fn insert(&mut self, domain: &Domain) {
        for alias in domain.aliases() {
            if !self.aliases.contains(&alias) {
                self.aliases.push(alias);
            }
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.aliases
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.aliases.iter().any(|a| a == alias)
    }
}

impl<'a> FromIterator<&'a Domain> for AliasSet {
    fn from_iter<I: IntoIterator<Item = &'a Domain>>(iter: I) -> Self {
        let mut set = Self::new();
        for domain in iter {
            set.insert(domain);
        }
        set
    }
}

impl fmt::Display for AliasSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.aliases.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_www_and_case() {
        let domain = Domain::normalize("WWW.Example.com").unwrap();
        assert_eq!(domain.as_str(), "example.com");
        assert_eq!(
            domain.aliases(),
            ["example.com".to_string(), "www.example.com".to_string()]
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["example.com", "www.Example.com", "www.www.news.site", " Mixed.Case.ORG "] {
            let once = Domain::normalize(raw).unwrap();
            let twice = Domain::normalize(once.as_str()).unwrap();
            assert_eq!(once, twice, "input {:?}", raw);
        }
    }

    #[test]
    fn test_normalize_rejects_empty() {
        assert_eq!(Domain::normalize(""), None);
        assert_eq!(Domain::normalize("www."), None);
        assert_eq!(Domain::normalize("WWW."), None);
        assert_eq!(Domain::normalize("   "), None);
    }

    #[test]
    fn test_normalize_rejects_hosts_syntax() {
        assert_eq!(Domain::normalize("exa mple.com"), None);
        assert_eq!(Domain::normalize("example.com#x"), None);
    }

    #[test]
    fn test_alias_set_union() {
        let domains: Vec<Domain> = ["example.com", "www.example.com", "news.site"]
            .iter()
            .filter_map(|d| Domain::normalize(d))
            .collect();
        let aliases: AliasSet = domains.iter().collect();

        assert_eq!(
            aliases.as_slice(),
            ["example.com", "www.example.com", "news.site", "www.news.site"]
        );
        assert!(aliases.contains("www.news.site"));
        assert_eq!(aliases.to_string(), "example.com, www.example.com, news.site, www.news.site");
    }
}

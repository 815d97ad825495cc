//! Standard paths used by hosts-timer

use std::path::PathBuf;

/// Standard hosts-timer paths
pub struct Paths {
    /// Config directory (~/.config/hosts-timer)
    pub config: PathBuf,
    /// Operating system hosts file
    pub hosts: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let config = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("hosts-timer");

        Self {
            config,
            hosts: system_hosts_path(),
        }
    }

    /// Path of the JSON config file
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.json")
    }
}

#[cfg(windows)]
fn system_hosts_path() -> PathBuf {
    let root = std::env::var_os("SystemRoot").unwrap_or_else(|| "C:\\Windows".into());
    PathBuf::from(root).join(r"System32\drivers\etc\hosts")
}

#[cfg(not(windows))]
fn system_hosts_path() -> PathBuf {
    PathBuf::from("/etc/hosts")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_lives_in_config_dir() {
        let paths = Paths::new();
        assert!(paths.config.ends_with("hosts-timer"));
        assert_eq!(paths.config_file().file_name().unwrap(), "config.json");
    }

    #[cfg(unix)]
    #[test]
    fn test_unix_hosts_path() {
        assert_eq!(Paths::new().hosts, PathBuf::from("/etc/hosts"));
    }
}

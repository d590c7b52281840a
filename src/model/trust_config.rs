use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::model::Fingerprint;

/// Per-user trust configuration, immutable per attempt
///
/// Loaded from a single-line file of two whitespace-separated tokens: the
/// trusted fingerprint and the mount point under which the removable medium
/// is expected. Absence of the file means the factor is not enrolled for
/// this user, which is a distinct outcome from a failed proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustConfig {
    trusted_fingerprint: Fingerprint,
    mount_point: PathBuf,
}

impl TrustConfig {
    pub fn new(trusted_fingerprint: Fingerprint, mount_point: PathBuf) -> Self {
        Self {
            trusted_fingerprint,
            mount_point,
        }
    }

    /// Parse the two-token config record.
    ///
    /// Tokens past the second are ignored, matching the file's historical
    /// reader.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let mut tokens = contents.split_whitespace();
        let fingerprint = tokens.next().ok_or_else(|| ConfigError::Malformed {
            reason: "missing trusted fingerprint".to_string(),
        })?;
        let mount_point = tokens.next().ok_or_else(|| ConfigError::Malformed {
            reason: "missing mount point".to_string(),
        })?;
        Ok(Self {
            trusted_fingerprint: Fingerprint::new(fingerprint)?,
            mount_point: PathBuf::from(mount_point),
        })
    }

    /// Load the per-user config file.
    ///
    /// Any failure to open the file reports the factor as not enrolled.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|_| ConfigError::Missing {
            path: path.display().to_string(),
        })?;
        Self::parse(&contents)
    }

    pub fn trusted_fingerprint(&self) -> &Fingerprint {
        &self.trusted_fingerprint
    }

    pub fn mount_point(&self) -> &Path {
        &self.mount_point
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_tokens() {
        let config = TrustConfig::parse("ABCDEF0123456789 /media/usb\n").unwrap();
        assert_eq!(config.trusted_fingerprint().as_str(), "ABCDEF0123456789");
        assert_eq!(config.mount_point(), Path::new("/media/usb"));
    }

    #[test]
    fn test_parse_ignores_trailing_tokens() {
        let config = TrustConfig::parse("ABCDEF0123456789 /media/usb extra").unwrap();
        assert_eq!(config.mount_point(), Path::new("/media/usb"));
    }

    #[test]
    fn test_parse_missing_mount_point() {
        let err = TrustConfig::parse("ABCDEF0123456789").unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
    }

    #[test]
    fn test_parse_empty() {
        let err = TrustConfig::parse("").unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = TrustConfig::load(&dir.path().join(".lastresort_conf")).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { .. }));
    }

    #[test]
    fn test_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".lastresort_conf");
        fs::write(&path, "4BD6B39FD1F15AF918A53A58B6C462E4359B1D8A /mnt/stick\n").unwrap();
        let config = TrustConfig::load(&path).unwrap();
        assert_eq!(
            config.trusted_fingerprint().as_str(),
            "4BD6B39FD1F15AF918A53A58B6C462E4359B1D8A"
        );
        assert_eq!(config.mount_point(), Path::new("/mnt/stick"));
    }
}

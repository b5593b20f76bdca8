use std::path::Path;

use bt_crypto::MerkleTree;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// Configuration handed to a [`Chain`](crate::Chain) at construction.
///
/// ```toml
/// batch_size = 4
/// log_events = true
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChainConfig {
    /// Pending items per sealed block. Must be at least 2.
    pub batch_size: usize,
    /// Emit `info` events for commits and seals.
    pub log_events: bool,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            batch_size: Self::DEFAULT_BATCH_SIZE,
            log_events: true,
        }
    }
}

impl ChainConfig {
    pub const DEFAULT_BATCH_SIZE: usize = 4;

    /// Same configuration with a different batch size.
    pub fn with_batch_size(self, batch_size: usize) -> Self {
        Self { batch_size, ..self }
    }

    /// Reject batch sizes a Merkle tree cannot be built from.
    pub fn validate(&self) -> LedgerResult<()> {
        if self.batch_size < MerkleTree::MIN_BATCH {
            return Err(LedgerError::InvalidConfig(format!(
                "batch_size must be at least {}, got {}",
                MerkleTree::MIN_BATCH,
                self.batch_size
            )));
        }
        Ok(())
    }

    /// Parse and validate a TOML document. Missing keys take defaults.
    pub fn from_toml_str(source: &str) -> LedgerResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| LedgerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> LedgerResult<Self> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| LedgerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let c = ChainConfig::default();
        assert_eq!(c.batch_size, 4);
        assert!(c.log_events);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn builder_overrides_batch_size_only() {
        let c = ChainConfig::default().with_batch_size(8);
        assert_eq!(c.batch_size, 8);
        assert!(c.log_events);
    }

    #[test]
    fn degenerate_batch_sizes_rejected() {
        for size in [0, 1] {
            let err = ChainConfig::default().with_batch_size(size).validate().unwrap_err();
            assert!(matches!(err, LedgerError::InvalidConfig(_)), "size {size}");
        }
        assert!(ChainConfig::default().with_batch_size(2).validate().is_ok());
    }

    #[test]
    fn partial_toml_takes_defaults() {
        let c = ChainConfig::from_toml_str("batch_size = 16").unwrap();
        assert_eq!(c.batch_size, 16);
        assert!(c.log_events);

        let c = ChainConfig::from_toml_str("").unwrap();
        assert_eq!(c, ChainConfig::default());
    }

    #[test]
    fn invalid_toml_rejected() {
        assert!(matches!(
            ChainConfig::from_toml_str("batch_size = \"four\""),
            Err(LedgerError::Config(_))
        ));
        assert!(matches!(
            ChainConfig::from_toml_str("bogus = 1"),
            Err(LedgerError::Config(_))
        ));
        assert!(matches!(
            ChainConfig::from_toml_str("batch_size = 1"),
            Err(LedgerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn full_toml_document() {
        let c = ChainConfig::from_toml_str("batch_size = 6\nlog_events = false\n").unwrap();
        assert_eq!(c, ChainConfig { batch_size: 6, log_events: false });
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "batch_size = 3\nlog_events = false").unwrap();
        let c = ChainConfig::load(file.path()).unwrap();
        assert_eq!(c.batch_size, 3);
        assert!(!c.log_events);
    }

    #[test]
    fn load_missing_file_names_the_path() {
        let err = ChainConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        match err {
            LedgerError::Config(msg) => assert!(msg.contains("/definitely/not/here.toml")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

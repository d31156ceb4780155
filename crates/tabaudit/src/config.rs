//! Audit configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::classify::ClassifierConfig;
use crate::stats::StatsConfig;

/// Configuration injected into an audit session at construction.
///
/// There is no process-wide mutable configuration; every session carries
/// its own copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Column classification thresholds.
    pub classifier: ClassifierConfig,
    /// Statistics configuration (outlier rule).
    pub stats: StatsConfig,
    /// Directory audit artifacts are written to.
    pub output_dir: PathBuf,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            stats: StatsConfig::default(),
            output_dir: PathBuf::from("audit_files"),
        }
    }
}

impl AuditConfig {
    /// Use a different output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}

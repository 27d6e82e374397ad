//! Annotation pass settings

use serde::{Deserialize, Serialize};

/// Settings for a run of the annotation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatorConfig {
    /// Suppress the aggregate warning log
    #[serde(default)]
    pub ignore_warnings: bool,
}

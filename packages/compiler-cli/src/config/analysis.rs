use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Options controlling constructor dependency analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisConfig {
    /// The code being analysed is the framework core itself. Decorators are then trusted without
    /// checking that they were imported from `@angular/core`.
    pub is_core: bool,

    /// Reject arguments passed to `@Optional()`, `@Self()`, `@SkipSelf()` and `@Host()`.
    /// Off by default: such arguments are ignored.
    pub strict_modifier_arguments: bool,
}

impl AnalysisConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> anyhow::Result<Self> {
        let config: AnalysisConfig = serde_json::from_str(content)?;
        Ok(config)
    }

    pub fn core() -> Self {
        Self {
            is_core: true,
            ..Self::default()
        }
    }
}

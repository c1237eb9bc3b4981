//! Content loaders for reading combat data from files.
//!
//! Rules are TOML, scenarios are RON. Both go through small file-format
//! structs that are validated and converted into `warfare-core` types.

pub mod factory;
pub mod rules;
pub mod scenario;

pub use factory::ContentFactory;
pub use rules::RulesLoader;
pub use scenario::{EngagementSpec, Scenario, ScenarioLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

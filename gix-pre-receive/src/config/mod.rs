//! Configuration loading for the admission pipeline.
//!
//! # Configuration Keys
//!
//! - `gatekeeper.controlRefPrefix`: Namespace of control refs (default `refs/gitop/`)
//! - `gatekeeper.branchRefPrefix`: Namespace of branches (default `refs/heads/`)
//! - `gatekeeper.suggestPullRequest`: Suggest a pull request for undetermined verdicts (default `true`)

pub mod admission;

pub use admission::AdmissionConfig;

use std::path::Path;

use crate::Error;

/// Read the Git config file at `path` without following includes.
pub(crate) fn load_file(path: &Path) -> Result<gix_config::File<'static>, Error> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read '{}': {e}", path.display())))?;
    text.parse::<gix_config::File<'static>>()
        .map_err(|e| Error::Config(format!("failed to parse '{}': {e}", path.display())))
}

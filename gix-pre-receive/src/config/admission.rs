//! Admission configuration parsing from Git config.

use std::path::Path;

use gix_config::File;

use crate::Error;

const DEFAULT_CONTROL_REF_PREFIX: &str = "refs/gitop/";
const DEFAULT_BRANCH_REF_PREFIX: &str = "refs/heads/";

/// Settings of the admission pipeline.
///
/// The defaults match what servers expect without any configuration: control refs live below
/// `refs/gitop/`, branches below `refs/heads/`, and undetermined verdicts suggest a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionConfig {
    control_ref_prefix: String,
    branch_ref_prefix: String,
    suggest_pull_request: bool,
}

impl AdmissionConfig {
    pub fn new() -> Self {
        Self {
            control_ref_prefix: DEFAULT_CONTROL_REF_PREFIX.into(),
            branch_ref_prefix: DEFAULT_BRANCH_REF_PREFIX.into(),
            suggest_pull_request: true,
        }
    }

    /// Load the configuration from a Git config file.
    ///
    /// This method parses the following configuration keys:
    /// - `gatekeeper.controlRefPrefix`: String, namespace of refs only administrators may update
    /// - `gatekeeper.branchRefPrefix`: String, namespace of branches subject to gatekeepers
    /// - `gatekeeper.suggestPullRequest`: Boolean, suggest a pull request for undetermined verdicts
    ///
    /// Prefixes must start with `refs/` and end with `/`.
    pub fn from_config(config: &File<'static>) -> Result<Self, Error> {
        let mut cfg = Self::new();

        if let Some(value) = config.string("gatekeeper.controlRefPrefix") {
            cfg.control_ref_prefix = parse_prefix(&value.to_string(), "gatekeeper.controlRefPrefix")?;
        }

        if let Some(value) = config.string("gatekeeper.branchRefPrefix") {
            cfg.branch_ref_prefix = parse_prefix(&value.to_string(), "gatekeeper.branchRefPrefix")?;
        }

        if let Some(result) = config.boolean("gatekeeper.suggestPullRequest") {
            match result {
                Ok(value) => cfg.suggest_pull_request = value,
                Err(e) => {
                    return Err(Error::Config(format!(
                        "invalid boolean value for 'gatekeeper.suggestPullRequest': {e}"
                    )))
                }
            }
        }

        Ok(cfg)
    }

    /// Read and parse the Git config file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::from_config(&super::load_file(path.as_ref())?)
    }

    pub fn control_ref_prefix(&self) -> &str {
        &self.control_ref_prefix
    }

    pub fn with_control_ref_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.control_ref_prefix = prefix.into();
        self
    }

    pub fn branch_ref_prefix(&self) -> &str {
        &self.branch_ref_prefix
    }

    pub fn with_branch_ref_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.branch_ref_prefix = prefix.into();
        self
    }

    pub fn suggest_pull_request(&self) -> bool {
        self.suggest_pull_request
    }

    pub fn with_suggest_pull_request(mut self, enabled: bool) -> Self {
        self.suggest_pull_request = enabled;
        self
    }
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_prefix(value: &str, key: &str) -> Result<String, Error> {
    if !value.starts_with("refs/") || !value.ends_with('/') {
        return Err(Error::Config(format!(
            "invalid ref prefix for '{key}': '{value}'. It must start with 'refs/' and end with '/'"
        )));
    }
    Ok(value.to_owned())
}

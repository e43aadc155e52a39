//! Ref classification: control refs, branches, and everything we leave alone.

use crate::config::AdmissionConfig;

/// The namespace a ref name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind<'a> {
    /// An administrative ref below the control prefix.
    Control,
    /// A branch, with the branch prefix stripped.
    Branch(&'a str),
    /// Tags and any other namespace; no policy applies.
    Unmanaged,
}

/// Classifies ref names by prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefClassifier {
    control_prefix: String,
    branch_prefix: String,
}

impl RefClassifier {
    pub fn new(control_prefix: impl Into<String>, branch_prefix: impl Into<String>) -> Self {
        Self {
            control_prefix: control_prefix.into(),
            branch_prefix: branch_prefix.into(),
        }
    }

    pub fn from_config(config: &AdmissionConfig) -> Self {
        Self::new(config.control_ref_prefix(), config.branch_ref_prefix())
    }

    /// Classify `refname`.
    ///
    /// The control prefix is checked first, so a control namespace nested below the branch
    /// namespace still requires administrator privilege.
    pub fn classify<'a>(&self, refname: &'a str) -> RefKind<'a> {
        if refname.starts_with(self.control_prefix.as_str()) {
            return RefKind::Control;
        }
        match refname.strip_prefix(self.branch_prefix.as_str()) {
            Some(name) if !name.is_empty() => RefKind::Branch(name),
            _ => RefKind::Unmanaged,
        }
    }
}

impl Default for RefClassifier {
    fn default() -> Self {
        Self::from_config(&AdmissionConfig::default())
    }
}

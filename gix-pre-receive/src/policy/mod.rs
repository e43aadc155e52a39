//! Admission decisions for individual ref updates.
//!
//! A ref update passes through at most three stages, each of which may stop it:
//! 1. [`permission`]: control refs need project-administrator privilege.
//! 2. [`gatekeeper`]: branch updates need an accepting verdict from the project's gatekeepers.
//! 3. [`pull_requests`]: accepted branch updates must not race open pull requests.

pub mod gatekeeper;
pub mod permission;
pub mod pull_requests;

/// The outcome of running the project's gatekeepers against a branch update.
///
/// ```
/// use gix_pre_receive::policy::Verdict;
///
/// let verdict = Verdict::rejected(["release branch is locked"]);
/// assert!(!verdict.is_accepted());
/// assert_eq!(verdict.reasons(), ["release branch is locked"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Verdict {
    /// The update may proceed.
    Accepted,
    /// The update is denied, with no alternative path.
    Rejected { reasons: Vec<String> },
    /// The update can't be pushed directly, but may still go in through a pull request.
    Undetermined { reasons: Vec<String> },
}

impl Verdict {
    pub fn rejected(reasons: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Verdict::Rejected {
            reasons: reasons.into_iter().map(Into::into).collect(),
        }
    }

    pub fn undetermined(reasons: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Verdict::Undetermined {
            reasons: reasons.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }

    /// The reasons given for a denial, empty if accepted.
    pub fn reasons(&self) -> &[String] {
        match self {
            Verdict::Accepted => &[],
            Verdict::Rejected { reasons } | Verdict::Undetermined { reasons } => reasons,
        }
    }
}

/// What a stage decided about a single ref update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Nothing to object, continue with the next stage or pass.
    Allow,
    /// Stop here, reporting these message lines to the client.
    Deny(Vec<String>),
}

impl Decision {
    pub fn deny(messages: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Decision::Deny(messages.into_iter().map(Into::into).collect())
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

//! Conflicts between direct pushes and open pull requests.

use super::Decision;
use crate::collaborators::PullRequestLister;
use crate::model::{Branch, PullRequest};

/// Which side of a branch an open pull request was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
    /// An open request targets the branch.
    Incoming,
    /// An open request originates from the branch.
    Outgoing,
}

impl Conflict {
    /// The lines reported to the pusher.
    pub fn messages(self) -> [&'static str; 2] {
        let first = match self {
            Conflict::Incoming => "There are unclosed pull requests targeting this branch.",
            Conflict::Outgoing => "There are unclosed pull requests originating from this branch.",
        };
        [first, "Please close them before continue."]
    }
}

/// Find the first conflict on `branch`.
///
/// Incoming requests are looked at first. If one of them is open, outgoing requests aren't listed at all.
pub fn find_conflict(requests: &dyn PullRequestLister, branch: &Branch) -> Option<Conflict> {
    if requests.incoming(branch).iter().any(PullRequest::is_open) {
        return Some(Conflict::Incoming);
    }
    if requests.outgoing(branch).iter().any(PullRequest::is_open) {
        return Some(Conflict::Outgoing);
    }
    None
}

/// Deny the update if `branch` has open pull requests in either direction.
pub fn check(requests: &dyn PullRequestLister, branch: &Branch) -> Decision {
    match find_conflict(requests, branch) {
        Some(conflict) => Decision::deny(conflict.messages()),
        None => Decision::Allow,
    }
}

//! Turning gatekeeper verdicts into admission decisions.

use super::{Decision, Verdict};

/// Visually separates gatekeeper reasons from the pull request suggestion.
pub const SEPARATOR: &str = "----------------------------------------------------";
/// Points the pusher to the path that remains open for undetermined verdicts.
pub const SUGGESTION: &str = "You may submit a pull request instead.";

/// Map `verdict` for an update that `is_delete`s the branch or not.
///
/// Rejections carry their reasons verbatim. Undetermined verdicts additionally suggest a pull request
/// if `suggest_pull_request` is set, unless the branch is being deleted as a pull request can't do that.
pub fn judge(verdict: Verdict, is_delete: bool, suggest_pull_request: bool) -> Decision {
    match verdict {
        Verdict::Accepted => Decision::Allow,
        Verdict::Rejected { reasons } => Decision::Deny(reasons),
        Verdict::Undetermined { mut reasons } => {
            if suggest_pull_request && !is_delete {
                reasons.extend([String::new(), SEPARATOR.to_owned(), SUGGESTION.to_owned()]);
            }
            Decision::Deny(reasons)
        }
    }
}

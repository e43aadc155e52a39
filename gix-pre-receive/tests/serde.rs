//! Decisions and their inputs survive a trip through JSON, e.g. when a server ships them to an audit log.
#![cfg(feature = "serde")]

use gix_pre_receive::{DecisionReport, PullRequest, RefUpdate, RequestState, Verdict};
use pretty_assertions::assert_eq;

#[test]
fn report_round_trips_with_refnames_and_messages() {
    let mut report = DecisionReport::new();
    report.reject("refs/heads/main", vec!["main is frozen".into(), String::new()]);
    report.reject("refs/gitop/acl", vec!["Only project administrators can update control refs.".into()]);

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"refname\":\"refs/heads/main\""), "{json}");

    let back: DecisionReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
    assert_eq!(back.to_text(), report.to_text());
}

#[test]
fn verdicts_keep_their_reasons() {
    for verdict in [
        Verdict::Accepted,
        Verdict::rejected(["release branch is locked"]),
        Verdict::undetermined(["needs two approvals", "ask a maintainer"]),
    ] {
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(serde_json::from_value::<Verdict>(json).unwrap(), verdict);
    }
}

#[test]
fn ref_updates_and_pull_requests() {
    let update = RefUpdate::from_line(&format!("{} {} refs/heads/main", "0".repeat(64), "ab".repeat(32))).unwrap();
    let back: RefUpdate = serde_json::from_str(&serde_json::to_string(&update).unwrap()).unwrap();
    assert_eq!(back, update);
    assert!(back.is_create());

    let request = PullRequest::new(7, "Backport fix", RequestState::Open);
    let back: PullRequest = serde_json::from_str(&serde_json::to_string(&request).unwrap()).unwrap();
    assert_eq!(back, request);
}

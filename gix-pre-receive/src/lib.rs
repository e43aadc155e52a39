/*!
Push admission for gitoxide servers.

A server calls into this crate when a client pushes, handing over the ref updates of the push
just like a git `pre-receive` hook receives them. Each update is judged on its own:

- control refs (below `refs/gitop/` by default) may only be changed by project administrators,
- updates of existing branches must be accepted by the project's gatekeepers,
- and accepted branch updates must not conflict with open pull requests of the branch.

Denied updates are explained to the pushing client through a framed text [report][DecisionReport],
and any denial fails the push as a whole.

Design principles
- No global state: the acting user and all collaborators are passed in explicitly.
- Read-only: nothing is mutated while judging, so one engine serves concurrent pushes.
- Typestate builder so an engine can't be built without its collaborators.
*/

#![forbid(unsafe_code)]

pub mod collaborators;
pub mod config;
pub mod model;
pub mod policy;
pub mod protocol;
pub mod report;
pub mod snapshot;

pub use collaborators::Collaborators;
pub use config::AdmissionConfig;
pub use model::{Actor, Branch, Project, PullRequest, RequestState};
pub use policy::{Decision, Verdict};
pub use protocol::{RefClassifier, RefKind, RefUpdate, RefUpdateList};
pub use report::DecisionReport;

use tracing::{debug, info, warn};

/// Typestates representing builder progress.
pub mod state {
    /// Initial builder state without collaborators.
    #[derive(Debug)]
    pub struct Start;
    /// Ready state once collaborators are known.
    #[derive(Debug)]
    pub struct Ready {
        pub(crate) collaborators: crate::Collaborators,
    }
}

/// Stable high-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Io,
    Protocol,
    Validation,
    NotFound,
    Bug,
}

/// Errors that abort an invocation as a whole.
///
/// Denied ref updates are not errors, they end up in the [`DecisionReport`].
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A ref update record doesn't have the form `<old> <new> <refname>`.
    #[error("malformed ref update '{line}': {message}")]
    MalformedRecord { line: String, message: String },
    /// An existing branch is updated, but the branch can't be found.
    #[error("branch '{branch}' of project '{project}' could not be resolved even though it exists in the repository")]
    MissingBranch { project: String, branch: String },
    /// Policy evaluation is required, but nobody is authenticated.
    #[error("no authenticated actor to evaluate the update of '{refname}'")]
    MissingActor { refname: String },
    /// The repository doesn't belong to any known project.
    #[error("unknown project '{0}'")]
    UnknownProject(String),
    /// Configuration or snapshot files are invalid.
    #[error("configuration error: {0}")]
    Config(String),
    /// I/O errors while writing the report.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Fast classification helper returning a stable error kind.
    pub fn kind(&self) -> Kind {
        match self {
            Error::MalformedRecord { .. } => Kind::Protocol,
            Error::MissingBranch { .. } | Error::MissingActor { .. } => Kind::Bug,
            Error::UnknownProject(_) => Kind::NotFound,
            Error::Config(_) => Kind::Validation,
            Error::Io(_) => Kind::Io,
        }
    }

    pub(crate) fn malformed(line: &str, message: impl Into<String>) -> Self {
        Error::MalformedRecord {
            line: line.to_owned(),
            message: message.into(),
        }
    }
}

/// Builder for constructing a [`PreReceive`] engine with typestate guarantees.
#[derive(Debug)]
pub struct PreReceiveBuilder<S = state::Start> {
    cfg: AdmissionConfig,
    state: S,
}

impl PreReceiveBuilder<state::Start> {
    /// Create a new builder in the Start state.
    pub fn new() -> Self {
        Self {
            cfg: AdmissionConfig::default(),
            state: state::Start,
        }
    }

    /// Provide the collaborators and move to Ready state.
    pub fn collaborators(self, collaborators: Collaborators) -> PreReceiveBuilder<state::Ready> {
        PreReceiveBuilder {
            cfg: self.cfg,
            state: state::Ready { collaborators },
        }
    }
}

impl Default for PreReceiveBuilder<state::Start> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> PreReceiveBuilder<S> {
    /// Replace the default configuration.
    pub fn with_config(mut self, cfg: AdmissionConfig) -> Self {
        self.cfg = cfg;
        self
    }
}

impl PreReceiveBuilder<state::Ready> {
    /// Finalize the builder and obtain a PreReceive instance.
    ///
    /// This does no I/O.
    pub fn build(self) -> PreReceive {
        PreReceive {
            classifier: RefClassifier::from_config(&self.cfg),
            cfg: self.cfg,
            collaborators: self.state.collaborators,
        }
    }
}

/// The admission engine.
#[derive(Debug)]
pub struct PreReceive {
    cfg: AdmissionConfig,
    classifier: RefClassifier,
    collaborators: Collaborators,
}

impl PreReceive {
    pub fn config(&self) -> &AdmissionConfig {
        &self.cfg
    }

    /// Judge the ref updates in `payload`, pushed by `actor` into `repository`.
    ///
    /// The payload is parsed completely before anything is evaluated. Errors abort the invocation
    /// and produce no report at all.
    pub fn run(&self, repository: &str, actor: Option<&Actor>, payload: &str) -> Result<DecisionReport, Error> {
        let updates = RefUpdateList::parse_from_text(payload)?;
        let project = self.collaborators.projects.resolve_project(repository)?;
        self.evaluate(&project, actor, &updates)
    }

    /// Judge already parsed `updates` to `project`, in order.
    pub fn evaluate(
        &self,
        project: &Project,
        actor: Option<&Actor>,
        updates: &RefUpdateList,
    ) -> Result<DecisionReport, Error> {
        let mut report = DecisionReport::new();
        for update in updates {
            if let Decision::Deny(messages) = self.evaluate_update(project, actor, update)? {
                warn!(
                    project = %project.name,
                    refname = %update.refname,
                    actor = actor.map(|a| a.name.as_str()),
                    "ref update denied"
                );
                report.reject(update.refname.as_str(), messages);
            }
        }
        Ok(report)
    }

    /// Judge a single `update` to `project`.
    pub fn evaluate_update(
        &self,
        project: &Project,
        actor: Option<&Actor>,
        update: &RefUpdate,
    ) -> Result<Decision, Error> {
        let collab = &self.collaborators;
        match self.classifier.classify(&update.refname) {
            RefKind::Control => Ok(policy::permission::check(collab.permissions.as_ref(), actor, project)),
            RefKind::Unmanaged => {
                debug!(refname = %update.refname, "ref is not managed, allowing");
                Ok(Decision::Allow)
            }
            RefKind::Branch(_) if update.is_create() => {
                debug!(refname = %update.refname, "branch is created, skipping gatekeepers");
                Ok(Decision::Allow)
            }
            RefKind::Branch(name) => {
                let branch = collab
                    .branches
                    .find_branch(project, name)
                    .ok_or_else(|| Error::MissingBranch {
                        project: project.name.clone(),
                        branch: name.to_owned(),
                    })?;

                info!(project = %project.name, branch = name, "executing gatekeepers");

                let actor = actor.ok_or_else(|| Error::MissingActor {
                    refname: update.refname.clone(),
                })?;
                let verdict = collab.gatekeeper.check_commit(actor, &branch, &update.new);
                match policy::gatekeeper::judge(verdict, update.is_delete(), self.cfg.suggest_pull_request()) {
                    Decision::Allow => Ok(policy::pull_requests::check(collab.requests.as_ref(), &branch)),
                    denied => Ok(denied),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::collaborators::{BranchResolver, Gatekeeper, PermissionCheck, ProjectResolver, PullRequestLister};

    struct Everything;

    impl ProjectResolver for Everything {
        fn resolve_project(&self, repository: &str) -> Result<Project, Error> {
            Ok(Project::new(repository))
        }
    }

    impl BranchResolver for Everything {
        fn find_branch(&self, project: &Project, name: &str) -> Option<Branch> {
            Some(Branch::new(project, name))
        }
    }

    impl PermissionCheck for Everything {
        fn is_project_admin(&self, _actor: &Actor, _project: &Project) -> bool {
            true
        }
    }

    impl Gatekeeper for Everything {
        fn check_commit(&self, _actor: &Actor, _branch: &Branch, _new: &str) -> Verdict {
            Verdict::Accepted
        }
    }

    impl PullRequestLister for Everything {
        fn incoming(&self, _branch: &Branch) -> Vec<PullRequest> {
            Vec::new()
        }

        fn outgoing(&self, _branch: &Branch) -> Vec<PullRequest> {
            Vec::new()
        }
    }

    fn engine() -> PreReceive {
        PreReceiveBuilder::new()
            .collaborators(Collaborators::from_shared(Arc::new(Everything)))
            .build()
    }

    #[test]
    fn builder_uses_default_config() {
        assert_eq!(engine().config(), &AdmissionConfig::default());
    }

    #[test]
    fn builder_config_applies_in_either_state() {
        let cfg = AdmissionConfig::default().with_control_ref_prefix("refs/meta/");
        let rp = PreReceiveBuilder::new()
            .with_config(cfg.clone())
            .collaborators(Collaborators::from_shared(Arc::new(Everything)))
            .build();
        assert_eq!(rp.config(), &cfg);

        let rp = PreReceiveBuilder::new()
            .collaborators(Collaborators::from_shared(Arc::new(Everything)))
            .with_config(cfg.clone())
            .build();
        assert_eq!(rp.config(), &cfg);
    }

    #[test]
    fn permissive_collaborators_pass_everything() {
        let payload = concat!(
            "1111111111111111111111111111111111111111 2222222222222222222222222222222222222222 refs/heads/main\n",
            "1111111111111111111111111111111111111111 2222222222222222222222222222222222222222 refs/gitop/acl\n",
        );
        let report = engine().run("demo", Some(&Actor::new("alice")), payload).unwrap();
        assert!(!report.is_failed());
    }

    #[test]
    fn malformed_payload_has_protocol_kind() {
        let err = engine().run("demo", None, "just two\n").unwrap_err();
        assert_eq!(err.kind(), Kind::Protocol);
    }

    #[test]
    fn missing_actor_is_a_bug() {
        let payload = concat!(
            "1111111111111111111111111111111111111111 2222222222222222222222222222222222222222 ",
            "refs/heads/main\n"
        );
        let err = engine().run("demo", None, payload).unwrap_err();
        assert!(matches!(err, Error::MissingActor { ref refname } if refname == "refs/heads/main"));
        assert_eq!(err.kind(), Kind::Bug);
    }
}

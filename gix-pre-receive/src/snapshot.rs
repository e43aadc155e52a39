//! A frozen view of one project, read from a Git config file.
//!
//! Servers normally back the [collaborators][crate::collaborators] with their own storage. A snapshot
//! implements all of them from a static description instead, which is what the `gix-pre-receive`
//! binary uses to dry-run pushes:
//!
//! ```text
//! [project]
//!     name = demo
//!     admin = alice
//! [branch "main"]
//!     verdict = undetermined
//!     reason = main needs two approvals
//!     incoming = closed
//!     outgoing = open Backport to release
//! ```
//!
//! `verdict` is one of `accepted` (default), `rejected` or `undetermined`; `reason`, `incoming` and `outgoing`
//! may repeat and keep their order. Pull requests are given as their state, `open` or `closed`, optionally
//! followed by a title.

use std::collections::BTreeMap;
use std::path::Path;

use gix_config::File;

use crate::collaborators::{BranchResolver, Gatekeeper, PermissionCheck, ProjectResolver, PullRequestLister};
use crate::model::{Actor, Branch, Project, PullRequest, RequestState};
use crate::policy::Verdict;
use crate::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
struct BranchState {
    verdict: Verdict,
    incoming: Vec<PullRequest>,
    outgoing: Vec<PullRequest>,
}

/// Everything needed to judge pushes to a single project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    project: Project,
    admins: Vec<String>,
    branches: BTreeMap<String, BranchState>,
}

impl Snapshot {
    /// Build a snapshot from a parsed Git config file.
    pub fn from_config(config: &File<'static>) -> Result<Self, Error> {
        let name = config
            .string("project.name")
            .ok_or_else(|| Error::Config("snapshot is missing 'project.name'".into()))?
            .to_string();
        let admins = config
            .strings("project.admin")
            .unwrap_or_default()
            .iter()
            .map(ToString::to_string)
            .collect();

        let mut branches = BTreeMap::new();
        let mut next_request_id = 1;
        for section in config.sections_by_name("branch").into_iter().flatten() {
            let branch = section
                .header()
                .subsection_name()
                .map(ToString::to_string)
                .ok_or_else(|| Error::Config("branch sections need a name, like [branch \"main\"]".into()))?;

            let reasons: Vec<String> = section.values("reason").iter().map(ToString::to_string).collect();
            let verdict = match section.value("verdict").map(|v| v.to_string().to_lowercase()).as_deref() {
                None | Some("accepted") => Verdict::Accepted,
                Some("rejected") => Verdict::Rejected { reasons },
                Some("undetermined") => Verdict::Undetermined { reasons },
                Some(other) => {
                    return Err(Error::Config(format!(
                        "invalid verdict for branch '{branch}': '{other}'. \
                         Valid values are: accepted, rejected, undetermined"
                    )))
                }
            };

            let mut requests = |key: &str| -> Result<Vec<PullRequest>, Error> {
                section
                    .values(key)
                    .iter()
                    .map(|value| {
                        let value = value.to_string();
                        let (state, title) = value.trim().split_once(char::is_whitespace).unwrap_or((value.trim(), ""));
                        let state = parse_request_state(state, &branch)?;
                        let id = next_request_id;
                        next_request_id += 1;
                        let title = match title.trim() {
                            "" => format!("#{id}"),
                            title => title.to_owned(),
                        };
                        Ok(PullRequest::new(id, title, state))
                    })
                    .collect()
            };
            let incoming = requests("incoming")?;
            let outgoing = requests("outgoing")?;

            branches.insert(
                branch,
                BranchState {
                    verdict,
                    incoming,
                    outgoing,
                },
            );
        }

        Ok(Snapshot {
            project: Project::new(name),
            admins,
            branches,
        })
    }

    /// Read and parse the snapshot file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::from_config(&crate::config::load_file(path.as_ref())?)
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    fn branch_state(&self, branch: &Branch) -> Option<&BranchState> {
        (branch.project == self.project.name)
            .then(|| self.branches.get(&branch.name))
            .flatten()
    }
}

fn parse_request_state(value: &str, branch: &str) -> Result<RequestState, Error> {
    match value.to_lowercase().as_str() {
        "open" => Ok(RequestState::Open),
        "closed" => Ok(RequestState::Closed),
        other => Err(Error::Config(format!(
            "invalid pull request state for branch '{branch}': '{other}'. Valid values are: open, closed"
        ))),
    }
}

impl ProjectResolver for Snapshot {
    fn resolve_project(&self, repository: &str) -> Result<Project, Error> {
        if repository == self.project.name {
            Ok(self.project.clone())
        } else {
            Err(Error::UnknownProject(repository.to_owned()))
        }
    }
}

impl BranchResolver for Snapshot {
    fn find_branch(&self, project: &Project, name: &str) -> Option<Branch> {
        let branch = Branch::new(project, name);
        self.branch_state(&branch).map(|_| branch)
    }
}

impl PermissionCheck for Snapshot {
    fn is_project_admin(&self, actor: &Actor, project: &Project) -> bool {
        *project == self.project && self.admins.iter().any(|admin| *admin == actor.name)
    }
}

impl Gatekeeper for Snapshot {
    fn check_commit(&self, _actor: &Actor, branch: &Branch, _new: &str) -> Verdict {
        self.branch_state(branch)
            .map_or(Verdict::Accepted, |state| state.verdict.clone())
    }
}

impl PullRequestLister for Snapshot {
    fn incoming(&self, branch: &Branch) -> Vec<PullRequest> {
        self.branch_state(branch)
            .map(|state| state.incoming.clone())
            .unwrap_or_default()
    }

    fn outgoing(&self, branch: &Branch) -> Vec<PullRequest> {
        self.branch_state(branch)
            .map(|state| state.outgoing.clone())
            .unwrap_or_default()
    }
}

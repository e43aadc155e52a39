//! Interfaces to the systems the controller consults while judging a push.
//!
//! Project storage, permissions, the gatekeeper chain and pull requests all live elsewhere;
//! the controller only needs the narrow, read-only views below. Each trait is injected at
//! construction time through [`Collaborators`], which makes it trivial to substitute fakes.
//!
//! All traits are implemented for `Arc<T>` so a single backing store can serve every role,
//! see [`Collaborators::from_shared()`].

use std::sync::Arc;

use crate::model::{Actor, Branch, Project, PullRequest};
use crate::policy::Verdict;
use crate::Error;

/// Looks up the project owning a repository.
pub trait ProjectResolver {
    /// Return the project for `repository`, or [`Error::UnknownProject`] if there is none.
    fn resolve_project(&self, repository: &str) -> Result<Project, Error>;
}

/// Looks up branches within a project.
pub trait BranchResolver {
    /// Return the branch called `name`, or `None` if the project has no such branch.
    fn find_branch(&self, project: &Project, name: &str) -> Option<Branch>;
}

/// Answers authorization questions.
pub trait PermissionCheck {
    /// Return `true` if `actor` may administrate `project`.
    fn is_project_admin(&self, actor: &Actor, project: &Project) -> bool;
}

/// The composite gatekeeper of a project.
///
/// How individual gatekeepers combine into one verdict is up to the implementation.
pub trait Gatekeeper {
    /// Judge whether `actor` may move `branch` to the object id `new`.
    fn check_commit(&self, actor: &Actor, branch: &Branch, new: &str) -> Verdict;
}

/// Lists the pull requests attached to a branch.
pub trait PullRequestLister {
    /// Requests targeting `branch`, in their defined order.
    fn incoming(&self, branch: &Branch) -> Vec<PullRequest>;
    /// Requests originating from `branch`, in their defined order.
    fn outgoing(&self, branch: &Branch) -> Vec<PullRequest>;
}

impl<T: ProjectResolver + ?Sized> ProjectResolver for Arc<T> {
    fn resolve_project(&self, repository: &str) -> Result<Project, Error> {
        (**self).resolve_project(repository)
    }
}

impl<T: BranchResolver + ?Sized> BranchResolver for Arc<T> {
    fn find_branch(&self, project: &Project, name: &str) -> Option<Branch> {
        (**self).find_branch(project, name)
    }
}

impl<T: PermissionCheck + ?Sized> PermissionCheck for Arc<T> {
    fn is_project_admin(&self, actor: &Actor, project: &Project) -> bool {
        (**self).is_project_admin(actor, project)
    }
}

impl<T: Gatekeeper + ?Sized> Gatekeeper for Arc<T> {
    fn check_commit(&self, actor: &Actor, branch: &Branch, new: &str) -> Verdict {
        (**self).check_commit(actor, branch, new)
    }
}

impl<T: PullRequestLister + ?Sized> PullRequestLister for Arc<T> {
    fn incoming(&self, branch: &Branch) -> Vec<PullRequest> {
        (**self).incoming(branch)
    }

    fn outgoing(&self, branch: &Branch) -> Vec<PullRequest> {
        (**self).outgoing(branch)
    }
}

/// The full set of collaborators a [`PreReceive`][crate::PreReceive] engine works with.
///
/// Everything is `Send + Sync` so one engine can serve concurrent invocations.
pub struct Collaborators {
    pub projects: Box<dyn ProjectResolver + Send + Sync>,
    pub branches: Box<dyn BranchResolver + Send + Sync>,
    pub permissions: Box<dyn PermissionCheck + Send + Sync>,
    pub gatekeeper: Box<dyn Gatekeeper + Send + Sync>,
    pub requests: Box<dyn PullRequestLister + Send + Sync>,
}

impl Collaborators {
    pub fn new(
        projects: impl ProjectResolver + Send + Sync + 'static,
        branches: impl BranchResolver + Send + Sync + 'static,
        permissions: impl PermissionCheck + Send + Sync + 'static,
        gatekeeper: impl Gatekeeper + Send + Sync + 'static,
        requests: impl PullRequestLister + Send + Sync + 'static,
    ) -> Self {
        Self {
            projects: Box::new(projects),
            branches: Box::new(branches),
            permissions: Box::new(permissions),
            gatekeeper: Box::new(gatekeeper),
            requests: Box::new(requests),
        }
    }

    /// Use `shared` for every role.
    pub fn from_shared<T>(shared: Arc<T>) -> Self
    where
        T: ProjectResolver + BranchResolver + PermissionCheck + Gatekeeper + PullRequestLister + Send + Sync + 'static,
    {
        Self::new(
            Arc::clone(&shared),
            Arc::clone(&shared),
            Arc::clone(&shared),
            Arc::clone(&shared),
            shared,
        )
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

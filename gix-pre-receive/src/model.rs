//! The entities a push is judged against.
//!
//! All of these are owned by systems outside of this crate and are only read during evaluation.

/// The authenticated identity performing the push.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Actor {
    pub name: String,
}

impl Actor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// The project that owns the repository being pushed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Project {
    pub name: String,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A branch of a project, identified by its short name like `main`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Branch {
    /// Name of the owning project.
    pub project: String,
    /// Short branch name, without `refs/heads/`.
    pub name: String,
}

impl Branch {
    pub fn new(project: &Project, name: impl Into<String>) -> Self {
        Self {
            project: project.name.clone(),
            name: name.into(),
        }
    }
}

/// Lifecycle of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RequestState {
    Open,
    Closed,
}

/// A request to merge one branch into another.
///
/// Seen from a branch it is either incoming (the branch is the target) or outgoing (the branch is the source).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PullRequest {
    pub id: u64,
    pub title: String,
    pub state: RequestState,
}

impl PullRequest {
    pub fn new(id: u64, title: impl Into<String>, state: RequestState) -> Self {
        Self {
            id,
            title: title.into(),
            state,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == RequestState::Open
    }
}

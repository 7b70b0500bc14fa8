//! Client-side view of the staging repository state machine.
//!
//! ```text
//! NotCreated -> Open -> Closing -> Closed -> Released | Dropped
//! ```
//!
//! The server is authoritative. Before each transition the orchestrator
//! fetches the repository, maps it to a [`LifecycleState`] and asks the
//! [`Transition`] whether it may proceed.

use std::fmt;

use stagehand_util::errors::StagehandError;

use crate::model::{RepositoryType, StagingRepository};

/// State of an existing repository as last observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Open,
    /// Any server-side transition in flight (closing, releasing, dropping).
    Transitioning,
    Closed,
    Released,
    Dropped,
    Unknown,
}

impl LifecycleState {
    pub fn observe(repository: &StagingRepository) -> Self {
        if repository.transitioning {
            return LifecycleState::Transitioning;
        }
        match repository.kind {
            RepositoryType::Open => LifecycleState::Open,
            RepositoryType::Closed => LifecycleState::Closed,
            RepositoryType::Released => LifecycleState::Released,
            RepositoryType::Dropped => LifecycleState::Dropped,
            RepositoryType::Unknown => LifecycleState::Unknown,
        }
    }

    /// Released and dropped repositories accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, LifecycleState::Released | LifecycleState::Dropped)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Open => "open",
            LifecycleState::Transitioning => "transitioning",
            LifecycleState::Closed => "closed",
            LifecycleState::Released => "released",
            LifecycleState::Dropped => "dropped",
            LifecycleState::Unknown => "in an unknown state",
        };
        f.write_str(name)
    }
}

/// A transition the orchestrator can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Close,
    Release,
    Drop,
}

impl Transition {
    pub fn verb(self) -> &'static str {
        match self {
            Transition::Close => "close",
            Transition::Release => "release",
            Transition::Drop => "drop",
        }
    }

    pub fn allowed_from(self, state: LifecycleState) -> bool {
        match self {
            Transition::Close => state == LifecycleState::Open,
            Transition::Release => state == LifecycleState::Closed,
            Transition::Drop => matches!(state, LifecycleState::Open | LifecycleState::Closed),
        }
    }

    /// Reject the transition with [`StagehandError::InvalidTransition`] if
    /// `repository` is not in a state that permits it.
    pub fn check(self, repository: &StagingRepository) -> miette::Result<()> {
        let state = LifecycleState::observe(repository);
        if self.allowed_from(state) {
            return Ok(());
        }
        Err(StagehandError::InvalidTransition {
            repository_id: repository.id.clone(),
            action: self.verb().to_string(),
            observed: state.to_string(),
        }
        .into())
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

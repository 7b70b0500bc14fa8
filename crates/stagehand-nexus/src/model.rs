//! Staging API payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Every staging payload is wrapped in `{"data": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Data<T> {
    pub data: T,
}

impl<T> Data<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// A permission scope under which repositories may be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagingProfile {
    pub id: String,
    pub name: String,
}

/// Server-side type of a staging repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryType {
    Open,
    Closed,
    Released,
    Dropped,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for RepositoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RepositoryType::Open => "open",
            RepositoryType::Closed => "closed",
            RepositoryType::Released => "released",
            RepositoryType::Dropped => "dropped",
            RepositoryType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// A staging repository as last observed on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagingRepository {
    #[serde(rename = "repositoryId")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RepositoryType,
    /// A server-side transition is in flight; no new transition may be requested.
    #[serde(default)]
    pub transitioning: bool,
}

impl StagingRepository {
    /// Closed and settled: ready to be released or dropped.
    pub fn is_closed(&self) -> bool {
        self.kind == RepositoryType::Closed && !self.transitioning
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Description {
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedRepository {
    #[serde(default)]
    pub staged_repository_id: Option<String>,
}

/// Body of the bulk close/promote/drop endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionInput {
    pub staged_repository_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_drop_after_release: Option<bool>,
}

/// Emitted once per uploaded file; `index` is zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadProgress {
    pub index: usize,
    pub total: usize,
    pub path: String,
}

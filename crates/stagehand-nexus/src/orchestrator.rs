//! Drives one staging repository through its lifecycle.
//!
//! All calls are sequential: one repository, one operation at a time.
//! Every transition re-reads the repository first and is rejected locally
//! if the observed state does not allow it.

use std::path::Path;

use stagehand_core::settings::WaitPolicy;
use stagehand_util::errors::StagehandError;

use crate::api::StagingApi;
use crate::lifecycle::{LifecycleState, Transition};
use crate::model::{StagingRepository, UploadProgress};
use crate::profile::{self, ProfileResolution};
use crate::upload;

pub const DEFAULT_DESCRIPTION: &str = "Stagehand Staging Repository";

/// Reported once per poll while waiting for a repository to close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollProgress {
    /// One-based attempt number.
    pub attempt: u32,
    pub max_attempts: Option<u32>,
    pub repository: StagingRepository,
}

pub struct StagingOrchestrator<A> {
    api: A,
}

impl<A: StagingApi> StagingOrchestrator<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Pick the profile to stage under. Profiles are only fetched when no
    /// explicit id is given.
    pub async fn resolve_profile(&self, explicit: Option<&str>) -> miette::Result<ProfileResolution> {
        if let Some(id) = explicit.filter(|id| !id.is_empty()) {
            return Ok(ProfileResolution::Selected(id.to_string()));
        }
        let profiles = self.api.list_profiles().await?;
        Ok(profile::resolve_profile(None, profiles))
    }

    /// Open a new repository under `profile_id`.
    pub async fn create(&self, profile_id: &str, description: &str) -> miette::Result<String> {
        let id = self.api.create_repository(profile_id, description).await?;
        tracing::info!("created staging repository {id} under profile {profile_id}");
        Ok(id)
    }

    /// Deploy every file of a prepared tree. See [`upload::upload_directory`].
    pub async fn upload<F>(
        &self,
        repository_id: &str,
        directory: &Path,
        on_progress: F,
    ) -> miette::Result<usize>
    where
        F: FnMut(&UploadProgress),
    {
        upload::upload_directory(&self.api, repository_id, directory, on_progress).await
    }

    /// Ask the server to validate and close an open repository.
    ///
    /// Returns as soon as the request is accepted; use [`Self::wait_for_close`]
    /// to wait for the outcome.
    pub async fn close(&self, repository_id: &str) -> miette::Result<()> {
        self.guard(repository_id, Transition::Close).await?;
        self.api.close_repositories(&[repository_id.to_string()]).await?;
        tracing::info!("close requested for {repository_id}");
        Ok(())
    }

    /// Poll until the repository is closed and settled.
    ///
    /// `on_poll` runs once per attempt. The wait fails with
    /// [`StagehandError::CloseTimeout`] once `policy.max_attempts` polls have
    /// been made, or immediately if the repository reaches a terminal state.
    pub async fn wait_for_close<F>(
        &self,
        repository_id: &str,
        policy: &WaitPolicy,
        mut on_poll: F,
    ) -> miette::Result<StagingRepository>
    where
        F: FnMut(&PollProgress),
    {
        let mut attempt: u32 = 0;
        loop {
            attempt = attempt.saturating_add(1);
            let repository = self.api.get_repository(repository_id).await?;
            tracing::debug!(
                "poll {attempt}: {repository_id} is {} (transitioning: {})",
                repository.kind,
                repository.transitioning
            );
            on_poll(&PollProgress {
                attempt,
                max_attempts: policy.max_attempts,
                repository: repository.clone(),
            });

            if repository.is_closed() {
                tracing::info!("{repository_id} closed after {attempt} polls");
                return Ok(repository);
            }
            let state = LifecycleState::observe(&repository);
            if state.is_terminal() {
                return Err(StagehandError::InvalidTransition {
                    repository_id: repository_id.to_string(),
                    action: "wait for close of".to_string(),
                    observed: state.to_string(),
                }
                .into());
            }
            if policy.max_attempts.is_some_and(|max| attempt >= max) {
                return Err(StagehandError::CloseTimeout {
                    repository_id: repository_id.to_string(),
                    attempts: attempt,
                }
                .into());
            }
            tokio::time::sleep(policy.interval).await;
        }
    }

    /// Promote a closed repository. Irreversible.
    pub async fn release(
        &self,
        repository_id: &str,
        auto_drop_after_release: bool,
    ) -> miette::Result<()> {
        self.guard(repository_id, Transition::Release).await?;
        self.api
            .release_repositories(&[repository_id.to_string()], auto_drop_after_release)
            .await?;
        tracing::info!("released {repository_id} (auto drop: {auto_drop_after_release})");
        Ok(())
    }

    /// Delete a repository and everything uploaded to it.
    pub async fn drop(&self, repository_id: &str) -> miette::Result<()> {
        self.guard(repository_id, Transition::Drop).await?;
        self.api.drop_repositories(&[repository_id.to_string()]).await?;
        tracing::info!("dropped {repository_id}");
        Ok(())
    }

    /// Close, wait for the close to settle, then release.
    pub async fn close_and_release<F>(
        &self,
        repository_id: &str,
        auto_drop_after_release: bool,
        policy: &WaitPolicy,
        on_poll: F,
    ) -> miette::Result<()>
    where
        F: FnMut(&PollProgress),
    {
        self.close(repository_id).await?;
        self.wait_for_close(repository_id, policy, on_poll).await?;
        self.release(repository_id, auto_drop_after_release).await
    }

    async fn guard(&self, repository_id: &str, transition: Transition) -> miette::Result<()> {
        let repository = self.api.get_repository(repository_id).await?;
        transition.check(&repository)
    }
}

pub mod ops_close;
pub mod ops_close_and_release;
pub mod ops_drop;
pub mod ops_prepare;
pub mod ops_profiles;
pub mod ops_publish;
pub mod ops_release;
pub mod ops_repositories;
pub mod ops_upload;
pub mod ops_verify;

use std::path::Path;

use stagehand_core::settings::Settings;
use stagehand_nexus::api::{NexusClient, StagingApi};
use stagehand_nexus::orchestrator::StagingOrchestrator;
use stagehand_nexus::profile::{describe_candidates, ProfileResolution};
use stagehand_util::errors::StagehandError;
use stagehand_util::progress::{status_info, PollSpinner, TransferBar};

/// Build an orchestrator talking to the configured repository manager.
pub fn connect(settings: &Settings) -> miette::Result<StagingOrchestrator<NexusClient>> {
    let client = NexusClient::new(&settings.nexus.base_url, settings.credentials()?)?;
    Ok(StagingOrchestrator::new(client))
}

/// Resolve the staging profile, turning "no profile" and "several profiles"
/// into configuration errors that list what the user can pass.
pub async fn select_profile<A: StagingApi>(
    orchestrator: &StagingOrchestrator<A>,
    explicit: Option<&str>,
) -> miette::Result<String> {
    if explicit.is_none() {
        status_info("Looking up", "staging profile");
    }
    match orchestrator.resolve_profile(explicit).await? {
        ProfileResolution::Selected(id) => Ok(id),
        ProfileResolution::NoProfiles => Err(StagehandError::Config {
            message: "No staging profile is available for this account".to_string(),
        }
        .into()),
        ProfileResolution::Ambiguous(profiles) => Err(StagehandError::Config {
            message: format!(
                "Multiple staging profiles found. Use one of:\n{}",
                describe_candidates(&profiles)
            ),
        }
        .into()),
    }
}

/// Upload `dir` with a progress bar.
pub async fn upload_with_progress<A: StagingApi>(
    orchestrator: &StagingOrchestrator<A>,
    repository_id: &str,
    dir: &Path,
) -> miette::Result<usize> {
    let mut bar = TransferBar::new();
    let result = orchestrator
        .upload(repository_id, dir, |p| bar.advance(p.total, &p.path))
        .await;
    bar.finish();
    result
}

/// Wait for a close to settle, ticking a spinner once per poll.
pub async fn wait_with_spinner<A: StagingApi>(
    orchestrator: &StagingOrchestrator<A>,
    settings: &Settings,
    repository_id: &str,
) -> miette::Result<()> {
    let spinner = PollSpinner::new(repository_id);
    let result = orchestrator
        .wait_for_close(repository_id, &settings.wait, |p| {
            spinner.poll(p.attempt, p.max_attempts, &p.repository.kind.to_string())
        })
        .await;
    spinner.finish();
    result.map(|_| ())
}

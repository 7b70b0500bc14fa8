//! Operation: list the account's staging repositories.

use stagehand_core::settings::Settings;
use stagehand_nexus::api::StagingApi;

pub async fn list(settings: &Settings) -> miette::Result<()> {
    let orchestrator = crate::connect(settings)?;
    let repositories = orchestrator.api().list_repositories().await?;

    if repositories.is_empty() {
        println!("No staging repositories.");
        return Ok(());
    }
    for repo in repositories {
        let note = if repo.transitioning { " (transitioning)" } else { "" };
        println!("{:<32} {}{note}", repo.id, repo.kind);
    }
    Ok(())
}

//! Operation: list the staging profiles available to the account.

use stagehand_core::settings::Settings;
use stagehand_nexus::api::StagingApi;

pub async fn list(settings: &Settings) -> miette::Result<()> {
    let orchestrator = crate::connect(settings)?;
    let profiles = orchestrator.api().list_profiles().await?;

    if profiles.is_empty() {
        println!("No staging profiles.");
        return Ok(());
    }
    for profile in profiles {
        println!("{:<24} {}", profile.id, profile.name);
    }
    Ok(())
}

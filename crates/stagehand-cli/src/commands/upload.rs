use std::path::Path;

use miette::Result;

use stagehand_core::settings::Settings;

pub async fn exec(settings: &Settings, dir: &Path, description: &str) -> Result<()> {
    let repository_id = stagehand_ops::ops_upload::upload(settings, dir, description).await?;
    println!("{repository_id}");
    Ok(())
}

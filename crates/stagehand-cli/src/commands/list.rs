use miette::Result;

use stagehand_core::settings::Settings;
use stagehand_ops::{ops_profiles, ops_repositories};

pub async fn profiles(settings: &Settings) -> Result<()> {
    ops_profiles::list(settings).await
}

pub async fn repositories(settings: &Settings) -> Result<()> {
    ops_repositories::list(settings).await
}

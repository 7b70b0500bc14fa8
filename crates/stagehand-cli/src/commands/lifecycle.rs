use miette::Result;

use stagehand_core::settings::Settings;
use stagehand_ops::{ops_close, ops_close_and_release, ops_drop, ops_release};

pub async fn close(settings: &Settings, repository_id: &str) -> Result<()> {
    ops_close::close(settings, repository_id).await
}

pub async fn release(settings: &Settings, repository_id: &str, drop_after_release: bool) -> Result<()> {
    ops_release::release(settings, repository_id, drop_after_release).await
}

pub async fn drop(settings: &Settings, repository_id: &str) -> Result<()> {
    ops_drop::drop_repository(settings, repository_id).await
}

pub async fn close_and_release(
    settings: &Settings,
    repository_id: &str,
    drop_after_release: bool,
) -> Result<()> {
    ops_close_and_release::close_and_release(settings, repository_id, drop_after_release).await
}

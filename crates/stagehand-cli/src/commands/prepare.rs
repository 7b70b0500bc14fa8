use miette::Result;

use stagehand_core::settings::Settings;
use stagehand_ops::ops_prepare::{self, PrepareOptions};
use stagehand_ops::ops_publish::{self, PublishOptions};

use crate::cli::PrepareArgs;

fn options(args: &PrepareArgs) -> PrepareOptions {
    PrepareOptions {
        input: args.input.clone(),
        scratch: args.scratch.clone(),
        group: args.group.clone(),
        versions_file: args.versions.clone(),
    }
}

pub fn prepare(settings: &Settings, args: &PrepareArgs) -> Result<()> {
    ops_prepare::prepare(settings, &options(args))?;
    Ok(())
}

pub async fn publish(
    settings: &Settings,
    args: &PrepareArgs,
    description: String,
    release: bool,
    drop_after_release: bool,
) -> Result<()> {
    let options = PublishOptions {
        prepare: options(args),
        description,
        release,
        drop_after_release,
    };
    ops_publish::publish(settings, &options).await?;
    Ok(())
}

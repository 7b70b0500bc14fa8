//! Command dispatch and handler modules.

mod lifecycle;
mod list;
mod prepare;
mod upload;
mod verify;

use miette::Result;

use stagehand_core::config::GlobalConfig;
use stagehand_core::settings::{Overrides, PomDefaults, Settings};

use crate::cli::{Cli, Command, GlobalArgs, PomArgs, SigningArgs};

/// Route a parsed CLI invocation to the appropriate command handler.
pub async fn dispatch(cli: Cli) -> Result<()> {
    let global = cli.global;
    match cli.command {
        Command::Upload {
            dir,
            profile_id,
            description,
        } => {
            let settings = resolve(&global, Some(profile_id), None, None)?;
            upload::exec(&settings, &dir, &description).await
        }
        Command::Close { repository_id } => {
            lifecycle::close(&resolve(&global, None, None, None)?, &repository_id).await
        }
        Command::Release {
            repository_id,
            drop_after_release,
        } => {
            let settings = resolve(&global, None, None, None)?;
            lifecycle::release(&settings, &repository_id, drop_after_release).await
        }
        Command::Drop { repository_id } => {
            lifecycle::drop(&resolve(&global, None, None, None)?, &repository_id).await
        }
        Command::CloseAndRelease {
            repository_id,
            drop_after_release,
        } => {
            let settings = resolve(&global, None, None, None)?;
            lifecycle::close_and_release(&settings, &repository_id, drop_after_release).await
        }
        Command::Prepare { args } => {
            let settings = resolve(&global, None, Some(&args.signing), Some(&args.pom))?;
            prepare::prepare(&settings, &args)
        }
        Command::Publish {
            args,
            profile_id,
            description,
            release,
            drop_after_release,
        } => {
            let settings = resolve(
                &global,
                Some(profile_id),
                Some(&args.signing),
                Some(&args.pom),
            )?;
            prepare::publish(&settings, &args, description, release, drop_after_release).await
        }
        Command::Profiles => list::profiles(&resolve(&global, None, None, None)?).await,
        Command::Repositories => list::repositories(&resolve(&global, None, None, None)?).await,
        Command::Verify { dir } => verify::exec(&dir),
    }
}

/// Build the settings for one invocation: flags and environment (already
/// merged by clap) over the config file over built-in defaults.
fn resolve(
    global: &GlobalArgs,
    profile_id: Option<Option<String>>,
    signing: Option<&SigningArgs>,
    pom: Option<&PomArgs>,
) -> Result<Settings> {
    let file = match &global.config {
        Some(path) => GlobalConfig::load_from(path)?,
        None => GlobalConfig::load()?,
    };

    let signing = signing.cloned().unwrap_or_default();
    // An explicit key file wins over the GPG_PRIVATE_KEY environment fallback.
    let private_key = match signing.private_key {
        Some(_) => None,
        None => signing.private_key_text,
    };
    let pom = pom.cloned().unwrap_or_default();

    let overrides = Overrides {
        base_url: global.base_url.clone(),
        username: global.username.clone(),
        password: global.password.clone(),
        profile_id: profile_id.flatten(),
        private_key,
        private_key_file: signing.private_key,
        passphrase: signing.private_key_password,
        poll_interval_secs: global.poll_interval,
        max_polls: global.max_polls,
        pom: PomDefaults {
            project_url: pom.pom_project_url,
            license_name: pom.pom_license_name,
            license_url: pom.pom_license_url,
            developer_name: pom.pom_developer_name,
            scm_url: pom.pom_scm_url,
        },
    };
    let settings = Settings::resolve(&file, overrides)?;
    tracing::debug!("resolved {settings:?}");
    Ok(settings)
}

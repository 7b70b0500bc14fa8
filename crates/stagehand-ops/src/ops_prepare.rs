//! Operation: sign, checksum and patch artifacts into a scratch directory.

use std::path::PathBuf;

use stagehand_artifacts::pom::PomPatcher;
use stagehand_artifacts::prepare::{
    discover_versions, read_version_filter, validate_group, ArtifactPreparer, PrepareReport,
    PrepareRequest,
};
use stagehand_artifacts::signing::PgpSigner;
use stagehand_core::settings::Settings;
use stagehand_util::progress::{status, status_info};

/// Where artifacts come from and where the staged tree goes.
#[derive(Debug, Clone)]
pub struct PrepareOptions {
    /// Tree starting below the group: `<module>/<version>/<files>`.
    pub input: PathBuf,
    pub scratch: PathBuf,
    pub group: String,
    /// File listing the versions to include, one per line.
    pub versions_file: Option<PathBuf>,
}

impl PrepareOptions {
    pub fn request(&self, versions: Option<Vec<String>>) -> PrepareRequest {
        PrepareRequest {
            source_root: self.input.clone(),
            dest_root: self.scratch.clone(),
            group: self.group.clone(),
            versions,
        }
    }

    /// Versions to process in lexical order: every version found under the
    /// input, narrowed by the versions file if one was given.
    pub fn selected_versions(&self) -> miette::Result<Vec<String>> {
        let all = discover_versions(&self.input)?;
        match &self.versions_file {
            Some(path) => {
                let wanted = read_version_filter(path)?;
                Ok(all.into_iter().filter(|v| wanted.contains(v)).collect())
            }
            None => Ok(all),
        }
    }
}

/// Signer and patcher built from settings; the key is unlocked once.
pub struct Toolbox {
    pub signer: PgpSigner,
    pub patcher: PomPatcher,
}

impl Toolbox {
    pub fn from_settings(settings: &Settings) -> miette::Result<Self> {
        let (key, passphrase) = settings.signing_key()?;
        Ok(Self {
            signer: PgpSigner::from_armored(key, passphrase)?,
            patcher: PomPatcher::new(settings.pom.clone())?,
        })
    }

    pub fn preparer(&self) -> ArtifactPreparer<'_> {
        ArtifactPreparer::new(&self.signer, &self.patcher)
    }
}

/// Prepare every selected version at once into `options.scratch`.
pub fn prepare(settings: &Settings, options: &PrepareOptions) -> miette::Result<PrepareReport> {
    validate_group(&options.group)?;
    let toolbox = Toolbox::from_settings(settings)?;
    let versions = match options.versions_file {
        Some(_) => Some(options.selected_versions()?),
        None => None,
    };

    let report = toolbox.preparer().prepare(&options.request(versions))?;
    for (module, version) in &report.versions {
        status("Prepared", &format!("{}:{module}:{version}", options.group));
    }
    status_info(
        "Finished",
        &format!(
            "{} files written to {} ({} new signatures)",
            report.files_written(),
            options.scratch.display(),
            report.signatures_generated()
        ),
    );
    Ok(report)
}

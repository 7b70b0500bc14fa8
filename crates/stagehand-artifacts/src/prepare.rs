//! Build a signed, checksummed Maven-layout tree ready for upload.
//!
//! The source tree starts below the group: `<source>/<module>/<version>/<file>`.
//! The destination mirrors it under the group path:
//! `<dest>/<group as path>/<module>/<version>/<file>` plus sidecars.

use std::path::{Path, PathBuf};

use stagehand_util::errors::StagehandError;
use stagehand_util::fs::{
    ensure_dir, relative_slash_path, remove_dir_if_exists, sorted_files, sorted_subdirs,
};
use stagehand_util::hash::{digest_file, Algorithm};

use crate::pom::PomPatcher;
use crate::sidecar::{data_path_for, is_sidecar, write_md5, Sidecar, SidecarSource};
use crate::signing::Signer;

/// Inputs of a preparation run.
#[derive(Debug, Clone)]
pub struct PrepareRequest {
    pub source_root: PathBuf,
    pub dest_root: PathBuf,
    /// Maven group, e.g. `com.example.tools`.
    pub group: String,
    /// Only versions in this list are prepared; `None` prepares all of them.
    pub versions: Option<Vec<String>>,
}

impl PrepareRequest {
    /// Destination directory holding every module of the group.
    pub fn group_dir(&self) -> PathBuf {
        self.dest_root.join(group_path(&self.group))
    }
}

/// One publishable file and what happened to its sidecars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFile {
    /// Path below the destination root, `/`-separated.
    pub relative_path: String,
    /// True when the published bytes differ from the source bytes.
    pub content_changed: bool,
    pub md5: SidecarSource,
    pub asc: SidecarSource,
    pub asc_md5: SidecarSource,
}

/// Outcome of [`ArtifactPreparer::prepare`].
#[derive(Debug, Clone, Default)]
pub struct PrepareReport {
    /// `module/version` pairs in processing order.
    pub versions: Vec<(String, String)>,
    pub artifacts: Vec<ArtifactFile>,
}

impl PrepareReport {
    /// Number of fresh signatures produced during the run.
    pub fn signatures_generated(&self) -> usize {
        self.artifacts
            .iter()
            .filter(|a| a.asc == SidecarSource::Generated)
            .count()
    }

    /// Number of files (data and sidecars) written to the destination.
    pub fn files_written(&self) -> usize {
        self.artifacts.len() * 4
    }
}

/// Copies artifacts into the staging layout and fills in their sidecars.
pub struct ArtifactPreparer<'a> {
    signer: &'a dyn Signer,
    patcher: &'a PomPatcher,
}

impl<'a> ArtifactPreparer<'a> {
    pub fn new(signer: &'a dyn Signer, patcher: &'a PomPatcher) -> Self {
        Self { signer, patcher }
    }

    /// Prepare every selected module/version, in lexical order.
    ///
    /// The destination group directory is cleared first, so the tree only
    /// holds what this run produced. Any error aborts the whole run.
    pub fn prepare(&self, request: &PrepareRequest) -> miette::Result<PrepareReport> {
        if !request.source_root.is_dir() {
            return Err(StagehandError::Generic {
                message: format!(
                    "Source directory {} does not exist",
                    request.source_root.display()
                ),
            }
            .into());
        }

        validate_group(&request.group)?;
        let group_dir = request.group_dir();
        if group_dir == request.dest_root || !group_dir.starts_with(&request.dest_root) {
            return Err(StagehandError::Config {
                message: format!(
                    "Group directory {} is not inside {}",
                    group_dir.display(),
                    request.dest_root.display()
                ),
            }
            .into());
        }
        remove_dir_if_exists(&group_dir).map_err(StagehandError::Io)?;

        let mut report = PrepareReport::default();
        for module_dir in sorted_subdirs(&request.source_root).map_err(StagehandError::Io)? {
            let module = file_name(&module_dir);
            for version_dir in sorted_subdirs(&module_dir).map_err(StagehandError::Io)? {
                let version = file_name(&version_dir);
                if let Some(filter) = &request.versions {
                    if !filter.contains(&version) {
                        continue;
                    }
                }
                tracing::info!("preparing {module}/{version}");

                let dest_dir = group_dir.join(&module).join(&version);
                ensure_dir(&dest_dir).map_err(StagehandError::Io)?;
                for source in sorted_files(&version_dir).map_err(StagehandError::Io)? {
                    if is_sidecar(&source) {
                        if !data_path_for(&source).is_file() {
                            tracing::warn!("ignoring {} without a data file", source.display());
                        }
                        continue;
                    }
                    let artifact = self.prepare_file(&source, &dest_dir, &request.dest_root)?;
                    report.artifacts.push(artifact);
                }
                report.versions.push((module.clone(), version));
            }
        }
        Ok(report)
    }

    /// Write one data file and its three sidecars into `dest_dir`.
    ///
    /// Order matters: data, then `md5(data)`, then `asc(data)`, then `md5(asc)`.
    fn prepare_file(
        &self,
        source: &Path,
        dest_dir: &Path,
        dest_root: &Path,
    ) -> miette::Result<ArtifactFile> {
        let data = dest_dir.join(source.file_name().unwrap_or_default());
        self.write_data(source, &data)?;

        let content_changed = digest_file(source, Algorithm::Sha256).map_err(StagehandError::Io)?
            != digest_file(&data, Algorithm::Sha256).map_err(StagehandError::Io)?;

        let md5 = reuse_or_generate(source, &data, Sidecar::Md5, content_changed, |out| {
            write_md5(&data, out)
        })?;

        let asc = reuse_or_generate(source, &data, Sidecar::Asc, content_changed, |out| {
            let mut file = std::fs::File::open(&data).map_err(StagehandError::Io)?;
            let signature = self.signer.sign(&mut file)?;
            std::fs::write(out, signature).map_err(StagehandError::Io)?;
            Ok(())
        })?;

        // A fresh signature invalidates any checksum shipped for the old one.
        let signature = Sidecar::Asc.path_for(&data);
        let asc_md5 = reuse_or_generate(
            source,
            &data,
            Sidecar::AscMd5,
            content_changed || asc == SidecarSource::Generated,
            |out| write_md5(&signature, out),
        )?;

        Ok(ArtifactFile {
            relative_path: relative_slash_path(dest_root, &data).unwrap_or_default(),
            content_changed,
            md5,
            asc,
            asc_md5,
        })
    }

    fn write_data(&self, source: &Path, dest: &Path) -> miette::Result<()> {
        let is_pom = source.extension().is_some_and(|e| e == "pom");
        if is_pom {
            let xml = std::fs::read_to_string(source).map_err(StagehandError::Io)?;
            if let Some(patched) = self.patcher.patch(&xml)? {
                tracing::debug!("patched {}", source.display());
                std::fs::write(dest, patched).map_err(StagehandError::Io)?;
                return Ok(());
            }
        }
        std::fs::copy(source, dest).map_err(StagehandError::Io)?;
        Ok(())
    }
}

/// Copy `kind`'s sidecar from next to `source` when allowed, else generate it.
fn reuse_or_generate<F>(
    source: &Path,
    data: &Path,
    kind: Sidecar,
    must_regenerate: bool,
    generate: F,
) -> miette::Result<SidecarSource>
where
    F: FnOnce(&Path) -> miette::Result<()>,
{
    let existing = kind.path_for(source);
    let out = kind.path_for(data);
    if !must_regenerate && existing.is_file() {
        std::fs::copy(&existing, &out).map_err(StagehandError::Io)?;
        tracing::debug!("reused {}", existing.display());
        Ok(SidecarSource::Reused)
    } else {
        generate(&out)?;
        tracing::debug!("generated {}", out.display());
        Ok(SidecarSource::Generated)
    }
}

/// `com.example.tools` → `com/example/tools`.
pub fn group_path(group: &str) -> String {
    group.replace('.', "/")
}

/// Check that `group` is a dotted Maven group whose path stays below the
/// destination root.
pub fn validate_group(group: &str) -> miette::Result<()> {
    let bad_segment = group
        .split('.')
        .any(|segment| segment.trim().is_empty() || segment.contains(['/', '\\', ':']));
    if bad_segment {
        return Err(StagehandError::Config {
            message: format!(
                "Invalid group '{group}': expected dot-separated names such as com.example.tools"
            ),
        }
        .into());
    }
    Ok(())
}

/// Read a version filter file: one version per line, `/` and blank lines ignored.
pub fn read_version_filter(path: &Path) -> miette::Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(StagehandError::Io)?;
    Ok(parse_version_filter(&content))
}

pub fn parse_version_filter(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.replace('/', "").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Every version directory name found under any module, sorted and deduplicated.
pub fn discover_versions(source_root: &Path) -> miette::Result<Vec<String>> {
    let mut versions = Vec::new();
    for module_dir in sorted_subdirs(source_root).map_err(StagehandError::Io)? {
        for version_dir in sorted_subdirs(&module_dir).map_err(StagehandError::Io)? {
            versions.push(file_name(&version_dir));
        }
    }
    versions.sort();
    versions.dedup();
    Ok(versions)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

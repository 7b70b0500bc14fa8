//! Checksum and signature sidecar files.
//!
//! A sidecar is named by appending a suffix to its data file's name:
//! `lib-1.0.jar` → `lib-1.0.jar.md5`, `lib-1.0.jar.asc`, `lib-1.0.jar.asc.md5`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use stagehand_util::errors::StagehandError;
use stagehand_util::fs::{relative_slash_path, walk_files};
use stagehand_util::hash::{digest_file, extract_hash, Algorithm};

/// Extensions that mark a file as a sidecar rather than publishable data.
const SIDECAR_EXTENSIONS: &[&str] = &["md5", "sha1", "sha256", "sha512", "asc"];

/// The three sidecars uploaded next to every data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sidecar {
    /// Checksum of the data file.
    Md5,
    /// Detached signature of the data file.
    Asc,
    /// Checksum of the signature file.
    AscMd5,
}

impl Sidecar {
    pub fn suffix(self) -> &'static str {
        match self {
            Sidecar::Md5 => ".md5",
            Sidecar::Asc => ".asc",
            Sidecar::AscMd5 => ".asc.md5",
        }
    }

    /// Path of this sidecar for the given data file.
    pub fn path_for(self, data: &Path) -> PathBuf {
        with_suffix(data, self.suffix())
    }
}

/// Whether a file was copied from the source tree or computed fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidecarSource {
    Reused,
    Generated,
}

/// True for checksum and signature files, which are never treated as data.
pub fn is_sidecar(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SIDECAR_EXTENSIONS.contains(&ext))
}

/// Data file a sidecar belongs to: `lib.jar.asc.md5` → `lib.jar`.
pub fn data_path_for(sidecar: &Path) -> PathBuf {
    let mut path = sidecar.to_path_buf();
    while is_sidecar(&path) {
        path.set_extension("");
    }
    path
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Write the MD5 of `source` to `dest` as a bare lowercase hex string.
pub fn write_md5(source: &Path, dest: &Path) -> miette::Result<()> {
    let md5 = digest_file(source, Algorithm::Md5).map_err(StagehandError::Io)?;
    std::fs::write(dest, md5).map_err(StagehandError::Io)?;
    Ok(())
}

/// Check a checksum sidecar against the file it describes.
pub fn checksum_matches(data: &Path, sidecar: &Path, algorithm: Algorithm) -> miette::Result<bool> {
    let expected = std::fs::read_to_string(sidecar).map_err(StagehandError::Io)?;
    let actual = digest_file(data, algorithm).map_err(StagehandError::Io)?;
    Ok(actual.eq_ignore_ascii_case(&extract_hash(&expected)))
}

/// A problem found while verifying a prepared tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyIssue {
    Missing { path: String },
    Mismatch { path: String },
}

impl std::fmt::Display for VerifyIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerifyIssue::Missing { path } => write!(f, "missing {path}"),
            VerifyIssue::Mismatch { path } => write!(f, "checksum mismatch in {path}"),
        }
    }
}

/// Check that every data file under `root` carries all three sidecars and
/// that both checksums match.
///
/// Signatures are only checked for presence; verifying them needs the public key.
pub fn verify_tree(root: &Path) -> miette::Result<Vec<VerifyIssue>> {
    let mut issues = Vec::new();
    for data in walk_files(root).map_err(StagehandError::Io)? {
        if is_sidecar(&data) {
            continue;
        }
        let checks = [
            (Sidecar::Md5, Some(data.clone())),
            (Sidecar::Asc, None),
            (Sidecar::AscMd5, Some(Sidecar::Asc.path_for(&data))),
        ];
        for (sidecar, covered) in checks {
            let path = sidecar.path_for(&data);
            let display = relative_slash_path(root, &path).unwrap_or_default();
            if !path.is_file() {
                issues.push(VerifyIssue::Missing { path: display });
                continue;
            }
            if let Some(covered) = covered {
                if covered.is_file() && !checksum_matches(&covered, &path, Algorithm::Md5)? {
                    issues.push(VerifyIssue::Mismatch { path: display });
                }
            }
        }
    }
    Ok(issues)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidecar_detection() {
        assert!(is_sidecar(Path::new("lib-1.0.jar.md5")));
        assert!(is_sidecar(Path::new("lib-1.0.jar.asc")));
        assert!(is_sidecar(Path::new("lib-1.0.jar.sha1")));
        assert!(!is_sidecar(Path::new("lib-1.0.jar")));
        assert!(!is_sidecar(Path::new("lib-1.0.pom")));
        assert!(!is_sidecar(Path::new("README")));
    }

    #[test]
    fn data_path_strips_every_sidecar_suffix() {
        assert_eq!(
            data_path_for(Path::new("/tmp/lib-1.0.jar.asc.md5")),
            Path::new("/tmp/lib-1.0.jar")
        );
        assert_eq!(data_path_for(Path::new("lib-1.0.pom.sha1")), Path::new("lib-1.0.pom"));
    }

    #[test]
    fn sidecar_paths_append_suffix() {
        let data = Path::new("/tmp/lib-1.0.jar");
        assert_eq!(Sidecar::Md5.path_for(data), Path::new("/tmp/lib-1.0.jar.md5"));
        assert_eq!(Sidecar::Asc.path_for(data), Path::new("/tmp/lib-1.0.jar.asc"));
        assert_eq!(
            Sidecar::AscMd5.path_for(data),
            Path::new("/tmp/lib-1.0.jar.asc.md5")
        );
    }
}

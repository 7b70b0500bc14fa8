use std::path::{Path, PathBuf};

/// Ensure a directory exists, creating it and any parents if needed.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Remove a directory tree if it exists. Missing directories are not an error.
pub fn remove_dir_if_exists(path: &Path) -> std::io::Result<()> {
    if path.exists() {
        std::fs::remove_dir_all(path)?;
    }
    Ok(())
}

/// List the immediate subdirectories of `dir`, sorted by name.
///
/// Symlinks are followed, so a linked directory counts as a directory.
pub fn sorted_subdirs(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// List the regular files directly inside `dir`, sorted by name.
///
/// Symlinks to files are included; dangling links are skipped with a warning.
pub fn sorted_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        } else if !path.exists() {
            tracing::warn!("skipping dangling link {}", path.display());
        }
    }
    files.sort();
    Ok(files)
}

/// Recursively collect every regular file under `root`, following symlinks.
///
/// Entries are sorted by name at each level, so the result is stable across
/// runs and platforms. A linked directory that points back at one of its own
/// ancestors is an error rather than an endless walk.
pub fn walk_files(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    let mut ancestors = vec![std::fs::canonicalize(root)?];
    walk_into(root, &mut ancestors, &mut out)?;
    Ok(out)
}

fn walk_into(
    dir: &Path,
    ancestors: &mut Vec<PathBuf>,
    out: &mut Vec<PathBuf>,
) -> std::io::Result<()> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)?.collect::<Result<_, _>>()?;
    entries.sort_by_key(|e| e.file_name());
    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            let real = std::fs::canonicalize(&path)?;
            if ancestors.contains(&real) {
                return Err(std::io::Error::other(format!(
                    "symlink cycle at {}",
                    path.display()
                )));
            }
            ancestors.push(real);
            walk_into(&path, ancestors, out)?;
            ancestors.pop();
        } else if path.is_file() {
            out.push(path);
        } else if !path.exists() {
            tracing::warn!("skipping dangling link {}", path.display());
        }
    }
    Ok(())
}

/// Path of `path` relative to `root`, with `/` separators regardless of platform.
pub fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

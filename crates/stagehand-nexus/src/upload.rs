//! Deploy a prepared directory into an open staging repository.

use std::path::Path;

use stagehand_util::errors::StagehandError;
use stagehand_util::fs::{relative_slash_path, walk_files};

use crate::api::StagingApi;
use crate::model::UploadProgress;

/// Upload every file below `directory`, one PUT per file, in walk order.
///
/// `on_progress` is called after each successful PUT. The first failure
/// aborts the upload; files already deployed stay in the repository.
/// Returns the number of files uploaded.
pub async fn upload_directory<A, F>(
    api: &A,
    repository_id: &str,
    directory: &Path,
    mut on_progress: F,
) -> miette::Result<usize>
where
    A: StagingApi,
    F: FnMut(&UploadProgress),
{
    if !directory.is_dir() {
        return Err(StagehandError::Generic {
            message: format!("Upload directory {} does not exist", directory.display()),
        }
        .into());
    }

    let files = walk_files(directory).map_err(StagehandError::Io)?;
    let total = files.len();
    tracing::info!("uploading {total} files to {repository_id}");

    for (index, file) in files.iter().enumerate() {
        let path = relative_slash_path(directory, file).ok_or_else(|| StagehandError::Generic {
            message: format!("{} is not below {}", file.display(), directory.display()),
        })?;
        api.deploy_file(repository_id, &path, file).await?;
        on_progress(&UploadProgress { index, total, path });
    }
    Ok(total)
}

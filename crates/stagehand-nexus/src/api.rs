//! Typed binding to the Nexus bulk staging REST API.
//!
//! | Method | Path | Body |
//! |---|---|---|
//! | GET  | `staging/profiles` | |
//! | GET  | `staging/profile_repositories` | |
//! | GET  | `staging/repository/{id}` | |
//! | POST | `staging/profiles/{profileId}/start` | `{data:{description}}` |
//! | POST | `staging/bulk/close` | `{data:{stagedRepositoryIds}}` |
//! | POST | `staging/bulk/promote` | `{data:{stagedRepositoryIds, autoDropAfterRelease}}` |
//! | POST | `staging/bulk/drop` | `{data:{stagedRepositoryIds}}` |
//! | PUT  | `staging/deployByRepositoryId/{id}/{path}` | raw bytes, streamed from disk |
//!
//! Every call either returns its typed payload or fails with
//! [`StagehandError::RemoteApi`]. Nothing is retried here.

use std::path::Path;

use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Body, Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use stagehand_core::settings::Credentials;
use stagehand_util::errors::StagehandError;

use crate::auth;
use crate::client;
use crate::model::{
    CreatedRepository, Data, Description, StagingProfile, StagingRepository, TransitionInput,
};

/// The staging operations the orchestrator depends on.
///
/// [`NexusClient`] talks HTTP; tests substitute an in-memory double.
#[allow(async_fn_in_trait)]
pub trait StagingApi {
    async fn list_profiles(&self) -> miette::Result<Vec<StagingProfile>>;

    async fn list_repositories(&self) -> miette::Result<Vec<StagingRepository>>;

    async fn get_repository(&self, repository_id: &str) -> miette::Result<StagingRepository>;

    /// Open a new staging repository and return its id.
    async fn create_repository(&self, profile_id: &str, description: &str)
        -> miette::Result<String>;

    async fn close_repositories(&self, repository_ids: &[String]) -> miette::Result<()>;

    /// Promote closed repositories. This cannot be undone.
    async fn release_repositories(
        &self,
        repository_ids: &[String],
        auto_drop_after_release: bool,
    ) -> miette::Result<()>;

    /// Delete repositories and everything uploaded to them.
    async fn drop_repositories(&self, repository_ids: &[String]) -> miette::Result<()>;

    /// Store the local `file` at `relative_path` inside an open repository.
    async fn deploy_file(
        &self,
        repository_id: &str,
        relative_path: &str,
        file: &Path,
    ) -> miette::Result<()>;
}

/// HTTP implementation of [`StagingApi`].
#[derive(Debug, Clone)]
pub struct NexusClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
}

impl NexusClient {
    /// `base_url` must end with `/`, e.g. `https://oss.sonatype.org/service/local/`.
    pub fn new(base_url: &str, credentials: Credentials) -> miette::Result<Self> {
        Ok(Self::with_client(client::build_client()?, base_url, credentials))
    }

    pub fn with_client(http: Client, base_url: &str, credentials: Credentials) -> Self {
        Self {
            http,
            base_url: format!("{}/", base_url.trim_end_matches('/')),
            credentials,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL a file is deployed to. Each path segment is percent-encoded.
    pub fn deploy_url(&self, repository_id: &str, relative_path: &str) -> miette::Result<String> {
        let invalid = |reason: String| StagehandError::Config {
            message: format!("Invalid base URL {}: {reason}", self.base_url),
        };
        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("it cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(["staging", "deployByRepositoryId", repository_id])
            .extend(relative_path.split('/').filter(|s| !s.is_empty()));
        Ok(url.to_string())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(&self, request: RequestBuilder, operation: &str) -> miette::Result<Response> {
        let response = auth::apply_auth(request, &self.credentials)
            .send()
            .await
            .map_err(|e| StagehandError::Network {
                message: format!("{operation}: {e}"),
            })?;

        let status = response.status();
        tracing::debug!("{operation} -> {status}");
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StagehandError::RemoteApi {
            operation: operation.to_string(),
            status: status.as_u16(),
            body,
        }
        .into())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, operation: &str) -> miette::Result<T> {
        let response = self.send(self.http.get(self.url(path)), operation).await?;
        decode(response, operation).await
    }

    async fn post_json<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        operation: &str,
    ) -> miette::Result<Response> {
        self.send(self.http.post(self.url(path)).json(body), operation)
            .await
    }

    async fn transition(
        &self,
        path: &str,
        input: TransitionInput,
        operation: &str,
    ) -> miette::Result<()> {
        self.post_json(path, &Data::new(input), operation).await?;
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: Response, operation: &str) -> miette::Result<T> {
    let status = response.status().as_u16();
    let text = response.text().await.map_err(|e| StagehandError::Network {
        message: format!("{operation}: cannot read response: {e}"),
    })?;
    serde_json::from_str(&text).map_err(|e| {
        StagehandError::RemoteApi {
            operation: operation.to_string(),
            status,
            body: format!("unexpected response ({e}): {text}"),
        }
        .into()
    })
}

impl StagingApi for NexusClient {
    async fn list_profiles(&self) -> miette::Result<Vec<StagingProfile>> {
        let body: Data<Vec<StagingProfile>> =
            self.get_json("staging/profiles", "listProfiles").await?;
        Ok(body.data)
    }

    async fn list_repositories(&self) -> miette::Result<Vec<StagingRepository>> {
        let body: Data<Vec<StagingRepository>> = self
            .get_json("staging/profile_repositories", "listRepositories")
            .await?;
        Ok(body.data)
    }

    async fn get_repository(&self, repository_id: &str) -> miette::Result<StagingRepository> {
        self.get_json(
            &format!("staging/repository/{repository_id}"),
            &format!("getRepository({repository_id})"),
        )
        .await
    }

    async fn create_repository(
        &self,
        profile_id: &str,
        description: &str,
    ) -> miette::Result<String> {
        let operation = format!("createRepository({profile_id})");
        let body = Data::new(Description {
            description: description.to_string(),
        });
        let response = self
            .post_json(
                &format!("staging/profiles/{profile_id}/start"),
                &body,
                &operation,
            )
            .await?;
        let created: Data<CreatedRepository> = decode(response, &operation).await?;
        created
            .data
            .staged_repository_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                StagehandError::Generic {
                    message: format!("{operation} returned no stagedRepositoryId"),
                }
                .into()
            })
    }

    async fn close_repositories(&self, repository_ids: &[String]) -> miette::Result<()> {
        self.transition(
            "staging/bulk/close",
            TransitionInput {
                staged_repository_ids: repository_ids.to_vec(),
                auto_drop_after_release: None,
            },
            &format!("closeRepositories({})", repository_ids.join(", ")),
        )
        .await
    }

    async fn release_repositories(
        &self,
        repository_ids: &[String],
        auto_drop_after_release: bool,
    ) -> miette::Result<()> {
        self.transition(
            "staging/bulk/promote",
            TransitionInput {
                staged_repository_ids: repository_ids.to_vec(),
                auto_drop_after_release: Some(auto_drop_after_release),
            },
            &format!("releaseRepositories({})", repository_ids.join(", ")),
        )
        .await
    }

    async fn drop_repositories(&self, repository_ids: &[String]) -> miette::Result<()> {
        self.transition(
            "staging/bulk/drop",
            TransitionInput {
                staged_repository_ids: repository_ids.to_vec(),
                auto_drop_after_release: None,
            },
            &format!("dropRepositories({})", repository_ids.join(", ")),
        )
        .await
    }

    async fn deploy_file(
        &self,
        repository_id: &str,
        relative_path: &str,
        file: &Path,
    ) -> miette::Result<()> {
        let url = self.deploy_url(repository_id, relative_path)?;
        let body = tokio::fs::File::open(file).await.map_err(StagehandError::Io)?;
        let length = body.metadata().await.map_err(StagehandError::Io)?.len();
        tracing::debug!("PUT {relative_path} ({length} bytes)");
        let request = self
            .http
            .put(&url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .header(CONTENT_LENGTH, length)
            .body(Body::from(body));
        self.send(request, &format!("PUT {url}")).await?;
        Ok(())
    }
}

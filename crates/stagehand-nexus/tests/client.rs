use httpmock::prelude::*;
use serde_json::json;
use tempfile::TempDir;

use stagehand_core::settings::Credentials;
use stagehand_nexus::api::{NexusClient, StagingApi};
use stagehand_nexus::model::RepositoryType;
use stagehand_nexus::upload::upload_directory;
use stagehand_util::errors::StagehandError;

/// `deployer:s3cret`
const BASIC_AUTH: &str = "Basic ZGVwbG95ZXI6czNjcmV0";

fn client(server: &MockServer) -> NexusClient {
    let credentials = Credentials {
        username: "deployer".to_string(),
        password: "s3cret".to_string(),
    };
    NexusClient::new(&server.url("/service/local"), credentials).unwrap()
}

fn remote_error(err: &miette::Report) -> (u16, String) {
    match err.downcast_ref::<StagehandError>() {
        Some(StagehandError::RemoteApi { status, body, .. }) => (*status, body.clone()),
        other => panic!("expected RemoteApi, got {other:?}"),
    }
}

#[test]
fn base_url_is_normalised() {
    let credentials = Credentials {
        username: "u".to_string(),
        password: "p".to_string(),
    };
    let client = NexusClient::new("https://nexus.example.com/service/local", credentials).unwrap();
    assert_eq!(client.base_url(), "https://nexus.example.com/service/local/");
    assert_eq!(
        client.deploy_url("r-1", "/com/example/lib/1.0/lib-1.0.jar").unwrap(),
        "https://nexus.example.com/service/local/staging/deployByRepositoryId/r-1/com/example/lib/1.0/lib-1.0.jar"
    );
}

#[test]
fn deploy_url_encodes_each_segment() {
    let credentials = Credentials {
        username: "u".to_string(),
        password: "p".to_string(),
    };
    let client = NexusClient::new("https://nexus.example.com/service/local/", credentials).unwrap();
    assert_eq!(
        client.deploy_url("r-1", "com/example/lib/1.0/lib#1 ?x%.jar").unwrap(),
        "https://nexus.example.com/service/local/staging/deployByRepositoryId/r-1/com/example/lib/1.0/lib%231%20%3Fx%25.jar"
    );
}

#[tokio::test]
async fn list_profiles_sends_basic_auth_and_json_headers() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/service/local/staging/profiles")
                .header("authorization", BASIC_AUTH)
                .header("accept", "application/json");
            then.status(200).json_body(json!({
                "data": [
                    {"id": "11aa", "name": "com.example", "mode": "BOTH"},
                    {"id": "22bb", "name": "org.example"}
                ]
            }));
        })
        .await;

    let profiles = client(&server).list_profiles().await.unwrap();

    mock.assert_async().await;
    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles[0].id, "11aa");
    assert_eq!(profiles[1].name, "org.example");
}

#[tokio::test]
async fn list_repositories_decodes_state() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/service/local/staging/profile_repositories");
            then.status(200).json_body(json!({
                "data": [
                    {"repositoryId": "comexample-1001", "type": "open", "transitioning": false},
                    {"repositoryId": "comexample-1002", "type": "closed", "transitioning": true}
                ]
            }));
        })
        .await;

    let repos = client(&server).list_repositories().await.unwrap();

    assert_eq!(repos.len(), 2);
    assert_eq!(repos[0].kind, RepositoryType::Open);
    assert!(repos[1].transitioning);
}

#[tokio::test]
async fn get_repository_reads_unwrapped_payload() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/service/local/staging/repository/comexample-1001");
            then.status(200).json_body(json!({
                "repositoryId": "comexample-1001",
                "type": "closed",
                "transitioning": false
            }));
        })
        .await;

    let repo = client(&server)
        .get_repository("comexample-1001")
        .await
        .unwrap();

    assert!(repo.is_closed());
}

#[tokio::test]
async fn create_repository_posts_description() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/service/local/staging/profiles/11aa/start")
                .header("authorization", BASIC_AUTH)
                .json_body(json!({"data": {"description": "Release 1.0"}}));
            then.status(201)
                .json_body(json!({"data": {"stagedRepositoryId": "comexample-1003", "description": "Release 1.0"}}));
        })
        .await;

    let id = client(&server)
        .create_repository("11aa", "Release 1.0")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(id, "comexample-1003");
}

#[tokio::test]
async fn create_repository_without_id_fails() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/service/local/staging/profiles/11aa/start");
            then.status(201).json_body(json!({"data": {}}));
        })
        .await;

    let err = client(&server)
        .create_repository("11aa", "x")
        .await
        .unwrap_err();

    assert!(err.to_string().contains("stagedRepositoryId"));
}

#[tokio::test]
async fn bulk_close_and_drop_send_ids() {
    let server = MockServer::start_async().await;
    let close = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/service/local/staging/bulk/close")
                .json_body(json!({"data": {"stagedRepositoryIds": ["r1", "r2"]}}));
            then.status(201);
        })
        .await;
    let drop = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/service/local/staging/bulk/drop")
                .json_body(json!({"data": {"stagedRepositoryIds": ["r3"]}}));
            then.status(201);
        })
        .await;

    let client = client(&server);
    client
        .close_repositories(&["r1".to_string(), "r2".to_string()])
        .await
        .unwrap();
    client.drop_repositories(&["r3".to_string()]).await.unwrap();

    close.assert_async().await;
    drop.assert_async().await;
}

#[tokio::test]
async fn promote_carries_auto_drop_flag() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/service/local/staging/bulk/promote")
                .json_body(json!({
                    "data": {"stagedRepositoryIds": ["r1"], "autoDropAfterRelease": false}
                }));
            then.status(201);
        })
        .await;

    client(&server)
        .release_repositories(&["r1".to_string()], false)
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn non_success_status_surfaces_status_and_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/service/local/staging/bulk/close");
            then.status(400)
                .body("Unhandled: Repository: r1 has invalid state: closed");
        })
        .await;

    let err = client(&server)
        .close_repositories(&["r1".to_string()])
        .await
        .unwrap_err();

    let (status, body) = remote_error(&err);
    assert_eq!(status, 400);
    assert!(body.contains("invalid state"));
}

#[tokio::test]
async fn unauthorized_is_a_remote_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/service/local/staging/profiles");
            then.status(401).body("Unauthorized");
        })
        .await;

    let err = client(&server).list_profiles().await.unwrap_err();
    assert_eq!(remote_error(&err).0, 401);
}

#[tokio::test]
async fn deploy_puts_raw_bytes() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/service/local/staging/deployByRepositoryId/r1/com/example/lib/1.0/lib-1.0.jar")
                .header("content-type", "application/octet-stream")
                .header("authorization", BASIC_AUTH)
                .header("content-length", "9")
                .body("jar bytes");
            then.status(201);
        })
        .await;

    let tmp = TempDir::new().unwrap();
    let jar = tmp.path().join("lib-1.0.jar");
    std::fs::write(&jar, "jar bytes").unwrap();

    client(&server)
        .deploy_file("r1", "com/example/lib/1.0/lib-1.0.jar", &jar)
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn deploy_streams_large_file_with_length() {
    let tmp = TempDir::new().unwrap();
    let jar = tmp.path().join("big.jar");
    let content: String = (0..3 * 1024 * 1024u32)
        .map(|i| char::from(b'a' + (i % 26) as u8))
        .collect();
    std::fs::write(&jar, &content).unwrap();

    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/service/local/staging/deployByRepositoryId/r1/big.jar")
                .header("content-length", content.len().to_string())
                .body(content.clone());
            then.status(201);
        })
        .await;

    client(&server).deploy_file("r1", "big.jar", &jar).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn deploy_of_missing_file_is_io_error() {
    let server = MockServer::start_async().await;
    let tmp = TempDir::new().unwrap();
    let err = client(&server)
        .deploy_file("r1", "gone.jar", &tmp.path().join("gone.jar"))
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StagehandError>(),
        Some(StagehandError::Io(_))
    ));
}

#[tokio::test]
async fn upload_directory_puts_every_file_once() {
    let tmp = TempDir::new().unwrap();
    let version = tmp.path().join("com/example/lib/1.0");
    std::fs::create_dir_all(&version).unwrap();
    for name in ["lib-1.0.jar", "lib-1.0.jar.md5", "lib-1.0.jar.asc"] {
        std::fs::write(version.join(name), name).unwrap();
    }

    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path_contains("/service/local/staging/deployByRepositoryId/r1/com/example/lib/1.0/");
            then.status(201);
        })
        .await;

    let mut seen = Vec::new();
    let count = upload_directory(&client(&server), "r1", tmp.path(), |p| {
        seen.push((p.index, p.total, p.path.clone()))
    })
    .await
    .unwrap();

    assert_eq!(count, 3);
    mock.assert_hits_async(3).await;
    assert_eq!(
        seen,
        vec![
            (0, 3, "com/example/lib/1.0/lib-1.0.jar".to_string()),
            (1, 3, "com/example/lib/1.0/lib-1.0.jar.asc".to_string()),
            (2, 3, "com/example/lib/1.0/lib-1.0.jar.md5".to_string()),
        ]
    );
}

#[tokio::test]
async fn connection_failure_is_a_network_error() {
    let credentials = Credentials {
        username: "u".to_string(),
        password: "p".to_string(),
    };
    // Nothing listens on port 9 of localhost in the test environment.
    let client = NexusClient::new("http://127.0.0.1:9/", credentials).unwrap();
    let err = client.list_profiles().await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StagehandError>(),
        Some(StagehandError::Network { .. })
    ));
}

use std::path::{Path, PathBuf};

use httpmock::prelude::*;
use serde_json::json;
use tempfile::TempDir;

use stagehand_core::settings::{
    NexusSettings, PomDefaults, Settings, SigningSettings, WaitPolicy,
};
use stagehand_ops::ops_prepare::{prepare, PrepareOptions};
use stagehand_ops::{connect, ops_upload, ops_verify, select_profile};
use stagehand_util::errors::StagehandError;

fn settings(base_url: &str) -> Settings {
    Settings {
        nexus: NexusSettings {
            base_url: base_url.to_string(),
            username: Some("deployer".to_string()),
            password: Some("s3cret".to_string()),
            profile_id: None,
        },
        signing: SigningSettings::default(),
        wait: WaitPolicy::default(),
        pom: PomDefaults::default(),
    }
}

fn with_test_key(mut settings: Settings) -> Settings {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../stagehand-artifacts/tests/fixtures/test-key.asc");
    settings.signing = SigningSettings {
        private_key: Some(std::fs::read_to_string(path).unwrap()),
        passphrase: Some("stagehand-test".to_string()),
    };
    settings
}

fn config_message(err: &miette::Report) -> String {
    match err.downcast_ref::<StagehandError>() {
        Some(StagehandError::Config { message }) => message.clone(),
        other => panic!("expected Config, got {other:?}"),
    }
}

fn write(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

#[test]
fn test_connect_without_credentials_is_config_error() {
    let mut settings = settings("http://localhost/");
    settings.nexus.password = None;
    let err = connect(&settings).err().unwrap();
    assert!(config_message(&err).contains("SONATYPE_NEXUS_PASSWORD"));
}

#[tokio::test]
async fn test_several_profiles_are_listed_in_the_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/staging/profiles");
            then.status(200).json_body(json!({
                "data": [
                    {"id": "11aa", "name": "com.example"},
                    {"id": "22bb", "name": "org.example"}
                ]
            }));
        })
        .await;

    let orchestrator = connect(&settings(&server.url("/"))).unwrap();
    let err = select_profile(&orchestrator, None).await.unwrap_err();

    let message = config_message(&err);
    assert!(message.contains("- com.example: --profile-id=11aa"));
    assert!(message.contains("- org.example: --profile-id=22bb"));
}

#[tokio::test]
async fn test_no_profiles_is_config_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/staging/profiles");
            then.status(200).json_body(json!({"data": []}));
        })
        .await;

    let orchestrator = connect(&settings(&server.url("/"))).unwrap();
    let err = select_profile(&orchestrator, None).await.unwrap_err();
    assert!(config_message(&err).contains("No staging profile"));
}

#[tokio::test]
async fn test_upload_creates_repository_and_puts_each_file() {
    let tree = TempDir::new().unwrap();
    write(&tree.path().join("com/example/lib/1.0/lib-1.0.jar"), "jar");
    write(&tree.path().join("com/example/lib/1.0/lib-1.0.pom"), "<project/>");

    let server = MockServer::start_async().await;
    let profiles = server
        .mock_async(|when, then| {
            when.method(GET).path("/staging/profiles");
            then.status(200)
                .json_body(json!({"data": [{"id": "11aa", "name": "com.example"}]}));
        })
        .await;
    let start = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/staging/profiles/11aa/start")
                .json_body(json!({"data": {"description": "Nightly"}}));
            then.status(201)
                .json_body(json!({"data": {"stagedRepositoryId": "comexample-1010"}}));
        })
        .await;
    let puts = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path_contains("/staging/deployByRepositoryId/comexample-1010/com/example/lib/1.0/");
            then.status(201);
        })
        .await;

    let id = ops_upload::upload(&settings(&server.url("/")), tree.path(), "Nightly")
        .await
        .unwrap();

    assert_eq!(id, "comexample-1010");
    profiles.assert_async().await;
    start.assert_async().await;
    puts.assert_hits_async(2).await;
}

#[tokio::test]
async fn test_upload_with_explicit_profile_skips_lookup() {
    let tree = TempDir::new().unwrap();
    write(&tree.path().join("a/b/1/b-1.jar"), "jar");

    let server = MockServer::start_async().await;
    let profiles = server
        .mock_async(|when, then| {
            when.method(GET).path("/staging/profiles");
            then.status(500);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/staging/profiles/99zz/start");
            then.status(201)
                .json_body(json!({"data": {"stagedRepositoryId": "ab-1"}}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(PUT).path("/staging/deployByRepositoryId/ab-1/a/b/1/b-1.jar");
            then.status(201);
        })
        .await;

    let mut settings = settings(&server.url("/"));
    settings.nexus.profile_id = Some("99zz".to_string());
    let id = ops_upload::upload(&settings, tree.path(), "x").await.unwrap();

    assert_eq!(id, "ab-1");
    profiles.assert_hits_async(0).await;
}

#[test]
fn test_prepared_tree_verifies_until_tampered() {
    let input = TempDir::new().unwrap();
    write(&input.path().join("lib/1.0/lib-1.0.jar"), "jar bytes");
    write(
        &input.path().join("lib/1.0/lib-1.0.pom"),
        "<project>\n  <artifactId>lib</artifactId>\n</project>\n",
    );
    write(&input.path().join("lib/2.0/lib-2.0.jar"), "newer jar");
    let scratch = TempDir::new().unwrap();
    let versions = input.path().join("versions.txt");
    std::fs::write(&versions, "1.0/\n").unwrap();

    let options = PrepareOptions {
        input: input.path().to_path_buf(),
        scratch: scratch.path().to_path_buf(),
        group: "com.example".to_string(),
        versions_file: Some(versions),
    };
    let report = prepare(&with_test_key(settings("http://localhost/")), &options).unwrap();

    assert_eq!(report.versions, [("lib".to_string(), "1.0".to_string())]);
    assert_eq!(report.signatures_generated(), 2);
    assert!(!scratch.path().join("com/example/lib/2.0").exists());
    ops_verify::verify(scratch.path()).unwrap();

    std::fs::write(
        scratch.path().join("com/example/lib/1.0/lib-1.0.jar"),
        "tampered",
    )
    .unwrap();
    assert!(ops_verify::verify(scratch.path()).is_err());
}

#[test]
fn test_prepare_without_key_is_config_error() {
    let input = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let options = PrepareOptions {
        input: input.path().to_path_buf(),
        scratch: scratch.path().to_path_buf(),
        group: "com.example".to_string(),
        versions_file: None,
    };
    let err = prepare(&settings("http://localhost/"), &options).unwrap_err();
    assert!(config_message(&err).contains("GPG_PRIVATE_KEY"));
}

mod common;

use aws_credential_types::Credentials;
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::{BehaviorVersion, Builder, Region};
use aws_sdk_s3::Client;
use bytes::Bytes;
use futures::TryStreamExt;
use starter_backend::config::S3Config;
use starter_backend::storage::{S3Storage, Storage, StorageError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BUCKET: &str = "media";

fn config(server: &MockServer) -> S3Config {
    S3Config {
        bucket: BUCKET.into(),
        access_key: "AKIDEXAMPLE".into(),
        secret_key: "wJalrXUtnFEMI/K7MDENG".into(),
        region: "us-east-1".into(),
        endpoint_url: Some(server.uri()),
    }
}

/// Same addressing as `S3Storage::new`, without retries so 5xx answers
/// surface on the first attempt.
fn storage_without_retries(server: &MockServer) -> S3Storage {
    let conf = Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(Credentials::new("AKIDEXAMPLE", "secret", None, None, "test"))
        .endpoint_url(server.uri())
        .force_path_style(true)
        .retry_config(RetryConfig::disabled())
        .build();
    S3Storage::from_client(Client::from_conf(conf), BUCKET)
}

#[tokio::test]
async fn upload_returns_bucket_locator() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/media/uploads/report.pdf"))
        .respond_with(ResponseTemplate::new(200).insert_header("ETag", "\"9b2cf535f27731c974343645a3985328\""))
        .expect(1)
        .mount(&server)
        .await;

    let storage = S3Storage::new(config(&server));
    let location = storage
        .upload(
            Bytes::from_static(b"%PDF-1.7"),
            "uploads/report.pdf",
            Some("application/pdf"),
        )
        .await
        .unwrap();

    assert_eq!(location, "s3://media/uploads/report.pdf");
}

#[tokio::test]
async fn download_buffers_the_object() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/notes.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/plain")
                .set_body_bytes(b"remember the milk".to_vec()),
        )
        .mount(&server)
        .await;

    let storage = storage_without_retries(&server);
    let chunks: Vec<Bytes> = storage
        .download("notes.txt")
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(chunks.concat(), b"remember the milk");
}

#[tokio::test]
async fn download_of_missing_key_is_not_found() {
    let server = MockServer::start().await;
    let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<Error><Code>NoSuchKey</Code><Message>The specified key does not exist.</Message><Key>gone.txt</Key><RequestId>4442587FB7D0A2F9</RequestId></Error>"#;
    Mock::given(method("GET"))
        .and(path("/media/gone.txt"))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("Content-Type", "application/xml")
                .set_body_string(body),
        )
        .mount(&server)
        .await;

    let storage = storage_without_retries(&server);
    match storage.download("gone.txt").await {
        Err(StorageError::NotFound(key)) => assert_eq!(key, "gone.txt"),
        Err(other) => panic!("expected NotFound, got {other:?}"),
        Ok(_) => panic!("expected NotFound, got a stream"),
    }
}

#[tokio::test]
async fn delete_reports_success() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/media/old/avatar.png"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let storage = storage_without_retries(&server);
    assert!(storage.delete("old/avatar.png").await.unwrap());
}

#[tokio::test]
async fn delete_swallows_backend_errors() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/media/old/avatar.png"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let storage = storage_without_retries(&server);
    assert!(!storage.delete("old/avatar.png").await.unwrap());
}

#[tokio::test]
async fn delete_of_escaping_path_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let storage = storage_without_retries(&server);
    assert!(!storage.delete("../etc/passwd").await.unwrap());
}

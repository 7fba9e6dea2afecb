// ABOUTME: Shared helpers for integration tests: databases, resources, records, and HTTP plumbing
// ABOUTME: Keeps individual test files focused on behavior instead of setup

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use http_body_util::BodyExt;
use repforge::config::environment::{DatabaseConfig, LogLevel, ServerConfig};
use repforge::database::Database;
use repforge::import::records::{ExerciseRecord, NamedRef};
use repforge::resources::ServerResources;
use std::sync::Arc;

/// Open a fresh in-memory database with the schema applied
pub async fn test_database() -> Database {
    Database::new("sqlite::memory:")
        .await
        .expect("in-memory database opens")
}

/// Build a configuration suitable for route-level tests
pub fn test_config() -> ServerConfig {
    ServerConfig {
        http_port: 0,
        database: DatabaseConfig {
            url: "sqlite::memory:".into(),
        },
        log_level: LogLevel::Info,
        max_upload_bytes: 10 * 1024 * 1024,
    }
}

/// Assemble server resources over a fresh in-memory database
pub async fn test_resources() -> Arc<ServerResources> {
    let database = test_database().await;
    Arc::new(ServerResources::new(database, Arc::new(test_config())))
}

/// Assemble resources with a deliberately small upload limit
pub async fn test_resources_with_upload_limit(max_upload_bytes: usize) -> Arc<ServerResources> {
    let database = test_database().await;
    let config = ServerConfig {
        max_upload_bytes,
        ..test_config()
    };
    Arc::new(ServerResources::new(database, Arc::new(config)))
}

/// Build a candidate exercise record the way import payloads carry them
pub fn exercise_record(
    name: &str,
    group: &str,
    primary: &str,
    secondaries: &[&str],
) -> ExerciseRecord {
    ExerciseRecord {
        name: name.to_owned(),
        description: None,
        muscle_group: Some(NamedRef {
            name: Some(group.to_owned()),
        }),
        primary_muscle: Some(NamedRef {
            name: Some(primary.to_owned()),
        }),
        secondary_muscles: Some(
            secondaries
                .iter()
                .map(|s| NamedRef {
                    name: Some((*s).to_owned()),
                })
                .collect(),
        ),
    }
}

pub const MULTIPART_BOUNDARY: &str = "repforge-test-boundary";

/// Build a multipart/form-data POST carrying one uploaded file
pub fn multipart_request(uri: &str, filename: &str, content: &str) -> Request<Body> {
    let body = format!(
        "--{MULTIPART_BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: application/json\r\n\r\n\
         {content}\r\n\
         --{MULTIPART_BOUNDARY}--\r\n"
    );

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request builds")
}

/// Build a multipart POST with no file field at all
pub fn empty_multipart_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .body(Body::from(format!("--{MULTIPART_BOUNDARY}--\r\n")))
        .expect("request builds")
}

/// Read a response body as JSON
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is JSON")
}

/// Assert a status and return the JSON body
pub async fn expect_json(response: Response, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}

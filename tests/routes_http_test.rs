// ABOUTME: Route-level tests exercising the axum surface without a running server
// ABOUTME: Covers upload boundary rejections, import responses, and the query endpoints

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{
    empty_multipart_request, expect_json, multipart_request, test_resources,
    test_resources_with_upload_limit,
};
use repforge::routes::build_router;
use tower::ServiceExt;

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

const EXERCISES_JSON: &str = r#"[
    {"name": "Squat", "muscleGroup": {"name": "Legs"},
     "primaryMuscle": {"name": "Quadriceps"},
     "secondaryMuscles": [{"name": "Glutes"}]},
    {"name": "Bench Press", "muscleGroup": {"name": "Chest"},
     "primaryMuscle": {"name": "Pectorals"}}
]"#;

#[tokio::test]
async fn health_endpoint_responds() {
    let router = build_router(test_resources().await);
    let response = router.oneshot(get("/health")).await.expect("request runs");
    let body = expect_json(response, StatusCode::OK).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn exercise_import_returns_created_with_report() {
    let router = build_router(test_resources().await);

    let response = router
        .clone()
        .oneshot(multipart_request("/api/imports", "exercises.json", EXERCISES_JSON))
        .await
        .expect("request runs");
    let report = expect_json(response, StatusCode::CREATED).await;

    assert_eq!(report["criticalFailure"], false);
    assert_eq!(report["exercisesCreated"], 2);
    assert_eq!(report["muscleGroupsCreated"], 2);
    assert_eq!(report["totalProcessed"], 2);
    assert_eq!(report["errors"].as_array().expect("errors array").len(), 0);

    let response = router
        .oneshot(get("/api/exercises?page=1&pageSize=10"))
        .await
        .expect("request runs");
    let page = expect_json(response, StatusCode::OK).await;
    assert_eq!(page["total"], 2);
    assert_eq!(page["items"][0]["name"], "Bench Press");
    assert_eq!(page["items"][1]["name"], "Squat");
}

#[tokio::test]
async fn wrong_extension_is_rejected_with_a_critical_report() {
    let router = build_router(test_resources().await);

    let response = router
        .oneshot(multipart_request("/api/imports", "exercises.txt", EXERCISES_JSON))
        .await
        .expect("request runs");
    let report = expect_json(response, StatusCode::BAD_REQUEST).await;

    assert_eq!(report["criticalFailure"], true);
    assert_eq!(report["exercisesCreated"], 0);
    let message = report["errors"][0]["message"].as_str().expect("message");
    assert!(message.contains("Invalid file extension"));
}

#[tokio::test]
async fn empty_and_malformed_uploads_are_boundary_errors() {
    let router = build_router(test_resources().await);

    let response = router
        .clone()
        .oneshot(multipart_request("/api/imports", "exercises.json", ""))
        .await
        .expect("request runs");
    let report = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(report["criticalFailure"], true);

    let response = router
        .clone()
        .oneshot(multipart_request("/api/imports", "exercises.json", "{not json"))
        .await
        .expect("request runs");
    let report = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(report["criticalFailure"], true);
    let message = report["errors"][0]["message"].as_str().expect("message");
    assert!(message.contains("Invalid JSON"));

    let response = router
        .oneshot(empty_multipart_request("/api/imports"))
        .await
        .expect("request runs");
    let report = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert!(report["errors"][0]["message"]
        .as_str()
        .expect("message")
        .contains("No file was uploaded"));
}

#[tokio::test]
async fn oversized_upload_is_rejected_at_the_boundary() {
    let router = build_router(test_resources_with_upload_limit(64).await);

    let oversized = format!("[{}]", "1, ".repeat(100));
    let response = router
        .oneshot(multipart_request("/api/imports", "exercises.json", &oversized))
        .await
        .expect("request runs");
    let report = expect_json(response, StatusCode::BAD_REQUEST).await;

    assert_eq!(report["criticalFailure"], true);
    assert_eq!(report["exercisesCreated"], 0);
    assert!(report["errors"][0]["message"]
        .as_str()
        .expect("message")
        .contains("must not exceed"));
}

#[tokio::test]
async fn validate_endpoint_never_persists() {
    let router = build_router(test_resources().await);

    let response = router
        .clone()
        .oneshot(multipart_request(
            "/api/imports/validate",
            "exercises.json",
            EXERCISES_JSON,
        ))
        .await
        .expect("request runs");
    let outcome = expect_json(response, StatusCode::OK).await;
    assert_eq!(outcome["valid"], true);
    assert_eq!(outcome["recordCount"], 2);

    let response = router
        .oneshot(get("/api/exercises"))
        .await
        .expect("request runs");
    let page = expect_json(response, StatusCode::OK).await;
    assert_eq!(page["total"], 0, "validation must not create rows");
}

#[tokio::test]
async fn exercise_detail_and_missing_id_responses() {
    let router = build_router(test_resources().await);

    let response = router
        .clone()
        .oneshot(multipart_request("/api/imports", "exercises.json", EXERCISES_JSON))
        .await
        .expect("request runs");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = router
        .clone()
        .oneshot(get("/api/exercises/all"))
        .await
        .expect("request runs");
    let all = expect_json(response, StatusCode::OK).await;
    let squat = all
        .as_array()
        .expect("array")
        .iter()
        .find(|e| e["name"] == "Squat")
        .expect("squat listed")
        .clone();

    let id = squat["id"].as_i64().expect("id");
    let response = router
        .clone()
        .oneshot(get(&format!("/api/exercises/{id}")))
        .await
        .expect("request runs");
    let detail = expect_json(response, StatusCode::OK).await;
    assert_eq!(detail["muscleGroup"], "Legs");
    assert_eq!(detail["primaryMuscle"], "Quadriceps");
    assert_eq!(detail["secondaryMuscles"][0], "Glutes");

    let response = router
        .oneshot(get("/api/exercises/99999"))
        .await
        .expect("request runs");
    let error = expect_json(response, StatusCode::NOT_FOUND).await;
    assert_eq!(error["error"]["code"], "RESOURCE_NOT_FOUND");
}

#[tokio::test]
async fn routine_import_round_trips_through_the_api() {
    let router = build_router(test_resources().await);

    let response = router
        .clone()
        .oneshot(multipart_request("/api/imports", "exercises.json", EXERCISES_JSON))
        .await
        .expect("request runs");
    assert_eq!(response.status(), StatusCode::CREATED);

    let routines_json = r#"[
        {"name": "Push Pull Legs", "difficulty": "Intermediate",
         "weeks": [{"days": [{"exercises": [
            {"exercise": {"name": "Squat"},
             "sets": [{"reps": 10, "percentOneRm": 70, "rest": "0:02"}]},
            {"exercise": {"name": "Bench Press"},
             "sets": [{"reps": 8, "rest": "0:03", "setType": "drop_set"}]}
         ]}]}]}
    ]"#;

    let response = router
        .clone()
        .oneshot(multipart_request(
            "/api/routines/import",
            "routines.json",
            routines_json,
        ))
        .await
        .expect("request runs");
    let report = expect_json(response, StatusCode::OK).await;
    assert_eq!(report["criticalFailure"], false);
    assert_eq!(report["routinesCreated"], 1);

    let response = router
        .clone()
        .oneshot(get("/api/routines"))
        .await
        .expect("request runs");
    let page = expect_json(response, StatusCode::OK).await;
    assert_eq!(page["total"], 1);
    let id = page["items"][0]["id"].as_i64().expect("id");

    let response = router
        .oneshot(get(&format!("/api/routines/{id}")))
        .await
        .expect("request runs");
    let tree = expect_json(response, StatusCode::OK).await;
    assert_eq!(tree["name"], "Push Pull Legs");
    let exercises = tree["weeks"][0]["days"][0]["exercises"]
        .as_array()
        .expect("exercises");
    assert_eq!(exercises.len(), 2);
    assert_eq!(exercises[0]["exerciseName"], "Squat");
    assert_eq!(exercises[0]["sets"][0]["restSeconds"], 120);
    assert_eq!(exercises[1]["sets"][0]["setType"], "drop_set");
}

#[tokio::test]
async fn routine_import_with_unknown_exercise_returns_bad_request() {
    let router = build_router(test_resources().await);

    let routines_json = r#"[
        {"name": "Mystery Plan",
         "weeks": [{"days": [{"exercises": [
            {"exercise": {"name": "Unknown Lift"}, "sets": []}
         ]}]}]}
    ]"#;

    let response = router
        .clone()
        .oneshot(multipart_request(
            "/api/routines/import",
            "routines.json",
            routines_json,
        ))
        .await
        .expect("request runs");
    let report = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(report["criticalFailure"], true);
    assert_eq!(report["routinesCreated"], 0);
    assert_eq!(report["errors"][0]["name"], "Unknown Lift");

    let response = router
        .oneshot(get("/api/routines"))
        .await
        .expect("request runs");
    let page = expect_json(response, StatusCode::OK).await;
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn routine_validate_checks_format_only() {
    let router = build_router(test_resources().await);

    let response = router
        .oneshot(multipart_request(
            "/api/routines/import/validate",
            "routines.json",
            r#"[{"name": "Plan", "weeks": []}]"#,
        ))
        .await
        .expect("request runs");
    let outcome = expect_json(response, StatusCode::OK).await;
    assert_eq!(outcome["valid"], true);
    assert_eq!(outcome["recordCount"], 1);
}

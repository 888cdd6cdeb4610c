//! Integration tests for scheduling and the live session state machine.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use classgate_entity::user::UserRole;

#[tokio::test]
async fn test_schedule_session() {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;

    let response = app
        .request(
            "POST",
            "/live/rooms",
            Some(json!({ "provider": "jitsi" })),
            Some(&instructor.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let data = &response.body["data"];
    let room_id = data["roomId"].as_str().unwrap();
    assert_eq!(data["status"], "scheduled");
    assert_eq!(data["title"], "Live session");
    assert_eq!(data["roomName"], format!("classgate-{room_id}"));
    assert_eq!(data["createdBy"], json!(instructor.id));
}

#[tokio::test]
async fn test_only_hosts_can_schedule() {
    let app = helpers::TestApp::new();
    let student = app.create_user(UserRole::Student).await;

    let response = app
        .request(
            "POST",
            "/live/rooms",
            Some(json!({ "provider": "jitsi" })),
            Some(&student.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_external_provider_requires_link() {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;

    let missing = app
        .request(
            "POST",
            "/live/rooms",
            Some(json!({ "provider": "zoom" })),
            Some(&instructor.token),
        )
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);

    let created = app
        .request(
            "POST",
            "/live/rooms",
            Some(json!({
                "provider": "zoom",
                "meetingLink": "https://zoom.us/j/123456789",
            })),
            Some(&instructor.token),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let room_id = created.body["data"]["roomId"].as_str().unwrap().to_string();

    let status = app.get_status(&instructor, &room_id).await;
    assert_eq!(status.status, StatusCode::OK);
    assert_eq!(status.body["data"]["roomUrl"], "https://zoom.us/j/123456789");
    assert_eq!(status.body["data"]["isEmbeddable"], false);
}

#[tokio::test]
async fn test_schedule_with_unknown_course() {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;

    let response = app
        .request(
            "POST",
            "/live/rooms",
            Some(json!({
                "provider": "jitsi",
                "courseId": classgate_core::types::CourseId::new(),
            })),
            Some(&instructor.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_full_lifecycle() {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;
    let room_id = app.schedule_session(&instructor, None).await;

    let started = app.set_status(&instructor, &room_id, "active").await;
    assert_eq!(started.status, StatusCode::OK);
    assert_eq!(started.body["data"]["status"], "active");

    // Starting a running session changes nothing.
    let again = app.set_status(&instructor, &room_id, "active").await;
    assert_eq!(again.status, StatusCode::OK);
    assert_eq!(again.body["data"]["status"], "active");

    let ended = app.set_status(&instructor, &room_id, "ended").await;
    assert_eq!(ended.status, StatusCode::OK);
    assert_eq!(ended.body["data"]["status"], "ended");

    for target in ["active", "ended"] {
        let rejected = app.set_status(&instructor, &room_id, target).await;
        assert_eq!(rejected.status, StatusCode::CONFLICT, "target {target}");
        assert_eq!(rejected.body["error"], "CONFLICT");
        assert!(
            rejected.body["message"]
                .as_str()
                .unwrap()
                .contains("ended")
        );
    }
}

#[tokio::test]
async fn test_end_before_start_cancels() {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;
    let room_id = app.schedule_session(&instructor, None).await;

    let ended = app.set_status(&instructor, &room_id, "ended").await;
    assert_eq!(ended.status, StatusCode::OK);
    assert_eq!(ended.body["data"]["status"], "cancelled");

    let start = app.set_status(&instructor, &room_id, "active").await;
    assert_eq!(start.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_non_owner_transitions_forbidden_in_every_state() {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;
    let other = app.create_user(UserRole::Teacher).await;
    let admin = app.create_user(UserRole::Admin).await;
    let room_id = app.schedule_session(&instructor, None).await;

    for intruder in [&other, &admin] {
        for target in ["active", "ended"] {
            let response = app.set_status(intruder, &room_id, target).await;
            assert_eq!(response.status, StatusCode::FORBIDDEN);
        }
    }

    app.set_status(&instructor, &room_id, "active").await;
    let response = app.set_status(&other, &room_id, "ended").await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    app.set_status(&instructor, &room_id, "ended").await;
    let response = app.set_status(&other, &room_id, "active").await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_invalid_status_requests() {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;
    let room_id = app.schedule_session(&instructor, None).await;

    for status in ["cancelled", "scheduled", "paused"] {
        let response = app.set_status(&instructor, &room_id, status).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "status {status}");
    }

    let bad_room = app.set_status(&instructor, "no spaces allowed", "active").await;
    assert_eq!(bad_room.status, StatusCode::BAD_REQUEST);

    let missing = app.set_status(&instructor, "doesnotexist", "active").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancel_by_owner_or_moderator() {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;
    let student = app.create_user(UserRole::Student).await;
    let admin = app.create_user(UserRole::Admin).await;

    let room_id = app.schedule_session(&instructor, None).await;
    let path = format!("/live/rooms/{room_id}/cancel");

    let forbidden = app.request("POST", &path, None, Some(&student.token)).await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    app.set_status(&instructor, &room_id, "active").await;
    let cancelled = app.request("POST", &path, None, Some(&admin.token)).await;
    assert_eq!(cancelled.status, StatusCode::OK);
    assert_eq!(cancelled.body["data"]["status"], "cancelled");

    let again = app
        .request("POST", &path, None, Some(&instructor.token))
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_status_read_for_owner() {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;
    let room_id = app.schedule_session(&instructor, None).await;

    let response = app.get_status(&instructor, &room_id).await;

    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["status"], "scheduled");
    assert_eq!(data["roomName"], format!("classgate-{room_id}"));
    assert_eq!(
        data["roomUrl"],
        format!("https://meet.jit.si/classgate-{room_id}")
    );
    assert_eq!(data["isEmbeddable"], true);
}

#[tokio::test]
async fn test_status_read_errors() {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;

    let missing = app.get_status(&instructor, "doesnotexist").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let no_query = app
        .request("GET", "/live/status", None, Some(&instructor.token))
        .await;
    assert_eq!(no_query.status, StatusCode::BAD_REQUEST);

    let unauthenticated = app
        .request("GET", "/live/status?roomId=abc123", None, None)
        .await;
    assert_eq!(unauthenticated.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_concurrent_starts_settle_on_active() {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;
    let room_id = app.schedule_session(&instructor, None).await;

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let router = app.router.clone();
        let token = instructor.token.clone();
        let room_id = room_id.clone();
        tasks.push(tokio::spawn(async move {
            use tower::ServiceExt;
            let req = axum::http::Request::builder()
                .method("POST")
                .uri("/live/status")
                .header("Content-Type", "application/json")
                .header("Authorization", format!("Bearer {token}"))
                .body(axum::body::Body::from(
                    json!({ "roomId": room_id, "status": "active" }).to_string(),
                ))
                .unwrap();
            router.oneshot(req).await.unwrap().status()
        }));
    }

    for task in tasks {
        assert_eq!(task.await.unwrap(), StatusCode::OK);
    }
    let status = app.get_status(&instructor, &room_id).await;
    assert_eq!(status.body["data"]["status"], "active");
}

#[tokio::test]
async fn test_health() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["database"], "connected");
    assert_eq!(response.body["data"]["cache"], "connected");
}

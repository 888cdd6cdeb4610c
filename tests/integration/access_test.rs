//! Integration tests for the access gate and the session view gate.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use classgate_core::types::RoomId;
use classgate_entity::live::{MeetingProvider, NewLiveSession};
use classgate_entity::user::UserRole;

#[tokio::test]
async fn test_owner_authorized_in_every_state() {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;
    let room_id = app.schedule_session(&instructor, None).await;

    for next in [None, Some("active"), Some("ended")] {
        if let Some(status) = next {
            app.set_status(&instructor, &room_id, status).await;
        }
        let response = app.get_status(&instructor, &room_id).await;
        assert_eq!(response.status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_session_without_course_denies_non_owners() {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;
    let student = app.create_user(UserRole::Student).await;
    let room_id = app.schedule_session(&instructor, None).await;

    let status = app.get_status(&student, &room_id).await;
    assert_eq!(status.status, StatusCode::FORBIDDEN);

    let view = app.view(&student, &room_id).await;
    assert_eq!(view.status, StatusCode::OK);
    assert_eq!(view.body["data"], json!({ "view": "enrollment_required" }));
}

#[tokio::test]
async fn test_access_matrix_for_course_linked_session() {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;
    let course = app
        .create_course("advanced-genetics", Some(4900), instructor.id)
        .await;
    let room_id = app.schedule_session(&instructor, Some(course.id)).await;

    // Approved through moderation.
    let approved = app.create_user(UserRole::Guest).await;
    app.enroll(&approved, &course, true).await;
    let me = app
        .request("GET", "/enrollments/me", None, Some(&approved.token))
        .await;
    let enrollment_id = me.body["data"][0]["id"].as_str().unwrap().to_string();
    let review = app
        .request(
            "POST",
            &format!("/enrollments/{enrollment_id}/approve"),
            Some(json!({})),
            Some(&instructor.token),
        )
        .await;
    assert_eq!(review.status, StatusCode::OK);

    let pending = app.create_user(UserRole::Guest).await;
    app.enroll(&pending, &course, true).await;

    let completed = app.create_user(UserRole::Student).await;
    app.complete_course(completed.id, course.id).await;

    let stranger = app.create_user(UserRole::Student).await;

    let cases = [
        (&instructor, StatusCode::OK),
        (&approved, StatusCode::OK),
        (&pending, StatusCode::FORBIDDEN),
        (&completed, StatusCode::OK),
        (&stranger, StatusCode::FORBIDDEN),
    ];
    for (user, expected) in cases {
        let response = app.get_status(user, &room_id).await;
        assert_eq!(response.status, expected, "user role {:?}", user.role);
    }
}

#[tokio::test]
async fn test_unenrolled_student_denied_regardless_of_status() {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;
    let course = app
        .create_course("intro-to-biology", None, instructor.id)
        .await;
    app.state
        .stores
        .live_sessions
        .create(NewLiveSession {
            room_id: RoomId::parse("abc123").unwrap(),
            title: "Cell biology Q&A".to_string(),
            provider: MeetingProvider::Jitsi,
            room_name: "classgate-abc123".to_string(),
            meeting_link: None,
            created_by: instructor.id,
            course_id: Some(course.id),
        })
        .await
        .unwrap();
    let student = app.create_user(UserRole::Student).await;

    for next in [None, Some("active"), Some("ended")] {
        if let Some(status) = next {
            let response = app.set_status(&instructor, "abc123", status).await;
            assert_eq!(response.status, StatusCode::OK);
        }

        let status = app.get_status(&student, "abc123").await;
        assert_eq!(status.status, StatusCode::FORBIDDEN);
        assert_eq!(status.body["error"], "FORBIDDEN");

        let view = app.view(&student, "abc123").await;
        assert_eq!(view.status, StatusCode::OK);
        assert_eq!(view.body["data"]["view"], "enrollment_required");
        assert_eq!(view.body["data"]["courseId"], json!(course.id));
    }
}

#[tokio::test]
async fn test_view_presentations_follow_status() {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;
    let course = app
        .create_course("intro-to-biology", None, instructor.id)
        .await;
    let student = app.create_user(UserRole::Guest).await;
    app.enroll(&student, &course, false).await;
    let room_id = app.schedule_session(&instructor, Some(course.id)).await;

    let owner_view = app.view(&instructor, &room_id).await;
    assert_eq!(owner_view.body["data"]["view"], "start_control");
    assert_eq!(owner_view.body["data"]["roomId"], room_id.as_str());
    assert_eq!(owner_view.body["data"]["title"], "Cell biology Q&A");

    let waiting = app.view(&student, &room_id).await;
    assert_eq!(
        waiting.body["data"],
        json!({ "view": "waiting", "pollIntervalSeconds": 5 })
    );

    app.set_status(&instructor, &room_id, "active").await;
    let room = app.view(&student, &room_id).await;
    assert_eq!(room.body["data"]["view"], "room");
    assert_eq!(room.body["data"]["isEmbeddable"], true);
    assert_eq!(
        room.body["data"]["roomUrl"],
        format!("https://meet.jit.si/classgate-{room_id}")
    );
    assert_eq!(room.body["data"]["roomName"], format!("classgate-{room_id}"));

    app.set_status(&instructor, &room_id, "ended").await;
    let ended = app.view(&student, &room_id).await;
    assert_eq!(
        ended.body["data"],
        json!({ "view": "ended", "courseLink": "/courses/intro-to-biology" })
    );
}

#[tokio::test]
async fn test_cancelled_view() {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;
    let room_id = app.schedule_session(&instructor, None).await;
    app.request(
        "POST",
        &format!("/live/rooms/{room_id}/cancel"),
        None,
        Some(&instructor.token),
    )
    .await;

    let view = app.view(&instructor, &room_id).await;
    assert_eq!(view.body["data"], json!({ "view": "cancelled" }));
}

#[tokio::test]
async fn test_view_of_unknown_room() {
    let app = helpers::TestApp::new();
    let student = app.create_user(UserRole::Student).await;

    let missing = app.view(&student, "doesnotexist").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let malformed = app.view(&student, "bad%20room").await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}

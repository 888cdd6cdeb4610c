//! Integration tests for enrollment and moderation.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use classgate_entity::user::UserRole;

#[tokio::test]
async fn test_free_course_enrollment_promotes_guest() {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;
    let course = app
        .create_course("intro-to-biology", None, instructor.id)
        .await;
    let learner = app.create_user(UserRole::Guest).await;

    let response = app
        .request(
            "POST",
            "/enrollments/enroll",
            Some(json!({ "courseSlug": "intro-to-biology" })),
            Some(&learner.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["enrolled"], true);
    assert_eq!(response.body["status"], "approved");
    assert_eq!(response.body["enrollment"]["status"], "approved");
    assert_eq!(response.body["enrollment"]["enrollmentType"], "free");
    assert_eq!(response.body["enrollment"]["courseId"], json!(course.id));

    assert_eq!(app.local_role(learner.id).await, Some(UserRole::Student));
    assert_eq!(app.identity.writes_for(learner.id), vec![UserRole::Student]);
}

#[tokio::test]
async fn test_repeat_enrollment_is_idempotent() {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;
    let course = app
        .create_course("intro-to-biology", None, instructor.id)
        .await;
    let learner = app.create_user(UserRole::Guest).await;

    let first = app.enroll(&learner, &course, false).await;
    let second = app.enroll(&learner, &course, false).await;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(first.body["enrolled"], true);
    assert_eq!(second.body["enrolled"], true);
    assert_eq!(
        first.body["enrollment"]["id"],
        second.body["enrollment"]["id"]
    );
    assert_eq!(app.memory.enrollment_count(learner.id, course.id), 1);
    assert_eq!(app.identity.writes_for(learner.id).len(), 1);
}

#[tokio::test]
async fn test_manual_request_for_paid_course_is_pending() {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;
    let course = app
        .create_course("advanced-genetics", Some(4900), instructor.id)
        .await;
    let learner = app.create_user(UserRole::Guest).await;

    let response = app.enroll(&learner, &course, true).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["enrolled"], false);
    assert_eq!(response.body["status"], "pending");
    assert!(response.body["message"].is_string());

    assert_eq!(app.local_role(learner.id).await, Some(UserRole::Guest));
    assert!(app.identity.writes_for(learner.id).is_empty());
    assert_eq!(app.memory.enrollment_count(learner.id, course.id), 1);
}

#[tokio::test]
async fn test_paid_course_requires_payment_without_writing() {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;
    let course = app
        .create_course("advanced-genetics", Some(4900), instructor.id)
        .await;
    let learner = app.create_user(UserRole::Guest).await;

    let response = app.enroll(&learner, &course, false).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["enrolled"], false);
    assert_eq!(response.body["requiresPayment"], true);
    assert_eq!(response.body["amount"], 4900);
    assert_eq!(response.body["amountMinor"], 4900);
    assert_eq!(response.body["currency"], "USD");
    assert_eq!(
        response.body["paymentUrl"],
        format!("/checkout?course={}", course.id)
    );
    assert_eq!(app.memory.enrollment_count(learner.id, course.id), 0);
}

#[tokio::test]
async fn test_course_reference_validation() {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;
    let course = app
        .create_course("intro-to-biology", None, instructor.id)
        .await;
    let learner = app.create_user(UserRole::Guest).await;

    let bodies = [
        json!({}),
        json!({ "courseId": course.id, "courseSlug": "intro-to-biology" }),
        json!({ "courseId": "not-a-uuid" }),
        json!({ "courseSlug": "Intro To Biology" }),
        json!({ "courseSlug": "" }),
    ];
    for body in bodies {
        let response = app
            .request(
                "POST",
                "/enrollments/enroll",
                Some(body.clone()),
                Some(&learner.token),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(response.body["success"], false);
        assert_eq!(response.body["error"], "INVALID_INPUT");
    }
}

#[tokio::test]
async fn test_unauthenticated_enrollment_rejected() {
    let app = helpers::TestApp::new();
    let body = Some(json!({ "courseSlug": "intro-to-biology" }));

    let missing = app
        .request("POST", "/enrollments/enroll", body.clone(), None)
        .await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);

    let garbage = app
        .request("POST", "/enrollments/enroll", body, Some("not.a.jwt"))
        .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.body["error"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_unknown_course_not_found() {
    let app = helpers::TestApp::new();
    let learner = app.create_user(UserRole::Guest).await;

    let response = app
        .request(
            "POST",
            "/enrollments/enroll",
            Some(json!({ "courseSlug": "no-such-course" })),
            Some(&learner.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rate_limit_returns_429() {
    let mut config = helpers::test_config();
    config.enrollment.rate_limit_max = 2;
    let app = helpers::TestApp::with_config(config);
    let instructor = app.create_user(UserRole::Teacher).await;
    let course = app
        .create_course("advanced-genetics", Some(4900), instructor.id)
        .await;
    let learner = app.create_user(UserRole::Guest).await;

    assert_eq!(app.enroll(&learner, &course, false).await.status, StatusCode::OK);
    assert_eq!(app.enroll(&learner, &course, false).await.status, StatusCode::OK);

    let limited = app.enroll(&learner, &course, false).await;
    assert_eq!(limited.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(limited.body["error"], "RATE_LIMITED");

    // Other users are counted separately.
    let other = app.create_user(UserRole::Guest).await;
    assert_eq!(app.enroll(&other, &course, false).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_identity_failure_does_not_fail_enrollment() {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;
    let course = app
        .create_course("intro-to-biology", None, instructor.id)
        .await;
    let learner = app.create_user(UserRole::Guest).await;
    app.identity.set_failing(true);

    let response = app.enroll(&learner, &course, false).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["enrolled"], true);
    assert_eq!(app.local_role(learner.id).await, Some(UserRole::Student));
    assert!(app.identity.writes_for(learner.id).is_empty());
}

#[tokio::test]
async fn test_token_only_guest_is_promoted() {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;
    let course = app
        .create_course("intro-to-biology", None, instructor.id)
        .await;
    let learner = app.token_only_user(UserRole::Guest);

    let response = app.enroll(&learner, &course, false).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.local_role(learner.id).await, Some(UserRole::Student));
}

#[tokio::test]
async fn test_elevated_role_is_not_demoted() {
    let app = helpers::TestApp::new();
    let owner = app.create_user(UserRole::Teacher).await;
    let course = app.create_course("intro-to-biology", None, owner.id).await;
    let teacher = app.create_user(UserRole::Teacher).await;

    let response = app.enroll(&teacher, &course, false).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.local_role(teacher.id).await, Some(UserRole::Teacher));
    assert!(app.identity.writes_for(teacher.id).is_empty());
}

#[tokio::test]
async fn test_list_my_enrollments() {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;
    let free = app
        .create_course("intro-to-biology", None, instructor.id)
        .await;
    let paid = app
        .create_course("advanced-genetics", Some(4900), instructor.id)
        .await;
    let learner = app.create_user(UserRole::Guest).await;

    app.enroll(&learner, &free, false).await;
    app.enroll(&learner, &paid, true).await;

    let response = app
        .request("GET", "/enrollments/me", None, Some(&learner.token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"].as_array().map(Vec::len), Some(2));
}

async fn pending_enrollment_id(app: &helpers::TestApp, learner: &helpers::TestUser) -> String {
    let response = app
        .request("GET", "/enrollments/me", None, Some(&learner.token))
        .await;
    response.body["data"][0]["id"]
        .as_str()
        .expect("No enrollment id")
        .to_string()
}

#[tokio::test]
async fn test_instructor_approves_pending_request() {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;
    let course = app
        .create_course("advanced-genetics", Some(4900), instructor.id)
        .await;
    let learner = app.create_user(UserRole::Guest).await;
    app.enroll(&learner, &course, true).await;
    let id = pending_enrollment_id(&app, &learner).await;

    let approved = app
        .request(
            "POST",
            &format!("/enrollments/{id}/approve"),
            Some(json!({ "note": "scholarship" })),
            Some(&instructor.token),
        )
        .await;

    assert_eq!(approved.status, StatusCode::OK);
    assert_eq!(approved.body["data"]["status"], "approved");
    let history = approved.body["data"]["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1]["note"], "scholarship");
    assert_eq!(app.local_role(learner.id).await, Some(UserRole::Student));

    // Only pending requests can be decided.
    let again = app
        .request(
            "POST",
            &format!("/enrollments/{id}/reject"),
            Some(json!({})),
            Some(&instructor.token),
        )
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);

    // The learner is now enrolled.
    let enroll = app.enroll(&learner, &course, false).await;
    assert_eq!(enroll.body["enrolled"], true);
}

#[tokio::test]
async fn test_only_instructor_or_moderator_can_review() {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;
    let course = app
        .create_course("advanced-genetics", Some(4900), instructor.id)
        .await;
    let learner = app.create_user(UserRole::Guest).await;
    app.enroll(&learner, &course, true).await;
    let id = pending_enrollment_id(&app, &learner).await;

    let other_teacher = app.create_user(UserRole::Teacher).await;
    let forbidden = app
        .request(
            "POST",
            &format!("/enrollments/{id}/approve"),
            Some(json!({})),
            Some(&other_teacher.token),
        )
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let admin = app.create_user(UserRole::Admin).await;
    let rejected = app
        .request(
            "POST",
            &format!("/enrollments/{id}/reject"),
            Some(json!({})),
            Some(&admin.token),
        )
        .await;
    assert_eq!(rejected.status, StatusCode::OK);
    assert_eq!(rejected.body["data"]["status"], "rejected");
    assert_eq!(app.local_role(learner.id).await, Some(UserRole::Guest));
}

#[tokio::test]
async fn test_review_unknown_enrollment() {
    let app = helpers::TestApp::new();
    let admin = app.create_user(UserRole::Admin).await;

    let missing = app
        .request(
            "POST",
            &format!("/enrollments/{}/approve", uuid_like()),
            Some(json!({})),
            Some(&admin.token),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let malformed = app
        .request(
            "POST",
            "/enrollments/not-an-id/approve",
            Some(json!({})),
            Some(&admin.token),
        )
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}

fn uuid_like() -> String {
    classgate_core::types::EnrollmentId::new().to_string()
}

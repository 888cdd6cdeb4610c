//! Integration tests for viewer-side status reconciliation and for the
//! server-side role reconciler.

mod helpers;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::Utc;

use classgate_api::build_router;
use classgate_client::{HttpStatusSource, StatusPoller, StatusSnapshot, StatusSource, ViewerEvent};
use classgate_core::error::AppError;
use classgate_core::result::AppResult;
use classgate_core::types::RoomId;
use classgate_entity::enrollment::{EnrollmentStatus, EnrollmentType, EnrollmentUpsert};
use classgate_entity::live::LiveSessionStatus;
use classgate_entity::user::UserRole;

const INTERVAL: Duration = Duration::from_secs(5);

/// Reads status through the in-process router, counting requests.
#[derive(Debug)]
struct RouterSource {
    app: Arc<helpers::TestApp>,
    viewer: helpers::TestUser,
    requests: AtomicUsize,
}

#[async_trait]
impl StatusSource for RouterSource {
    async fn fetch(&self, room_id: &RoomId) -> AppResult<StatusSnapshot> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let response = self.app.get_status(&self.viewer, room_id.as_str()).await;
        if response.status != StatusCode::OK {
            return Err(AppError::external_service(format!(
                "status read returned {}",
                response.status
            )));
        }
        Ok(serde_json::from_value(response.body["data"].clone())?)
    }
}

struct Classroom {
    app: Arc<helpers::TestApp>,
    instructor: helpers::TestUser,
    student: helpers::TestUser,
    room_id: String,
}

async fn classroom() -> Classroom {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;
    let course = app
        .create_course("intro-to-biology", None, instructor.id)
        .await;
    let student = app.create_user(UserRole::Guest).await;
    let enrolled = app.enroll(&student, &course, false).await;
    assert_eq!(enrolled.body["enrolled"], true);
    let room_id = app.schedule_session(&instructor, Some(course.id)).await;

    Classroom {
        app: Arc::new(app),
        instructor,
        student,
        room_id,
    }
}

#[tokio::test(start_paused = true)]
async fn test_waiting_student_sees_start_within_one_interval() {
    let class = classroom().await;
    let source = Arc::new(RouterSource {
        app: class.app.clone(),
        viewer: class.student.clone(),
        requests: AtomicUsize::new(0),
    });

    let waiting = class.app.view(&class.student, &class.room_id).await;
    assert_eq!(waiting.body["data"]["view"], "waiting");

    let mut handle = StatusPoller::spawn(
        source.clone(),
        RoomId::parse(&class.room_id).unwrap(),
        LiveSessionStatus::Scheduled,
        false,
        INTERVAL,
    );

    // A couple of polls while the session is still scheduled.
    tokio::time::sleep(INTERVAL * 2 + Duration::from_secs(1)).await;
    assert_eq!(source.requests.load(Ordering::SeqCst), 2);
    assert_eq!(handle.try_next_event(), None);

    let started = class
        .app
        .set_status(&class.instructor, &class.room_id, "active")
        .await;
    assert_eq!(started.status, StatusCode::OK);

    let changed = tokio::time::timeout(INTERVAL, handle.next_event())
        .await
        .expect("no status change within one interval");
    assert_eq!(
        changed,
        Some(ViewerEvent::StatusChanged {
            from: LiveSessionStatus::Scheduled,
            to: LiveSessionStatus::Active,
        })
    );
    assert_eq!(
        handle.next_event().await,
        Some(ViewerEvent::SessionStarted {
            room_url: Some(format!("https://meet.jit.si/classgate-{}", class.room_id)),
            is_embeddable: true,
        })
    );

    handle.join().await;
    let polls = source.requests.load(Ordering::SeqCst);
    tokio::time::sleep(INTERVAL * 4).await;
    assert_eq!(source.requests.load(Ordering::SeqCst), polls);

    let room = class.app.view(&class.student, &class.room_id).await;
    assert_eq!(room.body["data"]["view"], "room");
}

#[tokio::test(start_paused = true)]
async fn test_leaving_the_page_stops_polling() {
    let class = classroom().await;
    let source = Arc::new(RouterSource {
        app: class.app.clone(),
        viewer: class.student.clone(),
        requests: AtomicUsize::new(0),
    });

    let handle = StatusPoller::spawn(
        source.clone(),
        RoomId::parse(&class.room_id).unwrap(),
        LiveSessionStatus::Scheduled,
        false,
        INTERVAL,
    );
    tokio::time::sleep(INTERVAL + Duration::from_secs(1)).await;
    assert_eq!(source.requests.load(Ordering::SeqCst), 1);

    drop(handle);
    tokio::time::sleep(INTERVAL * 4).await;
    assert_eq!(source.requests.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_instructor_does_not_poll() {
    let class = classroom().await;
    let source = Arc::new(RouterSource {
        app: class.app.clone(),
        viewer: class.instructor.clone(),
        requests: AtomicUsize::new(0),
    });

    let handle = StatusPoller::spawn(
        source.clone(),
        RoomId::parse(&class.room_id).unwrap(),
        LiveSessionStatus::Scheduled,
        true,
        INTERVAL,
    );
    tokio::time::sleep(INTERVAL * 3).await;

    // The instructor's own start is applied locally.
    handle.set_local_status(LiveSessionStatus::Active);
    assert_eq!(handle.status(), LiveSessionStatus::Active);
    assert_eq!(source.requests.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_http_source_against_running_server() {
    let class = classroom().await;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = build_router(class.app.state.clone());
    let server = tokio::spawn(async move { axum::serve(listener, router).await });

    let source = Arc::new(
        HttpStatusSource::new(
            format!("http://{addr}"),
            class.student.token.clone(),
            Duration::from_secs(2),
        )
        .unwrap(),
    );
    let room_id = RoomId::parse(&class.room_id).unwrap();

    let snapshot = source.fetch(&room_id).await.unwrap();
    assert_eq!(snapshot.status, LiveSessionStatus::Scheduled);
    assert!(snapshot.is_embeddable);

    let mut handle = StatusPoller::spawn(
        source,
        room_id,
        LiveSessionStatus::Scheduled,
        false,
        Duration::from_millis(100),
    );
    class
        .app
        .set_status(&class.instructor, &class.room_id, "active")
        .await;

    let event = tokio::time::timeout(Duration::from_secs(5), handle.next_event())
        .await
        .expect("session start not observed");
    assert_eq!(
        event,
        Some(ViewerEvent::StatusChanged {
            from: LiveSessionStatus::Scheduled,
            to: LiveSessionStatus::Active,
        })
    );

    let outsider = class.app.create_user(UserRole::Student).await;
    let denied = HttpStatusSource::new(
        format!("http://{addr}"),
        outsider.token,
        Duration::from_secs(2),
    )
    .unwrap()
    .fetch(&RoomId::parse(&class.room_id).unwrap())
    .await
    .unwrap_err();
    assert_eq!(denied.kind, classgate_core::ErrorKind::Forbidden);

    server.abort();
}

#[tokio::test]
async fn test_reconciler_repairs_missed_identity_write() {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;
    let course = app
        .create_course("intro-to-biology", None, instructor.id)
        .await;
    let student = app.create_user(UserRole::Guest).await;

    app.identity.set_failing(true);
    let response = app.enroll(&student, &course, false).await;
    assert_eq!(response.body["enrolled"], true);
    assert_eq!(app.local_role(student.id).await, Some(UserRole::Student));
    assert!(app.identity.writes_for(student.id).is_empty());

    app.identity.set_failing(false);
    let report = app.state.role_reconciler().reconcile().await.unwrap();

    assert_eq!(report.resynced, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(app.identity.writes_for(student.id), vec![UserRole::Student]);
}

#[tokio::test]
async fn test_reconciler_promotes_guest_holding_grant() {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;
    let course = app
        .create_course("intro-to-biology", None, instructor.id)
        .await;
    let guest = app.create_user(UserRole::Guest).await;
    let bystander = app.create_user(UserRole::Guest).await;

    // Grant written without the promotion side effect.
    app.state
        .stores
        .enrollments
        .upsert(&EnrollmentUpsert {
            user_id: guest.id,
            course_id: course.id,
            status: EnrollmentStatus::Approved,
            enrollment_type: EnrollmentType::Free,
            note: "imported".to_string(),
            at: Utc::now(),
        })
        .await
        .unwrap();

    let report = app.state.role_reconciler().reconcile().await.unwrap();

    assert_eq!(report.promoted, 1);
    assert_eq!(app.local_role(guest.id).await, Some(UserRole::Student));
    assert_eq!(app.local_role(bystander.id).await, Some(UserRole::Guest));
}

#[tokio::test]
async fn test_expiry_sweep_rejects_stale_requests() {
    let app = helpers::TestApp::new();
    let instructor = app.create_user(UserRole::Teacher).await;
    let course = app
        .create_course("advanced-genetics", Some(4900), instructor.id)
        .await;
    let learner = app.create_user(UserRole::Guest).await;

    app.state
        .stores
        .enrollments
        .upsert(&EnrollmentUpsert {
            user_id: learner.id,
            course_id: course.id,
            status: EnrollmentStatus::Pending,
            enrollment_type: EnrollmentType::Manual,
            note: "manual enrollment requested".to_string(),
            at: Utc::now() - chrono::Duration::hours(72),
        })
        .await
        .unwrap();

    let expired = app.state.expiry_sweep(48).sweep(Utc::now()).await.unwrap();
    assert_eq!(expired, 1);

    let enrollment = app
        .state
        .stores
        .enrollments
        .find_by_pair(learner.id, course.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(enrollment.status, EnrollmentStatus::Rejected);
    assert_eq!(
        enrollment.history.last().map(|h| h.note.as_str()),
        Some("request expired")
    );
}

use crate::helpers::{make_test_app, TestApp};
use axum::http::StatusCode;
use db::models::session::Entity as SessionEntity;
use db::models::user::Role;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::{json, Value};

struct Ctx {
    teacher: String,
    course_id: String,
    group_id: String,
    s1: String,
    s2: String,
}

async fn setup(app: &TestApp) -> Ctx {
    let (_, admin) = app.user("admin1", Role::Admin).await;
    let (teacher, teacher_token) = app.user("teacher1", Role::Teacher).await;
    let (s1, _) = app.user("student1", Role::Student).await;
    let (s2, _) = app.user("student2", Role::Student).await;

    let (_, course) = app
        .post(
            "/api/courses",
            Some(&admin),
            json!({ "name": "Algebra", "teacherId": teacher.id, "totalDuration": 10 }),
        )
        .await;
    let (_, group) = app
        .post("/api/groups", Some(&admin), json!({ "name": "G1", "students": [s1.id, s2.id] }))
        .await;

    Ctx {
        teacher: teacher_token,
        course_id: course["data"]["id"].as_str().unwrap().to_owned(),
        group_id: group["data"]["id"].as_str().unwrap().to_owned(),
        s1: s1.id,
        s2: s2.id,
    }
}

fn session_body(ctx: &Ctx, attendance: Value) -> Value {
    json!({
        "courseId": ctx.course_id,
        "groupId": ctx.group_id,
        "date": "2024-03-01",
        "startTime": "09:00",
        "endTime": "10:30",
        "attendance": attendance
    })
}

#[tokio::test]
async fn create_then_mark_absent_round_trip() {
    let app = make_test_app().await;
    let ctx = setup(&app).await;

    let (status, created) = app
        .post(
            "/api/sessions",
            Some(&ctx.teacher),
            session_body(&ctx, json!([{ "student": ctx.s1, "isPresent": true }])),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["sessionTime"], 90.0);
    assert_eq!(created["data"]["duration"], 1.5);
    let session_id = created["data"]["id"].as_str().unwrap().to_owned();

    let (status, marked) = app
        .post(
            "/api/sessions/markAttendance",
            Some(&ctx.teacher),
            json!({ "sessionId": session_id, "studentId": ctx.s1, "isPresent": false }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let attendance = marked["data"]["attendance"].as_array().unwrap();
    assert_eq!(attendance.len(), 1);
    assert_eq!(attendance[0]["studentId"], ctx.s1);
    assert_eq!(attendance[0]["isPresent"], false);
}

#[tokio::test]
async fn roster_entry_without_presence_is_rejected() {
    let app = make_test_app().await;
    let ctx = setup(&app).await;

    let (status, _) = app
        .post(
            "/api/sessions",
            Some(&ctx.teacher),
            session_body(&ctx, json!([{ "student": ctx.s1 }])),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(SessionEntity::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn marking_a_student_off_the_roster_is_not_found() {
    let app = make_test_app().await;
    let ctx = setup(&app).await;

    let (_, created) = app
        .post(
            "/api/sessions",
            Some(&ctx.teacher),
            session_body(&ctx, json!([{ "studentId": ctx.s1, "isPresent": true }])),
        )
        .await;
    let session_id = created["data"]["id"].as_str().unwrap().to_owned();

    let (status, _) = app
        .post(
            "/api/sessions/markAttendance",
            Some(&ctx.teacher),
            json!({ "sessionId": session_id, "studentId": ctx.s2, "isPresent": true }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, fetched) = app.get(&format!("/api/sessions/{session_id}"), Some(&ctx.teacher)).await;
    assert_eq!(fetched["data"]["attendance"], created["data"]["attendance"]);
}

#[tokio::test]
async fn inverted_range_is_rejected() {
    let app = make_test_app().await;
    let ctx = setup(&app).await;

    let mut body = session_body(&ctx, json!([]));
    body["startTime"] = json!("11:00");
    body["endTime"] = json!("10:00");

    let (status, response) = app.post("/api/sessions", Some(&ctx.teacher), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["message"].as_str().unwrap().contains("time range"));
    assert_eq!(SessionEntity::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn roster_must_reference_students() {
    let app = make_test_app().await;
    let ctx = setup(&app).await;

    let (status, _) = app
        .post(
            "/api/sessions",
            Some(&ctx.teacher),
            session_body(&ctx, json!([{ "studentId": "665f1c2e9b1d4a0012345678", "isPresent": true }])),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_update_and_delete() {
    let app = make_test_app().await;
    let ctx = setup(&app).await;

    let (_, created) = app
        .post("/api/sessions", Some(&ctx.teacher), session_body(&ctx, json!([])))
        .await;
    let session_id = created["data"]["id"].as_str().unwrap().to_owned();

    let (status, listed) = app
        .get(
            &format!("/api/sessions/{}/{}", ctx.course_id, ctx.group_id),
            Some(&ctx.teacher),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["data"][0]["id"], session_id);

    let (status, updated) = app
        .put(
            &format!("/api/sessions/{session_id}"),
            Some(&ctx.teacher),
            json!({ "endTime": "11:00", "attendance": [{ "studentId": ctx.s2, "isPresent": true }] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["sessionTime"], 120.0);
    assert_eq!(updated["data"]["attendance"][0]["studentId"], ctx.s2);

    let (status, _) = app
        .delete(&format!("/api/sessions/{session_id}"), Some(&ctx.teacher))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&format!("/api/sessions/{session_id}"), Some(&ctx.teacher)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

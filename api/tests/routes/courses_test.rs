use crate::helpers::make_test_app;
use axum::http::StatusCode;
use db::models::course::{Entity as CourseEntity, Model as CourseModel};
use db::models::user::Role;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;

#[tokio::test]
async fn create_course_with_teacher_expands_references() {
    let app = make_test_app().await;
    let (_, admin) = app.user("admin1", Role::Admin).await;
    let (teacher, _) = app.user("teacher1", Role::Teacher).await;

    let (status, body) = app
        .post(
            "/api/courses",
            Some(&admin),
            json!({ "name": "Algebra", "teacher": teacher.id, "totalDuration": 10 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["teacherId"], teacher.id);
    assert_eq!(body["data"]["teacher"]["username"], "teacher1");
    assert_eq!(body["data"]["files"], json!([]));
    assert_eq!(body["data"]["totalDuration"], 10.0);
}

#[tokio::test]
async fn course_with_non_teacher_is_rejected_and_not_stored() {
    let app = make_test_app().await;
    let (_, admin) = app.user("admin1", Role::Admin).await;
    let (student, _) = app.user("student1", Role::Student).await;

    let (status, body) = app
        .post(
            "/api/courses",
            Some(&admin),
            json!({ "name": "Algebra", "teacherId": student.id, "totalDuration": 10 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = app
        .post(
            "/api/courses",
            Some(&admin),
            json!({ "name": "Algebra", "teacherId": "665f1c2e9b1d4a0012345678", "totalDuration": 10 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(CourseEntity::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn non_positive_duration_is_a_validation_error() {
    let app = make_test_app().await;
    let (_, admin) = app.user("admin1", Role::Admin).await;
    let (teacher, _) = app.user("teacher1", Role::Teacher).await;

    let (status, body) = app
        .post(
            "/api/courses",
            Some(&admin),
            json!({ "name": "Algebra", "teacherId": teacher.id, "totalDuration": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Total duration must be greater than zero");
}

#[tokio::test]
async fn progress_reports_share_of_planned_hours() {
    let app = make_test_app().await;
    let (_, admin) = app.user("admin1", Role::Admin).await;
    let (teacher, teacher_token) = app.user("teacher1", Role::Teacher).await;

    let (_, course) = app
        .post(
            "/api/courses",
            Some(&admin),
            json!({ "name": "Algebra", "teacherId": teacher.id, "totalDuration": 10 }),
        )
        .await;
    let course_id = course["data"]["id"].as_str().unwrap().to_owned();
    let (_, group) = app.post("/api/groups", Some(&admin), json!({ "name": "G1" })).await;
    let group_id = group["data"]["id"].as_str().unwrap().to_owned();

    for (start, end) in [("08:00", "10:00"), ("10:00", "13:00")] {
        let (status, _) = app
            .post(
                "/api/sessions",
                Some(&teacher_token),
                json!({
                    "courseId": course_id,
                    "groupId": group_id,
                    "date": "2024-03-01",
                    "startTime": start,
                    "endTime": end
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app
        .get(&format!("/api/courses/{course_id}/progress"), Some(&teacher_token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["courseId"], course_id);
    assert_eq!(body["data"]["progress"], "50.00%");
}

#[tokio::test]
async fn progress_of_course_without_duration_is_unprocessable() {
    let app = make_test_app().await;
    let (teacher, token) = app.user("teacher1", Role::Teacher).await;
    let course = CourseModel::create(&app.db, "Legacy", &teacher.id, 0.0).await.unwrap();

    let (status, _) = app
        .get(&format!("/api/courses/{}/progress", course.id), Some(&token))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn update_replaces_sets_and_delete_leaves_group_links() {
    let app = make_test_app().await;
    let (_, admin) = app.user("admin1", Role::Admin).await;
    let (teacher, _) = app.user("teacher1", Role::Teacher).await;
    let (_, group) = app.post("/api/groups", Some(&admin), json!({ "name": "G1" })).await;
    let group_id = group["data"]["id"].as_str().unwrap().to_owned();

    let (_, course) = app
        .post(
            "/api/courses",
            Some(&admin),
            json!({ "name": "Algebra", "teacherId": teacher.id, "groups": [group_id], "totalDuration": 10 }),
        )
        .await;
    let course_id = course["data"]["id"].as_str().unwrap().to_owned();
    assert_eq!(course["data"]["groups"][0]["name"], "G1");

    let (status, body) = app
        .put(
            &format!("/api/courses/{course_id}"),
            Some(&admin),
            json!({ "name": "Algebra II", "groups": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Algebra II");
    assert_eq!(body["data"]["groups"], json!([]));

    let (status, _) = app.delete(&format!("/api/courses/{course_id}"), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&format!("/api/courses/{course_id}"), Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

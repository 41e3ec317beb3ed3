use crate::helpers::make_test_app;
use axum::http::StatusCode;
use db::models::group::Entity as GroupEntity;
use db::models::user::Role;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;

#[tokio::test]
async fn create_group_with_students() {
    let app = make_test_app().await;
    let (_, admin) = app.user("admin1", Role::Admin).await;
    let (s1, _) = app.user("student1", Role::Student).await;

    let (status, body) = app
        .post(
            "/api/groups",
            Some(&admin),
            json!({ "name": "G1", "students": [s1.id] }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["students"][0]["id"], s1.id);

    let (status, _) = app.post("/api/groups", Some(&admin), json!({ "name": "G1" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn malformed_student_id_fails_before_any_write() {
    let app = make_test_app().await;
    let (_, admin) = app.user("admin1", Role::Admin).await;

    let (status, body) = app
        .post(
            "/api/groups",
            Some(&admin),
            json!({ "name": "G1", "students": ["xyz"] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("xyz"));
    assert_eq!(GroupEntity::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn teacher_cannot_join_as_student() {
    let app = make_test_app().await;
    let (_, admin) = app.user("admin1", Role::Admin).await;
    let (teacher, _) = app.user("teacher1", Role::Teacher).await;

    let (status, _) = app
        .post(
            "/api/groups",
            Some(&admin),
            json!({ "name": "G1", "students": [teacher.id] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn adding_a_student_twice_keeps_one_membership() {
    let app = make_test_app().await;
    let (_, admin) = app.user("admin1", Role::Admin).await;
    let (s1, _) = app.user("student1", Role::Student).await;
    let (_, group) = app.post("/api/groups", Some(&admin), json!({ "name": "G1" })).await;
    let group_id = group["data"]["id"].as_str().unwrap().to_owned();

    for _ in 0..2 {
        let (status, body) = app
            .post(
                "/api/groups/addStudent",
                Some(&admin),
                json!({ "groupId": group_id, "studentId": s1.id }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["students"].as_array().unwrap().len(), 1);
    }

    let (status, _) = app
        .post(
            "/api/groups/addStudent",
            Some(&admin),
            json!({ "groupId": group_id, "studentId": "665f1c2e9b1d4a0012345678" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn add_course_links_both_sides() {
    let app = make_test_app().await;
    let (_, admin) = app.user("admin1", Role::Admin).await;
    let (teacher, _) = app.user("teacher1", Role::Teacher).await;
    let (_, group) = app.post("/api/groups", Some(&admin), json!({ "name": "G1" })).await;
    let group_id = group["data"]["id"].as_str().unwrap().to_owned();
    let (_, course) = app
        .post(
            "/api/courses",
            Some(&admin),
            json!({ "name": "Algebra", "teacherId": teacher.id, "totalDuration": 10 }),
        )
        .await;
    let course_id = course["data"]["id"].as_str().unwrap().to_owned();

    let (status, body) = app
        .post(
            "/api/groups/addCourse",
            Some(&admin),
            json!({ "groupId": group_id, "courseId": course_id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["courses"][0]["id"], course_id);

    let (_, course) = app.get(&format!("/api/courses/{course_id}"), Some(&admin)).await;
    assert_eq!(course["data"]["groups"][0]["id"], group_id);
}

#[tokio::test]
async fn update_replaces_students_and_delete_removes_group() {
    let app = make_test_app().await;
    let (_, admin) = app.user("admin1", Role::Admin).await;
    let (s1, _) = app.user("student1", Role::Student).await;
    let (s2, _) = app.user("student2", Role::Student).await;
    let (_, group) = app
        .post("/api/groups", Some(&admin), json!({ "name": "G1", "students": [s1.id] }))
        .await;
    let group_id = group["data"]["id"].as_str().unwrap().to_owned();

    let (status, body) = app
        .put(
            &format!("/api/groups/{group_id}"),
            Some(&admin),
            json!({ "students": [s2.id] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let students = body["data"]["students"].as_array().unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0]["id"], s2.id);

    let (status, _) = app.delete(&format!("/api/groups/{group_id}"), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&format!("/api/groups/{group_id}"), Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

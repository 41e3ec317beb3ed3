use crate::routes::common::validate_not_blank;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,

    pub students: Option<Vec<String>>,

    pub courses: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroupRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: Option<String>,

    pub students: Option<Vec<String>>,

    pub courses: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStudentRequest {
    pub group_id: String,
    pub student_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCourseRequest {
    pub group_id: String,
    pub course_id: String,
}

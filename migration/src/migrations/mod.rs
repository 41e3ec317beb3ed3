pub mod m202505290001_create_users;
pub mod m202505290002_create_courses;
pub mod m202505290003_create_groups;
pub mod m202505290004_create_files;
pub mod m202505290005_create_sessions;
pub mod m202505290006_create_associations;
